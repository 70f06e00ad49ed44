// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark scenes.

use blockroute::model::fixtures::{demo_scene, random_scene};
use blockroute::model::{Obstacle, Point, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Demo,
    Grid4,
    Grid12,
    Grid24,
    Random50,
    Random200,
}

impl Case {
    pub const ALL: [Case; 6] = [
        Case::Demo,
        Case::Grid4,
        Case::Grid12,
        Case::Grid24,
        Case::Random50,
        Case::Random200,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Case::Demo => "demo",
            Case::Grid4 => "grid_4x4",
            Case::Grid12 => "grid_12x12",
            Case::Grid24 => "grid_24x24",
            Case::Random50 => "random_50",
            Case::Random200 => "random_200",
        }
    }
}

pub fn fixture(case: Case) -> Scene {
    match case {
        Case::Demo => demo_scene(),
        Case::Grid4 => staggered_grid(4),
        Case::Grid12 => staggered_grid(12),
        Case::Grid24 => staggered_grid(24),
        Case::Random50 => with_corner_endpoints(random_scene(2_000, 1_500, 50, 0x5eed)),
        Case::Random200 => with_corner_endpoints(random_scene(4_000, 3_000, 200, 0x5eed)),
    }
}

/// `n * n` blocks on a 100-unit pitch, every other row shifted by half a pitch so straight
/// corridors are rare.
fn staggered_grid(n: i32) -> Scene {
    let pitch = 100;
    let side = 60;
    let size = n * pitch + pitch;
    let obstacles = (0..n).flat_map(|row| {
        (0..n).map(move |col| {
            let shift = if row % 2 == 0 { 0 } else { pitch / 2 };
            let left = pitch / 2 + col * pitch + shift;
            let top = pitch / 2 + row * pitch;
            Obstacle::new(left, top, left + side, top + side).expect("grid obstacle")
        })
    });

    Scene::new(size, size)
        .expect("grid scene")
        .with_endpoints(Point::new(0, size / 2 + 5), Point::new(size, size / 2 + 5))
        .with_obstacles(obstacles)
}

fn with_corner_endpoints(scene: Scene) -> Scene {
    let end = Point::new(scene.width() + 10, scene.height() + 10);
    scene.with_endpoints(Point::new(-10, -10), end)
}
