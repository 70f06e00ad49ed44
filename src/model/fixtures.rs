// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in scenes: a fixed demo layout and a seeded random generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::geometry::{Obstacle, Point};
use super::scene::{Scene, DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH};

pub const DEFAULT_RANDOM_OBSTACLES: usize = 10;
const MIN_OBSTACLE_SIDE: i32 = 50;
const MAX_OBSTACLE_SIDE: i32 = 100;

fn block(left: i32, top: i32, right: i32, bottom: i32) -> Obstacle {
    // Literal coordinates below are all well-formed.
    Obstacle::new(left, top, right, bottom).expect("demo obstacle")
}

/// A hand-placed scene whose straight route is blocked several times.
pub fn demo_scene() -> Scene {
    Scene::default()
        .with_endpoints(Point::new(40, 240), Point::new(600, 240))
        .with_obstacles([
            block(120, 160, 200, 320),
            block(260, 60, 340, 200),
            block(260, 260, 340, 420),
            block(400, 180, 480, 300),
            block(520, 100, 580, 220),
        ])
}

/// Generates `count` obstacles with random top-left corners inside the canvas and sides of
/// 50..=100 units. The same seed always produces the same scene.
pub fn random_scene(width: i32, height: i32, count: usize, seed: u64) -> Scene {
    // Keeps `x + w` and `y + h` in range, so every generated block is well-formed.
    let width = width.clamp(1, i32::MAX - MAX_OBSTACLE_SIDE);
    let height = height.clamp(1, i32::MAX - MAX_OBSTACLE_SIDE);
    let mut rng = StdRng::seed_from_u64(seed);

    let obstacles = (0..count)
        .map(|_| {
            let x = rng.random_range(0..=width);
            let y = rng.random_range(0..=height);
            let w = rng.random_range(MIN_OBSTACLE_SIDE..=MAX_OBSTACLE_SIDE);
            let h = rng.random_range(MIN_OBSTACLE_SIDE..=MAX_OBSTACLE_SIDE);
            block(x, y, x + w, y + h)
        })
        .collect::<Vec<_>>();

    // Both endpoints start at the origin until the user places them.
    Scene::new(width, height).unwrap_or_default().with_obstacles(obstacles)
}

/// Random scene on the default canvas size.
pub fn random_default_scene(seed: u64) -> Scene {
    random_scene(
        DEFAULT_SCENE_WIDTH,
        DEFAULT_SCENE_HEIGHT,
        DEFAULT_RANDOM_OBSTACLES,
        seed,
    )
}

#[cfg(test)]
mod tests {
    use super::{demo_scene, random_scene};

    #[test]
    fn random_scene_is_reproducible() {
        let a = random_scene(640, 480, 10, 7);
        let b = random_scene(640, 480, 10, 7);
        assert_eq!(a, b);
        assert_eq!(a.obstacles().len(), 10);
    }

    #[test]
    fn random_obstacles_have_bounded_sides() {
        let scene = random_scene(300, 200, 25, 42);
        for obstacle in scene.obstacles() {
            assert!((50..=100).contains(&obstacle.width()));
            assert!((50..=100).contains(&obstacle.height()));
            assert!((0..=300).contains(&obstacle.left()));
            assert!((0..=200).contains(&obstacle.top()));
        }
    }

    #[test]
    fn demo_scene_endpoints_are_outside_obstacles() {
        let scene = demo_scene();
        for point in scene.query_points() {
            assert!(scene.obstacle_at(point).is_none());
        }
    }
}
