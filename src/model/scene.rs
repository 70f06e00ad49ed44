// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use thiserror::Error;

use super::geometry::{GeometryError, Obstacle, Point};

pub const DEFAULT_SCENE_WIDTH: i32 = 640;
pub const DEFAULT_SCENE_HEIGHT: i32 = 480;

/// Index of an obstacle inside a scene (or any obstacle slice handed to the graph builder).
///
/// Ids are positions, so removing an obstacle shifts the ids of the ones after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(usize);

impl ObstacleId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("unknown obstacle {id} (scene has {len} obstacles)")]
    UnknownObstacle { id: ObstacleId, len: usize },
    #[error("invalid obstacle {index}")]
    InvalidObstacle {
        index: usize,
        #[source]
        source: GeometryError,
    },
    #[error("scene size must be positive (width={width}, height={height})")]
    InvalidSize { width: i32, height: i32 },
    #[error("cannot move obstacle {id}")]
    InvalidMove {
        id: ObstacleId,
        #[source]
        source: GeometryError,
    },
}

/// The editable routing scene: a canvas, its obstacles and the two query points.
///
/// This is the state owned by the interactive layers (TUI, MCP). The routing core only ever sees
/// immutable snapshots of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    width: i32,
    height: i32,
    obstacles: Vec<Obstacle>,
    start: Point,
    end: Point,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCENE_WIDTH,
            height: DEFAULT_SCENE_HEIGHT,
            obstacles: Vec::new(),
            start: Point::default(),
            end: Point::default(),
        }
    }
}

impl Scene {
    pub fn new(width: i32, height: i32) -> Result<Self, SceneError> {
        if width <= 0 || height <= 0 {
            return Err(SceneError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            ..Self::default()
        })
    }

    pub fn with_endpoints(mut self, start: Point, end: Point) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Obstacle>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id.index())
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Points that seed the routing breakpoints, start first.
    pub fn query_points(&self) -> [Point; 2] {
        [self.start, self.end]
    }

    pub fn set_start(&mut self, start: Point) {
        self.start = start;
    }

    pub fn set_end(&mut self, end: Point) {
        self.end = end;
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> ObstacleId {
        self.obstacles.push(obstacle);
        ObstacleId::new(self.obstacles.len() - 1)
    }

    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Result<Obstacle, SceneError> {
        self.check_id(id)?;
        Ok(self.obstacles.remove(id.index()))
    }

    /// Moves an obstacle so that its top-left corner is at `top_left`.
    pub fn move_obstacle(&mut self, id: ObstacleId, top_left: Point) -> Result<(), SceneError> {
        self.check_id(id)?;
        let obstacle = &mut self.obstacles[id.index()];
        *obstacle = obstacle
            .moved_to(top_left)
            .map_err(|source| SceneError::InvalidMove { id, source })?;
        Ok(())
    }

    pub fn translate_obstacle(&mut self, id: ObstacleId, dx: i32, dy: i32) -> Result<(), SceneError> {
        self.check_id(id)?;
        let obstacle = &mut self.obstacles[id.index()];
        *obstacle = obstacle
            .translated(dx, dy)
            .map_err(|source| SceneError::InvalidMove { id, source })?;
        Ok(())
    }

    pub fn replace_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }

    /// Returns the topmost obstacle under `point` (boundary inclusive).
    ///
    /// Later obstacles are drawn on top of earlier ones, so the last match wins.
    pub fn obstacle_at(&self, point: Point) -> Option<ObstacleId> {
        self.obstacles
            .iter()
            .rposition(|obstacle| obstacle.contains(point))
            .map(ObstacleId::new)
    }

    /// Re-checks invariants for scenes assembled field by field (e.g. after deserialisation).
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SceneError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    fn check_id(&self, id: ObstacleId) -> Result<(), SceneError> {
        if id.index() >= self.obstacles.len() {
            return Err(SceneError::UnknownObstacle {
                id,
                len: self.obstacles.len(),
            });
        }
        Ok(())
    }
}

/// Validates raw rectangles at the boundary, reporting the first malformed one by index.
pub fn obstacles_from_bounds(
    bounds: impl IntoIterator<Item = (i32, i32, i32, i32)>,
) -> Result<Vec<Obstacle>, SceneError> {
    bounds
        .into_iter()
        .enumerate()
        .map(|(index, (left, top, right, bottom))| {
            Obstacle::new(left, top, right, bottom)
                .map_err(|source| SceneError::InvalidObstacle { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{obstacles_from_bounds, ObstacleId, Scene, SceneError};
    use crate::model::geometry::{GeometryError, Obstacle, Point};

    fn scene() -> Scene {
        Scene::new(400, 300)
            .expect("scene")
            .with_endpoints(Point::new(10, 10), Point::new(390, 290))
            .with_obstacles([
                Obstacle::new(50, 50, 150, 150).expect("obstacle"),
                Obstacle::new(100, 100, 200, 200).expect("obstacle"),
            ])
    }

    #[test]
    fn rejects_non_positive_size() {
        assert_eq!(
            Scene::new(0, 10),
            Err(SceneError::InvalidSize {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn obstacle_at_prefers_topmost() {
        let scene = scene();
        assert_eq!(scene.obstacle_at(Point::new(60, 60)), Some(ObstacleId::new(0)));
        assert_eq!(scene.obstacle_at(Point::new(120, 120)), Some(ObstacleId::new(1)));
        assert_eq!(scene.obstacle_at(Point::new(300, 20)), None);
    }

    #[test]
    fn move_and_remove_obstacles() {
        let mut scene = scene();
        scene
            .move_obstacle(ObstacleId::new(0), Point::new(0, 0))
            .expect("move");
        assert_eq!(scene.obstacles()[0], Obstacle::new(0, 0, 100, 100).expect("obstacle"));

        scene
            .translate_obstacle(ObstacleId::new(1), -10, 5)
            .expect("translate");
        assert_eq!(scene.obstacles()[1], Obstacle::new(90, 105, 190, 205).expect("obstacle"));

        let removed = scene.remove_obstacle(ObstacleId::new(0)).expect("remove");
        assert_eq!(removed.top_left(), Point::new(0, 0));
        assert_eq!(scene.obstacles().len(), 1);

        assert_eq!(
            scene.remove_obstacle(ObstacleId::new(3)),
            Err(SceneError::UnknownObstacle {
                id: ObstacleId::new(3),
                len: 1
            })
        );
    }

    #[test]
    fn out_of_range_moves_leave_the_scene_untouched() {
        let mut scene = scene();
        let before = scene.clone();

        let err = scene
            .move_obstacle(ObstacleId::new(0), Point::new(i32::MAX, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidMove {
                id,
                source: GeometryError::OutOfRange { .. }
            } if id == ObstacleId::new(0)
        ));
        assert!(scene
            .translate_obstacle(ObstacleId::new(1), 0, i32::MAX)
            .is_err());
        assert_eq!(scene, before);
    }

    #[test]
    fn obstacles_from_bounds_reports_index() {
        let err = obstacles_from_bounds([(0, 0, 10, 10), (5, 5, 5, 9)]).unwrap_err();
        assert_eq!(
            err,
            SceneError::InvalidObstacle {
                index: 1,
                source: GeometryError::DegenerateWidth { left: 5, right: 5 }
            }
        );
    }
}
