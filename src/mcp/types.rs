// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Obstacle, ObstacleId, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct McpPoint {
    pub x: i32,
    pub y: i32,
}

impl From<Point> for McpPoint {
    fn from(point: Point) -> Self {
        Self {
            x: point.x(),
            y: point.y(),
        }
    }
}

impl From<McpPoint> for Point {
    fn from(point: McpPoint) -> Self {
        Point::new(point.x, point.y)
    }
}

/// Raw rectangle bounds as supplied by a client; validated before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct McpRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct McpObstacle {
    pub obstacle_id: usize,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl McpObstacle {
    pub fn new(id: ObstacleId, obstacle: &Obstacle) -> Self {
        Self {
            obstacle_id: id.index(),
            left: obstacle.left(),
            top: obstacle.top(),
            right: obstacle.right(),
            bottom: obstacle.bottom(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct McpScene {
    pub width: i32,
    pub height: i32,
    pub start: McpPoint,
    pub end: McpPoint,
    pub obstacles: Vec<McpObstacle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneReadResponse {
    pub rev: u64,
    pub scene: McpScene,
    /// Obstacle currently selected in the TUI, if any.
    pub selected_obstacle_id: Option<usize>,
    pub bend_penalty: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SceneSetEndpointsParams {
    pub start: Option<McpPoint>,
    pub end: Option<McpPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneMutationResponse {
    pub rev: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ObstacleAddParams {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ObstacleAddResponse {
    pub rev: u64,
    pub obstacle: McpObstacle,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ObstacleMoveParams {
    pub obstacle_id: usize,
    /// New left edge; the obstacle keeps its size.
    pub left: i32,
    /// New top edge; the obstacle keeps its size.
    pub top: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ObstacleMoveResponse {
    pub rev: u64,
    pub obstacle: McpObstacle,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ObstacleRemoveParams {
    pub obstacle_id: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ObstacleRemoveResponse {
    pub rev: u64,
    pub removed: McpObstacle,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GraphBuildParams {
    /// Include the full edge list (default: true). Counts are always returned.
    pub include_edges: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct McpEdge {
    pub from: McpPoint,
    pub to: McpPoint,
    pub weight: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GraphBuildResponse {
    pub rev: u64,
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes: Vec<McpPoint>,
    pub edges: Vec<McpEdge>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RouteFindParams {
    /// Overrides the shared bend penalty for this query only.
    pub bend_penalty: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RoutePlanParams {
    pub obstacles: Vec<McpRect>,
    pub start: McpPoint,
    pub end: McpPoint,
    pub bend_penalty: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RouteResponse {
    /// Scene revision the route was computed from; absent for stateless plans.
    pub rev: Option<u64>,
    pub found: bool,
    pub points: Vec<McpPoint>,
    /// Endpoints plus bend points only.
    pub polyline: Vec<McpPoint>,
    pub length: u64,
    pub bends: usize,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SceneRenderTextParams {
    pub show_graph: Option<bool>,
    pub cell_width: Option<i32>,
    pub cell_height: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SceneRenderTextResponse {
    pub rev: u64,
    pub text: String,
}
