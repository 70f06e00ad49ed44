// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};

use crate::model::{obstacles_from_bounds, Obstacle, ObstacleId, Point, Scene, SceneError};
use crate::render::{render_scene_unicode, RenderOptions};
use crate::routing::{build_graph, find_path, plan_route, Route, RouteConfig};
use crate::store::SceneFile;
use crate::ui::{SharedScene, SharedSceneHandle};

use super::types::*;

#[derive(Clone)]
pub struct BlockrouteMcp {
    shared: SharedSceneHandle,
    scene_file: Option<Arc<SceneFile>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BlockrouteMcp {
    pub fn new(scene: Scene) -> Self {
        Self::new_shared(SharedScene::new(scene).into_handle())
    }

    /// Serves a scene that other components (the TUI) also hold.
    pub fn new_shared(shared: SharedSceneHandle) -> Self {
        Self {
            shared,
            scene_file: None,
            tool_router: Self::tool_router(),
        }
    }

    /// Persists every mutation to `scene_file`.
    pub fn with_scene_file(mut self, scene_file: SceneFile) -> Self {
        self.scene_file = Some(Arc::new(scene_file));
        self
    }

    pub fn shared(&self) -> &SharedSceneHandle {
        &self.shared
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Read the current scene: canvas size, endpoints, obstacles (ids are list positions) and the
    /// revision counter that increments on every change.
    #[tool(name = "scene.read")]
    async fn scene_read(&self) -> Result<Json<SceneReadResponse>, ErrorData> {
        let shared = self.shared.lock().await;
        Ok(Json(SceneReadResponse {
            rev: shared.rev(),
            scene: mcp_scene(shared.scene()),
            selected_obstacle_id: shared.selected().map(ObstacleId::index),
            bend_penalty: shared.route_config().bend_penalty,
        }))
    }

    /// Move the route start and/or end point. Omitted endpoints stay where they are.
    #[tool(name = "scene.set_endpoints")]
    async fn scene_set_endpoints(
        &self,
        params: Parameters<SceneSetEndpointsParams>,
    ) -> Result<Json<SceneMutationResponse>, ErrorData> {
        let SceneSetEndpointsParams { start, end } = params.0;
        if start.is_none() && end.is_none() {
            return Err(ErrorData::invalid_params(
                "expected at least one of start/end",
                None,
            ));
        }

        let mut shared = self.shared.lock().await;
        self.commit(&mut shared, |scene| {
            if let Some(start) = start {
                scene.set_start(start.into());
            }
            if let Some(end) = end {
                scene.set_end(end.into());
            }
            Ok(())
        })?;
        Ok(Json(SceneMutationResponse { rev: shared.rev() }))
    }

    /// Add a rectangular obstacle (`left < right`, `top < bottom`). Overlapping obstacles are
    /// allowed.
    #[tool(name = "obstacle.add")]
    async fn obstacle_add(
        &self,
        params: Parameters<ObstacleAddParams>,
    ) -> Result<Json<ObstacleAddResponse>, ErrorData> {
        let ObstacleAddParams {
            left,
            top,
            right,
            bottom,
        } = params.0;
        let obstacle = Obstacle::new(left, top, right, bottom).map_err(|err| {
            tracing::warn!(error = %err, "obstacle.add rejected");
            ErrorData::invalid_params(
                format!("invalid obstacle: {err}"),
                Some(serde_json::json!({
                    "left": left, "top": top, "right": right, "bottom": bottom
                })),
            )
        })?;

        let mut shared = self.shared.lock().await;
        let id = self.commit(&mut shared, |scene| Ok(scene.add_obstacle(obstacle)))?;
        Ok(Json(ObstacleAddResponse {
            rev: shared.rev(),
            obstacle: McpObstacle::new(id, &obstacle),
        }))
    }

    /// Move an obstacle so its top-left corner is at (`left`, `top`), keeping its size. Moves that
    /// would push an edge outside the i32 range are rejected.
    #[tool(name = "obstacle.move")]
    async fn obstacle_move(
        &self,
        params: Parameters<ObstacleMoveParams>,
    ) -> Result<Json<ObstacleMoveResponse>, ErrorData> {
        let ObstacleMoveParams {
            obstacle_id,
            left,
            top,
        } = params.0;
        let id = ObstacleId::new(obstacle_id);

        let mut shared = self.shared.lock().await;
        self.commit(&mut shared, |scene| {
            scene
                .move_obstacle(id, Point::new(left, top))
                .map_err(scene_error_to_mcp)
        })?;

        let moved = shared
            .scene()
            .obstacle(id)
            .copied()
            .ok_or_else(|| ErrorData::internal_error("moved obstacle vanished", None))?;
        Ok(Json(ObstacleMoveResponse {
            rev: shared.rev(),
            obstacle: McpObstacle::new(id, &moved),
        }))
    }

    /// Remove an obstacle. Ids of later obstacles shift down by one.
    #[tool(name = "obstacle.remove")]
    async fn obstacle_remove(
        &self,
        params: Parameters<ObstacleRemoveParams>,
    ) -> Result<Json<ObstacleRemoveResponse>, ErrorData> {
        let id = ObstacleId::new(params.0.obstacle_id);

        let mut shared = self.shared.lock().await;
        let removed = self.commit(&mut shared, |scene| {
            scene.remove_obstacle(id).map_err(scene_error_to_mcp)
        })?;
        Ok(Json(ObstacleRemoveResponse {
            rev: shared.rev(),
            removed: McpObstacle::new(id, &removed),
        }))
    }

    /// Build the rectilinear routing graph for the current scene: nodes at obstacle corners,
    /// endpoints and unblocked breakpoint intersections; edges between adjacent breakpoints that do
    /// not cross an obstacle interior.
    #[tool(name = "graph.build")]
    async fn graph_build(
        &self,
        params: Parameters<GraphBuildParams>,
    ) -> Result<Json<GraphBuildResponse>, ErrorData> {
        let include_edges = params.0.include_edges.unwrap_or(true);
        let (rev, scene) = self.snapshot().await;
        let graph = build_graph(scene.obstacles(), &scene.query_points());

        let edges = if include_edges {
            graph
                .edges()
                .map(|(from, to)| McpEdge {
                    from: from.into(),
                    to: to.into(),
                    weight: from.manhattan(to),
                })
                .collect()
        } else {
            Vec::new()
        };
        Ok(Json(GraphBuildResponse {
            rev,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            nodes: graph.nodes().map(McpPoint::from).collect(),
            edges,
        }))
    }

    /// Find the bend-penalised shortest route between the scene's start and end.
    /// `found: false` with no points means the end is unreachable.
    #[tool(name = "route.find")]
    async fn route_find(
        &self,
        params: Parameters<RouteFindParams>,
    ) -> Result<Json<RouteResponse>, ErrorData> {
        let (rev, scene, shared_config) = {
            let shared = self.shared.lock().await;
            (shared.rev(), shared.scene().clone(), shared.route_config())
        };
        let config = params
            .0
            .bend_penalty
            .map_or(shared_config, RouteConfig::with_bend_penalty);

        let plan = plan_route(&scene, &config);
        Ok(Json(route_response(Some(rev), &plan.route)))
    }

    /// Stateless routing: build a graph from the given obstacles and endpoints and search it.
    /// Does not touch the shared scene.
    #[tool(name = "route.plan")]
    async fn route_plan(
        &self,
        params: Parameters<RoutePlanParams>,
    ) -> Result<Json<RouteResponse>, ErrorData> {
        let RoutePlanParams {
            obstacles,
            start,
            end,
            bend_penalty,
        } = params.0;
        let obstacles = obstacles_from_bounds(
            obstacles
                .iter()
                .map(|rect| (rect.left, rect.top, rect.right, rect.bottom)),
        )
        .map_err(scene_error_to_mcp)?;

        let (start, end) = (Point::from(start), Point::from(end));
        let config = bend_penalty.map_or_else(RouteConfig::default, RouteConfig::with_bend_penalty);
        let graph = build_graph(&obstacles, &[start, end]);
        let route = find_path(&graph, start, end, &config);
        Ok(Json(route_response(None, &route)))
    }

    /// Render the scene and its current route as Unicode text (`█` obstacles, box-drawing route,
    /// `S`/`E` endpoints, optional `·` graph overlay).
    #[tool(name = "scene.render_text")]
    async fn scene_render_text(
        &self,
        params: Parameters<SceneRenderTextParams>,
    ) -> Result<Json<SceneRenderTextResponse>, ErrorData> {
        let SceneRenderTextParams {
            show_graph,
            cell_width,
            cell_height,
        } = params.0;
        let defaults = RenderOptions::default();
        let options = RenderOptions {
            cell_width: cell_width.unwrap_or(defaults.cell_width),
            cell_height: cell_height.unwrap_or(defaults.cell_height),
            show_graph: show_graph.unwrap_or(false),
        };

        let (rev, scene, config) = {
            let shared = self.shared.lock().await;
            (shared.rev(), shared.scene().clone(), shared.route_config())
        };
        let plan = plan_route(&scene, &config);
        let text = render_scene_unicode(&scene, &plan, options).map_err(|err| {
            ErrorData::invalid_params(format!("render failed: {err}"), None)
        })?;
        Ok(Json(SceneRenderTextResponse { rev, text }))
    }
}

impl BlockrouteMcp {
    async fn snapshot(&self) -> (u64, Scene) {
        let shared = self.shared.lock().await;
        (shared.rev(), shared.scene().clone())
    }

    /// Applies `edit` to a copy of the scene, persists the copy and only then publishes it.
    ///
    /// A failed edit or a failed save leaves the shared scene and its revision unchanged.
    fn commit<T>(
        &self,
        shared: &mut SharedScene,
        edit: impl FnOnce(&mut Scene) -> Result<T, ErrorData>,
    ) -> Result<T, ErrorData> {
        let mut next = shared.scene().clone();
        let out = edit(&mut next)?;
        self.persist(&next)?;
        shared.replace_scene(next);
        Ok(out)
    }

    fn persist(&self, scene: &Scene) -> Result<(), ErrorData> {
        let Some(scene_file) = self.scene_file.as_ref() else {
            return Ok(());
        };
        scene_file.save(scene).map_err(|err| {
            tracing::warn!(error = %err, "persisting scene failed");
            ErrorData::internal_error(format!("failed to persist scene: {err}"), None)
        })
    }
}

fn mcp_scene(scene: &Scene) -> McpScene {
    McpScene {
        width: scene.width(),
        height: scene.height(),
        start: scene.start().into(),
        end: scene.end().into(),
        obstacles: scene
            .obstacles()
            .iter()
            .enumerate()
            .map(|(idx, obstacle)| McpObstacle::new(ObstacleId::new(idx), obstacle))
            .collect(),
    }
}

fn route_response(rev: Option<u64>, route: &Route) -> RouteResponse {
    RouteResponse {
        rev,
        found: !route.is_empty(),
        points: route.points().iter().copied().map(McpPoint::from).collect(),
        polyline: route.polyline().into_iter().map(McpPoint::from).collect(),
        length: route.length(),
        bends: route.bends(),
    }
}

fn scene_error_to_mcp(err: SceneError) -> ErrorData {
    match err {
        SceneError::UnknownObstacle { id, len } => ErrorData::resource_not_found(
            format!("unknown obstacle {id}"),
            Some(serde_json::json!({ "obstacle_id": id.index(), "obstacles": len })),
        ),
        SceneError::InvalidObstacle { index, source } => ErrorData::invalid_params(
            format!("invalid obstacle at index {index}: {source}"),
            Some(serde_json::json!({ "index": index })),
        ),
        SceneError::InvalidMove { id, source } => ErrorData::invalid_params(
            format!("cannot move obstacle {id}: {source}"),
            Some(serde_json::json!({ "obstacle_id": id.index() })),
        ),
        other @ SceneError::InvalidSize { .. } => {
            ErrorData::invalid_params(other.to_string(), None)
        }
    }
}

#[tool_handler]
impl ServerHandler for BlockrouteMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Blockroute rectilinear routing server (tools: scene.read, scene.set_endpoints, obstacle.add, obstacle.move, obstacle.remove, graph.build, route.find, route.plan, scene.render_text)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests;
