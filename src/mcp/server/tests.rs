// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::*;
use crate::model::fixtures::demo_scene;
use crate::store::SceneFile;

fn temp_scene_path(test_name: &str) -> std::path::PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};

    let mut dir = std::env::temp_dir();
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock is monotonic")
        .as_nanos();
    dir.push(format!("blockroute-{test_name}-{pid}-{nanos}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir.join("scene.json")
}

fn p(x: i32, y: i32) -> McpPoint {
    McpPoint { x, y }
}

fn blocked_scene() -> Scene {
    Scene::new(400, 300)
        .expect("scene")
        .with_endpoints(Point::new(50, 150), Point::new(250, 150))
        .with_obstacles([Obstacle::new(100, 100, 200, 200).expect("obstacle")])
}

#[tokio::test]
async fn scene_read_reports_scene_and_revision() {
    let server = BlockrouteMcp::new(demo_scene());
    let Json(read) = server.scene_read().await.expect("scene.read");

    assert_eq!(read.rev, 0);
    assert_eq!(read.scene.width, 640);
    assert_eq!(read.scene.obstacles.len(), 5);
    assert_eq!(read.scene.obstacles[2].obstacle_id, 2);
    assert_eq!(read.selected_obstacle_id, None);
    assert_eq!(read.bend_penalty, crate::routing::DEFAULT_BEND_PENALTY);
}

#[tokio::test]
async fn set_endpoints_requires_at_least_one_point() {
    let server = BlockrouteMcp::new(demo_scene());
    let err = server
        .scene_set_endpoints(Parameters(SceneSetEndpointsParams {
            start: None,
            end: None,
        }))
        .await
        .err()
        .expect("tool should fail");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

    let Json(result) = server
        .scene_set_endpoints(Parameters(SceneSetEndpointsParams {
            start: None,
            end: Some(p(620, 20)),
        }))
        .await
        .expect("scene.set_endpoints");
    assert_eq!(result.rev, 1);

    let Json(read) = server.scene_read().await.expect("scene.read");
    assert_eq!(read.scene.end, p(620, 20));
    assert_eq!(read.scene.start, p(40, 240));
}

#[tokio::test]
async fn obstacle_lifecycle_bumps_revision() {
    let server = BlockrouteMcp::new(Scene::default());

    let Json(added) = server
        .obstacle_add(Parameters(ObstacleAddParams {
            left: 10,
            top: 20,
            right: 60,
            bottom: 80,
        }))
        .await
        .expect("obstacle.add");
    assert_eq!(added.rev, 1);
    assert_eq!(added.obstacle.obstacle_id, 0);

    let Json(moved) = server
        .obstacle_move(Parameters(ObstacleMoveParams {
            obstacle_id: 0,
            left: 100,
            top: 100,
        }))
        .await
        .expect("obstacle.move");
    assert_eq!(moved.rev, 2);
    assert_eq!(
        (moved.obstacle.right, moved.obstacle.bottom),
        (150, 160)
    );

    let Json(removed) = server
        .obstacle_remove(Parameters(ObstacleRemoveParams { obstacle_id: 0 }))
        .await
        .expect("obstacle.remove");
    assert_eq!(removed.rev, 3);
    assert_eq!(removed.removed.left, 100);
}

#[tokio::test]
async fn rejects_degenerate_and_unknown_obstacles() {
    let server = BlockrouteMcp::new(Scene::default());

    let err = server
        .obstacle_add(Parameters(ObstacleAddParams {
            left: 10,
            top: 20,
            right: 10,
            bottom: 80,
        }))
        .await
        .err()
        .expect("tool should fail");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

    let err = server
        .obstacle_remove(Parameters(ObstacleRemoveParams { obstacle_id: 7 }))
        .await
        .err()
        .expect("tool should fail");
    assert_eq!(err.code, rmcp::model::ErrorCode::RESOURCE_NOT_FOUND);

    let Json(read) = server.scene_read().await.expect("scene.read");
    assert_eq!(read.rev, 0);
}

#[tokio::test]
async fn obstacle_move_out_of_coordinate_range_is_rejected() {
    let server = BlockrouteMcp::new(blocked_scene());

    let err = server
        .obstacle_move(Parameters(ObstacleMoveParams {
            obstacle_id: 0,
            left: i32::MAX,
            top: 0,
        }))
        .await
        .err()
        .expect("tool should fail");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    assert_eq!(err.data, Some(serde_json::json!({ "obstacle_id": 0 })));

    let Json(read) = server.scene_read().await.expect("scene.read");
    assert_eq!(read.rev, 0);
    assert_eq!(
        read.scene.obstacles[0],
        McpObstacle {
            obstacle_id: 0,
            left: 100,
            top: 100,
            right: 200,
            bottom: 200,
        }
    );
}

#[tokio::test]
async fn failed_persist_leaves_scene_unchanged() {
    let dir = temp_scene_path("mcp-persist-fail")
        .parent()
        .expect("parent")
        .to_path_buf();
    let blocker = dir.join("not-a-dir");
    std::fs::write(&blocker, b"file").expect("write blocker");
    let server =
        BlockrouteMcp::new(demo_scene()).with_scene_file(SceneFile::new(blocker.join("scene.json")));

    let err = server
        .obstacle_remove(Parameters(ObstacleRemoveParams { obstacle_id: 0 }))
        .await
        .err()
        .expect("tool should fail");
    assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);

    let Json(read) = server.scene_read().await.expect("scene.read");
    assert_eq!(read.rev, 0);
    assert_eq!(read.scene.obstacles.len(), 5);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn graph_build_counts_match_lists() {
    let server = BlockrouteMcp::new(blocked_scene());
    let Json(graph) = server
        .graph_build(Parameters(GraphBuildParams {
            include_edges: None,
        }))
        .await
        .expect("graph.build");

    assert_eq!(graph.node_count, graph.nodes.len());
    assert_eq!(graph.edge_count, graph.edges.len());
    assert!(graph.nodes.contains(&p(100, 100)));
    assert!(!graph
        .edges
        .iter()
        .any(|edge| edge.from == p(100, 150) && edge.to == p(200, 150)));

    let Json(counts_only) = server
        .graph_build(Parameters(GraphBuildParams {
            include_edges: Some(false),
        }))
        .await
        .expect("graph.build");
    assert!(counts_only.edges.is_empty());
    assert_eq!(counts_only.edge_count, graph.edge_count);
}

#[tokio::test]
async fn route_find_detours_around_obstacle() {
    let server = BlockrouteMcp::new(blocked_scene());
    let Json(route) = server
        .route_find(Parameters(RouteFindParams { bend_penalty: None }))
        .await
        .expect("route.find");

    assert!(route.found);
    assert_eq!(route.rev, Some(0));
    assert_eq!(route.points.first(), Some(&p(50, 150)));
    assert_eq!(route.points.last(), Some(&p(250, 150)));
    assert_eq!(route.length, 300);
    assert!(route.bends >= 2);
}

#[tokio::test]
async fn route_plan_is_stateless() {
    let server = BlockrouteMcp::new(demo_scene());
    let Json(route) = server
        .route_plan(Parameters(RoutePlanParams {
            obstacles: vec![McpRect {
                left: 10,
                top: 0,
                right: 20,
                bottom: 100,
            }],
            start: p(0, 50),
            end: p(30, 50),
            bend_penalty: None,
        }))
        .await
        .expect("route.plan");
    assert!(route.found);
    assert_eq!(route.rev, None);
    assert_eq!(route.length, 130);

    let Json(read) = server.scene_read().await.expect("scene.read");
    assert_eq!(read.rev, 0);
    assert_eq!(read.scene.obstacles.len(), 5);
}

#[tokio::test]
async fn route_plan_reports_invalid_obstacle_index() {
    let server = BlockrouteMcp::new(Scene::default());
    let err = server
        .route_plan(Parameters(RoutePlanParams {
            obstacles: vec![
                McpRect {
                    left: 0,
                    top: 0,
                    right: 10,
                    bottom: 10,
                },
                McpRect {
                    left: 30,
                    top: 40,
                    right: 20,
                    bottom: 50,
                },
            ],
            start: p(0, 50),
            end: p(30, 50),
            bend_penalty: None,
        }))
        .await
        .err()
        .expect("tool should fail");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    assert_eq!(err.data, Some(serde_json::json!({ "index": 1 })));
}

#[tokio::test]
async fn route_plan_unreachable_end_is_not_an_error() {
    let server = BlockrouteMcp::new(Scene::default());
    let Json(route) = server
        .route_plan(Parameters(RoutePlanParams {
            obstacles: vec![McpRect {
                left: 0,
                top: 0,
                right: 100,
                bottom: 100,
            }],
            start: p(-50, 50),
            end: p(50, 50),
            bend_penalty: Some(0),
        }))
        .await
        .expect("route.plan");
    assert!(!route.found);
    assert!(route.points.is_empty());
    assert_eq!(route.length, 0);
}

#[tokio::test]
async fn render_text_draws_endpoints() {
    let server = BlockrouteMcp::new(demo_scene());
    let Json(render) = server
        .scene_render_text(Parameters(SceneRenderTextParams {
            show_graph: None,
            cell_width: None,
            cell_height: None,
        }))
        .await
        .expect("scene.render_text");
    assert!(render.text.contains('S'));
    assert!(render.text.contains('E'));
    assert!(render.text.contains('█'));

    let err = server
        .scene_render_text(Parameters(SceneRenderTextParams {
            show_graph: None,
            cell_width: Some(0),
            cell_height: None,
        }))
        .await
        .err()
        .expect("tool should fail");
    assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn mutations_persist_to_scene_file() {
    let path = temp_scene_path("mcp-persist");
    let server = BlockrouteMcp::new(demo_scene()).with_scene_file(SceneFile::new(&path));

    server
        .obstacle_remove(Parameters(ObstacleRemoveParams { obstacle_id: 0 }))
        .await
        .expect("obstacle.remove");

    let stored = SceneFile::new(&path).load().expect("load");
    assert_eq!(stored.obstacles().len(), 4);
    let _ = std::fs::remove_dir_all(path.parent().expect("parent"));
}

#[tokio::test]
async fn shared_handle_sees_tool_mutations() {
    let shared = SharedScene::new(demo_scene()).into_handle();
    let server = BlockrouteMcp::new_shared(shared.clone());

    server
        .scene_set_endpoints(Parameters(SceneSetEndpointsParams {
            start: Some(p(0, 0)),
            end: None,
        }))
        .await
        .expect("scene.set_endpoints");

    let shared = shared.lock().await;
    assert_eq!(shared.rev(), 1);
    assert_eq!(shared.scene().start(), Point::new(0, 0));
}

#[tokio::test]
async fn streamable_http_tools_call_mutates_shared_scene() {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use rmcp::transport::{
        streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
        StreamableHttpService,
    };

    let shared = SharedScene::new(Scene::default()).into_handle();
    let server = BlockrouteMcp::new_shared(shared.clone());

    let config = StreamableHttpServerConfig {
        stateful_mode: false,
        sse_keep_alive: None,
        ..StreamableHttpServerConfig::default()
    };

    let session_manager = Arc::new(LocalSessionManager::default());
    let service = {
        let server = server.clone();
        StreamableHttpService::new(move || Ok(server.clone()), session_manager, config)
    };

    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {
            "name": "obstacle.add",
            "arguments": { "left": 10, "top": 10, "right": 30, "bottom": 40 }
        }
    })
    .to_string();

    let response = service
        .handle(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header(axum::http::header::ACCEPT, "application/json, text/event-stream")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("request"),
        )
        .await;

    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let response_body = Body::new(response.into_body());
    let bytes = tokio::time::timeout(
        std::time::Duration::from_secs(3),
        to_bytes(response_body, usize::MAX),
    )
    .await
    .expect("timeout collecting response body")
    .expect("collect response body");
    assert!(!bytes.is_empty());

    let shared = shared.lock().await;
    assert_eq!(shared.rev(), 1);
    assert_eq!(shared.scene().obstacles().len(), 1);
    assert_eq!(shared.scene().obstacles()[0].right(), 30);
}
