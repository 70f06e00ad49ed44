// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use blockroute::model::fixtures::{demo_scene, random_scene};
use blockroute::model::{Obstacle, Point, Scene};
use blockroute::routing::{
    build_graph, build_graph_parallel, find_path, plan_route, RouteConfig, RoutingGraph,
};
use rstest::rstest;

fn obstacle(left: i32, top: i32, right: i32, bottom: i32) -> Obstacle {
    Obstacle::new(left, top, right, bottom).expect("obstacle")
}

/// Random obstacles with endpoints placed beyond the reach of any generated block, so a route
/// always exists around the outside.
fn open_random_scene(seed: u64, count: usize) -> Scene {
    let scene = random_scene(640, 480, count, seed);
    scene.with_endpoints(Point::new(-10, -10), Point::new(640 + 110, 480 + 110))
}

fn graph_of(scene: &Scene) -> RoutingGraph {
    build_graph(scene.obstacles(), &scene.query_points())
}

fn assert_route_clear(obstacles: &[Obstacle], points: &[Point]) {
    for pair in points.windows(2) {
        assert!(
            pair[0].axis_to(pair[1]).is_some(),
            "segment {} -> {} is not axis-aligned",
            pair[0],
            pair[1]
        );
        for ob in obstacles {
            assert!(
                !ob.blocks_segment(pair[0], pair[1]),
                "segment {} -> {} crosses {ob}",
                pair[0],
                pair[1]
            );
        }
    }
    for point in points {
        for ob in obstacles {
            assert!(!ob.contains_strictly(*point), "{point} lies inside {ob}");
        }
    }
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
#[case(2026)]
fn adjacency_is_symmetric(#[case] seed: u64) {
    let scene = open_random_scene(seed, 12);
    let graph = graph_of(&scene);

    for node in graph.nodes() {
        for neighbor in graph.neighbors(node) {
            assert!(
                graph.neighbors(neighbor).any(|back| back == node),
                "{node} -> {neighbor} has no reverse edge"
            );
        }
    }
}

#[rstest]
#[case(3)]
#[case(11)]
#[case(99)]
fn edges_never_cross_obstacle_interiors(#[case] seed: u64) {
    let scene = open_random_scene(seed, 15);
    let graph = graph_of(&scene);

    assert!(graph.edge_count() > 0);
    for (a, b) in graph.edges() {
        assert!(a.axis_to(b).is_some(), "edge {a} -> {b} is diagonal");
        assert_eq!(graph.edge_weight(a, b), Some(a.manhattan(b)));
        for ob in scene.obstacles() {
            assert!(!ob.blocks_segment(a, b), "edge {a} -> {b} crosses {ob}");
        }
    }
}

#[rstest]
#[case(5)]
#[case(17)]
#[case(123)]
fn every_corner_and_query_point_is_a_node(#[case] seed: u64) {
    let scene = open_random_scene(seed, 8);
    let graph = graph_of(&scene);

    for ob in scene.obstacles() {
        for corner in ob.corners() {
            assert!(graph.contains(corner), "corner {corner} missing");
        }
    }
    for point in scene.query_points() {
        assert!(graph.contains(point));
    }
}

#[rstest]
#[case(RouteConfig::default())]
#[case(RouteConfig::without_bend_penalty())]
fn routes_are_clear_and_no_shorter_than_manhattan(#[case] config: RouteConfig) {
    for seed in 0..16 {
        let scene = open_random_scene(seed, 10);
        let plan = plan_route(&scene, &config);

        assert!(plan.is_routable(), "seed {seed}: no route");
        let points = plan.route.points();
        assert_eq!(points.first(), Some(&scene.start()));
        assert_eq!(points.last(), Some(&scene.end()));
        assert!(plan.route.length() >= scene.start().manhattan(scene.end()));
        for pair in points.windows(2) {
            assert!(plan.graph.has_edge(pair[0], pair[1]));
        }
        assert_route_clear(scene.obstacles(), points);
    }
}

#[rstest]
#[case::straight(Point::new(0, 50), Point::new(300, 50))]
#[case::single_bend(Point::new(0, 0), Point::new(300, 200))]
#[case::one_elbow_blocked(Point::new(0, 0), Point::new(200, 200))]
fn unobstructed_routes_match_manhattan_distance(#[case] start: Point, #[case] end: Point) {
    // The first block sits on the x-first elbow of the diagonal cases; the y-first elbow stays free.
    let obstacles = [obstacle(50, -50, 150, 30), obstacle(400, 400, 500, 500)];
    let graph = build_graph(&obstacles, &[start, end]);

    for config in [RouteConfig::default(), RouteConfig::without_bend_penalty()] {
        let route = find_path(&graph, start, end, &config);
        assert!(!route.is_empty());
        assert_eq!(route.length(), start.manhattan(end));
        assert_route_clear(&obstacles, route.points());
    }
}

#[test]
fn blocked_routes_are_strictly_longer_than_manhattan_distance() {
    let block = obstacle(100, 100, 200, 200);
    for (start, end) in [
        (Point::new(50, 150), Point::new(250, 150)),
        (Point::new(150, 50), Point::new(150, 250)),
    ] {
        let graph = build_graph(&[block], &[start, end]);
        let route = find_path(&graph, start, end, &RouteConfig::default());
        assert!(!route.is_empty());
        assert!(route.length() > start.manhattan(end));
    }
}

#[test]
fn extreme_coordinates_route_without_overflow() {
    let wide = obstacle(i32::MIN, -10, i32::MAX, 10);
    assert_eq!(wide.width(), u32::MAX);

    let start = Point::new(0, -100);
    let end = Point::new(0, 100);
    let graph = build_graph(&[wide], &[start, end]);
    let route = find_path(&graph, start, end, &RouteConfig::without_bend_penalty());

    // The block spans the whole axis, so only its far corners connect the two sides.
    assert!(!route.is_empty());
    assert!(route.length() > start.manhattan(end));
    assert_route_clear(&[wide], route.points());
}

#[test]
fn open_plane_route_takes_a_single_bend() {
    let start = Point::new(0, 0);
    let end = Point::new(10, 5);
    let graph = build_graph(&[], &[start, end]);
    let route = find_path(&graph, start, end, &RouteConfig::default());

    assert_eq!(route.len(), 3);
    assert_eq!(route.bends(), 1);
    assert_eq!(route.length(), 15);
    let corner = route.points()[1];
    assert!(corner == Point::new(10, 0) || corner == Point::new(0, 5));
}

#[test]
fn single_blocking_obstacle_is_skirted_via_corners() {
    let block = obstacle(100, 100, 200, 200);
    let start = Point::new(50, 150);
    let end = Point::new(250, 150);
    let graph = build_graph(&[block], &[start, end]);
    let route = find_path(&graph, start, end, &RouteConfig::default());

    assert!(!route.is_empty());
    assert_route_clear(&[block], route.points());
    assert!(route
        .points()
        .iter()
        .any(|point| block.corners().contains(point)));
}

#[test]
fn start_inside_obstacle_is_unreachable() {
    let block = obstacle(0, 0, 100, 100);
    let start = Point::new(50, 50);
    let end = Point::new(300, 50);
    let graph = build_graph(&[block], &[start, end]);

    assert!(graph.contains(start));
    assert_eq!(graph.neighbors(start).count(), 0);
    assert!(find_path(&graph, start, end, &RouteConfig::default()).is_empty());
}

#[test]
fn unknown_endpoint_gives_empty_route() {
    let graph = build_graph(&[], &[Point::new(0, 0), Point::new(10, 0)]);
    let route = find_path(
        &graph,
        Point::new(0, 0),
        Point::new(5, 5),
        &RouteConfig::default(),
    );
    assert!(route.is_empty());
}

#[test]
fn routing_is_deterministic() {
    let scene = demo_scene();
    let first = plan_route(&scene, &RouteConfig::default());
    let second = plan_route(&scene, &RouteConfig::default());
    assert_eq!(first, second);

    for seed in [4_u64, 8, 15, 16, 23, 42] {
        let scene = open_random_scene(seed, 20);
        let sequential = graph_of(&scene);
        let parallel = build_graph_parallel(scene.obstacles(), &scene.query_points());
        assert_eq!(sequential, parallel, "seed {seed}");

        let config = RouteConfig::default();
        let a = find_path(&sequential, scene.start(), scene.end(), &config);
        let b = find_path(&parallel, scene.start(), scene.end(), &config);
        assert_eq!(a, b, "seed {seed}");
    }
}

#[test]
fn overlapping_obstacles_block_their_union() {
    let obstacles = [obstacle(0, 0, 100, 100), obstacle(50, 50, 150, 150)];
    let start = Point::new(-20, 75);
    let end = Point::new(170, 75);
    let graph = build_graph(&obstacles, &[start, end]);
    let route = find_path(&graph, start, end, &RouteConfig::default());

    assert!(!route.is_empty());
    assert_route_clear(&obstacles, route.points());
}
