// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rectilinear routing core.
//!
//! Two stages, both pure functions over immutable inputs:
//!
//! - [`build_graph`] sweeps the obstacle boundaries row by row and column by column and connects
//!   every pair of adjacent breakpoints whose segment does not cut through an obstacle interior.
//! - [`find_path`] runs A* over that graph with a bend penalty, so routes prefer few turns.
//!
//! [`plan_route`] chains both stages for a [`Scene`].

pub mod graph;
pub mod path;

pub use graph::{build_graph, build_graph_parallel, RoutingGraph};
pub use path::{find_path, Route, RouteConfig, DEFAULT_BEND_PENALTY};

use crate::model::Scene;

/// The output of one routing pass: the graph it searched and the route it found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePlan {
    pub graph: RoutingGraph,
    pub route: Route,
}

impl RoutePlan {
    pub fn is_routable(&self) -> bool {
        !self.route.is_empty()
    }
}

/// Builds the routing graph for `scene` and searches it from `scene.start()` to `scene.end()`.
pub fn plan_route(scene: &Scene, config: &RouteConfig) -> RoutePlan {
    let graph = build_graph(scene.obstacles(), &scene.query_points());
    let route = find_path(&graph, scene.start(), scene.end(), config);
    RoutePlan { graph, route }
}

#[cfg(test)]
mod tests {
    use super::{plan_route, RouteConfig};
    use crate::model::fixtures::demo_scene;
    use crate::model::{Obstacle, Point, Scene};

    #[test]
    fn demo_scene_is_routable() {
        let scene = demo_scene();
        let plan = plan_route(&scene, &RouteConfig::default());
        assert!(plan.is_routable());
        assert_eq!(plan.route.points().first(), Some(&scene.start()));
        assert_eq!(plan.route.points().last(), Some(&scene.end()));
        for pair in plan.route.points().windows(2) {
            assert!(plan.graph.has_edge(pair[0], pair[1]));
        }
    }

    #[test]
    fn start_inside_obstacle_is_unroutable() {
        let scene = Scene::default()
            .with_endpoints(Point::new(150, 150), Point::new(400, 150))
            .with_obstacles([Obstacle::new(100, 100, 200, 200).expect("obstacle")]);
        let plan = plan_route(&scene, &RouteConfig::default());
        assert!(!plan.is_routable());
        assert!(plan.graph.contains(Point::new(150, 150)));
    }
}
