// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::model::{Axis, Point};

use super::graph::RoutingGraph;

/// Default cost added for every change of direction.
///
/// Several orders of magnitude above any route length on a realistic canvas, so the search
/// effectively minimises bends first and length second.
pub const DEFAULT_BEND_PENALTY: u64 = 1_000_000_000_000;

/// Tunables for the path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteConfig {
    pub bend_penalty: u64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            bend_penalty: DEFAULT_BEND_PENALTY,
        }
    }
}

impl RouteConfig {
    pub fn with_bend_penalty(bend_penalty: u64) -> Self {
        Self { bend_penalty }
    }

    /// Plain shortest path: turning is free.
    pub fn without_bend_penalty() -> Self {
        Self::with_bend_penalty(0)
    }
}

/// An ordered sequence of graph nodes from start to end. Empty means "no route".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    points: Vec<Point>,
}

impl Route {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Total Manhattan length.
    pub fn length(&self) -> u64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].manhattan(pair[1]))
            .sum()
    }

    /// Number of direction changes along the route.
    pub fn bends(&self) -> usize {
        let axes = self
            .points
            .windows(2)
            .map(|pair| pair[0].axis_to(pair[1]))
            .collect::<Vec<_>>();
        axes.windows(2).filter(|pair| pair[0] != pair[1]).count()
    }

    /// The route with collinear intermediate nodes dropped: endpoints plus bend points.
    pub fn polyline(&self) -> Vec<Point> {
        let mut out = Vec::<Point>::with_capacity(self.points.len());
        for &point in &self.points {
            if out.len() >= 2 {
                let a = out[out.len() - 2];
                let b = out[out.len() - 1];
                if a.axis_to(b).is_some() && a.axis_to(b) == b.axis_to(point) {
                    out.pop();
                }
            }
            out.push(point);
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
struct Visit {
    cost: u64,
    came_from: Option<Point>,
    arrival: Option<Axis>,
}

/// Finds a bend-penalised shortest route from `start` to `end` over `graph`.
///
/// A* with the Manhattan distance to `end` as heuristic. Every move costs its length, plus
/// `config.bend_penalty` when it leaves along a different axis than the move that reached the
/// current node; the first move out of `start` never pays the penalty.
///
/// The frontier is a min-heap on `f = g + h`; equal `f` values pop in ascending coordinate order,
/// so results are reproducible.
///
/// Returns an empty route when either endpoint is not a node of `graph` or `end` is
/// unreachable, and `[start]` when `start == end`.
#[tracing::instrument(level = "trace", skip(graph, config), fields(nodes = graph.node_count()))]
pub fn find_path(graph: &RoutingGraph, start: Point, end: Point, config: &RouteConfig) -> Route {
    if !graph.contains(start) || !graph.contains(end) {
        tracing::debug!(%start, %end, "route endpoint is not a graph node");
        return Route::default();
    }
    if start == end {
        return Route::new(vec![start]);
    }

    let mut visits = BTreeMap::<Point, Visit>::new();
    let mut heap = BinaryHeap::<Reverse<(u64, Point, u64)>>::new();
    let mut expansions = 0usize;

    visits.insert(
        start,
        Visit {
            cost: 0,
            came_from: None,
            arrival: None,
        },
    );
    heap.push(Reverse((start.manhattan(end), start, 0)));

    while let Some(Reverse((_, current, cost))) = heap.pop() {
        let Some(visit) = visits.get(&current).copied() else {
            continue;
        };
        if cost != visit.cost {
            // Superseded by a cheaper entry pushed later.
            continue;
        }
        expansions += 1;

        if current == end {
            tracing::debug!(expansions, cost, "route found");
            return Route::new(reconstruct(&visits, start, end));
        }

        for next in graph.neighbors(current) {
            let axis = current.axis_to(next);
            let turn = match visit.arrival {
                Some(arrival) if axis != Some(arrival) => config.bend_penalty,
                _ => 0,
            };
            let next_cost = cost
                .saturating_add(current.manhattan(next))
                .saturating_add(turn);

            let improves = visits
                .get(&next)
                .map_or(true, |known| next_cost < known.cost);
            if !improves {
                continue;
            }

            visits.insert(
                next,
                Visit {
                    cost: next_cost,
                    came_from: Some(current),
                    arrival: axis,
                },
            );
            heap.push(Reverse((
                next_cost.saturating_add(next.manhattan(end)),
                next,
                next_cost,
            )));
        }
    }

    tracing::debug!(expansions, %start, %end, "no route");
    Route::default()
}

fn reconstruct(visits: &BTreeMap<Point, Visit>, start: Point, end: Point) -> Vec<Point> {
    let mut points = vec![end];
    let mut cursor = end;
    while cursor != start {
        let Some(prev) = visits.get(&cursor).and_then(|visit| visit.came_from) else {
            debug_assert!(false, "broken predecessor chain at {cursor}");
            return Vec::new();
        };
        // Predecessor chains are acyclic because costs strictly increase along them.
        debug_assert!(points.len() <= visits.len(), "predecessor cycle at {cursor}");
        points.push(prev);
        cursor = prev;
    }
    points.reverse();
    points
}
