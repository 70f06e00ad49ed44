// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::model::{Obstacle, ObstacleId, Point};

/// Undirected routing graph over plane points.
///
/// Adjacency is kept symmetric by construction and stored in ordered collections, so iteration
/// order (and everything derived from it) is deterministic. Edge weights are not stored: every
/// edge is axis-aligned and weighs its Manhattan length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingGraph {
    adjacency: BTreeMap<Point, BTreeSet<Point>>,
}

impl RoutingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn contains(&self, node: Point) -> bool {
        self.adjacency.contains_key(&node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = Point> + '_ {
        self.adjacency.keys().copied()
    }

    /// Neighbours of `node` in ascending order; empty for unknown nodes.
    pub fn neighbors(&self, node: Point) -> impl Iterator<Item = Point> + '_ {
        self.adjacency.get(&node).into_iter().flatten().copied()
    }

    /// Each undirected edge once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.adjacency.iter().flat_map(|(&a, neighbors)| {
            neighbors
                .iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    pub fn has_edge(&self, a: Point, b: Point) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    pub fn edge_weight(&self, a: Point, b: Point) -> Option<u64> {
        self.has_edge(a, b).then(|| a.manhattan(b))
    }

    pub(crate) fn add_node(&mut self, node: Point) {
        self.adjacency.entry(node).or_default();
    }

    pub(crate) fn add_edge(&mut self, a: Point, b: Point) {
        if a == b {
            return;
        }
        debug_assert!(a.axis_to(b).is_some(), "routing edges must be axis-aligned: {a} -> {b}");
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Enter,
    Leave,
}

/// A distinct coordinate on one axis plus the obstacle edges that lie on it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Breakpoint {
    coord: i32,
    events: SmallVec<[(ObstacleId, Boundary); 2]>,
}

/// Which family of scan lines a pass walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    /// Horizontal scan lines (fixed y), crossing the x breakpoints.
    Rows,
    /// Vertical scan lines (fixed x), crossing the y breakpoints.
    Columns,
}

impl Sweep {
    fn point(self, line: i32, coord: i32) -> Point {
        match self {
            Self::Rows => Point::new(coord, line),
            Self::Columns => Point::new(line, coord),
        }
    }

    /// Only obstacles whose interior the scan line passes through can shadow it.
    fn crosses_interior(self, obstacle: &Obstacle, line: i32) -> bool {
        match self {
            Self::Rows => obstacle.spans_y_strictly(line),
            Self::Columns => obstacle.spans_x_strictly(line),
        }
    }

    /// Coordinates (and enter/leave events) that scan lines of this family cross.
    fn crossing_breakpoints(self, obstacles: &[Obstacle], points: &[Point]) -> Vec<Breakpoint> {
        let mut by_coord = BTreeMap::<i32, SmallVec<[(ObstacleId, Boundary); 2]>>::new();

        for (index, obstacle) in obstacles.iter().enumerate() {
            let id = ObstacleId::new(index);
            let (enter, leave) = match self {
                Self::Rows => (obstacle.left(), obstacle.right()),
                Self::Columns => (obstacle.top(), obstacle.bottom()),
            };
            by_coord.entry(enter).or_default().push((id, Boundary::Enter));
            by_coord.entry(leave).or_default().push((id, Boundary::Leave));
        }

        for point in points {
            let coord = match self {
                Self::Rows => point.x(),
                Self::Columns => point.y(),
            };
            by_coord.entry(coord).or_default();
        }

        by_coord
            .into_iter()
            .map(|(coord, events)| Breakpoint { coord, events })
            .collect()
    }

    /// Walks one scan line and appends every unobstructed segment between consecutive
    /// breakpoints.
    ///
    /// The open set is local to the line. A segment is tested before the events of its far
    /// breakpoint are applied, so an obstacle never blocks the segment ending on its own edge.
    fn scan_line(
        self,
        line: i32,
        crossing: &[Breakpoint],
        obstacles: &[Obstacle],
        segments: &mut Vec<(Point, Point)>,
    ) {
        let mut open = BTreeSet::<ObstacleId>::new();
        let mut prev = None::<Point>;

        for breakpoint in crossing {
            let point = self.point(line, breakpoint.coord);
            if let Some(prev) = prev {
                if open.is_empty() {
                    segments.push((prev, point));
                }
            }

            for &(id, boundary) in &breakpoint.events {
                if !self.crosses_interior(&obstacles[id.index()], line) {
                    continue;
                }
                match boundary {
                    Boundary::Enter => {
                        open.insert(id);
                    }
                    Boundary::Leave => {
                        open.remove(&id);
                    }
                }
            }

            prev = Some(point);
        }
    }
}

fn seeded_graph(obstacles: &[Obstacle], points: &[Point]) -> RoutingGraph {
    let mut graph = RoutingGraph::new();
    for obstacle in obstacles {
        for corner in obstacle.corners() {
            graph.add_node(corner);
        }
    }
    for &point in points {
        graph.add_node(point);
    }
    graph
}

/// Builds the rectilinear routing graph for `obstacles` and the query `points`.
///
/// Breakpoints are the distinct x and y coordinates of obstacle edges and query points. Every
/// row (distinct y) is swept across the x breakpoints and every column (distinct x) across the
/// y breakpoints; consecutive breakpoints are connected unless an obstacle interior lies between
/// them. Obstacle boundaries never block.
///
/// Every obstacle corner and every query point is a node of the result, even when isolated.
#[tracing::instrument(level = "trace", skip_all, fields(obstacles = obstacles.len(), points = points.len()))]
pub fn build_graph(obstacles: &[Obstacle], points: &[Point]) -> RoutingGraph {
    let xs = Sweep::Rows.crossing_breakpoints(obstacles, points);
    let ys = Sweep::Columns.crossing_breakpoints(obstacles, points);

    let mut segments = Vec::<(Point, Point)>::new();
    for row in &ys {
        Sweep::Rows.scan_line(row.coord, &xs, obstacles, &mut segments);
    }
    for column in &xs {
        Sweep::Columns.scan_line(column.coord, &ys, obstacles, &mut segments);
    }

    let mut graph = seeded_graph(obstacles, points);
    for (a, b) in segments {
        graph.add_edge(a, b);
    }

    tracing::debug!(
        x_breakpoints = xs.len(),
        y_breakpoints = ys.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built routing graph"
    );
    graph
}

/// Same graph as [`build_graph`], with rows and columns swept on the rayon pool.
pub fn build_graph_parallel(obstacles: &[Obstacle], points: &[Point]) -> RoutingGraph {
    let xs = Sweep::Rows.crossing_breakpoints(obstacles, points);
    let ys = Sweep::Columns.crossing_breakpoints(obstacles, points);

    let rows = ys.par_iter().map(|row| (Sweep::Rows, row.coord, xs.as_slice()));
    let columns = xs
        .par_iter()
        .map(|column| (Sweep::Columns, column.coord, ys.as_slice()));

    let segments = rows
        .chain(columns)
        .map(|(sweep, line, crossing)| {
            let mut segments = Vec::new();
            sweep.scan_line(line, crossing, obstacles, &mut segments);
            segments
        })
        .collect::<Vec<_>>();

    let mut graph = seeded_graph(obstacles, points);
    for (a, b) in segments.into_iter().flatten() {
        graph.add_edge(a, b);
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built routing graph (parallel)"
    );
    graph
}
