// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Obstacle, Point, Scene};
use crate::routing::RoutePlan;

use super::text::canvas_to_string_trimmed;
use super::{Canvas, RenderError, RenderOptions};

pub const OBSTACLE_GLYPH: char = '█';
pub const GRAPH_GLYPH: char = '·';
pub const START_GLYPH: char = 'S';
pub const END_GLYPH: char = 'E';

/// Maps scene coordinates onto a grid of character cells.
///
/// Cell `(col, row)` covers the half-open scene rectangle starting at its anchor
/// `origin + (col * cell_width, row * cell_height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    origin: Point,
    cell_width: i32,
    cell_height: i32,
    cols: usize,
    rows: usize,
}

impl Viewport {
    pub fn new(
        origin: Point,
        cell_width: i32,
        cell_height: i32,
        cols: usize,
        rows: usize,
    ) -> Result<Self, RenderError> {
        if cell_width <= 0 || cell_height <= 0 {
            return Err(RenderError::InvalidCellSize {
                cell_width,
                cell_height,
            });
        }
        Ok(Self {
            origin,
            cell_width,
            cell_height,
            cols,
            rows,
        })
    }

    /// A viewport anchored at the scene origin, just large enough to show the whole canvas.
    pub fn for_scene(scene: &Scene, cell_width: i32, cell_height: i32) -> Result<Self, RenderError> {
        let probe = Self::new(Point::default(), cell_width, cell_height, 0, 0)?;
        let cols = cells_needed(scene.width(), probe.cell_width);
        let rows = cells_needed(scene.height(), probe.cell_height);
        Ok(Self { cols, rows, ..probe })
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> i32 {
        self.cell_height
    }

    /// The cell containing `point`, if it is visible.
    pub fn cell_of(&self, point: Point) -> Option<(usize, usize)> {
        let col = self.col_floor(point.x());
        let row = self.row_floor(point.y());
        let col = usize::try_from(col).ok().filter(|col| *col < self.cols)?;
        let row = usize::try_from(row).ok().filter(|row| *row < self.rows)?;
        Some((col, row))
    }

    /// Like [`Viewport::cell_of`], but points outside the grid snap to the nearest edge cell.
    pub fn cell_of_clamped(&self, point: Point) -> (usize, usize) {
        (
            clamp_index(self.col_floor(point.x()), self.cols),
            clamp_index(self.row_floor(point.y()), self.rows),
        )
    }

    /// The scene coordinate of the anchor of cell `(col, row)`.
    pub fn scene_point(&self, col: usize, row: usize) -> Point {
        let x = i64::from(self.origin.x()) + col as i64 * i64::from(self.cell_width);
        let y = i64::from(self.origin.y()) + row as i64 * i64::from(self.cell_height);
        Point::new(saturate_i32(x), saturate_i32(y))
    }

    /// Cells whose anchor lies inside `obstacle` (inclusive), as `(col0, row0, col1, row1)`.
    ///
    /// Obstacles smaller than a cell still occupy the cell of their top-left corner.
    fn obstacle_cells(&self, obstacle: &Obstacle) -> Option<(usize, usize, usize, usize)> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        let col0 = ceil_div(
            i64::from(obstacle.left()) - i64::from(self.origin.x()),
            self.cell_width,
        );
        let col1 = self.col_floor(obstacle.right());
        let row0 = ceil_div(
            i64::from(obstacle.top()) - i64::from(self.origin.y()),
            self.cell_height,
        );
        let row1 = self.row_floor(obstacle.bottom());

        let (col0, col1) = if col0 > col1 {
            let col = self.col_floor(obstacle.left());
            (col, col)
        } else {
            (col0, col1)
        };
        let (row0, row1) = if row0 > row1 {
            let row = self.row_floor(obstacle.top());
            (row, row)
        } else {
            (row0, row1)
        };

        if col1 < 0 || row1 < 0 || col0 >= self.cols as i64 || row0 >= self.rows as i64 {
            return None;
        }
        Some((
            clamp_index(col0, self.cols),
            clamp_index(row0, self.rows),
            clamp_index(col1, self.cols),
            clamp_index(row1, self.rows),
        ))
    }

    fn col_floor(&self, x: i32) -> i64 {
        (i64::from(x) - i64::from(self.origin.x())).div_euclid(i64::from(self.cell_width))
    }

    fn row_floor(&self, y: i32) -> i64 {
        (i64::from(y) - i64::from(self.origin.y())).div_euclid(i64::from(self.cell_height))
    }
}

fn cells_needed(extent: i32, cell: i32) -> usize {
    usize::try_from(extent.max(0) / cell + 1).unwrap_or(1)
}

fn ceil_div(value: i64, divisor: i32) -> i64 {
    -(-value).div_euclid(i64::from(divisor))
}

fn clamp_index(value: i64, len: usize) -> usize {
    if len == 0 || value <= 0 {
        return 0;
    }
    usize::try_from(value).map_or(len - 1, |value| value.min(len - 1))
}

fn saturate_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Paints `scene` and `plan` into a canvas sized to `viewport`.
///
/// Layers, bottom to top: graph edges (when `show_graph`), obstacles, the route, the endpoints.
pub fn render_scene_canvas(
    scene: &Scene,
    plan: &RoutePlan,
    viewport: &Viewport,
    show_graph: bool,
) -> Result<Canvas, RenderError> {
    let mut canvas = Canvas::new(viewport.cols(), viewport.rows())?;
    if viewport.cols() == 0 || viewport.rows() == 0 {
        return Ok(canvas);
    }

    if show_graph {
        for (a, b) in plan.graph.edges() {
            let (ax, ay) = viewport.cell_of_clamped(a);
            let (bx, by) = viewport.cell_of_clamped(b);
            for y in ay.min(by)..=ay.max(by) {
                for x in ax.min(bx)..=ax.max(bx) {
                    canvas.set(x, y, GRAPH_GLYPH)?;
                }
            }
        }
    }

    for obstacle in scene.obstacles() {
        if let Some((x0, y0, x1, y1)) = viewport.obstacle_cells(obstacle) {
            canvas.fill_rect(x0, y0, x1, y1, OBSTACLE_GLYPH);
        }
    }

    for pair in plan.route.points().windows(2) {
        let (ax, ay) = viewport.cell_of_clamped(pair[0]);
        let (bx, by) = viewport.cell_of_clamped(pair[1]);
        if ay == by {
            canvas.draw_hline(ax, bx, ay)?;
        } else {
            canvas.draw_vline(ax, ay, by)?;
            if ax != bx {
                canvas.draw_hline(ax, bx, by)?;
            }
        }
    }

    if let Some((x, y)) = viewport.cell_of(scene.start()) {
        canvas.set(x, y, START_GLYPH)?;
    }
    if let Some((x, y)) = viewport.cell_of(scene.end()) {
        canvas.set(x, y, END_GLYPH)?;
    }

    Ok(canvas)
}

/// Renders the whole scene as trimmed Unicode text.
pub fn render_scene_unicode(
    scene: &Scene,
    plan: &RoutePlan,
    options: RenderOptions,
) -> Result<String, RenderError> {
    let viewport = Viewport::for_scene(scene, options.cell_width, options.cell_height)?;
    let canvas = render_scene_canvas(scene, plan, &viewport, options.show_graph)?;
    Ok(canvas_to_string_trimmed(&canvas))
}
