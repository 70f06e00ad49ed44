// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use thiserror::Error;

/// A point in scene coordinates (x grows to the right, y grows downward).
///
/// Ordering is lexicographic on `(x, y)`; the path search relies on it for deterministic
/// tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    pub fn manhattan(self, other: Point) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }

    /// Returns the axis of the straight move `self -> other`, or `None` when the points coincide
    /// or the move is diagonal.
    pub fn axis_to(self, other: Point) -> Option<Axis> {
        match (self.x == other.x, self.y == other.y) {
            (true, true) => None,
            (false, true) => Some(Axis::Horizontal),
            (true, false) => Some(Axis::Vertical),
            (false, false) => None,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("obstacle must have left < right (left={left}, right={right})")]
    DegenerateWidth { left: i32, right: i32 },
    #[error("obstacle must have top < bottom (top={top}, bottom={bottom})")]
    DegenerateHeight { top: i32, bottom: i32 },
    #[error("obstacle moved by ({dx}, {dy}) leaves the i32 coordinate range")]
    OutOfRange { dx: i64, dy: i64 },
}

/// An axis-aligned rectangular obstacle.
///
/// Always well-formed: `left < right` and `top < bottom` are checked on construction, so the
/// graph builder never sees a degenerate rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Obstacle {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Obstacle {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Result<Self, GeometryError> {
        if left >= right {
            return Err(GeometryError::DegenerateWidth { left, right });
        }
        if top >= bottom {
            return Err(GeometryError::DegenerateHeight { top, bottom });
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Builds an obstacle from its top-left corner and size.
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Result<Self, GeometryError> {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn top(&self) -> i32 {
        self.top
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Corners in the order top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.left, self.bottom),
            Point::new(self.right, self.bottom),
        ]
    }

    /// Inclusive containment, boundary counts as inside. Used for picking.
    pub fn contains(&self, point: Point) -> bool {
        (self.left..=self.right).contains(&point.x) && (self.top..=self.bottom).contains(&point.y)
    }

    /// Interior containment, boundary counts as outside.
    pub fn contains_strictly(&self, point: Point) -> bool {
        self.spans_x_strictly(point.x) && self.spans_y_strictly(point.y)
    }

    /// `left < x < right`.
    pub fn spans_x_strictly(&self, x: i32) -> bool {
        self.left < x && x < self.right
    }

    /// `top < y < bottom`.
    pub fn spans_y_strictly(&self, y: i32) -> bool {
        self.top < y && y < self.bottom
    }

    /// Returns `true` when the axis-aligned segment `a -> b` passes through the interior.
    ///
    /// Segments running along the boundary do not count. Diagonal segments are tested against
    /// their bounding box, which is conservative.
    pub fn blocks_segment(&self, a: Point, b: Point) -> bool {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));

        let overlaps_x = if min_x == max_x {
            self.spans_x_strictly(min_x)
        } else {
            min_x < self.right && max_x > self.left
        };
        let overlaps_y = if min_y == max_y {
            self.spans_y_strictly(min_y)
        } else {
            min_y < self.bottom && max_y > self.top
        };

        overlaps_x && overlaps_y
    }

    /// Shifts all four edges by `(dx, dy)`. Fails when any edge would leave the `i32` range.
    pub fn translated(&self, dx: i32, dy: i32) -> Result<Self, GeometryError> {
        self.shifted(i64::from(dx), i64::from(dy))
    }

    /// Moves the obstacle so that its top-left corner lands on `top_left`, keeping its size.
    pub fn moved_to(&self, top_left: Point) -> Result<Self, GeometryError> {
        self.shifted(
            i64::from(top_left.x) - i64::from(self.left),
            i64::from(top_left.y) - i64::from(self.top),
        )
    }

    fn shifted(&self, dx: i64, dy: i64) -> Result<Self, GeometryError> {
        let shift = |edge: i32, by: i64| i32::try_from(i64::from(edge) + by).ok();
        match (
            shift(self.left, dx),
            shift(self.top, dy),
            shift(self.right, dx),
            shift(self.bottom, dy),
        ) {
            (Some(left), Some(top), Some(right), Some(bottom)) => {
                Self::new(left, top, right, bottom)
            }
            _ => Err(GeometryError::OutOfRange { dx, dy }),
        }
    }
}

impl fmt::Display for Obstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]x[{}, {}]",
            self.left, self.right, self.top, self.bottom
        )
    }
}
