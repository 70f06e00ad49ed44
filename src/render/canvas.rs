// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use thiserror::Error;

pub const BOX_HORIZONTAL: char = '─';
pub const BOX_VERTICAL: char = '│';
pub const BOX_TOP_LEFT: char = '┌';
pub const BOX_TOP_RIGHT: char = '┐';
pub const BOX_BOTTOM_LEFT: char = '└';
pub const BOX_BOTTOM_RIGHT: char = '┘';
pub const BOX_TEE_RIGHT: char = '├';
pub const BOX_TEE_LEFT: char = '┤';
pub const BOX_TEE_DOWN: char = '┬';
pub const BOX_TEE_UP: char = '┴';
pub const BOX_CROSS: char = '┼';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("canvas area overflow: {width}*{height}")]
    AreaOverflow { width: usize, height: usize },
    #[error("out of bounds: ({x},{y}) for {width}x{height} canvas")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// Which of the four cell sides a line touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Sides(u8);

impl Sides {
    const NONE: Self = Self(0);
    const LEFT: Self = Self(1 << 0);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);
    const HORIZONTAL: Self = Self(Self::LEFT.0 | Self::RIGHT.0);
    const VERTICAL: Self = Self(Self::UP.0 | Self::DOWN.0);

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn has(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn glyph(self) -> char {
        match self.0 {
            0 => ' ',
            1..=3 => BOX_HORIZONTAL,
            4 | 8 | 12 => BOX_VERTICAL,
            10 => BOX_TOP_LEFT,
            9 => BOX_TOP_RIGHT,
            6 => BOX_BOTTOM_LEFT,
            5 => BOX_BOTTOM_RIGHT,
            14 => BOX_TEE_RIGHT,
            13 => BOX_TEE_LEFT,
            11 => BOX_TEE_DOWN,
            7 => BOX_TEE_UP,
            _ => BOX_CROSS,
        }
    }

    fn of_glyph(ch: char) -> Option<Self> {
        let sides = match ch {
            BOX_HORIZONTAL => Self::HORIZONTAL,
            BOX_VERTICAL => Self::VERTICAL,
            BOX_TOP_LEFT => Self::RIGHT.with(Self::DOWN),
            BOX_TOP_RIGHT => Self::LEFT.with(Self::DOWN),
            BOX_BOTTOM_LEFT => Self::RIGHT.with(Self::UP),
            BOX_BOTTOM_RIGHT => Self::LEFT.with(Self::UP),
            BOX_TEE_RIGHT => Self::VERTICAL.with(Self::RIGHT),
            BOX_TEE_LEFT => Self::VERTICAL.with(Self::LEFT),
            BOX_TEE_DOWN => Self::HORIZONTAL.with(Self::DOWN),
            BOX_TEE_UP => Self::HORIZONTAL.with(Self::UP),
            BOX_CROSS => Self::HORIZONTAL.with(Self::VERTICAL),
            _ => return None,
        };
        Some(sides)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    sides: Sides,
}

/// A fixed-size, bounds-checked character grid.
///
/// Plain characters overwrite whatever is in the cell. Box-drawing characters accumulate, so
/// crossing route segments render as junctions (`┼`, `├`, `┬`, ...) instead of clobbering each
/// other. Line ends that reach into a neighbour without a matching side are dropped at render
/// time, which turns the last cell of a segment into a corner where two segments meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        Self::new_filled(width, height, ' ')
    }

    pub fn new_filled(width: usize, height: usize, fill: char) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![
                Cell {
                    ch: fill,
                    sides: Sides::NONE,
                };
                len
            ],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.glyph_at(x, y, idx))
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        let cell = &mut self.cells[idx];
        match Sides::of_glyph(ch) {
            Some(sides) => cell.sides = cell.sides.with(sides),
            None => {
                cell.ch = ch;
                cell.sides = Sides::NONE;
            }
        }
        Ok(())
    }

    /// Sets `(x, y)` only if it is in bounds; returns whether anything was written.
    pub fn set_clipped(&mut self, x: usize, y: usize, ch: char) -> bool {
        self.set(x, y, ch).is_ok()
    }

    /// Writes `text` left-to-right from `(x, y)`, clipping at the right edge.
    pub fn write_str(&mut self, x: usize, y: usize, text: &str) -> Result<(), CanvasError> {
        self.check_row(x, y)?;
        for (offset, ch) in text.chars().enumerate() {
            let cx = x + offset;
            if cx >= self.width {
                break;
            }
            self.set(cx, y, ch)?;
        }
        Ok(())
    }

    /// Fills the inclusive rectangle `(x0, y0)..=(x1, y1)` with `ch`, clipped to the canvas.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (x0, x1) = (x0.min(x1), x0.max(x1).min(self.width - 1));
        let (y0, y1) = (y0.min(y1), y0.max(y1).min(self.height - 1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set_clipped(x, y, ch);
            }
        }
    }

    /// Draws a horizontal box-drawing line over `x0..=x1` at row `y`.
    ///
    /// Fails without drawing anything when any part of the line is outside the canvas.
    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) -> Result<(), CanvasError> {
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        self.check_row(min_x, y)?;
        self.index_of(max_x, y)?;
        for x in min_x..=max_x {
            self.set(x, y, BOX_HORIZONTAL)?;
        }
        Ok(())
    }

    /// Draws a vertical box-drawing line over `y0..=y1` at column `x`.
    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) -> Result<(), CanvasError> {
        let (min_y, max_y) = (y0.min(y1), y0.max(y1));
        self.index_of(x, min_y)?;
        self.index_of(x, max_y)?;
        for y in min_y..=max_y {
            self.set(x, y, BOX_VERTICAL)?;
        }
        Ok(())
    }

    fn check_row(&self, x: usize, y: usize) -> Result<(), CanvasError> {
        if y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        Ok(())
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        Ok(y * self.width + x)
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> CanvasError {
        CanvasError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    fn sides_at(&self, x: usize, y: usize) -> Sides {
        self.cells[y * self.width + x].sides
    }

    fn glyph_at(&self, x: usize, y: usize, idx: usize) -> char {
        let cell = self.cells[idx];
        if cell.sides.is_empty() {
            return cell.ch;
        }

        let mut connected = Sides::NONE;
        if cell.sides.has(Sides::LEFT) && x > 0 && self.sides_at(x - 1, y).has(Sides::RIGHT) {
            connected = connected.with(Sides::LEFT);
        }
        if cell.sides.has(Sides::RIGHT)
            && x + 1 < self.width
            && self.sides_at(x + 1, y).has(Sides::LEFT)
        {
            connected = connected.with(Sides::RIGHT);
        }
        if cell.sides.has(Sides::UP) && y > 0 && self.sides_at(x, y - 1).has(Sides::DOWN) {
            connected = connected.with(Sides::UP);
        }
        if cell.sides.has(Sides::DOWN)
            && y + 1 < self.height
            && self.sides_at(x, y + 1).has(Sides::UP)
        {
            connected = connected.with(Sides::DOWN);
        }

        if connected.is_empty() {
            cell.sides.glyph()
        } else {
            connected.glyph()
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        for y in 0..self.height {
            for x in 0..self.width {
                f.write_char(self.glyph_at(x, y, y * self.width + x))?;
            }
            if y + 1 < self.height {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}
