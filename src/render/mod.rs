// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text rendering for scenes and routes.
//!
//! Scenes are rasterised onto a character [`Canvas`] through a [`Viewport`]; the same viewport is
//! what the TUI uses to turn mouse cells back into scene coordinates.

use thiserror::Error;

mod canvas;
pub mod scene;
mod text;

pub use canvas::{Canvas, CanvasError};
pub use scene::{render_scene_canvas, render_scene_unicode, Viewport};
pub use text::{canvas_lines, canvas_to_string_trimmed};

pub const DEFAULT_CELL_WIDTH: i32 = 10;
pub const DEFAULT_CELL_HEIGHT: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Scene units per character column.
    pub cell_width: i32,
    /// Scene units per character row. Terminal cells are roughly twice as tall as wide.
    pub cell_height: i32,
    pub show_graph: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            show_graph: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("cell size must be positive (width={cell_width}, height={cell_height})")]
    InvalidCellSize { cell_width: i32, cell_height: i32 },
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
