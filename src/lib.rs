// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Blockroute: rectilinear routing around rectangular obstacles.
//!
//! The routing core lives in [`routing`]: a sweep-based graph builder that connects obstacle
//! corners and query points with axis-parallel edges, and an A* path finder that minimises bends
//! first and length second. Around it sit an editable [`model::Scene`], a unicode [`render`]er, a
//! JSON scene [`store`], an interactive [`tui`] and an [`mcp`] server sharing the same scene.

pub mod mcp;
pub mod model;
pub mod render;
pub mod routing;
pub mod store;
pub mod tui;
pub mod ui;
