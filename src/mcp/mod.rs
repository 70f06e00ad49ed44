// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Exposes the shared scene and the routing core as tools: scene edits, graph inspection,
//! route queries (against the scene or stateless) and text rendering.

mod server;
mod types;

pub use server::BlockrouteMcp;
