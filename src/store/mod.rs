// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for scenes on disk.
//!
//! A scene is a single versioned JSON file shared by the TUI, the MCP server and the CLI
//! subcommands.

pub mod scene_file;

pub use scene_file::{
    ObstacleJson, PointJson, SceneDocument, SceneFile, StoreError, WriteDurability,
    SCENE_FILE_VERSION,
};
