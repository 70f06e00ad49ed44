// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Plane geometry (points, rectangular obstacles) and the editable scene that the interactive
//! layers mutate and the routing core consumes.

pub mod fixtures;
pub mod geometry;
pub mod scene;

pub use geometry::{Axis, GeometryError, Obstacle, Point};
pub use scene::{obstacles_from_bounds, ObstacleId, Scene, SceneError};
