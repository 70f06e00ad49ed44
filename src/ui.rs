// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene state shared between the interactive TUI and programmatic integrations (MCP).
//!
//! Both sides hold the same `Arc<tokio::sync::Mutex<SharedScene>>`. Every change bumps `rev`, so a
//! holder can tell whether its local copy is stale by comparing revisions.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::model::{ObstacleId, Scene};
use crate::routing::RouteConfig;

pub type SharedSceneHandle = Arc<Mutex<SharedScene>>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SharedScene {
    scene: Scene,
    route_config: RouteConfig,
    selected: Option<ObstacleId>,
    rev: u64,
}

impl SharedScene {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            ..Self::default()
        }
    }

    pub fn into_handle(self) -> SharedSceneHandle {
        Arc::new(Mutex::new(self))
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn route_config(&self) -> RouteConfig {
        self.route_config
    }

    /// Obstacle the human currently has selected in the TUI.
    pub fn selected(&self) -> Option<ObstacleId> {
        self.selected
    }

    /// Applies `edit` to the scene and publishes a new revision.
    pub fn update<R>(&mut self, edit: impl FnOnce(&mut Scene) -> R) -> R {
        let out = edit(&mut self.scene);
        if self
            .selected
            .is_some_and(|id| self.scene.obstacle(id).is_none())
        {
            self.selected = None;
        }
        self.bump();
        out
    }

    /// Like [`SharedScene::update`], but a failed edit leaves the revision untouched.
    ///
    /// `edit` must not modify the scene when it returns `Err`.
    pub fn try_update<T, E>(
        &mut self,
        edit: impl FnOnce(&mut Scene) -> Result<T, E>,
    ) -> Result<T, E> {
        let out = edit(&mut self.scene)?;
        self.update(|_| ());
        Ok(out)
    }

    pub fn replace_scene(&mut self, scene: Scene) {
        self.update(|current| *current = scene);
    }

    pub fn set_route_config(&mut self, route_config: RouteConfig) {
        if self.route_config == route_config {
            return;
        }
        self.route_config = route_config;
        self.bump();
    }

    pub fn set_selected(&mut self, selected: Option<ObstacleId>) {
        let selected = selected.filter(|id| self.scene.obstacle(*id).is_some());
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        self.bump();
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}
