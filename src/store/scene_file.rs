// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::fixtures::demo_scene;
use crate::model::{obstacles_from_bounds, Point, Scene, SceneError};

pub const SCENE_FILE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid scene json at {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported scene file version {version} at {path:?} (expected {SCENE_FILE_VERSION})")]
    UnsupportedVersion { path: PathBuf, version: u32 },
    #[error("invalid scene at {path:?}")]
    InvalidScene {
        path: PathBuf,
        #[source]
        source: SceneError,
    },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, without fsync.
    #[default]
    BestEffort,

    /// Additionally syncs the file contents and the parent directory. Exact guarantees are
    /// platform/filesystem-dependent.
    Durable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointJson {
    pub x: i32,
    pub y: i32,
}

impl From<Point> for PointJson {
    fn from(point: Point) -> Self {
        Self {
            x: point.x(),
            y: point.y(),
        }
    }
}

impl From<PointJson> for Point {
    fn from(point: PointJson) -> Self {
        Point::new(point.x, point.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleJson {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// On-disk shape of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub version: u32,
    pub width: i32,
    pub height: i32,
    pub start: PointJson,
    pub end: PointJson,
    #[serde(default)]
    pub obstacles: Vec<ObstacleJson>,
}

impl SceneDocument {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            version: SCENE_FILE_VERSION,
            width: scene.width(),
            height: scene.height(),
            start: scene.start().into(),
            end: scene.end().into(),
            obstacles: scene
                .obstacles()
                .iter()
                .map(|obstacle| ObstacleJson {
                    left: obstacle.left(),
                    top: obstacle.top(),
                    right: obstacle.right(),
                    bottom: obstacle.bottom(),
                })
                .collect(),
        }
    }

    pub fn into_scene(self) -> Result<Scene, SceneError> {
        let obstacles = obstacles_from_bounds(
            self.obstacles
                .iter()
                .map(|o| (o.left, o.top, o.right, o.bottom)),
        )?;
        Ok(Scene::new(self.width, self.height)?
            .with_endpoints(self.start.into(), self.end.into())
            .with_obstacles(obstacles))
    }
}

/// A scene stored as one JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl SceneFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn load(&self) -> Result<Scene, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let scene = self.parse(&text)?;
        tracing::info!(
            path = %self.path.display(),
            obstacles = scene.obstacles().len(),
            "scene loaded"
        );
        Ok(scene)
    }

    /// Loads the scene, or returns the demo scene when the file does not exist yet.
    ///
    /// Nothing is written; the file appears on the first [`SceneFile::save`].
    pub fn load_or_init(&self) -> Result<Scene, StoreError> {
        match self.load() {
            Ok(scene) => Ok(scene),
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "scene file missing; using demo scene");
                Ok(demo_scene())
            }
            Err(err) => Err(err),
        }
    }

    pub fn save(&self, scene: &Scene) -> Result<(), StoreError> {
        let document = SceneDocument::from_scene(scene);
        let mut json =
            serde_json::to_string_pretty(&document).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        json.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        write_atomic(&self.path, json.as_bytes(), self.durability)?;
        tracing::info!(
            path = %self.path.display(),
            obstacles = scene.obstacles().len(),
            "scene saved"
        );
        Ok(())
    }

    fn parse(&self, text: &str) -> Result<Scene, StoreError> {
        let document: SceneDocument =
            serde_json::from_str(text).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        if document.version != SCENE_FILE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: self.path.clone(),
                version: document.version,
            });
        }
        document
            .into_scene()
            .map_err(|source| StoreError::InvalidScene {
                path: self.path.clone(),
                source,
            })
    }
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".blockroute.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    let written = file.write_all(contents).and_then(|()| {
        if durability == WriteDurability::Durable {
            file.sync_all()
        } else {
            Ok(())
        }
    });
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            other => other,
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}
