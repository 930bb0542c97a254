//! The persisted world configuration
//!
//! A `WorldConfig` is a plain owned tree: folders own layers, layers own
//! their modifier stacks. It round-trips through JSON; derived build-layer
//! caches are skipped and rebuilt on the next execution.

use crate::build::BuildLayer;
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tileflow_blueprint::BlueprintLayer;
use tileflow_core::{GridRect, GridTransform};
use uuid::Uuid;

/// A named, ordered group of layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerFolder<T> {
    pub id: Uuid,
    pub name: String,
    pub layers: Vec<T>,
}

impl<T> LayerFolder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            layers: Vec::new(),
        }
    }
}

/// The aggregate root: grid dimensions, placement transform, seed policy,
/// and ordered folders of blueprint and build layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    /// World-space placement of the grid (translation, yaw, cell size).
    pub transform: GridTransform,
    /// When `true`, every blueprint execution re-seeds from
    /// `global_random_seed`; otherwise a fresh entropy seed is drawn per run.
    pub use_global_random_seed: bool,
    pub global_random_seed: u64,
    pub blueprint_folders: Vec<LayerFolder<BlueprintLayer>>,
    pub build_folders: Vec<LayerFolder<BuildLayer>>,
}

impl WorldConfig {
    /// Create an empty configuration. Fails on zero dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, PipelineError> {
        GridRect::new(width, height)?;
        Ok(Self {
            width,
            height,
            transform: GridTransform::default(),
            use_global_random_seed: true,
            global_random_seed: 0,
            blueprint_folders: vec![LayerFolder::new("Blueprint layers")],
            build_folders: vec![LayerFolder::new("Build layers")],
        })
    }

    /// The validated grid bounds.
    ///
    /// Dimensions are checked at construction and deserialization, so this
    /// cannot fail on a config obtained through the public constructors.
    pub fn rect(&self) -> GridRect {
        GridRect::new(self.width, self.height).expect("dimensions validated at construction")
    }

    /// Change the world-space cell size. Forces every build layer to resolve
    /// from scratch on its next execution.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        if self.transform.cell_size != cell_size {
            self.transform.cell_size = cell_size;
            for layer in self.build_layers_mut() {
                layer.request_full_reset();
            }
        }
    }

    // ─── Lookup ─────────────────────────────────────────────────────────────

    /// Blueprint layers in declaration order across folders.
    pub fn blueprint_layers(&self) -> impl Iterator<Item = &BlueprintLayer> {
        self.blueprint_folders.iter().flat_map(|f| f.layers.iter())
    }

    pub fn blueprint_layers_mut(&mut self) -> impl Iterator<Item = &mut BlueprintLayer> {
        self.blueprint_folders
            .iter_mut()
            .flat_map(|f| f.layers.iter_mut())
    }

    /// Build layers in declaration order across folders.
    pub fn build_layers(&self) -> impl Iterator<Item = &BuildLayer> {
        self.build_folders.iter().flat_map(|f| f.layers.iter())
    }

    pub fn build_layers_mut(&mut self) -> impl Iterator<Item = &mut BuildLayer> {
        self.build_folders
            .iter_mut()
            .flat_map(|f| f.layers.iter_mut())
    }

    /// First blueprint layer with this name. Names may repeat; ids are the
    /// stable handle.
    pub fn blueprint_by_name(&self, name: &str) -> Option<&BlueprintLayer> {
        self.blueprint_layers().find(|l| l.name == name)
    }

    pub fn blueprint_by_name_mut(&mut self, name: &str) -> Option<&mut BlueprintLayer> {
        self.blueprint_layers_mut().find(|l| l.name == name)
    }

    pub fn blueprint_by_id(&self, id: Uuid) -> Option<&BlueprintLayer> {
        self.blueprint_layers().find(|l| l.id == id)
    }

    pub fn build_by_name(&self, name: &str) -> Option<&BuildLayer> {
        self.build_layers().find(|l| l.name == name)
    }

    pub fn build_by_name_mut(&mut self, name: &str) -> Option<&mut BuildLayer> {
        self.build_layers_mut().find(|l| l.name == name)
    }

    // ─── Mutation helpers ───────────────────────────────────────────────────

    /// Add a blueprint layer to the first folder (created if none exists).
    pub fn add_blueprint_layer(&mut self, layer: BlueprintLayer) -> Uuid {
        let id = layer.id;
        if self.blueprint_folders.is_empty() {
            self.blueprint_folders
                .push(LayerFolder::new("Blueprint layers"));
        }
        self.blueprint_folders[0].layers.push(layer);
        id
    }

    /// Add a build layer to the first folder (created if none exists).
    pub fn add_build_layer(&mut self, layer: BuildLayer) -> Uuid {
        let id = layer.id;
        if self.build_folders.is_empty() {
            self.build_folders.push(LayerFolder::new("Build layers"));
        }
        self.build_folders[0].layers.push(layer);
        id
    }

    /// Remove a blueprint layer by id, wherever it lives.
    pub fn remove_blueprint_layer(&mut self, id: Uuid) -> Option<BlueprintLayer> {
        for folder in &mut self.blueprint_folders {
            if let Some(pos) = folder.layers.iter().position(|l| l.id == id) {
                return Some(folder.layers.remove(pos));
            }
        }
        None
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let config: Self = serde_json::from_str(json)?;
        // Re-validate: a hand-edited asset may carry broken dimensions.
        GridRect::new(config.width, config.height)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
