//! Project — the root aggregate: assets, canvas, and timeline.

use crate::asset::Asset;
use crate::canvas::CanvasGraph;
use crate::error::StateError;
use crate::timeline::Timeline;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A creative project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub canvas: CanvasGraph,
    #[serde(default)]
    pub timeline: Timeline,
    /// Target generation model override (e.g. for a specific video model)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            assets: Vec::new(),
            canvas: CanvasGraph::new(),
            timeline: Timeline::new(),
            target_model: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn asset(&self, asset_id: &str) -> Result<&Asset, StateError> {
        self.assets
            .iter()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| StateError::UnknownAsset(asset_id.into()))
    }

    pub fn asset_mut(&mut self, asset_id: &str) -> Result<&mut Asset, StateError> {
        self.assets
            .iter_mut()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| StateError::UnknownAsset(asset_id.into()))
    }

    /// Insert or replace an asset (matched by ID).
    pub fn upsert_asset(&mut self, asset: Asset) {
        self.updated_at = Utc::now();
        match self.assets.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
    }

    /// Remove an asset and every canvas node that displays it.
    pub fn remove_asset(&mut self, asset_id: &str) -> Result<(), StateError> {
        self.asset(asset_id)?;
        self.assets.retain(|a| a.id != asset_id);
        self.canvas.remove_asset_nodes(asset_id);
        self.updated_at = Utc::now();
        Ok(())
    }
}
