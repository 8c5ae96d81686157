//! Application state and its pure update function.

use serde::{Deserialize, Serialize};
use storyloom_core::asset::Asset;
use storyloom_core::canvas::ConnectionKind;
use storyloom_core::chat::ChatLog;
use storyloom_core::error::StateError;
use storyloom_core::project::Project;
use storyloom_core::timeline::TrackKind;
use storyloom_core::tuning::{Rigidity, TagWeights};

/// Everything the studio holds between generation calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioState {
    pub project: Project,
    #[serde(default)]
    pub weights: TagWeights,
    #[serde(default)]
    pub rigidity: Rigidity,
    #[serde(default)]
    pub chat: ChatLog,
}

impl StudioState {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            weights: TagWeights::new(),
            rigidity: Rigidity::default(),
            chat: ChatLog::new(),
        }
    }

    /// Apply a command, returning the resulting state.
    ///
    /// Pure: `self` is not touched. A rejected command returns the error
    /// and the caller's state stands unchanged.
    pub fn apply(&self, command: Command) -> Result<StudioState, StateError> {
        let mut next = self.clone();
        match command {
            Command::UpsertAsset(asset) => {
                next.project.upsert_asset(asset);
            }
            Command::RemoveAsset { asset_id } => {
                next.project.remove_asset(&asset_id)?;
            }
            Command::SetAssetContent { asset_id, content } => {
                next.project.asset_mut(&asset_id)?.set_content(content);
            }
            Command::PlaceNode {
                asset_id,
                x,
                y,
                size,
            } => {
                next.project.asset(&asset_id)?;
                next.project.canvas.place(asset_id, x, y, size);
            }
            Command::MoveNode { node_id, x, y } => {
                next.project.canvas.move_to(&node_id, x, y)?;
            }
            Command::ResizeNode { node_id, size } => {
                next.project.canvas.resize(&node_id, size)?;
            }
            Command::Connect {
                from,
                to,
                kind,
                harmony_level,
            } => {
                next.project.canvas.connect(&from, &to, kind, harmony_level)?;
            }
            Command::Disconnect { connection_id } => {
                next.project.canvas.disconnect(&connection_id)?;
            }
            Command::AddTrack { name, kind } => {
                next.project.timeline.add_track(name, kind);
            }
            Command::PlaceItem {
                track_id,
                asset_id,
                start,
                end,
            } => {
                next.project.asset(&asset_id)?;
                next.project
                    .timeline
                    .place_item(&track_id, asset_id, start, end)?;
            }
            Command::RemoveItem { item_id } => {
                next.project.timeline.remove_item(&item_id)?;
            }
            Command::SetTagWeight { tag, weight } => {
                next.weights.set(tag, weight);
            }
            Command::SetRigidity { value } => {
                next.rigidity = Rigidity::new(value);
            }
        }
        Ok(next)
    }
}

/// Every supported state mutation.
#[derive(Debug, Clone)]
pub enum Command {
    UpsertAsset(Asset),
    RemoveAsset {
        asset_id: String,
    },
    SetAssetContent {
        asset_id: String,
        content: String,
    },
    PlaceNode {
        asset_id: String,
        x: f32,
        y: f32,
        size: f32,
    },
    MoveNode {
        node_id: String,
        x: f32,
        y: f32,
    },
    ResizeNode {
        node_id: String,
        size: f32,
    },
    Connect {
        from: String,
        to: String,
        kind: ConnectionKind,
        harmony_level: u8,
    },
    Disconnect {
        connection_id: String,
    },
    AddTrack {
        name: String,
        kind: TrackKind,
    },
    PlaceItem {
        track_id: String,
        asset_id: String,
        start: f64,
        end: f64,
    },
    RemoveItem {
        item_id: String,
    },
    SetTagWeight {
        tag: String,
        weight: f64,
    },
    SetRigidity {
        value: f32,
    },
}
