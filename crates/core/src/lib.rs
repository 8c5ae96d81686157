//! # Storyloom Core
//!
//! Domain types, traits, and error definitions for the Storyloom creative
//! engine. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The single outward-facing seam (text generation) is defined as a trait
//! here. Implementations live in their respective crates. This enables:
//! - Swapping backends via configuration
//! - Easy testing with mock/stub generators
//! - Clean dependency graph (all crates depend inward on core)

pub mod asset;
pub mod canvas;
pub mod chat;
pub mod error;
pub mod generate;
pub mod project;
pub mod timeline;
pub mod tuning;

// Re-export key types at crate root for ergonomics
pub use asset::{Asset, AssetKind};
pub use canvas::{CanvasConnection, CanvasGraph, CanvasNode, ConnectionKind};
pub use chat::{ChatLog, ChatMessage, ChatRole};
pub use error::{Error, GenerateError, Result, StateError};
pub use generate::{FALLBACK_REPLY, GeneratedImage, ModelInfo, TextGenerator};
pub use project::Project;
pub use timeline::{Timeline, TimelineItem, Track, TrackKind};
pub use tuning::{Rigidity, TagWeights};
