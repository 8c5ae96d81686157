//! Prompt assembly for Storyloom.
//!
//! Everything here is a pure function: identical inputs produce identical
//! prompt strings. Assembly concatenates, in fixed order: preamble →
//! weighted-tag focus clause → rigidity directive → serialized context →
//! trailing cue. Insertion-ordered maps in the domain types keep the
//! output deterministic.

pub mod assembler;
pub mod render;

pub use assembler::{
    MASTER_PREAMBLE, OutputKind, PromptInput, assemble, build_prompt, chat_prompt,
    workspace_prompt,
};
pub use render::{render_assets, render_canvas, render_chat};
