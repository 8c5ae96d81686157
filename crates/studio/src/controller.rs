//! The studio controller — owns state and drives the generation pipeline.

use crate::state::{Command, StudioState};
use indexmap::IndexMap;
use std::sync::Arc;
use storyloom_core::chat::ChatMessage;
use storyloom_core::error::{GenerateError, StateError};
use storyloom_core::generate::{GeneratedImage, TextGenerator};
use storyloom_core::project::Project;
use storyloom_prompt::assembler::{self, OutputKind};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// The single owner of application state and the generation backend.
///
/// Overlapping generation requests are serialized: each pipeline run holds
/// `in_flight` for its full assemble → call → record sequence, so a rapid
/// double-trigger queues the second run instead of interleaving it. There
/// is no cancellation; a run completes or exhausts its retries.
pub struct Studio {
    state: RwLock<StudioState>,
    generator: Arc<dyn TextGenerator>,
    in_flight: Mutex<()>,
}

impl Studio {
    pub fn new(project: Project, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            state: RwLock::new(StudioState::new(project)),
            generator,
            in_flight: Mutex::new(()),
        }
    }

    /// A point-in-time copy of the current state.
    pub async fn snapshot(&self) -> StudioState {
        self.state.read().await.clone()
    }

    /// Apply a state command. Rejected commands leave state unchanged.
    pub async fn dispatch(&self, command: Command) -> Result<(), StateError> {
        let mut state = self.state.write().await;
        let next = state.apply(command)?;
        *state = next;
        Ok(())
    }

    /// One conversational turn: assemble, generate, record both sides.
    ///
    /// The chat log is only extended on success; a failed run leaves the
    /// transcript as it was.
    pub async fn chat(&self, user_message: &str) -> Result<String, GenerateError> {
        let _guard = self.in_flight.lock().await;

        let prompt = {
            let state = self.state.read().await;
            assembler::chat_prompt(&state.weights, state.rigidity, &state.chat, user_message)
        };
        debug!(prompt_len = prompt.len(), "Dispatching chat turn");

        let reply = self.generator.generate(&prompt).await?;

        let mut state = self.state.write().await;
        state.chat.push(ChatMessage::user(user_message));
        state.chat.push(ChatMessage::model(reply.clone()));
        info!(turns = state.chat.len(), "Chat turn recorded");

        Ok(reply)
    }

    /// Generate a draft from the whole project workspace.
    pub async fn draft(&self, output: OutputKind) -> Result<String, GenerateError> {
        let _guard = self.in_flight.lock().await;

        let prompt = {
            let state = self.state.read().await;
            assembler::workspace_prompt(&state.project, &state.weights, state.rigidity, output)
        };
        debug!(%output, prompt_len = prompt.len(), "Dispatching workspace draft");

        self.generator.generate(&prompt).await
    }

    /// Run a guided build from collected answers.
    pub async fn run_build(
        &self,
        build: &str,
        answers: &IndexMap<String, String>,
        session_notes: &IndexMap<String, String>,
    ) -> Result<String, GenerateError> {
        let _guard = self.in_flight.lock().await;

        let prompt = {
            let state = self.state.read().await;
            assembler::build_prompt(build, answers, session_notes, &state.weights, state.rigidity)
        };
        debug!(build, prompt_len = prompt.len(), "Dispatching guided build");

        self.generator.generate(&prompt).await
    }

    /// Synthesize an image for a prompt.
    pub async fn illustrate(&self, prompt: &str) -> Result<GeneratedImage, GenerateError> {
        let _guard = self.in_flight.lock().await;
        self.generator.generate_image(prompt).await
    }
}
