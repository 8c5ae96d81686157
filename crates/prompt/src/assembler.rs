//! The prompt assembler and its high-level builders.

use indexmap::IndexMap;
use storyloom_core::chat::ChatLog;
use storyloom_core::project::Project;
use storyloom_core::tuning::{Rigidity, TagWeights};

use crate::render::{render_assets, render_canvas, render_chat};

/// The fixed system preamble prepended to every assembled prompt.
pub const MASTER_PREAMBLE: &str = "You are Storyloom, an AI collaborator for film production and creative storytelling. Generate coherent, high-quality content from interconnected project assets and their relationships. Weigh the harmony and tension between elements to shape compelling narratives, visuals, and technical specifications, and always respect the user's artistic vision.";

/// What kind of output a workspace generation should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Story,
    Image,
    Video,
    Storyboard,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Story => write!(f, "story"),
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Storyboard => write!(f, "storyboard"),
        }
    }
}

/// All inputs for one prompt assembly.
pub struct PromptInput<'a> {
    /// System preamble (possibly extended with a task sentence)
    pub preamble: &'a str,
    /// Tag importance multipliers; only weights above 1 are mentioned
    pub weights: &'a TagWeights,
    /// Strict-versus-creative dial
    pub rigidity: Rigidity,
    /// Serialized project/graph/chat state
    pub context: &'a str,
    /// Trailing cue for the model to continue from
    pub cue: Option<&'a str>,
}

/// Assemble one prompt string.
///
/// Pure and deterministic: clauses are concatenated in fixed order with
/// single spaces, and the cue (when present) follows after a blank line.
pub fn assemble(input: &PromptInput<'_>) -> String {
    let mut clauses: Vec<String> = vec![input.preamble.to_string()];

    if let Some(focus) = focus_clause(input.weights) {
        clauses.push(focus);
    }

    clauses.push(rigidity_clause(input.rigidity).to_string());

    if !input.context.is_empty() {
        clauses.push(input.context.to_string());
    }

    let mut prompt = clauses.join(" ");
    if let Some(cue) = input.cue {
        prompt.push_str("\n\n");
        prompt.push_str(cue);
    }
    prompt
}

/// The weighted-tag clause. Only tags weighted above neutral appear;
/// returns `None` when no tag qualifies.
fn focus_clause(weights: &TagWeights) -> Option<String> {
    let mut entries = weights.emphasized().peekable();
    entries.peek()?;
    let list = entries
        .map(|(tag, weight)| format!("{tag} (importance: {}%)", (weight * 100.0).round() as i64))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("Focus on these elements: {list}."))
}

/// The binary rigidity directive.
fn rigidity_clause(rigidity: Rigidity) -> &'static str {
    if rigidity.is_strict() {
        "Be precise and adhere strictly to guidelines."
    } else {
        "Be creative and flexible in your responses."
    }
}

// --- High-level builders ---

/// Assemble a conversational prompt from the chat log and the new message.
pub fn chat_prompt(
    weights: &TagWeights,
    rigidity: Rigidity,
    log: &ChatLog,
    user_message: &str,
) -> String {
    let context = if log.is_empty() {
        format!("User: {user_message}")
    } else {
        format!(
            "Conversation History:\n{}\n\nUser: {user_message}",
            render_chat(log)
        )
    };

    assemble(&PromptInput {
        preamble: MASTER_PREAMBLE,
        weights,
        rigidity,
        context: &context,
        cue: Some("Assistant:"),
    })
}

/// Assemble a generation prompt from the whole project workspace.
pub fn workspace_prompt(
    project: &Project,
    weights: &TagWeights,
    rigidity: Rigidity,
    output: OutputKind,
) -> String {
    let preamble = format!(
        "{MASTER_PREAMBLE} Generate {output} content based on the provided project workspace."
    );
    let context = format!(
        "Project Assets:\n{}\n\nCanvas Structure:\n{}",
        render_assets(&project.assets),
        render_canvas(project)
    );
    let cue = format!("Generate {output} output:");

    assemble(&PromptInput {
        preamble: &preamble,
        weights,
        rigidity,
        context: &context,
        cue: Some(&cue),
    })
}

/// Assemble a guided-build prompt from collected answers.
pub fn build_prompt(
    build: &str,
    answers: &IndexMap<String, String>,
    session_notes: &IndexMap<String, String>,
    weights: &TagWeights,
    rigidity: Rigidity,
) -> String {
    let preamble = format!("{MASTER_PREAMBLE} Process the {build} build with the provided answers.");

    let mut sections = vec![format!("Answers:\n{}", render_pairs(answers))];
    if !session_notes.is_empty() {
        sections.push(format!("Session Notes:\n{}", render_pairs(session_notes)));
    }
    let context = sections.join("\n\n");
    let cue = format!("Generate {build} output:");

    assemble(&PromptInput {
        preamble: &preamble,
        weights,
        rigidity,
        context: &context,
        cue: Some(&cue),
    })
}

fn render_pairs(pairs: &IndexMap<String, String>) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
