//! Context renderers — serialize domain state into prompt sections.

use storyloom_core::asset::Asset;
use storyloom_core::chat::{ChatLog, ChatRole};
use storyloom_core::project::Project;

/// Render assets one per line: `kind: name - content (tags: ...)`.
pub fn render_assets(assets: &[Asset]) -> String {
    assets
        .iter()
        .map(|asset| {
            format!(
                "{}: {} - {} (tags: {})",
                asset.kind,
                asset.name,
                asset.content,
                asset.tags.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the canvas as one clause per connection.
///
/// Node endpoints are reported by asset name where the asset still exists,
/// falling back to the raw asset ID.
pub fn render_canvas(project: &Project) -> String {
    let clauses: Vec<String> = project
        .canvas
        .connections
        .iter()
        .map(|conn| {
            format!(
                "{} connection from {} to {} (harmony: {}%)",
                conn.kind,
                endpoint_label(project, &conn.from),
                endpoint_label(project, &conn.to),
                conn.harmony_level
            )
        })
        .collect();
    format!("Canvas connections: {}", clauses.join("; "))
}

fn endpoint_label(project: &Project, node_id: &str) -> String {
    let Ok(node) = project.canvas.node(node_id) else {
        return node_id.to_string();
    };
    match project.asset(&node.asset_id) {
        Ok(asset) => asset.name.clone(),
        Err(_) => node.asset_id.clone(),
    }
}

/// Render the chat log one line per turn: `User: ...` / `Assistant: ...`.
pub fn render_chat(log: &ChatLog) -> String {
    log.messages
        .iter()
        .map(|msg| {
            let speaker = match msg.role {
                ChatRole::User => "User",
                ChatRole::Model => "Assistant",
            };
            format!("{speaker}: {}", msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
