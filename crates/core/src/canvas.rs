//! Canvas graph — placed asset nodes and the connections between them.
//!
//! This is view state expressed as validated data: positions and sizes are
//! plain numbers, and every structural change goes through an operation
//! that keeps the graph consistent (no dangling endpoints, no duplicate
//! edges).

use crate::error::StateError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An asset placed on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasNode {
    /// Unique node ID
    pub id: String,

    /// The asset this node represents
    pub asset_id: String,

    pub x: f32,
    pub y: f32,

    /// Visual diameter; also read as emphasis when rendering prompts
    pub size: f32,
}

/// How two nodes relate narratively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Harmony,
    Tension,
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Harmony => write!(f, "harmony"),
            Self::Tension => write!(f, "tension"),
        }
    }
}

/// A directed connection between two canvas nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConnection {
    pub id: String,
    /// Source node ID
    pub from: String,
    /// Target node ID
    pub to: String,
    pub kind: ConnectionKind,
    /// How strongly the pair pulls together (0–100)
    pub harmony_level: u8,
}

/// The full canvas: nodes plus connections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasGraph {
    pub nodes: Vec<CanvasNode>,
    pub connections: Vec<CanvasConnection>,
}

impl CanvasGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an asset on the canvas, returning the new node's ID.
    pub fn place(&mut self, asset_id: impl Into<String>, x: f32, y: f32, size: f32) -> String {
        let node = CanvasNode {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.into(),
            x,
            y,
            size,
        };
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Move a node to a new position.
    pub fn move_to(&mut self, node_id: &str, x: f32, y: f32) -> Result<(), StateError> {
        let node = self.node_mut(node_id)?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    /// Resize a node. Size is clamped to a sane positive minimum.
    pub fn resize(&mut self, node_id: &str, size: f32) -> Result<(), StateError> {
        let node = self.node_mut(node_id)?;
        node.size = size.max(1.0);
        Ok(())
    }

    /// Connect two nodes. Rejects unknown endpoints and duplicate pairs.
    pub fn connect(
        &mut self,
        from: &str,
        to: &str,
        kind: ConnectionKind,
        harmony_level: u8,
    ) -> Result<String, StateError> {
        self.node(from)?;
        self.node(to)?;
        if self
            .connections
            .iter()
            .any(|c| c.from == from && c.to == to)
        {
            return Err(StateError::DuplicateConnection {
                from: from.into(),
                to: to.into(),
            });
        }
        let connection = CanvasConnection {
            id: Uuid::new_v4().to_string(),
            from: from.into(),
            to: to.into(),
            kind,
            harmony_level: harmony_level.min(100),
        };
        let id = connection.id.clone();
        self.connections.push(connection);
        Ok(id)
    }

    /// Remove a connection by ID.
    pub fn disconnect(&mut self, connection_id: &str) -> Result<(), StateError> {
        let len_before = self.connections.len();
        self.connections.retain(|c| c.id != connection_id);
        if self.connections.len() == len_before {
            return Err(StateError::UnknownConnection(connection_id.into()));
        }
        Ok(())
    }

    /// Remove a node and every connection touching it.
    pub fn remove_node(&mut self, node_id: &str) -> Result<(), StateError> {
        self.node(node_id)?;
        self.nodes.retain(|n| n.id != node_id);
        self.connections
            .retain(|c| c.from != node_id && c.to != node_id);
        Ok(())
    }

    /// Remove every node representing `asset_id` (and their connections).
    pub fn remove_asset_nodes(&mut self, asset_id: &str) {
        let doomed: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| n.asset_id == asset_id)
            .map(|n| n.id.clone())
            .collect();
        for id in doomed {
            let _ = self.remove_node(&id);
        }
    }

    pub fn node(&self, node_id: &str) -> Result<&CanvasNode, StateError> {
        self.nodes
            .iter()
            .find(|n| n.id == node_id)
            .ok_or_else(|| StateError::UnknownNode(node_id.into()))
    }

    fn node_mut(&mut self, node_id: &str) -> Result<&mut CanvasNode, StateError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| StateError::UnknownNode(node_id.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_graph() -> (CanvasGraph, String, String) {
        let mut graph = CanvasGraph::new();
        let a = graph.place("asset-a", 0.0, 0.0, 80.0);
        let b = graph.place("asset-b", 100.0, 50.0, 80.0);
        (graph, a, b)
    }

    #[test]
    fn place_and_move() {
        let (mut graph, a, _) = two_node_graph();
        graph.move_to(&a, 42.0, 7.0).unwrap();
        let node = graph.node(&a).unwrap();
        assert_eq!(node.x, 42.0);
        assert_eq!(node.y, 7.0);
    }

    #[test]
    fn resize_clamps_to_minimum() {
        let (mut graph, a, _) = two_node_graph();
        graph.resize(&a, -5.0).unwrap();
        assert_eq!(graph.node(&a).unwrap().size, 1.0);
    }

    #[test]
    fn connect_validates_endpoints() {
        let (mut graph, a, _) = two_node_graph();
        let err = graph
            .connect(&a, "nope", ConnectionKind::Harmony, 50)
            .unwrap_err();
        assert_eq!(err, StateError::UnknownNode("nope".into()));
    }

    #[test]
    fn duplicate_connection_rejected() {
        let (mut graph, a, b) = two_node_graph();
        graph.connect(&a, &b, ConnectionKind::Harmony, 70).unwrap();
        let err = graph
            .connect(&a, &b, ConnectionKind::Tension, 10)
            .unwrap_err();
        assert!(matches!(err, StateError::DuplicateConnection { .. }));
        // Reverse direction is a different pair
        graph.connect(&b, &a, ConnectionKind::Tension, 10).unwrap();
    }

    #[test]
    fn harmony_level_clamped() {
        let (mut graph, a, b) = two_node_graph();
        let id = graph.connect(&a, &b, ConnectionKind::Harmony, 255).unwrap();
        let conn = graph.connections.iter().find(|c| c.id == id).unwrap();
        assert_eq!(conn.harmony_level, 100);
    }

    #[test]
    fn remove_node_cascades_connections() {
        let (mut graph, a, b) = two_node_graph();
        graph.connect(&a, &b, ConnectionKind::Tension, 30).unwrap();
        graph.remove_node(&a).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.connections.is_empty());
    }

    #[test]
    fn remove_asset_nodes_removes_all_placements() {
        let mut graph = CanvasGraph::new();
        let a1 = graph.place("asset-a", 0.0, 0.0, 80.0);
        graph.place("asset-a", 10.0, 10.0, 80.0);
        let b = graph.place("asset-b", 100.0, 0.0, 80.0);
        graph.connect(&a1, &b, ConnectionKind::Harmony, 50).unwrap();

        graph.remove_asset_nodes("asset-a");
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.connections.is_empty());
    }

    #[test]
    fn disconnect_unknown_errors() {
        let (mut graph, _, _) = two_node_graph();
        assert!(matches!(
            graph.disconnect("missing"),
            Err(StateError::UnknownConnection(_))
        ));
    }
}
