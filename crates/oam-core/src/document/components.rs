use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Node;

/// The reusable-definition categories the merger understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Schemas,
    Responses,
    Parameters,
    RequestBodies,
}

impl ComponentKind {
    /// All kinds, in the order they are emitted.
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Schemas,
        ComponentKind::Responses,
        ComponentKind::Parameters,
        ComponentKind::RequestBodies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Schemas => "schemas",
            ComponentKind::Responses => "responses",
            ComponentKind::Parameters => "parameters",
            ComponentKind::RequestBodies => "requestBodies",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Components object restricted to the four merged kinds.
///
/// Other kinds (`securitySchemes`, `examples`, ...) are dropped on
/// deserialization. All four sections are always serialized, even when empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Node>,

    #[serde(default)]
    pub responses: IndexMap<String, Node>,

    #[serde(default)]
    pub parameters: IndexMap<String, Node>,

    #[serde(rename = "requestBodies", default)]
    pub request_bodies: IndexMap<String, Node>,
}

impl Components {
    pub fn section(&self, kind: ComponentKind) -> &IndexMap<String, Node> {
        match kind {
            ComponentKind::Schemas => &self.schemas,
            ComponentKind::Responses => &self.responses,
            ComponentKind::Parameters => &self.parameters,
            ComponentKind::RequestBodies => &self.request_bodies,
        }
    }

    pub fn section_mut(&mut self, kind: ComponentKind) -> &mut IndexMap<String, Node> {
        match kind {
            ComponentKind::Schemas => &mut self.schemas,
            ComponentKind::Responses => &mut self.responses,
            ComponentKind::Parameters => &mut self.parameters,
            ComponentKind::RequestBodies => &mut self.request_bodies,
        }
    }

    /// Total number of definitions across all kinds.
    pub fn len(&self) -> usize {
        ComponentKind::ALL
            .iter()
            .map(|kind| self.section(*kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
