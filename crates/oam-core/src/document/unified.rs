use indexmap::IndexMap;
use serde::Serialize;

use super::Node;
use super::components::Components;
use super::tag::Tag;
use crate::config::Envelope;

/// Info object of the unified document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    pub description: String,
}

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The single merged specification.
///
/// Fields serialize in declaration order: envelope first, then tags, paths
/// and components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedDocument {
    pub openapi: String,
    pub info: Info,
    pub servers: Vec<Server>,
    pub tags: Vec<Tag>,
    pub paths: IndexMap<String, Node>,
    pub components: Components,
}

impl UnifiedDocument {
    /// Empty skeleton carrying the fixed envelope.
    pub fn new(envelope: &Envelope) -> Self {
        Self {
            openapi: envelope.openapi.clone(),
            info: Info {
                title: envelope.title.clone(),
                version: envelope.version.clone(),
                description: envelope.description.clone(),
            },
            servers: vec![Server {
                url: envelope.server_url.clone(),
                description: envelope.server_description.clone(),
            }],
            tags: Vec::new(),
            paths: IndexMap::new(),
            components: Components::default(),
        }
    }
}
