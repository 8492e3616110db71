use indexmap::IndexMap;
use serde::Deserialize;

use super::Node;
use super::components::Components;
use super::tag::Tag;

/// One input specification, scoped to one backend service.
///
/// Only the merged sections are kept; the envelope of the source document
/// (`openapi`, `info`, `servers`, ...) never reaches the unified output.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ServiceDocument {
    #[serde(default)]
    pub paths: IndexMap<String, Node>,

    #[serde(default)]
    pub components: Components,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Service documents keyed by service name. Iteration order is merge order.
pub type ServiceSet = IndexMap<String, ServiceDocument>;
