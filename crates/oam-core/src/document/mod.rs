pub mod components;
pub mod service;
pub mod tag;
pub mod unified;

pub use components::{ComponentKind, Components};
pub use service::{ServiceDocument, ServiceSet};
pub use tag::Tag;
pub use unified::{Info, Server, UnifiedDocument};

use crate::error::ParseError;

/// A generic, order-preserving document node.
///
/// Equality is a deep comparison over nested mappings, sequences and scalars;
/// mapping key order does not take part in it.
pub type Node = serde_yaml_ng::Value;

/// Parse a service document from YAML, expanding `<<` merge keys first.
pub fn from_yaml(input: &str) -> Result<ServiceDocument, ParseError> {
    let node = node_from_yaml(input)?;
    Ok(serde_yaml_ng::from_value(node)?)
}

/// Parse a service document from JSON.
pub fn from_json(input: &str) -> Result<ServiceDocument, ParseError> {
    Ok(serde_json::from_str(input)?)
}

/// Parse an arbitrary document from YAML without shape checks.
///
/// Merge keys (`<<: *anchor`) are expanded so that the tree compares equal
/// to the same content written out in full.
pub fn node_from_yaml(input: &str) -> Result<Node, ParseError> {
    let mut node: Node = serde_yaml_ng::from_str(input)?;
    node.apply_merge()?;
    Ok(node)
}

/// Parse an arbitrary document from JSON without shape checks.
pub fn node_from_json(input: &str) -> Result<Node, ParseError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_service() {
        let doc = from_yaml("openapi: 3.1.0\ninfo: {title: t, version: '1'}\n").unwrap();
        assert!(doc.paths.is_empty());
        assert!(doc.components.is_empty());
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn rejects_paths_that_are_not_a_mapping() {
        assert!(from_yaml("paths: [/a, /b]\n").is_err());
    }

    #[test]
    fn rejects_tags_without_name() {
        assert!(from_yaml("tags:\n  - description: nameless\n").is_err());
    }

    #[test]
    fn rejects_component_section_that_is_not_a_mapping() {
        assert!(from_yaml("components:\n  schemas: [Pet]\n").is_err());
    }

    #[test]
    fn ignores_unrecognised_component_kinds() {
        let yaml = r#"
components:
  securitySchemes:
    bearer: {type: http, scheme: bearer}
  schemas:
    Pet: {type: object}
"#;
        let doc = from_yaml(yaml).unwrap();
        assert_eq!(doc.components.schemas.len(), 1);
        assert_eq!(doc.components.len(), 1);
    }

    #[test]
    fn parses_json_service() {
        let json = r#"{"paths": {"/ping": {"get": {"responses": {"200": {"description": "ok"}}}}},
                       "tags": [{"name": "core"}]}"#;
        let doc = from_json(json).unwrap();
        assert!(doc.paths.contains_key("/ping"));
        assert_eq!(doc.tags[0].name, "core");
    }

    #[test]
    fn merge_keys_are_expanded() {
        let yaml = r#"
components:
  schemas:
    Base: &base
      type: object
      description: d
    Err:
      <<: *base
      title: E
"#;
        let doc = from_yaml(yaml).unwrap();
        let expanded = node_from_yaml("{type: object, description: d, title: E}").unwrap();
        assert_eq!(doc.components.schemas["Err"], expanded);
        assert!(doc.components.schemas["Err"].get("<<").is_none());
    }

    #[test]
    fn node_equality_ignores_key_order() {
        let a = node_from_yaml("{type: object, required: [id]}").unwrap();
        let b = node_from_yaml("{required: [id], type: object}").unwrap();
        let c = node_from_yaml("{required: [name], type: object}").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
