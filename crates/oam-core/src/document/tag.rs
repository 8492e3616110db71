use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Node;

/// Tag definition. Two tags are equal only when every field matches.
///
/// Everything except `name` is kept verbatim, so an explicit `null` is a
/// different tag from an absent field and survives into the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,

    /// `description`, `externalDocs`, `x-` extensions and any other keys.
    #[serde(flatten)]
    pub fields: IndexMap<String, Node>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.fields
            .insert("description".to_string(), Node::String(description.into()));
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.fields.get("description").and_then(Node::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_extension_fields() {
        let tag: Tag = serde_yaml_ng::from_str("name: users\nx-display-name: Users\n").unwrap();
        assert_eq!(tag.name, "users");
        assert_eq!(
            tag.fields.get("x-display-name").and_then(|v| v.as_str()),
            Some("Users")
        );
    }

    #[test]
    fn equality_covers_every_field() {
        let a = Tag::new("users").with_description("x");
        let b = Tag::new("users").with_description("y");
        assert_ne!(a, b);
        assert_eq!(a, Tag::new("users").with_description("x"));
        assert_eq!(a.description(), Some("x"));
    }

    #[test]
    fn null_description_differs_from_absent_one() {
        let null: Tag = serde_yaml_ng::from_str("name: users\ndescription: null\n").unwrap();
        let absent: Tag = serde_yaml_ng::from_str("name: users\n").unwrap();
        assert_ne!(null, absent);
        assert_eq!(null.description(), None);

        let rendered = serde_yaml_ng::to_string(&null).unwrap();
        assert_eq!(rendered, "name: users\ndescription: null\n");
    }
}
