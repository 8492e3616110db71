//! Structural and semantic checks for OpenAPI 3.x documents.
//!
//! The checker walks the generic document tree rather than a typed model, so
//! it reports every problem it finds instead of stopping at the first
//! deserialization error.

use std::collections::HashMap;

use log::info;
use serde_yaml_ng::Value;

use crate::document::{Node, UnifiedDocument};
use crate::error::{ValidationError, Violation};

const OPERATION_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

const PARAMETER_LOCATIONS: [&str; 4] = ["query", "header", "path", "cookie"];

/// Validate a unified document.
pub fn validate(document: &UnifiedDocument) -> Result<(), ValidationError> {
    info!("validating OpenAPI specification");
    let value = serde_yaml_ng::to_value(document).map_err(|e| ValidationError {
        violations: vec![Violation::new("", format!("document is not serializable: {e}"))],
    })?;
    validate_value(&value)?;
    info!("validation successful");
    Ok(())
}

/// Validate any OpenAPI 3.x document held as a generic value.
pub fn validate_value(document: &Node) -> Result<(), ValidationError> {
    let mut checker = Checker::new(document);
    checker.check_document();
    checker.finish()
}

struct Checker<'a> {
    root: &'a Node,
    violations: Vec<Violation>,
    /// operationId -> location of its first use.
    operation_ids: HashMap<String, String>,
}

impl<'a> Checker<'a> {
    fn new(root: &'a Node) -> Self {
        Self {
            root,
            violations: Vec::new(),
            operation_ids: HashMap::new(),
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }

    fn report(&mut self, location: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(location, message));
    }

    fn check_document(&mut self) {
        let root = self.root;
        if !root.is_mapping() {
            self.report("", "document must be a mapping");
            return;
        }

        match root.get("openapi") {
            Some(Value::String(version)) if version.starts_with("3.") => {}
            Some(Value::String(version)) => {
                self.report("/openapi", format!("unsupported OpenAPI version: {version}"))
            }
            Some(_) => self.report("/openapi", "must be a string"),
            None => self.report("/openapi", "missing required field"),
        }

        self.check_info(root.get("info"));

        if let Some(servers) = root.get("servers") {
            self.check_servers(servers);
        }
        if let Some(paths) = root.get("paths") {
            self.check_paths(paths);
        }
        if let Some(components) = root.get("components") {
            self.check_components(components);
        }
        if let Some(tags) = root.get("tags") {
            self.check_tags(tags);
        }

        self.check_refs(root, "");
    }

    fn check_info(&mut self, info: Option<&Node>) {
        let Some(info) = info else {
            self.report("/info", "missing required field");
            return;
        };
        if !info.is_mapping() {
            self.report("/info", "must be a mapping");
            return;
        }
        for field in ["title", "version"] {
            let location = format!("/info/{field}");
            match info.get(field) {
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                Some(Value::String(_)) => self.report(&location, "must not be empty"),
                Some(_) => self.report(&location, "must be a string"),
                None => self.report(&location, "missing required field"),
            }
        }
    }

    fn check_servers(&mut self, servers: &Node) {
        let Some(servers) = servers.as_sequence() else {
            self.report("/servers", "must be a sequence");
            return;
        };
        for (i, server) in servers.iter().enumerate() {
            if !server.get("url").is_some_and(Value::is_string) {
                self.report(&format!("/servers/{i}/url"), "missing required string field");
            }
        }
    }

    fn check_paths(&mut self, paths: &Node) {
        let Some(paths) = paths.as_mapping() else {
            self.report("/paths", "must be a mapping");
            return;
        };
        for (key, item) in paths {
            let path = describe_key(key);
            let location = format!("/paths/{}", escape_pointer(&path));
            if !path.starts_with('/') {
                self.report(&location, "path must start with '/'");
            }
            if !item.is_mapping() {
                self.report(&location, "path item must be a mapping");
                continue;
            }
            self.check_path_item(item, &location);
        }
    }

    fn check_path_item(&mut self, item: &Node, location: &str) {
        if let Some(parameters) = item.get("parameters") {
            self.check_parameter_list(parameters, &format!("{location}/parameters"));
        }
        for method in OPERATION_METHODS {
            let Some(operation) = item.get(method) else {
                continue;
            };
            let op_location = format!("{location}/{method}");
            if operation.is_mapping() {
                self.check_operation(operation, &op_location);
            } else {
                self.report(&op_location, "operation must be a mapping");
            }
        }
    }

    fn check_operation(&mut self, operation: &Node, location: &str) {
        match operation.get("operationId") {
            Some(Value::String(id)) => {
                let id_location = format!("{location}/operationId");
                if let Some(first) = self.operation_ids.get(id) {
                    let message = format!("operationId '{id}' is already used at #{first}");
                    self.report(&id_location, message);
                } else {
                    self.operation_ids.insert(id.clone(), id_location);
                }
            }
            Some(_) => self.report(&format!("{location}/operationId"), "must be a string"),
            None => {}
        }

        if let Some(parameters) = operation.get("parameters") {
            self.check_parameter_list(parameters, &format!("{location}/parameters"));
        }

        if let Some(body) = operation.get("requestBody") {
            self.check_request_body(body, &format!("{location}/requestBody"));
        }

        if let Some(responses) = operation.get("responses") {
            let responses_location = format!("{location}/responses");
            match responses.as_mapping() {
                Some(map) if map.is_empty() => {
                    self.report(&responses_location, "must define at least one response")
                }
                Some(map) => {
                    for (code, response) in map {
                        let loc = format!(
                            "{responses_location}/{}",
                            escape_pointer(&describe_key(code))
                        );
                        self.check_response(response, &loc);
                    }
                }
                None => self.report(&responses_location, "must be a mapping"),
            }
        }
    }

    fn check_parameter_list(&mut self, parameters: &Node, location: &str) {
        let Some(parameters) = parameters.as_sequence() else {
            self.report(location, "must be a sequence");
            return;
        };
        for (i, parameter) in parameters.iter().enumerate() {
            self.check_parameter(parameter, &format!("{location}/{i}"));
        }
    }

    fn check_parameter(&mut self, parameter: &Node, location: &str) {
        if is_ref(parameter) {
            return;
        }
        if !parameter.is_mapping() {
            self.report(location, "parameter must be a mapping");
            return;
        }
        if !parameter.get("name").is_some_and(Value::is_string) {
            self.report(&format!("{location}/name"), "missing required string field");
        }
        match parameter.get("in").and_then(Value::as_str) {
            Some(place) if PARAMETER_LOCATIONS.contains(&place) => {
                if place == "path" && parameter.get("required").and_then(Value::as_bool) != Some(true)
                {
                    self.report(
                        &format!("{location}/required"),
                        "path parameters must be required",
                    );
                }
            }
            Some(place) => self.report(
                &format!("{location}/in"),
                format!("unknown parameter location '{place}'"),
            ),
            None => self.report(&format!("{location}/in"), "missing required string field"),
        }
    }

    fn check_response(&mut self, response: &Node, location: &str) {
        if is_ref(response) {
            return;
        }
        if !response.is_mapping() {
            self.report(location, "response must be a mapping");
            return;
        }
        if !response.get("description").is_some_and(Value::is_string) {
            self.report(
                &format!("{location}/description"),
                "missing required string field",
            );
        }
    }

    fn check_request_body(&mut self, body: &Node, location: &str) {
        if is_ref(body) {
            return;
        }
        if !body.is_mapping() {
            self.report(location, "request body must be a mapping");
            return;
        }
        if !body.get("content").is_some_and(Value::is_mapping) {
            self.report(&format!("{location}/content"), "missing required mapping");
        }
    }

    fn check_components(&mut self, components: &Node) {
        let Some(sections) = components.as_mapping() else {
            self.report("/components", "must be a mapping");
            return;
        };
        for (section_key, entries) in sections {
            let section = describe_key(section_key);
            let section_location = format!("/components/{}", escape_pointer(&section));
            let Some(entries) = entries.as_mapping() else {
                self.report(&section_location, "must be a mapping");
                continue;
            };
            for (name_key, definition) in entries {
                let name = describe_key(name_key);
                let location = format!("{section_location}/{}", escape_pointer(&name));
                if !is_valid_component_name(&name) {
                    self.report(
                        &location,
                        format!("component name '{name}' must match ^[a-zA-Z0-9._-]+$"),
                    );
                }
                match section.as_str() {
                    "parameters" => self.check_parameter(definition, &location),
                    "responses" => self.check_response(definition, &location),
                    "requestBodies" => self.check_request_body(definition, &location),
                    _ if !definition.is_mapping() && !definition.is_bool() => {
                        self.report(&location, "definition must be a mapping")
                    }
                    _ => {}
                }
            }
        }
    }

    fn check_tags(&mut self, tags: &Node) {
        let Some(tags) = tags.as_sequence() else {
            self.report("/tags", "must be a sequence");
            return;
        };
        for (i, tag) in tags.iter().enumerate() {
            if !tag.get("name").is_some_and(Value::is_string) {
                self.report(&format!("/tags/{i}/name"), "missing required string field");
            }
            if let Some(first) = tags[..i].iter().position(|earlier| earlier == tag) {
                self.report(
                    &format!("/tags/{i}"),
                    format!("duplicate of the tag at #/tags/{first}"),
                );
            }
        }
    }

    /// Every local `$ref` anywhere in the tree must resolve.
    fn check_refs(&mut self, node: &Node, location: &str) {
        match node {
            Value::Mapping(map) => {
                for (key, value) in map {
                    let key = describe_key(key);
                    let child = format!("{location}/{}", escape_pointer(&key));
                    if key != "$ref" {
                        self.check_refs(value, &child);
                        continue;
                    }
                    if let Some(target) = value.as_str() {
                        if target.starts_with('#') && resolve_pointer(self.root, target).is_none() {
                            self.report(&child, format!("unresolved reference: {target}"));
                        }
                    }
                }
            }
            Value::Sequence(seq) => {
                for (i, value) in seq.iter().enumerate() {
                    self.check_refs(value, &format!("{location}/{i}"));
                }
            }
            Value::Tagged(tagged) => self.check_refs(&tagged.value, location),
            _ => {}
        }
    }
}

fn is_ref(node: &Node) -> bool {
    node.get("$ref").is_some()
}

fn is_valid_component_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn describe_key(key: &Node) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => format!("{other:?}"),
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Resolve a local reference such as `#/components/schemas/Pet`.
pub fn resolve_pointer<'a>(root: &'a Node, reference: &str) -> Option<&'a Node> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    pointer
        .strip_prefix('/')?
        .split('/')
        .try_fold(root, |node, raw| {
            let segment = raw.replace("~1", "/").replace("~0", "~");
            match node {
                Value::Mapping(map) => map.get(segment.as_str()),
                Value::Sequence(seq) => segment.parse::<usize>().ok().and_then(|i| seq.get(i)),
                _ => None,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node_from_yaml;

    fn violations(yaml: &str) -> Vec<Violation> {
        let doc = node_from_yaml(yaml).unwrap();
        match validate_value(&doc) {
            Ok(()) => Vec::new(),
            Err(e) => e.violations,
        }
    }

    fn locations(yaml: &str) -> Vec<String> {
        violations(yaml).into_iter().map(|v| v.location).collect()
    }

    const MINIMAL: &str = "openapi: 3.1.0\ninfo: {title: T, version: '1'}\n";

    #[test]
    fn minimal_document_is_valid() {
        assert!(violations(MINIMAL).is_empty());
    }

    #[test]
    fn missing_title_is_reported() {
        let locs = locations("openapi: 3.1.0\ninfo: {version: '1'}\n");
        assert_eq!(locs, vec!["/info/title"]);
    }

    #[test]
    fn unsupported_version_is_reported() {
        let locs = locations("openapi: 2.0.0\ninfo: {title: T, version: '1'}\n");
        assert_eq!(locs, vec!["/openapi"]);
    }

    #[test]
    fn all_violations_are_collected() {
        let yaml = r#"
info: {title: ""}
paths:
  items: {}
"#;
        let locs = locations(yaml);
        assert_eq!(
            locs,
            vec!["/openapi", "/info/title", "/info/version", "/paths/items"]
        );
    }

    #[test]
    fn duplicate_operation_id_is_reported() {
        let yaml = format!(
            "{MINIMAL}paths:\n  /a/x:\n    get: {{operationId: list, responses: {{'200': {{description: ok}}}}}}\n  /b/x:\n    get: {{operationId: list, responses: {{'200': {{description: ok}}}}}}\n"
        );
        let v = violations(&yaml);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].location, "/paths/~1b~1x/get/operationId");
        assert!(v[0].message.contains("#/paths/~1a~1x/get/operationId"));
    }

    #[test]
    fn response_requires_description() {
        let yaml = format!("{MINIMAL}paths:\n  /x:\n    get:\n      responses:\n        '200': {{}}\n");
        assert_eq!(
            locations(&yaml),
            vec!["/paths/~1x/get/responses/200/description"]
        );
    }

    #[test]
    fn path_parameter_must_be_required() {
        let yaml = format!(
            "{MINIMAL}paths:\n  /x/{{id}}:\n    parameters:\n      - {{name: id, in: path}}\n      - {{name: q, in: body}}\n"
        );
        assert_eq!(
            locations(&yaml),
            vec![
                "/paths/~1x~1{id}/parameters/0/required",
                "/paths/~1x~1{id}/parameters/1/in"
            ]
        );
    }

    #[test]
    fn unresolved_reference_is_reported() {
        let yaml = format!(
            "{MINIMAL}components:\n  schemas:\n    Pet: {{type: object}}\n    Owner:\n      properties:\n        pet: {{$ref: '#/components/schemas/Pet'}}\n        car: {{$ref: '#/components/schemas/Car'}}\n"
        );
        let v = violations(&yaml);
        assert_eq!(v.len(), 1);
        assert_eq!(
            v[0].location,
            "/components/schemas/Owner/properties/car/$ref"
        );
    }

    #[test]
    fn external_references_are_not_followed() {
        let yaml = format!(
            "{MINIMAL}components:\n  schemas:\n    Pet: {{$ref: 'common.yaml#/Pet'}}\n"
        );
        assert!(violations(&yaml).is_empty());
    }

    #[test]
    fn component_names_are_restricted() {
        let yaml = format!("{MINIMAL}components:\n  schemas:\n    'my service_Pet': {{type: object}}\n");
        assert_eq!(
            locations(&yaml),
            vec!["/components/schemas/my service_Pet"]
        );
    }

    #[test]
    fn non_mapping_component_is_reported() {
        let yaml = format!("{MINIMAL}components:\n  schemas:\n    Pet: 3\n");
        assert_eq!(locations(&yaml), vec!["/components/schemas/Pet"]);
    }

    #[test]
    fn identical_tags_are_reported() {
        let yaml = format!("{MINIMAL}tags:\n  - name: a\n  - {{name: a, description: other}}\n  - name: a\n");
        assert_eq!(locations(&yaml), vec!["/tags/2"]);
    }

    #[test]
    fn pointer_resolution_unescapes_segments() {
        let doc = node_from_yaml("paths:\n  /a~b/c: {get: {}}\n").unwrap();
        assert!(resolve_pointer(&doc, "#/paths/~1a~0b~1c/get").is_some());
        assert!(resolve_pointer(&doc, "#/paths/~1a~0b~1c/post").is_none());
        assert!(resolve_pointer(&doc, "#").is_some());
    }
}
