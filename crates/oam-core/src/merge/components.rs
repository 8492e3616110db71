use crate::document::{ComponentKind, ServiceDocument, UnifiedDocument};

use super::report::{MergeEvent, MergeReport};

/// Name a component takes when its natural name is owned by another service.
pub fn qualify_component_name(service_name: &str, name: &str) -> String {
    format!("{service_name}_{name}")
}

/// Fold a service's components into the unified document, kind by kind.
///
/// Conflicts are always detected against the natural (unqualified) name:
/// - free name: the definition keeps it;
/// - same name, deeply equal definition: shared, nothing is added;
/// - same name, different definition: added as `{service}_{name}`.
pub fn merge_components(
    service_name: &str,
    service: &ServiceDocument,
    unified: &mut UnifiedDocument,
    report: &mut MergeReport,
) {
    for kind in ComponentKind::ALL {
        let target = unified.components.section_mut(kind);

        for (name, definition) in service.components.section(kind) {
            let identical = target.get(name).map(|existing| existing == definition);

            match identical {
                None => {
                    target.insert(name.clone(), definition.clone());
                    report.record(MergeEvent::ComponentAdded {
                        service: service_name.to_string(),
                        kind,
                        name: name.clone(),
                    });
                }
                Some(true) => report.record(MergeEvent::ComponentIdentical {
                    service: service_name.to_string(),
                    kind,
                    name: name.clone(),
                }),
                Some(false) => {
                    let qualified = qualify_component_name(service_name, name);
                    // Placed entries are never overwritten.
                    if target.contains_key(&qualified) {
                        report.record(MergeEvent::ComponentDropped {
                            service: service_name.to_string(),
                            kind,
                            name: name.clone(),
                            qualified,
                        });
                        continue;
                    }
                    target.insert(qualified.clone(), definition.clone());
                    report.record(MergeEvent::ComponentRenamed {
                        service: service_name.to_string(),
                        kind,
                        name: name.clone(),
                        qualified,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Envelope;
    use crate::document;

    fn service(yaml: &str) -> ServiceDocument {
        document::from_yaml(yaml).unwrap()
    }

    fn merge_all(services: &[(&str, &str)]) -> (UnifiedDocument, MergeReport) {
        let mut unified = UnifiedDocument::new(&Envelope::default());
        let mut report = MergeReport::default();
        for (name, yaml) in services {
            merge_components(name, &service(yaml), &mut unified, &mut report);
        }
        (unified, report)
    }

    #[test]
    fn identical_definitions_are_shared() {
        let error = "components:\n  schemas:\n    Error:\n      type: object\n      properties:\n        code: {type: integer}\n";
        let (unified, report) = merge_all(&[("svcA", error), ("svcB", error)]);

        let names: Vec<&str> = unified.components.schemas.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Error"]);
        assert!(matches!(
            report.events().last(),
            Some(MergeEvent::ComponentIdentical { .. })
        ));
    }

    #[test]
    fn differing_definition_is_qualified_by_later_service() {
        let (unified, report) = merge_all(&[
            ("svcA", "components:\n  schemas:\n    Error: {type: object}\n"),
            ("svcB", "components:\n  schemas:\n    Error: {type: string}\n"),
        ]);

        let schemas = &unified.components.schemas;
        assert_eq!(schemas["Error"]["type"].as_str(), Some("object"));
        assert_eq!(schemas["svcB_Error"]["type"].as_str(), Some("string"));
        assert!(!schemas.contains_key("svcA_Error"));
        assert_eq!(
            report.renamed(),
            vec![(ComponentKind::Schemas, "Error", "svcB_Error")]
        );
    }

    #[test]
    fn nested_difference_is_a_conflict() {
        let (unified, _) = merge_all(&[
            (
                "a",
                "components:\n  schemas:\n    Page:\n      properties:\n        items: {type: array, items: {type: string}}\n",
            ),
            (
                "b",
                "components:\n  schemas:\n    Page:\n      properties:\n        items: {type: array, items: {type: integer}}\n",
            ),
        ]);
        assert!(unified.components.schemas.contains_key("b_Page"));
    }

    #[test]
    fn key_order_does_not_make_a_conflict() {
        let (unified, report) = merge_all(&[
            ("a", "components:\n  parameters:\n    Limit: {name: limit, in: query}\n"),
            ("b", "components:\n  parameters:\n    Limit: {in: query, name: limit}\n"),
        ]);
        assert_eq!(unified.components.parameters.len(), 1);
        assert_eq!(report.warnings(), 0);
    }

    #[test]
    fn merge_key_schema_is_identical_to_its_expanded_form() {
        let (unified, report) = merge_all(&[
            (
                "a",
                "components:\n  schemas:\n    Base: &b {type: object, description: d}\n    Err:\n      <<: *b\n      title: E\n",
            ),
            (
                "b",
                "components:\n  schemas:\n    Err: {type: object, description: d, title: E}\n",
            ),
        ]);
        let names: Vec<&str> = unified.components.schemas.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Base", "Err"]);
        assert!(report.renamed().is_empty());

        let rendered = serde_yaml_ng::to_string(&unified.components).unwrap();
        assert!(!rendered.contains("<<"));
    }

    #[test]
    fn kinds_are_independent_namespaces() {
        let (unified, report) = merge_all(&[
            ("a", "components:\n  schemas:\n    Pet: {type: object}\n"),
            ("b", "components:\n  requestBodies:\n    Pet: {required: true}\n"),
        ]);
        assert!(unified.components.schemas.contains_key("Pet"));
        assert!(unified.components.request_bodies.contains_key("Pet"));
        assert!(report.renamed().is_empty());
    }

    #[test]
    fn taken_qualified_name_is_not_overwritten() {
        let (unified, report) = merge_all(&[
            (
                "a",
                "components:\n  schemas:\n    Item: {type: object}\n    b_Item: {type: boolean}\n",
            ),
            ("b", "components:\n  schemas:\n    Item: {type: string}\n"),
        ]);
        assert_eq!(
            unified.components.schemas["b_Item"]["type"].as_str(),
            Some("boolean")
        );
        assert!(matches!(
            report.events().last(),
            Some(MergeEvent::ComponentDropped { .. })
        ));
    }
}
