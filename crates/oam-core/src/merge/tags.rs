use crate::document::{ServiceDocument, UnifiedDocument};

use super::report::{MergeEvent, MergeReport};

/// Append a service's tags, skipping any tag object already present by value.
///
/// Identity is the whole tag: two tags sharing a name but differing in any
/// other field are both kept.
pub fn merge_tags(
    service_name: &str,
    service: &ServiceDocument,
    unified: &mut UnifiedDocument,
    report: &mut MergeReport,
) {
    for tag in &service.tags {
        if unified.tags.contains(tag) {
            report.record(MergeEvent::TagSkipped {
                service: service_name.to_string(),
                name: tag.name.clone(),
            });
            continue;
        }
        unified.tags.push(tag.clone());
        report.record(MergeEvent::TagAdded {
            service: service_name.to_string(),
            name: tag.name.clone(),
        });
    }
}
