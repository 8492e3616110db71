use crate::document::{ServiceDocument, UnifiedDocument};

use super::report::{MergeEvent, MergeReport};

/// Re-anchor a path template under its service's namespace segment.
pub fn qualify_path(service_name: &str, path: &str) -> String {
    format!("/{service_name}{path}")
}

/// Fold a service's `paths` into the unified document.
///
/// Every path lands under `/{service}`. A template already present verbatim,
/// or whose qualified form is already present, is skipped; path items are
/// never merged with each other.
pub fn merge_paths(
    service_name: &str,
    service: &ServiceDocument,
    unified: &mut UnifiedDocument,
    report: &mut MergeReport,
) {
    for (path, item) in &service.paths {
        if unified.paths.contains_key(path) {
            report.record(MergeEvent::DuplicatePath {
                service: service_name.to_string(),
                path: path.clone(),
                qualified: false,
            });
            continue;
        }

        let qualified = qualify_path(service_name, path);
        if unified.paths.contains_key(&qualified) {
            report.record(MergeEvent::DuplicatePath {
                service: service_name.to_string(),
                path: qualified,
                qualified: true,
            });
            continue;
        }

        unified.paths.insert(qualified.clone(), item.clone());
        report.record(MergeEvent::PathAdded {
            service: service_name.to_string(),
            path: qualified,
        });
    }
}
