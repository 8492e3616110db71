pub mod components;
pub mod paths;
pub mod report;
pub mod tags;

pub use components::{merge_components, qualify_component_name};
pub use paths::{merge_paths, qualify_path};
pub use report::{MergeEvent, MergeReport};
pub use tags::merge_tags;

use log::info;

use crate::config::Envelope;
use crate::document::{ServiceSet, UnifiedDocument};

/// Result of folding a set of services into one document.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub document: UnifiedDocument,
    pub report: MergeReport,
}

/// Folds service documents into a single unified document.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    envelope: Envelope,
}

impl Merger {
    pub fn new(envelope: Envelope) -> Self {
        Self { envelope }
    }

    /// Merge services in iteration order. The first service to claim a path
    /// or component name keeps it, so reordering the input changes the result.
    pub fn merge(&self, services: &ServiceSet) -> MergeOutcome {
        let mut document = UnifiedDocument::new(&self.envelope);
        let mut report = MergeReport::default();

        for (service_name, service) in services {
            info!("merging paths for service: {service_name}");
            merge_paths(service_name, service, &mut document, &mut report);
            info!("merging components for service: {service_name}");
            merge_components(service_name, service, &mut document, &mut report);
            info!("merging tags for service: {service_name}");
            merge_tags(service_name, service, &mut document, &mut report);
        }

        info!(
            "merged {} services: {} paths, {} components, {} tags ({} warnings)",
            services.len(),
            document.paths.len(),
            document.components.len(),
            document.tags.len(),
            report.warnings()
        );
        MergeOutcome { document, report }
    }
}

/// Merge with the default envelope.
pub fn merge(services: &ServiceSet) -> MergeOutcome {
    Merger::default().merge(services)
}
