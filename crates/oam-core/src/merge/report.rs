use std::fmt;

use log::Level;

use crate::document::ComponentKind;

/// A notice emitted while folding a service into the unified document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent {
    PathAdded {
        service: String,
        path: String,
    },
    /// A path was skipped. `qualified` is false when the raw template was
    /// already present, true when the namespaced form was.
    DuplicatePath {
        service: String,
        path: String,
        qualified: bool,
    },
    ComponentAdded {
        service: String,
        kind: ComponentKind,
        name: String,
    },
    ComponentIdentical {
        service: String,
        kind: ComponentKind,
        name: String,
    },
    ComponentRenamed {
        service: String,
        kind: ComponentKind,
        name: String,
        qualified: String,
    },
    /// Both the natural and the qualified name are taken by other definitions.
    ComponentDropped {
        service: String,
        kind: ComponentKind,
        name: String,
        qualified: String,
    },
    TagAdded {
        service: String,
        name: String,
    },
    TagSkipped {
        service: String,
        name: String,
    },
}

impl MergeEvent {
    pub fn level(&self) -> Level {
        match self {
            MergeEvent::DuplicatePath { .. }
            | MergeEvent::ComponentRenamed { .. }
            | MergeEvent::ComponentDropped { .. } => Level::Warn,
            _ => Level::Debug,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.level() == Level::Warn
    }
}

impl fmt::Display for MergeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeEvent::PathAdded { service, path } => {
                write!(f, "[{service}] added path {path}")
            }
            MergeEvent::DuplicatePath {
                service,
                path,
                qualified: false,
            } => write!(
                f,
                "[{service}] duplicate un-prefixed path detected for {path}, skipping"
            ),
            MergeEvent::DuplicatePath {
                service,
                path,
                qualified: true,
            } => write!(f, "[{service}] duplicate path detected for {path}, skipping"),
            MergeEvent::ComponentAdded {
                service,
                kind,
                name,
            } => write!(f, "[{service}] added component {kind}/{name}"),
            MergeEvent::ComponentIdentical {
                service,
                kind,
                name,
            } => write!(
                f,
                "[{service}] identical component already exists: {kind}/{name}, skipping"
            ),
            MergeEvent::ComponentRenamed {
                service,
                kind,
                name,
                qualified,
            } => write!(
                f,
                "[{service}] conflict on {kind}/{name}, added as {kind}/{qualified}"
            ),
            MergeEvent::ComponentDropped {
                service,
                kind,
                name,
                qualified,
            } => write!(
                f,
                "[{service}] conflict on {kind}/{name} and {kind}/{qualified} is already taken, skipping"
            ),
            MergeEvent::TagAdded { service, name } => write!(f, "[{service}] added tag {name}"),
            MergeEvent::TagSkipped { service, name } => {
                write!(f, "[{service}] tag {name} already present, skipping")
            }
        }
    }
}

/// Ordered record of every notice produced during a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    events: Vec<MergeEvent>,
}

impl MergeReport {
    /// Append an event and forward it to the logger.
    pub fn record(&mut self, event: MergeEvent) {
        log::log!(event.level(), "{event}");
        self.events.push(event);
    }

    pub fn events(&self) -> &[MergeEvent] {
        &self.events
    }

    pub fn warnings(&self) -> usize {
        self.events.iter().filter(|e| e.is_warning()).count()
    }

    /// `(kind, natural name, qualified name)` for every conflict resolved by renaming.
    pub fn renamed(&self) -> Vec<(ComponentKind, &str, &str)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MergeEvent::ComponentRenamed {
                    kind,
                    name,
                    qualified,
                    ..
                } => Some((*kind, name.as_str(), qualified.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Paths that were dropped, in the order they were met.
    pub fn skipped_paths(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MergeEvent::DuplicatePath { path, .. } => Some(path.as_str()),
                _ => None,
            })
            .collect()
    }
}
