use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityStatusOption {
    pub id: i64,
    pub option: String,
}

/// Priority and status vocabulary for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityStatusOptions {
    pub priority_options: Vec<PriorityStatusOption>,
    #[serde(default)]
    pub priority_empty_id: Option<i64>,
    pub status_options: Vec<PriorityStatusOption>,
    #[serde(default)]
    pub status_empty_id: Option<i64>,
    #[serde(default)]
    pub status_completion_id: Option<i64>,
}

impl PriorityStatusOptions {
    pub fn priority_label(&self, id: i64) -> Option<&str> {
        lookup(&self.priority_options, id)
    }

    pub fn status_label(&self, id: i64) -> Option<&str> {
        lookup(&self.status_options, id)
    }

    pub fn is_empty_priority(&self, id: i64) -> bool {
        self.priority_empty_id == Some(id)
    }

    pub fn is_empty_status(&self, id: i64) -> bool {
        self.status_empty_id == Some(id)
    }

    pub fn is_completed(&self, status_id: i64) -> bool {
        self.status_completion_id == Some(status_id)
    }
}

fn lookup(options: &[PriorityStatusOption], id: i64) -> Option<&str> {
    options
        .iter()
        .find(|option| option.id == id)
        .map(|option| option.option.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    Bug,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabularies {
    pub project: PriorityStatusOptions,
    pub bug: PriorityStatusOptions,
}

/// Lookup tables fetched once per session; immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceData {
    vocabularies: Option<Vocabularies>,
}

impl ReferenceData {
    pub fn is_loaded(&self) -> bool {
        self.vocabularies.is_some()
    }

    pub fn for_kind(&self, kind: EntityKind) -> Option<&PriorityStatusOptions> {
        self.vocabularies.as_ref().map(|v| match kind {
            EntityKind::Project => &v.project,
            EntityKind::Bug => &v.bug,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceAction {
    Load(Vocabularies),
}

pub(crate) fn reduce(state: &Arc<ReferenceData>, action: &ReferenceAction) -> Arc<ReferenceData> {
    match action {
        ReferenceAction::Load(_) if state.is_loaded() => {
            debug!("reference data already loaded for this session");
            Arc::clone(state)
        }
        ReferenceAction::Load(vocabularies) => Arc::new(ReferenceData {
            vocabularies: Some(vocabularies.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(completion: i64) -> PriorityStatusOptions {
        PriorityStatusOptions {
            priority_options: vec![
                PriorityStatusOption {
                    id: 1,
                    option: "None".into(),
                },
                PriorityStatusOption {
                    id: 2,
                    option: "High".into(),
                },
            ],
            priority_empty_id: Some(1),
            status_options: vec![
                PriorityStatusOption {
                    id: 1,
                    option: "Open".into(),
                },
                PriorityStatusOption {
                    id: completion,
                    option: "Closed".into(),
                },
            ],
            status_empty_id: None,
            status_completion_id: Some(completion),
        }
    }

    #[test]
    fn lookups_resolve_labels_and_sentinels() {
        let project = options(4);
        assert_eq!(project.priority_label(2), Some("High"));
        assert_eq!(project.status_label(9), None);
        assert!(project.is_empty_priority(1));
        assert!(!project.is_empty_status(1));
        assert!(project.is_completed(4));
    }

    #[test]
    fn first_load_wins() {
        let empty = Arc::new(ReferenceData::default());
        let first = Vocabularies {
            project: options(4),
            bug: options(5),
        };
        let loaded = reduce(&empty, &ReferenceAction::Load(first.clone()));
        assert_eq!(loaded.for_kind(EntityKind::Bug), Some(&first.bug));

        let second = Vocabularies {
            project: options(6),
            bug: options(7),
        };
        let again = reduce(&loaded, &ReferenceAction::Load(second));
        assert!(Arc::ptr_eq(&loaded, &again));
    }
}
