use std::{fmt, hash::Hash};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::core::filter::SortKey;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(AccountId);
entity_id!(ProjectId);
entity_id!(BugId);
entity_id!(CommentId);

/// Anything the server stamps with `last_edited_timestamp` (unix seconds).
pub trait Record {
    fn last_edited_timestamp(&self) -> i64;

    fn last_edited(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.last_edited_timestamp()).ok()
    }

    /// True when the server accepted a mutation between `previous` and `self`.
    fn has_changed_since(&self, previous: &Self) -> bool
    where
        Self: Sized,
    {
        self.last_edited_timestamp() != previous.last_edited_timestamp()
    }
}

/// Records shown by the list/item view containers (projects and bugs).
pub trait ListItem: Record + Clone + PartialEq + fmt::Debug {
    type Id: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display;

    /// Whether the list view of this container is showing on a fresh session.
    const LIST_VIEW_BY_DEFAULT: bool;

    fn id(&self) -> Self::Id;
    fn name(&self) -> &str;
    fn priority_id(&self) -> i64;
    fn status_id(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub join_date: Option<String>,
    pub last_edited_timestamp: i64,
}

/// Display preferences the server keeps per account. Missing fields fall
/// back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    pub dark_mode: bool,
    pub theme_id: Option<i64>,
    pub filter_completed_projects_by_default: bool,
    pub filter_completed_bugs_by_default: bool,
    pub project_sort: SortKey,
    pub project_sort_ascending: bool,
    pub bug_sort: SortKey,
    pub bug_sort_ascending: bool,
    pub last_edited_timestamp: i64,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            theme_id: None,
            filter_completed_projects_by_default: false,
            filter_completed_bugs_by_default: false,
            project_sort: SortKey::Name,
            project_sort_ascending: true,
            bug_sort: SortKey::Name,
            bug_sort_ascending: true,
            last_edited_timestamp: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub theme_id: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub account_id: AccountId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub priority_id: i64,
    pub status_id: i64,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completion_date: Option<String>,
    pub last_edited_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bug {
    pub id: BugId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub priority_id: i64,
    pub status_id: i64,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completion_date: Option<String>,
    pub last_edited_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub bug_id: BugId,
    pub description: String,
    #[serde(default)]
    pub creation_date: Option<String>,
    pub last_edited_timestamp: i64,
}

impl Record for Account {
    fn last_edited_timestamp(&self) -> i64 {
        self.last_edited_timestamp
    }
}

impl Record for AccountSettings {
    fn last_edited_timestamp(&self) -> i64 {
        self.last_edited_timestamp
    }
}

impl Record for Project {
    fn last_edited_timestamp(&self) -> i64 {
        self.last_edited_timestamp
    }
}

impl Record for Bug {
    fn last_edited_timestamp(&self) -> i64 {
        self.last_edited_timestamp
    }
}

impl Record for Comment {
    fn last_edited_timestamp(&self) -> i64 {
        self.last_edited_timestamp
    }
}

impl ListItem for Project {
    type Id = ProjectId;
    const LIST_VIEW_BY_DEFAULT: bool = true;

    fn id(&self) -> ProjectId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority_id(&self) -> i64 {
        self.priority_id
    }

    fn status_id(&self) -> i64 {
        self.status_id
    }
}

impl ListItem for Bug {
    type Id = BugId;
    const LIST_VIEW_BY_DEFAULT: bool = false;

    fn id(&self) -> BugId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority_id(&self) -> i64 {
        self.priority_id
    }

    fn status_id(&self) -> i64 {
        self.status_id
    }
}

/// Record builders shared by the unit tests of the reducers.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub(crate) fn project(id: i64) -> Project {
        Project {
            id: ProjectId(id),
            account_id: AccountId(1),
            name: format!("project {id}"),
            description: String::new(),
            priority_id: 1,
            status_id: 1,
            creation_date: None,
            start_date: None,
            due_date: None,
            completion_date: None,
            last_edited_timestamp: 0,
        }
    }

    pub(crate) fn bug(id: i64, project: i64) -> Bug {
        bug_with_status(id, project, 1)
    }

    pub(crate) fn bug_with_status(id: i64, project: i64, status: i64) -> Bug {
        Bug {
            id: BugId(id),
            project_id: ProjectId(project),
            name: format!("bug {id}"),
            description: String::new(),
            location: String::new(),
            priority_id: 1,
            status_id: status,
            creation_date: None,
            start_date: None,
            due_date: None,
            completion_date: None,
            last_edited_timestamp: 0,
        }
    }
}
