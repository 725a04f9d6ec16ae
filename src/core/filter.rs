//! Search, filter and sort state of the project and bug lists. The list
//! itself is never rewritten; views ask for the visible slice instead.

use std::{cmp::Ordering, collections::BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::model::ListItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    Priority,
    Status,
    LastEdited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilterSort {
    /// Case-insensitive substring of the item name. Blank matches everything.
    pub search_keyword: String,
    /// Priority ids hidden from the list.
    pub priority_filter: BTreeSet<i64>,
    /// Status ids hidden from the list.
    pub status_filter: BTreeSet<i64>,
    pub sort_by: SortKey,
    pub sort_ascending: bool,
}

impl Default for SearchFilterSort {
    fn default() -> Self {
        Self {
            search_keyword: String::new(),
            priority_filter: BTreeSet::new(),
            status_filter: BTreeSet::new(),
            sort_by: SortKey::Name,
            sort_ascending: true,
        }
    }
}

impl SearchFilterSort {
    /// Starting point for a list: the account's preferred order, optionally
    /// hiding the completion status.
    pub fn seeded(sort_by: SortKey, sort_ascending: bool, hidden_status: Option<i64>) -> Self {
        Self {
            status_filter: hidden_status.into_iter().collect(),
            sort_by,
            sort_ascending,
            ..Self::default()
        }
    }

    pub fn with_keyword(self, keyword: impl Into<String>) -> Self {
        Self {
            search_keyword: keyword.into(),
            ..self
        }
    }

    pub fn toggle_priority(mut self, priority_id: i64) -> Self {
        if !self.priority_filter.remove(&priority_id) {
            self.priority_filter.insert(priority_id);
        }
        self
    }

    pub fn toggle_status(mut self, status_id: i64) -> Self {
        if !self.status_filter.remove(&status_id) {
            self.status_filter.insert(status_id);
        }
        self
    }

    pub fn is_filtering(&self) -> bool {
        !self.search_keyword.trim().is_empty()
            || !self.priority_filter.is_empty()
            || !self.status_filter.is_empty()
    }

    pub fn matches<T: ListItem>(&self, item: &T) -> bool {
        let keyword = self.search_keyword.trim().to_lowercase();
        self.passes_filters(item) && matches_keyword(item, &keyword)
    }

    /// Filters `items` and sorts the survivors. Ties keep their input order.
    pub fn apply<'a, T, I>(&self, items: I) -> Vec<&'a T>
    where
        T: ListItem + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let keyword = self.search_keyword.trim().to_lowercase();
        let mut visible: Vec<&T> = items
            .into_iter()
            .filter(|item| self.passes_filters(*item) && matches_keyword(*item, &keyword))
            .collect();
        visible.sort_by(|a, b| {
            let order = self.compare(*a, *b);
            if self.sort_ascending { order } else { order.reverse() }
        });
        visible
    }

    fn passes_filters<T: ListItem>(&self, item: &T) -> bool {
        !self.priority_filter.contains(&item.priority_id())
            && !self.status_filter.contains(&item.status_id())
    }

    fn compare<T: ListItem>(&self, a: &T, b: &T) -> Ordering {
        match self.sort_by {
            SortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
            SortKey::Priority => a.priority_id().cmp(&b.priority_id()),
            SortKey::Status => a.status_id().cmp(&b.status_id()),
            SortKey::LastEdited => a.last_edited_timestamp().cmp(&b.last_edited_timestamp()),
        }
    }
}

fn matches_keyword<T: ListItem>(item: &T, keyword: &str) -> bool {
    keyword.is_empty() || item.name().to_lowercase().contains(keyword)
}
