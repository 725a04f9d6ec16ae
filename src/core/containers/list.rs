use std::{collections::BTreeSet, sync::Arc};

use crate::core::{
    display::{ListComponentsDisplay, ListDisplayPatch},
    filter::SearchFilterSort,
    model::{Bug, ListItem, ProjectId},
};

use super::replace_if_changed;

/// Entity list plus display flags for projects or bugs.
#[derive(Debug, Clone, PartialEq)]
pub struct ListContainer<T: ListItem> {
    pub list: Vec<T>,
    pub components_display: ListComponentsDisplay<T>,
    pub mass_delete_list: BTreeSet<T::Id>,
    pub search_filter_sort: SearchFilterSort,
}

impl<T: ListItem> Default for ListContainer<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            components_display: ListComponentsDisplay::default(),
            mass_delete_list: BTreeSet::new(),
            search_filter_sort: SearchFilterSort::default(),
        }
    }
}

impl<T: ListItem> ListContainer<T> {
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.list.iter().find(|item| item.id() == id)
    }

    /// The item the item view is showing, resolved against the latest list so
    /// a fresh fetch is visible without touching the display flags. Falls back
    /// to the stored snapshot if the record is no longer listed.
    pub fn current_record(&self) -> Option<&T> {
        let current = self.components_display.item_view_current_item.as_ref()?;
        self.get(current.id()).or(Some(current))
    }

    /// The list as the list view shows it: searched, filtered and sorted.
    pub fn visible_list(&self) -> Vec<&T> {
        self.search_filter_sort.apply(&self.list)
    }
}

impl ListContainer<Bug> {
    pub fn bugs_in_project(&self, project_id: ProjectId) -> impl Iterator<Item = &Bug> {
        self.list.iter().filter(move |bug| bug.project_id == project_id)
    }

    pub fn visible_bugs_in_project(&self, project_id: ProjectId) -> Vec<&Bug> {
        self.search_filter_sort.apply(self.bugs_in_project(project_id))
    }

    pub fn count_for_status(&self, project_id: ProjectId, status_id: i64) -> usize {
        self.bugs_in_project(project_id)
            .filter(|bug| bug.status_id == status_id)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListAction<T: ListItem> {
    /// Replaces the whole list; mass delete entries that vanished are dropped.
    SetList(Vec<T>),
    SetComponentsDisplay(ListDisplayPatch<T>),
    ResetComponentsDisplay,
    ToggleMassDelete(T::Id),
    SetMassDeleteList(Vec<T::Id>),
    ClearMassDeleteList,
    SetSearchFilterSort(SearchFilterSort),
}

pub(crate) fn reduce<T: ListItem>(
    state: &Arc<ListContainer<T>>,
    action: &ListAction<T>,
) -> Arc<ListContainer<T>> {
    let next = match action {
        ListAction::SetList(list) => ListContainer {
            list: list.clone(),
            components_display: state.components_display.clone(),
            search_filter_sort: state.search_filter_sort.clone(),
            mass_delete_list: state
                .mass_delete_list
                .iter()
                .copied()
                .filter(|id| list.iter().any(|item| item.id() == *id))
                .collect(),
        },
        ListAction::SetComponentsDisplay(patch) => ListContainer {
            components_display: state.components_display.apply(patch),
            ..(**state).clone()
        },
        ListAction::ResetComponentsDisplay => ListContainer {
            components_display: ListComponentsDisplay::default(),
            ..(**state).clone()
        },
        ListAction::ToggleMassDelete(id) => {
            let mut mass_delete_list = state.mass_delete_list.clone();
            if !mass_delete_list.remove(id) {
                mass_delete_list.insert(*id);
            }
            ListContainer {
                mass_delete_list,
                ..(**state).clone()
            }
        }
        ListAction::SetMassDeleteList(ids) => ListContainer {
            mass_delete_list: ids.iter().copied().collect(),
            ..(**state).clone()
        },
        ListAction::ClearMassDeleteList => ListContainer {
            mass_delete_list: BTreeSet::new(),
            ..(**state).clone()
        },
        ListAction::SetSearchFilterSort(search_filter_sort) => ListContainer {
            search_filter_sort: search_filter_sort.clone(),
            ..(**state).clone()
        },
    };
    replace_if_changed(state, next)
}
