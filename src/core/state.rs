use std::sync::Arc;

use tracing::warn;

use crate::core::{
    action::{Action, Container},
    containers::{
        AccountContainer, CommentAction, CommentContainer, GeneralContainer, ListAction,
        ListContainer, reduce_account, reduce_comment, reduce_general, reduce_list,
        replace_if_changed,
    },
    coordinator,
    display::ListDisplayPatch,
    model::{Bug, Project},
    reference::{self, ReferenceData},
    session::{self, Session},
};

/// One immutable snapshot of the whole client. Reducers never mutate a
/// container in place; a store that did not change keeps its `Arc`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub session: Arc<Session>,
    pub reference: Arc<ReferenceData>,
    pub general: Arc<GeneralContainer>,
    pub account: Arc<AccountContainer>,
    pub project: Arc<ListContainer<Project>>,
    pub bug: Arc<ListContainer<Bug>>,
    pub comment: Arc<CommentContainer>,
}

impl AppState {
    /// Root reducer. Pure: the receiver is left untouched.
    pub fn reduce(&self, action: &Action) -> AppState {
        let next = match action {
            Action::General(action) => AppState {
                general: reduce_general(&self.general, action),
                ..self.clone()
            },
            Action::Account(action) => AppState {
                account: reduce_account(&self.account, action),
                ..self.clone()
            },
            Action::Project(action) => AppState {
                project: reduce_list(&self.project, action),
                ..self.clone()
            },
            Action::Bug(action) => AppState {
                bug: reduce_list(&self.bug, action),
                ..self.clone()
            },
            Action::Comment(action) => AppState {
                comment: reduce_comment(&self.comment, action),
                ..self.clone()
            },
            Action::Session(action) => AppState {
                session: session::reduce(&self.session, action),
                ..self.clone()
            },
            Action::Reference(action) => AppState {
                reference: reference::reduce(&self.reference, action),
                ..self.clone()
            },
            Action::Transition(transition) => coordinator::apply(self, transition),
            Action::ResetContainer(container) => self.reset_container(*container),
            Action::Reset => self.reset_all(),
        };
        next.revalidate_bug_selection()
    }

    fn reset_container(&self, container: Container) -> AppState {
        let mut next = self.clone();
        match container {
            Container::General => {
                next.general = replace_if_changed(&self.general, Default::default())
            }
            Container::Account => {
                next.account = replace_if_changed(&self.account, Default::default())
            }
            Container::Project => {
                next.project = replace_if_changed(&self.project, Default::default())
            }
            Container::Bug => next.bug = replace_if_changed(&self.bug, Default::default()),
            Container::Comment => {
                next.comment = replace_if_changed(&self.comment, Default::default())
            }
        }
        next
    }

    fn reset_all(&self) -> AppState {
        let mut next = Container::ALL
            .into_iter()
            .fold(self.clone(), |state, container| state.reset_container(container));
        next.session = replace_if_changed(&self.session, Session::default());
        next.reference = replace_if_changed(&self.reference, ReferenceData::default());
        next
    }

    /// A bug selection must belong to the selected project. Low-level patches
    /// can break that; the stale bug view is dropped and the project view
    /// takes over so something is still showing.
    fn revalidate_bug_selection(self) -> AppState {
        if self.bug_selection_matches_project() {
            return self;
        }
        warn!(
            bug = ?self.bug.components_display.current_item_id(),
            project = ?self.project.components_display.current_item_id(),
            "dropping bug selection that does not belong to the open project"
        );
        let mut next = self;
        next.bug = reduce_list(&next.bug, &ListAction::ResetComponentsDisplay);
        next.comment = reduce_comment(&next.comment, &CommentAction::ResetComponentsDisplay);
        let project_display = &next.project.components_display;
        if !project_display.list_view && !project_display.item_view {
            next.project = reduce_list(
                &next.project,
                &ListAction::SetComponentsDisplay(ListDisplayPatch {
                    list_view: Some(true),
                    ..Default::default()
                }),
            );
        }
        next
    }

    /// Exactly one of register/login/home is shown.
    pub fn auth_view_is_exclusive(&self) -> bool {
        self.general.components_display.shown_count() == 1
    }

    /// An open bug belongs to the open project.
    pub fn bug_selection_matches_project(&self) -> bool {
        match &self.bug.components_display.item_view_current_item {
            None => true,
            Some(bug) => self.project.components_display.current_item_id() == Some(bug.project_id),
        }
    }

    /// Number of home views (project list/item, bug list/item) flagged as
    /// shown. Navigation keeps this at one.
    pub fn home_views_shown(&self) -> usize {
        let project = &self.project.components_display;
        let bug = &self.bug.components_display;
        [project.list_view, project.item_view, bug.list_view, bug.item_view]
            .into_iter()
            .filter(|shown| *shown)
            .count()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
