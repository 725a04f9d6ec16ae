//! View-State Coordinator: named composite transitions that touch several
//! containers in one write. All cross-container display rules live here so
//! the auth view, the open bug and the account panels stay consistent no
//! matter which event triggered the change.

use tracing::{debug, warn};

use crate::core::{
    containers::{
        AccountAction, CommentAction, GeneralAction, ListAction, reduce_account, reduce_comment,
        reduce_general, reduce_list,
    },
    display::{AccountPanel, AuthView, CommentDisplayPatch, Dropdown, ListDisplayPatch, ListOverlay},
    model::{Bug, CommentId, ListItem, Project},
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Project,
    Bug,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpenTarget {
    Project(Project),
    Bug(Bug),
}

/// Navigation targets: the three auth views and the four views inside home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Register,
    Login,
    Home,
    ProjectList,
    ProjectItem,
    BugList,
    BugItem,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Register,
        View::Login,
        View::Home,
        View::ProjectList,
        View::ProjectItem,
        View::BugList,
        View::BugItem,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Shows `item` in its container's item view. Opening a project drops
    /// whatever bug was open; a bug only opens inside its own project.
    OpenItem(OpenTarget),
    NavigateTo(View),
    /// Close affordance of an item view: back to the list, create sidebar
    /// kept as it was.
    CloseItemOrKeepList(ListKind),
    ToggleDropdown(Dropdown),
    OpenAccountPanel(AccountPanel),
    CloseAccountPanels,
    ToggleListOverlay(ListKind, ListOverlay),
    /// `None` closes the comment edit form.
    EditComment(Option<CommentId>),
    /// `None` dismisses the delete confirmation.
    PromptCommentDelete(Option<CommentId>),
    /// A form was closed; its errors must not come back on reopen.
    CloseForm,
}

/// Flags for the four home views. Overlays close and current items survive.
struct HomeFlags {
    project_list: bool,
    project_item: bool,
    bug_list: bool,
    bug_item: bool,
}

impl HomeFlags {
    fn patch<T>(list_view: bool, item_view: bool) -> ListDisplayPatch<T> {
        ListDisplayPatch {
            list_view: Some(list_view),
            list_view_create_sidebar: Some(false),
            list_view_delete_modal: Some(false),
            item_view: Some(item_view),
            item_view_edit_info: Some(false),
            item_view_delete_modal: Some(false),
            item_view_current_item: None,
        }
    }
}

pub(crate) fn apply(state: &AppState, transition: &Transition) -> AppState {
    match transition {
        Transition::OpenItem(OpenTarget::Project(project)) => open_project(state, project),
        Transition::OpenItem(OpenTarget::Bug(bug)) => open_bug(state, bug),
        Transition::NavigateTo(view) => navigate_to(state, *view),
        Transition::CloseItemOrKeepList(ListKind::Project) => close_project_item(state),
        Transition::CloseItemOrKeepList(ListKind::Bug) => close_bug_item(state),
        Transition::ToggleDropdown(dropdown) => {
            let mut next = close_account_panels(state);
            next.general = reduce_general(
                &next.general,
                &GeneralAction::SetDropdown {
                    dropdown: *dropdown,
                    open: !state.general.dropdowns_display.is_open(*dropdown),
                },
            );
            next
        }
        Transition::OpenAccountPanel(panel) => {
            let mut next = state.clone();
            next.account = reduce_account(&state.account, &AccountAction::ShowOnly(*panel));
            next.general = reduce_general(&next.general, &GeneralAction::CloseDropdowns);
            if next.account.components_display != state.account.components_display {
                next.general = reduce_general(&next.general, &GeneralAction::ClearBackendErrors);
            }
            next
        }
        Transition::CloseAccountPanels => {
            let mut next = close_account_panels(state);
            if state.account.components_display.any_open() {
                next.general = reduce_general(&next.general, &GeneralAction::ClearBackendErrors);
            }
            next
        }
        Transition::ToggleListOverlay(kind, overlay) => toggle_overlay(state, *kind, *overlay),
        Transition::EditComment(comment) => {
            let mut next = close_account_panels(state);
            next.comment = reduce_comment(
                &next.comment,
                &CommentAction::SetComponentsDisplay(CommentDisplayPatch {
                    comment_being_edited: Some(*comment),
                    ..Default::default()
                }),
            );
            if comment.is_none() {
                next.general = reduce_general(&next.general, &GeneralAction::ClearBackendErrors);
            }
            next
        }
        Transition::PromptCommentDelete(comment) => {
            let mut next = close_account_panels(state);
            next.comment = reduce_comment(
                &next.comment,
                &CommentAction::SetComponentsDisplay(CommentDisplayPatch {
                    comment_to_be_deleted: Some(*comment),
                    ..Default::default()
                }),
            );
            next
        }
        Transition::CloseForm => {
            let mut next = state.clone();
            next.general = reduce_general(&state.general, &GeneralAction::ClearBackendErrors);
            next
        }
    }
}

fn close_account_panels(state: &AppState) -> AppState {
    let mut next = state.clone();
    next.account = reduce_account(&state.account, &AccountAction::CloseComponents);
    next
}

fn open_project(state: &AppState, project: &Project) -> AppState {
    let display = &state.project.components_display;
    if display.item_view
        && display.item_view_current_item.as_ref() == Some(project)
        && !state.account.components_display.any_open()
    {
        debug!(project = %project.id, "project already open");
        return state.clone();
    }

    let mut next = close_account_panels(state);
    next.project = reduce_list(
        &next.project,
        &ListAction::SetComponentsDisplay(ListDisplayPatch {
            list_view: Some(false),
            list_view_delete_modal: Some(false),
            item_view: Some(true),
            item_view_edit_info: Some(false),
            item_view_delete_modal: Some(false),
            item_view_current_item: Some(Some(project.clone())),
            ..Default::default()
        }),
    );
    next.bug = reduce_list(&next.bug, &ListAction::ResetComponentsDisplay);
    if display.current_item_id() != Some(project.id()) {
        next.bug = reduce_list(&next.bug, &ListAction::ClearMassDeleteList);
    }
    next.comment = reduce_comment(&next.comment, &CommentAction::ResetComponentsDisplay);
    next
}

fn open_bug(state: &AppState, bug: &Bug) -> AppState {
    if state.project.components_display.current_item_id() != Some(bug.project_id) {
        warn!(bug = %bug.id, project = %bug.project_id, "bug does not belong to the open project");
        return state.clone();
    }
    let display = &state.bug.components_display;
    if display.item_view
        && display.item_view_current_item.as_ref() == Some(bug)
        && !state.account.components_display.any_open()
    {
        debug!(bug = %bug.id, "bug already open");
        return state.clone();
    }

    let mut next = close_account_panels(state);
    next.bug = reduce_list(
        &next.bug,
        &ListAction::SetComponentsDisplay(ListDisplayPatch {
            list_view: Some(false),
            list_view_delete_modal: Some(false),
            item_view: Some(true),
            item_view_edit_info: Some(false),
            item_view_delete_modal: Some(false),
            item_view_current_item: Some(Some(bug.clone())),
            ..Default::default()
        }),
    );
    next.project = reduce_list(
        &next.project,
        &ListAction::SetComponentsDisplay(ListDisplayPatch {
            list_view: Some(false),
            item_view: Some(false),
            ..Default::default()
        }),
    );
    next.comment = reduce_comment(&next.comment, &CommentAction::ResetComponentsDisplay);
    next
}

fn navigate_to(state: &AppState, view: View) -> AppState {
    let flags = match view {
        View::Register | View::Login | View::Home => {
            let auth = match view {
                View::Register => AuthView::Register,
                View::Login => AuthView::Login,
                _ => AuthView::Home,
            };
            let mut next = close_account_panels(state);
            next.general = reduce_general(&next.general, &GeneralAction::ShowAuthView(auth));
            return next;
        }
        View::ProjectList => HomeFlags {
            project_list: true,
            project_item: false,
            bug_list: false,
            bug_item: false,
        },
        View::ProjectItem => HomeFlags {
            project_list: false,
            project_item: true,
            bug_list: false,
            bug_item: false,
        },
        View::BugList => HomeFlags {
            project_list: false,
            project_item: false,
            bug_list: true,
            bug_item: false,
        },
        View::BugItem => HomeFlags {
            project_list: false,
            project_item: false,
            bug_list: false,
            bug_item: true,
        },
    };

    let has_project = state.project.components_display.item_view_current_item.is_some();
    let has_bug = state.bug.components_display.item_view_current_item.is_some();
    let reachable = match view {
        View::ProjectItem | View::BugList => has_project,
        View::BugItem => has_bug,
        _ => true,
    };
    if !reachable {
        warn!(?view, "no item selected for this view");
        return state.clone();
    }

    let mut next = close_account_panels(state);
    next.project = reduce_list(
        &next.project,
        &ListAction::SetComponentsDisplay(HomeFlags::patch(flags.project_list, flags.project_item)),
    );
    next.bug = reduce_list(
        &next.bug,
        &ListAction::SetComponentsDisplay(HomeFlags::patch(flags.bug_list, flags.bug_item)),
    );
    next.comment = reduce_comment(&next.comment, &CommentAction::ResetComponentsDisplay);
    next
}

fn close_project_item(state: &AppState) -> AppState {
    let mut next = close_account_panels(state);
    next.project = reduce_list(
        &next.project,
        &ListAction::SetComponentsDisplay(ListDisplayPatch {
            list_view: Some(true),
            list_view_delete_modal: Some(false),
            item_view: Some(false),
            item_view_edit_info: Some(false),
            item_view_delete_modal: Some(false),
            item_view_current_item: Some(None),
            ..Default::default()
        }),
    );
    next.bug = reduce_list(&next.bug, &ListAction::ResetComponentsDisplay);
    next.bug = reduce_list(&next.bug, &ListAction::ClearMassDeleteList);
    next.comment = reduce_comment(&next.comment, &CommentAction::ResetComponentsDisplay);
    next
}

fn close_bug_item(state: &AppState) -> AppState {
    let display = &state.bug.components_display;
    let mut next = close_account_panels(state);
    next.bug = reduce_list(
        &next.bug,
        &ListAction::SetComponentsDisplay(ListDisplayPatch {
            list_view: Some(display.list_view || display.item_view),
            list_view_delete_modal: Some(false),
            item_view: Some(false),
            item_view_edit_info: Some(false),
            item_view_delete_modal: Some(false),
            item_view_current_item: Some(None),
            ..Default::default()
        }),
    );
    next.comment = reduce_comment(&next.comment, &CommentAction::ResetComponentsDisplay);
    next
}

fn toggle_overlay(state: &AppState, kind: ListKind, overlay: ListOverlay) -> AppState {
    let mut next = close_account_panels(state);
    let was_open = match kind {
        ListKind::Project => {
            let open = state.project.components_display.overlay_open(overlay);
            next.project = reduce_list(
                &next.project,
                &ListAction::SetComponentsDisplay(ListDisplayPatch::overlay(overlay, !open)),
            );
            open
        }
        ListKind::Bug => {
            let open = state.bug.components_display.overlay_open(overlay);
            next.bug = reduce_list(
                &next.bug,
                &ListAction::SetComponentsDisplay(ListDisplayPatch::overlay(overlay, !open)),
            );
            open
        }
    };
    if was_open {
        next.general = reduce_general(&next.general, &GeneralAction::ClearBackendErrors);
    }
    next
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        core::{
            action::Action,
            display::{AccountComponentsDisplay, ListComponentsDisplay},
            model::{
                BugId, ProjectId,
                test_support::{bug, project},
            },
        },
        error::BackendErrors,
    };

    fn run(state: &AppState, transitions: &[Transition]) -> AppState {
        transitions
            .iter()
            .fold(state.clone(), |state, t| state.reduce(&Action::Transition(t.clone())))
    }

    #[test]
    fn switching_project_drops_bug_selection() {
        let state = run(
            &AppState::default(),
            &[
                Transition::OpenItem(OpenTarget::Project(project(1))),
                Transition::OpenItem(OpenTarget::Bug(bug(10, 1))),
            ],
        );
        assert_eq!(state.bug.components_display.current_item_id(), Some(BugId(10)));

        let switched = run(&state, &[Transition::OpenItem(OpenTarget::Project(project(2)))]);
        assert_eq!(switched.bug.components_display, ListComponentsDisplay::default());
        assert_eq!(switched.project.components_display.current_item_id(), Some(ProjectId(2)));
        assert_eq!(switched.home_views_shown(), 1);
    }

    #[test]
    fn bug_from_another_project_is_refused() {
        let state = run(
            &AppState::default(),
            &[Transition::OpenItem(OpenTarget::Project(project(1)))],
        );
        let next = run(&state, &[Transition::OpenItem(OpenTarget::Bug(bug(3, 2)))]);
        assert_eq!(next, state);
    }

    #[test]
    fn opening_same_project_twice_is_idempotent() {
        let open = Transition::OpenItem(OpenTarget::Project(project(4)));
        let once = run(&AppState::default(), &[open.clone()]);
        let twice = run(&once, &[open]);
        assert_eq!(once, twice);
        assert!(Arc::ptr_eq(&once.project, &twice.project));
    }

    #[test]
    fn toggling_dropdown_closes_account_panels() {
        let state = run(
            &AppState::default(),
            &[Transition::OpenAccountPanel(AccountPanel::Sidebar)],
        );
        assert!(state.account.components_display.sidebar);

        let next = run(&state, &[Transition::ToggleDropdown(Dropdown::NavbarHamburger)]);
        assert_eq!(next.account.components_display, AccountComponentsDisplay::default());
        assert!(next.general.dropdowns_display.navbar_hamburger);
    }

    #[test]
    fn list_navigation_keeps_current_items() {
        let state = run(
            &AppState::default(),
            &[
                Transition::OpenItem(OpenTarget::Project(project(1))),
                Transition::OpenItem(OpenTarget::Bug(bug(5, 1))),
                Transition::NavigateTo(View::ProjectList),
            ],
        );
        let project_display = &state.project.components_display;
        assert!(project_display.list_view);
        assert!(!project_display.item_view);
        assert_eq!(project_display.current_item_id(), Some(ProjectId(1)));
        assert_eq!(state.bug.components_display.current_item_id(), Some(BugId(5)));
        assert_eq!(state.home_views_shown(), 1);

        let back = run(&state, &[Transition::NavigateTo(View::BugItem)]);
        assert!(back.bug.components_display.item_view);
        assert_eq!(back.home_views_shown(), 1);
    }

    #[test]
    fn item_views_need_a_selection() {
        let state = AppState::default();
        assert_eq!(run(&state, &[Transition::NavigateTo(View::ProjectItem)]), state);
        assert_eq!(run(&state, &[Transition::NavigateTo(View::BugItem)]), state);
    }

    #[test]
    fn closing_project_item_keeps_create_sidebar() {
        let state = run(
            &AppState::default(),
            &[
                Transition::ToggleListOverlay(ListKind::Project, ListOverlay::CreateSidebar),
                Transition::OpenItem(OpenTarget::Project(project(1))),
                Transition::CloseItemOrKeepList(ListKind::Project),
            ],
        );
        let display = &state.project.components_display;
        assert!(display.list_view);
        assert!(display.list_view_create_sidebar);
        assert!(!display.item_view);
        assert_eq!(display.item_view_current_item, None);
    }

    #[test]
    fn closing_bug_item_returns_to_bug_list() {
        let state = run(
            &AppState::default(),
            &[
                Transition::OpenItem(OpenTarget::Project(project(1))),
                Transition::OpenItem(OpenTarget::Bug(bug(2, 1))),
                Transition::CloseItemOrKeepList(ListKind::Bug),
            ],
        );
        assert!(state.bug.components_display.list_view);
        assert!(!state.bug.components_display.item_view);
        assert_eq!(state.project.components_display.current_item_id(), Some(ProjectId(1)));
        assert_eq!(state.home_views_shown(), 1);
    }

    #[test]
    fn account_panels_leave_list_flags_alone() {
        let state = run(
            &AppState::default(),
            &[Transition::OpenItem(OpenTarget::Project(project(1)))],
        );
        let next = run(&state, &[Transition::OpenAccountPanel(AccountPanel::Settings)]);
        assert_eq!(next.project, state.project);
        assert_eq!(next.bug, state.bug);
        assert!(next.account.components_display.settings);
    }

    #[test]
    fn closing_forms_clears_errors() {
        let state = AppState::default().reduce(&Action::General(GeneralAction::SetBackendErrors(
            BackendErrors::new().with("validationProjectName", "Name required"),
        )));
        let closed = run(&state, &[Transition::CloseForm]);
        assert!(closed.general.backend_errors.is_empty());

        let editing = run(&state, &[Transition::EditComment(Some(CommentId(3)))]);
        assert_eq!(editing.comment.components_display.comment_being_edited, Some(CommentId(3)));
        assert!(!editing.general.backend_errors.is_empty());
        let done = run(&editing, &[Transition::EditComment(None)]);
        assert!(done.general.backend_errors.is_empty());
    }
}
