use std::fmt;

use crate::core::{
    containers::{AccountAction, CommentAction, GeneralAction, ListAction},
    coordinator::Transition,
    model::{Bug, Project},
    reference::ReferenceAction,
    session::SessionAction,
};

/// A top-level partition of the view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    General,
    Account,
    Project,
    Bug,
    Comment,
}

impl Container {
    pub const ALL: [Container; 5] = [
        Container::General,
        Container::Account,
        Container::Project,
        Container::Bug,
        Container::Comment,
    ];
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Container::General => "general",
            Container::Account => "account",
            Container::Project => "project",
            Container::Bug => "bug",
            Container::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Everything the store can be asked to do. Each variant is addressed to one
/// reducer, except composite transitions and the full reset.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    General(GeneralAction),
    Account(AccountAction),
    Project(ListAction<Project>),
    Bug(ListAction<Bug>),
    Comment(CommentAction),
    Session(SessionAction),
    Reference(ReferenceAction),
    /// Multi-container view change applied as one write.
    Transition(Transition),
    /// Puts one container back to its default record.
    ResetContainer(Container),
    /// Logout: every store back to its default, session and reference data
    /// included.
    Reset,
}

impl Action {
    /// The container this action is addressed to, if it targets exactly one.
    pub fn container(&self) -> Option<Container> {
        match self {
            Action::General(_) => Some(Container::General),
            Action::Account(_) => Some(Container::Account),
            Action::Project(_) => Some(Container::Project),
            Action::Bug(_) => Some(Container::Bug),
            Action::Comment(_) => Some(Container::Comment),
            Action::ResetContainer(container) => Some(*container),
            Action::Session(_)
            | Action::Reference(_)
            | Action::Transition(_)
            | Action::Reset => None,
        }
    }
}

impl From<GeneralAction> for Action {
    fn from(action: GeneralAction) -> Self {
        Action::General(action)
    }
}

impl From<AccountAction> for Action {
    fn from(action: AccountAction) -> Self {
        Action::Account(action)
    }
}

impl From<ListAction<Project>> for Action {
    fn from(action: ListAction<Project>) -> Self {
        Action::Project(action)
    }
}

impl From<ListAction<Bug>> for Action {
    fn from(action: ListAction<Bug>) -> Self {
        Action::Bug(action)
    }
}

impl From<CommentAction> for Action {
    fn from(action: CommentAction) -> Self {
        Action::Comment(action)
    }
}

impl From<SessionAction> for Action {
    fn from(action: SessionAction) -> Self {
        Action::Session(action)
    }
}

impl From<ReferenceAction> for Action {
    fn from(action: ReferenceAction) -> Self {
        Action::Reference(action)
    }
}

impl From<Transition> for Action {
    fn from(transition: Transition) -> Self {
        Action::Transition(transition)
    }
}
