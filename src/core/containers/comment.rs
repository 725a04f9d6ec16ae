use std::sync::Arc;

use crate::core::{
    display::{CommentComponentsDisplay, CommentDisplayPatch},
    model::{BugId, Comment},
};

use super::replace_if_changed;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentContainer {
    pub list: Vec<Comment>,
    pub components_display: CommentComponentsDisplay,
}

impl CommentContainer {
    pub fn for_bug(&self, bug_id: BugId) -> impl Iterator<Item = &Comment> {
        self.list.iter().filter(move |comment| comment.bug_id == bug_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommentAction {
    SetList(Vec<Comment>),
    SetComponentsDisplay(CommentDisplayPatch),
    ResetComponentsDisplay,
}

pub(crate) fn reduce(
    state: &Arc<CommentContainer>,
    action: &CommentAction,
) -> Arc<CommentContainer> {
    let next = match action {
        CommentAction::SetList(list) => CommentContainer {
            list: list.clone(),
            components_display: state.components_display,
        },
        CommentAction::SetComponentsDisplay(patch) => CommentContainer {
            list: state.list.clone(),
            components_display: state.components_display.apply(patch),
        },
        CommentAction::ResetComponentsDisplay => CommentContainer {
            list: state.list.clone(),
            components_display: CommentComponentsDisplay::default(),
        },
    };
    replace_if_changed(state, next)
}
