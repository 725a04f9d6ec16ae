mod account;
mod comment;
mod general;
mod list;

use std::sync::Arc;

pub use account::{AccountAction, AccountContainer};
pub use comment::{CommentAction, CommentContainer};
pub use general::{GeneralAction, GeneralContainer};
pub use list::{ListAction, ListContainer};

pub(crate) use account::reduce as reduce_account;
pub(crate) use comment::reduce as reduce_comment;
pub(crate) use general::reduce as reduce_general;
pub(crate) use list::reduce as reduce_list;

/// Keeps the old snapshot when an update produced an equal value, so callers
/// can detect "nothing changed" with `Arc::ptr_eq`.
pub(crate) fn replace_if_changed<T: PartialEq>(state: &Arc<T>, next: T) -> Arc<T> {
    if **state == next {
        Arc::clone(state)
    } else {
        Arc::new(next)
    }
}
