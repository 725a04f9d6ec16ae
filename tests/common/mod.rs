#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from bugtrack for tests
pub use bugtrack::{
    Action, AppState, BackendErrors, ErrorKind, Store, SyncOutcome,
    core::{
        containers::{GeneralAction, ListAction},
        coordinator::{ListKind, OpenTarget, Transition, View},
        db::{CredentialStore, MemoryCredentialStore},
        display::{AccountPanel, AuthView, Dropdown, ListOverlay},
    },
};

/// Store already logged in as account 1 with the given entities loaded.
pub async fn logged_in_store(
    client: &TestClient,
    projects: &[bugtrack::core::model::Project],
    bugs: &[bugtrack::core::model::Bug],
) -> anyhow::Result<Store> {
    let mut store = Store::new();
    bugtrack::core::session::acquire(&mut store, client.storage(), &token(1)).await?;
    store.dispatch_all([
        Action::Project(ListAction::SetList(projects.to_vec())),
        Action::Bug(ListAction::SetList(bugs.to_vec())),
        Action::Transition(Transition::NavigateTo(View::Home)),
    ]);
    Ok(store)
}
