//! Data Sync Client: one operation per backend route. Every operation
//! resolves into store writes; failures land in the error-display store as
//! data and never escape as errors.

use serde::{Serialize, de::DeserializeOwned, de::IgnoredAny};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    core::{
        action::Action,
        containers::{AccountAction, CommentAction, GeneralAction, ListAction},
        coordinator::{Transition, View},
        db::CredentialStore,
        display::AccountPanel,
        filter::SearchFilterSort,
        model::{AccountSettings, BugId, ProjectId},
        reference::ReferenceAction,
        session,
        store::Store,
    },
    error::{BackendErrors, ClientError},
    sync::{
        payload::{
            AccountInfoUpdate, AccountResponse, AccountSettingsResponse, BugDelete, BugDraft,
            BugEdit, BugsDelete, CommentDelete, CommentDraft, CommentEdit, DeleteAccountRequest,
            DeleteAccountResponse, EmailUpdate, ErrorResponse, EverythingResponse, ListsResponse,
            LoginRequest, LoginResponse, PasswordUpdate, PriorityStatusResponse, ProjectDelete,
            ProjectDraft, ProjectEdit, ProjectsDelete, RegisterRequest, Route,
        },
        transport::{Request, Transport},
    },
};

/// How a sync operation ended. The details are in the store either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed,
    /// Errors were written to the error-display store.
    Failed,
    /// The server rejected the credential (or the user logged out); the
    /// session is gone and the login view is showing.
    LoggedOut,
}

impl SyncOutcome {
    pub fn is_completed(self) -> bool {
        self == SyncOutcome::Completed
    }
}

pub struct SyncClient<T, C> {
    transport: T,
    storage: C,
}

impl<T: std::fmt::Debug, C: std::fmt::Debug> std::fmt::Debug for SyncClient<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("transport", &self.transport)
            .field("storage", &self.storage)
            .finish()
    }
}

impl<T: Transport, C: CredentialStore> SyncClient<T, C> {
    pub fn new(transport: T, storage: C) -> Self {
        Self { transport, storage }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn storage(&self) -> &C {
        &self.storage
    }

    /// Startup: restore the stored credential and fetch everything with it,
    /// or fall back to the login view when there is none.
    pub async fn resume(&self, store: &mut Store) -> SyncOutcome {
        match session::rehydrate(store, &self.storage).await {
            Ok(true) => {
                store.dispatch(Transition::NavigateTo(View::Home));
                self.retrieve_everything(store).await
            }
            Ok(false) => {
                if store.state().general.components_display.home
                    || store.state().general.components_display.active().is_none()
                {
                    store.dispatch(Transition::NavigateTo(View::Login));
                }
                SyncOutcome::Completed
            }
            Err(err) => self.local_failure(store, &err),
        }
    }

    pub async fn register(&self, store: &mut Store, request: &RegisterRequest) -> SyncOutcome {
        match self.call::<IgnoredAny, _>(store, Route::REGISTER, Some(request)).await {
            Ok(_) => {
                info!(email = %request.email, "account registered");
                store.dispatch(Transition::NavigateTo(View::Login));
                SyncOutcome::Completed
            }
            Err(errors) => self.fail(store, Route::REGISTER, errors).await,
        }
    }

    pub async fn login(&self, store: &mut Store, request: &LoginRequest) -> SyncOutcome {
        let response = self
            .call::<LoginResponse, _>(store, Route::LOGIN, Some(request))
            .await;
        let response = match response {
            Ok(response) => response,
            Err(errors) => return self.fail(store, Route::LOGIN, errors).await,
        };
        if let Err(err) = session::acquire(store, &self.storage, &response.credential).await {
            return self.local_failure(store, &err);
        }
        apply_everything(store, &response.everything);
        store.dispatch_all([
            Action::Transition(Transition::NavigateTo(View::Home)),
            Action::General(GeneralAction::ClearBackendErrors),
        ]);
        SyncOutcome::Completed
    }

    /// Explicit logout: drops the durable credential and resets every store.
    pub async fn logout(&self, store: &mut Store) -> SyncOutcome {
        self.teardown(store).await;
        SyncOutcome::LoggedOut
    }

    pub async fn retrieve_account(&self, store: &mut Store) -> SyncOutcome {
        let route = Route::RETRIEVE_ACCOUNT;
        match self.call::<AccountResponse, ()>(store, route, None).await {
            Ok(response) => {
                store.dispatch(AccountAction::SetAccount(response.account));
                SyncOutcome::Completed
            }
            Err(errors) => self.fail(store, route, errors).await,
        }
    }

    pub async fn retrieve_everything(&self, store: &mut Store) -> SyncOutcome {
        let route = Route::RETRIEVE_EVERYTHING;
        match self.call::<EverythingResponse, ()>(store, route, None).await {
            Ok(response) => {
                apply_everything(store, &response);
                SyncOutcome::Completed
            }
            Err(errors) => self.fail(store, route, errors).await,
        }
    }

    pub async fn update_account_info(
        &self,
        store: &mut Store,
        request: &AccountInfoUpdate,
    ) -> SyncOutcome {
        self.update_account(store, Route::UPDATE_ACCOUNT_INFO, request)
            .await
    }

    pub async fn update_account_email(
        &self,
        store: &mut Store,
        request: &EmailUpdate,
    ) -> SyncOutcome {
        self.update_account(store, Route::UPDATE_ACCOUNT_EMAIL, request)
            .await
    }

    pub async fn update_account_password(
        &self,
        store: &mut Store,
        request: &PasswordUpdate,
    ) -> SyncOutcome {
        self.update_account(store, Route::UPDATE_ACCOUNT_PASSWORD, request)
            .await
    }

    /// The server answers with the stored record, which replaces ours whole.
    pub async fn update_account_settings(
        &self,
        store: &mut Store,
        settings: &AccountSettings,
    ) -> SyncOutcome {
        let route = Route::UPDATE_ACCOUNT_SETTINGS;
        match self
            .call::<AccountSettingsResponse, _>(store, route, Some(settings))
            .await
        {
            Ok(response) => {
                info!(route = route.path, "account settings updated");
                store.dispatch_all([
                    Action::Account(AccountAction::SetSettings(response.account_settings)),
                    Action::General(GeneralAction::ClearBackendErrors),
                ]);
                SyncOutcome::Completed
            }
            Err(errors) => self.fail(store, route, errors).await,
        }
    }

    /// Success ends the session the same way an explicit logout does.
    pub async fn delete_account(
        &self,
        store: &mut Store,
        request: &DeleteAccountRequest,
    ) -> SyncOutcome {
        let route = Route::DELETE_ACCOUNT;
        match self.call::<DeleteAccountResponse, _>(store, route, Some(request)).await {
            Ok(response) => {
                if !response.success {
                    debug!("account delete answered without a success flag");
                }
                info!("account deleted");
                self.logout(store).await
            }
            Err(errors) => self.fail(store, route, errors).await,
        }
    }

    pub async fn retrieve_priority_status(&self, store: &mut Store) -> SyncOutcome {
        let route = Route::PRIORITY_STATUS;
        match self.call::<PriorityStatusResponse, ()>(store, route, None).await {
            Ok(response) => {
                store.dispatch(ReferenceAction::Load(response.into_vocabularies()));
                SyncOutcome::Completed
            }
            Err(errors) => self.fail(store, route, errors).await,
        }
    }

    pub async fn create_project(&self, store: &mut Store, draft: &ProjectDraft) -> SyncOutcome {
        self.mutate(store, Route::CREATE_PROJECT, draft).await
    }

    pub async fn update_project(&self, store: &mut Store, edit: &ProjectEdit) -> SyncOutcome {
        self.mutate(store, Route::UPDATE_PROJECT, edit).await
    }

    pub async fn delete_project(&self, store: &mut Store, project_id: ProjectId) -> SyncOutcome {
        self.mutate(store, Route::DELETE_PROJECT, &ProjectDelete { project_id })
            .await
    }

    pub async fn delete_projects(
        &self,
        store: &mut Store,
        project_ids: Vec<ProjectId>,
    ) -> SyncOutcome {
        self.mutate(store, Route::DELETE_PROJECTS, &ProjectsDelete { project_ids })
            .await
    }

    pub async fn create_bug(&self, store: &mut Store, draft: &BugDraft) -> SyncOutcome {
        self.mutate(store, Route::CREATE_BUG, draft).await
    }

    pub async fn update_bug(&self, store: &mut Store, edit: &BugEdit) -> SyncOutcome {
        self.mutate(store, Route::UPDATE_BUG, edit).await
    }

    pub async fn delete_bug(
        &self,
        store: &mut Store,
        project_id: ProjectId,
        bug_id: BugId,
    ) -> SyncOutcome {
        self.mutate(store, Route::DELETE_BUG, &BugDelete { project_id, bug_id })
            .await
    }

    pub async fn delete_bugs(
        &self,
        store: &mut Store,
        project_id: ProjectId,
        bug_ids: Vec<BugId>,
    ) -> SyncOutcome {
        let delete = BugsDelete {
            project_id,
            bug_ids,
        };
        self.mutate(store, Route::DELETE_BUGS, &delete).await
    }

    pub async fn create_comment(&self, store: &mut Store, draft: &CommentDraft) -> SyncOutcome {
        self.mutate(store, Route::CREATE_COMMENT, draft).await
    }

    pub async fn update_comment(&self, store: &mut Store, edit: &CommentEdit) -> SyncOutcome {
        self.mutate(store, Route::UPDATE_COMMENT, edit).await
    }

    pub async fn delete_comment(&self, store: &mut Store, delete: &CommentDelete) -> SyncOutcome {
        self.mutate(store, Route::DELETE_COMMENT, delete).await
    }

    async fn update_account<B: Serialize>(
        &self,
        store: &mut Store,
        route: Route,
        body: &B,
    ) -> SyncOutcome {
        match self.call::<AccountResponse, _>(store, route, Some(body)).await {
            Ok(response) => {
                info!(route = route.path, "account updated");
                store.dispatch_all([
                    Action::Account(AccountAction::SetAccount(response.account)),
                    Action::Account(AccountAction::ShowOnly(AccountPanel::Sidebar)),
                    Action::General(GeneralAction::ClearBackendErrors),
                ]);
                SyncOutcome::Completed
            }
            Err(errors) => self.fail(store, route, errors).await,
        }
    }

    /// Entity mutations only replace entity lists. Display flags are left to
    /// whatever the user did while the request was in flight.
    async fn mutate<B: Serialize>(&self, store: &mut Store, route: Route, body: &B) -> SyncOutcome {
        match self.call::<ListsResponse, _>(store, route, Some(body)).await {
            Ok(lists) => {
                info!(route = route.path, "mutation accepted");
                let mut actions = Vec::with_capacity(4);
                if let Some(projects) = lists.projects {
                    actions.push(Action::Project(ListAction::SetList(projects)));
                }
                if let Some(bugs) = lists.bugs {
                    actions.push(Action::Bug(ListAction::SetList(bugs)));
                }
                if let Some(comments) = lists.comments {
                    actions.push(Action::Comment(CommentAction::SetList(comments)));
                }
                actions.push(Action::General(GeneralAction::ClearBackendErrors));
                store.dispatch_all(actions);
                SyncOutcome::Completed
            }
            Err(errors) => self.fail(store, route, errors).await,
        }
    }

    /// Sends one request and decodes the success payload. Every failure comes
    /// back as the error map to show.
    async fn call<R, B>(
        &self,
        store: &Store,
        route: Route,
        body: Option<&B>,
    ) -> Result<R, BackendErrors>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let credential = if route.authenticated {
            match store.state().session.token() {
                Some(token) => Some(token.to_string()),
                None => {
                    return Err(BackendErrors::credential_rejected(
                        "Session expired, please log in again",
                    ));
                }
            }
        } else {
            None
        };
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|err| BackendErrors::from_client_error(&ClientError::from(err)))?;

        debug!(route = route.path, method = ?route.method, "sending");
        let request = Request {
            route,
            body,
            credential,
        };
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|err| BackendErrors::from_client_error(&err))?;

        if response.is_success() {
            return decode(response.body).map_err(|err| BackendErrors::from_client_error(&err));
        }
        let errors = serde_json::from_value::<ErrorResponse>(response.body)
            .map(|envelope| envelope.input_errors)
            .unwrap_or_default();
        if errors.is_empty() {
            debug!(status = response.status, route = route.path, "failure without an error map");
            return Err(BackendErrors::server_connection());
        }
        Err(errors)
    }

    /// Writes the errors for the user. A rejected credential on an
    /// authenticated route also ends the session.
    async fn fail(&self, store: &mut Store, route: Route, errors: BackendErrors) -> SyncOutcome {
        if route.authenticated && errors.is_credential_rejected() {
            warn!(route = route.path, "credential rejected, logging out");
            self.teardown(store).await;
            store.dispatch_all([
                Action::Transition(Transition::NavigateTo(View::Login)),
                Action::General(GeneralAction::SetBackendErrors(errors)),
            ]);
            return SyncOutcome::LoggedOut;
        }
        debug!(route = route.path, fields = errors.len(), "request failed");
        store.dispatch(GeneralAction::SetBackendErrors(errors));
        SyncOutcome::Failed
    }

    fn local_failure(&self, store: &mut Store, err: &ClientError) -> SyncOutcome {
        warn!(error = %err, "client-side failure");
        store.dispatch(GeneralAction::SetBackendErrors(BackendErrors::from_client_error(err)));
        SyncOutcome::Failed
    }

    async fn teardown(&self, store: &mut Store) {
        if let Err(err) = session::clear(store, &self.storage).await {
            warn!(error = %err, "failed to remove stored credential");
        }
        store.dispatch(Action::Reset);
        info!("logged out");
    }
}

fn decode<R: DeserializeOwned>(body: Value) -> Result<R, ClientError> {
    Ok(serde_json::from_value(body)?)
}

fn apply_everything(store: &mut Store, everything: &EverythingResponse) {
    store.dispatch_all([
        Action::Reference(ReferenceAction::Load(everything.vocabularies())),
        Action::Account(AccountAction::SetAccount(everything.account.clone())),
        Action::Account(AccountAction::SetSettingThemes(everything.themes.clone())),
        Action::Project(ListAction::SetList(everything.projects.clone())),
        Action::Bug(ListAction::SetList(everything.bugs.clone())),
        Action::Comment(CommentAction::SetList(everything.comments.clone())),
    ]);
    if let Some(settings) = &everything.account_settings {
        store.dispatch(AccountAction::SetSettings(settings.clone()));
        seed_list_filters(store, settings, everything);
    }
}

/// Applies the account's preferred order and completion filter to lists the
/// user has not filtered yet.
fn seed_list_filters(
    store: &mut Store,
    settings: &AccountSettings,
    everything: &EverythingResponse,
) {
    let pristine = SearchFilterSort::default();
    let hide = |enabled: bool, completion: Option<i64>| completion.filter(|_| enabled);
    let mut actions = Vec::with_capacity(2);
    if store.state().project.search_filter_sort == pristine {
        let hidden = hide(
            settings.filter_completed_projects_by_default,
            everything.project_priority_status.status_completion_id,
        );
        actions.push(Action::Project(ListAction::SetSearchFilterSort(
            SearchFilterSort::seeded(
                settings.project_sort,
                settings.project_sort_ascending,
                hidden,
            ),
        )));
    }
    if store.state().bug.search_filter_sort == pristine {
        let hidden = hide(
            settings.filter_completed_bugs_by_default,
            everything.bug_priority_status.status_completion_id,
        );
        actions.push(Action::Bug(ListAction::SetSearchFilterSort(SearchFilterSort::seeded(
            settings.bug_sort,
            settings.bug_sort_ascending,
            hidden,
        ))));
    }
    store.dispatch_all(actions);
}
