//! Wire types for the backend routes. Request bodies use the server's
//! snake_case column names; response envelopes are camelCase.

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        model::{
            Account, AccountSettings, Bug, BugId, Comment, CommentId, Project, ProjectId, Theme,
        },
        reference::{PriorityStatusOptions, Vocabularies},
    },
    error::BackendErrors,
    sync::transport::Method,
};

/// Error-map field the server uses when it refuses the session credential.
pub const CREDENTIAL_FIELD: &str = "jwToken";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub method: Method,
    /// Sends the stored credential and is subject to forced logout when the
    /// server rejects it.
    pub authenticated: bool,
}

impl Route {
    const fn public(path: &'static str) -> Self {
        Self {
            path,
            method: Method::Post,
            authenticated: false,
        }
    }

    const fn private(path: &'static str) -> Self {
        Self {
            path,
            method: Method::Post,
            authenticated: true,
        }
    }

    pub const REGISTER: Route = Route::public("/api/account/register");
    pub const LOGIN: Route = Route::public("/api/account/login");
    pub const RETRIEVE_ACCOUNT: Route = Route::private("/api/account/retrieve");
    pub const RETRIEVE_EVERYTHING: Route = Route::private("/api/account/retrieve-everything");
    pub const UPDATE_ACCOUNT_INFO: Route = Route::private("/api/account/update-info");
    pub const UPDATE_ACCOUNT_EMAIL: Route = Route::private("/api/account/update-email");
    pub const UPDATE_ACCOUNT_PASSWORD: Route = Route::private("/api/account/update-password");
    pub const UPDATE_ACCOUNT_SETTINGS: Route = Route::private("/api/account/update-settings");
    pub const DELETE_ACCOUNT: Route = Route::private("/api/account/delete");
    pub const PRIORITY_STATUS: Route = Route {
        path: "/api/priority-status/retrieve",
        method: Method::Get,
        authenticated: false,
    };

    pub const CREATE_PROJECT: Route = Route::private("/api/project/create");
    pub const UPDATE_PROJECT: Route = Route::private("/api/project/update");
    pub const DELETE_PROJECT: Route = Route::private("/api/project/delete");
    pub const DELETE_PROJECTS: Route = Route::private("/api/project/delete-multiple");

    pub const CREATE_BUG: Route = Route::private("/api/bug/create");
    pub const UPDATE_BUG: Route = Route::private("/api/bug/update");
    pub const DELETE_BUG: Route = Route::private("/api/bug/delete");
    pub const DELETE_BUGS: Route = Route::private("/api/bug/delete-multiple");

    pub const CREATE_COMMENT: Route = Route::private("/api/comment/create");
    pub const UPDATE_COMMENT: Route = Route::private("/api/comment/update");
    pub const DELETE_COMMENT: Route = Route::private("/api/comment/delete");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfoUpdate {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailUpdate {
    pub email: String,
    pub current_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteAccountRequest {
    /// The user must type the confirmation phrase.
    pub delete_typed_out: String,
    pub current_password: String,
}

/// Fields shared by project create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub priority_id: i64,
    pub status_id: i64,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub completion_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectEdit {
    pub project_id: ProjectId,
    #[serde(flatten)]
    pub draft: ProjectDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugDraft {
    pub project_id: ProjectId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub priority_id: i64,
    pub status_id: i64,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub completion_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugEdit {
    pub bug_id: BugId,
    #[serde(flatten)]
    pub draft: BugDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentDraft {
    pub bug_id: BugId,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentEdit {
    pub comment_id: CommentId,
    #[serde(flatten)]
    pub draft: CommentDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDelete {
    pub project_id: ProjectId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectsDelete {
    pub project_ids: Vec<ProjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugDelete {
    pub project_id: ProjectId,
    pub bug_id: BugId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugsDelete {
    pub project_id: ProjectId,
    pub bug_ids: Vec<BugId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentDelete {
    pub bug_id: BugId,
    pub comment_id: CommentId,
}

/// Everything an account owns, as sent by login and retrieve-everything.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EverythingResponse {
    pub project_priority_status: PriorityStatusOptions,
    pub bug_priority_status: PriorityStatusOptions,
    pub account: Account,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub bugs: Vec<Bug>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Older servers send neither of these.
    #[serde(default)]
    pub account_settings: Option<AccountSettings>,
    #[serde(default)]
    pub themes: Vec<Theme>,
}

impl EverythingResponse {
    pub fn vocabularies(&self) -> Vocabularies {
        Vocabularies {
            project: self.project_priority_status.clone(),
            bug: self.bug_priority_status.clone(),
        }
    }
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "jwToken")]
    pub credential: String,
    #[serde(flatten)]
    pub everything: EverythingResponse,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("credential", &"<redacted>")
            .field("everything", &self.everything)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountResponse {
    pub account: Account,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettingsResponse {
    pub account_settings: AccountSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeleteAccountResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityStatusResponse {
    pub project_priority_status_options: PriorityStatusOptions,
    pub bug_priority_status_options: PriorityStatusOptions,
}

impl PriorityStatusResponse {
    pub fn into_vocabularies(self) -> Vocabularies {
        Vocabularies {
            project: self.project_priority_status_options,
            bug: self.bug_priority_status_options,
        }
    }
}

/// Entity mutations answer with whichever lists they touched, each complete.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ListsResponse {
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
    #[serde(default)]
    pub bugs: Option<Vec<Bug>>,
    #[serde(default)]
    pub comments: Option<Vec<Comment>>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub input_errors: BackendErrors,
}
