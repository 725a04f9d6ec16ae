use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use bugtrack::{
    ClientError, SyncClient,
    core::{
        db::{MemoryCredentialStore, SqliteCredentialStore},
        model::{Account, AccountId, Bug, BugId, Comment, CommentId, Project, ProjectId},
    },
    sync::transport::{Request, Response, Transport},
};
use serde_json::{Value, json};

pub const TEST_EMAIL: &str = "a@b.com";

/// Builds a JWT-shaped token whose claims name `account_id`. The signature
/// segment is junk; the client never checks it.
pub fn token(account_id: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"account_id":{account_id},"iat":1700000000,"exp":1700007200}}"#
    ));
    format!("{header}.{payload}.not-a-signature")
}

pub fn account() -> Account {
    Account {
        account_id: AccountId(1),
        email: TEST_EMAIL.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        join_date: Some("2024-01-01".to_string()),
        last_edited_timestamp: 1,
    }
}

pub fn project(id: i64) -> Project {
    Project {
        id: ProjectId(id),
        account_id: AccountId(1),
        name: format!("Project {id}"),
        description: String::new(),
        priority_id: 1,
        status_id: 1,
        creation_date: None,
        start_date: None,
        due_date: None,
        completion_date: None,
        last_edited_timestamp: 1,
    }
}

pub fn bug(id: i64, project_id: i64) -> Bug {
    Bug {
        id: BugId(id),
        project_id: ProjectId(project_id),
        name: format!("Bug {id}"),
        description: String::new(),
        location: String::new(),
        priority_id: 1,
        status_id: 1,
        creation_date: None,
        start_date: None,
        due_date: None,
        completion_date: None,
        last_edited_timestamp: 1,
    }
}

pub fn comment(id: i64, bug_id: i64) -> Comment {
    Comment {
        id: CommentId(id),
        bug_id: BugId(bug_id),
        description: format!("Comment {id}"),
        creation_date: None,
        last_edited_timestamp: 1,
    }
}

/// Priority/status tables shaped like the server's. Status 4 marks completion.
pub fn vocabulary() -> Value {
    json!({
        "priorityOptions": [
            {"id": 1, "option": "None"},
            {"id": 2, "option": "Low"},
            {"id": 3, "option": "High"}
        ],
        "priorityEmptyId": 1,
        "statusOptions": [
            {"id": 1, "option": "Open"},
            {"id": 2, "option": "Planning"},
            {"id": 3, "option": "Testing"},
            {"id": 4, "option": "Completed"}
        ],
        "statusEmptyId": null,
        "statusCompletionId": 4
    })
}

pub fn everything_body(projects: &[Project], bugs: &[Bug], comments: &[Comment]) -> Value {
    json!({
        "projectPriorityStatus": vocabulary(),
        "bugPriorityStatus": vocabulary(),
        "account": account(),
        "projects": projects,
        "bugs": bugs,
        "comments": comments,
    })
}

pub fn login_body(credential: &str, projects: &[Project], bugs: &[Bug]) -> Value {
    let mut body = everything_body(projects, bugs, &[]);
    body["credential"] = Value::String(credential.to_string());
    body
}

pub fn input_errors(field: &str, message: &str) -> Value {
    let mut errors = serde_json::Map::new();
    errors.insert(field.to_string(), Value::String(message.to_string()));
    json!({ "inputErrors": errors })
}

/// Transport that replays canned responses in order and records every
/// request it was given.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Response, ClientError>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Response { status, body }));
        self
    }

    /// Replays a raw body through the same parsing the HTTP transport uses.
    pub fn respond_text(self, status: u16, text: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::from_text(status, text));
        self
    }

    pub fn ok(self, body: Value) -> Self {
        self.respond(200, body)
    }

    pub fn fail_connection(self) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Connection("connection refused".into())));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<&'static str> {
        self.requests().iter().map(|r| r.route.path).collect()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: Request) -> Result<Response, ClientError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Connection("no scripted response left".into())))
    }
}

pub type TestClient = SyncClient<ScriptedTransport, MemoryCredentialStore>;

pub fn client(transport: ScriptedTransport) -> TestClient {
    SyncClient::new(transport, MemoryCredentialStore::new())
}

/// Sqlite credential store in a fresh temp dir. Keep the dir alive for as
/// long as the store is used.
pub async fn create_test_storage() -> (SqliteCredentialStore, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let storage = SqliteCredentialStore::open(dir.path().join("credential.db"))
        .await
        .expect("Failed to open credential storage");
    (storage, dir)
}

/// Everything the fmt subscriber wrote while the guard from `capture_logs`
/// was alive on this thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs a DEBUG-level subscriber for the current thread. `#[tokio::test]`
/// runs on a single thread, so the whole test body is captured.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}
