use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use bugtrack::{
    Action, ClientConfig, Store, SyncClient, SyncOutcome,
    core::{
        containers::ListAction,
        db::{CredentialStore, MemoryCredentialStore, SqliteCredentialStore},
        model::{ListItem, ProjectId},
        reference::EntityKind,
        session,
    },
    logging,
    sync::{
        ReqwestTransport,
        payload::{LoginRequest, RegisterRequest},
    },
};

#[derive(Parser)]
#[command(name = "bugtrack")]
#[command(about = "Command-line client for the bug tracker backend")]
struct Cli {
    /// Path to a TOML config file (falls back to BUGTRACK_CONFIG)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Keep the credential in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Log in and store the credential
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    /// Show the stored session without contacting the server
    Status,
    /// Fetch everything the account owns
    Sync,
    /// List projects in the account's preferred order
    Projects {
        /// Only show projects whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// List the bugs of one project with counts per status
    Bugs {
        #[arg(long, value_name = "ID")]
        project: i64,
        /// Only show bugs whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref()).context("failed to load config")?;
    logging::init(&config.log_level);

    let transport = ReqwestTransport::new(&config.api_base_url, config.request_timeout())?;
    if cli.ephemeral {
        run(cli.command, SyncClient::new(transport, MemoryCredentialStore::new())).await
    } else {
        let storage = SqliteCredentialStore::open(&config.credential_db)
            .await
            .with_context(|| format!("failed to open {}", config.credential_db.display()))?;
        run(cli.command, SyncClient::new(transport, storage)).await
    }
}

async fn run<C: CredentialStore>(
    command: Command,
    client: SyncClient<ReqwestTransport, C>,
) -> anyhow::Result<()> {
    let mut store = Store::new();
    match command {
        Command::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let request = RegisterRequest {
                email,
                password,
                first_name,
                last_name,
            };
            let outcome = client.register(&mut store, &request).await;
            check(&store, outcome)?;
            println!("Registered {}. You can log in now.", request.email);
        }
        Command::Login { email, password } => {
            let outcome = client.login(&mut store, &LoginRequest { email, password }).await;
            check(&store, outcome)?;
            let state = store.state();
            if let Some(account) = &state.account.account {
                println!(
                    "Logged in as {} {} <{}>",
                    account.first_name, account.last_name, account.email
                );
            }
            println!("{} projects, {} bugs", state.project.list.len(), state.bug.list.len());
        }
        Command::Logout => {
            client.logout(&mut store).await;
            println!("Logged out.");
        }
        Command::Status => {
            if !session::rehydrate(&mut store, client.storage()).await? {
                println!("Not logged in.");
                return Ok(());
            }
            if let Some(claims) = store.state().session.claims() {
                println!("Account: {}", claims.account_id);
                if let Some(expires) = claims.expires_at_time() {
                    println!("Credential expires: {expires}");
                }
            }
        }
        Command::Sync => {
            let outcome = client.resume(&mut store).await;
            check(&store, outcome)?;
            if !store.state().is_authenticated() {
                println!("Not logged in.");
                return Ok(());
            }
            let state = store.state();
            println!(
                "{} projects, {} bugs, {} comments",
                state.project.list.len(),
                state.bug.list.len(),
                state.comment.list.len()
            );
        }
        Command::Projects { search } => {
            fetch(&client, &mut store).await?;
            if let Some(keyword) = search {
                let filter = store.state().project.search_filter_sort.clone();
                store.dispatch(Action::Project(ListAction::SetSearchFilterSort(
                    filter.with_keyword(keyword),
                )));
            }
            let state = store.state();
            let options = state.reference.for_kind(EntityKind::Project);
            for project in state.project.visible_list() {
                let status = options
                    .and_then(|o| o.status_label(project.status_id))
                    .unwrap_or("-");
                println!("{:>6}  {:<12}  {}", project.id(), status, project.name());
            }
        }
        Command::Bugs { project, search } => {
            fetch(&client, &mut store).await?;
            if let Some(keyword) = search {
                let filter = store.state().bug.search_filter_sort.clone();
                store.dispatch(Action::Bug(ListAction::SetSearchFilterSort(
                    filter.with_keyword(keyword),
                )));
            }
            let state = store.state();
            let project_id = ProjectId(project);
            if state.project.get(project_id).is_none() {
                bail!("no project with id {project}");
            }
            let options = state.reference.for_kind(EntityKind::Bug);
            for bug in state.bug.visible_bugs_in_project(project_id) {
                let status = options.and_then(|o| o.status_label(bug.status_id)).unwrap_or("-");
                println!("{:>6}  {:<12}  {}", bug.id(), status, bug.name());
            }
            if let Some(options) = options {
                println!();
                for status in &options.status_options {
                    let count = state.bug.count_for_status(project_id, status.id);
                    println!("{:<12} {count}", status.option);
                }
            }
        }
    }
    Ok(())
}

async fn fetch<C: CredentialStore>(
    client: &SyncClient<ReqwestTransport, C>,
    store: &mut Store,
) -> anyhow::Result<()> {
    let outcome = client.resume(store).await;
    check(store, outcome)?;
    if !store.state().is_authenticated() {
        bail!("not logged in");
    }
    Ok(())
}

fn check(store: &Store, outcome: SyncOutcome) -> anyhow::Result<()> {
    if outcome.is_completed() {
        return Ok(());
    }
    for (field, message) in store.state().general.backend_errors.iter() {
        eprintln!("{field}: {message}");
    }
    match outcome {
        SyncOutcome::LoggedOut => bail!("session rejected by server, please log in again"),
        _ => bail!("request failed"),
    }
}
