//! club-app - terminal front end for the club directory
//!
//! Reads `.env` and the environment into a client configuration, keeps the
//! backend session in a local file between runs and prints the directory and
//! events views as plain text.

mod cli;
mod render;

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::Parser;
use club_client::{
    AppwriteRemote, BackendClient, ClientConfig, ClientError, DirectoryView, EventsView,
    Registration, SessionContext,
};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

type Session = SessionContext<AppwriteRemote>;

const DEFAULT_LOG_FILTER: &str = "club_app=info,club_client=info";

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {e:#}");
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with command output
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ClientError>() {
        Some(e) => e.user_message(),
        None => format!("{err:#}"),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().with_session_file(&cli.session_file);
    tracing::debug!(
        endpoint = %config.endpoint,
        session_file = %cli.session_file.display(),
        "Starting club-app"
    );

    let backend = Arc::new(BackendClient::from_config(&config)?);
    let session = SessionContext::new(Arc::clone(&backend));

    match cli.command {
        Command::Whoami => whoami(&session).await,
        Command::Login { email, password } => {
            session.login(&email, &password).await?;
            if let Some(identity) = session.identity() {
                println!("Welcome back, {}.", identity.name);
            }
            if session.member().is_none() {
                println!("No member profile is linked to this account.");
            }
            Ok(())
        }
        Command::Register {
            email,
            password,
            name,
            phone,
            club,
        } => {
            session
                .register(Registration::new(email, password, name, phone, club))
                .await?;
            if let Some(member) = session.member() {
                println!("Welcome to {}, {}.", member.club, member.first_name);
            }
            Ok(())
        }
        Command::Logout => {
            session.logout().await?;
            println!("Signed out.");
            Ok(())
        }
        Command::Directory { query, show } => directory(&session, query, show).await,
        Command::Events => events(backend).await,
    }
}

async fn whoami(session: &Session) -> anyhow::Result<()> {
    session.refresh().await?;
    match session.identity() {
        Some(identity) => println!("{}", render::whoami(&identity, session.member().as_ref())),
        None => println!("Not signed in."),
    }
    Ok(())
}

async fn directory(
    session: &Session,
    query: Option<String>,
    show: Option<i64>,
) -> anyhow::Result<()> {
    session.bootstrap().await?;

    let view = Arc::new(Mutex::new(DirectoryView::new()));
    let task = DirectoryView::mount(&view, Arc::clone(session.backend()), session.identity());
    if let Some(task) = task {
        task.join().await;
    }

    let mut view = view.lock().map_err(|_| anyhow::anyhow!("directory view poisoned"))?;
    view.require_signed_in()?;
    if let Some(message) = view.error() {
        anyhow::bail!("{message}");
    }

    if let Some(id) = show {
        match view.select(id) {
            Some(card) => println!("{}", render::profile(&card)),
            None => println!("No member #{id} in your club."),
        }
        return Ok(());
    }

    if let Some(query) = query {
        view.set_query(query);
    }
    let lines: Vec<String> = view.visible().into_iter().map(render::member_line).collect();
    if lines.is_empty() {
        println!("{}", view.empty_message());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

async fn events(backend: Arc<BackendClient<AppwriteRemote>>) -> anyhow::Result<()> {
    let view = Arc::new(Mutex::new(EventsView::new()));
    EventsView::mount(&view, backend).join().await;

    let view = view.lock().map_err(|_| anyhow::anyhow!("events view poisoned"))?;
    if let Some(message) = view.error() {
        anyhow::bail!("{message}");
    }
    if view.events().is_empty() {
        println!("No upcoming events.");
    }
    for event in view.events() {
        println!("{}", render::event(event));
    }
    Ok(())
}
