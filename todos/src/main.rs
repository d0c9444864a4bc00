//! `checklist`: command-line shell for the todo list.
//!
//! Todo commands resume the session saved in `CHECKLIST_ACCESS_TOKEN` or
//! sign in with `CHECKLIST_EMAIL` / `CHECKLIST_PASSWORD`, load the user's
//! todos, run one command, then print notifications and the resulting
//! list. Account commands talk to the auth service only.

use anyhow::Context;
use checklist_core::environment::SystemClock;
use checklist_todos::config::{BackendConfig, Credentials, SavedSession};
use checklist_todos::providers::{AuthProvider, ChannelNotifier, RestBackend, SignUpOutcome};
use checklist_todos::session::{SessionContext, SessionEvent, SessionEvents, SessionUser};
use checklist_todos::{
    NotificationKind, TodoClient, TodoEnvironment, TodoFilter, TodoId, TodoPatch,
};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Client = TodoClient<RestBackend, RestBackend, ChannelNotifier>;

/// Personal todo list
#[derive(Debug, Parser)]
#[command(name = "checklist", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and print the access token to export as CHECKLIST_ACCESS_TOKEN
    SignIn,
    /// Create an account for CHECKLIST_EMAIL / CHECKLIST_PASSWORD
    SignUp,
    /// Email a password reset link
    ResetPassword {
        /// Account email
        email: String,
    },
    #[command(flatten)]
    Todo(TodoCommand),
}

#[derive(Debug, Subcommand)]
enum TodoCommand {
    /// Show todos
    List {
        /// all, pending or completed
        #[arg(long, default_value_t = TodoFilter::All)]
        filter: TodoFilter,
    },
    /// Create a todo
    Add {
        /// Title
        title: String,
        /// Optional details
        #[arg(long)]
        description: Option<String>,
    },
    /// Mark a todo as completed
    Done {
        /// Todo id
        id: String,
    },
    /// Move a todo back to pending
    Reopen {
        /// Todo id
        id: String,
    },
    /// Change a todo's title and description
    Edit {
        /// Todo id
        id: String,
        /// New title
        #[arg(long)]
        title: String,
        /// New description; an empty value removes it
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a todo
    Rm {
        /// Todo id
        id: String,
    },
    /// End the session
    SignOut,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = BackendConfig::from_env().context("loading backend configuration")?;
    info!(url = %config.url, table = %config.table, "Configuration loaded");
    let backend = RestBackend::new(config).context("building HTTP client")?;

    match cli.command {
        Command::SignIn => {
            let user = sign_in(&backend).await?;
            info!(id = %user.id, "Signed in");
            print_access_token(&backend).await;
            Ok(())
        },
        Command::SignUp => {
            let credentials = Credentials::from_env().context("loading credentials")?;
            let outcome = backend
                .sign_up(&credentials.email, &credentials.password)
                .await
                .context("signing up")?;
            match outcome {
                SignUpOutcome::SignedIn(user) => {
                    info!(id = %user.id, "Account created");
                    print_access_token(&backend).await;
                },
                SignUpOutcome::ConfirmationRequired => {
                    println!("Check your email for the confirmation link.");
                },
            }
            Ok(())
        },
        Command::ResetPassword { email } => {
            backend
                .reset_password(&email)
                .await
                .context("requesting password reset")?;
            println!("Password reset link sent to {}.", email.trim());
            Ok(())
        },
        Command::Todo(command) => run_todo_command(backend, command).await,
    }
}

/// Resume the saved session if it is still valid, otherwise sign in
async fn open_session(backend: &RestBackend) -> anyhow::Result<SessionUser> {
    if let Some(saved) = SavedSession::from_env() {
        backend.set_access_token(saved.access_token).await;
        if let Some(user) = backend.current_user().await? {
            info!(id = %user.id, "Resumed saved session");
            return Ok(user);
        }
        warn!("Saved session expired, signing in with credentials");
    }
    sign_in(backend).await
}

async fn sign_in(backend: &RestBackend) -> anyhow::Result<SessionUser> {
    let credentials = Credentials::from_env().context("loading credentials")?;
    backend
        .sign_in_with_password(&credentials.email, &credentials.password)
        .await
        .context("signing in")
}

async fn print_access_token(backend: &RestBackend) {
    if let Some(token) = backend.access_token().await {
        println!("export CHECKLIST_ACCESS_TOKEN={token}");
    }
}

async fn run_todo_command(backend: RestBackend, command: TodoCommand) -> anyhow::Result<()> {
    let user = open_session(&backend).await?;

    let events = SessionEvents::default();
    let mut session_events = events.subscribe();
    let session = SessionContext::begin(user, &events, &SystemClock);

    let (notifier, mut notifications) = ChannelNotifier::new();
    let client = TodoClient::new(TodoEnvironment::new(
        backend.clone(),
        backend,
        notifier,
        session,
    ));

    let outcome = execute(&client, command).await;

    while let Ok(notification) = notifications.try_recv() {
        match notification.kind {
            NotificationKind::Info => println!("✓ {notification}"),
            NotificationKind::Error => eprintln!("✗ {notification}"),
        }
    }

    let mut signed_out = false;
    while let Ok(event) = session_events.try_recv() {
        if event == SessionEvent::SignedOut {
            println!("Signed out.");
            signed_out = true;
        }
    }

    if outcome.is_ok() && !signed_out {
        print_list(&client).await;
    }

    client.shutdown(Duration::from_secs(5)).await?;
    outcome
}

async fn execute(client: &Client, command: TodoCommand) -> anyhow::Result<()> {
    client.load().await?;

    match command {
        TodoCommand::List { filter } => client.set_filter(filter).await?,
        TodoCommand::Add { title, description } => {
            client.set_form_title(&title).await?;
            if let Some(description) = description {
                client.set_form_description(&description).await?;
            }
            let todo = client.submit_form().await?;
            info!(id = %todo.id, "Added todo");
        },
        TodoCommand::Done { id } => {
            client
                .update(&TodoId::new(id), TodoPatch::completion(true))
                .await?;
        },
        TodoCommand::Reopen { id } => {
            client
                .update(&TodoId::new(id), TodoPatch::completion(false))
                .await?;
        },
        TodoCommand::Edit {
            id,
            title,
            description,
        } => {
            let id = TodoId::new(id);
            client.begin_edit(&id).await?;
            client.edit_title(&id, &title).await?;
            if let Some(description) = description {
                client.edit_description(&id, &description).await?;
            }
            client.save_edit(&id).await?;
        },
        TodoCommand::Rm { id } => client.delete(&TodoId::new(id)).await?,
        TodoCommand::SignOut => client.sign_out().await?,
    }

    Ok(())
}

async fn print_list(client: &Client) {
    let filter = client.filter().await;
    let counts = client.counts().await;
    let visible = client.visible().await;

    println!(
        "{} total · {} pending · {} completed  (showing: {filter})",
        counts.total, counts.pending, counts.completed
    );

    if visible.is_empty() {
        let empty = filter.empty_message(counts.total == 0);
        println!("{}\n{}", empty.headline, empty.hint);
        return;
    }

    for todo in visible {
        let mark = if todo.completed { "[x]" } else { "[ ]" };
        println!("{mark} {}  {}", todo.id, todo.title);
        if let Some(description) = &todo.description {
            println!("      {description}");
        }
    }
}
