//! Tasklane CLI entry point.
//!
//! Every command prints JSON to stdout. Failures print a JSON error object to
//! stderr and exit with 1 for domain errors, 2 for anything else.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use tasklane_core::app::{
    App, AppBuilder, AppError, CreateProjectRequest, CreateTaskRequest, TaskFilter,
    UpdateProjectRequest, UpdateTaskRequest,
};
use tasklane_core::config::Settings;
use tasklane_core::impls::{SqliteProjectRepository, SqliteTaskRepository, connect, connect_in_memory};
use tasklane_core::observability;

use cli::{Cli, Commands, ProjectCommand, TaskCommand};

const IN_MEMORY_URL: &str = "sqlite::memory:";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::init_tracing(cli.log_directive());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }
    debug!(?settings, "settings loaded");

    let app = build_app(&settings).await?;

    match cli.command {
        Commands::Project(cmd) => run_project(&app, cmd).await,
        Commands::Task(cmd) => run_task(&app, cmd).await,
        Commands::Status { project } => print(&app.summarize_tasks.execute(project).await?),
    }
}

async fn build_app(settings: &Settings) -> anyhow::Result<App> {
    let pool = if settings.database_url == IN_MEMORY_URL {
        connect_in_memory().await
    } else {
        connect(&settings.database_url).await
    };
    let pool = pool.with_context(|| format!("opening database {}", settings.database_url))?;

    let app = AppBuilder::new()
        .settings(settings)
        .project_repository(Arc::new(SqliteProjectRepository::new(pool.clone())))
        .task_repository(Arc::new(SqliteTaskRepository::new(pool)))
        .build()?;
    Ok(app)
}

async fn run_project(app: &App, cmd: ProjectCommand) -> anyhow::Result<()> {
    match cmd {
        ProjectCommand::Create { title, deadline } => print(
            &app.create_project
                .execute(CreateProjectRequest { title, deadline })
                .await?,
        ),
        ProjectCommand::List => print(&app.list_projects.execute().await?),
        ProjectCommand::Show { id } => print(&app.get_project.execute(id).await?),
        ProjectCommand::Update {
            id,
            title,
            deadline,
        } => print(
            &app.update_project
                .execute(id, UpdateProjectRequest { title, deadline })
                .await?,
        ),
        ProjectCommand::Complete { id } => print(&app.complete_project.execute(id).await?),
        ProjectCommand::Reopen { id } => print(&app.reopen_project.execute(id).await?),
        ProjectCommand::Delete { id } => {
            app.delete_project.execute(id).await?;
            print(&json!({ "deleted": id }))
        }
        ProjectCommand::Tasks { id } => print(&app.list_project_tasks.execute(id).await?),
    }
}

async fn run_task(app: &App, cmd: TaskCommand) -> anyhow::Result<()> {
    match cmd {
        TaskCommand::Create {
            title,
            description,
            deadline,
        } => print(
            &app.create_task
                .execute(CreateTaskRequest {
                    title,
                    description,
                    deadline,
                })
                .await?,
        ),
        TaskCommand::List {
            project,
            completed,
            overdue,
        } => print(
            &app.filter_tasks
                .execute(TaskFilter {
                    project_id: project,
                    is_completed: completed,
                    is_overdue: overdue,
                })
                .await?,
        ),
        TaskCommand::Show { id } => print(&app.get_task.execute(id).await?),
        TaskCommand::Update {
            id,
            title,
            description,
            deadline,
        } => print(
            &app.update_task
                .execute(
                    id,
                    UpdateTaskRequest {
                        title,
                        description,
                        deadline,
                    },
                )
                .await?,
        ),
        TaskCommand::Complete { id } => print(&app.complete_task.execute(id).await?),
        TaskCommand::Reopen { id } => print(&app.reopen_task.execute(id).await?),
        TaskCommand::Delete { id } => {
            app.delete_task.execute(id).await?;
            print(&json!({ "deleted": id }))
        }
        TaskCommand::Link { id, project } => print(&app.link_task.execute(id, project).await?),
        TaskCommand::Unlink { id, project } => {
            print(&app.unlink_task.execute(id, project).await?)
        }
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Domain errors carry their kind label; everything else is internal.
fn report(err: &anyhow::Error) -> ExitCode {
    let (label, code) = match err.downcast_ref::<AppError>() {
        Some(AppError::Domain(domain)) => (domain.kind().label(), 1),
        Some(app_err) => (app_err.kind().label(), 2),
        None => ("internal", 2),
    };
    let body = json!({ "error": label, "message": format!("{err:#}") });
    eprintln!("{body}");
    ExitCode::from(code)
}
