//! Command-line interface definition using clap.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tasklane_core::domain::{ProjectId, TaskId};
use tasklane_core::observability::DEFAULT_DIRECTIVE;

/// Tasklane - projects, tasks and their deadlines
#[derive(Parser, Debug)]
#[command(name = "tasklane")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML settings file
    #[arg(short, long, env = "TASKLANE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Database URL, overriding the settings file and environment
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Filter directive used when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => DEFAULT_DIRECTIVE,
            1 => "tasklane=debug",
            _ => "debug",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Count open, completed and overdue tasks
    Status {
        /// Restrict to one project
        #[arg(long)]
        project: Option<ProjectId>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Create a project (the deadline must be in the future)
    Create {
        title: String,

        /// RFC 3339 timestamp, e.g. 2030-01-31T17:00:00Z
        #[arg(long)]
        deadline: DateTime<Utc>,
    },

    /// List all projects
    List,

    /// Show one project
    Show { id: ProjectId },

    /// Change title and/or deadline
    Update {
        id: ProjectId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        deadline: Option<DateTime<Utc>>,
    },

    /// Complete a project whose tasks are all completed
    Complete { id: ProjectId },

    /// Reopen a completed project
    Reopen { id: ProjectId },

    /// Delete a project (its tasks are unlinked, not deleted)
    Delete { id: ProjectId },

    /// List the tasks linked to a project
    Tasks { id: ProjectId },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Create an unlinked task
    Create {
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// RFC 3339 timestamp; must not be in the past
        #[arg(long)]
        deadline: Option<DateTime<Utc>>,
    },

    /// List tasks, optionally filtered
    List {
        #[arg(long)]
        project: Option<ProjectId>,

        #[arg(long)]
        completed: Option<bool>,

        #[arg(long)]
        overdue: Option<bool>,
    },

    /// Show one task
    Show { id: TaskId },

    /// Change title, description and/or deadline
    Update {
        id: TaskId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        deadline: Option<DateTime<Utc>>,
    },

    /// Complete a task (may complete its project)
    Complete { id: TaskId },

    /// Reopen a task (reopens a completed project)
    Reopen { id: TaskId },

    /// Delete a task
    Delete { id: TaskId },

    /// Link a task to a project
    Link { id: TaskId, project: ProjectId },

    /// Unlink a task from a project
    Unlink { id: TaskId, project: ProjectId },
}
