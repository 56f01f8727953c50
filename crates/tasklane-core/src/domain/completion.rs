//! Completion propagation between tasks and their project.

use super::errors::DomainResult;
use super::project::Project;
use super::task::Task;

/// Keeps a project's completion state in step with its tasks.
///
/// Pure: it mutates the project it is given and nothing else. Persisting the
/// result is the caller's job.
#[derive(Debug, Clone, Copy)]
pub struct ProjectCompletionService {
    auto_complete_enabled: bool,
}

impl ProjectCompletionService {
    pub fn new(auto_complete_enabled: bool) -> Self {
        Self {
            auto_complete_enabled,
        }
    }

    pub fn auto_complete_enabled(&self) -> bool {
        self.auto_complete_enabled
    }

    /// Called after one of the project's tasks completed.
    ///
    /// Returns `true` when the project was completed as a side effect.
    pub fn handle_task_completed(
        &self,
        project: &mut Project,
        all_project_tasks: &[Task],
    ) -> DomainResult<bool> {
        if !project.should_auto_complete(all_project_tasks, self.auto_complete_enabled) {
            return Ok(false);
        }
        project.mark_as_completed(all_project_tasks)?;
        Ok(true)
    }

    /// Called after one of the project's tasks reopened. Not behind the flag.
    ///
    /// Returns `true` when the project was reopened as a side effect.
    pub fn handle_task_reopened(&self, project: &mut Project) -> DomainResult<bool> {
        if !project.is_completed {
            return Ok(false);
        }
        project.reopen()?;
        Ok(true)
    }
}
