use tracing::info;

use crate::model::{Project, SourceRepository};

/// What happened to one source repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Target repository created and history pushed.
    Created,
    /// History pushed into an existing, empty target repository.
    Resumed,
    SkippedWithContent,
    /// Creation was refused because the name is already taken.
    SkippedAlreadyExists,
    /// Name already migrated from another project in this run.
    SkippedDuplicateName,
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOutcome {
    pub project: String,
    pub repository: String,
    pub outcome: Outcome,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub outcomes: Vec<RepositoryOutcome>,
}

impl MigrationReport {
    pub fn record(&mut self, project: &Project, repository: &SourceRepository, outcome: Outcome) {
        self.outcomes.push(RepositoryOutcome {
            project: project.key.clone(),
            repository: repository.name.clone(),
            outcome,
        });
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|entry| entry.outcome.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &RepositoryOutcome> {
        self.outcomes
            .iter()
            .filter(|entry| entry.outcome.is_failure())
    }

    /// Names of the repositories that ended with `outcome`, in processing order.
    pub fn repositories_with(&self, outcome: &Outcome) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|entry| &entry.outcome == outcome)
            .map(|entry| entry.repository.as_str())
            .collect()
    }

    pub fn log_summary(&self) {
        let count = |outcome: &Outcome| self.repositories_with(outcome).len();

        info!(
            total = self.outcomes.len(),
            created = count(&Outcome::Created),
            resumed = count(&Outcome::Resumed),
            skipped_with_content = count(&Outcome::SkippedWithContent),
            skipped_already_exists = count(&Outcome::SkippedAlreadyExists),
            skipped_duplicate = count(&Outcome::SkippedDuplicateName),
            failed = self.failures().count(),
            "migration finished"
        );
    }
}
