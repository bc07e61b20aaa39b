use std::collections::{HashMap, HashSet};

use crate::model::TargetRepository;

/// What the migrator does with one source repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationDecision {
    /// No target repository with this name yet.
    Create,
    /// Target already holds history; never written to.
    SkipExistingWithContent,
    /// Target exists but is empty; push into it without creating.
    ResumeExistingEmpty { clone_url: String },
    /// Name already handled earlier in this run from another project.
    SkipDuplicateName,
}

/// Lookup key for a repository name. GitHub treats `Api` and `api` as the
/// same repository.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Classifies a repository by name against the target snapshot and the names
/// already seen in this run, both keyed by [`name_key`]. The duplicate check
/// wins over everything else.
pub fn decide(
    name: &str,
    existing: &HashMap<String, TargetRepository>,
    seen: &HashSet<String>,
) -> MigrationDecision {
    let key = name_key(name);
    if seen.contains(&key) {
        return MigrationDecision::SkipDuplicateName;
    }

    match existing.get(&key) {
        Some(target) if target.has_content() => MigrationDecision::SkipExistingWithContent,
        Some(target) => MigrationDecision::ResumeExistingEmpty {
            clone_url: target.clone_url.clone(),
        },
        None => MigrationDecision::Create,
    }
}
