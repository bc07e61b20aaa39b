use serde::Serialize;

/// A source-side grouping of repositories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    pub key: String,
    pub name: String,
    pub description: String,
}

/// A repository as listed by the source host.
///
/// `name` is only unique within its project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRepository {
    pub name: String,
    pub slug: String,
    /// HTTP clone URL, absent when the source offers no `http` clone link.
    pub clone_url: Option<String>,
}

/// A repository already present in the target organization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetRepository {
    pub name: String,
    pub clone_url: String,
    pub size: u64,
}

impl TargetRepository {
    pub fn has_content(&self) -> bool {
        self.size > 0
    }
}

/// Body of a repository creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
}

impl NewRepository {
    /// Public repository carrying a description that points back at its origin.
    pub fn migrated_from(project: &Project, repository: &SourceRepository) -> Self {
        Self {
            name: repository.name.clone(),
            description: format!("Migrated from {} - {}.", project.name, repository.name),
            private: false,
        }
    }
}
