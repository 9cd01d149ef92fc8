//! Domain-level error types.

use thiserror::Error;

/// Input rejected by one of the domain validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Post text must not be empty")]
    EmptyText,

    #[error("Select a valid group: {0} is not one of the available groups")]
    UnknownGroup(uuid::Uuid),

    #[error("Slug must consist of letters, numbers, underscores or hyphens (max 50 characters)")]
    InvalidSlug(String),

    #[error("Group title must not be empty")]
    EmptyTitle,

    #[error("Group title must be at most {max} characters")]
    TitleTooLong { max: usize },

    #[error("Username may contain only letters, digits and @/./+/-/_ (max 150 characters)")]
    InvalidUsername(String),
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Unique constraint violation: {0}")]
    Duplicate(String),

    #[error("Referenced entity missing: {0}")]
    MissingReference(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "entity",
                key: String::new(),
            },
            RepoError::Duplicate(msg) => DomainError::Duplicate(msg),
            RepoError::MissingReference(msg) => DomainError::NotFound {
                entity_type: "referenced entity",
                key: msg,
            },
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}
