//! Application state - shared across all handlers.

use std::collections::HashSet;
use std::sync::Arc;

use yatube_core::ports::{GroupRepository, PostRepository, UserRepository};
use yatube_core::{GroupService, Paginator, PostService};
use yatube_infra::InMemoryStore;

#[cfg(feature = "postgres")]
use yatube_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use yatube_infra::database::{
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

pub const USER_ROLE: &str = "user";
pub const ADMIN_ROLE: &str = "admin";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub groups: Arc<GroupService>,
    pub users: Arc<dyn UserRepository>,
    pub admin_usernames: Arc<HashSet<String>>,
    pub storage: &'static str,
}

/// The three repositories behind the services.
struct Repositories {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    storage: &'static str,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            posts: Arc::new(store.posts()),
            groups: Arc::new(store.groups()),
            users: Arc::new(store.users()),
            storage: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> Self {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => Self {
                posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
                groups: Arc::new(PostgresGroupRepository::new(connections.main.clone())),
                users: Arc::new(PostgresUserRepository::new(connections.main)),
                storage: "postgres",
            },
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory store");
        Self::in_memory()
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Repositories::connect(config).await;
        let state =
            Self::from_repositories(repos, config.pagination, config.admin_usernames.clone());

        tracing::info!(
            storage = state.storage,
            page_size = state.posts.paginator().page_size(),
            "Application state initialized"
        );
        state
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(pagination: Paginator, admin_usernames: HashSet<String>) -> Self {
        Self::from_repositories(Repositories::in_memory(), pagination, admin_usernames)
    }

    fn from_repositories(
        repos: Repositories,
        pagination: Paginator,
        admin_usernames: HashSet<String>,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::new(
                repos.posts,
                repos.groups.clone(),
                repos.users.clone(),
                pagination,
            )),
            groups: Arc::new(GroupService::new(repos.groups)),
            users: repos.users,
            admin_usernames: Arc::new(admin_usernames),
            storage: repos.storage,
        }
    }

    /// Roles carried in the access token of `username`.
    pub fn roles_for(&self, username: &str) -> Vec<String> {
        let mut roles = vec![USER_ROLE.to_string()];
        if self.admin_usernames.contains(username) {
            roles.push(ADMIN_ROLE.to_string());
        }
        roles
    }
}
