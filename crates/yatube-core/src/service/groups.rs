use std::sync::Arc;

use crate::domain::{Group, NewGroup};
use crate::error::DomainError;
use crate::ports::GroupRepository;
use crate::validation::{validate_slug, validate_title};

/// Administrative operations on groups.
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn create_group(&self, input: NewGroup) -> Result<Group, DomainError> {
        validate_title(&input.title)?;
        validate_slug(&input.slug)?;

        if self.groups.find_by_slug(&input.slug).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "Group with slug '{}' already exists",
                input.slug
            )));
        }

        let group = Group::new(input.title, input.slug, input.description);
        let group = self.groups.save(group).await?;

        tracing::info!(group_id = %group.id, slug = %group.slug, "Group created");
        Ok(group)
    }

    pub async fn get_group(&self, slug: &str) -> Result<Group, DomainError> {
        self.groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))
    }

    /// Groups offered as choices on the post form, ordered by title.
    pub async fn list_groups(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.find_all().await?)
    }

    /// Remove a group. Its posts stay, with their group cleared.
    pub async fn delete_group(&self, slug: &str) -> Result<(), DomainError> {
        let group = self.get_group(slug).await?;
        self.groups.delete(group.id).await?;

        tracing::info!(group_id = %group.id, slug = %slug, "Group deleted");
        Ok(())
    }
}
