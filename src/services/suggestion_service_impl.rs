//! `SeaORM` implementation of the `SuggestionService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{Moderation, NewTrick, Store};
use crate::domain::{Role, SuggestionStatus};
use crate::entities::trick_suggestions;
use crate::services::suggestion_service::{
    ModerationResult, SuggestionDto, SuggestionError, SuggestionService,
};

pub struct SeaOrmSuggestionService {
    store: Store,
}

impl SeaOrmSuggestionService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn validate(trick: &NewTrick) -> Result<(), SuggestionError> {
    if trick.name.trim().is_empty() || trick.category.trim().is_empty() {
        return Err(SuggestionError::Validation(
            "Name and category are required".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl SuggestionService for SeaOrmSuggestionService {
    async fn create(
        &self,
        user_id: i32,
        trick: NewTrick,
    ) -> Result<trick_suggestions::Model, SuggestionError> {
        validate(&trick)?;

        let suggestion = self.store.create_suggestion(user_id, trick).await?;
        metrics::counter!("suggestions_created_total").increment(1);
        info!(suggestion_id = suggestion.id, user_id, "Suggestion submitted");

        Ok(suggestion)
    }

    async fn list(
        &self,
        status: Option<SuggestionStatus>,
    ) -> Result<Vec<SuggestionDto>, SuggestionError> {
        let rows = self.store.list_suggestions(status).await?;
        Ok(rows.into_iter().map(SuggestionDto::from).collect())
    }

    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<trick_suggestions::Model>, SuggestionError> {
        Ok(self.store.list_user_suggestions(user_id).await?)
    }

    async fn moderate(
        &self,
        id: i32,
        moderator_id: i32,
        status: SuggestionStatus,
        comment: Option<String>,
    ) -> Result<ModerationResult, SuggestionError> {
        if !status.is_terminal() {
            return Err(SuggestionError::Validation(
                "Status must be 'approved' or 'rejected'".to_string(),
            ));
        }

        match self
            .store
            .moderate_suggestion(id, moderator_id, status, comment)
            .await?
        {
            Moderation::Done { suggestion, trick } => {
                info!(
                    suggestion_id = suggestion.id,
                    moderator_id,
                    status = %status,
                    trick_id = trick.as_ref().map(|t| t.id),
                    "Suggestion moderated"
                );
                Ok(ModerationResult {
                    message: format!("Suggestion {status}"),
                    status,
                    trick_id: trick.map(|t| t.id),
                })
            }
            Moderation::NotFound => Err(SuggestionError::NotFound(id)),
            Moderation::AlreadyModerated(current) => {
                Err(SuggestionError::AlreadyModerated(current))
            }
        }
    }

    async fn delete(
        &self,
        id: i32,
        actor_id: i32,
        actor_role: Role,
    ) -> Result<(), SuggestionError> {
        let suggestion = self
            .store
            .get_suggestion(id)
            .await?
            .ok_or(SuggestionError::NotFound(id))?;

        if suggestion.suggested_by != actor_id && !actor_role.is_staff() {
            return Err(SuggestionError::Forbidden);
        }

        if !self.store.delete_suggestion(id).await? {
            return Err(SuggestionError::NotFound(id));
        }

        info!(suggestion_id = id, actor_id, "Suggestion deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_need_name_and_category() {
        let missing_category = NewTrick {
            name: "Backside 180".to_string(),
            ..NewTrick::default()
        };
        assert!(matches!(
            validate(&missing_category),
            Err(SuggestionError::Validation(_))
        ));

        let complete = NewTrick {
            name: "Backside 180".to_string(),
            category: "spins".to_string(),
            ..NewTrick::default()
        };
        assert!(validate(&complete).is_ok());
    }
}
