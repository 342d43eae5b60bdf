use crate::db::repositories::trick::NewTrick;
use crate::domain::SuggestionStatus;
use crate::entities::{prelude::*, trick_suggestions, tricks, users};
use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;

/// Suggestion row together with the usernames of its author and moderator.
#[derive(Debug, Clone)]
pub struct SuggestionWithUsers {
    pub suggestion: trick_suggestions::Model,
    pub suggester: Option<(i32, String)>,
    pub moderator: Option<(i32, String)>,
}

/// Outcome of a moderation attempt.
#[derive(Debug)]
pub enum Moderation {
    Done {
        suggestion: trick_suggestions::Model,
        trick: Option<tricks::Model>,
    },
    NotFound,
    AlreadyModerated(SuggestionStatus),
}

pub struct SuggestionRepository {
    conn: DatabaseConnection,
}

impl SuggestionRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, user_id: i32, trick: NewTrick) -> Result<trick_suggestions::Model> {
        let model = trick_suggestions::ActiveModel {
            name: Set(trick.name),
            category: Set(trick.category),
            description: Set(trick.description),
            image_url: Set(trick.image_url),
            technique: Set(trick.technique),
            video_url: Set(trick.video_url),
            suggested_by: Set(user_id),
            status: Set(SuggestionStatus::Pending),
            moderated_by: Set(None),
            moderation_comment: Set(None),
            created_at: Set(Utc::now()),
            moderated_at: Set(None),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert suggestion")?;

        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<trick_suggestions::Model>> {
        Ok(TrickSuggestions::find_by_id(id).one(&self.conn).await?)
    }

    /// Newest first, optionally restricted to one status.
    pub async fn list(&self, status: Option<SuggestionStatus>) -> Result<Vec<SuggestionWithUsers>> {
        let mut query = TrickSuggestions::find();
        if let Some(status) = status {
            query = query.filter(trick_suggestions::Column::Status.eq(status));
        }

        let rows = query
            .order_by_desc(trick_suggestions::Column::CreatedAt)
            .order_by_desc(trick_suggestions::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list suggestions")?;

        self.attach_users(rows).await
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<trick_suggestions::Model>> {
        let rows = TrickSuggestions::find()
            .filter(trick_suggestions::Column::SuggestedBy.eq(user_id))
            .order_by_desc(trick_suggestions::Column::CreatedAt)
            .order_by_desc(trick_suggestions::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn count_by_user(&self, user_id: i32) -> Result<u64> {
        let count = TrickSuggestions::find()
            .filter(trick_suggestions::Column::SuggestedBy.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    /// Moves a pending suggestion to `status`. Approval inserts the trick in
    /// the same transaction. The status change is a conditional update on
    /// `pending`, so of two concurrent moderators only one succeeds.
    pub async fn moderate(
        &self,
        id: i32,
        moderator_id: i32,
        status: SuggestionStatus,
        comment: Option<String>,
    ) -> Result<Moderation> {
        let txn = self.conn.begin().await?;
        let now = Utc::now();

        let claimed = TrickSuggestions::update_many()
            .set(trick_suggestions::ActiveModel {
                status: Set(status),
                moderated_by: Set(Some(moderator_id)),
                moderation_comment: Set(comment),
                moderated_at: Set(Some(now)),
                ..Default::default()
            })
            .filter(trick_suggestions::Column::Id.eq(id))
            .filter(trick_suggestions::Column::Status.eq(SuggestionStatus::Pending))
            .exec(&txn)
            .await
            .context("Failed to update suggestion status")?;

        let Some(suggestion) = TrickSuggestions::find_by_id(id).one(&txn).await? else {
            return Ok(Moderation::NotFound);
        };

        if claimed.rows_affected == 0 {
            return Ok(Moderation::AlreadyModerated(suggestion.status));
        }

        let trick = if status == SuggestionStatus::Approved {
            let new_trick = NewTrick {
                name: suggestion.name.clone(),
                category: suggestion.category.clone(),
                description: suggestion.description.clone(),
                image_url: suggestion.image_url.clone(),
                technique: suggestion.technique.clone(),
                video_url: suggestion.video_url.clone(),
            };
            Some(
                new_trick
                    .into_active_model(now)
                    .insert(&txn)
                    .await
                    .context("Failed to create trick from suggestion")?,
            )
        } else {
            None
        };

        txn.commit().await?;

        Ok(Moderation::Done { suggestion, trick })
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = TrickSuggestions::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    async fn attach_users(
        &self,
        rows: Vec<trick_suggestions::Model>,
    ) -> Result<Vec<SuggestionWithUsers>> {
        let mut ids: Vec<i32> = rows
            .iter()
            .flat_map(|s| std::iter::once(s.suggested_by).chain(s.moderated_by))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let names: HashMap<i32, String> = if ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(users::Column::Id.is_in(ids))
                .all(&self.conn)
                .await
                .context("Failed to load suggestion users")?
                .into_iter()
                .map(|u| (u.id, u.username))
                .collect()
        };

        let lookup = |id: i32| names.get(&id).map(|name| (id, name.clone()));

        Ok(rows
            .into_iter()
            .map(|suggestion| SuggestionWithUsers {
                suggester: lookup(suggestion.suggested_by),
                moderator: suggestion.moderated_by.and_then(lookup),
                suggestion,
            })
            .collect())
    }
}
