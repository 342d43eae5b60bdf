use crate::entities::{prelude::*, tricks};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Fields of a trick as supplied by staff, imports or approved suggestions.
#[derive(Debug, Clone, Default)]
pub struct NewTrick {
    pub name: String,
    pub category: String,
    pub description: String,
    pub image_url: Option<String>,
    pub technique: Option<String>,
    pub video_url: Option<String>,
}

impl NewTrick {
    pub(crate) fn into_active_model(self, now: chrono::DateTime<chrono::Utc>) -> tricks::ActiveModel {
        tricks::ActiveModel {
            name: Set(self.name),
            category: Set(self.category),
            description: Set(self.description),
            image_url: Set(self.image_url),
            technique: Set(self.technique),
            video_url: Set(self.video_url),
            created_at: Set(now),
            ..Default::default()
        }
    }
}

pub struct TrickRepository {
    conn: DatabaseConnection,
}

impl TrickRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<tricks::Model>> {
        let mut query = Tricks::find();
        if let Some(category) = category {
            query = query.filter(tricks::Column::Category.eq(category));
        }

        let rows = query
            .order_by_asc(tricks::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list tricks")?;

        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Option<tricks::Model>> {
        let trick = Tricks::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query trick")?;

        Ok(trick)
    }

    pub async fn categories(&self) -> Result<Vec<String>> {
        let categories: Vec<String> = Tricks::find()
            .select_only()
            .column(tricks::Column::Category)
            .distinct()
            .order_by_asc(tricks::Column::Category)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to list categories")?;

        Ok(categories)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Tricks::find().count(&self.conn).await?)
    }

    pub async fn count_in_category(&self, category: &str) -> Result<u64> {
        let count = Tricks::find()
            .filter(tricks::Column::Category.eq(category))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    /// Number of tricks per category, ordered by category name.
    pub async fn category_totals(&self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = Tricks::find()
            .select_only()
            .column(tricks::Column::Category)
            .column_as(tricks::Column::Id.count(), "total")
            .group_by(tricks::Column::Category)
            .order_by_asc(tricks::Column::Category)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count tricks per category")?;

        Ok(rows)
    }

    pub async fn create(&self, trick: NewTrick) -> Result<tricks::Model> {
        let model = trick
            .into_active_model(chrono::Utc::now())
            .insert(&self.conn)
            .await
            .context("Failed to insert trick")?;

        Ok(model)
    }

    pub async fn insert_many(&self, tricks_in: Vec<NewTrick>) -> Result<usize> {
        if tricks_in.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now();
        let count = tricks_in.len();
        let models: Vec<tricks::ActiveModel> = tricks_in
            .into_iter()
            .map(|t| t.into_active_model(now))
            .collect();

        Tricks::insert_many(models)
            .exec(&self.conn)
            .await
            .context("Failed to import tricks")?;

        Ok(count)
    }

    /// Replaces every editable field. Returns `None` when the trick is gone.
    pub async fn update(&self, id: i32, trick: NewTrick) -> Result<Option<tricks::Model>> {
        let Some(existing) = Tricks::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: tricks::ActiveModel = existing.into();
        active.name = Set(trick.name);
        active.category = Set(trick.category);
        active.description = Set(trick.description);
        active.image_url = Set(trick.image_url);
        active.technique = Set(trick.technique);
        active.video_url = Set(trick.video_url);

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update trick")?;

        Ok(Some(updated))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Tricks::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
