//! `SeaORM` implementation of the `CatalogService` trait.

use std::path::Path;

use async_trait::async_trait;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{info, warn};

use crate::db::{NewTrick, Store};
use crate::entities::tricks;
use crate::services::catalog_service::{
    CatalogError, CatalogFile, CatalogService, QuizOption, QuizQuestion,
};

const QUIZ_PROMPT: &str = "What is this trick called?";
const WRONG_OPTIONS: usize = 3;

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn validate(trick: &NewTrick) -> Result<(), CatalogError> {
    if trick.name.trim().is_empty() {
        return Err(CatalogError::Validation("Trick name is required".to_string()));
    }
    if trick.category.trim().is_empty() {
        return Err(CatalogError::Validation("Category is required".to_string()));
    }
    Ok(())
}

/// Builds a question from the candidate pool and every trick in the catalog.
fn build_quiz(candidates: &[tricks::Model], all: &[tricks::Model]) -> Option<QuizQuestion> {
    let mut rng = rand::rng();
    let correct = candidates.choose(&mut rng)?;

    let others: Vec<&tricks::Model> = all.iter().filter(|t| t.id != correct.id).collect();
    let mut options: Vec<QuizOption> = others
        .choose_multiple(&mut rng, WRONG_OPTIONS)
        .map(|t| QuizOption {
            id: t.id,
            name: t.name.clone(),
        })
        .collect();

    options.push(QuizOption {
        id: correct.id,
        name: correct.name.clone(),
    });
    options.shuffle(&mut rng);

    Some(QuizQuestion {
        question: QUIZ_PROMPT.to_string(),
        image_url: correct.image_url.clone(),
        category: correct.category.clone(),
        options,
        correct_answer_id: correct.id,
    })
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list(&self, category: Option<&str>) -> Result<Vec<tricks::Model>, CatalogError> {
        Ok(self.store.list_tricks(category).await?)
    }

    async fn get(&self, id: i32) -> Result<tricks::Model, CatalogError> {
        self.store
            .get_trick(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.store.trick_categories().await?)
    }

    async fn create(&self, trick: NewTrick) -> Result<tricks::Model, CatalogError> {
        validate(&trick)?;
        let created = self.store.create_trick(trick).await?;
        info!(trick_id = created.id, name = %created.name, "Trick created");
        Ok(created)
    }

    async fn update(&self, id: i32, trick: NewTrick) -> Result<tricks::Model, CatalogError> {
        validate(&trick)?;
        self.store
            .update_trick(id, trick)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        if !self.store.delete_trick(id).await? {
            return Err(CatalogError::NotFound(id));
        }
        info!(trick_id = id, "Trick deleted");
        Ok(())
    }

    async fn random_quiz(&self, category: Option<&str>) -> Result<QuizQuestion, CatalogError> {
        let all = self.store.list_tricks(None).await?;
        let candidates = match category {
            Some(category) => all
                .iter()
                .filter(|t| t.category == category)
                .cloned()
                .collect(),
            None => all.clone(),
        };

        build_quiz(&candidates, &all).ok_or(CatalogError::Empty)
    }

    async fn import_if_empty(&self, path: &Path) -> Result<usize, CatalogError> {
        if self.store.count_tricks().await? > 0 {
            return Ok(0);
        }

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Catalog file not found, skipping import");
                return Ok(0);
            }
            Err(e) => {
                return Err(CatalogError::Internal(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        let file: CatalogFile = serde_json::from_str(&content).map_err(|e| {
            CatalogError::Validation(format!("Invalid catalog file {}: {e}", path.display()))
        })?;

        let tricks: Vec<NewTrick> = file.tricks.into_iter().map(NewTrick::from).collect();
        let imported = self.store.import_tricks(tricks).await?;

        info!(count = imported, path = %path.display(), "Imported trick catalog");
        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn trick(id: i32, category: &str) -> tricks::Model {
        tricks::Model {
            id,
            name: format!("Trick {id}"),
            category: category.to_string(),
            description: String::new(),
            image_url: None,
            technique: None,
            video_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn quiz_has_correct_answer_among_four_distinct_options() {
        let all: Vec<_> = (1..=6).map(|id| trick(id, "spins")).collect();
        let quiz = build_quiz(&all, &all).unwrap();

        assert_eq!(quiz.options.len(), 4);
        assert!(quiz.options.iter().any(|o| o.id == quiz.correct_answer_id));

        let mut ids: Vec<i32> = quiz.options.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn quiz_with_small_catalog_uses_what_exists() {
        let all = vec![trick(1, "spins"), trick(2, "grabs")];
        let candidates = vec![all[1].clone()];
        let quiz = build_quiz(&candidates, &all).unwrap();

        assert_eq!(quiz.correct_answer_id, 2);
        assert_eq!(quiz.category, "grabs");
        assert_eq!(quiz.options.len(), 2);
    }

    #[test]
    fn quiz_without_candidates_is_none() {
        let all = vec![trick(1, "spins")];
        assert!(build_quiz(&[], &all).is_none());
    }

    #[test]
    fn catalog_file_parses_optional_fields() {
        let json = r#"{"tricks": [
            {"name": "Ollie", "category": "basics", "description": "Pop", "image": "/images/ollie.png"},
            {"name": "Nose Press", "category": "jibbing"}
        ]}"#;

        let file: CatalogFile = serde_json::from_str(json).unwrap();
        let tricks: Vec<NewTrick> = file.tricks.into_iter().map(NewTrick::from).collect();

        assert_eq!(tricks.len(), 2);
        assert_eq!(tricks[0].image_url.as_deref(), Some("/images/ollie.png"));
        assert!(tricks[1].description.is_empty());
        assert!(tricks[1].video_url.is_none());
    }

    #[test]
    fn blank_names_are_rejected() {
        let trick = NewTrick {
            name: "  ".to_string(),
            category: "spins".to_string(),
            ..NewTrick::default()
        };
        assert!(matches!(validate(&trick), Err(CatalogError::Validation(_))));
    }
}
