use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AchievementService, AuthService, CatalogService, ImageService, ProgressService,
    SeaOrmAchievementService, SeaOrmAuthService, SeaOrmCatalogService, SeaOrmProgressService,
    SeaOrmSuggestionService, SeaOrmUserService, SuggestionService, UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub progress_service: Arc<dyn ProgressService>,

    pub suggestion_service: Arc<dyn SuggestionService>,

    pub achievement_service: Arc<dyn AchievementService>,

    pub user_service: Arc<dyn UserService>,

    pub image_service: Arc<ImageService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let catalog_service =
            Arc::new(SeaOrmCatalogService::new(store.clone())) as Arc<dyn CatalogService>;

        let progress_service =
            Arc::new(SeaOrmProgressService::new(store.clone())) as Arc<dyn ProgressService>;

        let suggestion_service =
            Arc::new(SeaOrmSuggestionService::new(store.clone())) as Arc<dyn SuggestionService>;

        let achievement_service = Arc::new(SeaOrmAchievementService::new(store.clone()))
            as Arc<dyn AchievementService>;

        let user_service = Arc::new(SeaOrmUserService::new(store.clone())) as Arc<dyn UserService>;

        let image_service = Arc::new(ImageService::new(
            &config.general.images_path,
            config.uploads.clone(),
        ));

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            auth_service,
            catalog_service,
            progress_service,
            suggestion_service,
            achievement_service,
            user_service,
            image_service,
        }
    }

    /// First-run setup: default admin, catalog import, default achievements.
    /// Every step is idempotent, so it runs on every start.
    pub async fn bootstrap(&self) -> anyhow::Result<()> {
        let config = self.config().await;

        if let Some(admin) = self.store.ensure_default_admin(&config.security).await? {
            warn!(
                username = %admin.username,
                "Created default admin account; change its password"
            );
        }

        if let Some(path) = config.general.tricks_json_path.as_deref() {
            let imported = self
                .catalog_service
                .import_if_empty(Path::new(path))
                .await
                .map_err(|e| anyhow::anyhow!("Catalog import failed: {e}"))?;
            if imported > 0 {
                info!(count = imported, "Trick catalog initialized");
            }
        }

        if config.achievements.seed_defaults {
            self.achievement_service
                .seed_defaults()
                .await
                .map_err(|e| anyhow::anyhow!("Seeding achievements failed: {e}"))?;
        }

        Ok(())
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
