//! Seed command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    state.bootstrap().await?;

    let tricks = state.store.count_tricks().await?;
    let achievements = state.store.count_achievement_definitions().await?;

    println!("Database ready at {}", config.general.database_path);
    println!("  Tricks:       {tricks}");
    println!("  Achievements: {achievements}");

    Ok(())
}
