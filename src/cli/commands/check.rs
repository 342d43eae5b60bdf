//! Achievement check command handler

use chrono::Utc;

use crate::achievements::AchievementEngine;
use crate::config::Config;
use crate::db::Store;

pub async fn cmd_check(config: &Config, user_id: i32) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let Some(user) = store.get_user(user_id).await? else {
        println!("User {user_id} not found.");
        return Ok(());
    };

    let awarded = AchievementEngine::new(&store).check(user_id, Utc::now()).await?;

    if awarded.is_empty() {
        println!("No new achievements for {}.", user.username);
        return Ok(());
    }

    println!("New achievements for {}:", user.username);
    for achievement in awarded {
        println!(
            "  • {} (+{} pts) - {}",
            achievement.name, achievement.points, achievement.description
        );
    }

    Ok(())
}
