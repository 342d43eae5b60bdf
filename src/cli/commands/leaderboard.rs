//! Leaderboard command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::achievement_service::rank_rows;

pub async fn cmd_leaderboard(config: &Config, limit: Option<u64>) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let limit = limit
        .unwrap_or(config.achievements.leaderboard_default_limit)
        .clamp(1, config.achievements.leaderboard_max_limit);
    let entries = rank_rows(store.leaderboard(limit).await?);

    if entries.is_empty() {
        println!("No users yet.");
        return Ok(());
    }

    println!("{:>4}  {:<24} {:>8} {:>6}", "Rank", "User", "Points", "Badges");
    println!("{:-<46}", "");

    for entry in entries {
        println!(
            "{:>4}  {:<24} {:>8} {:>6}",
            entry.rank, entry.username, entry.total_points, entry.achievements_count
        );
    }

    Ok(())
}
