use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // A trick is learned at most once per user, an achievement awarded at
        // most once per user. Inserts rely on these for ON CONFLICT DO NOTHING.
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_progress_user_trick ON user_progress(user_id, trick_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_user_achievements_user_achievement ON user_achievements(user_id, achievement_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_tricks_category ON tricks(category)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_trick_suggestions_status ON trick_suggestions(status)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_trick_suggestions_status")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_tricks_category")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_user_achievements_user_achievement")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_user_progress_user_trick")
            .await?;

        Ok(())
    }
}
