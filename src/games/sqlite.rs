use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use time::OffsetDateTime;

use super::{GameStore, StoreError};
use crate::models::game::{ActiveGame, ChannelKey};

/// sqlite-backed store, so games survive a restart.
#[derive(Clone, Debug)]
pub struct SqliteGameStore {
    db: Pool<Sqlite>,
}

#[derive(sqlx::FromRow)]
struct ActiveGameRow {
    channel_id: i64,
    answer: String,
    display_answer: String,
    image_url: String,
    auto_generated: bool,
    started_at: i64,
}

impl TryFrom<ActiveGameRow> for ActiveGame {
    type Error = StoreError;

    fn try_from(row: ActiveGameRow) -> Result<Self, Self::Error> {
        let started_at = OffsetDateTime::from_unix_timestamp(row.started_at).map_err(|e| {
            StoreError::Corrupt {
                channel: row.channel_id as ChannelKey,
                reason: e.to_string(),
            }
        })?;

        Ok(ActiveGame {
            answer: row.answer,
            display_answer: row.display_answer,
            image_url: row.image_url,
            auto_generated: row.auto_generated,
            started_at,
        })
    }
}

impl SqliteGameStore {
    #[tracing::instrument(skip_all)]
    pub async fn connect(db_url: &str) -> Result<Self, StoreError> {
        tracing::info!("initializing database connection...");
        let opts = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);
        let db = SqlitePoolOptions::new()
            .max_connections(20)
            .connect_with(opts)
            .await
            .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when connecting to database"))?;

        Self::new(db).await
    }

    /// wraps an existing pool, running migrations first.
    pub async fn new(db: Pool<Sqlite>) -> Result<Self, StoreError> {
        tracing::info!("running migrations...");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when running migrations"))?;
        tracing::info!("finished running migrations!");

        Ok(Self { db })
    }
}

#[async_trait]
impl GameStore for SqliteGameStore {
    async fn get(&self, channel: ChannelKey) -> Result<Option<ActiveGame>, StoreError> {
        let row = sqlx::query_as::<_, ActiveGameRow>(
            r#"
                SELECT
                    channel_id, answer, display_answer, image_url, auto_generated, started_at
                FROM active_games
                WHERE channel_id = $1;
            "#,
        )
        .bind(channel as i64)
        .fetch_optional(&self.db)
        .await
        .inspect_err(
            |e| tracing::error!(err = ?e, channel_id = channel, "an error occurred when fetching game from db"),
        )?;

        row.map(ActiveGame::try_from).transpose()
    }

    async fn set(&self, channel: ChannelKey, game: ActiveGame) -> Result<(), StoreError> {
        sqlx::query(
            r#"
                INSERT INTO
                    active_games (channel_id, answer, display_answer, image_url, auto_generated, started_at)
                VALUES
                    ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (channel_id)
                DO UPDATE SET
                    answer = excluded.answer,
                    display_answer = excluded.display_answer,
                    image_url = excluded.image_url,
                    auto_generated = excluded.auto_generated,
                    started_at = excluded.started_at;
            "#,
        )
        .bind(channel as i64)
        .bind(&game.answer)
        .bind(&game.display_answer)
        .bind(&game.image_url)
        .bind(game.auto_generated)
        .bind(game.started_at.unix_timestamp())
        .execute(&self.db)
        .await
        .inspect_err(
            |e| tracing::error!(err = ?e, channel_id = channel, "an error occurred when saving game to db"),
        )?;

        Ok(())
    }

    async fn insert_if_absent(
        &self,
        channel: ChannelKey,
        game: ActiveGame,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
                INSERT INTO
                    active_games (channel_id, answer, display_answer, image_url, auto_generated, started_at)
                VALUES
                    ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (channel_id)
                DO NOTHING;
            "#,
        )
        .bind(channel as i64)
        .bind(&game.answer)
        .bind(&game.display_answer)
        .bind(&game.image_url)
        .bind(game.auto_generated)
        .bind(game.started_at.unix_timestamp())
        .execute(&self.db)
        .await
        .inspect_err(
            |e| tracing::error!(err = ?e, channel_id = channel, "an error occurred when inserting game into db"),
        )?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, channel: ChannelKey) -> Result<Option<ActiveGame>, StoreError> {
        let row = sqlx::query_as::<_, ActiveGameRow>(
            r#"
                DELETE FROM active_games
                WHERE channel_id = $1
                RETURNING
                    channel_id, answer, display_answer, image_url, auto_generated, started_at;
            "#,
        )
        .bind(channel as i64)
        .fetch_optional(&self.db)
        .await
        .inspect_err(
            |e| tracing::error!(err = ?e, channel_id = channel, "an error occurred when deleting game from db"),
        )?;

        row.map(ActiveGame::try_from).transpose()
    }

    async fn delete_if_answer(
        &self,
        channel: ChannelKey,
        answer: &str,
    ) -> Result<Option<ActiveGame>, StoreError> {
        let row = sqlx::query_as::<_, ActiveGameRow>(
            r#"
                DELETE FROM active_games
                WHERE channel_id = $1 AND answer = $2
                RETURNING
                    channel_id, answer, display_answer, image_url, auto_generated, started_at;
            "#,
        )
        .bind(channel as i64)
        .bind(answer)
        .fetch_optional(&self.db)
        .await
        .inspect_err(
            |e| tracing::error!(err = ?e, channel_id = channel, "an error occurred when deleting game from db"),
        )?;

        row.map(ActiveGame::try_from).transpose()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM active_games;")
            .fetch_one(&self.db)
            .await
            .inspect_err(
                |e| tracing::error!(err = ?e, "an error occurred when counting games in db"),
            )?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tests::*;

    async fn memory_store() -> SqliteGameStore {
        // one connection, otherwise every connection gets its own empty database.
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        SqliteGameStore::new(db).await.unwrap()
    }

    #[tokio::test]
    async fn sqlite_store_behaves() {
        exercise_store(&memory_store().await).await;
    }

    #[tokio::test]
    async fn sqlite_store_answer_flow() {
        exercise_answer_flow(&memory_store().await).await;
    }

    #[tokio::test]
    async fn games_survive_reconnecting() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("games.db").display());
        let game = ActiveGame::new("Four", "http://render/result/d.png", true);

        {
            let store = SqliteGameStore::connect(&url).await.unwrap();
            assert!(store.insert_if_absent(99, game.clone()).await.unwrap());
            store.db.close().await;
        }

        let store = SqliteGameStore::connect(&url).await.unwrap();
        assert_eq!(store.get(99).await.unwrap(), Some(game));
    }
}
