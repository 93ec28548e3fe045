use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, models::WishlistRow, schema};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &reel_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Builds a pool without touching the server. Used by tests that exercise
	/// paths which never reach Postgres.
	pub fn connect_lazy(cfg: &reel_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect_lazy(&cfg.dsn)?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let lock_id: i64 = 73_351_009;
		// Advisory locks are held per connection. Use a single transaction so
		// the lock is scoped to one connection and automatically released when
		// the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	pub async fn add_wishlist(&self, user_id: &str, media_id: &str) -> Result<()> {
		sqlx::query(
			"\
INSERT INTO wishlist_items (user_id, media_id)
VALUES ($1, $2)
ON CONFLICT (user_id, media_id) DO NOTHING",
		)
		.bind(user_id)
		.bind(media_id)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	pub async fn remove_wishlist(&self, user_id: &str, media_id: &str) -> Result<()> {
		sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND media_id = $2")
			.bind(user_id)
			.bind(media_id)
			.execute(&self.pool)
			.await?;

		Ok(())
	}

	pub async fn list_wishlist(&self, user_id: &str) -> Result<Vec<WishlistRow>> {
		let rows = sqlx::query_as(
			"\
SELECT user_id, media_id, added_at
FROM wishlist_items
WHERE user_id = $1
ORDER BY added_at",
		)
		.bind(user_id)
		.fetch_all(&self.pool)
		.await?;

		Ok(rows)
	}
}
