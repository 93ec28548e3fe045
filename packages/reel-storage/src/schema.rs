/// Relational schema for the wishlist store.
///
/// The pair is the primary key, which makes adds naturally idempotent.
pub fn render_schema() -> String {
	"\
CREATE TABLE IF NOT EXISTS wishlist_items (
	user_id TEXT NOT NULL,
	media_id TEXT NOT NULL,
	added_at TIMESTAMPTZ NOT NULL DEFAULT now(),
	PRIMARY KEY (user_id, media_id)
);
CREATE INDEX IF NOT EXISTS wishlist_items_user_idx ON wishlist_items (user_id, added_at)"
		.to_string()
}
