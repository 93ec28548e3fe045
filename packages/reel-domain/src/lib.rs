pub mod item;
pub mod media_id;

pub use item::{MAX_SCORE, MediaItem, MediaKind, MediaPayload, placeholder_image, score_from_similarity};
pub use media_id::{EPHEMERAL_PREFIX, MediaId};
