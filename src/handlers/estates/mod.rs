pub mod collection;
pub mod record;

// Re-export handler functions for use in routing
pub use self::collection::get as collection_get;
pub use self::collection::post as collection_post;

pub use self::record::delete as record_delete;
pub use self::record::get as record_get;
pub use self::record::put as record_put;

pub(crate) const NOT_FOUND: &str = "Digital estate not found";
