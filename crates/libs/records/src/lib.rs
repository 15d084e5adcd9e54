use serde::Serialize;

pub mod alum;
pub mod campus;
pub mod fb_ignore;

pub use alum::Alum;
pub use campus::Campus;
pub use fb_ignore::NonAlumContact;

/// A document that can be indexed in Elasticsearch.
pub trait Document: Serialize {
    /// Value used as the Elasticsearch `_id`.
    fn id(&self) -> String;
}
