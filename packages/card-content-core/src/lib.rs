//! Card content editing core: data model, snapshot/working-copy tracking,
//! section-scoped mutations, and apply/discard synchronization against a
//! remote content store.

pub mod config;
pub mod editor;
pub mod error;
pub mod feed;
pub mod mutation;
pub mod snapshot;
pub mod store;
pub mod tracking;
pub mod types;

pub use editor::{Editor, EditorHandle, EditorPhase, EditorStatus};
pub use error::{EditorError, ValidationError};
pub use store::{ContentStore, StoreError};
pub use types::{CardContent, CardDocument, SectionKind};
