#![allow(missing_docs)]

pub mod ingest;
pub mod session;
pub mod store;

pub use ingest::{IngestError, read_detailed_rows, read_simple_questions};
pub use session::{EditSession, SessionError};
pub use store::{
    InMemoryStore, ListScope, NewSuggestion, ReviewStore, StoreError, provision_instance,
};
