mod error;
mod note;
mod store;

pub use error::{Result, StoreError};
pub use store::NotesStore;
