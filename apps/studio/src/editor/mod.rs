//! Live document editing: the commit/undo/redo store, the pure sequence edits
//! it is built from, and the debounced autosave task that persists it.

pub mod autosave;
pub mod edits;
pub mod handlers;
pub mod history;
pub mod store;

pub use autosave::Autosaver;
pub use store::DocumentStore;
