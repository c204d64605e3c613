//! Save files and debounced autosave.

pub mod debounce;
pub mod save_manager;

pub use debounce::{DebouncedSaver, SaveTarget};
pub use save_manager::{SaveError, SaveManager};
