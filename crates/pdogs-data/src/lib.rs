pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, Format, load_level};
pub use schema::{LevelFile, LoadedLevel};
