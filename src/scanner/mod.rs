/// Discovery of source files missing from the project file.
pub mod sources;

pub use sources::{PendingFile, ScanOptions, find_new_sources};
