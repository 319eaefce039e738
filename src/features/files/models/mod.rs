mod category;
mod file;

pub use category::{FileCategory, FileCollection};
pub use file::{FileMeta, FileRecord, NewFile};
