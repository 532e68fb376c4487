mod compare;
mod file_copy;
mod metadata;

pub use compare::file_needs_copy;
pub use file_copy::copy_file;
