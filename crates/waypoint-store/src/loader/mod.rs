//! Loading route definitions from seed files.

mod file;
mod format;

pub use file::RouteFileLoader;
pub use format::RouteFileFormat;
