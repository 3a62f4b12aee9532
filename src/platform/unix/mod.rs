//! Unix-specific platform implementations

mod filesystem;
mod paths;
mod shell;
mod signals;

pub use filesystem::UnixFilesystem;
pub use paths::UnixPaths;
pub use shell::UnixShell;
pub use signals::UnixSignals;
