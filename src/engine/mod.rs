//! Engine module: CLI surface and file fingerprinting helpers.

pub mod arg_parser;
pub mod handlers;
pub mod hashing;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use handlers::handle_run;
pub use hashing::hash_file;
pub use tools::{glob_match, matches_pattern};
