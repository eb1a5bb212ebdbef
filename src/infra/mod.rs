mod clipboard;
mod config;
mod ingest;

pub use clipboard::*;
pub use config::*;
pub use ingest::*;
