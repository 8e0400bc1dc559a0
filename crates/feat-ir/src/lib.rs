pub mod config;
pub mod cursor;
pub mod parse;
pub mod types;
