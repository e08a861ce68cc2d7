pub mod config;
pub mod enrich;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod process;
pub mod source;
