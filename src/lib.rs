pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{html::HtmlRenderer, storage::LocalStorage};
pub use crate::core::{
    engine::MapEngine, engine::RenderSummary, loader::DataLoader, renderer::MapRenderer,
};
pub use utils::error::{MapError, Result};
