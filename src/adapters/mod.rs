// Adapters - External system implementations

pub mod exec_process;
pub mod toml_config;

// Re-export adapters
pub use exec_process::ProcessToolAdapter;
pub use toml_config::TomlConfigAdapter;
