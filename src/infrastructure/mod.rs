// Infrastructure layer - External dependencies and adapters
pub mod coldchain_api;
pub mod config;
