// Application layer - Use cases and services
pub mod analytics_service;
pub mod monitoring_repository;
pub mod poll_scheduler;
pub mod refresh_coordinator;
pub mod telemetry_store;
