// Domain layer - Pure data models
pub mod connection;
pub mod insight;
pub mod telemetry;
