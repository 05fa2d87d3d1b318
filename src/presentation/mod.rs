// Presentation boundary - Read-only views for external renderers
pub mod monitor_view;
