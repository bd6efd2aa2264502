// Application layer - Datasets, chart builders and widget orchestration
pub mod chart_builders;
pub mod controller;
pub mod dashboard_service;
pub mod datasets;
pub mod registry;
