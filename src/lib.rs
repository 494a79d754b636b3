pub mod analytics;
pub mod app;
pub mod config;
pub mod error;
pub mod mode;
pub mod models;
pub mod mutation;
pub mod notify;
pub mod reorder;
pub mod sections;
pub mod services;
pub mod store;
