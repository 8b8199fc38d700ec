pub mod app_state;
pub mod authentication;
pub mod catalog;
pub mod configuration;
pub mod domain;
pub mod request_id;
pub mod routes;
pub mod startup;
pub mod subscription_manager;
pub mod telemetry;
pub mod utils;
