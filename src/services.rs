pub mod auth;
pub mod dashboard_service;
pub mod inventory_service;
pub mod lifecycle;
pub mod order_service;
pub mod stats;
