pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod equipments;
pub mod inventory;
pub mod notifications;
pub mod orders;
