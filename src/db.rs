pub mod user_repo;
pub use user_repo::UserRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod equipment_repo;
pub use equipment_repo::EquipmentRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
