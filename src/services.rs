pub mod auth;
pub mod bi_service;
pub mod category_service;
pub mod dock_sync_service;
pub mod file_service;
pub mod merchant_service;
pub mod settlement_service;
pub mod solicitation_service;
pub mod transaction_service;

pub use auth::AuthService;
pub use bi_service::BiService;
pub use category_service::CategoryService;
pub use dock_sync_service::DockSyncService;
pub use file_service::FileService;
pub use merchant_service::MerchantService;
pub use settlement_service::SettlementService;
pub use solicitation_service::SolicitationService;
pub use transaction_service::TransactionService;
