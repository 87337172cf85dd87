pub mod bi_repo;
pub mod category_repo;
pub mod dock_repo;
pub mod file_repo;
pub mod merchant_repo;
pub mod settlement_repo;
pub mod solicitation_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use bi_repo::BiRepository;
pub use category_repo::CategoryRepository;
pub use dock_repo::DockRepository;
pub use file_repo::FileRepository;
pub use merchant_repo::MerchantRepository;
pub use settlement_repo::SettlementRepository;
pub use solicitation_repo::SolicitationRepository;
pub use transaction_repo::TransactionRepository;
pub use user_repo::UserRepository;
