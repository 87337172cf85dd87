pub mod auth;
pub mod bi;
pub mod categories;
pub mod dock;
pub mod fechamento;
pub mod files;
pub mod merchants;
pub mod repasse;
pub mod solicitations;
pub mod transactions;
