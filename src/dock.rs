pub mod client;
pub mod fiscal;

pub use client::DockApiClient;
pub use fiscal::{FiscalApiClient, ValidationOutcome};
