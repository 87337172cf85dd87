pub mod error;
pub mod i18n;
pub mod labels;
pub mod mask;

pub use error::{ApiError, AppError};
pub use i18n::I18nStore;
