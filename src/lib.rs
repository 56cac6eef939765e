pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod types;

pub use config::{NormalizeConfig, NormalizeOptions};
pub use normalize::{normalize_code, normalize_codes, CodeNormalizer};
pub use types::{CodeInput, NormalizeResult, ProbableType};
