pub mod brackets;
pub mod browsers;
pub mod config;
pub mod css;
pub mod css_supports;
pub mod error;
pub mod prefixes;

pub use config::{Options, PrefixConfig};
pub use css::SupportsRule;
pub use css_supports::{Supports, clean_brackets, normalize, parse_declaration};
pub use error::{Error, Result};
