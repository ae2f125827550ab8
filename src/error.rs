use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The configuration document is not valid JSON or has the wrong shape.
    #[error("invalid prefix configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A browser in the selection (or the `@supports` list) names a family
    /// missing from the browser table.
    #[error("unknown browser family in {browser:?}")]
    UnknownBrowser { browser: String },

    #[error("browser family {family:?} has an empty vendor prefix")]
    EmptyPrefix { family: String },
}
