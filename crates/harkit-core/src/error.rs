use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read HAR file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse HAR document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Cannot encode {field} to utf-8")]
    Encoding { field: String },

    #[error("Invalid HAR document: {0}")]
    Format(String),

    #[error("Bad query field: {0:?}")]
    MalformedQuery(String),

    #[error("starting_url = {starting_url}, inner_exception = {source}, inner_trace:\n{trace}")]
    Transform {
        starting_url: String,
        #[source]
        source: BoxError,
        trace: String,
    },
}

impl Error {
    /// Wrap a serialization failure, tagging it with the document's first URL
    pub fn transform(
        starting_url: Option<&str>,
        source: impl Into<BoxError>,
        trace: impl Into<String>,
    ) -> Self {
        Error::Transform {
            starting_url: starting_url.unwrap_or("unknown").to_string(),
            source: source.into(),
            trace: trace.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
