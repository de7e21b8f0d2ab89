use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReddExtractError {
    #[error("Missing required environment variable `{0}`")]
    MissingSetting(&'static str),
    #[error("Could not find a post id in URL `{0}`")]
    InvalidPostUrl(String),
    #[error("Request to Reddit failed")]
    Request(#[from] reqwest::Error),
    #[error("Reddit returned an unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("Could not serialize record to JSON")]
    Serialization(#[from] serde_json::Error),
    #[error("Could not write output file")]
    Io(#[from] std::io::Error),
}
