use thiserror::Error;

pub type Result<T> = std::result::Result<T, SalesforceClientError>;

#[derive(Debug, Error)]
pub enum SalesforceClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Salesforce authentication failed: {error}: {description}")]
    Authentication { error: String, description: String },

    #[error("Salesforce API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Query is not done but the response carries no nextRecordsUrl")]
    MissingNextRecordsUrl,
}
