#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
}

impl DashboardError {
    /// Whether retrying the same request later could succeed.
    ///
    /// Transport failures, throttling and server-side errors are transient;
    /// rejected input and auth failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            DashboardError::Network(_) => true,
            DashboardError::Api { status, .. } => *status == 429 || *status >= 500,
            DashboardError::Decode(_) | DashboardError::Validation(_) => false,
        }
    }
}
