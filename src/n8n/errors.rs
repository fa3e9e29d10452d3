use thiserror::Error;

/// Failures talking to the n8n REST API that the provisioner cannot recover from.
///
/// Non-success HTTP statuses are not errors here; callers decide how to treat them.
#[derive(Error, Debug)]
pub enum N8nError {
    #[error("n8n request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from n8n while {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, N8nError>;
