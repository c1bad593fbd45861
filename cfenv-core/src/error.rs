use thiserror::Error;

/// Unified error type for cfenv.
///
/// Missing or mis-typed fields inside an otherwise valid document never
/// surface here; they degrade to `None` on the descriptor instead.
#[derive(Error, Debug)]
pub enum CfEnvError {
    #[error("Malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl CfEnvError {
    /// True for the structural failure raised when `vcap` is unusable.
    pub fn is_parse(&self) -> bool {
        matches!(self, CfEnvError::Parse(_))
    }
}
