/// UseCaseError はユースケースの失敗。
#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("no results found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    /// ストレージが書き込みを拒否した（制約違反など）。
    #[error("write rejected: {0}")]
    Unprocessable(anyhow::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn validation(message: &str) -> Self {
        Self::Validation(message.to_string())
    }
}
