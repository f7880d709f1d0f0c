use thiserror::Error;

/// gridsift統一エラー型
///
/// フィルタ判定・ハイライトはエラーを返さない。
/// ここに現れるのはリモート問い合わせ・設定・入力ファイル由来のものだけ。
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote query failed: {message} (status: {status})")]
    RemoteStatus { status: u16, message: String },

    #[error("Invalid remote response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, SiftError>;

impl SiftError {
    /// リトライ可能なエラーかどうか
    pub fn is_retryable(&self) -> bool {
        match self {
            SiftError::Network(_) => true,
            SiftError::RemoteStatus { status, .. } => {
                // 5xx エラーはリトライ可能
                *status >= 500 && *status < 600
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_status_5xx_is_retryable() {
        let error = SiftError::RemoteStatus {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert!(error.is_retryable());
    }

    #[test]
    fn test_remote_status_4xx_is_not_retryable() {
        let error = SiftError::RemoteStatus {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_invalid_argument_is_not_retryable() {
        let error = SiftError::InvalidArgument("bad".to_string());
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_display_includes_status() {
        let error = SiftError::RemoteStatus {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(error.to_string(), "Remote query failed: boom (status: 500)");
    }
}
