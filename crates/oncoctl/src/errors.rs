//! Error codes and exit status for oncoctl

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code for bad arguments or an image that fails local validation
pub const EXIT_INVALID_INPUT: i32 = 64;

/// Exit code when the daemon returns something that is not a result
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the daemon answered with an error result
pub const EXIT_ANALYSIS_FAILED: i32 = 66;

/// Exit code when the daemon is unavailable/unreachable
pub const EXIT_SERVER_UNAVAILABLE: i32 = 70;

#[derive(Debug, thiserror::Error)]
pub enum CtlError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Cannot reach oncod at {url}: {message}")]
    ServerUnavailable { url: String, message: String },

    #[error("Invalid response from oncod: {0}")]
    InvalidResponse(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CtlError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CtlError::InvalidInput(_) => EXIT_INVALID_INPUT,
            CtlError::ServerUnavailable { .. } => EXIT_SERVER_UNAVAILABLE,
            CtlError::InvalidResponse(_) => EXIT_INVALID_RESPONSE,
            CtlError::AnalysisFailed(_) => EXIT_ANALYSIS_FAILED,
            CtlError::Other(_) => EXIT_GENERAL_ERROR,
        }
    }

    /// Short code recorded in the invocation log
    pub fn code(&self) -> &'static str {
        match self {
            CtlError::InvalidInput(_) => "invalid_input",
            CtlError::ServerUnavailable { .. } => "server_unavailable",
            CtlError::InvalidResponse(_) => "invalid_response",
            CtlError::AnalysisFailed(_) => "analysis_failed",
            CtlError::Other(_) => "general",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CtlError::InvalidInput("x".into()).exit_code(), 64);
        assert_eq!(CtlError::InvalidResponse("x".into()).exit_code(), 65);
        assert_eq!(CtlError::AnalysisFailed("x".into()).exit_code(), 66);
        assert_eq!(
            CtlError::ServerUnavailable {
                url: "http://127.0.0.1:9002".into(),
                message: "connection refused".into()
            }
            .exit_code(),
            70
        );
        assert_eq!(CtlError::Other(anyhow::anyhow!("boom")).exit_code(), 1);
    }
}
