/// Outcome of a CLI command: the process exit code and an optional message
/// to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdExit {
    pub code: i32,
    pub message: Option<String>,
}

impl CmdExit {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            code: exitcode::OK,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn fail(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }
}
