//! Exit code definitions for s3interact
//!
//! The interactive loop itself always ends with `Success`; the other codes
//! are reserved for failures before the loop starts.

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Session ended normally (exit choice or end of input)
    Success = 0,

    /// Startup failed: client construction, terminal I/O, etc.
    GeneralError = 1,

    /// Invalid flags or configuration file
    UsageError = 2,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Session ended",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or configuration",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::UsageError.as_i32(), 2);
    }

    #[test]
    fn test_exit_code_display() {
        let display = format!("{}", ExitCode::UsageError);
        assert!(display.contains("2"));
        assert!(display.contains("configuration"));

        let code: i32 = ExitCode::Success.into();
        assert_eq!(code, 0);
    }
}
