//! Output formatting utilities
//!
//! Formatters for the interactive session's human-readable output, plus
//! progress bars for batch operations.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::ProgressBar;

/// Output configuration derived from CLI flags and the config file
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Disable colored output
    pub no_color: bool,
    /// Color even when the output is not a terminal
    pub force_color: bool,
    /// Disable progress bars
    pub no_progress: bool,
}

impl OutputConfig {
    /// Combine command-line flags with the configured color mode and progress default
    pub fn resolve(no_color: bool, no_progress: bool, color_mode: &str, progress: bool) -> Self {
        Self {
            no_color: no_color || color_mode == "never",
            force_color: !no_color && color_mode == "always",
            no_progress: no_progress || !progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_flags_override_config() {
        let config = OutputConfig::resolve(true, false, "always", true);
        assert!(config.no_color);
        assert!(!config.force_color);
        assert!(!config.no_progress);
    }

    #[test]
    fn test_resolve_from_config() {
        let config = OutputConfig::resolve(false, false, "never", false);
        assert!(config.no_color);
        assert!(config.no_progress);

        let config = OutputConfig::resolve(false, false, "always", true);
        assert!(config.force_color);
    }
}
