//! Output formatter for the interactive session
//!
//! All session output, including error lines, goes to one writer so that
//! prompts, results and errors stay in order.

use std::io::Write;

use console::{Style, StyledObject};

use super::OutputConfig;

/// Formatter for session output
#[derive(Debug)]
pub struct Formatter<W: Write> {
    config: OutputConfig,
    out: W,
}

impl<W: Write> Formatter<W> {
    /// Create a new formatter writing to `out`
    pub fn new(config: OutputConfig, out: W) -> Self {
        Self { config, out }
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color
    }

    pub fn config(&self) -> OutputConfig {
        self.config
    }

    /// Output a success message
    pub fn success(&mut self, message: &str) {
        let mark = self.paint("✓", Style::new().green());
        self.line(&format!("{mark} {message}"));
    }

    /// Output an error message
    pub fn error(&mut self, message: &str) {
        let mark = self.paint("✗", Style::new().red());
        self.line(&format!("{mark} {message}"));
    }

    /// Output a warning message
    pub fn warning(&mut self, message: &str) {
        let mark = self.paint("⚠", Style::new().yellow());
        self.line(&format!("{mark} {message}"));
    }

    /// Section heading, bold when colored
    pub fn heading(&mut self, title: &str) {
        let title = self.paint(title, Style::new().bold());
        self.line(&title);
    }

    /// Print a line of text
    pub fn println(&mut self, message: &str) {
        self.line(message);
    }

    /// Print a prompt without a newline and flush it
    pub fn prompt(&mut self, message: &str) {
        let _ = write!(self.out, "{message}");
        let _ = self.out.flush();
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if !self.colors_enabled() {
            return text.to_string();
        }
        let styled: StyledObject<&str> = style.apply_to(text);
        if self.config.force_color {
            styled.force_styling(true).to_string()
        } else {
            styled.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Formatter<Vec<u8>> {
        Formatter::new(
            OutputConfig {
                no_color: true,
                ..Default::default()
            },
            Vec::new(),
        )
    }

    fn text(formatter: Formatter<Vec<u8>>) -> String {
        String::from_utf8(formatter.into_inner()).unwrap()
    }

    #[test]
    fn test_formatter_default_colors() {
        let formatter = Formatter::new(OutputConfig::default(), Vec::new());
        assert!(formatter.colors_enabled());
    }

    #[test]
    fn test_plain_markers() {
        let mut formatter = plain();
        assert!(!formatter.colors_enabled());
        formatter.success("done");
        formatter.error("failed");
        formatter.warning("careful");
        assert_eq!(text(formatter), "✓ done\n✗ failed\n⚠ careful\n");
    }

    #[test]
    fn test_prompt_has_no_newline() {
        let mut formatter = plain();
        formatter.prompt("Enter bucket name: ");
        assert_eq!(text(formatter), "Enter bucket name: ");
    }

    #[test]
    fn test_forced_color_emits_escapes() {
        let mut formatter = Formatter::new(
            OutputConfig {
                force_color: true,
                ..Default::default()
            },
            Vec::new(),
        );
        formatter.success("done");
        let out = text(formatter);
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("done"));
    }
}
