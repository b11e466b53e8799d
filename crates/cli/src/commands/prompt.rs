//! Line input for the interactive session

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Reads operator answers one line at a time
#[derive(Debug)]
pub struct Prompter<R> {
    input: R,
    closed: bool,
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            closed: false,
        }
    }

    /// Next line without its line ending, or `None` once input has ended
    ///
    /// A read error ends input the same way end-of-file does.
    pub async fn next_line(&mut self) -> Option<String> {
        if self.closed {
            return None;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line).await {
            Ok(0) => {
                self.closed = true;
                None
            }
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\n', '\r']);
                Some(trimmed.to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "reading input failed");
                self.closed = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_then_eof() {
        let mut prompter = Prompter::new("first\r\n second \nlast".as_bytes());
        assert_eq!(prompter.next_line().await.as_deref(), Some("first"));
        assert_eq!(prompter.next_line().await.as_deref(), Some(" second "));
        assert_eq!(prompter.next_line().await.as_deref(), Some("last"));
        assert_eq!(prompter.next_line().await, None);
        assert_eq!(prompter.next_line().await, None);
    }

    #[tokio::test]
    async fn test_blank_line_is_not_eof() {
        let mut prompter = Prompter::new("\n".as_bytes());
        assert_eq!(prompter.next_line().await.as_deref(), Some(""));
        assert_eq!(prompter.next_line().await, None);
    }
}
