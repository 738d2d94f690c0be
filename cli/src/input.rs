use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Words that end the session when typed on their own.
const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

/// Source of raw user lines.
#[async_trait]
pub trait InputSource: Send + 'static {
    /// Next line to submit, or `None` once the user is done.
    async fn next(&mut self) -> anyhow::Result<Option<String>>;
}

fn is_exit(line: &str) -> bool {
    let line = line.trim();
    EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w))
}

/// Reads lines from the process stdin.
pub struct StdinInputSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinInputSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinInputSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSource for StdinInputSource {
    async fn next(&mut self) -> anyhow::Result<Option<String>> {
        match self.lines.next_line().await? {
            Some(line) if is_exit(&line) => Ok(None),
            other => Ok(other),
        }
    }
}

/// Replays a fixed list of lines, then reports end of input.
pub struct VecInputSource {
    buf: std::vec::IntoIter<String>,
}

impl VecInputSource {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            buf: lines.into_iter().map(Into::into).collect::<Vec<_>>().into_iter(),
        }
    }
}

#[async_trait]
impl InputSource for VecInputSource {
    async fn next(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.buf.next().filter(|line| !is_exit(line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_words() {
        assert!(is_exit("exit"));
        assert!(is_exit("  QUIT "));
        assert!(!is_exit("exit now"));
        assert!(!is_exit(""));
    }

    #[tokio::test]
    async fn test_vec_source_stops_at_exit() {
        let mut source = VecInputSource::new(["hello", "", "exit", "after"]);

        assert_eq!(source.next().await.unwrap().as_deref(), Some("hello"));
        assert_eq!(source.next().await.unwrap().as_deref(), Some(""));
        assert_eq!(source.next().await.unwrap(), None);
    }
}
