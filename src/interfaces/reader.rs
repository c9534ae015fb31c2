use crate::error::{LedgerError, Result};
use crate::interfaces::api::Request;
use std::io::BufRead;

/// Reads logical requests from a newline-delimited JSON source.
///
/// Wraps any `BufRead` source and yields one `Result<Request>` per
/// non-empty line, so large inputs stream without being loaded into
/// memory at once.
pub struct RequestReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> RequestReader<R> {
    /// Creates a new `RequestReader` from any `BufRead` source (e.g.
    /// a buffered file or stdin lock).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns an iterator that lazily reads and decodes requests.
    pub fn requests(self) -> impl Iterator<Item = Result<Request>> {
        self.source
            .lines()
            .map(|line| match line {
                Ok(line) => Ok(line),
                Err(e) => Err(LedgerError::MalformedRequest(e.to_string())),
            })
            .filter(|line| !matches!(line, Ok(line) if line.trim().is_empty()))
            .map(|line| {
                let line = line?;
                serde_json::from_str(&line)
                    .map_err(|e| LedgerError::MalformedRequest(e.to_string()))
            })
    }
}
