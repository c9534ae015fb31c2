use std::io::Write;
use tempfile::NamedTempFile;

/// Writes one request per line into a scratch file the binary can read.
pub fn write_requests(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}
