//! Trace input handling
//!
//! Turns trace text into validated key sequences and finds trace files for
//! batch runs.
//!
//! A trace is a list of non-negative integer keys separated by newlines,
//! commas or whitespace. `#` starts a comment that runs to the end of the
//! line and empty tokens are ignored, so all of these are the same trace:
//!
//! ```text
//! 1
//! 5
//! 1
//!
//! 1,5,1
//!
//! 1 , 5 , 1   # generated
//! ```
//!
//! A first line made only of words (such as a `key` CSV header) is skipped.

use hybrid_cache::Key;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for trace parsing
#[derive(Debug, Error)]
pub enum TraceParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: '{token}' is not a non-negative integer key")]
    InvalidKey { line: usize, token: String },

    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Parses trace text into keys.
pub fn parse_trace_str(text: &str) -> Result<Vec<Key>, TraceParseError> {
    let mut keys = Vec::new();
    let mut seen_content = false;

    for (index, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let mut tokens = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .peekable();
        if tokens.peek().is_none() {
            continue;
        }

        if !seen_content {
            seen_content = true;
            if is_header(line) {
                continue;
            }
        }

        for token in tokens {
            let key = token
                .parse::<Key>()
                .map_err(|_| TraceParseError::InvalidKey {
                    line: index + 1,
                    token: token.to_string(),
                })?;
            keys.push(key);
        }
    }

    Ok(keys)
}

fn is_header(line: &str) -> bool {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .all(|t| t.chars().all(|c| c.is_ascii_alphabetic() || c == '_'))
}

/// Reads and parses a single trace file.
pub fn read_trace_file<P: AsRef<Path>>(path: P) -> Result<Vec<Key>, TraceParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TraceParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace_str(&text)
}

/// Finds trace files for batch runs
#[derive(Debug)]
pub struct TraceReader {
    input_dir: PathBuf,
    pattern: Option<String>,
}

impl TraceReader {
    /// Create a new reader for the given input directory
    pub fn new<P: AsRef<Path>>(input_dir: P) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            pattern: None,
        }
    }

    /// Restrict the reader to file names matching a glob pattern
    pub fn with_pattern(mut self, pattern: Option<String>) -> Self {
        self.pattern = pattern;
        self
    }

    /// Get all trace files in the input directory, sorted by name.
    ///
    /// Without a pattern, any `.txt`, `.csv` or `.log` file qualifies.
    pub fn get_trace_files(&self) -> Result<Vec<PathBuf>, TraceParseError> {
        let mut files = match &self.pattern {
            Some(pattern) => self.glob_files(pattern)?,
            None => self.extension_files()?,
        };
        // Sort files by name for consistent ordering
        files.sort();
        tracing::info!(
            dir = %self.input_dir.display(),
            files = files.len(),
            "trace discovery complete"
        );
        Ok(files)
    }

    fn extension_files(&self) -> Result<Vec<PathBuf>, TraceParseError> {
        let io_err = |source| TraceParseError::Io {
            path: self.input_dir.clone(),
            source,
        };
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.input_dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(ext) = path.extension() {
                if ext == "txt" || ext == "csv" || ext == "log" {
                    files.push(path);
                }
            }
        }
        Ok(files)
    }

    fn glob_files(&self, pattern: &str) -> Result<Vec<PathBuf>, TraceParseError> {
        let full = self.input_dir.join(pattern);
        let full = full.to_string_lossy();
        let paths = glob::glob(&full).map_err(|source| TraceParseError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let mut files = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "skipping unreadable path"),
            }
        }
        Ok(files)
    }
}
