//! Best-score record kept in a plain text file holding one decimal integer.
//!
//! This sits outside the engine: a host reads `BoardEngine::score()` after each
//! move and hands it to [`HighScoreFile::record`].

use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum HighScoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("{path} does not hold a score: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
    best: u64,
}

impl HighScoreFile {
    /// Load the best score from `path`, creating the file with `0` if it is missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HighScoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            fs::write(&path, "0")?;
            debug!(path = %path.display(), "created high score file");
        }
        let best = read_best(&path)?;
        Ok(Self { path, best })
    }

    #[inline]
    pub fn best(&self) -> u64 {
        self.best
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `score` if it beats the current best. Returns whether the file was written.
    pub fn record(&mut self, score: u64) -> Result<bool, HighScoreError> {
        if score <= self.best {
            return Ok(false);
        }
        fs::write(&self.path, score.to_string())?;
        debug!(old = self.best, new = score, "new high score");
        self.best = score;
        Ok(true)
    }
}

fn read_best(path: &Path) -> Result<u64, HighScoreError> {
    let text = fs::read_to_string(path)?;
    let first = text.lines().next().map(str::trim).unwrap_or("");
    if first.is_empty() {
        return Ok(0);
    }
    first.parse().map_err(|source| HighScoreError::Parse {
        path: path.display().to_string(),
        source,
    })
}
