//! Reading raw blocks from a configuration directory.
//!
//! Each domain is one file, `<domain-name>.toml`, holding a flat table.
//! Strings are taken as-is; integers, floats, booleans and datetimes are
//! stringified; nested tables and arrays are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::source::block::RawBlock;
use crate::source::SourceEvent;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{path}: key {key:?} must be a string, number, boolean or datetime")]
    UnsupportedValue { path: PathBuf, key: String },
}

/// Domain a file feeds, or `None` if the file is not a source file.
pub fn domain_for(path: &Path) -> Option<String> {
    if path.extension()? != "toml" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    // Editor swap files and dotfiles
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(stem.to_string())
}

/// Parse one source file into a raw block.
pub fn read_block(path: &Path) -> Result<RawBlock, SourceError> {
    parse_block(path, &read_source(path)?)
}

/// Like [`read_block`], for a file that just changed.
///
/// A blank file is what a writer leaves between truncating and writing, so
/// it yields `None` instead of a block of defaults. An intentionally empty
/// source needs at least a comment.
pub fn read_changed_block(path: &Path) -> Result<Option<RawBlock>, SourceError> {
    let content = read_source(path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    parse_block(path, &content).map(Some)
}

fn read_source(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_block(path: &Path, content: &str) -> Result<RawBlock, SourceError> {
    let table: toml::Table = content.parse().map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut block = RawBlock::default();
    for (key, value) in table {
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                return Err(SourceError::UnsupportedValue {
                    path: path.to_path_buf(),
                    key,
                })
            }
        };
        block.insert(key, value);
    }
    Ok(block)
}

/// Read every source file in `dir`, sorted by file name.
///
/// Files that fail to parse are logged and skipped so one bad domain does
/// not hold back the others. Failing to list the directory is an error.
pub fn scan_dir(dir: &Path) -> Result<Vec<SourceEvent>, SourceError> {
    let io_err = |source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut events = Vec::new();
    for path in paths {
        let Some(domain) = domain_for(&path) else {
            continue;
        };
        match read_block(&path) {
            Ok(block) => events.push(SourceEvent { domain, block }),
            Err(e) => tracing::error!(domain = %domain, error = %e, "Skipping unreadable config source"),
        }
    }
    Ok(events)
}
