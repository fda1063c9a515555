//! JSON output writer.
//!
//! The document is serialized into a hidden sibling file and renamed over the
//! destination once complete, so readers see either the previous file or the
//! whole new document.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON write error for '{path}': {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the finished file into place.
    #[error("failed to rename '{from}' to '{to}': {source}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Hidden sibling path used while the document is being written.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.json".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T, indent: usize) -> Result<()> {
    let path_str = path.display().to_string();
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path_str.clone(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let serialized = if indent == 0 {
        serde_json::to_writer(&mut writer, value)
    } else {
        let indent_bytes = vec![b' '; indent];
        let formatter = PrettyFormatter::with_indent(&indent_bytes);
        let mut serializer = Serializer::with_formatter(&mut writer, formatter);
        value.serialize(&mut serializer)
    };
    serialized.map_err(|e| WriteError::Serialize {
        path: path_str.clone(),
        source: e,
    })?;

    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| WriteError::WriteFile {
            path: path_str,
            source: e,
        })?;

    Ok(())
}

/// Write a value as a JSON document.
///
/// # Arguments
///
/// * `path` - Output file path (parent directories will be created if needed)
/// * `value` - Anything serializable, typically a slice of records
/// * `indent` - Spaces per nesting level; `0` writes compact JSON
///
/// # Errors
///
/// Returns an error if the directories, the staging file, or the final
/// rename fail. On error the destination is left as it was.
///
/// # Example
///
/// ```no_run
/// use climate_pipeline::core::writers::write_json;
/// use std::path::Path;
///
/// let values = vec![1, 2, 3];
/// write_json(Path::new("out/values.json"), &values, 2).unwrap();
/// ```
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, indent: usize) -> Result<()> {
    ensure_parent_dirs(path)?;

    let staging = staging_path(path);
    if let Err(e) = write_document(&staging, value, indent) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }

    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        WriteError::Rename {
            from: staging.display().to_string(),
            to: path.display().to_string(),
            source: e,
        }
    })?;

    info!("Wrote {}", path.display());
    Ok(())
}
