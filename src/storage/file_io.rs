//! File I/O utilities with atomic writes
//!
//! Every write goes to a sibling temp file, is synced, and is then renamed
//! over the target.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::GoalError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, GoalError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| GoalError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| GoalError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read a whole file as a string, `None` if it doesn't exist
pub fn read_string<P: AsRef<Path>>(path: P) -> Result<Option<String>, GoalError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(GoalError::Storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write raw bytes to a file atomically (write to temp, then rename)
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<(), GoalError> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    let file = create_temp(path, &temp_path)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents)
        .map_err(|e| GoalError::Storage(format!("Failed to write data: {}", e)))?;

    finish_atomic(writer, &temp_path, path)
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), GoalError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    let file = create_temp(path, &temp_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| GoalError::Storage(format!("Failed to serialize data: {}", e)))?;

    finish_atomic(writer, &temp_path, path)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn create_temp(path: &Path, temp_path: &Path) -> Result<File, GoalError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            GoalError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    File::create(temp_path)
        .map_err(|e| GoalError::Storage(format!("Failed to create temp file: {}", e)))
}

fn finish_atomic(
    mut writer: BufWriter<File>,
    temp_path: &Path,
    path: &Path,
) -> Result<(), GoalError> {
    writer
        .flush()
        .map_err(|e| GoalError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| GoalError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(temp_path, path).map_err(|e| {
        let _ = fs::remove_file(temp_path);
        GoalError::Storage(format!("Failed to rename temp file: {}", e))
    })
}
