//! JSONL journal I/O and atomic file replacement

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Append one JSON record as a line
pub fn append_jsonl<T: Serialize>(path: &Path, record: &T) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    let json = serde_json::to_string(record)?;
    writeln!(file, "{}", json)?;
    Ok(())
}

/// Read every record; a missing file is empty and malformed lines are skipped
pub fn read_jsonl<T: for<'de> Deserialize<'de>>(path: &Path) -> std::io::Result<Vec<T>> {
    let mut records = Vec::new();
    for_each_record(path, |record| records.push(record))?;
    Ok(records)
}

/// Read only the last `limit` records
pub fn tail_jsonl<T: for<'de> Deserialize<'de>>(
    path: &Path,
    limit: usize,
) -> std::io::Result<Vec<T>> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut window = VecDeque::with_capacity(limit.min(1024));

    for_each_record(path, |record| {
        if window.len() == limit {
            window.pop_front();
        }
        window.push_back(record);
    })?;

    Ok(window.into())
}

fn for_each_record<T, F>(path: &Path, mut sink: F) -> std::io::Result<()>
where
    T: for<'de> Deserialize<'de>,
    F: FnMut(T),
{
    if !path.exists() {
        return Ok(());
    }

    let reader = BufReader::new(File::open(path)?);

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => sink(record),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    line = lineno + 1,
                    %err,
                    "skipping malformed journal line"
                );
            }
        }
    }

    Ok(())
}

/// Replace `path` with `data` via a sibling temp file and rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}
