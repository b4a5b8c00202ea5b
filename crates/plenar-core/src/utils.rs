//! Utility functions for protocol input and text measurement

use crate::{Error, Result, config::InputConfig, types::ProtocolDocument};
use std::path::{Path, PathBuf};

/// Number of whitespace-delimited tokens
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Length in Unicode scalar values, the unit every character threshold uses
#[must_use]
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset where the last `chars` characters before `end` begin
#[must_use]
pub fn char_window_start(text: &str, end: usize, chars: usize) -> usize {
    if chars == 0 {
        return end;
    }
    text.get(..end)
        .and_then(|head| head.char_indices().rev().nth(chars - 1))
        .map_or(0, |(offset, _)| offset)
}

/// Read one protocol from disk.
///
/// `.json` files are stored protocol envelopes with a `fullText` field and an
/// optional `dokumentnummer` (top level or under `data`); anything else is read
/// as plain UTF-8 text. The file stem is the fallback document id.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or carries
/// no usable text.
pub fn read_protocol(path: &Path) -> Result<ProtocolDocument> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        if content.trim().is_empty() {
            return Err(Error::input(path, "file is empty"));
        }
        return Ok(ProtocolDocument::new(stem, content));
    }

    let value: serde_json::Value = serde_json::from_str(&content)?;
    let text = value
        .get("fullText")
        .and_then(serde_json::Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| Error::input(path, "missing or empty fullText"))?;

    let id = value
        .get("dokumentnummer")
        .or_else(|| value.get("data").and_then(|data| data.get("dokumentnummer")))
        .and_then(serde_json::Value::as_str)
        .map_or(stem, str::to_string);

    Ok(ProtocolDocument::new(id, text))
}

/// Whether `path` carries one of the configured protocol extensions
#[must_use]
pub fn has_protocol_extension(path: &Path, allowed: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            allowed
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// List protocol files below `dir`, sorted by path
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn collect_protocol_files(dir: &Path, input: &InputConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                if input.recursive {
                    pending.push(path);
                }
            } else if has_protocol_extension(&path, &input.extensions) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Expand a mix of files and directories into protocol files
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be read.
pub fn resolve_inputs(paths: &[PathBuf], input: &InputConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(collect_protocol_files(path, input)?);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(Error::input(path, "no such file or directory"));
        }
    }
    Ok(files)
}

/// Share of `part` in `whole`, zero for an empty whole
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}
