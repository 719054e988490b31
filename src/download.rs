//! Saving response blobs into the output directory.
//!
//! The name comes from the server (already reduced to a bare file name) or
//! a caller-provided default. Existing files are never overwritten: a
//! ` (n)` suffix is added before the extension instead.

use crate::client::response::sanitize_filename;
use crate::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Default name for smart-action downloads without a usable header.
pub const DEFAULT_NAME: &str = "output";
/// Default for the generic convert form.
pub const DEFAULT_CONVERT_NAME: &str = "output_file";
/// Default for the code formatter tools.
pub const DEFAULT_FORMAT_NAME: &str = "formatted_file";

/// Name for the `n`th attempt: `name` itself first, then `stem (n).ext`.
pub fn candidate_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    };
    format!("{} ({}){}", stem, n, ext)
}

/// Write `bytes` into `dir` under `name` (or `default_name` when `name` is
/// missing or unusable). Returns the written path.
///
/// Each candidate is created with `create_new`, so two saves racing for
/// the same name end up in different files.
pub async fn save(
    dir: &Path,
    name: Option<&str>,
    default_name: &str,
    bytes: &[u8],
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let name = name
        .and_then(sanitize_filename)
        .unwrap_or_else(|| default_name.to_string());

    let mut n = 0u32;
    let (path, mut file) = loop {
        let path = dir.join(candidate_name(&name, n));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => break (path, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    };

    file.write_all(bytes).await?;
    file.flush().await?;
    log::info!("[DOWNLOAD] Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
