use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path).with_context(|| format!("failed to create dir: {}", path.display()))
}

/// Writes `bytes` to a sibling temp file and renames it over `dst`.
///
/// Readers see either the old contents or the new, never a partial write. The
/// rename replaces an existing file on every supported platform.
pub fn write_atomic(dst: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }

    let tmp = temp_sibling(dst);
    fs::write(&tmp, bytes).with_context(|| format!("failed to write temp: {}", tmp.display()))?;

    fs::rename(&tmp, dst).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        anyhow::Error::new(e).context(format!("failed to move into place: {}", dst.display()))
    })
}

// Per-process name so two sessions saving at once never share a temp file.
fn temp_sibling(dst: &Path) -> PathBuf {
    let mut name = dst.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", std::process::id()));
    dst.with_file_name(name)
}
