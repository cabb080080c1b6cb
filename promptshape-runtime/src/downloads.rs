use promptshape_engine::traits::DownloadSink;
use std::path::{Path, PathBuf};

/// Saves downloads into one directory, never overwriting an earlier file.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectoryDownloads {
    fn save(&self, filename: &str, contents: &str) -> anyhow::Result<PathBuf> {
        crate::fs_util::ensure_dir(&self.dir)?;
        let path = unique_path(&self.dir, filename);
        crate::fs_util::write_atomic(&path, contents.as_bytes())?;
        Ok(path)
    }
}

/// `name.json`, then `name-1.json`, `name-2.json`, ... until one is free.
fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let first = dir.join(filename);
    if !first.exists() {
        return first;
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (filename, None),
    };

    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem}-{n}.{ext}")),
            None => dir.join(format!("{stem}-{n}")),
        })
        .find(|p| !p.exists())
        .unwrap_or(first)
}
