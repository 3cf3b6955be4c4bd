//! File helpers shared by the config and token store.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

/// Atomically replaces `path` with `contents`.
///
/// The data is written and synced to a sibling temp file which is then
/// renamed over the target, so readers see either the old file or the new
/// one. On Unix the file is created with mode `0600`.
pub(crate) async fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path(path);
    let result = write_then_rename(&tmp, path, contents).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

async fn write_then_rename(tmp: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(tmp).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(tmp, path).await
}

/// `dir/name` -> `dir/.name.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
