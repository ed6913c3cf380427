// File persistence: a list is a plain text file with one item per line,
// stored as `<dir>/<name>.txt`. This is the only module that touches disk.

use anyhow::{ensure, Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::Builder;
use tracing::{debug, info};

/// Extension appended to every base filename.
pub const EXTENSION: &str = "txt";

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Reads and writes list files inside a single directory.
#[derive(Debug, Clone)]
pub struct ListStore {
    dir: PathBuf,
}

impl ListStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ListStore { dir: dir.into() }
    }

    /// Full path for a base filename (no extension).
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{EXTENSION}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Read every line of `<name>.txt` as an item.
    pub fn load(&self, name: &str) -> Result<Vec<String>> {
        ensure!(!name.is_empty(), "filename must not be empty");
        let path = self.path_for(name);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let items = split_lines(&text);
        debug!(path = %path.display(), items = items.len(), "list file read");
        Ok(items)
    }

    /// Write `items` to `<name>.txt`, replacing any existing file. The
    /// content goes to a temporary file in the same directory first, so a
    /// failed write leaves the old file intact.
    pub fn save(&self, name: &str, items: &[String]) -> Result<PathBuf> {
        ensure!(!name.is_empty(), "filename must not be empty");
        let path = self.path_for(name);

        let mut builder = Builder::new();
        // new files get the usual umask-derived mode instead of the
        // owner-only temp file default
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder
            .tempfile_in(&self.dir)
            .with_context(|| format!("Failed to create temporary file in {}", self.dir.display()))?;
        let contents: String = items
            .iter()
            .flat_map(|item| [item.as_str(), LINE_ENDING])
            .collect();
        tmp.write_all(contents.as_bytes())
            .context("Failed to write list contents")?;
        tmp.flush().context("Failed to flush list contents")?;
        // keep the mode of a file we're replacing
        if let Ok(existing) = fs::metadata(&path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
        }
        tmp.persist(&path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        info!(path = %path.display(), items = items.len(), "list file written");
        Ok(path)
    }
}

/// One item per line; accepts `\n` and `\r\n` and ignores the terminator
/// after the last line. Blank lines in the middle are kept.
fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
