use anyhow::{Result, Context, anyhow};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Output path for an exported document
    // @params: output_dir, stem, extension
    pub fn generate_output_path<P: AsRef<Path>>(output_dir: P, stem: &str, extension: &str) -> PathBuf {
        let extension = extension.trim_start_matches('.');
        output_dir.as_ref().join(format!("{}.{}", stem, extension))
    }

    /// Read a file's raw bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file through a temporary sibling and a rename.
    ///
    /// Readers see either the previous file or the complete new one.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(parent)?;

        let mut temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temporary file in: {}", parent.display()))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for: {}", path.display()))?;
        temp.flush()?;

        temp.persist(path)
            .map_err(|e| anyhow!("Failed to move output into place at {}: {}", path.display(), e.error))?;

        Ok(())
    }

    /// Path relative to the current directory when it lies beneath it
    pub fn display_path<P: AsRef<Path>>(path: P) -> PathBuf {
        let path = path.as_ref();
        std::env::current_dir()
            .ok()
            .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
            .unwrap_or_else(|| path.to_path_buf())
    }
}
