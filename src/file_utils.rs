use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Lowercase, dash-separated form of a title usable as a file name
    pub fn slugify(title: &str) -> String {
        let lowered = title.to_lowercase();
        let slug = NON_SLUG_CHARS.replace_all(&lowered, "-");
        let slug = slug.trim_matches('-');
        if slug.is_empty() {
            "presentation".to_string()
        } else {
            slug.to_string()
        }
    }

    // @generates: Output path for a generated presentation
    // @params: output_dir, title, extension
    pub fn generate_output_path<P: AsRef<Path>>(output_dir: P, title: &str, extension: &str) -> PathBuf {
        let extension = extension.trim_start_matches('.');
        output_dir.as_ref().join(format!("{}.{}", Self::slugify(title), extension))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        Self::write_bytes(path, content.as_bytes())
    }

    /// Write raw bytes to a file, creating parent directories
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
