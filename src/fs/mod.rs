use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};

use util::PathEncodingError;

/// Utility fns
mod ops;

/// Defines fns for creating common paths in the output directory
mod paths;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Path is neither file nor dir: {0}")]
    UnknownPathType(String),
    #[error("Specified output directory \"{0}\" is not a directory")]
    NotDirectory(String),
    #[error("Can't perform IO operation: \"{0}\" is not whitelisted")]
    NotWhitelisted(String),
}

/// All file operations in the crate should go through this struct.
///
/// All destructive operations check that the path in question is a child of the
/// single whitelisted prefix (the sweep destination, or the results directory
/// when post-processing), otherwise they will not be performed.
#[derive(Debug)]
pub struct Fs {
    /// The directory we are allowed to modify
    output_prefix: PathBuf,
}

impl Fs {
    /// Create a new `Fs` with the given output directory.
    pub fn new(output_prefix: &Path) -> Self {
        Self {
            output_prefix: output_prefix.to_path_buf(),
        }
    }

    pub fn output_prefix(&self) -> &Path {
        &self.output_prefix
    }

    /// Check whether output dir exists, and create it if not.
    pub fn ensure_output_dir_exists(&mut self, verbose: bool) -> Result<()> {
        if !self.output_prefix.exists() {
            eprintln!(
                "Output directory {:?} doesn't exist. Creating.",
                self.output_prefix
            );
            fs::create_dir_all(&self.output_prefix).context("creating output directory")?;
        } else if !self.output_prefix.is_dir() {
            return Err(Error::NotDirectory(
                self.output_prefix
                    .to_str()
                    .ok_or(PathEncodingError)?
                    .to_string(),
            )
            .into());
        } else if verbose {
            eprintln!(
                "Output directory {:?} already exists. Not creating.",
                self.output_prefix
            );
        }

        self.output_prefix = self.output_prefix.canonicalize()?;
        Ok(())
    }

    /// Check if path exists on disk.
    pub fn exists<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        path.exists() || path.is_symlink()
    }

    /// Write entire str to a file.
    pub fn write_file<T: AsRef<Path>>(&self, path: T, text: &str) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::write(path, text).context("writing file")?;
        Ok(())
    }

    /// Recursively delete a directory.
    pub fn delete_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::remove_dir_all(path).context("deleting dir")?;
        Ok(())
    }

    /// Recursively delete a directory; a missing directory is not an error.
    /// Returns true if anything was deleted.
    pub fn delete_dir_if_exists<T: AsRef<Path>>(&self, path: T) -> Result<bool> {
        let path = path.as_ref();
        if self.exists(path) {
            self.delete_dir(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Copy `src` to `tgt`, recursively if `src` is a directory.
    pub fn copy<T: AsRef<Path>, U: AsRef<Path>>(&self, src: T, tgt: U) -> Result<()> {
        let (src, tgt) = (src.as_ref(), tgt.as_ref());
        self.check_whitelist(tgt)?;
        let copied =
            ops::copy(src, tgt).with_context(|| format!("copying {:?} to {:?}", src, tgt))?;
        log::debug!("copied {copied} entries from {:?} to {:?}", src, tgt);
        Ok(())
    }

    /// Read entire file into a String.
    /// Bytes that aren't valid UTF-8 (e.g. in a log cut off mid-write)
    /// are replaced with U+FFFD.
    pub fn read_to_buf<T: AsRef<Path>>(&self, path: T, strbuf: &mut String) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        strbuf.clear();
        match String::from_utf8_lossy(&bytes) {
            Cow::Borrowed(text) => strbuf.push_str(text),
            Cow::Owned(text) => {
                log::warn!("{:?} is not valid UTF-8; replaced invalid bytes", path);
                *strbuf = text;
            }
        }
        Ok(())
    }

    /// List entries in a directory
    pub fn read_dir<T: AsRef<Path>>(&self, path: T) -> Result<fs::ReadDir, io::Error> {
        fs::read_dir(path)
    }

    /// Subdirectories of `dir` whose names start with `prefix`.
    pub fn subdirs_with_prefix<T: AsRef<Path>>(
        &self,
        dir: T,
        prefix: &str,
    ) -> Result<Vec<PathBuf>> {
        let mut found = Vec::with_capacity(8);
        for entry in self.read_dir(dir)? {
            let entry = entry?;
            let is_match = entry.file_name().to_str().is_some_and(|n| n.starts_with(prefix));
            if is_match && entry.file_type()?.is_dir() {
                found.push(entry.path());
            }
        }
        found.sort();
        Ok(found)
    }

    fn is_whitelisted<T: AsRef<Path>>(&self, path: T) -> bool {
        path.as_ref().starts_with(&self.output_prefix)
    }

    /// Fail unless `path` may be modified; for files written by other libraries.
    pub fn check_whitelist(&self, path: &Path) -> Result<()> {
        if !self.is_whitelisted(path) {
            Err(Error::NotWhitelisted(path.to_str().ok_or(PathEncodingError)?.to_owned()).into())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_outside_prefix_are_refused() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("out");
        let mut fs = Fs::new(&out);
        fs.ensure_output_dir_exists(false)?;
        assert!(out.is_dir());

        let outside = dir.path().canonicalize()?.join("elsewhere.txt");
        assert!(fs.write_file(&outside, "nope").is_err());
        assert!(!outside.exists());

        let inside = fs.output_prefix().join("ok.txt");
        fs.write_file(&inside, "yes")?;
        assert!(inside.exists());
        Ok(())
    }

    #[test]
    fn test_delete_dir_if_exists() -> Result<()> {
        let dir = tempdir()?;
        let mut fs = Fs::new(dir.path());
        fs.ensure_output_dir_exists(false)?;
        let target = fs.output_prefix().join("run");
        assert!(!fs.delete_dir_if_exists(&target)?);
        std::fs::create_dir_all(target.join("sub"))?;
        assert!(fs.delete_dir_if_exists(&target)?);
        assert!(!target.exists());
        Ok(())
    }

    #[test]
    fn test_subdirs_with_prefix() -> Result<()> {
        let dir = tempdir()?;
        let fs = Fs::new(dir.path());
        std::fs::create_dir(dir.path().join("processor1"))?;
        std::fs::create_dir(dir.path().join("processor0"))?;
        std::fs::create_dir(dir.path().join("constant"))?;
        std::fs::write(dir.path().join("processor.txt"), "")?;
        let found = fs.subdirs_with_prefix(dir.path(), "processor")?;
        assert_eq!(
            vec![dir.path().join("processor0"), dir.path().join("processor1")],
            found
        );
        Ok(())
    }
}
