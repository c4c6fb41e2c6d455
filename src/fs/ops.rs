use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use util::PathEncodingError;

use super::Error;

/// Copy `src` to `tgt`, recursively if needed.
/// Returns the number of files, links and directories created.
pub fn copy(src: &Path, tgt: &Path) -> Result<usize> {
    if src.is_symlink() {
        let link_tgt = fs::read_link(src)?;
        symlink(&link_tgt, tgt)?;
        Ok(1)
    } else if src.is_file() {
        fs::copy(src, tgt)?;
        Ok(1)
    } else if src.is_dir() {
        copy_tree(src, tgt)
    } else {
        Err(Error::UnknownPathType(src.to_str().ok_or(PathEncodingError)?.to_owned()).into())
    }
}

/// Copy a directory tree, depth-first. Symlinks that point inside the tree
/// are re-pointed into the copy; links to anything else are kept as-is.
fn copy_tree(src_root: &Path, tgt_root: &Path) -> Result<usize> {
    let mut pending = vec![(src_root.to_path_buf(), tgt_root.to_path_buf())];
    let mut created = 0;

    while let Some((src, tgt)) = pending.pop() {
        fs::create_dir_all(&tgt)?;
        created += 1;
        for entry in fs::read_dir(&src)? {
            let entry = entry?;
            let ty = entry.file_type()?;
            let src_entry = entry.path();
            let tgt_entry = tgt.join(entry.file_name());
            if ty.is_symlink() {
                let orig_link_tgt = fs::read_link(&src_entry)?;
                let new_link_tgt = relocate_link(src_root, tgt_root, orig_link_tgt)?;
                symlink(&new_link_tgt, &tgt_entry)?;
                created += 1;
            } else if ty.is_dir() {
                pending.push((src_entry, tgt_entry));
            } else if ty.is_file() {
                fs::copy(&src_entry, &tgt_entry)?;
                created += 1;
            } else {
                return Err(Error::UnknownPathType(
                    src_entry.to_str().ok_or(PathEncodingError)?.to_owned(),
                )
                .into());
            }
        }
    }
    Ok(created)
}

fn relocate_link(src_root: &Path, tgt_root: &Path, link_tgt: PathBuf) -> Result<PathBuf> {
    if link_tgt.starts_with(src_root) {
        Ok(tgt_root.join(link_tgt.strip_prefix(src_root)?))
    } else {
        Ok(link_tgt)
    }
}

/// Symlink the given `link` to `tgt`; works for unix and windows.
pub fn symlink(tgt: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(tgt, link)?;

    #[cfg(windows)]
    if tgt.is_dir() {
        std::os::windows::fs::symlink_dir(tgt, link)?;
    } else {
        std::os::windows::fs::symlink_file(tgt, link)?;
    }
    Ok(())
}
