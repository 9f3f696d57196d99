use std::cmp::Ordering;
use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use crate::error::ListingError;

/// One immediate child of a listed directory.
///
/// Built fresh on every listing and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    /// Always `parent.join(name)`.
    pub path: PathBuf,
    /// True for directories and for symlinks that resolve to one.
    pub is_dir: bool,
    pub is_symlink: bool,
    /// Size in bytes. Not meaningful for directories.
    pub size: u64,
    pub modified: SystemTime,
    /// Platform mode bits (`st_mode` on Unix).
    pub permissions: u32,
}

impl DirectoryEntry {
    /// Stat the child `name` of `parent`.
    ///
    /// Symlinks are followed for the type and size; a dangling link falls
    /// back to the metadata of the link itself.
    fn read(parent: &Path, name: OsString) -> io::Result<Self> {
        let path = parent.join(&name);
        let link_meta = fs::symlink_metadata(&path)?;
        let is_symlink = link_meta.file_type().is_symlink();
        let meta = if is_symlink {
            fs::metadata(&path).unwrap_or(link_meta)
        } else {
            link_meta
        };

        Ok(Self {
            name: name.to_string_lossy().into_owned(),
            path,
            is_dir: meta.is_dir(),
            is_symlink,
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            permissions: mode_bits(&meta),
        })
    }

    /// Dotfiles are hidden.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

#[cfg(unix)]
fn mode_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Ordering applied within the directory and file groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Case-sensitive ascending by name.
    #[default]
    ByName,
    /// Largest first, ties by name.
    BySize,
    /// Newest first, ties by name.
    ByModifiedTime,
}

impl SortKey {
    /// Parse a config value. Unknown values fall back to `ByName`.
    pub fn from_config(s: &str) -> Self {
        match s {
            "size" => SortKey::BySize,
            "modified" => SortKey::ByModifiedTime,
            _ => SortKey::ByName,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::ByName => "Name",
            SortKey::BySize => "Size",
            SortKey::ByModifiedTime => "Modified",
        }
    }

    /// Cycle Name -> Size -> Modified -> Name.
    pub fn next(&self) -> Self {
        match self {
            SortKey::ByName => SortKey::BySize,
            SortKey::BySize => SortKey::ByModifiedTime,
            SortKey::ByModifiedTime => SortKey::ByName,
        }
    }
}

/// Read the immediate children of `path`, in no particular order.
///
/// Fails only when `path` itself cannot be enumerated. Children whose
/// metadata cannot be read are left out.
pub fn list(path: &Path) -> Result<Vec<DirectoryEntry>, ListingError> {
    let meta = fs::metadata(path).map_err(|e| ListingError::from_io(path.to_path_buf(), e))?;
    if !meta.is_dir() {
        return Err(ListingError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let reader = fs::read_dir(path).map_err(|e| ListingError::from_io(path.to_path_buf(), e))?;

    let mut entries = Vec::new();
    for item in reader {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                tracing::debug!(dir = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        match DirectoryEntry::read(path, item.file_name()) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::debug!(
                    dir = %path.display(),
                    name = ?item.file_name(),
                    error = %e,
                    "skipping child without metadata"
                );
            }
        }
    }
    Ok(entries)
}

/// `list` followed by `sort`.
pub fn list_sorted(path: &Path, key: SortKey) -> Result<Vec<DirectoryEntry>, ListingError> {
    let mut entries = list(path)?;
    sort(&mut entries, key);
    Ok(entries)
}

/// Sort in place: directories before files, then by `key`.
///
/// The sort is stable and every key falls back to the name, so sorting
/// an already sorted slice leaves it unchanged.
pub fn sort(entries: &mut [DirectoryEntry], key: SortKey) {
    entries.sort_by(|a, b| compare(a, b, key));
}

fn compare(a: &DirectoryEntry, b: &DirectoryEntry, key: SortKey) -> Ordering {
    b.is_dir.cmp(&a.is_dir).then_with(|| match key {
        SortKey::ByName => a.name.cmp(&b.name),
        SortKey::BySize => b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)),
        SortKey::ByModifiedTime => b
            .modified
            .cmp(&a.modified)
            .then_with(|| a.name.cmp(&b.name)),
    })
}

/// Number of immediate children, or 0 when the directory is unreadable.
pub fn count_children(path: &Path) -> usize {
    fs::read_dir(path).map(|r| r.count()).unwrap_or(0)
}

/// Make `path` absolute against the working directory and fold away
/// `.` and `..` lexically. Symlinks are not resolved.
pub fn resolve_absolute(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    Ok(resolved)
}

/// Parent directory of `path`; the root is its own parent.
pub fn parent_of(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

/// The user's home directory, or the filesystem root when unknown.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(filesystem_root)
}

pub fn filesystem_root() -> PathBuf {
    PathBuf::from(std::path::MAIN_SEPARATOR_STR)
}
