//! Filesystem utilities.

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `base` and drop `.` and `..` components.
///
/// Purely lexical: the path does not need to exist and symlinks are not
/// resolved.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
