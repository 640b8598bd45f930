use path_clean::PathClean;
use std::path::{Component, Path, PathBuf};

/// Unify path separators so ids look the same on every platform
pub fn to_unix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Lexically normalize a path (`a/./b/../c` -> `a/c`) without touching the disk
pub fn normalize(path: &Path) -> PathBuf {
    path.clean()
}

/// Relative path from `base` to `target`; both are expected to be normalized.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component> = base.components().collect();
    let target: Vec<Component> = target.components().collect();

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// Root-relative module id, e.g. `./src/index.js`
pub fn module_id(root: &Path, absolute_path: &Path) -> String {
    let relative = relative_path(root, absolute_path);
    format!("./{}", to_unix_path(&relative))
}
