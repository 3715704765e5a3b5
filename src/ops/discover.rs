//! Find the packages under a `node_modules` tree that need compiling.
//!
//! Discovery runs in two passes. The tree walk lists candidate package roots,
//! looking through `@scope` folders so that scoped packages are candidates
//! and the scope folders themselves are not. Each candidate is then kept only
//! if it, or any directory beneath it, passes the eligibility check.

use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use walkdir::WalkDir;

use crate::ops::eligibility::is_compilable;

/// Leading character of hidden entries, skipped by the tree walk.
const HIDDEN_PREFIX: char = '.';

/// Leading character of scope folders such as `@angular`.
const SCOPE_PREFIX: char = '@';

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read directory `{}`", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Discover compilable packages under `root`, in directory-listing order.
pub fn find_packages_to_compile(root: &Path) -> Result<Vec<PathBuf>> {
    let candidates = find_candidates(root)?;
    tracing::debug!(
        "found {} candidate package(s) under {}",
        candidates.len(),
        root.display()
    );

    let mut packages = Vec::new();
    for candidate in candidates {
        if recursive_dir_test(&candidate, is_compilable)? {
            packages.push(candidate);
        }
    }
    Ok(packages)
}

/// List candidate package roots under `root`.
///
/// Hidden entries are skipped. Entries starting with `@` are scope folders:
/// their children are spliced in where the scope folder was listed.
pub fn find_candidates(root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut candidates = Vec::new();
    let mut stack: Vec<(PathBuf, ReadDir)> = vec![open_dir(root)?];

    while let Some((dir, entries)) = stack.last_mut() {
        let Some(entry) = entries.next() else {
            stack.pop();
            continue;
        };
        let entry = entry.map_err(|source| DiscoveryError::ReadDir {
            path: dir.clone(),
            source,
        })?;

        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(HIDDEN_PREFIX) {
            continue;
        }

        let path = entry.path();
        if name.starts_with(SCOPE_PREFIX) {
            let scope = open_dir(&path)?;
            stack.push(scope);
        } else {
            candidates.push(path);
        }
    }

    Ok(candidates)
}

fn open_dir(path: &Path) -> Result<(PathBuf, ReadDir), DiscoveryError> {
    let entries = fs::read_dir(path).map_err(|source| DiscoveryError::ReadDir {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((path.to_path_buf(), entries))
}

/// Whether `dir` or any directory beneath it satisfies `test`.
///
/// The search is depth-first and stops at the first match. `dir` itself is
/// always tested; below it only real directories are tested and descended
/// into, symlinks are not followed.
pub fn recursive_dir_test<F>(dir: &Path, mut test: F) -> Result<bool>
where
    F: FnMut(&Path) -> Result<bool>,
{
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        if entry.depth() > 0 && !entry.file_type().is_dir() {
            continue;
        }
        if test(entry.path())? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::PackageFixture;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn node_modules() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("node_modules");
        fs::create_dir(&root).unwrap();
        (tmp, root)
    }

    fn as_set(paths: Vec<PathBuf>) -> HashSet<PathBuf> {
        paths.into_iter().collect()
    }

    #[test]
    fn test_candidates_flatten_scopes() {
        let (_tmp, root) = node_modules();
        fs::create_dir_all(root.join("rxjs")).unwrap();
        fs::create_dir_all(root.join("@angular/core")).unwrap();
        fs::create_dir_all(root.join("@angular/common")).unwrap();
        fs::create_dir_all(root.join(".bin")).unwrap();
        fs::write(root.join(".yarn-integrity"), "").unwrap();

        let candidates = as_set(find_candidates(&root).unwrap());
        let expected: HashSet<_> = [
            root.join("rxjs"),
            root.join("@angular/core"),
            root.join("@angular/common"),
        ]
        .into_iter()
        .collect();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn test_candidates_keep_scope_children_together() {
        let (_tmp, root) = node_modules();
        fs::create_dir_all(root.join("@scope/a")).unwrap();
        fs::create_dir_all(root.join("@scope/b")).unwrap();
        fs::create_dir_all(root.join("other")).unwrap();

        let candidates = find_candidates(&root).unwrap();
        assert_eq!(candidates.len(), 3);
        let a = candidates.iter().position(|p| p.ends_with("@scope/a")).unwrap();
        let b = candidates.iter().position(|p| p.ends_with("@scope/b")).unwrap();
        assert_eq!(a.abs_diff(b), 1);
    }

    #[test]
    fn test_candidates_missing_root() {
        let tmp = TempDir::new().unwrap();
        let err = find_candidates(&tmp.path().join("node_modules")).unwrap_err();
        assert!(matches!(err, DiscoveryError::ReadDir { .. }));
    }

    #[test]
    fn test_recursive_dir_test_depth_first_short_circuit() {
        let tmp = TempDir::new().unwrap();
        let top = tmp.path().join("top");
        fs::create_dir_all(top.join("a/b/c/d")).unwrap();
        fs::create_dir_all(top.join("x")).unwrap();

        let mut visited = Vec::new();
        let found = recursive_dir_test(&top, |p| {
            visited.push(p.to_path_buf());
            Ok(p.ends_with("c"))
        })
        .unwrap();

        assert!(found);
        assert_eq!(visited[0], top);
        assert_eq!(visited.last().unwrap(), &top.join("a/b/c"));
        assert!(!visited.contains(&top.join("a/b/c/d")));
    }

    #[test]
    fn test_recursive_dir_test_ignores_files() {
        let tmp = TempDir::new().unwrap();
        let top = tmp.path().join("top");
        fs::create_dir_all(top.join("sub")).unwrap();
        fs::write(top.join("file.js"), "").unwrap();

        let mut visited = Vec::new();
        let found = recursive_dir_test(&top, |p| {
            visited.push(p.to_path_buf());
            Ok(false)
        })
        .unwrap();

        assert!(!found);
        assert_eq!(visited.len(), 2);
        assert!(!visited.contains(&top.join("file.js")));
    }

    #[test]
    fn test_recursive_dir_test_propagates_errors() {
        let tmp = TempDir::new().unwrap();
        let result = recursive_dir_test(tmp.path(), |_| anyhow::bail!("check failed"));
        assert!(result.is_err());
    }

    #[test]
    fn test_recursive_dir_test_deep_tree() {
        let tmp = TempDir::new().unwrap();
        let mut deepest = tmp.path().join("top");
        for i in 0..64 {
            deepest = deepest.join(format!("d{i}"));
        }
        fs::create_dir_all(&deepest).unwrap();

        let target = deepest.clone();
        let found = recursive_dir_test(&tmp.path().join("top"), |p| Ok(p == target)).unwrap();
        assert!(found);
    }

    #[test]
    fn test_discovery_end_to_end() {
        let (_tmp, root) = node_modules();
        PackageFixture::compilable("pkg-a").write_to(&root).unwrap();
        PackageFixture::typed_only("pkg-b").write_to(&root).unwrap();
        PackageFixture::compilable("@scope/pkg-c").write_to(&root).unwrap();

        let packages = as_set(find_packages_to_compile(&root).unwrap());
        let expected: HashSet<_> = [root.join("pkg-a"), root.join("@scope/pkg-c")]
            .into_iter()
            .collect();
        assert_eq!(packages, expected);
    }

    #[test]
    fn test_scope_folder_is_never_a_result() {
        let (_tmp, root) = node_modules();
        PackageFixture::compilable("@scope/eligible").write_to(&root).unwrap();
        PackageFixture::typed_only("@scope/ineligible").write_to(&root).unwrap();

        let packages = find_packages_to_compile(&root).unwrap();
        assert_eq!(packages, vec![root.join("@scope/eligible")]);
    }

    #[test]
    fn test_eligible_descendant_includes_ancestor() {
        let (_tmp, root) = node_modules();
        let outer = root.join("material");
        fs::create_dir_all(&outer).unwrap();
        PackageFixture::compilable("button")
            .write_to(&outer.join("deeply/nested"))
            .unwrap();

        let packages = find_packages_to_compile(&root).unwrap();
        assert_eq!(packages, vec![outer]);
    }

    #[test]
    fn test_nested_node_modules_is_searched_but_not_matched() {
        let (_tmp, root) = node_modules();
        let outer = root.join("outer");
        PackageFixture::typed_only("outer").write_to(&root).unwrap();
        PackageFixture::compilable("inner")
            .write_to(&outer.join("node_modules"))
            .unwrap();

        let packages = find_packages_to_compile(&root).unwrap();
        assert_eq!(packages, vec![outer]);
    }

    #[test]
    fn test_top_level_files_are_skipped() {
        let (_tmp, root) = node_modules();
        fs::write(root.join("README.md"), "").unwrap();
        PackageFixture::compilable("pkg").write_to(&root).unwrap();

        let packages = find_packages_to_compile(&root).unwrap();
        assert_eq!(packages, vec![root.join("pkg")]);
    }

    #[test]
    fn test_malformed_manifest_aborts_discovery() {
        let (_tmp, root) = node_modules();
        PackageFixture::new("broken")
            .with_manifest("{")
            .write_to(&root)
            .unwrap();

        assert!(find_packages_to_compile(&root).is_err());
    }

    #[test]
    fn test_odd_typings_do_not_abort_discovery() {
        let (_tmp, root) = node_modules();
        PackageFixture::compilable("good").write_to(&root).unwrap();
        PackageFixture::new("odd")
            .with_manifest(r#"{"typings": false}"#)
            .with_file("index.metadata.json", "{}")
            .write_to(&root)
            .unwrap();
        PackageFixture::new("blank")
            .with_manifest(r#"{"typings": ""}"#)
            .with_file(".metadata.json", "{}")
            .write_to(&root)
            .unwrap();

        let packages = find_packages_to_compile(&root).unwrap();
        assert_eq!(packages, vec![root.join("good")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_candidate_is_searched() {
        let (tmp, root) = node_modules();
        let real = tmp.path().join("real");
        PackageFixture::compilable("inner").write_to(&real).unwrap();
        std::os::unix::fs::symlink(&real, root.join("linked")).unwrap();

        let packages = find_packages_to_compile(&root).unwrap();
        assert_eq!(packages, vec![root.join("linked")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_subdirectories_are_not_followed() {
        let (tmp, root) = node_modules();
        let elsewhere = tmp.path().join("elsewhere");
        PackageFixture::compilable("real").write_to(&elsewhere).unwrap();

        let pkg = root.join("pkg");
        fs::create_dir_all(&pkg).unwrap();
        std::os::unix::fs::symlink(elsewhere.join("real"), pkg.join("link")).unwrap();

        let packages = find_packages_to_compile(&root).unwrap();
        assert!(packages.is_empty());
    }
}
