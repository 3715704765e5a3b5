//! Package fixtures written to real directories.

use std::path::{Path, PathBuf};

use crate::core::manifest::PACKAGE_JSON;

/// An installed package to lay out on disk.
#[derive(Debug, Clone)]
pub struct PackageFixture {
    /// Directory name, may contain a scope (`@scope/name`).
    pub name: String,
    /// `package.json` contents; `None` writes no descriptor.
    pub manifest: Option<String>,
    /// Extra files (path relative to the package root -> content).
    pub files: Vec<(PathBuf, String)>,
}

impl PackageFixture {
    /// Create an empty package directory fixture.
    pub fn new(name: impl Into<String>) -> Self {
        PackageFixture {
            name: name.into(),
            manifest: None,
            files: Vec::new(),
        }
    }

    /// A package with typings and the matching metadata file.
    pub fn compilable(name: impl Into<String>) -> Self {
        let name = name.into();
        let manifest = manifests::typed(&name, "./index.d.ts");
        PackageFixture::new(name)
            .with_manifest(manifest)
            .with_file("index.d.ts", "export declare const x: number;\n")
            .with_file("index.metadata.json", r#"{"__symbolic":"module","version":4}"#)
    }

    /// A package with typings but no metadata file.
    pub fn typed_only(name: impl Into<String>) -> Self {
        let name = name.into();
        let manifest = manifests::typed(&name, "index.d.ts");
        PackageFixture::new(name)
            .with_manifest(manifest)
            .with_file("index.d.ts", "export declare const x: number;\n")
    }

    /// Set the `package.json` contents.
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    /// Add a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Write the package under `base`, returning the package directory.
    pub fn write_to(&self, base: &Path) -> std::io::Result<PathBuf> {
        let root = base.join(&self.name);
        std::fs::create_dir_all(&root)?;

        if let Some(manifest) = &self.manifest {
            std::fs::write(root.join(PACKAGE_JSON), manifest)?;
        }

        for (path, content) in &self.files {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(full, content)?;
        }

        Ok(root)
    }
}

/// `package.json` templates.
pub mod manifests {
    /// A descriptor declaring `typings`.
    pub fn typed(name: &str, typings: &str) -> String {
        format!(
            r#"{{
  "name": "{name}",
  "version": "1.0.0",
  "typings": "{typings}"
}}
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compilable_fixture_layout() {
        let tmp = TempDir::new().unwrap();
        let root = PackageFixture::compilable("@scope/pkg")
            .write_to(tmp.path())
            .unwrap();

        assert_eq!(root, tmp.path().join("@scope/pkg"));
        assert!(root.join("package.json").exists());
        assert!(root.join("index.d.ts").exists());
        assert!(root.join("index.metadata.json").exists());
    }

    #[test]
    fn test_manifest_template_is_json() {
        let doc: serde_json::Value =
            serde_json::from_str(&manifests::typed("core", "core.d.ts")).unwrap();
        assert_eq!(doc["typings"], "core.d.ts");
        assert_eq!(doc["name"], "core");
    }
}
