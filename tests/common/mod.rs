//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `classes_artifact`: the raw text of `tests/fixtures/search/classes_e.js`
//! - `site`: a temporary documentation site with a `search/` directory holding the
//!   classes fixture plus small `functions` and `files` artifacts
//!
//! [`TempWorkspace`] provides a reusable temp directory abstraction for tests that
//! write their own artifacts.

use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns the project root directory (where Cargo.toml lives).
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Path of a file under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture_path(relative: &str) -> PathBuf {
    project_root().join("tests/fixtures").join(relative)
}

/// A temporary workspace directory for test isolation.
///
/// Provides basic filesystem operations within a temp directory that is
/// automatically cleaned up when dropped.
///
/// # Example
///
/// ```ignore
/// let workspace = TempWorkspace::new();
/// workspace.create_file("search/classes_0.js", "var searchData=[];");
/// assert!(workspace.path().join("search/classes_0.js").exists());
/// ```
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a directory (and all parent directories) within this workspace.
    ///
    /// # Panics
    /// Panics if directory creation fails.
    pub fn create_dir(&self, path: &str) {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path)
            .unwrap_or_else(|e| panic!("Failed to create directory '{}': {}", path, e));
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Copies a file from the real filesystem into this workspace.
    ///
    /// # Panics
    /// Panics if copying fails.
    pub fn copy_file(&self, source: &Path, dest_relative: &str) {
        let dest = self.root.join(dest_relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!(
                    "Failed to create parent directory for '{}': {}",
                    dest_relative, e
                )
            });
        }
        std::fs::copy(source, &dest).unwrap_or_else(|e| {
            panic!(
                "Failed to copy '{}' to '{}': {}",
                source.display(),
                dest_relative,
                e
            )
        });
    }

    /// Number of regular files directly inside `path`.
    pub fn count_files(&self, path: &str) -> usize {
        std::fs::read_dir(self.root.join(path))
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.path().is_file())
                    .count()
            })
            .unwrap_or(0)
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
pub const FUNCTIONS_ARTIFACT: &str = r#"var searchData=
[
  ['objectcount_7001',['ObjectCount',['../classchip_1_1_system_1_1_object_pool.html#a51c3',1,'chip::System::ObjectPool']]],
  ['onoff_7002',['OnOff',['../namespacechip_1_1_controller.html#a0b1c',1,'chip::Controller'],['../classchip_1_1_controller_1_1_on_off_cluster.html#a9e2f',1,'chip::Controller::OnOffCluster']]],
  ['open_7003',['open',['http://en.cppreference.com/w/cpp/io/basic_fstream/open.html',0,'std::basic_fstream']]]
];
"#;

#[allow(dead_code)]
pub const FILES_ARTIFACT: &str = r#"var searchData=
[
  ['object_2eh_8001',['Object.h',['../_object_8h.html',1,'']]],
  ['optional_2eh_8002',['Optional.h',['../_optional_8h.html',1,'']]]
];
"#;

#[allow(dead_code)]
pub const ALL_ARTIFACT: &str = r#"var searchData=
[
  ['object_6334',['Object',['../classchip_1_1_system_1_1_object.html',1,'chip::System']]],
  ['object_2eh_8001',['Object.h',['../_object_8h.html',1,'']]],
  ['objectcount_7001',['ObjectCount',['../classchip_1_1_system_1_1_object_pool.html#a51c3',1,'chip::System::ObjectPool']]]
];
"#;

/// Raw text of the classes fixture.
#[allow(dead_code)]
#[fixture]
pub fn classes_artifact() -> String {
    std::fs::read_to_string(fixture_path("search/classes_e.js"))
        .expect("Failed to read classes fixture")
}

/// A documentation site whose `search/` directory holds several categories.
#[allow(dead_code)]
#[fixture]
pub fn site() -> TempWorkspace {
    let workspace = TempWorkspace::new();
    workspace.copy_file(&fixture_path("search/classes_e.js"), "search/classes_e.js");
    workspace.create_file("search/functions_e.js", FUNCTIONS_ARTIFACT);
    workspace.create_file("search/files_e.js", FILES_ARTIFACT);
    // Generator support files that are not artifacts
    workspace.create_file("search/search.js", "function SearchBox() {}");
    workspace.create_file("search/searchdata.js", "var indexSectionsWithContent = {};");
    workspace.create_file("search/search.css", "body {}");
    workspace
}

/// Path of the `search/` directory of a site fixture.
#[allow(dead_code)] // Used across different integration test crates
pub fn search_dir(workspace: &TempWorkspace) -> PathBuf {
    workspace.path().join("search")
}
