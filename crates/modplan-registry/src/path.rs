//! Include and library path composition.
//!
//! Paths are declared as a [`PathSpec`]: an anchor plus a relative suffix.
//! They are joined against concrete roots only when a plan is built, so
//! moving the plugin or the SDK never requires re-deriving stored paths.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Placeholder expanded to the generated-code directory name.
pub const GENERATED_PLACEHOLDER: &str = "{generated}";

/// Which root a [`PathSpec`] is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathAnchor {
    /// The owning module's directory.
    Module,
    /// The plugin root directory.
    Plugin,
    /// The prebuilt SDK root directory.
    Sdk,
}

/// A root anchor plus a relative suffix such as `Public/StdbGenerated`.
///
/// The suffix is normalized on construction, so `Public\X`, `./Public/X`
/// and `Public/Y/../X` are all the same spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSpec {
    anchor: PathAnchor,
    relative: String,
}

impl PathSpec {
    /// Create a spec relative to `anchor`.
    pub fn new(anchor: PathAnchor, relative: impl Into<String>) -> Self {
        Self {
            anchor,
            relative: normalize_relative(&relative.into()),
        }
    }

    /// Spec relative to the owning module's directory.
    pub fn module(relative: impl Into<String>) -> Self {
        Self::new(PathAnchor::Module, relative)
    }

    /// Spec relative to the plugin directory.
    pub fn plugin(relative: impl Into<String>) -> Self {
        Self::new(PathAnchor::Plugin, relative)
    }

    /// Spec relative to the SDK root.
    pub fn sdk(relative: impl Into<String>) -> Self {
        Self::new(PathAnchor::Sdk, relative)
    }

    /// Parse a declaration string.
    ///
    /// `$plugin/...` and `$sdk/...` select those anchors; anything else is
    /// module-relative. `{generated}` expands to `generated_dir`.
    pub fn parse(spec: &str, generated_dir: &str) -> Self {
        let expanded = spec.replace(GENERATED_PLACEHOLDER, generated_dir);
        for (prefix, anchor) in [("$plugin", PathAnchor::Plugin), ("$sdk", PathAnchor::Sdk)] {
            if let Some(rest) = expanded.strip_prefix(prefix) {
                if rest.is_empty() || rest.starts_with(['/', '\\']) {
                    return Self::new(anchor, rest.trim_start_matches(['/', '\\']));
                }
            }
        }
        Self::module(expanded)
    }

    /// The anchor this spec is relative to.
    pub fn anchor(&self) -> PathAnchor {
        self.anchor
    }

    /// The normalized relative suffix, `/`-separated.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Relative suffix split into segments.
    pub fn segments(&self) -> Vec<&str> {
        split_segments(&self.relative)
    }

    /// Compose this spec into a path for the module named `module`.
    pub fn resolve(&self, roots: &PathRoots, module: &str) -> PathBuf {
        let root = match self.anchor {
            PathAnchor::Module => roots.module_dir(module),
            PathAnchor::Plugin => roots.plugin_dir().to_path_buf(),
            PathAnchor::Sdk => roots.sdk_dir(),
        };
        compose(&root, &self.segments())
    }
}

impl std::fmt::Display for PathSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.anchor {
            PathAnchor::Module => f.write_str(&self.relative),
            PathAnchor::Plugin => write!(f, "$plugin/{}", self.relative),
            PathAnchor::Sdk => write!(f, "$sdk/{}", self.relative),
        }
    }
}

/// Concrete roots that [`PathSpec`]s are composed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRoots {
    plugin_dir: PathBuf,
    source_dir: String,
    sdk_root: String,
}

impl PathRoots {
    /// Default directory holding module sources, relative to the plugin.
    pub const DEFAULT_SOURCE_DIR: &'static str = "Source";
    /// Default SDK location, relative to the plugin.
    pub const DEFAULT_SDK_ROOT: &'static str = "Source/SpacetimeSDK";

    /// Roots for a plugin at `plugin_dir` with the default layout.
    pub fn new(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
            source_dir: Self::DEFAULT_SOURCE_DIR.to_string(),
            sdk_root: Self::DEFAULT_SDK_ROOT.to_string(),
        }
    }

    /// Override the module source directory (relative to the plugin).
    pub fn with_source_dir(mut self, source_dir: impl Into<String>) -> Self {
        self.source_dir = source_dir.into();
        self
    }

    /// Override the SDK root (relative to the plugin, `..` allowed).
    pub fn with_sdk_root(mut self, sdk_root: impl Into<String>) -> Self {
        self.sdk_root = sdk_root.into();
        self
    }

    /// The plugin root directory.
    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    /// Directory of the module named `module`.
    pub fn module_dir(&self, module: &str) -> PathBuf {
        let mut segments = split_segments(&self.source_dir);
        segments.push(module);
        compose(&self.plugin_dir, &segments)
    }

    /// The SDK root directory.
    pub fn sdk_dir(&self) -> PathBuf {
        compose(&self.plugin_dir, &split_segments(&self.sdk_root))
    }
}

/// Join `segments` onto `root` in order.
///
/// Empty and `.` segments are skipped; `..` removes the previous normal
/// component, lexically, and stops at a filesystem root. The filesystem is never consulted, so the result
/// is a pure function of the arguments.
pub fn compose<S: AsRef<str>>(root: &Path, segments: &[S]) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in segments {
        for part in split_segments(segment.as_ref()) {
            match part {
                "." => {}
                ".." => match path.components().next_back() {
                    Some(Component::Normal(_)) => {
                        path.pop();
                    }
                    // Nothing above a filesystem root.
                    Some(Component::RootDir | Component::Prefix(_)) => {}
                    _ => path.push(".."),
                },
                _ => path.push(part),
            }
        }
    }
    path
}

/// Drop empty and `.` segments, fold `x/..`, and join with `/`.
/// Leading `..` segments are kept.
fn normalize_relative(relative: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for part in split_segments(relative) {
        match part {
            "." => {}
            ".." if out.last().is_some_and(|last| *last != "..") => {
                out.pop();
            }
            _ => out.push(part),
        }
    }
    out.join("/")
}

fn split_segments(s: &str) -> Vec<&str> {
    s.split(['/', '\\']).filter(|p| !p.is_empty()).collect()
}
