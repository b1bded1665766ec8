//! Access policy for on-disk reads.
//!
//! The source reader resolves a path, then asks a [`PolicyHandler`] whether
//! it may be opened. The check is lexical: paths are made absolute against
//! the working directory and `.`/`..` are folded before comparing, so a
//! request like `src/../../etc/passwd` is denied without touching the disk.

use std::path::{Component, Path, PathBuf};

/// The result of a policy check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyDecision {
    /// The path may be read.
    Allow,
    /// The path may not be read, with a reason.
    Deny(String),
}

impl PolicyDecision {
    /// Returns true if the read is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }

    /// Returns the denial reason if denied, None if allowed.
    pub fn denial_reason(&self) -> Option<&str> {
        match self {
            PolicyDecision::Allow => None,
            PolicyDecision::Deny(reason) => Some(reason),
        }
    }
}

/// Decides whether an absolute, normalized path may be read.
pub trait PolicyHandler: Send + Sync {
    /// Check `path`, which the caller has already normalized.
    fn check_access(&self, path: &Path) -> PolicyDecision;
}

/// Allows paths that lie under one of a fixed set of roots.
#[derive(Clone, Debug, Default)]
pub struct RootPolicy {
    roots: Vec<PathBuf>,
}

impl RootPolicy {
    /// Create a policy allowing everything under `roots`.
    pub fn new(roots: impl IntoIterator<Item = impl AsRef<Path>>) -> Self {
        Self {
            roots: roots
                .into_iter()
                .map(|r| normalize_path(r.as_ref()))
                .collect(),
        }
    }

    /// The normalized roots.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl PolicyHandler for RootPolicy {
    fn check_access(&self, path: &Path) -> PolicyDecision {
        if self.roots.iter().any(|root| path.starts_with(root)) {
            PolicyDecision::Allow
        } else {
            PolicyDecision::Deny(format!(
                "{} is not under any allowed root",
                path.display()
            ))
        }
    }
}

/// Make `path` absolute against the working directory and fold `.`/`..`.
///
/// Purely lexical; symlinks are not resolved and the path need not exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping past the root leaves the root in place.
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_dots() {
        let p = normalize_path(Path::new("/srv/app/./src/../docs/guide.md"));
        assert_eq!(p, PathBuf::from("/srv/app/docs/guide.md"));
    }

    #[test]
    fn test_normalize_cannot_escape_root() {
        let p = normalize_path(Path::new("/../../etc"));
        assert_eq!(p, PathBuf::from("/etc"));
    }

    #[test]
    fn test_normalize_relative_is_absolute() {
        let p = normalize_path(Path::new("src/lib.rs"));
        assert!(p.is_absolute());
        assert!(p.ends_with("src/lib.rs"));
    }

    #[test]
    fn test_root_policy_allows_under_root() {
        let policy = RootPolicy::new(["/srv/app/src", "/srv/app/docs"]);
        assert!(
            policy
                .check_access(Path::new("/srv/app/src/main.c"))
                .is_allowed()
        );
        assert!(
            policy
                .check_access(Path::new("/srv/app/docs/a/b.md"))
                .is_allowed()
        );
    }

    #[test]
    fn test_root_policy_is_component_wise() {
        let policy = RootPolicy::new(["/srv/app/src"]);
        // Shares a string prefix but not a path prefix.
        let decision = policy.check_access(Path::new("/srv/app/src-other/x.c"));
        assert!(!decision.is_allowed());
        assert!(decision.denial_reason().is_some());
    }

    #[test]
    fn test_root_policy_denies_traversal() {
        let policy = RootPolicy::new(["/srv/app/src"]);
        let target = normalize_path(Path::new("/srv/app/src/../../../etc/passwd"));
        assert!(!policy.check_access(&target).is_allowed());
    }
}
