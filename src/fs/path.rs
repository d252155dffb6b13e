//! Remote path resolution.
//!
//! Relative paths are resolved against the session's home directory and every
//! path is normalized textually (no remote lookups), the same way POSIX
//! `realpath -m` treats `.`, `..` and repeated separators.

use std::fmt;

/// An absolute, normalized remote path. Always starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedPath(String);

impl ResolvedPath {
    /// The filesystem root.
    pub fn root() -> Self {
        ResolvedPath("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path components, without the leading root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolvedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ResolvedPath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ResolvedPath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Normalize a path: collapse `.`, `..` and repeated `/`, drop trailing `/`.
///
/// The input is treated as absolute; `..` at the root stays at the root.
pub fn normalize(path: &str) -> ResolvedPath {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    let mut result = String::with_capacity(path.len() + 1);
    for part in &parts {
        result.push('/');
        result.push_str(part);
    }
    if result.is_empty() {
        result.push('/');
    }
    ResolvedPath(result)
}

/// Resolves user-supplied paths against a home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    home: ResolvedPath,
}

impl PathResolver {
    pub fn new(home: &str) -> Self {
        Self {
            home: normalize(home),
        }
    }

    pub fn home(&self) -> &ResolvedPath {
        &self.home
    }

    /// Resolve `input` to an absolute path.
    ///
    /// * empty input resolves to the home directory
    /// * input without a leading `/` is taken relative to home
    pub fn resolve(&self, input: &str) -> ResolvedPath {
        if input.is_empty() {
            return self.home.clone();
        }
        if input.starts_with('/') {
            normalize(input)
        } else {
            normalize(&format!("{}/{}", self.home, input))
        }
    }
}
