//! Ref protection

/// Decides whether a ref is protected
pub trait RefProtection: Send + Sync {
    fn is_protected(&self, ref_name: &str) -> bool;
}

/// Treats every ref as unprotected
#[derive(Debug, Clone, Copy, Default)]
pub struct Unprotected;

impl RefProtection for Unprotected {
    fn is_protected(&self, _ref_name: &str) -> bool {
        false
    }
}

/// Protection by a list of ref patterns
///
/// A pattern matches exactly, or by prefix when it ends in a single `*`
/// (e.g. `release/*`).
#[derive(Debug, Clone, Default)]
pub struct ProtectedRefs {
    patterns: Vec<String>,
}

impl ProtectedRefs {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

impl RefProtection for ProtectedRefs {
    fn is_protected(&self, ref_name: &str) -> bool {
        if ref_name.is_empty() {
            return false;
        }

        self.patterns
            .iter()
            .any(|pattern| match pattern.strip_suffix('*') {
                Some(prefix) => ref_name.starts_with(prefix),
                None => pattern == ref_name,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_wildcard_patterns() {
        let refs = ProtectedRefs::new(["main", "release/*"]);

        assert!(refs.is_protected("main"));
        assert!(refs.is_protected("release/1.2"));
        assert!(!refs.is_protected("mainline"));
        assert!(!refs.is_protected("feature/release"));
        assert!(!refs.is_protected(""));
    }

    #[test]
    fn test_unprotected() {
        assert!(!Unprotected.is_protected("main"));
    }
}
