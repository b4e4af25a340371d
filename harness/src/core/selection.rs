//! Fixture selection predicates.
//!
//! Deciding whether a file is a fixture is a pure function of its name and
//! contents; directory scanning lives in `io::fixtures`.

use std::path::Path;

/// Decides whether a candidate file is a fixture worth running.
pub trait FixturePredicate {
    /// Cheap name-only check, evaluated before the file is read.
    fn accepts_name(&self, name: &str) -> bool;

    /// Content check, evaluated only for names that passed `accepts_name`.
    fn accepts_contents(&self, contents: &str) -> bool;

    fn matches(&self, name: &str, contents: &str) -> bool {
        self.accepts_name(name) && self.accepts_contents(contents)
    }
}

/// Accepts test files that assert a boolean expectation.
///
/// A file qualifies when its extension is one of `extensions` and its contents
/// contain at least one of `markers` (by default `True,` or `False,`, the
/// expected-result argument of a test case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanAssertionFilter {
    extensions: Vec<String>,
    markers: Vec<String>,
}

impl BooleanAssertionFilter {
    pub fn new(extensions: Vec<String>, markers: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
        Self {
            extensions,
            markers,
        }
    }
}

impl Default for BooleanAssertionFilter {
    fn default() -> Self {
        Self::new(
            vec!["py".to_string()],
            vec!["True,".to_string(), "False,".to_string()],
        )
    }
}

impl FixturePredicate for BooleanAssertionFilter {
    fn accepts_name(&self, name: &str) -> bool {
        let Some(ext) = Path::new(name).extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|candidate| candidate == ext)
    }

    fn accepts_contents(&self, contents: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| contents.contains(marker.as_str()))
    }
}
