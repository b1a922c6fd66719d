use crate::domain::ports::ToolPathSource;
use crate::utils::error::{DiffSapError, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedTool {
    pub path: PathBuf,
    /// `describe()` of the source that produced the path.
    pub source: String,
}

/// Ordered list of places to look for the merge tool. The first hit wins.
#[derive(Default)]
pub struct ToolLocator {
    sources: Vec<Box<dyn ToolPathSource>>,
}

impl ToolLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl ToolPathSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn ToolPathSource>) {
        self.sources.push(source);
    }

    pub fn locate(&self) -> Result<LocatedTool> {
        let mut tried = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let name = source.describe();
            match source.lookup() {
                Some(path) if !path.as_os_str().is_empty() => {
                    tracing::debug!("Merge tool found via {}: {}", name, path.display());
                    return Ok(LocatedTool { path, source: name });
                }
                _ => {
                    tracing::debug!("No merge tool in {}", name);
                    tried.push(name);
                }
            }
        }

        Err(DiffSapError::ToolNotFoundError {
            tried: if tried.is_empty() {
                "no sources configured".to_string()
            } else {
                tried.join(", ")
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubSource {
        name: &'static str,
        value: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn new(name: &'static str, value: Option<&'static str>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    value,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl ToolPathSource for StubSource {
        fn describe(&self) -> String {
            self.name.to_string()
        }

        fn lookup(&self) -> Option<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value.map(PathBuf::from)
        }
    }

    #[test]
    fn test_primary_wins_and_short_circuits() {
        let (primary, _) = StubSource::new("svn", Some("C:/svn/TortoiseMerge.exe"));
        let (secondary, secondary_calls) = StubSource::new("git", Some("C:/git/TortoiseMerge.exe"));
        let locator = ToolLocator::new().with_source(primary).with_source(secondary);

        let found = locator.locate().unwrap();
        assert_eq!(found.path, PathBuf::from("C:/svn/TortoiseMerge.exe"));
        assert_eq!(found.source, "svn");
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_falls_back_to_secondary() {
        let (primary, primary_calls) = StubSource::new("svn", None);
        let (secondary, _) = StubSource::new("git", Some("C:/git/TortoiseMerge.exe"));
        let locator = ToolLocator::new().with_source(primary).with_source(secondary);

        let found = locator.locate().unwrap();
        assert_eq!(found.source, "git");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_value_is_not_a_hit() {
        let (primary, _) = StubSource::new("svn", Some(""));
        let (secondary, _) = StubSource::new("git", Some("tmerge"));
        let locator = ToolLocator::new().with_source(primary).with_source(secondary);

        assert_eq!(locator.locate().unwrap().source, "git");
    }

    #[test]
    fn test_nothing_found_lists_sources() {
        let (primary, _) = StubSource::new("svn", None);
        let (secondary, _) = StubSource::new("git", None);
        let locator = ToolLocator::new().with_source(primary).with_source(secondary);

        match locator.locate() {
            Err(DiffSapError::ToolNotFoundError { tried }) => assert_eq!(tried, "svn, git"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(ToolLocator::new().locate().is_err());
    }
}
