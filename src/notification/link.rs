//! 链接来源 - 字面量或延迟求值的函数

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

type Supplier = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// A URL option that is either a fixed string or computed when the card is built.
#[derive(Clone)]
pub enum LinkSource {
    Literal(String),
    Supplier(Supplier),
}

impl LinkSource {
    pub fn literal(url: impl Into<String>) -> Self {
        LinkSource::Literal(url.into())
    }

    pub fn supplier<F>(f: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        LinkSource::Supplier(Arc::new(f))
    }

    /// 求值一次；空字符串视为没有链接
    pub fn resolve(&self) -> Option<String> {
        let value = match self {
            LinkSource::Literal(url) => Some(url.clone()),
            LinkSource::Supplier(f) => f(),
        };
        value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
}

impl fmt::Debug for LinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkSource::Literal(url) => f.debug_tuple("Literal").field(url).finish(),
            LinkSource::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}

impl From<&str> for LinkSource {
    fn from(url: &str) -> Self {
        LinkSource::literal(url)
    }
}

impl From<String> for LinkSource {
    fn from(url: String) -> Self {
        LinkSource::Literal(url)
    }
}

impl<'de> Deserialize<'de> for LinkSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(LinkSource::Literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_literal_resolve() {
        assert_eq!(
            LinkSource::literal("https://ci.example.com/1").resolve(),
            Some("https://ci.example.com/1".to_string())
        );
        assert_eq!(LinkSource::literal("  ").resolve(), None);
    }

    #[test]
    fn test_supplier_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let source = LinkSource::supplier(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some("https://ci.example.com/run/42".to_string())
        });

        assert_eq!(source.resolve().as_deref(), Some("https://ci.example.com/run/42"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(LinkSource::supplier(|| None).resolve(), None);
        assert_eq!(LinkSource::supplier(|| Some(String::new())).resolve(), None);
    }

    #[test]
    fn test_deserialize_from_string() {
        let source: LinkSource = serde_json::from_str(r#""https://example.com""#).unwrap();
        assert!(matches!(source, LinkSource::Literal(ref u) if u == "https://example.com"));
        assert_eq!(format!("{:?}", LinkSource::supplier(|| None)), "Supplier(..)");
    }
}
