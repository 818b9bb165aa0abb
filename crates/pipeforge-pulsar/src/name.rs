//! Fully-qualified Pulsar topic names

use std::fmt;

const PERSISTENT_PREFIX: &str = "persistent://";

/// A tenant/namespace-qualified Pulsar topic name.
///
/// Logical topology names never carry the qualifier; it is attached here,
/// when the physical handle is produced, and ignored again whenever
/// connections are matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PulsarName {
    pub tenant: String,
    pub namespace: String,
    pub name: String,
}

impl PulsarName {
    pub fn new(
        tenant: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// The `persistent://tenant/namespace/name` form used by admin APIs.
    pub fn fully_qualified(&self) -> String {
        format!(
            "{PERSISTENT_PREFIX}{}/{}/{}",
            self.tenant, self.namespace, self.name
        )
    }

    /// Parse a `persistent://tenant/namespace/name` string.
    pub fn parse(qualified: &str) -> Option<Self> {
        let rest = qualified.strip_prefix(PERSISTENT_PREFIX)?;
        let mut parts = rest.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(tenant), Some(namespace), Some(name))
                if !tenant.is_empty() && !namespace.is_empty() && !name.is_empty() =>
            {
                Some(Self::new(tenant, namespace, name))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PulsarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fully_qualified())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_qualified() {
        let name = PulsarName::new("public", "default", "input-topic");
        assert_eq!(
            name.fully_qualified(),
            "persistent://public/default/input-topic"
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        let name = PulsarName::new("acme", "pipelines", "events");
        assert_eq!(PulsarName::parse(&name.fully_qualified()), Some(name));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(PulsarName::parse("events"), None);
        assert_eq!(PulsarName::parse("persistent://only-tenant"), None);
        assert_eq!(PulsarName::parse("persistent://t//name"), None);
        assert_eq!(PulsarName::parse("non-persistent://t/ns/name"), None);
    }

    #[test]
    fn test_topic_name_may_contain_slashes() {
        let parsed = PulsarName::parse("persistent://t/ns/a/b").unwrap();
        assert_eq!(parsed.name, "a/b");
    }
}
