use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualified name of an element: namespace URI plus local name.
///
/// Displayed (and parsed) in Clark notation, `{namespace}local`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub local_name: String,
}

impl ElementName {
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        ElementName {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// A name without a namespace. When used as a match pattern it accepts any namespace.
    pub fn local(local_name: impl Into<String>) -> Self {
        ElementName {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Checks this name against a pattern, where `None` components match anything.
    pub fn matches(&self, namespace: Option<&str>, local_name: Option<&str>) -> bool {
        let namespace_ok = match namespace {
            Some(ns) => self.namespace.as_deref() == Some(ns),
            None => true,
        };
        let local_ok = match local_name {
            Some(local) => self.local_name == local,
            None => true,
        };

        namespace_ok && local_ok
    }

    /// Same as [`ElementName::matches`] with `pattern`'s components (namespace-less patterns
    /// ignore the namespace).
    pub fn matches_name(&self, pattern: &ElementName) -> bool {
        self.matches(pattern.namespace(), Some(pattern.local_name()))
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

impl FromStr for ElementName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('{') {
            Some(rest) => {
                let (ns, local) = rest
                    .split_once('}')
                    .ok_or_else(|| format!("unterminated namespace in `{}`", s))?;
                if local.is_empty() {
                    return Err(format!("missing local name in `{}`", s));
                }
                Ok(ElementName::new(ns, local))
            }
            None if s.is_empty() => Err("empty element name".to_string()),
            None => Ok(ElementName::local(s)),
        }
    }
}

impl From<&str> for ElementName {
    fn from(local_name: &str) -> Self {
        ElementName::local(local_name)
    }
}
