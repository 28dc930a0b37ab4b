use crate::shortcode::ShortCode;

const FORWARD_PREFIX: &str = "short:";
const REVERSE_PREFIX: &str = "url:";

/// Key layout of the two mappings kept in the store.
///
/// The forward mapping (`short:<code>` → long URL) and the reverse mapping
/// (`url:<long URL>` → code) share one flat keyspace, told apart by prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    forward_prefix: String,
    reverse_prefix: String,
}

impl KeySpace {
    /// Creates a key space whose prefixes are preceded by `namespace`,
    /// e.g. `"app:"` yields `app:short:<code>` and `app:url:<long URL>`.
    pub fn with_namespace(namespace: impl AsRef<str>) -> Self {
        let namespace = namespace.as_ref();
        Self {
            forward_prefix: format!("{namespace}{FORWARD_PREFIX}"),
            reverse_prefix: format!("{namespace}{REVERSE_PREFIX}"),
        }
    }

    /// Key of the forward mapping for `code`.
    pub fn forward_key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.forward_prefix, code.as_str())
    }

    /// Key of the reverse mapping for `long_url`.
    pub fn reverse_key(&self, long_url: &str) -> String {
        format!("{}{}", self.reverse_prefix, long_url)
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self {
            forward_prefix: FORWARD_PREFIX.to_string(),
            reverse_prefix: REVERSE_PREFIX.to_string(),
        }
    }
}
