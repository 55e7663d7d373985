//! Deserializable manager configuration.
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config: modelgraph::GraphConfig = serde_json::from_str(
//!     r#"{ "prefix_namespace": "App", "namespaces": ["Admin"], "convention": "nested" }"#,
//! )?;
//! let manager = modelgraph::Manager::builder().from_config(&config).build();
//! assert_eq!(manager.namespaces().prefix(), Some("App"));
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::convention::ConventionKind;
use crate::value::Value;

/// Everything a [`crate::Manager`] can be configured with from a file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Base namespace, searched last.
    pub prefix_namespace: Option<String>,
    /// Added namespaces in registration order.
    pub namespaces: Vec<String>,
    /// Named injection defaults.
    pub defaults: BTreeMap<String, Value>,
    /// Built-in naming convention, if any.
    pub convention: Option<ConventionKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_toml() {
        let config: GraphConfig = toml::from_str(
            r#"
prefix_namespace = "App"
namespaces = ["Admin", "::Vendor"]
convention = "flattened"

[defaults]
timeout = 5
dsn = "postgres://localhost"
"#,
        )
        .unwrap();
        assert_eq!(config.prefix_namespace.as_deref(), Some("App"));
        assert_eq!(config.namespaces, ["Admin", "::Vendor"]);
        assert_eq!(config.convention, Some(ConventionKind::Flattened));
        assert_eq!(config.defaults.get("timeout"), Some(&Value::Int(5)));
    }

    #[test]
    fn everything_is_optional() {
        let config: GraphConfig = toml::from_str("").unwrap();
        assert!(config.prefix_namespace.is_none());
        assert!(config.namespaces.is_empty());
        assert!(config.convention.is_none());
    }
}
