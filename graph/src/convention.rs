//! Naming conventions.
//!
//! A convention turns the name accessed on a model plus the identity of that
//! model into the `(name, namespace hint)` pair handed to the candidate
//! builder. Two conventions ship with the crate:
//!
//! | Convention | `project.db` on `App::ProjectModel` | Namespace hint |
//! |------------|-------------------------------------|----------------|
//! | [`Flattened`] | `ProjectDb` | none |
//! | [`Nested`] | `Db` | `Project` |

use crate::candidates::{capitalize, SEPARATOR};

/// Identity of the model a name is accessed on.
#[derive(Debug, Clone, Copy)]
pub struct Caller<'a> {
    /// Fully-qualified type name the model was resolved under.
    pub type_name: &'a str,
    /// Type-name suffixes the model declares (e.g. `["Model"]`).
    pub suffixes: &'a [&'a str],
}

impl Caller<'_> {
    /// The last path segment of the type name with every declared suffix
    /// stripped from its end, e.g. `App::ProjectModel` becomes `Project`.
    #[must_use]
    pub fn bare_name(&self) -> String {
        let mut bare = self
            .type_name
            .rsplit(SEPARATOR)
            .next()
            .unwrap_or(self.type_name);
        for suffix in self.suffixes {
            if !suffix.is_empty() {
                bare = bare.strip_suffix(suffix).unwrap_or(bare);
            }
        }
        bare.to_owned()
    }
}

/// Strategy mapping an accessed name onto a name and namespace hint.
pub trait NamingConvention {
    /// The model name to build candidates from.
    fn name(&self, called: &str, caller: &Caller<'_>) -> String;

    /// Extra namespace segment to append for this access only.
    fn namespace(&self, called: &str, caller: &Caller<'_>) -> Option<String>;
}

/// Encodes the whole hierarchy into one flat type name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flattened;

impl NamingConvention for Flattened {
    fn name(&self, called: &str, caller: &Caller<'_>) -> String {
        format!("{}{}", caller.bare_name(), capitalize(called))
    }

    fn namespace(&self, _called: &str, _caller: &Caller<'_>) -> Option<String> {
        None
    }
}

/// Uses the calling model's bare name as a namespace segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nested;

impl NamingConvention for Nested {
    fn name(&self, called: &str, _caller: &Caller<'_>) -> String {
        capitalize(called)
    }

    fn namespace(&self, _called: &str, caller: &Caller<'_>) -> Option<String> {
        let bare = caller.bare_name();
        (!bare.is_empty()).then_some(bare)
    }
}

/// Built-in convention selector, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConventionKind {
    /// [`Flattened`].
    Flattened,
    /// [`Nested`].
    Nested,
}

impl ConventionKind {
    /// Boxes the matching convention.
    #[must_use]
    pub fn build(self) -> Box<dyn NamingConvention> {
        match self {
            ConventionKind::Flattened => Box::new(Flattened),
            ConventionKind::Nested => Box::new(Nested),
        }
    }

    /// Configuration spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConventionKind::Flattened => "flattened",
            ConventionKind::Nested => "nested",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: Caller<'static> = Caller {
        type_name: "App::ProjectModel",
        suffixes: &["Model"],
    };

    #[test]
    fn flattened_joins_parent_and_called_name() {
        for _ in 0..3 {
            assert_eq!(Flattened.name("db", &PROJECT), "ProjectDb");
            assert_eq!(Flattened.namespace("db", &PROJECT), None);
        }
    }

    #[test]
    fn nested_uses_parent_as_namespace() {
        assert_eq!(Nested.name("db", &PROJECT), "Db");
        assert_eq!(Nested.namespace("db", &PROJECT).as_deref(), Some("Project"));
    }

    #[test]
    fn bare_name_strips_every_declared_suffix() {
        let caller = Caller {
            type_name: "Shop::CartRepoModel",
            suffixes: &["Model", "Repo"],
        };
        assert_eq!(caller.bare_name(), "Cart");
    }

    #[test]
    fn bare_name_without_namespace() {
        let caller = Caller {
            type_name: "ProjectDbModel",
            suffixes: &["Model"],
        };
        assert_eq!(caller.bare_name(), "ProjectDb");
        assert_eq!(Flattened.name("cluster", &caller), "ProjectDbCluster");
    }
}
