//! Candidate type-name generation.
//!
//! A [`NamespaceHierarchy`] is the prefix namespace plus every namespace added
//! after it, in registration order. Entries written with a leading
//! [`SEPARATOR`] are absolute: they stand on their own. Every other entry is
//! relative and extends the namespaces registered before it.
//!
//! For prefix `Root` and added `A`, `B`, resolving `x` with suffix `Model`
//! yields, most specific first:
//!
//! ```
//! use modelgraph::NamespaceHierarchy;
//!
//! let mut ns = NamespaceHierarchy::new(Some("Root"));
//! ns.add("A");
//! ns.add("B");
//! assert_eq!(
//!     ns.candidates("x", None, &["Model"]),
//!     ["Root::A::B::XModel", "Root::A::XModel", "Root::XModel"],
//! );
//! ```

/// Namespace path separator.
pub const SEPARATOR: &str = "::";

/// Upper-cases the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strips every leading [`SEPARATOR`] from a type or namespace name.
#[must_use]
pub fn canonical(name: &str) -> &str {
    let mut rest = name;
    while let Some(stripped) = rest.strip_prefix(SEPARATOR) {
        rest = stripped;
    }
    rest
}

/// Ordered namespaces searched for model types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceHierarchy {
    prefix: Option<String>,
    added: Vec<String>,
}

impl NamespaceHierarchy {
    /// Creates a hierarchy rooted at `prefix` (which may be absent).
    #[must_use]
    pub fn new(prefix: Option<&str>) -> Self {
        NamespaceHierarchy {
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_owned),
            added: Vec::new(),
        }
    }

    /// Appends a namespace; later entries are searched first.
    pub fn add(&mut self, namespace: impl Into<String>) {
        self.added.push(namespace.into());
    }

    /// The prefix namespace.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Added namespaces in registration order.
    #[must_use]
    pub fn added(&self) -> &[String] {
        &self.added
    }

    /// Whether an entry is absolute (written with a leading separator).
    #[must_use]
    pub fn is_absolute(entry: &str) -> bool {
        entry.starts_with(SEPARATOR)
    }

    /// Builds the fully-qualified candidate names for `name`.
    ///
    /// `hint` is an extra namespace appended to every hierarchy entry for this
    /// call only. The hint is normalized to carry a leading separator, and a
    /// relative entry is dropped in favour of the hint alone when the hint
    /// already starts with the accumulated namespace (a plain text prefix
    /// test). Absolute entries are compared without their separator, so they
    /// only absorb an empty hint. Per namespace one candidate is emitted per suffix, and the full
    /// list is then reversed so the most recently added namespace comes first
    /// and the prefix namespace last. Names are returned without a leading
    /// separator.
    #[must_use]
    pub fn candidates(&self, name: &str, hint: Option<&str>, suffixes: &[&str]) -> Vec<String> {
        let hint = hint
            .map(canonical)
            .filter(|h| !h.is_empty())
            .map(|h| format!("{SEPARATOR}{h}"))
            .unwrap_or_default();
        let class = capitalize(name);

        let sources = std::iter::once(self.prefix.as_deref().unwrap_or(""))
            .chain(self.added.iter().map(String::as_str));

        let mut running = String::new();
        let mut list = Vec::new();
        for entry in sources {
            let effective = if Self::is_absolute(entry) {
                let ns = canonical(entry);
                if hint.starts_with(ns) {
                    hint.clone()
                } else {
                    format!("{ns}{hint}")
                }
            } else {
                if !entry.is_empty() {
                    running.push_str(SEPARATOR);
                    running.push_str(entry);
                }
                if hint.starts_with(running.as_str()) {
                    hint.clone()
                } else {
                    format!("{running}{hint}")
                }
            };

            for suffix in suffixes {
                let fq = format!("{effective}{SEPARATOR}{class}{suffix}");
                list.push(canonical(&fq).to_owned());
            }
        }

        list.reverse();
        list
    }
}
