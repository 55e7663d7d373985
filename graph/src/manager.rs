//! The manager: root of an object graph and owner of its configuration.
//!
//! Configuration is collected by a [`ManagerBuilder`] and frozen by
//! [`ManagerBuilder::build`]; a built [`Manager`] only resolves.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::candidates::NamespaceHierarchy;
use crate::convention::{Caller, ConventionKind, NamingConvention};
use crate::error::{ResolveError, Result};
use crate::inject::Injector;
use crate::model::{Instance, Model, DEFAULT_SUFFIXES};
use crate::node::{self, Node};
use crate::registry::{Factory, Registry};
use crate::value::Value;

/// Type name the root node is attached under.
pub const MANAGER_TYPE_NAME: &str = "Manager";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a manager, recorded on every node it attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManagerId(u64);

/// Collects manager configuration.
pub struct ManagerBuilder {
    prefix: Option<String>,
    namespaces: Vec<String>,
    defaults: BTreeMap<String, Value>,
    convention: Option<Box<dyn NamingConvention>>,
    suffixes: &'static [&'static str],
    registry: Registry,
}

impl Default for ManagerBuilder {
    fn default() -> Self {
        ManagerBuilder {
            prefix: None,
            namespaces: Vec::new(),
            defaults: BTreeMap::new(),
            convention: None,
            suffixes: DEFAULT_SUFFIXES,
            registry: Registry::new(),
        }
    }
}

impl ManagerBuilder {
    /// An empty configuration.
    #[must_use]
    pub fn new() -> Self {
        ManagerBuilder::default()
    }

    /// Applies a deserialized configuration on top of this builder.
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn from_config(mut self, config: &crate::config::GraphConfig) -> Self {
        if let Some(prefix) = &config.prefix_namespace {
            self.prefix = Some(prefix.clone());
        }
        self.namespaces.extend(config.namespaces.iter().cloned());
        self = self.merge_defaults(config.defaults.clone());
        if let Some(kind) = config.convention {
            self = self.convention_kind(kind);
        }
        self
    }

    /// Base namespace, searched last.
    #[must_use]
    pub fn prefix_namespace(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Adds a namespace. Later namespaces are searched first; a leading
    /// separator makes the namespace absolute.
    #[must_use]
    pub fn add_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.push(namespace.into());
        self
    }

    /// Replaces the defaults.
    #[must_use]
    pub fn defaults<I, K>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.defaults = defaults.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// Merges defaults; keys given here override earlier ones.
    #[must_use]
    pub fn merge_defaults<I, K>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.defaults
            .extend(defaults.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Sets a single default.
    #[must_use]
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Sets the naming convention.
    #[must_use]
    pub fn naming_convention(mut self, convention: impl NamingConvention + 'static) -> Self {
        self.convention = Some(Box::new(convention));
        self
    }

    /// Sets one of the built-in naming conventions.
    #[must_use]
    pub fn convention_kind(mut self, kind: ConventionKind) -> Self {
        self.convention = Some(kind.build());
        self
    }

    /// Suffixes used for the manager's own (first-level) children.
    #[must_use]
    pub fn suffixes(mut self, suffixes: &'static [&'static str]) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Replaces the registry.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers one factory.
    #[must_use]
    pub fn register(mut self, type_name: impl AsRef<str>, factory: Factory) -> Self {
        self.registry.register(type_name, factory);
        self
    }

    /// Freezes the configuration.
    #[must_use]
    pub fn build(self) -> Manager {
        let id = ManagerId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        let mut namespaces = NamespaceHierarchy::new(self.prefix.as_deref());
        for ns in self.namespaces {
            namespaces.add(ns);
        }
        Manager {
            id,
            root: Node::attached(id, MANAGER_TYPE_NAME),
            namespaces,
            defaults: self.defaults,
            convention: self.convention,
            suffixes: self.suffixes,
            registry: self.registry,
        }
    }
}

/// Root of an object graph.
///
/// ```
/// use modelgraph::{Factory, Manager, Model, Node};
///
/// #[derive(Default)]
/// struct ProjectModel {
///     node: Node,
/// }
///
/// impl Model for ProjectModel {
///     fn node(&self) -> &Node {
///         &self.node
///     }
/// }
///
/// let manager = Manager::builder()
///     .prefix_namespace("App")
///     .register("App::ProjectModel", Factory::model(|_| Ok(ProjectModel::default())))
///     .build();
///
/// let project = manager.get("project").unwrap();
/// assert!(project.ptr_eq(&manager.get("project").unwrap()));
/// ```
pub struct Manager {
    id: ManagerId,
    root: Node,
    namespaces: NamespaceHierarchy,
    defaults: BTreeMap<String, Value>,
    convention: Option<Box<dyn NamingConvention>>,
    suffixes: &'static [&'static str],
    registry: Registry,
}

impl Manager {
    /// Starts a configuration.
    #[must_use]
    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::new()
    }

    /// This manager's identity.
    #[must_use]
    pub fn id(&self) -> ManagerId {
        self.id
    }

    /// Resolves a first-level model.
    ///
    /// # Errors
    ///
    /// Any [`ResolveError`] raised while resolving.
    pub fn get(&self, name: &str) -> Result<Instance> {
        node::resolve(self, self, name)
    }

    /// Resolves `name` on `parent`, which must be attached to this manager.
    ///
    /// # Errors
    ///
    /// [`ResolveError::DetachedModel`] for a foreign or detached parent, and
    /// any error raised while resolving.
    pub fn get_from(&self, parent: &dyn Model, name: &str) -> Result<Instance> {
        node::resolve(self, parent, name)
    }

    /// Resolves a first-level model and downcasts it.
    ///
    /// # Errors
    ///
    /// [`ResolveError::TypeMismatch`] if the model is not a `T`, and any
    /// error raised while resolving.
    pub fn get_as<T: Any>(&self, name: &str) -> Result<Rc<T>> {
        self.get(name)?
            .downcast::<T>()
            .ok_or_else(|| ResolveError::TypeMismatch {
                name: name.to_owned(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Walks a dotted path such as `project.db.cluster`.
    ///
    /// # Errors
    ///
    /// [`ResolveError::UndeclaredAccess`] when a segment is empty or the path
    /// continues past a plain value, and any error raised while resolving.
    pub fn resolve_path(&self, path: &str) -> Result<Instance> {
        let mut walked = String::from(MANAGER_TYPE_NAME);
        let mut current: Option<Instance> = None;
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(ResolveError::UndeclaredAccess {
                    name: segment.to_owned(),
                    owner: walked,
                });
            }
            let next = match &current {
                None => self.get(segment)?,
                Some(Instance::Model(model)) => node::resolve(self, &**model, segment)?,
                Some(Instance::Value(_)) => {
                    return Err(ResolveError::UndeclaredAccess {
                        name: segment.to_owned(),
                        owner: walked,
                    })
                }
            };
            walked.push('.');
            walked.push_str(segment);
            current = Some(next);
        }
        current.ok_or_else(|| ResolveError::UndeclaredAccess {
            name: path.to_owned(),
            owner: walked,
        })
    }

    /// Maps an accessed name onto `(name, namespace hint)`.
    ///
    /// Accesses on the manager itself, and every access when no convention is
    /// configured, pass the name through unchanged.
    ///
    /// # Errors
    ///
    /// [`ResolveError::DetachedModel`] if a convention needs the caller's
    /// type name and `caller` does not belong to this manager.
    pub fn resolve_name_tuple(
        &self,
        name: &str,
        caller: &dyn Model,
    ) -> Result<(String, Option<String>)> {
        if std::ptr::eq(caller.node(), &self.root) {
            return Ok((name.to_owned(), None));
        }
        let Some(convention) = &self.convention else {
            return Ok((name.to_owned(), None));
        };
        let caller = Caller {
            type_name: caller.node().type_name_in(self)?,
            suffixes: caller.suffixes(),
        };
        Ok((
            convention.name(name, &caller),
            convention.namespace(name, &caller),
        ))
    }

    /// Candidate type names for `name`, most specific first.
    #[must_use]
    pub fn candidates(&self, name: &str, hint: Option<&str>, suffixes: &[&str]) -> Vec<String> {
        self.namespaces.candidates(name, hint, suffixes)
    }

    /// Constructs a registered type with injected arguments.
    ///
    /// The instance is neither attached nor cached.
    ///
    /// # Errors
    ///
    /// See [`Injector::instantiate`].
    pub fn instantiate(&self, type_name: &str) -> Result<Instance> {
        Injector::new(&self.registry, &self.defaults).instantiate(type_name)
    }

    /// Drops the manager's cached first-level models.
    pub fn clear(&self) {
        self.root.clear();
    }

    /// The namespace hierarchy.
    #[must_use]
    pub fn namespaces(&self) -> &NamespaceHierarchy {
        &self.namespaces
    }

    /// The injection defaults.
    #[must_use]
    pub fn defaults(&self) -> &BTreeMap<String, Value> {
        &self.defaults
    }

    /// The registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether a naming convention is configured.
    #[must_use]
    pub fn has_convention(&self) -> bool {
        self.convention.is_some()
    }
}

impl Model for Manager {
    fn node(&self) -> &Node {
        &self.root
    }

    fn suffixes(&self) -> &'static [&'static str] {
        self.suffixes
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("id", &self.id)
            .field("namespaces", &self.namespaces)
            .field("defaults", &self.defaults)
            .field("convention", &self.convention.is_some())
            .field("suffixes", &self.suffixes)
            .field("registry", &self.registry)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain(i64);

    #[test]
    fn root_access_skips_convention() {
        let manager = Manager::builder()
            .convention_kind(ConventionKind::Flattened)
            .build();
        assert_eq!(
            manager.resolve_name_tuple("project", &manager).unwrap(),
            ("project".to_owned(), None)
        );
    }

    #[test]
    fn merge_defaults_overrides_earlier_keys() {
        let manager = Manager::builder()
            .default_value("timeout", 30)
            .default_value("host", "db")
            .merge_defaults([("timeout", Value::Int(5))])
            .build();
        assert_eq!(manager.defaults().get("timeout"), Some(&Value::Int(5)));
        assert_eq!(manager.defaults().get("host"), Some(&Value::from("db")));
    }

    #[test]
    fn resolve_path_rejects_descending_into_values() {
        let manager = Manager::builder()
            .register("PortModel", Factory::value(|_| Ok(Plain(5432))))
            .build();
        assert_eq!(
            manager.get_as::<Plain>("port").map(|p| p.0).unwrap(),
            5432
        );
        let err = manager.resolve_path("port.number").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UndeclaredAccess { ref name, ref owner }
                if name == "number" && owner == "Manager.port"
        ));
        assert!(matches!(
            manager.resolve_path("port..x"),
            Err(ResolveError::UndeclaredAccess { .. })
        ));
    }

    #[test]
    fn get_as_reports_type_mismatch() {
        let manager = Manager::builder()
            .register("PortModel", Factory::value(|_| Ok(Plain(1))))
            .build();
        assert!(matches!(
            manager.get_as::<String>("port"),
            Err(ResolveError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn clear_forgets_first_level_models() {
        let manager = Manager::builder()
            .register("PortModel", Factory::value(|_| Ok(Plain(1))))
            .build();
        let first = manager.get("port").unwrap();
        manager.clear();
        assert!(manager.root.cached("port").is_none());
        assert!(!first.ptr_eq(&manager.get("port").unwrap()));
    }

    #[test]
    fn builder_configuration_is_frozen_into_manager() {
        let manager = Manager::builder()
            .prefix_namespace("App")
            .add_namespace("::Vendor")
            .add_namespace("Admin")
            .convention_kind(ConventionKind::Nested)
            .build();
        assert!(manager.has_convention());
        assert_eq!(manager.namespaces().prefix(), Some("App"));
        assert_eq!(manager.namespaces().added(), ["::Vendor", "Admin"]);
        assert!(!Manager::builder().build().has_convention());
    }

    #[test]
    fn managers_have_distinct_ids() {
        assert_ne!(Manager::builder().build().id(), Manager::builder().build().id());
    }
}
