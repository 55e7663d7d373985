//! Per-model attachment and child cache, and the lazy resolution algorithm.

use std::cell::{OnceCell, RefCell};
use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{ResolveError, Result};
use crate::manager::{Manager, ManagerId};
use crate::model::{Instance, Model};

#[derive(Debug)]
struct Attachment {
    manager: ManagerId,
    type_name: String,
}

struct Child {
    type_name: String,
    instance: Instance,
}

/// State every model embeds: the write-once manager attachment and the
/// memoized children, keyed by the name they were accessed under.
///
/// A node never caches two instances under one name; the first resolution
/// is authoritative for the node's lifetime (or until [`Manager::clear`] on
/// the root).
#[derive(Default)]
pub struct Node {
    attachment: OnceCell<Attachment>,
    children: RefCell<BTreeMap<String, Child>>,
}

impl Node {
    /// Creates a detached node.
    #[must_use]
    pub fn new() -> Self {
        Node::default()
    }

    pub(crate) fn attached(manager: ManagerId, type_name: &str) -> Self {
        Node {
            attachment: OnceCell::from(Attachment {
                manager,
                type_name: type_name.to_owned(),
            }),
            children: RefCell::default(),
        }
    }

    /// Attaches the node to `manager` under the type name it was resolved as.
    ///
    /// # Errors
    ///
    /// [`ResolveError::ManagerAlreadySet`] if the node is already attached.
    pub fn attach(&self, manager: &Manager, type_name: &str) -> Result<()> {
        if let Some(existing) = self.attachment.get() {
            return Err(ResolveError::ManagerAlreadySet {
                type_name: existing.type_name.clone(),
            });
        }
        self.attachment
            .set(Attachment {
                manager: manager.id(),
                type_name: type_name.to_owned(),
            })
            .map_err(|rejected| ResolveError::ManagerAlreadySet {
                type_name: rejected.type_name,
            })
    }

    /// Whether a manager has been attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attachment.get().is_some()
    }

    /// Fully-qualified type name the node was resolved under.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.attachment.get().map(|a| a.type_name.as_str())
    }

    /// Type name, provided the node belongs to `manager`.
    pub(crate) fn type_name_in(&self, manager: &Manager) -> Result<&str> {
        match self.attachment.get() {
            Some(a) if a.manager == manager.id() => Ok(&a.type_name),
            _ => Err(ResolveError::DetachedModel),
        }
    }

    /// The cached child under `name`, if any.
    #[must_use]
    pub fn cached(&self, name: &str) -> Option<Instance> {
        self.children
            .borrow()
            .get(name)
            .map(|child| child.instance.clone())
    }

    /// Type name the child cached under `name` was built as.
    #[must_use]
    pub fn cached_type_name(&self, name: &str) -> Option<String> {
        self.children
            .borrow()
            .get(name)
            .map(|child| child.type_name.clone())
    }

    /// Names of the cached children, sorted.
    #[must_use]
    pub fn cached_names(&self) -> Vec<String> {
        self.children.borrow().keys().cloned().collect()
    }

    /// `(access name, type name, instance)` for every cached child, sorted.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String, Instance)> {
        self.children
            .borrow()
            .iter()
            .map(|(name, child)| (name.clone(), child.type_name.clone(), child.instance.clone()))
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.children.borrow_mut().clear();
    }

    /// Caches `instance` unless a reentrant resolution got there first, and
    /// returns whichever instance is now cached.
    fn insert_first(&self, name: &str, type_name: &str, instance: Instance) -> Instance {
        self.children
            .borrow_mut()
            .entry(name.to_owned())
            .or_insert(Child {
                type_name: type_name.to_owned(),
                instance,
            })
            .instance
            .clone()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("type_name", &self.type_name())
            .field("children", &self.cached_names())
            .finish()
    }
}

/// Resolves `name` on `parent`: naming convention, cache, candidates,
/// injection, attachment and startup, in that order.
///
/// The cache is keyed by the name as accessed, not by the name the
/// convention produced. No borrow of the cache is held while the child is
/// being built, so startup hooks may resolve further names freely.
pub(crate) fn resolve(manager: &Manager, parent: &dyn Model, name: &str) -> Result<Instance> {
    let node = parent.node();
    node.type_name_in(manager)?;

    let (resolved, hint) = manager.resolve_name_tuple(name, parent)?;

    if let Some(hit) = node.cached(name) {
        trace!(name, "cache hit");
        return Ok(hit);
    }

    let candidates = manager.candidates(&resolved, hint.as_deref(), parent.suffixes());
    debug!(name, resolved = %resolved, ?candidates, "resolving model");

    let winner = candidates
        .iter()
        .find(|candidate| manager.registry().contains(candidate))
        .cloned();
    let Some(winner) = winner else {
        return Err(ResolveError::ModelNotFound {
            name: name.to_owned(),
            tried: candidates,
        });
    };

    let instance = manager.instantiate(&winner)?;

    if let Instance::Model(model) = &instance {
        model.node().attach(manager, &winner)?;
        debug!(type_name = %winner, "starting model");
        model.startup(manager)?;
    }

    Ok(node.insert_first(name, &winner, instance))
}
