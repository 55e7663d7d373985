//! The model capability and resolved instances.
//!
//! Anything a factory builds is an [`Instance`]. Instances that implement
//! [`Model`] own a [`Node`] and can resolve further names themselves; the
//! manager attaches them and runs their [`Model::startup`] hook before they
//! are cached. Plain values are cached as they come.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::{ResolveError, Result};
use crate::manager::Manager;
use crate::node::{self, Node};

/// Type-name suffixes declared by a model unless it overrides them.
pub const DEFAULT_SUFFIXES: &[&str] = &["Model"];

/// Upcasting helpers, implemented for every `'static` type.
pub trait AsAny: Any {
    /// Borrows `self` as [`Any`].
    fn as_any(&self) -> &dyn Any;

    /// Converts a shared pointer into an [`Any`] pointer.
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// A node in the object graph: something that resolves named children.
///
/// ```
/// use modelgraph::{Model, Node};
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
/// ```
pub trait Model: AsAny {
    /// The embedded node holding this model's attachment and child cache.
    fn node(&self) -> &Node;

    /// Suffixes appended to candidate type names for this model's children,
    /// and stripped from this model's own type name by naming conventions.
    fn suffixes(&self) -> &'static [&'static str] {
        DEFAULT_SUFFIXES
    }

    /// Called once, right after the manager has been attached.
    ///
    /// # Errors
    ///
    /// Any error returned here aborts the resolution that built the model.
    fn startup(&self, _manager: &Manager) -> Result<()> {
        Ok(())
    }
}

/// A resolved, cached object.
#[derive(Clone)]
pub enum Instance {
    /// An object without the model capability.
    Value(Rc<dyn Any>),
    /// A model.
    Model(Rc<dyn Model>),
}

impl Instance {
    /// Wraps a plain object.
    pub fn value<T: Any>(value: T) -> Self {
        Instance::Value(Rc::new(value))
    }

    /// Wraps a model.
    pub fn model<T: Model>(model: T) -> Self {
        Instance::Model(Rc::new(model))
    }

    /// Whether the instance carries the model capability.
    #[must_use]
    pub fn is_model(&self) -> bool {
        matches!(self, Instance::Model(_))
    }

    /// The model, if this is one.
    #[must_use]
    pub fn as_model(&self) -> Option<&Rc<dyn Model>> {
        match self {
            Instance::Model(m) => Some(m),
            Instance::Value(_) => None,
        }
    }

    /// Borrows the concrete object.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Instance::Value(v) => v.downcast_ref::<T>(),
            Instance::Model(m) => AsAny::as_any(&**m).downcast_ref::<T>(),
        }
    }

    /// Shares the concrete object.
    #[must_use]
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        match self {
            Instance::Value(v) => Rc::clone(v).downcast::<T>().ok(),
            Instance::Model(m) => AsAny::into_any_rc(Rc::clone(m)).downcast::<T>().ok(),
        }
    }

    /// Reference identity.
    #[must_use]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        match self {
            Instance::Value(v) => Rc::as_ptr(v).cast::<()>(),
            Instance::Model(m) => Rc::as_ptr(m).cast::<()>(),
        }
    }

    /// Resolves `name` on this instance.
    ///
    /// # Errors
    ///
    /// [`ResolveError::UndeclaredAccess`] if this is not a model, otherwise
    /// whatever resolution on the model reports.
    pub fn get(&self, manager: &Manager, name: &str) -> Result<Instance> {
        match self {
            Instance::Model(m) => node::resolve(manager, &**m, name),
            Instance::Value(_) => Err(ResolveError::UndeclaredAccess {
                name: name.to_owned(),
                owner: "a plain value".to_owned(),
            }),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instance::Value(_) => f.write_str("Instance::Value(..)"),
            Instance::Model(m) => f
                .debug_tuple("Instance::Model")
                .field(&m.node().type_name())
                .finish(),
        }
    }
}
