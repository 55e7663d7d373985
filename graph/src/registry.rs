//! Factory registry.
//!
//! The registry replaces runtime type lookup and constructor reflection: each
//! fully-qualified type name maps to a [`Factory`] that declares its
//! constructor parameters in order and knows how to build the object from
//! the resolved [`Args`].

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::candidates::canonical;
use crate::error::{ResolveError, Result};
use crate::inject::Args;
use crate::model::{Instance, Model};
use crate::value::Value;

type ConstructFn = Box<dyn Fn(&Args) -> Result<Instance>>;

/// A declared constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name, matched against manager defaults.
    pub name: String,
    /// The parameter's own default, used when the manager has none.
    pub default: Option<Value>,
}

/// How to build one registered type.
pub struct Factory {
    params: Vec<Param>,
    construct: Option<ConstructFn>,
}

impl Factory {
    /// A factory producing an arbitrary [`Instance`].
    pub fn new<F>(construct: F) -> Self
    where
        F: Fn(&Args) -> Result<Instance> + 'static,
    {
        Factory {
            params: Vec::new(),
            construct: Some(Box::new(construct)),
        }
    }

    /// A factory producing a plain object.
    pub fn value<T, F>(construct: F) -> Self
    where
        T: Any,
        F: Fn(&Args) -> Result<T> + 'static,
    {
        Factory::new(move |args| construct(args).map(Instance::value))
    }

    /// A factory producing a model.
    pub fn model<T, F>(construct: F) -> Self
    where
        T: Model,
        F: Fn(&Args) -> Result<T> + 'static,
    {
        Factory::new(move |args| construct(args).map(Instance::model))
    }

    /// A registered but non-constructible type.
    #[must_use]
    pub fn abstract_model() -> Self {
        Factory {
            params: Vec::new(),
            construct: None,
        }
    }

    /// Declares the next parameter as required.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// Declares the next parameter with its own default value.
    #[must_use]
    pub fn param_with_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    /// Declared parameters in order.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Whether the type cannot be constructed.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.construct.is_none()
    }

    pub(crate) fn construct(&self, args: &Args) -> Result<Instance> {
        match &self.construct {
            Some(construct) => construct(args),
            None => Err(ResolveError::AbstractInstantiation {
                type_name: args.type_name().to_owned(),
            }),
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("params", &self.params)
            .field("abstract", &self.is_abstract())
            .finish()
    }
}

/// Fully-qualified type name to factory.
#[derive(Debug, Default)]
pub struct Registry {
    factories: BTreeMap<String, Factory>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Registry::default()
    }

    /// Registers `factory` under `type_name`, replacing any earlier entry.
    /// Leading separators in the name are ignored.
    pub fn register(&mut self, type_name: impl AsRef<str>, factory: Factory) -> &mut Self {
        let key = canonical(type_name.as_ref()).to_owned();
        if self.factories.insert(key.clone(), factory).is_some() {
            warn!(type_name = %key, "replaced registered factory");
        }
        self
    }

    /// Builder-style [`Registry::register`].
    #[must_use]
    pub fn with(mut self, type_name: impl AsRef<str>, factory: Factory) -> Self {
        self.register(type_name, factory);
        self
    }

    /// Whether a type is registered under `type_name`.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(canonical(type_name))
    }

    /// The factory registered under `type_name`.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&Factory> {
        self.factories.get(canonical(type_name))
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
