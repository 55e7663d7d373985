//! Named constructor injection.
//!
//! For every declared parameter, in order, the argument is taken from the
//! manager defaults when a default of that name exists, otherwise from the
//! parameter's own default. A parameter with neither is a
//! [`ResolveError::MissingDependency`].

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ResolveError, Result};
use crate::model::Instance;
use crate::registry::{Factory, Registry};
use crate::value::Value;

/// Positional constructor arguments handed to a factory.
#[derive(Debug, Clone)]
pub struct Args {
    type_name: String,
    names: Vec<String>,
    values: Vec<Value>,
}

impl Args {
    /// Arguments for `type_name`, given as `(parameter, value)` pairs.
    pub fn new<I, S>(type_name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let (names, values) = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();
        Args {
            type_name: type_name.into(),
            names,
            values,
        }
    }

    /// The type being constructed.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Argument at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Argument passed for the parameter called `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i))
    }

    /// `(parameter, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    fn invalid(&self, index: usize, expected: &'static str) -> ResolveError {
        ResolveError::InvalidArgument {
            type_name: self.type_name.clone(),
            parameter: self
                .names
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("#{index}")),
            expected,
            found: self.values.get(index).map_or("nothing", Value::kind),
        }
    }

    fn typed<'a, T>(
        &'a self,
        index: usize,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T> {
        self.values
            .get(index)
            .and_then(extract)
            .ok_or_else(|| self.invalid(index, expected))
    }

    /// Integer argument.
    ///
    /// # Errors
    ///
    /// [`ResolveError::InvalidArgument`] if absent or not an integer.
    pub fn int(&self, index: usize) -> Result<i64> {
        self.typed(index, "an integer", Value::as_int)
    }

    /// Numeric argument.
    ///
    /// # Errors
    ///
    /// [`ResolveError::InvalidArgument`] if absent or not a number.
    pub fn float(&self, index: usize) -> Result<f64> {
        self.typed(index, "a number", Value::as_float)
    }

    /// Boolean argument.
    ///
    /// # Errors
    ///
    /// [`ResolveError::InvalidArgument`] if absent or not a boolean.
    pub fn bool(&self, index: usize) -> Result<bool> {
        self.typed(index, "a boolean", Value::as_bool)
    }

    /// String argument.
    ///
    /// # Errors
    ///
    /// [`ResolveError::InvalidArgument`] if absent or not a string.
    pub fn str(&self, index: usize) -> Result<&str> {
        self.typed(index, "a string", Value::as_str)
    }

    /// Shared host object argument.
    ///
    /// # Errors
    ///
    /// [`ResolveError::InvalidArgument`] if absent or of another type.
    pub fn shared<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        self.typed(index, "the expected shared object", Value::as_shared::<T>)
    }
}

/// Builds registered types, supplying constructor arguments by name.
#[derive(Debug, Clone, Copy)]
pub struct Injector<'a> {
    registry: &'a Registry,
    defaults: &'a BTreeMap<String, Value>,
}

impl<'a> Injector<'a> {
    /// Injector over `registry` using `defaults`.
    #[must_use]
    pub fn new(registry: &'a Registry, defaults: &'a BTreeMap<String, Value>) -> Self {
        Injector { registry, defaults }
    }

    /// Resolves the constructor arguments of `type_name`.
    ///
    /// Abstract types are rejected before any parameter is looked at.
    ///
    /// # Errors
    ///
    /// [`ResolveError::AbstractInstantiation`] or
    /// [`ResolveError::MissingDependency`].
    pub fn arguments(&self, type_name: &str, factory: &Factory) -> Result<Args> {
        if factory.is_abstract() {
            return Err(ResolveError::AbstractInstantiation {
                type_name: type_name.to_owned(),
            });
        }

        let mut pairs = Vec::with_capacity(factory.params().len());
        for param in factory.params() {
            let value = match (self.defaults.get(&param.name), &param.default) {
                (Some(injected), _) => injected.clone(),
                (None, Some(own)) => own.clone(),
                (None, None) => {
                    return Err(ResolveError::MissingDependency {
                        type_name: type_name.to_owned(),
                        parameter: param.name.clone(),
                    })
                }
            };
            pairs.push((param.name.clone(), value));
        }

        Ok(Args::new(type_name, pairs))
    }

    /// Constructs `type_name`.
    ///
    /// # Errors
    ///
    /// [`ResolveError::ModelNotFound`] if nothing is registered under the
    /// name, the errors of [`Injector::arguments`], and whatever the factory
    /// itself reports.
    pub fn instantiate(&self, type_name: &str) -> Result<Instance> {
        let factory = self
            .registry
            .get(type_name)
            .ok_or_else(|| ResolveError::ModelNotFound {
                name: type_name.to_owned(),
                tried: vec![type_name.to_owned()],
            })?;
        let args = self.arguments(type_name, factory)?;
        debug!(type_name, args = args.len(), "instantiating");
        factory.construct(&args)
    }
}
