//! Declarative graphs for the `modelgraph` command line.
//!
//! A graph file is a TOML document holding a [`GraphConfig`] plus a table of
//! declared types. Every declared type is backed by a record: models become
//! [`RecordModel`]s, values become a [`Value::Map`] of their arguments.
//!
//! ```toml
//! prefix_namespace = "App"
//! convention = "nested"
//!
//! [defaults]
//! dsn = "postgres://localhost/app"
//!
//! [types."App::ProjectModel"]
//!
//! [types."App::Project::DbModel"]
//! kind = "value"
//! params = [{ name = "dsn" }, { name = "timeout", default = 30 }]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use modelgraph::{Args, Factory, GraphConfig, Manager, Model, Node, Registry, Value};
use serde::Deserialize;

/// What a declared type builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// A [`RecordModel`], able to resolve children.
    #[default]
    Model,
    /// A [`Value::Map`] of the injected arguments.
    Value,
    /// Registered but not constructible.
    Abstract,
}

/// A declared constructor parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDecl {
    /// Parameter name.
    pub name: String,
    /// The parameter's own default.
    #[serde(default)]
    pub default: Option<Value>,
}

/// A declared type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeDecl {
    /// What the type builds.
    pub kind: TypeKind,
    /// Constructor parameters in order.
    pub params: Vec<ParamDecl>,
}

/// A parsed graph file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphFile {
    /// Manager configuration.
    #[serde(flatten)]
    pub graph: GraphConfig,
    /// Declared types by fully-qualified name.
    #[serde(default)]
    pub types: BTreeMap<String, TypeDecl>,
    /// Top-level keys neither the configuration nor `types` claimed.
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

/// A declared model: keeps its injected arguments by parameter name.
#[derive(Debug, Default)]
pub struct RecordModel {
    node: Node,
    fields: BTreeMap<String, Value>,
}

impl RecordModel {
    fn from_args(args: &Args) -> Self {
        RecordModel {
            node: Node::new(),
            fields: fields(args),
        }
    }

    /// Injected arguments.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

impl Model for RecordModel {
    fn node(&self) -> &Node {
        &self.node
    }
}

fn fields(args: &Args) -> BTreeMap<String, Value> {
    args.iter()
        .map(|(name, value)| (name.to_owned(), value.clone()))
        .collect()
}

impl TypeDecl {
    /// The factory backing this declaration.
    #[must_use]
    pub fn factory(&self) -> Factory {
        let factory = match self.kind {
            TypeKind::Model => Factory::model(|args| Ok(RecordModel::from_args(args))),
            TypeKind::Value => Factory::value(|args| Ok(Value::Map(fields(args)))),
            TypeKind::Abstract => Factory::abstract_model(),
        };
        self.params
            .iter()
            .fold(factory, |factory, param| match &param.default {
                Some(default) => factory.param_with_default(param.name.clone(), default.clone()),
                None => factory.param(param.name.clone()),
            })
    }
}

impl GraphFile {
    /// Parses a graph file from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid graph file or carries
    /// unknown top-level keys.
    pub fn parse(text: &str) -> Result<Self> {
        let file: GraphFile = toml::from_str(text).context("Failed to parse graph file")?;
        if !file.unknown.is_empty() {
            let keys: Vec<&str> = file.unknown.keys().map(String::as_str).collect();
            bail!("Unknown graph file keys: {}", keys.join(", "));
        }
        Ok(file)
    }

    /// Reads and parses a graph file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid graph file {}", path.display()))
    }

    /// A registry holding every declared type.
    #[must_use]
    pub fn registry(&self) -> Registry {
        self.types
            .iter()
            .fold(Registry::new(), |registry, (name, decl)| {
                registry.with(name, decl.factory())
            })
    }

    /// A manager configured from this file.
    #[must_use]
    pub fn manager(&self) -> Manager {
        Manager::builder()
            .from_config(&self.graph)
            .registry(self.registry())
            .build()
    }
}
