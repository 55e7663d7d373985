//! Lazy, convention-driven object-graph resolution.
//!
//! A [`Manager`] is the root of a tree of named models. Accessing a name on
//! the manager, or on any model it produced, resolves that name exactly once:
//!
//! 1. the [naming convention](convention) maps the accessed name and the
//!    caller's type onto a name and an optional namespace hint;
//! 2. the [namespace hierarchy](NamespaceHierarchy) expands that pair into
//!    candidate type names, most specific first;
//! 3. the first candidate present in the [`Registry`] is built, with
//!    constructor arguments [injected](inject) by parameter name;
//! 4. models are attached to the manager and started;
//! 5. the result is cached on the caller under the accessed name.
//!
//! # Entry Point
//!
//! ```
//! use modelgraph::{ConventionKind, Factory, Manager, Model, Node};
//!
//! #[derive(Default)]
//! struct ProjectModel {
//!     node: Node,
//! }
//!
//! impl Model for ProjectModel {
//!     fn node(&self) -> &Node {
//!         &self.node
//!     }
//! }
//!
//! struct Db {
//!     timeout: i64,
//! }
//!
//! let manager = Manager::builder()
//!     .prefix_namespace("App")
//!     .convention_kind(ConventionKind::Nested)
//!     .default_value("timeout", 5)
//!     .register("App::ProjectModel", Factory::model(|_| Ok(ProjectModel::default())))
//!     .register(
//!         "App::Project::DbModel",
//!         Factory::value(|args| Ok(Db { timeout: args.int(0)? })).param_with_default("timeout", 30),
//!     )
//!     .build();
//!
//! let db = manager.resolve_path("project.db").unwrap();
//! assert_eq!(db.downcast_ref::<Db>().map(|db| db.timeout), Some(5));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod candidates;
#[cfg(feature = "serde")]
pub mod config;
pub mod convention;
pub mod error;
pub mod inject;
pub mod manager;
pub mod model;
pub mod node;
pub mod registry;
pub mod serializer;
pub mod value;

pub use candidates::{NamespaceHierarchy, SEPARATOR};
#[cfg(feature = "serde")]
pub use config::GraphConfig;
pub use convention::{Caller, ConventionKind, Flattened, NamingConvention, Nested};
pub use error::{ResolveError, Result};
pub use inject::{Args, Injector};
pub use manager::{Manager, ManagerBuilder, ManagerId};
pub use model::{Instance, Model, DEFAULT_SUFFIXES};
pub use node::Node;
pub use registry::{Factory, Param, Registry};
pub use value::Value;
