//! Resolution errors.
//!
//! Every variant aborts the resolution in progress and surfaces to the caller
//! unchanged. Candidate selection is gated only by registry membership: a
//! construction failure never falls through to the next candidate.

use thiserror::Error;

/// Resolution result type.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors raised while resolving, constructing or wiring a model.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A model's manager attachment was set a second time.
    #[error("manager is already set on model '{type_name}'")]
    ManagerAlreadySet {
        /// Type name the model was attached under the first time.
        type_name: String,
    },

    /// None of the generated candidate type names is registered.
    #[error("cannot get model '{name}'. Tried: {}", .tried.join(", "))]
    ModelNotFound {
        /// Access name that was requested.
        name: String,
        /// Every candidate, in the order it was tried.
        tried: Vec<String>,
    },

    /// The winning candidate is registered as abstract.
    #[error("cannot instantiate abstract type '{type_name}'")]
    AbstractInstantiation {
        /// Fully-qualified type name.
        type_name: String,
    },

    /// A required constructor parameter has no default from either source.
    #[error("cannot instantiate '{type_name}': constructor dependency '{parameter}' is missing")]
    MissingDependency {
        /// Fully-qualified type name.
        type_name: String,
        /// Parameter without a value.
        parameter: String,
    },

    /// A name was accessed on something that cannot resolve children.
    #[error("cannot read undeclared property '{name}' on '{owner}'")]
    UndeclaredAccess {
        /// Access name.
        name: String,
        /// Description of the instance the access was made on.
        owner: String,
    },

    /// A model was used with a manager it is not attached to.
    #[error("model is not attached to this manager")]
    DetachedModel,

    /// A factory argument did not have the kind the factory asked for.
    #[error("argument '{parameter}' of '{type_name}' is not {expected} (found {found})")]
    InvalidArgument {
        /// Fully-qualified type name.
        type_name: String,
        /// Parameter name, or its position when out of range.
        parameter: String,
        /// Expected kind, e.g. `"an integer"`.
        expected: &'static str,
        /// Kind of the value actually passed, or `"nothing"`.
        found: &'static str,
    },

    /// A resolved instance is not of the requested Rust type.
    #[error("model '{name}' is not a {expected}")]
    TypeMismatch {
        /// Access name.
        name: String,
        /// Requested Rust type.
        expected: &'static str,
    },

    /// A factory reported a failure of its own.
    #[error("failed to construct '{type_name}': {message}")]
    Construction {
        /// Fully-qualified type name.
        type_name: String,
        /// Factory-provided reason.
        message: String,
    },
}

impl ResolveError {
    /// Convenience constructor for factory-reported failures.
    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_found_lists_candidates_in_order() {
        let err = ResolveError::ModelNotFound {
            name: "db".to_owned(),
            tried: vec!["App::Project::DbModel".to_owned(), "App::DbModel".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "cannot get model 'db'. Tried: App::Project::DbModel, App::DbModel"
        );
    }

    #[test]
    fn missing_dependency_names_parameter() {
        let err = ResolveError::MissingDependency {
            type_name: "App::DbModel".to_owned(),
            parameter: "conn".to_owned(),
        };
        assert!(err.to_string().contains("'conn'"));
    }
}
