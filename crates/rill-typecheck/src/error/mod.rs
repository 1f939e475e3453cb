//! Type checking errors.
//!
//! Two groups of errors exist:
//!
//! - **Internal**: `UnknownConstructor` and `ArityMismatch` mean a type or
//!   signature was built against constructors the registry does not define
//!   the way it was used. They point at the caller, not at the program.
//! - **Program**: `UnboundName`, `InfiniteType` and `TypeMismatch` are errors
//!   in the program being checked and are meant to be shown to its author.
//!
//! `MalformedSignature` sits in between: a native was declared with a bad
//! signature and the whole call is rejected before any node is visited.

use crate::tree::NodeId;
use crate::types::{Ty, TypeVar};
use std::fmt;

/// Type checking errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A constructor identifier is not in the registry.
    UnknownConstructor {
        /// The identifier that was looked up
        name: String,
    },

    /// A constructor was applied to the wrong number of arguments.
    ArityMismatch {
        /// Constructor identifier
        name: String,
        /// Arity declared in the registry
        expected: usize,
        /// Number of arguments supplied
        found: usize,
    },

    /// A node references a name absent from the typing context.
    UnboundName {
        /// The unresolved name
        name: String,
    },

    /// Occurs check failure: `var` would have to contain itself.
    InfiniteType {
        /// The variable being bound
        var: TypeVar,
        /// The type it occurs in
        ty: Ty,
    },

    /// Two types with different constructors.
    TypeMismatch {
        /// The type required by the context
        expected: Ty,
        /// The type actually found
        found: Ty,
    },

    /// A native's signature is not well-formed.
    MalformedSignature {
        /// Name of the offending native
        native: String,
        /// What is wrong with it
        cause: SignatureFault,
    },
}

/// Why a native signature was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureFault {
    /// The signature text does not parse.
    Syntax {
        /// Description of the problem
        message: String,
        /// Byte offset into the signature text
        offset: usize,
    },

    /// The signature parses but misuses a constructor.
    Kind(Box<TypeError>),
}

impl TypeError {
    /// Whether this error is an invariant violation on the caller's side
    /// rather than an error in the checked program.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TypeError::UnknownConstructor { .. } | TypeError::ArityMismatch { .. }
        )
    }

    /// Get a short description of this error.
    pub fn description(&self) -> &'static str {
        match self {
            TypeError::UnknownConstructor { .. } => "unknown type constructor",
            TypeError::ArityMismatch { .. } => "wrong number of type arguments",
            TypeError::UnboundName { .. } => "unbound name",
            TypeError::InfiniteType { .. } => "infinite type",
            TypeError::TypeMismatch { .. } => "type mismatch",
            TypeError::MalformedSignature { .. } => "malformed native signature",
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::UnknownConstructor { name } => {
                write!(f, "unknown type constructor: {}", name)
            }

            TypeError::ArityMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "wrong number of type arguments for {}: expected {}, found {}",
                name, expected, found
            ),

            TypeError::UnboundName { name } => write!(f, "unbound name: {}", name),

            TypeError::InfiniteType { var, ty } => {
                write!(f, "infinite type: {} occurs in {}", var, ty)
            }

            TypeError::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }

            TypeError::MalformedSignature { native, cause } => {
                write!(f, "malformed signature for native `{}`: {}", native, cause)
            }
        }
    }
}

impl fmt::Display for SignatureFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureFault::Syntax { message, offset } => {
                write!(f, "{} at offset {}", message, offset)
            }
            SignatureFault::Kind(inner) => write!(f, "{}", inner),
        }
    }
}

impl std::error::Error for TypeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TypeError::MalformedSignature {
                cause: SignatureFault::Kind(inner),
                ..
            } => Some(inner.as_ref()),
            _ => None,
        }
    }
}

/// A failed inference call: the error and the node it was detected at.
///
/// `node` is `None` only for failures found before the tree is visited
/// (malformed native signatures).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferError {
    /// The offending node, if any
    pub node: Option<NodeId>,
    /// What went wrong
    pub error: TypeError,
}

impl InferError {
    /// Tag `error` with the node it was detected at.
    pub fn at(node: NodeId, error: TypeError) -> Self {
        Self {
            node: Some(node),
            error,
        }
    }

    /// An error that belongs to no particular node.
    pub fn detached(error: TypeError) -> Self {
        Self { node: None, error }
    }
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "{} (at {})", self.error, node),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for InferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A result type for type checking operations.
pub type Result<T> = std::result::Result<T, TypeError>;
