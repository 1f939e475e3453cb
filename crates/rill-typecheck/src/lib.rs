//! Rill type checker: Hindley-Milner inference over dataflow trees.
//!
//! A Rill program is a tree of nodes invoking externally supplied natives.
//! This crate assigns every node of such a tree its principal type, or reports
//! why no consistent typing exists:
//!
//! - **Constructor registry**: the closed universe of type constructors and their arities
//! - **Types and substitutions**: `Ty`, `Subst`, `Scheme`
//! - **Unification**: Robinson unification with occurs and kind checks
//! - **Natives**: the signature notation natives are declared in
//! - **Inference**: the tree walk that ties it all together
//!
//! # Example
//!
//! ```
//! use rill_typecheck::{infer, LiteralKind, Natives, Tree};
//!
//! let mut natives = Natives::new();
//! natives.declare("list_of", "a -> a -> list(a)").unwrap();
//!
//! let mut tree = Tree::new();
//! let one = tree.literal(LiteralKind::Number);
//! let two = tree.literal(LiteralKind::Number);
//! let root = tree.apply("list_of", vec![one, two]);
//!
//! let typing = infer(&natives, &tree, root).unwrap();
//! assert_eq!(typing.root_type().to_string(), "list(number)");
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod infer;
pub mod natives;
pub mod tree;
pub mod types;

pub use context::{Registry, Scheme, Subst, TypeCtorInfo, TypeEnv};
pub use error::{InferError, Result, TypeError};
pub use infer::{infer, unify, Typing};
pub use natives::{Natives, Signature};
pub use tree::{LiteralKind, Node, NodeId, NodeKind, Tree};
pub use types::{Ty, TyApp, TypeVar, VarSupply};

/// Hash collections used throughout the crate.
///
/// `hashbrown` when the `fast-hash` feature is on, `std::collections` otherwise.
pub(crate) mod collections {
    #[cfg(feature = "fast-hash")]
    pub use hashbrown::{HashMap, HashSet};

    #[cfg(not(feature = "fast-hash"))]
    pub use std::collections::{HashMap, HashSet};
}
