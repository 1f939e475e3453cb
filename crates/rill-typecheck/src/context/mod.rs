//! Typing context and the data it is built from.
//!
//! - **Registry**: the closed table of type constructors and their arities
//! - **Subst**: substitutions produced by unification
//! - **TypeEnv**: lexically scoped name to scheme bindings

pub mod env;
pub mod registry;
pub mod subst;

pub use env::{Scheme, TypeEnv};
pub use registry::{Registry, TypeCtorInfo};
pub use subst::Subst;
