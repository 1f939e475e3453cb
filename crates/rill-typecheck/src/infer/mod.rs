//! Type inference.
//!
//! - **unify**: most general unifiers
//! - **engine**: the tree walk assigning every node its type

pub mod engine;
pub mod unify;

pub use engine::{infer, Typing};
pub use unify::unify;
