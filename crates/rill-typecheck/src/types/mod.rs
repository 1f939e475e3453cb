//! Type representation and operations.
//!
//! - **Ty**: types as immutable trees of variables and constructor applications
//! - **VarSupply**: the fresh-variable counter owned by each inference call
//! - **Display**: pretty-printing for diagnostics and principal types

pub mod display;
pub mod ty;

pub use display::DisplayTy;
pub use ty::{Ty, TyApp, TypeVar, VarSupply};
