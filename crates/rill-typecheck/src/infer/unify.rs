//! Unification algorithm with occurs check.
//!
//! Robinson unification specialized to the closed constructor universe of the
//! registry:
//!
//! ```text
//! unify(?a, ?a)           = ∅
//! unify(?a, τ)            = [?a ↦ τ]        if ?a ∉ ftv(τ), else InfiniteType
//! unify(τ, ?a)            = unify(?a, τ)
//! unify(c(σ..), c(τ..))   = pairwise, left to right, each pair under the
//!                           substitution decided so far
//! unify(c(..), d(..))     = TypeMismatch    (c ≠ d)
//! ```
//!
//! Arities never need comparing: two applications of the same constructor
//! always have the same number of arguments. `step` and `event` only unify with
//! themselves, which is what keeps continuous and discrete values apart.

use crate::context::Subst;
use crate::error::{Result, TypeError};
use crate::types::{Ty, TypeVar};
use rill_log::trace;

/// Compute the most general substitution making `expected` and `found` equal.
///
/// The argument order only matters for error messages: a mismatch reports
/// `expected` and `found` in the order given.
///
/// # Errors
///
/// - `InfiniteType` if a variable would have to contain itself
/// - `TypeMismatch` if two different constructors meet
///
/// ```
/// use rill_typecheck::{unify, Ty, VarSupply};
///
/// let mut supply = VarSupply::new();
/// let a = supply.fresh();
///
/// let subst = unify(&Ty::list(Ty::Var(a)), &Ty::list(Ty::number())).unwrap();
/// assert_eq!(subst.apply(&Ty::Var(a)), Ty::number());
///
/// assert!(unify(&Ty::step(Ty::number()), &Ty::event(Ty::number())).is_err());
/// ```
pub fn unify(expected: &Ty, found: &Ty) -> Result<Subst> {
    trace!("unify {} ~ {}", expected, found);

    match (expected, found) {
        (Ty::Var(a), Ty::Var(b)) if a == b => Ok(Subst::empty()),

        (Ty::Var(var), ty) | (ty, Ty::Var(var)) => bind(*var, ty),

        (Ty::Ctor(left), Ty::Ctor(right)) => {
            if left.con() != right.con() {
                return Err(TypeError::TypeMismatch {
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }

            left.args()
                .iter()
                .zip(right.args())
                .try_fold(Subst::empty(), |mut subst, (a, b)| {
                    subst.extend(unify(&subst.apply(a), &subst.apply(b))?);
                    Ok(subst)
                })
        }
    }
}

/// Bind a variable to a type after the occurs check.
fn bind(var: TypeVar, ty: &Ty) -> Result<Subst> {
    if ty.occurs(var) {
        return Err(TypeError::InfiniteType {
            var,
            ty: ty.clone(),
        });
    }
    Ok(Subst::singleton(var, ty.clone()))
}
