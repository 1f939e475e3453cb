//! Type schemes and the typing context.
//!
//! The typing context maps names (natives and local bindings) to type schemes.
//! It is a chain of frames: the root frame holds the natives, and every node
//! that introduces a binding pushes a child frame for its body. A child never
//! mutates its parent, so leaving a scope is just dropping the child.
//!
//! # Example
//!
//! ```
//! use rill_typecheck::{Scheme, Ty, TypeEnv};
//!
//! let mut globals = TypeEnv::new();
//! globals.bind("zero", Scheme::mono(Ty::number()));
//!
//! {
//!     let mut local = globals.child();
//!     local.bind("label", Scheme::mono(Ty::text()));
//!     assert!(local.lookup("zero").is_some());
//!     assert!(local.lookup("label").is_some());
//! }
//!
//! assert!(globals.lookup("label").is_none());
//! ```

use crate::collections::{HashMap, HashSet};
use crate::context::subst::Subst;
use crate::types::display::{letter_names, DisplayTy};
use crate::types::{Ty, TypeVar, VarSupply};
use std::fmt;

/// Type scheme: a type with universally quantified variables.
///
/// - `forall a. a -> a` is the identity function's scheme
/// - `number -> text` is monomorphic (no quantified variables)
///
/// Variables that occur in `ty` but not in `vars` are free: they belong to
/// the surrounding context and are shared by every use of the scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    /// Universally quantified variables, sorted and without duplicates.
    pub vars: Vec<TypeVar>,

    /// The body.
    pub ty: Ty,
}

impl Scheme {
    /// A monomorphic scheme.
    pub fn mono(ty: Ty) -> Self {
        Self {
            vars: Vec::new(),
            ty,
        }
    }

    /// A scheme quantified over `vars`.
    pub fn poly(mut vars: Vec<TypeVar>, ty: Ty) -> Self {
        vars.sort_unstable();
        vars.dedup();
        Self { vars, ty }
    }

    /// Whether any variable is quantified.
    pub fn is_poly(&self) -> bool {
        !self.vars.is_empty()
    }

    /// Instantiate with a fresh variable for each quantified one.
    ///
    /// Every call yields independent variables, so two uses of the same
    /// polymorphic native can settle on different types.
    ///
    /// ```
    /// use rill_typecheck::{Scheme, Ty, VarSupply};
    ///
    /// let mut supply = VarSupply::new();
    /// let a = supply.fresh();
    /// let id = Scheme::poly(vec![a], Ty::function(Ty::Var(a), Ty::Var(a)));
    ///
    /// let first = id.instantiate(&mut supply);
    /// let second = id.instantiate(&mut supply);
    /// assert_ne!(first, second);
    /// ```
    pub fn instantiate(&self, supply: &mut VarSupply) -> Ty {
        if self.vars.is_empty() {
            return self.ty.clone();
        }

        let renaming = self
            .vars
            .iter()
            .fold(Subst::empty(), |acc, var| {
                Subst::singleton(*var, supply.fresh_ty()).compose(&acc)
            });
        renaming.apply(&self.ty)
    }

    /// Variables free in this scheme (in `ty` but not quantified).
    pub fn free_vars(&self) -> HashSet<TypeVar> {
        let mut vars = self.ty.free_vars();
        for bound in &self.vars {
            vars.remove(bound);
        }
        vars
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.vars.is_empty() {
            return write!(f, "{}", self.ty);
        }

        let ordered: Vec<TypeVar> = self
            .ty
            .vars_in_order()
            .into_iter()
            .filter(|var| self.vars.contains(var))
            .chain(
                self.vars
                    .iter()
                    .copied()
                    .filter(|var| !self.ty.occurs(*var)),
            )
            .collect();
        let names = letter_names(&ordered);

        write!(f, "forall")?;
        for var in &ordered {
            write!(f, " {}", names[var])?;
        }
        write!(f, ". {}", DisplayTy::with_names(&self.ty, names))
    }
}

/// Lexically scoped typing context.
#[derive(Debug, Clone, Default)]
pub struct TypeEnv<'p> {
    parent: Option<&'p TypeEnv<'p>>,
    bindings: HashMap<String, Scheme>,
}

impl TypeEnv<'static> {
    /// An empty root frame.
    pub fn new() -> Self {
        Self {
            parent: None,
            bindings: HashMap::new(),
        }
    }
}

impl<'p> TypeEnv<'p> {
    /// A new, empty frame on top of this one.
    pub fn child(&self) -> TypeEnv<'_> {
        TypeEnv {
            parent: Some(self),
            bindings: HashMap::new(),
        }
    }

    /// Number of frames from the root to this one (the root is depth 1).
    pub fn depth(&self) -> usize {
        1 + self.parent.map_or(0, TypeEnv::depth)
    }

    /// Number of bindings in this frame alone.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether this frame alone is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind `name` in this frame, returning any binding it replaces here.
    /// Bindings in outer frames are shadowed, not replaced.
    pub fn bind(&mut self, name: impl Into<String>, scheme: Scheme) -> Option<Scheme> {
        self.bindings.insert(name.into(), scheme)
    }

    /// Look a name up, innermost frame first.
    pub fn lookup(&self, name: &str) -> Option<&Scheme> {
        match self.bindings.get(name) {
            Some(scheme) => Some(scheme),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }

    /// Free variables of the whole context after applying `subst`.
    ///
    /// Only variables free in a scheme can be affected by a substitution, so
    /// closed schemes (every native) contribute nothing.
    pub fn free_vars(&self, subst: &Subst) -> HashSet<TypeVar> {
        let mut vars = HashSet::new();
        let mut frame = Some(self);
        while let Some(env) = frame {
            for scheme in env.bindings.values() {
                for var in scheme.free_vars() {
                    subst.apply(&Ty::Var(var)).collect_free_vars(&mut vars);
                }
            }
            frame = env.parent;
        }
        vars
    }

    /// Generalize `ty` over the variables the context does not constrain.
    ///
    /// Both the type and the context are taken under `subst`:
    ///
    /// ```text
    /// generalize(Γ, τ) = ∀ (ftv(Sτ) \ ftv(SΓ)). Sτ
    /// ```
    ///
    /// This is what makes a local `let` polymorphic.
    pub fn generalize(&self, ty: &Ty, subst: &Subst) -> Scheme {
        let ty = subst.apply(ty);
        if ty.is_ground() {
            return Scheme::mono(ty);
        }

        let in_env = self.free_vars(subst);
        let vars = ty
            .free_vars()
            .into_iter()
            .filter(|var| !in_env.contains(var))
            .collect();
        Scheme::poly(vars, ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_mono() {
        let scheme = Scheme::mono(Ty::number());
        assert!(!scheme.is_poly());
        assert_eq!(scheme.to_string(), "number");
    }

    #[test]
    fn test_scheme_poly_dedups() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        let scheme = Scheme::poly(vec![b, a, b], Ty::Var(a));
        assert_eq!(scheme.vars, vec![a, b]);
    }

    #[test]
    fn test_scheme_display() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        let scheme = Scheme::poly(
            vec![a, b],
            Ty::function(Ty::Var(b), Ty::function(Ty::Var(a), Ty::list(Ty::Var(b)))),
        );
        assert_eq!(scheme.to_string(), "forall a b. a -> b -> list(a)");
    }

    #[test]
    fn test_env_scopes() {
        let env = TypeEnv::new();
        assert_eq!(env.depth(), 1);

        let child = env.child();
        assert_eq!(child.depth(), 2);
        assert_eq!(child.child().depth(), 3);
    }

    #[test]
    fn test_env_shadowing() {
        let mut env = TypeEnv::new();
        env.bind("x", Scheme::mono(Ty::number()));

        {
            let mut inner = env.child();
            inner.bind("x", Scheme::mono(Ty::boolean()));
            assert_eq!(inner.lookup("x").unwrap().ty, Ty::boolean());
        }

        assert_eq!(env.lookup("x").unwrap().ty, Ty::number());
        assert!(env.lookup("y").is_none());
    }

    #[test]
    fn test_instantiate_is_fresh() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let scheme = Scheme::poly(vec![a], Ty::function(Ty::Var(a), Ty::Var(a)));

        let ty = scheme.instantiate(&mut supply);
        let (param, result) = ty.as_function().unwrap();
        assert_eq!(param, result);
        assert_ne!(param, &Ty::Var(a));
    }

    #[test]
    fn test_instantiate_keeps_free_vars() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let free = supply.fresh();
        let scheme = Scheme::poly(vec![a], Ty::function(Ty::Var(a), Ty::Var(free)));

        let ty = scheme.instantiate(&mut supply);
        let (_, result) = ty.as_function().unwrap();
        assert_eq!(result, &Ty::Var(free));
    }

    #[test]
    fn test_generalize_empty_env() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();

        let env = TypeEnv::new();
        let scheme = env.generalize(&Ty::function(Ty::Var(a), Ty::Var(a)), &Subst::empty());
        assert_eq!(scheme.vars, vec![a]);
    }

    #[test]
    fn test_generalize_respects_env() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        let mut env = TypeEnv::new();
        env.bind("x", Scheme::mono(Ty::Var(a)));

        let scheme = env.generalize(&Ty::function(Ty::Var(a), Ty::Var(b)), &Subst::empty());
        assert_eq!(scheme.vars, vec![b]);
    }

    #[test]
    fn test_generalize_ground_type() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();

        let mut env = TypeEnv::new();
        env.bind("x", Scheme::mono(Ty::Var(a)));

        let scheme = env.generalize(&Ty::step(Ty::Var(a)), &Subst::singleton(a, Ty::text()));
        assert_eq!(scheme, Scheme::mono(Ty::step(Ty::text())));
    }

    #[test]
    fn test_generalize_under_subst() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        // The context mentions `a`, but `a` has been resolved to `number`,
        // so `b` is no longer constrained by it.
        let mut env = TypeEnv::new();
        env.bind("x", Scheme::mono(Ty::Var(a)));
        let subst = Subst::singleton(a, Ty::number());

        let scheme = env.generalize(&Ty::list(Ty::Var(b)), &subst);
        assert_eq!(scheme.vars, vec![b]);

        // Conversely, a variable reached through the context's substitution
        // stays monomorphic.
        let subst = Subst::singleton(a, Ty::Var(b));
        let scheme = env.generalize(&Ty::list(Ty::Var(b)), &subst);
        assert!(scheme.vars.is_empty());
    }

    #[test]
    fn test_free_vars_ignores_closed_schemes() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();

        let mut env = TypeEnv::new();
        env.bind("id", Scheme::poly(vec![a], Ty::function(Ty::Var(a), Ty::Var(a))));
        assert!(env.free_vars(&Subst::empty()).is_empty());
    }
}
