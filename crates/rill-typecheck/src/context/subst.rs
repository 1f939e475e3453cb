//! Substitutions for type unification.
//!
//! A substitution is a finite map from type variables to types: the decisions
//! unification has made so far.
//!
//! # Composition
//!
//! `later.compose(&earlier)` behaves like applying `earlier` and then `later`:
//!
//! ```text
//! later ∘ earlier = { v ↦ later(t) | (v ↦ t) ∈ earlier } ∪ later
//! ```
//!
//! Entries only present in `later` pass through unchanged. The inference
//! engine accumulates with [`Subst::extend`] instead, which gives the same
//! result under [`Subst::apply`] without rewriting every earlier entry on
//! each step. `apply` follows chains, so it is idempotent either way.
//!
//! The map itself does not detect cycles; the unifier's occurs check is what
//! keeps them from being produced.

use crate::collections::HashMap;
use crate::context::env::Scheme;
use crate::types::{Ty, TypeVar};

/// Substitution from type variables to types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subst {
    map: HashMap<TypeVar, Ty>,
}

impl Subst {
    /// The identity substitution.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind a single variable.
    ///
    /// The caller guarantees `var` does not occur in `ty`.
    pub fn singleton(var: TypeVar, ty: Ty) -> Self {
        let mut map = HashMap::new();
        map.insert(var, ty);
        Self { map }
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether this is the identity substitution.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The binding of `var`, if any.
    pub fn get(&self, var: TypeVar) -> Option<&Ty> {
        self.map.get(&var)
    }

    /// Iterate over the bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeVar, &Ty)> + '_ {
        self.map.iter().map(|(var, ty)| (*var, ty))
    }

    /// Apply this substitution to a type.
    ///
    /// A bound variable is replaced by its binding, and the binding is
    /// rewritten in turn, so chains such as `?0 ↦ ?1, ?1 ↦ number` resolve
    /// fully even if the map was not composed.
    ///
    /// ```
    /// use rill_typecheck::{Subst, Ty, VarSupply};
    ///
    /// let mut supply = VarSupply::new();
    /// let var = supply.fresh();
    /// let subst = Subst::singleton(var, Ty::number());
    ///
    /// assert_eq!(subst.apply(&Ty::list(Ty::Var(var))), Ty::list(Ty::number()));
    /// ```
    pub fn apply(&self, ty: &Ty) -> Ty {
        if self.map.is_empty() {
            return ty.clone();
        }

        match ty {
            Ty::Var(var) => match self.map.get(var) {
                Some(bound) => self.apply(bound),
                None => ty.clone(),
            },
            Ty::Ctor(app) => {
                if app.args().is_empty() {
                    return ty.clone();
                }
                let args = app.args().iter().map(|arg| self.apply(arg)).collect();
                Ty::with_args(app, args)
            }
        }
    }

    /// Apply this substitution to a scheme's body.
    ///
    /// Quantified variables are bound by the scheme and are left alone.
    pub fn apply_scheme(&self, scheme: &Scheme) -> Scheme {
        if scheme.vars.is_empty() {
            return Scheme::mono(self.apply(&scheme.ty));
        }

        let mut restricted = self.clone();
        for var in &scheme.vars {
            restricted.map.remove(var);
        }
        Scheme {
            vars: scheme.vars.clone(),
            ty: restricted.apply(&scheme.ty),
        }
    }

    /// Compose two substitutions: `self` is applied after `earlier`.
    ///
    /// ```
    /// use rill_typecheck::{Subst, Ty, VarSupply};
    ///
    /// let mut supply = VarSupply::new();
    /// let (a, b) = (supply.fresh(), supply.fresh());
    ///
    /// let earlier = Subst::singleton(a, Ty::list(Ty::Var(b)));
    /// let later = Subst::singleton(b, Ty::text());
    /// let both = later.compose(&earlier);
    ///
    /// assert_eq!(both.get(a), Some(&Ty::list(Ty::text())));
    /// assert_eq!(both.get(b), Some(&Ty::text()));
    /// ```
    pub fn compose(&self, earlier: &Subst) -> Subst {
        let mut map: HashMap<TypeVar, Ty> = earlier
            .map
            .iter()
            .map(|(var, ty)| (*var, self.apply(ty)))
            .collect();

        for (var, ty) in &self.map {
            map.entry(*var).or_insert_with(|| ty.clone());
        }

        Subst { map }
    }

    /// Add the bindings of `later` in place.
    ///
    /// `later` must have been computed on types already rewritten by `self`,
    /// so none of its variables are bound here. Under that condition the
    /// result applies exactly like `later.compose(self)`, because
    /// [`Subst::apply`] follows chains; earlier entries are left as they are
    /// instead of being rewritten on every step.
    pub fn extend(&mut self, later: Subst) {
        for (var, ty) in later.map {
            debug_assert!(!self.map.contains_key(&var), "{} is already bound", var);
            self.map.insert(var, ty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VarSupply;

    #[test]
    fn test_empty_subst() {
        let subst = Subst::empty();
        assert!(subst.is_empty());
        assert_eq!(subst.apply(&Ty::number()), Ty::number());
    }

    #[test]
    fn test_singleton() {
        let mut supply = VarSupply::new();
        let var = supply.fresh();
        let subst = Subst::singleton(var, Ty::boolean());

        assert_eq!(subst.len(), 1);
        assert_eq!(subst.apply(&Ty::Var(var)), Ty::boolean());
    }

    #[test]
    fn test_apply_preserves_unbound_vars() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();
        let subst = Subst::singleton(a, Ty::number());

        assert_eq!(subst.apply(&Ty::Var(b)), Ty::Var(b));
    }

    #[test]
    fn test_apply_nested() {
        let mut supply = VarSupply::new();
        let var = supply.fresh();
        let subst = Subst::singleton(var, Ty::text());

        let ty = Ty::function(Ty::Var(var), Ty::step(Ty::list(Ty::Var(var))));
        assert_eq!(
            subst.apply(&ty),
            Ty::function(Ty::text(), Ty::step(Ty::list(Ty::text())))
        );
    }

    #[test]
    fn test_apply_follows_chains() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        let mut subst = Subst::singleton(a, Ty::Var(b));
        subst.map.insert(b, Ty::bytes());

        assert_eq!(subst.apply(&Ty::Var(a)), Ty::bytes());
    }

    #[test]
    fn test_compose_order() {
        let mut supply = VarSupply::new();
        let var = supply.fresh();

        let earlier = Subst::singleton(var, Ty::number());
        let later = Subst::singleton(var, Ty::text());

        // Entries from the earlier substitution win for shared keys.
        assert_eq!(later.compose(&earlier).apply(&Ty::Var(var)), Ty::number());
    }

    #[test]
    fn test_compose_rewrites_earlier_range() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        let earlier = Subst::singleton(a, Ty::event(Ty::Var(b)));
        let later = Subst::singleton(b, Ty::number());
        let composed = later.compose(&earlier);

        assert_eq!(composed.get(a), Some(&Ty::event(Ty::number())));
        assert_eq!(composed.len(), 2);
    }

    #[test]
    fn test_substitution_idempotent() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();
        let c = supply.fresh();

        let s1 = Subst::singleton(a, Ty::list(Ty::Var(b)));
        let s2 = Subst::singleton(b, Ty::Var(c)).compose(&s1);
        let s3 = Subst::singleton(c, Ty::number()).compose(&s2);

        let ty = Ty::function(Ty::Var(a), Ty::Var(c));
        let once = s3.apply(&ty);
        let twice = s3.apply(&once);
        assert_eq!(once, twice);
        assert_eq!(once, Ty::function(Ty::list(Ty::number()), Ty::number()));
    }

    #[test]
    fn test_extend_applies_like_compose() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();
        let c = supply.fresh();

        let earlier = Subst::singleton(a, Ty::list(Ty::Var(b)));
        let later = Subst::singleton(b, Ty::step(Ty::Var(c)));
        let composed = later.compose(&earlier);

        let mut extended = earlier.clone();
        extended.extend(later);
        assert_eq!(extended.len(), 2);

        let ty = Ty::function(Ty::Var(a), Ty::function(Ty::Var(b), Ty::Var(c)));
        assert_eq!(extended.apply(&ty), composed.apply(&ty));
        // The earlier entry is kept as written.
        assert_eq!(extended.get(a), Some(&Ty::list(Ty::Var(b))));
    }

    #[test]
    fn test_apply_scheme_skips_quantified() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        let scheme = Scheme::poly(vec![a], Ty::function(Ty::Var(a), Ty::Var(b)));
        let mut subst = Subst::singleton(a, Ty::number());
        subst.map.insert(b, Ty::text());

        let applied = subst.apply_scheme(&scheme);
        assert_eq!(applied.vars, vec![a]);
        assert_eq!(applied.ty, Ty::function(Ty::Var(a), Ty::text()));
    }
}
