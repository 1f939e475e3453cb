//! Core type representation.
//!
//! A `Ty` is either a type variable or a registered constructor applied to
//! exactly as many arguments as its arity. The arity invariant is enforced when
//! a type is built, never only during unification: `TyApp` keeps its fields
//! private, so the only ways to obtain one are [`Ty::ctor`], which checks the
//! registry, and the typed helpers (`Ty::list`, `Ty::function`, ...), which are
//! correct by construction.
//!
//! Types are immutable trees. Two occurrences of the same `TypeVar` express a
//! shared constraint; they are resolved through substitutions, never by
//! mutating a type in place.

use crate::collections::HashSet;
use crate::context::registry::{
    Registry, TypeCtorInfo, BOOLEAN, BYTES, EVENT, FUNCTION, LIST, NOTHING, NUMBER, STEP, TEXT,
};
use crate::error::{Result, TypeError};

/// An opaque type variable identity.
///
/// Variables are only created by a [`VarSupply`]; two variables are equal iff
/// they came from the same `fresh()` call of the same supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeVar(u32);

impl TypeVar {
    /// Raw index, stable for the lifetime of the supply that created it.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Monotonic source of fresh type variables.
///
/// Each inference call owns its own supply, so concurrent calls never share
/// mutable state.
#[derive(Debug, Clone, Default)]
pub struct VarSupply {
    next: u32,
}

impl VarSupply {
    /// A supply starting at `?0`.
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate a fresh type variable.
    ///
    /// ```
    /// use rill_typecheck::VarSupply;
    ///
    /// let mut supply = VarSupply::new();
    /// let a = supply.fresh();
    /// let b = supply.fresh();
    /// assert_ne!(a, b);
    /// ```
    pub fn fresh(&mut self) -> TypeVar {
        let var = TypeVar(self.next);
        self.next += 1;
        var
    }

    /// Allocate a fresh variable already wrapped as a type.
    pub fn fresh_ty(&mut self) -> Ty {
        Ty::Var(self.fresh())
    }

    /// Number of variables handed out so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

/// Internal type representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Type variable, unbound until a substitution says otherwise.
    Var(TypeVar),

    /// A constructor applied to its arguments.
    Ctor(TyApp),
}

/// A registered constructor applied to exactly `arity` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TyApp {
    con: &'static TypeCtorInfo,
    args: Vec<Ty>,
}

impl TyApp {
    /// The constructor's registry record.
    pub fn con(&self) -> &'static TypeCtorInfo {
        self.con
    }

    /// Constructor identifier.
    pub fn name(&self) -> &'static str {
        self.con.name()
    }

    /// Arguments, in order.
    pub fn args(&self) -> &[Ty] {
        &self.args
    }
}

impl Ty {
    /// Apply a registered constructor to `args`.
    ///
    /// # Errors
    ///
    /// - `UnknownConstructor` if `name` is not in the registry
    /// - `ArityMismatch` if `args.len()` differs from the constructor's arity
    ///
    /// ```
    /// use rill_typecheck::{Ty, TypeError};
    ///
    /// assert_eq!(Ty::ctor("list", vec![Ty::number()]), Ok(Ty::list(Ty::number())));
    /// assert!(matches!(
    ///     Ty::ctor("list", vec![]),
    ///     Err(TypeError::ArityMismatch { expected: 1, found: 0, .. })
    /// ));
    /// ```
    pub fn ctor(name: &str, args: Vec<Ty>) -> Result<Ty> {
        let con = Registry::core().lookup(name)?;
        if args.len() != con.arity() {
            return Err(TypeError::ArityMismatch {
                name: con.name().to_string(),
                expected: con.arity(),
                found: args.len(),
            });
        }
        Ok(Ty::Ctor(TyApp { con, args }))
    }

    /// Rebuild an application of `app`'s constructor with new arguments.
    ///
    /// Only used for argument-wise rewrites, which preserve the arity.
    pub(crate) fn with_args(app: &TyApp, args: Vec<Ty>) -> Ty {
        debug_assert_eq!(args.len(), app.con.arity());
        Ty::Ctor(TyApp { con: app.con, args })
    }

    fn nullary(con: &'static TypeCtorInfo) -> Ty {
        Ty::Ctor(TyApp {
            con,
            args: Vec::new(),
        })
    }

    fn unary(con: &'static TypeCtorInfo, arg: Ty) -> Ty {
        Ty::Ctor(TyApp {
            con,
            args: vec![arg],
        })
    }

    /// `number`
    pub fn number() -> Ty {
        Ty::nullary(&NUMBER)
    }

    /// `text`
    pub fn text() -> Ty {
        Ty::nullary(&TEXT)
    }

    /// `boolean`
    pub fn boolean() -> Ty {
        Ty::nullary(&BOOLEAN)
    }

    /// `nothing`
    pub fn nothing() -> Ty {
        Ty::nullary(&NOTHING)
    }

    /// `bytes`
    pub fn bytes() -> Ty {
        Ty::nullary(&BYTES)
    }

    /// `step(inner)`
    pub fn step(inner: Ty) -> Ty {
        Ty::unary(&STEP, inner)
    }

    /// `event(inner)`
    pub fn event(inner: Ty) -> Ty {
        Ty::unary(&EVENT, inner)
    }

    /// `list(elem)`
    pub fn list(elem: Ty) -> Ty {
        Ty::unary(&LIST, elem)
    }

    /// `param -> result`
    pub fn function(param: Ty, result: Ty) -> Ty {
        Ty::Ctor(TyApp {
            con: &FUNCTION,
            args: vec![param, result],
        })
    }

    /// Curried function over several parameters: `p1 -> p2 -> ... -> result`.
    pub fn curried(params: Vec<Ty>, result: Ty) -> Ty {
        params
            .into_iter()
            .rev()
            .fold(result, |acc, param| Ty::function(param, acc))
    }

    /// Split `param -> result` into its halves.
    pub fn as_function(&self) -> Option<(&Ty, &Ty)> {
        match self {
            Ty::Ctor(app) if std::ptr::eq(app.con, &FUNCTION) => {
                Some((&app.args[0], &app.args[1]))
            }
            _ => None,
        }
    }

    /// The variable, if this type is one.
    pub fn as_var(&self) -> Option<TypeVar> {
        match self {
            Ty::Var(var) => Some(*var),
            Ty::Ctor(_) => None,
        }
    }

    /// Check whether `var` occurs anywhere in this type.
    ///
    /// This is the occurs check used by unification to reject infinite types
    /// such as `?0 = list(?0)`.
    pub fn occurs(&self, var: TypeVar) -> bool {
        match self {
            Ty::Var(v) => *v == var,
            Ty::Ctor(app) => app.args.iter().any(|arg| arg.occurs(var)),
        }
    }

    /// All type variables in this type. Types have no binders, so every
    /// variable is free.
    pub fn free_vars(&self) -> HashSet<TypeVar> {
        let mut vars = HashSet::new();
        self.collect_free_vars(&mut vars);
        vars
    }

    pub(crate) fn collect_free_vars(&self, vars: &mut HashSet<TypeVar>) {
        match self {
            Ty::Var(v) => {
                vars.insert(*v);
            }
            Ty::Ctor(app) => {
                for arg in &app.args {
                    arg.collect_free_vars(vars);
                }
            }
        }
    }

    /// Variables in order of first appearance (left to right, depth first).
    pub fn vars_in_order(&self) -> Vec<TypeVar> {
        fn walk(ty: &Ty, out: &mut Vec<TypeVar>) {
            match ty {
                Ty::Var(v) => {
                    if !out.contains(v) {
                        out.push(*v);
                    }
                }
                Ty::Ctor(app) => app.args.iter().for_each(|arg| walk(arg, out)),
            }
        }

        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    /// Whether the type contains no variables.
    pub fn is_ground(&self) -> bool {
        match self {
            Ty::Var(_) => false,
            Ty::Ctor(app) => app.args.iter().all(Ty::is_ground),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctor_checks_arity() {
        assert_eq!(
            Ty::ctor("list", vec![]),
            Err(TypeError::ArityMismatch {
                name: "list".to_string(),
                expected: 1,
                found: 0,
            })
        );
        assert_eq!(
            Ty::ctor("number", vec![Ty::text()]),
            Err(TypeError::ArityMismatch {
                name: "number".to_string(),
                expected: 0,
                found: 1,
            })
        );
    }

    #[test]
    fn test_ctor_unknown() {
        assert!(matches!(
            Ty::ctor("map", vec![Ty::text(), Ty::number()]),
            Err(TypeError::UnknownConstructor { .. })
        ));
    }

    #[test]
    fn test_helpers_match_ctor() {
        assert_eq!(Ty::ctor("number", vec![]).unwrap(), Ty::number());
        assert_eq!(
            Ty::ctor("event", vec![Ty::boolean()]).unwrap(),
            Ty::event(Ty::boolean())
        );
        assert_eq!(
            Ty::ctor("function", vec![Ty::text(), Ty::bytes()]).unwrap(),
            Ty::function(Ty::text(), Ty::bytes())
        );
    }

    #[test]
    fn test_fresh_vars_are_distinct() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();
        assert_ne!(a, b);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(supply.issued(), 2);
    }

    #[test]
    fn test_occurs() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        assert!(Ty::Var(a).occurs(a));
        assert!(Ty::list(Ty::step(Ty::Var(a))).occurs(a));
        assert!(!Ty::list(Ty::Var(b)).occurs(a));
        assert!(!Ty::number().occurs(a));
    }

    #[test]
    fn test_free_vars() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        let ty = Ty::function(Ty::Var(a), Ty::list(Ty::Var(b)));
        let vars = ty.free_vars();
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&a));
        assert!(vars.contains(&b));
        assert!(Ty::number().free_vars().is_empty());
    }

    #[test]
    fn test_curried() {
        let ty = Ty::curried(vec![Ty::number(), Ty::text()], Ty::boolean());
        assert_eq!(
            ty,
            Ty::function(Ty::number(), Ty::function(Ty::text(), Ty::boolean()))
        );

        let (param, rest) = ty.as_function().unwrap();
        assert_eq!(param, &Ty::number());
        assert_eq!(rest, &Ty::function(Ty::text(), Ty::boolean()));
        assert!(Ty::number().as_function().is_none());
    }

    #[test]
    fn test_vars_in_order() {
        let mut supply = VarSupply::new();
        let a = supply.fresh();
        let b = supply.fresh();

        let ty = Ty::function(Ty::Var(b), Ty::function(Ty::Var(a), Ty::Var(b)));
        assert_eq!(ty.vars_in_order(), vec![b, a]);
        assert!(!ty.is_ground());
        assert!(Ty::list(Ty::number()).is_ground());
    }
}
