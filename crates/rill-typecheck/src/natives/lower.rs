//! Lowering signatures to types.

use crate::collections::HashMap;
use crate::context::{Registry, Scheme};
use crate::error::Result;
use crate::natives::Signature;
use crate::types::{Ty, TypeVar, VarSupply};

/// Lowers one signature, giving each distinct variable name one fresh
/// variable.
pub(crate) struct Lowering<'s> {
    supply: &'s mut VarSupply,
    vars: HashMap<String, TypeVar>,
}

impl<'s> Lowering<'s> {
    pub(crate) fn new(supply: &'s mut VarSupply) -> Self {
        Self {
            supply,
            vars: HashMap::new(),
        }
    }

    /// Lower `sig` to a type.
    ///
    /// A bare registered name is that constructor with no arguments, so a
    /// bare `list` fails the arity check instead of becoming a variable.
    pub(crate) fn lower(&mut self, sig: &Signature) -> Result<Ty> {
        match sig {
            Signature::Name(name) if Registry::core().contains(name) => {
                Ty::ctor(name, Vec::new())
            }
            Signature::Name(name) => {
                let var = match self.vars.get(name) {
                    Some(var) => *var,
                    None => {
                        let var = self.supply.fresh();
                        self.vars.insert(name.clone(), var);
                        var
                    }
                };
                Ok(Ty::Var(var))
            }
            Signature::App(name, args) => {
                let args = args
                    .iter()
                    .map(|arg| self.lower(arg))
                    .collect::<Result<Vec<_>>>()?;
                Ty::ctor(name, args)
            }
            Signature::Arrow(from, to) => {
                let from = self.lower(from)?;
                let to = self.lower(to)?;
                Ok(Ty::function(from, to))
            }
        }
    }

    /// Variables introduced so far.
    pub(crate) fn vars(&self) -> Vec<TypeVar> {
        self.vars.values().copied().collect()
    }
}

/// Lower a native's signature to a scheme closed over all its variables.
pub(crate) fn scheme_of(sig: &Signature, supply: &mut VarSupply) -> Result<Scheme> {
    let mut lowering = Lowering::new(supply);
    let ty = lowering.lower(sig)?;
    Ok(Scheme::poly(lowering.vars(), ty))
}

/// Lower a signature to a plain type whose variables stay free.
pub(crate) fn monotype_of(sig: &Signature, supply: &mut VarSupply) -> Result<Ty> {
    Lowering::new(supply).lower(sig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TypeError;

    fn lower_str(text: &str) -> Result<Scheme> {
        let sig = Signature::parse(text).unwrap();
        scheme_of(&sig, &mut VarSupply::new())
    }

    #[test]
    fn test_lower_base() {
        let scheme = lower_str("number -> text").unwrap();
        assert!(!scheme.is_poly());
        assert_eq!(scheme.ty, Ty::function(Ty::number(), Ty::text()));
    }

    #[test]
    fn test_lower_shares_vars() {
        let scheme = lower_str("a -> a -> list(a)").unwrap();
        assert_eq!(scheme.vars.len(), 1);
        assert_eq!(scheme.to_string(), "forall a. a -> a -> list(a)");
    }

    #[test]
    fn test_lower_distinct_vars() {
        let scheme = lower_str("(a -> b) -> list(a) -> list(b)").unwrap();
        assert_eq!(scheme.vars.len(), 2);
        assert_eq!(
            scheme.to_string(),
            "forall a b. (a -> b) -> list(a) -> list(b)"
        );
    }

    #[test]
    fn test_bare_unary_ctor() {
        assert_eq!(
            lower_str("step -> number"),
            Err(TypeError::ArityMismatch {
                name: "step".to_string(),
                expected: 1,
                found: 0,
            })
        );
    }

    #[test]
    fn test_unknown_ctor() {
        assert_eq!(
            lower_str("map(text, number)"),
            Err(TypeError::UnknownConstructor {
                name: "map".to_string(),
            })
        );
    }

    #[test]
    fn test_too_many_args() {
        assert!(matches!(
            lower_str("list(a, b)"),
            Err(TypeError::ArityMismatch { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn test_monotype_vars_are_free() {
        let mut supply = VarSupply::new();
        let sig = Signature::parse("list(a)").unwrap();
        let ty = monotype_of(&sig, &mut supply).unwrap();
        assert_eq!(supply.issued(), 1);
        assert!(!ty.is_ground());
    }
}
