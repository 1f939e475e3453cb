//! Type pretty-printing.
//!
//! `Display` for `Ty` prints variables by identity (`?3`), which keeps the two
//! sides of an error message comparable. [`Ty::pretty`] renames variables to
//! `a`, `b`, ... in order of first appearance, which is what an editor shows
//! for a principal type.
//!
//! Arrows associate to the right: `a -> b -> c` is `a -> (b -> c)`, and a
//! function in parameter position is parenthesized.

use crate::collections::HashMap;
use crate::types::{Ty, TypeVar};
use std::fmt;

/// A display wrapper choosing how type variables are named.
pub struct DisplayTy<'a> {
    ty: &'a Ty,
    names: Option<HashMap<TypeVar, String>>,
}

impl<'a> DisplayTy<'a> {
    /// Print variables by identity.
    pub fn raw(ty: &'a Ty) -> Self {
        Self { ty, names: None }
    }

    /// Print variables with letters assigned in order of first appearance.
    pub fn normalized(ty: &'a Ty) -> Self {
        Self {
            ty,
            names: Some(letter_names(&ty.vars_in_order())),
        }
    }

    /// Print variables with the given names; unnamed variables print raw.
    pub(crate) fn with_names(ty: &'a Ty, names: HashMap<TypeVar, String>) -> Self {
        Self {
            ty,
            names: Some(names),
        }
    }

    fn format_var(&self, var: TypeVar, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.names.as_ref().and_then(|names| names.get(&var)) {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", var),
        }
    }

    fn format_type(&self, ty: &Ty, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((param, result)) = ty.as_function() {
            if param.as_function().is_some() {
                write!(f, "(")?;
                self.format_type(param, f)?;
                write!(f, ")")?;
            } else {
                self.format_type(param, f)?;
            }
            write!(f, " -> ")?;
            return self.format_type(result, f);
        }

        match ty {
            Ty::Var(var) => self.format_var(*var, f),
            Ty::Ctor(app) => {
                f.write_str(app.name())?;
                if app.args().is_empty() {
                    return Ok(());
                }
                write!(f, "(")?;
                for (i, arg) in app.args().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.format_type(arg, f)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for DisplayTy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format_type(self.ty, f)
    }
}

/// `a`, `b`, ..., `z`, `a1`, `b1`, ...
pub(crate) fn letter_names(vars: &[TypeVar]) -> HashMap<TypeVar, String> {
    vars.iter()
        .enumerate()
        .map(|(i, var)| {
            let letter = char::from(b'a' + (i % 26) as u8);
            let name = match i / 26 {
                0 => letter.to_string(),
                round => format!("{}{}", letter, round),
            };
            (*var, name)
        })
        .collect()
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.index())
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", DisplayTy::raw(self))
    }
}

impl Ty {
    /// Render with variables renamed to `a`, `b`, ... in order of appearance.
    ///
    /// ```
    /// use rill_typecheck::{Ty, VarSupply};
    ///
    /// let mut supply = VarSupply::new();
    /// let _skip = supply.fresh();
    /// let t = supply.fresh_ty();
    /// assert_eq!(Ty::function(t.clone(), Ty::list(t)).pretty(), "a -> list(a)");
    /// ```
    pub fn pretty(&self) -> String {
        DisplayTy::normalized(self).to_string()
    }
}
