//! Native signatures.
//!
//! Natives are the functions the host environment provides (`hold`, `sample`,
//! `list_of`, ...). Their types are declared in a small notation, see
//! [`signature`], and lowered to closed schemes at the start of every
//! inference call. Each call lowers with its own [`VarSupply`], so the
//! variable identities inside a scheme never collide with another call's.
//!
//! ```
//! use rill_typecheck::Natives;
//!
//! let mut natives = Natives::new();
//! natives.declare("hold", "a -> event(a) -> step(a)").unwrap();
//! natives.declare("sample", "step(a) -> event(b) -> event(a)").unwrap();
//! assert!(natives.validate().is_ok());
//! ```

pub(crate) mod lower;
pub mod signature;

pub use signature::Signature;

use crate::context::TypeEnv;
use crate::error::{Result, SignatureFault, TypeError};
use crate::types::VarSupply;
use std::collections::BTreeMap;

/// The set of natives a tree may reference, by name.
///
/// Kept in name order so that lowering, and therefore variable numbering and
/// the first error reported, is the same on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Natives {
    signatures: BTreeMap<String, Signature>,
}

impl Natives {
    /// No natives.
    pub fn new() -> Self {
        Self {
            signatures: BTreeMap::new(),
        }
    }

    /// Declare a native from signature text, replacing any earlier
    /// declaration of the same name.
    ///
    /// # Errors
    ///
    /// `MalformedSignature` if the text does not parse. Constructor misuse
    /// (`list(a, b)`, `map(a)`) is only found by [`Natives::validate`] or at
    /// inference time.
    pub fn declare(&mut self, name: impl Into<String>, text: &str) -> Result<()> {
        let name = name.into();
        match Signature::parse(text) {
            Ok(sig) => {
                self.signatures.insert(name, sig);
                Ok(())
            }
            Err(cause) => Err(TypeError::MalformedSignature {
                native: name,
                cause,
            }),
        }
    }

    /// Declare a native from an already built signature, returning the
    /// signature it replaces.
    pub fn insert(&mut self, name: impl Into<String>, sig: Signature) -> Option<Signature> {
        self.signatures.insert(name.into(), sig)
    }

    /// The signature of `name`.
    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.signatures.get(name)
    }

    /// Number of natives.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether no native is declared.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Signature)> + '_ {
        self.signatures
            .iter()
            .map(|(name, sig)| (name.as_str(), sig))
    }

    /// Check that every signature lowers.
    pub fn validate(&self) -> Result<()> {
        self.lower_all(&mut VarSupply::new()).map(|_| ())
    }

    /// Lower every signature into a root typing context.
    pub(crate) fn lower_all(&self, supply: &mut VarSupply) -> Result<TypeEnv<'static>> {
        let mut env = TypeEnv::new();
        for (name, sig) in &self.signatures {
            let scheme = lower::scheme_of(sig, supply).map_err(|err| {
                TypeError::MalformedSignature {
                    native: name.clone(),
                    cause: SignatureFault::Kind(Box::new(err)),
                }
            })?;
            env.bind(name.clone(), scheme);
        }
        Ok(env)
    }
}
