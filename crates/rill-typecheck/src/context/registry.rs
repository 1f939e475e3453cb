//! Constructor registry.
//!
//! Every compound or base type is an application of one of the constructors in
//! this table. The table is fixed: there is no way to register a constructor at
//! runtime, so the unifier can rely on a closed universe of kinds.
//!
//! | constructor | arity |
//! |-------------|-------|
//! | `number`, `text`, `boolean`, `nothing`, `bytes` | 0 |
//! | `step`, `event`, `list` | 1 |
//! | `function` | 2 |

use crate::collections::HashMap;
use crate::error::{Result, TypeError};
use std::sync::OnceLock;

/// A type constructor: its identifier and how many type arguments it takes.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TypeCtorInfo {
    name: &'static str,
    arity: usize,
}

impl TypeCtorInfo {
    const fn new(name: &'static str, arity: usize) -> Self {
        Self { name, arity }
    }

    /// Textual identifier, e.g. `"list"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of type arguments this constructor requires.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

/// Numbers (no width distinction).
pub static NUMBER: TypeCtorInfo = TypeCtorInfo::new("number", 0);
/// Text values.
pub static TEXT: TypeCtorInfo = TypeCtorInfo::new("text", 0);
/// Booleans.
pub static BOOLEAN: TypeCtorInfo = TypeCtorInfo::new("boolean", 0);
/// The unit-like absence of a value.
pub static NOTHING: TypeCtorInfo = TypeCtorInfo::new("nothing", 0);
/// Raw byte buffers.
pub static BYTES: TypeCtorInfo = TypeCtorInfo::new("bytes", 0);
/// A continuously available value.
pub static STEP: TypeCtorInfo = TypeCtorInfo::new("step", 1);
/// A discretely occurring value.
pub static EVENT: TypeCtorInfo = TypeCtorInfo::new("event", 1);
/// Homogeneous lists.
pub static LIST: TypeCtorInfo = TypeCtorInfo::new("list", 1);
/// Curried functions: `function(a, b)` is `a -> b`.
pub static FUNCTION: TypeCtorInfo = TypeCtorInfo::new("function", 2);

static CORE_TABLE: [&TypeCtorInfo; 9] = [
    &NUMBER, &TEXT, &BOOLEAN, &NOTHING, &BYTES, &STEP, &EVENT, &LIST, &FUNCTION,
];

/// Lookup structure over the core constructor table.
#[derive(Debug)]
pub struct Registry {
    table: &'static [&'static TypeCtorInfo],
    by_name: HashMap<&'static str, &'static TypeCtorInfo>,
}

static CORE: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// The core registry, built on first use and shared by every caller.
    pub fn core() -> &'static Registry {
        CORE.get_or_init(|| Registry::from_table(&CORE_TABLE))
    }

    fn from_table(table: &'static [&'static TypeCtorInfo]) -> Self {
        let by_name = table.iter().map(|info| (info.name, *info)).collect();
        Self { table, by_name }
    }

    /// Look up a constructor by identifier.
    ///
    /// # Errors
    ///
    /// `UnknownConstructor` if the identifier is not registered.
    pub fn lookup(&self, name: &str) -> Result<&'static TypeCtorInfo> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| TypeError::UnknownConstructor {
                name: name.to_string(),
            })
    }

    /// Arity of a constructor.
    ///
    /// ```
    /// use rill_typecheck::Registry;
    ///
    /// assert_eq!(Registry::core().arity_of("step").unwrap(), 1);
    /// assert!(Registry::core().arity_of("map").is_err());
    /// ```
    pub fn arity_of(&self, name: &str) -> Result<usize> {
        self.lookup(name).map(TypeCtorInfo::arity)
    }

    /// Whether `name` is a registered constructor.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterate over the constructors in table order.
    pub fn iter(&self) -> impl Iterator<Item = &'static TypeCtorInfo> + '_ {
        self.table.iter().copied()
    }
}
