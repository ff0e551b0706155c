//! Precondition errors.
//!
//! These indicate caller bugs (malformed inputs, resolver reuse), never
//! data-dependent binding outcomes. Binding outcomes live in
//! [`crate::result::BindingOutcome`] and are ordinary values.

use thiserror::Error;

/// Contract violations raised by resolver and argument-set construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// `resolve_overload` was invoked on a resolver that already ran.
    #[error("overload resolver cannot be reused")]
    ResolverReused,

    /// The named-argument list and the name list have different lengths.
    #[error("named argument count {named} does not match name count {names}")]
    NamedArgumentMismatch { named: usize, names: usize },

    /// Splat bookkeeping breaks the `collapsed > 0 ⟺ splat index set`
    /// invariant, or the first-splatted index lies past the splat index.
    #[error("inconsistent splat metadata: collapsed={collapsed}, splat_index={splat_index:?}, first_splatted_arg={first_splatted_arg:?}")]
    InconsistentSplat {
        collapsed: usize,
        splat_index: Option<usize>,
        first_splatted_arg: Option<usize>,
    },

    /// The supplied value list does not fit the call signature's shape,
    /// or the signature collapses more than one splatted list.
    #[error("call signature {signature} cannot take {values} value(s)")]
    SignatureMismatch { signature: String, values: usize },
}
