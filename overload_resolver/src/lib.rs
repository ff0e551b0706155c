//! Overload resolution and call binding for dynamic language hosting.
//!
//! Given a set of method overloads and the actual arguments of a call
//! site, the resolver normalizes the arguments (named arguments, list
//! and dictionary splats, partial splat expansion), builds arity-keyed
//! candidate sets (default-filling variants, params expansion, by-ref
//! reduction), infers generic type variables, and selects the best
//! applicable candidate under an escalating narrowing-level scheme. The
//! outcome is a [`result::BindingTarget`] that either names the chosen
//! candidate or classifies exactly why the call cannot bind.
//!
//! Conversion policy is supplied by the host through
//! [`resolver::BinderOps`]; [`resolver::DefaultBinder`] implements a
//! plain numeric-tower policy.

// Prevent accidental debug output in library code. Debug tracing goes
// through the gated helpers in `resolver`.
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]

pub mod arguments;
pub mod builders;
pub mod candidate;
pub mod error;
pub mod inference;
pub mod narrowing;
pub mod overload;
pub mod resolver;
pub mod result;
pub mod types;

pub use arguments::{ActualArguments, Arg, ArgumentBinding};
pub use builders::{ArgBuilder, InstanceBuilder, ReturnBuilder};
pub use candidate::{CandidateSet, OverloadCandidate, ParameterMapping};
pub use error::ResolverError;
pub use narrowing::NarrowingLevel;
pub use overload::{
    DefaultValue, GenericParam, OverloadDescriptor, Param, ParameterFlags, ParameterWrapper,
};
pub use resolver::{ArgKind, BinderOps, CallSignature, DefaultBinder, OverloadResolver, Preference};
pub use result::{
    Arity, BindingOutcome, BindingTarget, CallFailure, CallFailureReason, ConversionResult,
};
pub use types::{ClassTy, Ty};
