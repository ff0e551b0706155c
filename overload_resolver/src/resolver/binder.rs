//! The language-supplied conversion policy.
//!
//! The resolver never decides on its own what converts to what; it asks
//! a `BinderOps` implementation. `DefaultBinder` supplies a conservative
//! policy: subtype assignability is always allowed, numeric widening
//! needs one narrowing step, lossy numeric conversion needs the
//! most-permissive levels.

use crate::narrowing::NarrowingLevel;
use crate::overload::OverloadDescriptor;
use crate::types::Ty;

/// Which of two otherwise-applicable parameter types wins an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    First,
    Second,
    Equivalent,
    Ambiguous,
}

impl Preference {
    /// Swap sides, for comparisons evaluated in the opposite order.
    pub fn flip(self) -> Preference {
        match self {
            Preference::First => Preference::Second,
            Preference::Second => Preference::First,
            other => other,
        }
    }
}

/// Hooks a hosted language implements to steer resolution.
pub trait BinderOps {
    /// Whether a value of type `from` can be passed where `to` is
    /// declared, given the narrowing budget.
    fn can_convert_from(&self, from: &Ty, to: &Ty, level: NarrowingLevel) -> bool;

    /// Language-specific preference between two parameter types for an
    /// actual argument type, consulted before the structural rules.
    fn select_best_conversion_for(&self, _actual: &Ty, _one: &Ty, _two: &Ty) -> Preference {
        Preference::Equivalent
    }

    /// Last-resort preference when the structural rules are silent.
    fn prefer_convert(&self, _one: &Ty, _two: &Ty) -> Preference {
        Preference::Ambiguous
    }

    /// Whether by-ref parameters are reduced to value parameters whose
    /// updated values join the return value.
    fn reduce_by_ref(&self) -> bool {
        true
    }

    /// Whether keyword arguments that bind no parameter of `overload`
    /// may initialize members of the constructed value instead.
    fn allow_member_init(&self, overload: &OverloadDescriptor) -> bool {
        overload.is_constructor
    }

    /// Whether `name` is a settable member on values of `ty`. The
    /// default accepts any name; a host with a real member table
    /// overrides this.
    fn settable_member(&self, _ty: &Ty, _name: &str) -> bool {
        true
    }
}

/// Numeric-tower policy usable as-is by hosts without their own rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBinder;

fn is_integer(ty: &Ty) -> bool {
    matches!(
        ty,
        Ty::Int8 | Ty::Int16 | Ty::Int32 | Ty::Int64 | Ty::UInt32 | Ty::UInt64
    )
}

fn is_float(ty: &Ty) -> bool {
    matches!(ty, Ty::Float32 | Ty::Float64)
}

fn is_numeric(ty: &Ty) -> bool {
    is_integer(ty) || is_float(ty) || matches!(ty, Ty::Decimal)
}

/// Value-preserving conversions.
fn widens_to(from: &Ty, to: &Ty) -> bool {
    use Ty::*;
    matches!(
        (from, to),
        (Int8, Int16 | Int32 | Int64 | Float32 | Float64 | Decimal)
            | (Int16, Int32 | Int64 | Float32 | Float64 | Decimal)
            | (Int32, Int64 | Float64 | Decimal)
            | (UInt32, Int64 | UInt64 | Float64 | Decimal)
            | (Int64 | UInt64, Decimal)
            | (Float32, Float64)
            | (Char, Str)
    )
}

impl BinderOps for DefaultBinder {
    fn can_convert_from(&self, from: &Ty, to: &Ty, level: NarrowingLevel) -> bool {
        if to.is_assignable_from(from) {
            return true;
        }
        if let Ty::Nullable(inner) = to {
            return self.can_convert_from(from, inner, level);
        }
        match level {
            NarrowingLevel::None => false,
            NarrowingLevel::One | NarrowingLevel::Two => widens_to(from, to),
            NarrowingLevel::Three => {
                widens_to(from, to) || (is_numeric(from) && is_numeric(to))
            }
            NarrowingLevel::All => {
                widens_to(from, to)
                    || (is_numeric(from) && is_numeric(to))
                    || (is_numeric(from) && *to == Ty::Bool)
            }
        }
    }

    /// Keep the argument in its own numeric family when possible: an
    /// integer argument prefers an integer parameter over a float one,
    /// and vice versa.
    fn select_best_conversion_for(&self, actual: &Ty, one: &Ty, two: &Ty) -> Preference {
        if is_integer(actual) {
            match (is_integer(one), is_integer(two)) {
                (true, false) => return Preference::First,
                (false, true) => return Preference::Second,
                _ => {}
            }
        } else if is_float(actual) {
            match (is_float(one), is_float(two)) {
                (true, false) => return Preference::First,
                (false, true) => return Preference::Second,
                _ => {}
            }
        }
        Preference::Equivalent
    }
}
