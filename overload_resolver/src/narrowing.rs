//! Conversion strictness tiers used during overload matching.

use serde::{Deserialize, Serialize};

/// Narrowing level at which an argument-to-parameter conversion is allowed.
///
/// Levels form an ordered scale from `None` (only conversions that never
/// lose information or change semantics) up to `All` (every conversion the
/// language binder is willing to perform). The tiers between the endpoints
/// carry language-specific meaning: a binder may treat `One` as its
/// "preferred implicit" conversions and `Three` as "explicit but safe".
///
/// Resolution runs once per level in a caller-supplied `[min, max]` range,
/// from strict to permissive, and stops at the first level that produces a
/// result.
///
/// # Examples
/// ```
/// use overload_resolver::NarrowingLevel;
///
/// assert!(NarrowingLevel::None < NarrowingLevel::One);
/// assert!(NarrowingLevel::Three < NarrowingLevel::All);
/// assert_eq!(NarrowingLevel::Three.succ(), Some(NarrowingLevel::All));
/// assert_eq!(NarrowingLevel::All.succ(), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum NarrowingLevel {
    /// No narrowing: identity and widening conversions only.
    #[default]
    None,
    /// First language-specific implicit tier.
    One,
    /// Second language-specific implicit tier.
    Two,
    /// Third language-specific tier, conventionally "explicit but safe".
    Three,
    /// Every conversion the binder supports.
    All,
}

impl NarrowingLevel {
    /// The next more permissive level, or `None` past `All`.
    pub fn succ(self) -> Option<NarrowingLevel> {
        match self {
            NarrowingLevel::None => Some(NarrowingLevel::One),
            NarrowingLevel::One => Some(NarrowingLevel::Two),
            NarrowingLevel::Two => Some(NarrowingLevel::Three),
            NarrowingLevel::Three => Some(NarrowingLevel::All),
            NarrowingLevel::All => None,
        }
    }

    /// Iterate levels from `self` through `max` inclusive.
    pub fn range_to(self, max: NarrowingLevel) -> impl Iterator<Item = NarrowingLevel> {
        let mut next = if self <= max { Some(self) } else { None };
        std::iter::from_fn(move || {
            let cur = next?;
            next = cur.succ().filter(|n| *n <= max);
            Some(cur)
        })
    }
}
