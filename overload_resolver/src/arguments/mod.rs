//! Normalized view of a call's actual arguments.
//!
//! `ActualArguments` is built once per resolution attempt from the raw
//! call signature: named arguments extracted, splatted lists expanded up
//! to the resolver's splat limits, the rest accounted for as the
//! collapsed tail. `ArgumentBinding` is the positional/named permutation
//! produced by binding keyword names against one candidate.

#[cfg(test)]
mod tests;

use crate::candidate::OverloadCandidate;
use crate::error::ResolverError;
use crate::result::{CallFailure, CallFailureReason};
use crate::types::Ty;

/// An opaque typed placeholder for one actual argument value.
///
/// The resolver only ever looks at the limit type; `splat_items` and
/// `dict_items` carry the shape of splatted values, and `inference_hook`
/// lets an invokable value participate in delegate-driven generic
/// inference.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// The most specific type the value is statically known to have.
    pub ty: Ty,
    /// Item placeholders when the value is list-shaped; consulted when
    /// the argument is marked as a list splat.
    pub splat_items: Option<Vec<Arg>>,
    /// Entries when the value is dictionary-shaped; consulted when the
    /// argument is marked as a dictionary splat.
    pub dict_items: Option<Vec<(String, Arg)>>,
    /// Given the formal delegate type and a type-variable name, report
    /// the inferred binding for that variable, if any.
    pub inference_hook: Option<fn(&Ty, &str) -> Option<Ty>>,
}

impl Arg {
    pub fn new(ty: Ty) -> Self {
        Arg {
            ty,
            splat_items: None,
            dict_items: None,
            inference_hook: None,
        }
    }

    /// A null argument value.
    pub fn null() -> Self {
        Arg::new(Ty::Null)
    }

    /// A list-shaped value: an array of `elem` whose items are known.
    pub fn list(elem: Ty, items: Vec<Arg>) -> Self {
        Arg {
            splat_items: Some(items),
            ..Arg::new(Ty::array(elem))
        }
    }

    /// A dictionary-shaped value with known entries.
    pub fn dict(items: Vec<(String, Arg)>) -> Self {
        Arg {
            dict_items: Some(items),
            ..Arg::new(Ty::Dict)
        }
    }

    /// An invokable value that can feed delegate-parameter inference.
    pub fn invokable(ty: Ty, hook: fn(&Ty, &str) -> Option<Ty>) -> Self {
        Arg {
            inference_hook: Some(hook),
            ..Arg::new(ty)
        }
    }
}

/// Maps each actual argument index to the candidate parameter slot it
/// binds to. Positional arguments map to themselves; named arguments go
/// through the permutation built by keyword binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentBinding {
    positional_count: usize,
    /// `permutation[i]` is the slot offset (beyond the positional count)
    /// for the i-th named argument, or `None` when the argument is
    /// absorbed by a params dictionary or member initialization rather
    /// than a declared slot. Immutable once constructed.
    permutation: Vec<Option<usize>>,
}

impl ArgumentBinding {
    /// A purely positional binding.
    pub fn positional(positional_count: usize) -> Self {
        ArgumentBinding {
            positional_count,
            permutation: Vec::new(),
        }
    }

    fn with_permutation(positional_count: usize, permutation: Vec<Option<usize>>) -> Self {
        ArgumentBinding {
            positional_count,
            permutation,
        }
    }

    pub fn positional_count(&self) -> usize {
        self.positional_count
    }

    pub fn named_count(&self) -> usize {
        self.permutation.len()
    }

    /// The parameter slot consumed by argument `i`, or `None` when the
    /// argument bypasses the declared parameter list.
    pub fn argument_to_parameter(&self, i: usize) -> Option<usize> {
        if i < self.positional_count {
            Some(i)
        } else {
            self.permutation[i - self.positional_count].map(|slot| self.positional_count + slot)
        }
    }
}

/// The normalized actual arguments of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ActualArguments {
    args: Vec<Arg>,
    named_args: Vec<Arg>,
    names: Vec<String>,
    hidden_count: usize,
    collapsed_count: usize,
    first_splatted_arg: Option<usize>,
    splat_index: Option<usize>,
}

impl ActualArguments {
    /// Construct, checking the structural invariants: the named list and name
    /// list agree in length, and splat indices are consistent with the
    /// collapsed count.
    pub fn new(
        args: Vec<Arg>,
        named_args: Vec<Arg>,
        names: Vec<String>,
        hidden_count: usize,
        collapsed_count: usize,
        first_splatted_arg: Option<usize>,
        splat_index: Option<usize>,
    ) -> Result<Self, ResolverError> {
        if named_args.len() != names.len() {
            return Err(ResolverError::NamedArgumentMismatch {
                named: named_args.len(),
                names: names.len(),
            });
        }
        let consistent = match splat_index {
            Some(splat) => {
                collapsed_count > 0
                    && first_splatted_arg.is_some_and(|first| first <= splat)
                    && splat <= args.len()
            }
            None => collapsed_count == 0 && first_splatted_arg.is_none(),
        };
        if !consistent {
            return Err(ResolverError::InconsistentSplat {
                collapsed: collapsed_count,
                splat_index,
                first_splatted_arg,
            });
        }
        Ok(ActualArguments {
            args,
            named_args,
            names,
            hidden_count,
            collapsed_count,
            first_splatted_arg,
            splat_index,
        })
    }

    /// A plain positional call with no names, splats, or hidden args.
    pub fn simple(args: Vec<Arg>) -> Self {
        ActualArguments {
            args,
            named_args: Vec::new(),
            names: Vec::new(),
            hidden_count: 0,
            collapsed_count: 0,
            first_splatted_arg: None,
            splat_index: None,
        }
    }

    /// Number of materialized arguments; this is the arity candidates are
    /// matched against.
    pub fn count(&self) -> usize {
        self.args.len() + self.named_args.len()
    }

    /// Argument count as the user sees it: materialized plus collapsed,
    /// minus hidden.
    pub fn visible_count(&self) -> usize {
        self.count() + self.collapsed_count - self.hidden_count
    }

    pub fn positional(&self) -> &[Arg] {
        &self.args
    }

    pub fn named(&self) -> &[Arg] {
        &self.named_args
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden_count
    }

    pub fn collapsed_count(&self) -> usize {
        self.collapsed_count
    }

    pub fn splat_index(&self) -> Option<usize> {
        self.splat_index
    }

    pub fn first_splatted_arg(&self) -> Option<usize> {
        self.first_splatted_arg
    }

    /// Index positional arguments first, then named arguments.
    pub fn arg(&self, i: usize) -> &Arg {
        if i < self.args.len() {
            &self.args[i]
        } else {
            &self.named_args[i - self.args.len()]
        }
    }

    /// Translate a collapsed-argument index into an index within the
    /// original splatted list.
    pub fn to_splatted_item_index(&self, collapsed_index: usize) -> usize {
        let splat = self.splat_index.unwrap_or(0);
        let first = self.first_splatted_arg.unwrap_or(0);
        splat - first + collapsed_index
    }

    /// Bind each named argument to a parameter slot of `candidate`.
    ///
    /// Unbound names (no parameter with that name) are collected first;
    /// names that target a slot already filled by a positional argument
    /// or claimed by an earlier keyword are collected as duplicates.
    /// When both occur in one call, unbound names are reported first.
    pub fn try_bind_named_arguments(
        &self,
        candidate: &OverloadCandidate,
    ) -> Result<ArgumentBinding, CallFailure> {
        let positional_count = self.args.len();
        if self.named_args.is_empty() {
            return Ok(ArgumentBinding::positional(positional_count));
        }

        let named_slot_count = candidate
            .parameter_count()
            .saturating_sub(positional_count);
        let mut claimed = vec![false; named_slot_count];
        let mut permutation: Vec<Option<usize>> = vec![None; self.named_args.len()];
        let dict_names = candidate.params_dict_names();
        let mut unbound: Vec<String> = Vec::new();
        let mut duplicates: Vec<String> = Vec::new();

        for (i, name) in self.names.iter().enumerate() {
            match candidate.index_of_parameter(name) {
                Some(param_index) => {
                    if param_index < positional_count || claimed[param_index - positional_count] {
                        duplicates.push(name.clone());
                    } else {
                        let slot = param_index - positional_count;
                        claimed[slot] = true;
                        permutation[i] = Some(slot);
                    }
                }
                None => {
                    // a params dictionary soaks up any name it declared
                    // for itself at expansion time
                    if !dict_names.is_some_and(|d| d.iter().any(|n| n == name)) {
                        unbound.push(name.clone());
                    }
                }
            }
        }

        if !unbound.is_empty() {
            return Err(CallFailure::new(
                candidate.signature(),
                CallFailureReason::UnassignableKeyword(unbound),
            ));
        }
        if !duplicates.is_empty() {
            return Err(CallFailure::new(
                candidate.signature(),
                CallFailureReason::DuplicateKeyword(duplicates),
            ));
        }
        Ok(ArgumentBinding::with_permutation(
            positional_count,
            permutation,
        ))
    }
}
