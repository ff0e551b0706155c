//! The resolution pipeline: candidate sets, splat expansion, per-level
//! filtering, and best-candidate selection.
//!
//! A resolver is built for one call shape and used exactly once; a
//! second `resolve_overload` on the same instance is an error rather
//! than a stale answer.
//!
//! ## Debug Logging
//!
//! Set `RESOLVER_DISPATCH_DEBUG=1` to enable per-level resolution
//! tracing in debug builds.

mod binder;

pub use binder::{BinderOps, DefaultBinder, Preference};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arguments::{ActualArguments, Arg, ArgumentBinding};
use crate::builders::ArgBuilder;
use crate::candidate::{CandidateSet, OverloadCandidate, ParameterMapping};
use crate::error::ResolverError;
use crate::inference::infer_generic_candidate;
use crate::narrowing::NarrowingLevel;
use crate::overload::{OverloadDescriptor, ParameterWrapper};
use crate::result::{
    Arity, BindingOutcome, BindingTarget, CallFailure, CallFailureReason, ConversionResult,
};
use crate::types::Ty;

/// Check if resolution debug logging is enabled via
/// `RESOLVER_DISPATCH_DEBUG`. Debug builds only.
#[cfg(debug_assertions)]
fn resolver_debug_enabled() -> bool {
    use std::sync::OnceLock;
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("RESOLVER_DISPATCH_DEBUG").is_ok())
}

/// Emit resolution debug logs in debug builds without relying on
/// `eprintln!`.
#[cfg(debug_assertions)]
fn resolver_debug_log(args: fmt::Arguments<'_>) {
    use std::io::Write;
    let _ = writeln!(std::io::stderr(), "{args}");
}

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            if resolver_debug_enabled() {
                resolver_debug_log(format_args!($($arg)*));
            }
        }
    };
}

/// How each syntactic argument of the call is passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgKind {
    Simple,
    Named(String),
    /// A list value whose items become positional arguments.
    ListSplat,
    /// A dictionary value whose entries become named arguments.
    DictSplat,
}

/// The shape of a call site, independent of the argument values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallSignature {
    kinds: Vec<ArgKind>,
}

impl CallSignature {
    pub fn new(kinds: Vec<ArgKind>) -> Self {
        CallSignature { kinds }
    }

    pub fn positional(count: usize) -> Self {
        CallSignature {
            kinds: vec![ArgKind::Simple; count],
        }
    }

    pub fn kinds(&self) -> &[ArgKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn has_named(&self) -> bool {
        self.kinds
            .iter()
            .any(|k| matches!(k, ArgKind::Named(_) | ArgKind::DictSplat))
    }

    pub fn has_list_splat(&self) -> bool {
        self.kinds.iter().any(|k| matches!(k, ArgKind::ListSplat))
    }
}

impl fmt::Display for CallSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, k) in self.kinds.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match k {
                ArgKind::Simple => f.write_str("_")?,
                ArgKind::Named(n) => write!(f, "{n}=_")?,
                ArgKind::ListSplat => f.write_str("*_")?,
                ArgKind::DictSplat => f.write_str("**_")?,
            }
        }
        f.write_str(")")
    }
}

/// Single-use resolver for one call site.
pub struct OverloadResolver<'a, B: BinderOps + ?Sized> {
    binder: &'a B,
    method_name: String,
    signature: CallSignature,
    candidate_sets: BTreeMap<usize, CandidateSet>,
    /// Unexpanded variadic candidates, expanded per target arity.
    params_candidates: Vec<OverloadCandidate>,
    /// The middle of a partially-expanded splatted list; converted
    /// against the params element type of each surviving candidate.
    collapsed_args: Vec<Arg>,
    done: bool,
}

impl<B: BinderOps + ?Sized> fmt::Debug for OverloadResolver<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverloadResolver")
            .field("method_name", &self.method_name)
            .field("signature", &self.signature)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<'a, B: BinderOps + ?Sized> OverloadResolver<'a, B> {
    pub fn new(binder: &'a B, method_name: impl Into<String>, signature: CallSignature) -> Self {
        OverloadResolver {
            binder,
            method_name: method_name.into(),
            signature,
            candidate_sets: BTreeMap::new(),
            params_candidates: Vec::new(),
            collapsed_args: Vec::new(),
            done: false,
        }
    }

    /// Resolve the call against `overloads`, escalating through the
    /// narrowing levels from `min_level` to `max_level`.
    ///
    /// Outcome classification lives in the returned `BindingTarget`; an
    /// `Err` means the resolver itself was misused, not that the call
    /// failed to bind.
    pub fn resolve_overload(
        &mut self,
        overloads: &[Arc<OverloadDescriptor>],
        values: &[Arg],
        min_level: NarrowingLevel,
        max_level: NarrowingLevel,
    ) -> Result<BindingTarget, ResolverError> {
        if self.done {
            return Err(ResolverError::ResolverReused);
        }
        self.done = true;

        self.build_candidate_sets(overloads);
        if self.candidate_sets.is_empty() && self.params_candidates.is_empty() {
            return Ok(BindingTarget::new(
                self.method_name.clone(),
                values.len(),
                BindingOutcome::NoCallableMethod,
            ));
        }

        let (pre_splat, post_splat) = self.get_splat_limits();
        let mut actual = match self.create_actual_arguments(values, pre_splat, post_splat)? {
            Some(actual) => actual,
            // a splat value without the required shape cannot form an
            // argument set; a binding-time failure, not a caller bug
            None => {
                return Ok(BindingTarget::new(
                    self.method_name.clone(),
                    values.len(),
                    BindingOutcome::InvalidArguments,
                ));
            }
        };
        let member_names = self.split_member_init(&mut actual)?;

        trace!(
            "resolve {}{}: {} args, {} sets, {} variadic",
            self.method_name,
            self.signature,
            actual.count(),
            self.candidate_sets.len(),
            self.params_candidates.len()
        );

        Ok(self.make_binding_target(&actual, min_level, max_level, &member_names))
    }

    fn build_candidate_sets(&mut self, overloads: &[Arc<OverloadDescriptor>]) {
        for overload in overloads {
            if overload.uses_legacy_varargs {
                continue;
            }
            let reducible = self.binder.reduce_by_ref()
                && overload.params.iter().any(|p| p.is_by_ref || p.is_out);
            let mut mapped =
                ParameterMapping::new(Arc::clone(overload), reducible).map();
            if reducible {
                // callers holding an explicit cell bind the unreduced shape
                mapped.extend(ParameterMapping::new(Arc::clone(overload), false).map());
            }
            for candidate in mapped {
                if candidate.has_params_array() || candidate.has_params_dict() {
                    self.params_candidates.push(candidate.clone());
                }
                let arity = candidate.parameter_count();
                self.candidate_sets
                    .entry(arity)
                    .or_insert_with(|| CandidateSet::new(arity))
                    .add(candidate);
            }
        }
    }

    /// How much of a splatted list to materialize: enough expanded
    /// arguments before and after the collapsed middle to satisfy every
    /// candidate shape, plus one anchor item ahead of the collapse.
    fn get_splat_limits(&self) -> (usize, usize) {
        if self.params_candidates.is_empty() {
            return (usize::MAX, usize::MAX);
        }
        let mut pre_count = 0;
        let mut post_count = 0;
        for c in &self.params_candidates {
            if let Some(idx) = c.params_array_index() {
                pre_count = pre_count.max(idx);
                post_count = post_count.max(c.parameter_count() - idx - 1);
            }
        }
        // arities above what the variadic shapes cover need their
        // arguments fully materialized
        let max_arity = pre_count + post_count + 1;
        for arity in self.candidate_sets.keys() {
            if *arity > max_arity {
                pre_count = pre_count.max(*arity);
            }
        }
        (pre_count + 1, post_count)
    }

    /// `Ok(None)` means a splat value did not have the shape its kind
    /// declares, which classifies the call as `InvalidArguments`.
    fn create_actual_arguments(
        &mut self,
        values: &[Arg],
        pre_splat: usize,
        post_splat: usize,
    ) -> Result<Option<ActualArguments>, ResolverError> {
        if self.signature.len() != values.len() {
            return Err(ResolverError::SignatureMismatch {
                signature: self.signature.to_string(),
                values: values.len(),
            });
        }

        let mut positional: Vec<Arg> = Vec::new();
        let mut named: Vec<Arg> = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut collapsed = 0;
        let mut first_splatted = None;
        let mut splat_index = None;

        for (kind, value) in self.signature.kinds().iter().zip(values) {
            match kind {
                ArgKind::Simple => positional.push(value.clone()),
                ArgKind::Named(n) => {
                    named.push(value.clone());
                    names.push(n.clone());
                }
                ArgKind::ListSplat => {
                    let Some(items) = &value.splat_items else {
                        return Ok(None);
                    };
                    if splat_index.is_some() {
                        // at most one collapsible splat per call
                        return Err(ResolverError::SignatureMismatch {
                            signature: self.signature.to_string(),
                            values: values.len(),
                        });
                    }
                    let n = items.len();
                    if pre_splat.saturating_add(post_splat) >= n {
                        positional.extend(items.iter().cloned());
                    } else {
                        first_splatted = Some(positional.len());
                        positional.extend(items[..pre_splat].iter().cloned());
                        splat_index = Some(positional.len());
                        collapsed = n - pre_splat - post_splat;
                        self.collapsed_args = items[pre_splat..n - post_splat].to_vec();
                        positional.extend(items[n - post_splat..].iter().cloned());
                    }
                }
                ArgKind::DictSplat => {
                    let Some(entries) = &value.dict_items else {
                        return Ok(None);
                    };
                    for (k, v) in entries {
                        named.push(v.clone());
                        names.push(k.clone());
                    }
                }
            }
        }

        ActualArguments::new(
            positional,
            named,
            names,
            0,
            collapsed,
            first_splatted,
            splat_index,
        )
        .map(Some)
    }

    /// For constructor-only calls, surplus names that no overload can
    /// bind become member initializers instead of binding failures. The
    /// arguments are removed from the named list; the names are restored
    /// on the winning candidate's return builder.
    fn split_member_init(
        &self,
        actual: &mut ActualArguments,
    ) -> Result<Vec<String>, ResolverError> {
        if actual.names().is_empty() {
            return Ok(Vec::new());
        }
        let mut all_candidates = self
            .candidate_sets
            .values()
            .flat_map(|s| s.candidates().iter());
        if !all_candidates.all(|c| self.binder.allow_member_init(c.overload())) {
            return Ok(Vec::new());
        }
        if self.params_candidates.iter().any(|c| c.has_params_dict()) {
            return Ok(Vec::new());
        }

        let bindable = |name: &str| {
            self.candidate_sets
                .values()
                .flat_map(|s| s.candidates().iter())
                .any(|c| c.index_of_parameter(name).is_some())
        };
        let settable = |name: &str| {
            self.candidate_sets
                .values()
                .flat_map(|s| s.candidates().iter())
                .any(|c| self.binder.settable_member(&c.return_type(), name))
        };

        let mut members = Vec::new();
        let mut kept_named = Vec::new();
        let mut kept_names = Vec::new();
        for (i, name) in actual.names().iter().enumerate() {
            if bindable(name) {
                kept_named.push(actual.named()[i].clone());
                kept_names.push(name.clone());
            } else {
                members.push(name.clone());
            }
        }
        if members.is_empty() {
            return Ok(Vec::new());
        }
        // all or nothing: one non-settable surplus name leaves the whole
        // list to bind normally and fail as UnassignableKeyword
        if !members.iter().all(|name| settable(name)) {
            return Ok(Vec::new());
        }

        *actual = ActualArguments::new(
            actual.positional().to_vec(),
            kept_named,
            kept_names,
            actual.hidden_count(),
            actual.collapsed_count(),
            actual.first_splatted_arg(),
            actual.splat_index(),
        )?;
        Ok(members)
    }

    fn make_binding_target(
        &self,
        actual: &ActualArguments,
        min_level: NarrowingLevel,
        max_level: NarrowingLevel,
        member_names: &[String],
    ) -> BindingTarget {
        let count = actual.count();
        let name_indices: Vec<usize> = (0..actual.names().len()).collect();

        let mut candidates: Vec<OverloadCandidate> = self
            .candidate_sets
            .get(&count)
            .map(|s| s.candidates().to_vec())
            .unwrap_or_default();
        // the unexpanded forms compete from the arity-keyed set; their
        // expanded forms compete here, at every arity they can stretch to
        for pc in &self.params_candidates {
            if let Some(expanded) = pc.make_params_extended(count, actual.names(), &name_indices) {
                candidates.push(expanded);
            }
        }
        if self.has_collapsed() {
            // a collapsed middle can only land in a params array
            candidates.retain(|c| {
                c.arg_builders()
                    .iter()
                    .any(|b| matches!(b, ArgBuilder::ParamsArray { .. }))
            });
        }

        if candidates.is_empty() {
            return BindingTarget::new(
                self.method_name.clone(),
                actual.visible_count(),
                BindingOutcome::IncorrectArgumentCount(self.get_expected_arg_counts()),
            );
        }

        let mut last_failures: Vec<CallFailure> = Vec::new();
        for level in min_level.range_to(max_level) {
            let mut applicable: Vec<(OverloadCandidate, ArgumentBinding)> = Vec::new();
            let mut failures: Vec<CallFailure> = Vec::new();

            for cand in &candidates {
                let binding = match actual.try_bind_named_arguments(cand) {
                    Ok(b) => b,
                    Err(f) => {
                        failures.push(f);
                        continue;
                    }
                };
                let target = if cand.has_unbound_vars() {
                    match infer_generic_candidate(cand, actual, &binding) {
                        Some(grounded) => grounded,
                        None => {
                            failures.push(CallFailure::new(
                                cand.signature(),
                                CallFailureReason::TypeInference,
                            ));
                            continue;
                        }
                    }
                } else {
                    cand.clone()
                };
                let applied = self
                    .is_applicable(&target, actual, &binding, level)
                    .and_then(|()| self.try_convert_collapsed(&target, level));
                match applied {
                    Ok(()) => applicable.push((target, binding)),
                    Err(f) => failures.push(f),
                }
            }

            trace!(
                "  level {:?}: {} applicable, {} rejected",
                level,
                applicable.len(),
                failures.len()
            );

            if !applicable.is_empty() {
                return match self.select_best(actual, &applicable) {
                    Some(best) => {
                        let restricted = self.get_restricted_args(actual, &applicable, best);
                        let (cand, binding) = &applicable[best];
                        let mut chosen = cand.route_named(binding);
                        if !member_names.is_empty() {
                            chosen = chosen.with_member_init(member_names.to_vec());
                        }
                        trace!("  chose {}", chosen.signature());
                        BindingTarget::new(
                            self.method_name.clone(),
                            actual.visible_count(),
                            BindingOutcome::Success {
                                candidate: chosen,
                                level,
                                restricted_args: restricted,
                            },
                        )
                    }
                    None => BindingTarget::new(
                        self.method_name.clone(),
                        actual.visible_count(),
                        BindingOutcome::AmbiguousMatch(
                            applicable.into_iter().map(|(c, _)| c).collect(),
                        ),
                    ),
                };
            }
            last_failures = failures;
        }

        let outcome = if last_failures.is_empty() {
            BindingOutcome::InvalidArguments
        } else {
            BindingOutcome::CallFailure(last_failures)
        };
        BindingTarget::new(self.method_name.clone(), actual.visible_count(), outcome)
    }

    fn has_collapsed(&self) -> bool {
        !self.collapsed_args.is_empty()
    }

    fn is_applicable(
        &self,
        candidate: &OverloadCandidate,
        actual: &ActualArguments,
        binding: &ArgumentBinding,
        level: NarrowingLevel,
    ) -> Result<(), CallFailure> {
        let mut conversions = Vec::with_capacity(actual.count());
        let mut failed = false;
        for i in 0..actual.count() {
            let Some(slot) = binding.argument_to_parameter(i) else {
                // absorbed by a params dictionary
                continue;
            };
            let wrapper = candidate.parameter(slot);
            let arg = actual.arg(i);
            let ok = self.can_convert(&arg.ty, wrapper, level);
            failed |= !ok;
            conversions.push(ConversionResult::new(
                arg.ty.clone(),
                wrapper.ty.clone(),
                !ok,
            ));
        }
        if failed {
            Err(CallFailure::new(
                candidate.signature(),
                CallFailureReason::ConversionFailure(conversions),
            ))
        } else {
            Ok(())
        }
    }

    /// Null gets its answer from the parameter alone; everything else is
    /// the binder's call.
    fn can_convert(&self, from: &Ty, wrapper: &ParameterWrapper, level: NarrowingLevel) -> bool {
        if *from == Ty::Null {
            return wrapper.ty.accepts_null() && !wrapper.prohibits_null();
        }
        self.binder.can_convert_from(from, &wrapper.ty, level)
    }

    fn try_convert_collapsed(
        &self,
        candidate: &OverloadCandidate,
        level: NarrowingLevel,
    ) -> Result<(), CallFailure> {
        if self.collapsed_args.is_empty() {
            return Ok(());
        }
        let elem = candidate.arg_builders().iter().find_map(|b| match b {
            ArgBuilder::ParamsArray { elem_ty, .. } => Some(elem_ty),
            _ => None,
        });
        let Some(elem) = elem else {
            return Err(CallFailure::new(
                candidate.signature(),
                CallFailureReason::ConversionFailure(Vec::new()),
            ));
        };

        let mut conversions = Vec::with_capacity(self.collapsed_args.len());
        let mut failed = false;
        for arg in &self.collapsed_args {
            let ok = if arg.ty == Ty::Null {
                elem.accepts_null()
            } else {
                self.binder.can_convert_from(&arg.ty, elem, level)
            };
            failed |= !ok;
            conversions.push(ConversionResult::new(arg.ty.clone(), elem.clone(), !ok));
        }
        if failed {
            Err(CallFailure::new(
                candidate.signature(),
                CallFailureReason::ConversionFailure(conversions),
            ))
        } else {
            Ok(())
        }
    }

    /// Index of the candidate preferred over every other applicable one,
    /// if a single such candidate exists.
    fn select_best(
        &self,
        actual: &ActualArguments,
        applicable: &[(OverloadCandidate, ArgumentBinding)],
    ) -> Option<usize> {
        (0..applicable.len()).find(|&i| {
            (0..applicable.len()).all(|j| {
                i == j || self.get_preferred(actual, &applicable[i], &applicable[j]) == Preference::First
            })
        })
    }

    fn get_preferred(
        &self,
        actual: &ActualArguments,
        one: &(OverloadCandidate, ArgumentBinding),
        two: &(OverloadCandidate, ArgumentBinding),
    ) -> Preference {
        match self.get_preferred_parameters(actual, one, two) {
            Preference::Equivalent => compare_equivalent(&one.0, &two.0, &self.method_name),
            other => other,
        }
    }

    fn get_preferred_parameters(
        &self,
        actual: &ActualArguments,
        one: &(OverloadCandidate, ArgumentBinding),
        two: &(OverloadCandidate, ArgumentBinding),
    ) -> Preference {
        let mut result = Preference::Equivalent;
        for i in 0..actual.count() {
            let (Some(s1), Some(s2)) = (
                one.1.argument_to_parameter(i),
                two.1.argument_to_parameter(i),
            ) else {
                continue;
            };
            let pref = self.get_preferred_parameter(
                &actual.arg(i).ty,
                one.0.parameter(s1),
                two.0.parameter(s2),
            );
            match (result, pref) {
                (_, Preference::Equivalent) => {}
                (Preference::Equivalent, p) => result = p,
                (r, p) if r == p => {}
                _ => return Preference::Ambiguous,
            }
        }
        result
    }

    fn get_preferred_parameter(
        &self,
        arg_ty: &Ty,
        p1: &ParameterWrapper,
        p2: &ParameterWrapper,
    ) -> Preference {
        if p1.ty == p2.ty {
            return Preference::Equivalent;
        }
        match self.binder.select_best_conversion_for(arg_ty, &p1.ty, &p2.ty) {
            Preference::Equivalent => {}
            decided => return decided,
        }
        // a parameter reachable without narrowing beats one that needs it
        let c1 = self.binder.can_convert_from(arg_ty, &p1.ty, NarrowingLevel::None);
        let c2 = self.binder.can_convert_from(arg_ty, &p2.ty, NarrowingLevel::None);
        if c1 && !c2 {
            return Preference::First;
        }
        if c2 && !c1 {
            return Preference::Second;
        }
        // the more specific parameter wins
        if p2.ty.is_assignable_from(&p1.ty) {
            return Preference::First;
        }
        if p1.ty.is_assignable_from(&p2.ty) {
            return Preference::Second;
        }
        match self.binder.prefer_convert(&p1.ty, &p2.ty) {
            decided @ (Preference::First | Preference::Second) => return decided,
            _ => {}
        }
        // the parameter the argument reaches at an earlier narrowing
        // level wins; a tie at the first shared level decides nothing
        for level in NarrowingLevel::None.range_to(NarrowingLevel::All) {
            let c1 = self.binder.can_convert_from(arg_ty, &p1.ty, level);
            let c2 = self.binder.can_convert_from(arg_ty, &p2.ty, level);
            if c1 != c2 {
                return if c1 { Preference::First } else { Preference::Second };
            }
            if c1 {
                break;
            }
        }
        Preference::Equivalent
    }

    /// Restriction types for the winning rule: an argument is pinned to
    /// its runtime type when the applicable candidates disagree about
    /// the parameter it feeds, or when the winner's parameter cannot
    /// hold the argument without conversion.
    fn get_restricted_args(
        &self,
        actual: &ActualArguments,
        applicable: &[(OverloadCandidate, ArgumentBinding)],
        best: usize,
    ) -> Vec<Option<Ty>> {
        let (winner, binding) = &applicable[best];
        (0..actual.count())
            .map(|i| {
                let arg_ty = &actual.arg(i).ty;
                let converted = binding
                    .argument_to_parameter(i)
                    .is_some_and(|slot| !winner.parameter(slot).ty.is_assignable_from(arg_ty));
                if converted || is_overloaded_on_parameter(i, applicable) {
                    Some(arg_ty.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    fn get_expected_arg_counts(&self) -> Vec<Arity> {
        let mut counts: Vec<Arity> = self
            .candidate_sets
            .keys()
            .map(|k| Arity::Exact(*k))
            .collect();
        if !self.params_candidates.is_empty() {
            counts.push(Arity::Unbounded);
        }
        counts
    }
}

/// Tie-breaks for candidates whose parameter types bind the call equally
/// well, applied in order: ordinary over private, concrete over generic,
/// fewer by-ref/out parameters, more direct argument builders, exact
/// method-name match.
fn compare_equivalent(
    one: &OverloadCandidate,
    two: &OverloadCandidate,
    method_name: &str,
) -> Preference {
    let (v1, v2) = (one.overload().is_private, two.overload().is_private);
    if v1 != v2 {
        return if v1 { Preference::Second } else { Preference::First };
    }

    let (g1, g2) = (one.overload().is_generic(), two.overload().is_generic());
    if g1 != g2 {
        return if g1 { Preference::Second } else { Preference::First };
    }

    let by_ref = |c: &OverloadCandidate| {
        c.arg_builders()
            .iter()
            .filter(|b| {
                matches!(
                    b,
                    ArgBuilder::Reference { .. } | ArgBuilder::ReturnReference { .. }
                )
            })
            .count()
    };
    let (r1, r2) = (by_ref(one), by_ref(two));
    if r1 != r2 {
        return if r1 < r2 {
            Preference::First
        } else {
            Preference::Second
        };
    }

    let stretch = |c: &OverloadCandidate| {
        c.arg_builders()
            .iter()
            .map(ArgBuilder::priority)
            .max()
            .unwrap_or(0)
    };
    let (s1, s2) = (stretch(one), stretch(two));
    if s1 != s2 {
        return if s1 < s2 {
            Preference::First
        } else {
            Preference::Second
        };
    }

    let (n1, n2) = (
        one.overload().name == method_name,
        two.overload().name == method_name,
    );
    if n1 != n2 {
        return if n1 { Preference::First } else { Preference::Second };
    }

    Preference::Equivalent
}

fn is_overloaded_on_parameter(
    arg_index: usize,
    applicable: &[(OverloadCandidate, ArgumentBinding)],
) -> bool {
    let mut seen: Option<&Ty> = None;
    for (cand, binding) in applicable {
        let Some(slot) = binding.argument_to_parameter(arg_index) else {
            continue;
        };
        if slot >= cand.parameter_count() {
            continue;
        }
        let ty = &cand.parameter(slot).ty;
        match seen {
            None => seen = Some(ty),
            Some(prev) if prev == ty => {}
            Some(_) => return true,
        }
    }
    false
}
