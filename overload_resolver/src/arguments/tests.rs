use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::candidate::OverloadCandidate;
use crate::error::ResolverError;
use crate::overload::{OverloadDescriptor, Param};
use crate::result::CallFailureReason;
use crate::types::Ty;

use super::{ActualArguments, Arg, ArgumentBinding};

fn candidate(params: Vec<Param>) -> OverloadCandidate {
    let desc = OverloadDescriptor::function("f", params, Ty::Object);
    OverloadCandidate::simple(Arc::new(desc))
}

#[test]
fn counts_include_collapsed_and_exclude_hidden() {
    let args = ActualArguments::new(
        vec![Arg::new(Ty::Int64), Arg::new(Ty::Str)],
        vec![],
        vec![],
        1,
        3,
        Some(1),
        Some(1),
    )
    .unwrap();
    assert_eq!(args.count(), 2);
    assert_eq!(args.visible_count(), 4);
    assert_eq!(args.to_splatted_item_index(2), 2);
}

#[test]
fn named_list_and_names_must_agree() {
    let err = ActualArguments::new(
        vec![],
        vec![Arg::new(Ty::Int64)],
        vec![],
        0,
        0,
        None,
        None,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ResolverError::NamedArgumentMismatch { named: 1, names: 0 }
    ));
}

#[test]
fn collapsed_args_require_a_splat_index() {
    let err = ActualArguments::new(vec![], vec![], vec![], 0, 2, None, None).unwrap_err();
    assert!(matches!(err, ResolverError::InconsistentSplat { .. }));

    let err = ActualArguments::new(vec![], vec![], vec![], 0, 0, None, Some(0)).unwrap_err();
    assert!(matches!(err, ResolverError::InconsistentSplat { .. }));
}

#[test]
fn arg_spans_positional_then_named() {
    let args = ActualArguments::new(
        vec![Arg::new(Ty::Int64)],
        vec![Arg::new(Ty::Str)],
        vec!["s".to_string()],
        0,
        0,
        None,
        None,
    )
    .unwrap();
    assert_eq!(args.arg(0).ty, Ty::Int64);
    assert_eq!(args.arg(1).ty, Ty::Str);
}

#[test]
fn positional_binding_is_identity() {
    let b = ArgumentBinding::positional(3);
    assert_eq!(b.argument_to_parameter(0), Some(0));
    assert_eq!(b.argument_to_parameter(2), Some(2));
}

#[test]
fn binds_names_to_their_parameter_slots() {
    let cand = candidate(vec![
        Param::positional("a", Ty::Int64),
        Param::positional("b", Ty::Str),
        Param::positional("c", Ty::Bool),
    ]);
    let args = ActualArguments::new(
        vec![Arg::new(Ty::Int64)],
        vec![Arg::new(Ty::Bool), Arg::new(Ty::Str)],
        vec!["c".to_string(), "b".to_string()],
        0,
        0,
        None,
        None,
    )
    .unwrap();
    let binding = args.try_bind_named_arguments(&cand).unwrap();
    // arg 1 is `c`, arg 2 is `b`
    assert_eq!(binding.named_count(), 2);
    assert_eq!(binding.argument_to_parameter(1), Some(2));
    assert_eq!(binding.argument_to_parameter(2), Some(1));
}

#[test]
fn unknown_name_reports_unassignable_keyword() {
    let cand = candidate(vec![Param::positional("a", Ty::Int64)]);
    let args = ActualArguments::new(
        vec![],
        vec![Arg::new(Ty::Int64)],
        vec!["nope".to_string()],
        0,
        0,
        None,
        None,
    )
    .unwrap();
    let failure = args.try_bind_named_arguments(&cand).unwrap_err();
    assert_eq!(
        failure.reason,
        CallFailureReason::UnassignableKeyword(vec!["nope".to_string()])
    );
}

#[test]
fn name_shadowing_a_positional_is_a_duplicate() {
    let cand = candidate(vec![
        Param::positional("a", Ty::Int64),
        Param::positional("b", Ty::Str),
    ]);
    let args = ActualArguments::new(
        vec![Arg::new(Ty::Int64)],
        vec![Arg::new(Ty::Int64)],
        vec!["a".to_string()],
        0,
        0,
        None,
        None,
    )
    .unwrap();
    let failure = args.try_bind_named_arguments(&cand).unwrap_err();
    assert_eq!(
        failure.reason,
        CallFailureReason::DuplicateKeyword(vec!["a".to_string()])
    );
}

#[test]
fn unbound_names_win_over_duplicates() {
    let cand = candidate(vec![
        Param::positional("a", Ty::Int64),
        Param::positional("b", Ty::Str),
    ]);
    let args = ActualArguments::new(
        vec![Arg::new(Ty::Int64)],
        vec![Arg::new(Ty::Int64), Arg::new(Ty::Int64)],
        vec!["a".to_string(), "zzz".to_string()],
        0,
        0,
        None,
        None,
    )
    .unwrap();
    let failure = args.try_bind_named_arguments(&cand).unwrap_err();
    assert_eq!(
        failure.reason,
        CallFailureReason::UnassignableKeyword(vec!["zzz".to_string()])
    );
}

#[test]
fn repeated_keyword_is_a_duplicate() {
    let cand = candidate(vec![
        Param::positional("a", Ty::Int64),
        Param::positional("b", Ty::Str),
    ]);
    let args = ActualArguments::new(
        vec![],
        vec![Arg::new(Ty::Str), Arg::new(Ty::Str)],
        vec!["b".to_string(), "b".to_string()],
        0,
        0,
        None,
        None,
    )
    .unwrap();
    let failure = args.try_bind_named_arguments(&cand).unwrap_err();
    assert_eq!(
        failure.reason,
        CallFailureReason::DuplicateKeyword(vec!["b".to_string()])
    );
}
