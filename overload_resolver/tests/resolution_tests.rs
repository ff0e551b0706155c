//! End-to-end resolution tests: candidate selection, narrowing
//! escalation, variadic expansion, named arguments, and failure
//! classification.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use overload_resolver::{
    Arg, ArgBuilder, ArgKind, BindingOutcome, BindingTarget, CallFailureReason, CallSignature,
    DefaultBinder, DefaultValue, GenericParam, NarrowingLevel, OverloadDescriptor,
    OverloadResolver, Param, ReturnBuilder, Ty,
};

fn function(params: Vec<Param>, ret: Ty) -> Arc<OverloadDescriptor> {
    Arc::new(OverloadDescriptor::function("f", params, ret))
}

fn resolve_sig(
    overloads: &[Arc<OverloadDescriptor>],
    signature: CallSignature,
    values: Vec<Arg>,
    min: NarrowingLevel,
) -> BindingTarget {
    let binder = DefaultBinder;
    let mut resolver = OverloadResolver::new(&binder, "f", signature);
    resolver
        .resolve_overload(overloads, &values, min, NarrowingLevel::All)
        .unwrap()
}

fn resolve(overloads: &[Arc<OverloadDescriptor>], values: Vec<Arg>) -> BindingTarget {
    let sig = CallSignature::positional(values.len());
    resolve_sig(overloads, sig, values, NarrowingLevel::None)
}

// ==== Basic selection ====

#[test]
fn arity_picks_among_fixed_overloads() {
    // f(int) and f(int, int); f(1) binds the unary overload
    let overloads = [
        function(vec![Param::positional("a", Ty::Int64)], Ty::Bool),
        function(
            vec![
                Param::positional("a", Ty::Int64),
                Param::positional("b", Ty::Int64),
            ],
            Ty::Str,
        ),
    ];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int64)]);
    assert!(target.is_success());
    assert_eq!(target.return_type(), Some(Ty::Bool));
    assert_eq!(target.narrowing_level(), Some(NarrowingLevel::None));
    assert_eq!(target.chosen_candidate().unwrap().parameter_count(), 1);
}

#[test]
fn exact_match_wins_before_widening_is_considered() {
    let overloads = [
        function(vec![Param::positional("a", Ty::Int32)], Ty::Int32),
        function(vec![Param::positional("a", Ty::Int64)], Ty::Int64),
    ];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int32)]);
    assert_eq!(target.return_type(), Some(Ty::Int32));
    assert_eq!(target.narrowing_level(), Some(NarrowingLevel::None));
}

#[test]
fn widening_binds_at_a_later_level() {
    let overloads = [function(vec![Param::positional("a", Ty::Int64)], Ty::Object)];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int32)]);
    assert!(target.is_success());
    assert_eq!(target.narrowing_level(), Some(NarrowingLevel::One));
}

#[test]
fn integer_arguments_stay_in_the_integer_family() {
    let overloads = [
        function(vec![Param::positional("a", Ty::Int64)], Ty::Int64),
        function(vec![Param::positional("a", Ty::Float64)], Ty::Float64),
    ];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int32)]);
    assert_eq!(target.return_type(), Some(Ty::Int64));
}

#[test]
fn the_more_specific_parameter_wins() {
    let overloads = [
        function(vec![Param::positional("a", Ty::Object)], Ty::Object),
        function(vec![Param::positional("a", Ty::Str)], Ty::Str),
    ];
    let target = resolve(&overloads, vec![Arg::new(Ty::Str)]);
    assert_eq!(target.return_type(), Some(Ty::Str));
    // both candidates were applicable, so the argument is pinned
    assert_eq!(
        target.restricted_args(),
        Some(&[Some(Ty::Str)][..])
    );
}

#[test]
fn equally_convertible_overloads_are_ambiguous() {
    // Int16 widens to both parameter types and neither is preferred
    let overloads = [
        function(vec![Param::positional("a", Ty::Int32)], Ty::Int32),
        function(vec![Param::positional("a", Ty::Int64)], Ty::Int64),
    ];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int16)]);
    let ambiguous = target.ambiguous_candidates().unwrap();
    assert_eq!(ambiguous.len(), 2);
}

#[test]
fn earlier_reachability_decides_between_narrowed_overloads() {
    // from Int32, Float64 is one widening step away while Float32 needs
    // a lossy conversion; starting the search past both levels keeps
    // that ordering visible
    let overloads = [
        function(vec![Param::positional("a", Ty::Float64)], Ty::Float64),
        function(vec![Param::positional("a", Ty::Float32)], Ty::Float32),
    ];
    let target = resolve_sig(
        &overloads,
        CallSignature::positional(1),
        vec![Arg::new(Ty::Int32)],
        NarrowingLevel::Three,
    );
    assert_eq!(target.return_type(), Some(Ty::Float64));
    assert_eq!(target.narrowing_level(), Some(NarrowingLevel::Three));
}

#[test]
fn converted_arguments_are_pinned_to_their_runtime_type() {
    // a sole applicable candidate still restricts arguments it converts
    let overloads = [function(
        vec![Param::positional("a", Ty::Float64)],
        Ty::Float64,
    )];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int32)]);
    assert!(target.is_success());
    assert_eq!(target.restricted_args(), Some(&[Some(Ty::Int32)][..]));
}

// ==== Defaults ====

#[test]
fn omitted_defaults_are_filled_from_the_declaration() {
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Int64),
            Param::with_default("b", Ty::Int64, DefaultValue::Int(2)),
        ],
        Ty::Int64,
    )];
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![ArgKind::Named("a".to_string())]),
        vec![Arg::new(Ty::Int64)],
        NarrowingLevel::None,
    );
    assert!(target.is_success());
    let chosen = target.chosen_candidate().unwrap();
    assert!(chosen.arg_builders().iter().any(|b| matches!(
        b,
        ArgBuilder::Default {
            param_index: 1,
            value: DefaultValue::Int(2),
            ..
        }
    )));
}

#[test]
fn supplying_every_argument_beats_filling_defaults() {
    let overloads = [
        function(
            vec![
                Param::positional("a", Ty::Int64),
                Param::with_default("b", Ty::Int64, DefaultValue::Int(2)),
            ],
            Ty::Str,
        ),
        function(vec![Param::positional("a", Ty::Int64)], Ty::Bool),
    ];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int64)]);
    assert_eq!(target.return_type(), Some(Ty::Bool));
}

// ==== Params arrays ====

#[test]
fn params_array_absorbs_trailing_arguments() {
    let overloads = [function(
        vec![Param::params_array("xs", Ty::array(Ty::Int64))],
        Ty::Int64,
    )];
    let target = resolve(
        &overloads,
        vec![
            Arg::new(Ty::Int64),
            Arg::new(Ty::Int64),
            Arg::new(Ty::Int64),
        ],
    );
    assert!(target.is_success());
    let chosen = target.chosen_candidate().unwrap();
    assert_eq!(chosen.parameter_count(), 3);
    assert!(chosen.arg_builders().iter().any(|b| matches!(
        b,
        ArgBuilder::ParamsArray {
            expanded_count: 3,
            ..
        }
    )));
}

#[test]
fn params_array_accepts_an_empty_call() {
    let overloads = [function(
        vec![Param::params_array("xs", Ty::array(Ty::Int64))],
        Ty::Int64,
    )];
    let target = resolve(&overloads, vec![]);
    assert!(target.is_success());
    assert_eq!(target.chosen_candidate().unwrap().parameter_count(), 0);
}

#[test]
fn passing_the_array_directly_beats_expansion() {
    let overloads = [function(
        vec![Param::params_array("xs", Ty::array(Ty::Int64))],
        Ty::Int64,
    )];
    let target = resolve(&overloads, vec![Arg::new(Ty::array(Ty::Int64))]);
    assert!(target.is_success());
    // the unexpanded form keeps the array parameter
    assert_eq!(
        target.chosen_candidate().unwrap().parameter(0).ty,
        Ty::array(Ty::Int64)
    );
}

#[test]
fn fixed_arity_overload_beats_params_expansion() {
    let overloads = [
        function(vec![Param::params_array("xs", Ty::array(Ty::Int64))], Ty::Str),
        function(vec![Param::positional("a", Ty::Int64)], Ty::Bool),
    ];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int64)]);
    assert_eq!(target.return_type(), Some(Ty::Bool));
}

// ==== Splatted calls ====

#[test]
fn a_small_splatted_list_expands_fully() {
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Str),
            Param::params_array("rest", Ty::array(Ty::Int64)),
        ],
        Ty::Object,
    )];
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![ArgKind::Simple, ArgKind::ListSplat]),
        vec![
            Arg::new(Ty::Str),
            Arg::list(Ty::Int64, vec![Arg::new(Ty::Int64), Arg::new(Ty::Int64)]),
        ],
        NarrowingLevel::None,
    );
    assert!(target.is_success());
    assert_eq!(target.actual_arg_count, 3);
}

#[test]
fn a_long_splatted_list_keeps_a_collapsed_middle() {
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Str),
            Param::params_array("rest", Ty::array(Ty::Int64)),
        ],
        Ty::Object,
    )];
    let items: Vec<Arg> = (0..8).map(|_| Arg::new(Ty::Int64)).collect();
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![ArgKind::Simple, ArgKind::ListSplat]),
        vec![Arg::new(Ty::Str), Arg::list(Ty::Int64, items)],
        NarrowingLevel::None,
    );
    assert!(target.is_success());
    // all eight splatted items are visible even though some never
    // materialized as individual arguments
    assert_eq!(target.actual_arg_count, 9);
}

#[test]
fn collapsed_items_must_convert_to_the_element_type() {
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Str),
            Param::params_array("rest", Ty::array(Ty::Int64)),
        ],
        Ty::Object,
    )];
    let mut items: Vec<Arg> = (0..8).map(|_| Arg::new(Ty::Int64)).collect();
    items[4] = Arg::new(Ty::Str);
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![ArgKind::Simple, ArgKind::ListSplat]),
        vec![Arg::new(Ty::Str), Arg::list(Ty::Int64, items)],
        NarrowingLevel::None,
    );
    assert!(!target.is_success());
    assert!(matches!(
        target.outcome,
        BindingOutcome::CallFailure(_)
    ));
}

// ==== Named arguments ====

#[test]
fn keyword_arguments_reach_their_parameters_out_of_order() {
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Int64),
            Param::positional("b", Ty::Str),
            Param::positional("c", Ty::Bool),
        ],
        Ty::Object,
    )];
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![
            ArgKind::Simple,
            ArgKind::Named("c".to_string()),
            ArgKind::Named("b".to_string()),
        ]),
        vec![Arg::new(Ty::Int64), Arg::new(Ty::Bool), Arg::new(Ty::Str)],
        NarrowingLevel::None,
    );
    assert!(target.is_success());
    let chosen = target.chosen_candidate().unwrap();
    let keyword_count = chosen
        .arg_builders()
        .iter()
        .filter(|b| matches!(b, ArgBuilder::Keyword { .. }))
        .count();
    assert_eq!(keyword_count, 2);
}

#[test]
fn an_unknown_keyword_is_an_unassignable_failure() {
    // f(z: 1, a: 2) where no parameter is called z
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Int64),
            Param::positional("b", Ty::Int64),
        ],
        Ty::Object,
    )];
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![
            ArgKind::Named("z".to_string()),
            ArgKind::Named("a".to_string()),
        ]),
        vec![Arg::new(Ty::Int64), Arg::new(Ty::Int64)],
        NarrowingLevel::None,
    );
    let failures = target.call_failures().unwrap();
    assert_eq!(
        failures[0].reason,
        CallFailureReason::UnassignableKeyword(vec!["z".to_string()])
    );
}

#[test]
fn a_keyword_repeating_a_positional_is_a_duplicate() {
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Int64),
            Param::positional("b", Ty::Int64),
        ],
        Ty::Object,
    )];
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![ArgKind::Simple, ArgKind::Named("a".to_string())]),
        vec![Arg::new(Ty::Int64), Arg::new(Ty::Int64)],
        NarrowingLevel::None,
    );
    let failures = target.call_failures().unwrap();
    assert_eq!(
        failures[0].reason,
        CallFailureReason::DuplicateKeyword(vec!["a".to_string()])
    );
}

#[test]
fn a_dict_splat_provides_named_arguments() {
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Int64),
            Param::positional("b", Ty::Str),
        ],
        Ty::Object,
    )];
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![ArgKind::Simple, ArgKind::DictSplat]),
        vec![
            Arg::new(Ty::Int64),
            Arg::dict(vec![("b".to_string(), Arg::new(Ty::Str))]),
        ],
        NarrowingLevel::None,
    );
    assert!(target.is_success());
}

#[test]
fn a_params_dict_absorbs_surplus_names() {
    let overloads = [function(
        vec![Param::positional("a", Ty::Int64), Param::params_dict("kw")],
        Ty::Object,
    )];
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![
            ArgKind::Simple,
            ArgKind::Named("x".to_string()),
            ArgKind::Named("y".to_string()),
        ]),
        vec![Arg::new(Ty::Int64), Arg::new(Ty::Str), Arg::new(Ty::Bool)],
        NarrowingLevel::None,
    );
    assert!(target.is_success());
    let chosen = target.chosen_candidate().unwrap();
    assert_eq!(
        chosen.params_dict_names(),
        Some(&["x".to_string(), "y".to_string()][..])
    );
}

// ==== Constructors and member initialization ====

#[test]
fn constructor_surplus_names_become_member_initializers() {
    let widget = Ty::class("Widget");
    let overloads = [Arc::new(OverloadDescriptor::constructor(
        widget.clone(),
        vec![Param::positional("size", Ty::Int64)],
    ))];
    let binder = DefaultBinder;
    let mut resolver = OverloadResolver::new(
        &binder,
        "Widget",
        CallSignature::new(vec![ArgKind::Simple, ArgKind::Named("color".to_string())]),
    );
    let target = resolver
        .resolve_overload(
            &overloads,
            &[Arg::new(Ty::Int64), Arg::new(Ty::Str)],
            NarrowingLevel::None,
            NarrowingLevel::All,
        )
        .unwrap();
    assert!(target.is_success());
    let chosen = target.chosen_candidate().unwrap();
    assert_eq!(
        chosen.return_builder(),
        &ReturnBuilder::MemberInit {
            ty: widget,
            members: vec!["color".to_string()],
        }
    );
}

// ==== Instance methods and by-ref ====

#[test]
fn instance_methods_bind_their_receiver_first() {
    let widget = Ty::class("Widget");
    let overloads = [Arc::new(OverloadDescriptor::method(
        "m",
        widget.clone(),
        vec![Param::positional("x", Ty::Int64)],
        Ty::Bool,
    ))];
    let binder = DefaultBinder;
    let mut resolver = OverloadResolver::new(&binder, "m", CallSignature::positional(2));
    let target = resolver
        .resolve_overload(
            &overloads,
            &[Arg::new(widget), Arg::new(Ty::Int64)],
            NarrowingLevel::None,
            NarrowingLevel::All,
        )
        .unwrap();
    assert!(target.is_success());
    let chosen = target.chosen_candidate().unwrap();
    assert_eq!(chosen.instance_builder().arg_index, Some(0));
}

#[test]
fn reduced_by_ref_parameters_surface_in_the_return() {
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Int64),
            Param::by_ref("cell", Ty::Str),
        ],
        Ty::Bool,
    )];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int64), Arg::new(Ty::Str)]);
    assert!(target.is_success());
    assert_eq!(
        target.chosen_candidate().unwrap().return_builder(),
        &ReturnBuilder::ByRefReduced {
            ty: Ty::Bool,
            extra: vec![1],
        }
    );
}

#[test]
fn a_caller_supplied_cell_binds_the_unreduced_shape() {
    let overloads = [function(vec![Param::by_ref("cell", Ty::Str)], Ty::Bool)];
    let target = resolve(&overloads, vec![Arg::new(Ty::by_ref(Ty::Str))]);
    assert!(target.is_success());
    let chosen = target.chosen_candidate().unwrap();
    assert_eq!(chosen.parameter(0).ty, Ty::by_ref(Ty::Str));
    assert_eq!(
        chosen.return_builder(),
        &ReturnBuilder::Plain { ty: Ty::Bool }
    );
}

#[test]
fn out_parameters_are_not_supplied_by_the_caller() {
    let overloads = [function(
        vec![Param::positional("a", Ty::Int64), Param::out("r", Ty::Str)],
        Ty::Bool,
    )];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int64)]);
    assert!(target.is_success());
    assert_eq!(target.chosen_candidate().unwrap().parameter_count(), 1);
}

// ==== Generic inference ====

#[test]
fn generic_overloads_bind_through_inference() {
    let overloads = [Arc::new(OverloadDescriptor::generic_function(
        "f",
        vec![GenericParam::new("T")],
        vec![Param::positional("x", Ty::var("T"))],
        Ty::var("T"),
    ))];
    let target = resolve(&overloads, vec![Arg::new(Ty::Str)]);
    assert!(target.is_success());
    assert_eq!(target.return_type(), Some(Ty::Str));
}

#[test]
fn conflicting_inferences_fail_rather_than_widen() {
    // f<T>(T, T) with (int, string) has no consistent T
    let overloads = [Arc::new(OverloadDescriptor::generic_function(
        "f",
        vec![GenericParam::new("T")],
        vec![
            Param::positional("x", Ty::var("T")),
            Param::positional("y", Ty::var("T")),
        ],
        Ty::var("T"),
    ))];
    let target = resolve(&overloads, vec![Arg::new(Ty::Int64), Arg::new(Ty::Str)]);
    assert!(!target.is_success());
    let failures = target.call_failures().unwrap();
    assert_eq!(failures[0].reason, CallFailureReason::TypeInference);
}

#[test]
fn concrete_overloads_beat_generic_ones() {
    let overloads = [
        Arc::new(OverloadDescriptor::generic_function(
            "f",
            vec![GenericParam::new("T")],
            vec![Param::positional("x", Ty::var("T"))],
            Ty::Object,
        )),
        function(vec![Param::positional("x", Ty::Str)], Ty::Str),
    ];
    let target = resolve(&overloads, vec![Arg::new(Ty::Str)]);
    assert_eq!(target.return_type(), Some(Ty::Str));
}

// ==== Null arguments ====

#[test]
fn null_binds_to_reference_parameters_only() {
    let overloads = [
        function(vec![Param::positional("a", Ty::Int64)], Ty::Int64),
        function(vec![Param::positional("a", Ty::Str)], Ty::Str),
    ];
    let target = resolve(&overloads, vec![Arg::null()]);
    assert_eq!(target.return_type(), Some(Ty::Str));
}

#[test]
fn prohibit_null_rejects_a_null_argument() {
    let mut p = Param::positional("a", Ty::Str);
    p.prohibit_null = true;
    let overloads = [function(vec![p], Ty::Str)];
    let target = resolve(&overloads, vec![Arg::null()]);
    assert!(!target.is_success());
}

// ==== Properties ====

#[test]
fn resolution_is_deterministic() {
    let overloads = [
        function(vec![Param::positional("a", Ty::Object)], Ty::Object),
        function(vec![Param::positional("a", Ty::Str)], Ty::Str),
    ];
    let first = resolve(&overloads, vec![Arg::new(Ty::Str)]);
    let second = resolve(&overloads, vec![Arg::new(Ty::Str)]);
    assert_eq!(first, second);
}

#[test]
fn success_at_one_level_survives_a_stricter_minimum() {
    let overloads = [function(vec![Param::positional("a", Ty::Int64)], Ty::Object)];
    let at_one = resolve_sig(
        &overloads,
        CallSignature::positional(1),
        vec![Arg::new(Ty::Int32)],
        NarrowingLevel::None,
    );
    assert_eq!(at_one.narrowing_level(), Some(NarrowingLevel::One));
    let at_two = resolve_sig(
        &overloads,
        CallSignature::positional(1),
        vec![Arg::new(Ty::Int32)],
        NarrowingLevel::Two,
    );
    assert!(at_two.is_success());
}

#[test]
fn no_two_arguments_share_a_parameter_slot() {
    let overloads = [function(
        vec![
            Param::positional("a", Ty::Int64),
            Param::positional("b", Ty::Int64),
            Param::positional("c", Ty::Int64),
        ],
        Ty::Object,
    )];
    let target = resolve_sig(
        &overloads,
        CallSignature::new(vec![
            ArgKind::Simple,
            ArgKind::Named("c".to_string()),
            ArgKind::Named("b".to_string()),
        ]),
        vec![
            Arg::new(Ty::Int64),
            Arg::new(Ty::Int64),
            Arg::new(Ty::Int64),
        ],
        NarrowingLevel::None,
    );
    assert!(target.is_success());
    // every consuming builder reads a distinct argument index
    let mut consumed: Vec<usize> = target
        .chosen_candidate()
        .unwrap()
        .arg_builders()
        .iter()
        .filter_map(|b| match b {
            ArgBuilder::Simple { arg_index, .. } => Some(*arg_index),
            ArgBuilder::Keyword { inner, .. } => match **inner {
                ArgBuilder::Simple { arg_index, .. } => Some(arg_index),
                _ => None,
            },
            _ => None,
        })
        .collect();
    consumed.sort_unstable();
    consumed.dedup();
    assert_eq!(consumed, vec![0, 1, 2]);
}
