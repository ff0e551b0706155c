//! Type-variable inference for generic overloads.
//!
//! Given a candidate whose parameters still mention type variables and
//! the actual arguments bound to them, infer a concrete type for every
//! variable, check the declared constraints, and produce the grounded
//! candidate. Variables are processed in constraint-dependency order so
//! a constraint only ever mentions variables that are already bound.


use std::collections::HashMap;

use crate::arguments::{ActualArguments, Arg, ArgumentBinding};
use crate::candidate::OverloadCandidate;
use crate::types::Ty;

/// Infer a concrete instantiation of `candidate` from `args`.
///
/// `None` when any variable has no contributing argument, when two
/// contributions cannot be reconciled, when a constraint is violated, or
/// when the grounded candidate would still mention a variable.
pub fn infer_generic_candidate(
    candidate: &OverloadCandidate,
    args: &ActualArguments,
    binding: &ArgumentBinding,
) -> Option<OverloadCandidate> {
    let generic_params = &candidate.overload().generic_params;
    if generic_params.is_empty() {
        return None;
    }

    let inputs = collect_inputs(candidate, args, binding);
    let order = dependency_order(generic_params)?;

    let mut bindings: HashMap<String, Ty> = HashMap::new();
    for gp_index in order {
        let gp = &generic_params[gp_index];
        let contributions = inputs.get(gp.name.as_str())?;

        let mut best: Option<Ty> = None;
        for (formal, arg) in contributions {
            let formal = formal.substitute(&bindings);
            let inferred = infer_from(&formal, arg, &gp.name)?;
            best = Some(match best {
                None => inferred,
                Some(current) => join(current, inferred)?,
            });
        }
        let bound = best?;

        for constraint in &gp.constraints {
            let constraint = constraint.substitute(&bindings);
            if constraint.contains_vars() || !constraint.is_assignable_from(&bound) {
                return None;
            }
        }
        bindings.insert(gp.name.clone(), bound);
    }

    let grounded = candidate.substitute(&bindings)?;
    if grounded.has_unbound_vars() {
        return None;
    }
    Some(grounded)
}

/// The least common observation of two inferred types: whichever of the
/// two subsumes the other. Mutually unconvertible contributions cannot
/// be reconciled.
fn join(a: Ty, b: Ty) -> Option<Ty> {
    if a.is_assignable_from(&b) {
        Some(a)
    } else if b.is_assignable_from(&a) {
        Some(b)
    } else {
        None
    }
}

/// For each variable name, the (formal type, argument) pairs that can
/// contribute an inference for it.
fn collect_inputs<'a>(
    candidate: &'a OverloadCandidate,
    args: &'a ActualArguments,
    binding: &ArgumentBinding,
) -> HashMap<&'a str, Vec<(&'a Ty, &'a Arg)>> {
    let mut inputs: HashMap<&str, Vec<(&Ty, &Arg)>> = HashMap::new();
    for i in 0..args.count() {
        let Some(slot) = binding.argument_to_parameter(i) else {
            continue;
        };
        let Some(wrapper) = candidate.parameters().get(slot) else {
            continue;
        };
        let mut vars = Vec::new();
        wrapper.ty.collect_vars(&mut vars);
        for var in vars {
            let entry = inputs.entry(pin_name(candidate, var)).or_default();
            entry.push((&wrapper.ty, args.arg(i)));
        }
    }
    inputs
}

// Borrow the variable name from the descriptor so the map can outlive
// the temporary returned by collect_vars.
fn pin_name<'a>(candidate: &'a OverloadCandidate, var: String) -> &'a str {
    candidate
        .overload()
        .generic_params
        .iter()
        .map(|gp| gp.name.as_str())
        .find(|n| *n == var)
        .unwrap_or("")
}

/// Indices of the generic parameters in an order where every parameter
/// comes after the parameters its constraints mention. `None` on a
/// constraint cycle.
fn dependency_order(generic_params: &[crate::overload::GenericParam]) -> Option<Vec<usize>> {
    let names: Vec<&str> = generic_params.iter().map(|gp| gp.name.as_str()).collect();
    let deps: Vec<Vec<usize>> = generic_params
        .iter()
        .map(|gp| {
            let mut d = Vec::new();
            let mut vars = Vec::new();
            for c in &gp.constraints {
                c.collect_vars(&mut vars);
            }
            for var in vars {
                if let Some(j) = names.iter().position(|n| *n == var) {
                    if !d.contains(&j) {
                        d.push(j);
                    }
                }
            }
            d
        })
        .collect();

    let mut order = Vec::with_capacity(generic_params.len());
    let mut placed = vec![false; generic_params.len()];
    while order.len() < generic_params.len() {
        let next = (0..generic_params.len()).find(|&i| {
            !placed[i] && deps[i].iter().all(|&j| placed[j])
        })?;
        placed[next] = true;
        order.push(next);
    }
    Some(order)
}

/// Walk `formal` against the argument's type to find what stands in the
/// position of the variable `var`.
fn infer_from(formal: &Ty, arg: &Arg, var: &str) -> Option<Ty> {
    if let Ty::Delegate { .. } = formal {
        // invokable arguments report their own view of the variable
        let hook = arg.inference_hook?;
        return hook(formal, var);
    }
    infer_structural(formal, &arg.ty, var)
}

fn infer_structural(formal: &Ty, actual: &Ty, var: &str) -> Option<Ty> {
    match formal {
        Ty::Var(name) if name == var => Some(actual.clone()),
        Ty::Var(_) => None,
        Ty::Array(elem) => match actual {
            Ty::Array(actual_elem) => infer_structural(elem, actual_elem, var),
            _ => None,
        },
        Ty::ByRef(inner) => match actual {
            Ty::ByRef(actual_inner) => infer_structural(inner, actual_inner, var),
            other => infer_structural(inner, other, var),
        },
        Ty::Nullable(inner) => match actual {
            Ty::Nullable(actual_inner) => infer_structural(inner, actual_inner, var),
            other => infer_structural(inner, other, var),
        },
        Ty::Generic { name, args } => {
            let actual_args = find_instantiation(actual, name, false, args.len())?;
            infer_pairwise(args, &actual_args, var)
        }
        Ty::Interface { name, args } => {
            let actual_args = find_instantiation(actual, name, true, args.len())?;
            infer_pairwise(args, &actual_args, var)
        }
        _ => None,
    }
}

fn infer_pairwise(formals: &[Ty], actuals: &[Ty], var: &str) -> Option<Ty> {
    let mut best: Option<Ty> = None;
    for (f, a) in formals.iter().zip(actuals) {
        let mut vars = Vec::new();
        f.collect_vars(&mut vars);
        if !vars.iter().any(|v| v == var) {
            continue;
        }
        let inferred = infer_structural(f, a, var)?;
        best = Some(match best {
            None => inferred,
            Some(current) => join(current, inferred)?,
        });
    }
    best
}

/// Find how `actual` instantiates the named generic type or interface,
/// searching the type itself, its interfaces, and its base chain. A type
/// can carry the target through more than one path; every occurrence
/// must reconcile under `join`, argument by argument.
fn find_instantiation(actual: &Ty, name: &str, want_interface: bool, arity: usize) -> Option<Vec<Ty>> {
    let mut found: Vec<Vec<Ty>> = Vec::new();
    collect_instantiations(actual, name, want_interface, arity, &mut found);

    let mut merged: Option<Vec<Ty>> = None;
    for inst in found {
        merged = Some(match merged {
            None => inst,
            Some(current) => current
                .into_iter()
                .zip(inst)
                .map(|(a, b)| join(a, b))
                .collect::<Option<Vec<Ty>>>()?,
        });
    }
    merged
}

fn collect_instantiations(
    actual: &Ty,
    name: &str,
    want_interface: bool,
    arity: usize,
    found: &mut Vec<Vec<Ty>>,
) {
    match actual {
        Ty::Generic {
            name: n,
            args,
        } if !want_interface && n == name && args.len() == arity => {
            found.push(args.clone());
        }
        Ty::Interface {
            name: n,
            args,
        } if want_interface && n == name && args.len() == arity => {
            found.push(args.clone());
        }
        _ => {}
    }
    if want_interface {
        for iface in actual.interfaces() {
            collect_instantiations(iface, name, want_interface, arity, found);
        }
    }
    if let Some(base) = actual.base_type() {
        collect_instantiations(base, name, want_interface, arity, found);
    }
}
