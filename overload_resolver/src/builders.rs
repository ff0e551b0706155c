//! Argument builders: the per-parameter recipe a bound candidate uses to
//! assemble its physical argument list.
//!
//! Each builder records which actual arguments it consumes and what the
//! callee expects in that position. Builders are plain data; the closed
//! enum keeps the whole family visible in one place and lets candidates
//! be compared and substituted without dynamic dispatch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::overload::DefaultValue;
use crate::types::Ty;

/// One step of the physical argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgBuilder {
    /// Pass actual argument `arg_index` through as parameter `param_index`.
    Simple {
        param_index: usize,
        arg_index: usize,
        ty: Ty,
        is_params_array: bool,
        is_params_dict: bool,
    },
    /// Pass actual argument `arg_index` by reference; the callee sees a
    /// writable cell of `elem_ty`.
    Reference {
        param_index: usize,
        arg_index: usize,
        elem_ty: Ty,
    },
    /// A named actual argument routed to its slot out of positional
    /// order; `kw_index` is the index within the call's named list.
    Keyword {
        kw_index: usize,
        inner: Box<ArgBuilder>,
    },
    /// Fill an omitted optional parameter with its declared default.
    Default {
        param_index: usize,
        value: DefaultValue,
        ty: Ty,
    },
    /// An `out` parameter reduced away from the visible signature; no
    /// actual argument is consumed and the produced value joins the
    /// return value.
    ReturnReference { param_index: usize, ty: Ty },
    /// Collect `expanded_count` trailing actual arguments starting at
    /// `first_arg` into a fresh array of `elem_ty`.
    ParamsArray {
        param_index: usize,
        elem_ty: Ty,
        first_arg: usize,
        expanded_count: usize,
    },
    /// Collect the call's surplus named arguments into a dictionary.
    /// `names` are the keys, `name_indices` their indices within the
    /// call's named list.
    ParamsDict {
        param_index: usize,
        names: Vec<String>,
        name_indices: Vec<usize>,
    },
}

impl ArgBuilder {
    /// Tie-break weight when two candidates bind the same arguments
    /// equally well; lower is preferred. Keyword routing inherits the
    /// weight of the builder it wraps.
    pub fn priority(&self) -> u8 {
        match self {
            ArgBuilder::Simple { .. } => 0,
            ArgBuilder::Reference { .. } => 1,
            ArgBuilder::Default { .. } | ArgBuilder::ReturnReference { .. } => 2,
            ArgBuilder::ParamsArray { .. } => 4,
            ArgBuilder::ParamsDict { .. } => 5,
            ArgBuilder::Keyword { inner, .. } => inner.priority(),
        }
    }

    /// How many actual arguments this builder consumes.
    pub fn consumed_argument_count(&self) -> usize {
        match self {
            ArgBuilder::Simple { .. } | ArgBuilder::Reference { .. } => 1,
            ArgBuilder::Default { .. } | ArgBuilder::ReturnReference { .. } => 0,
            ArgBuilder::ParamsArray { expanded_count, .. } => *expanded_count,
            ArgBuilder::ParamsDict { names, .. } => names.len(),
            ArgBuilder::Keyword { inner, .. } => inner.consumed_argument_count(),
        }
    }

    /// Rewrite type variables per `map`. Returns `None` when the builder
    /// cannot be grounded, which makes the owning candidate drop out of
    /// inference.
    pub fn substitute(&self, map: &HashMap<String, Ty>) -> Option<ArgBuilder> {
        match self {
            ArgBuilder::Simple {
                param_index,
                arg_index,
                ty,
                is_params_array,
                is_params_dict,
            } => Some(ArgBuilder::Simple {
                param_index: *param_index,
                arg_index: *arg_index,
                ty: ty.substitute(map),
                is_params_array: *is_params_array,
                is_params_dict: *is_params_dict,
            }),
            ArgBuilder::Reference {
                param_index,
                arg_index,
                elem_ty,
            } => Some(ArgBuilder::Reference {
                param_index: *param_index,
                arg_index: *arg_index,
                elem_ty: elem_ty.substitute(map),
            }),
            ArgBuilder::Keyword { kw_index, inner } => Some(ArgBuilder::Keyword {
                kw_index: *kw_index,
                inner: Box::new(inner.substitute(map)?),
            }),
            ArgBuilder::Default {
                param_index,
                value,
                ty,
            } => Some(ArgBuilder::Default {
                param_index: *param_index,
                value: value.clone(),
                ty: ty.substitute(map),
            }),
            ArgBuilder::ReturnReference { param_index, ty } => {
                let ty = ty.substitute(map);
                if ty.contains_vars() {
                    None
                } else {
                    Some(ArgBuilder::ReturnReference {
                        param_index: *param_index,
                        ty,
                    })
                }
            }
            ArgBuilder::ParamsArray {
                param_index,
                elem_ty,
                first_arg,
                expanded_count,
            } => Some(ArgBuilder::ParamsArray {
                param_index: *param_index,
                elem_ty: elem_ty.substitute(map),
                first_arg: *first_arg,
                expanded_count: *expanded_count,
            }),
            ArgBuilder::ParamsDict { .. } => Some(self.clone()),
        }
    }
}

/// How the candidate produces its result value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReturnBuilder {
    /// The callee's declared return value, unchanged.
    Plain { ty: Ty },
    /// The declared return value bundled with values written through
    /// reduced by-ref parameters; `extra` lists their parameter indices.
    ByRefReduced { ty: Ty, extra: Vec<usize> },
    /// A constructor call followed by member assignments from surplus
    /// named arguments.
    MemberInit { ty: Ty, members: Vec<String> },
}

impl ReturnBuilder {
    pub fn return_type(&self) -> &Ty {
        match self {
            ReturnBuilder::Plain { ty }
            | ReturnBuilder::ByRefReduced { ty, .. }
            | ReturnBuilder::MemberInit { ty, .. } => ty,
        }
    }

    pub fn substitute(&self, map: &HashMap<String, Ty>) -> ReturnBuilder {
        match self {
            ReturnBuilder::Plain { ty } => ReturnBuilder::Plain {
                ty: ty.substitute(map),
            },
            ReturnBuilder::ByRefReduced { ty, extra } => ReturnBuilder::ByRefReduced {
                ty: ty.substitute(map),
                extra: extra.clone(),
            },
            ReturnBuilder::MemberInit { ty, members } => ReturnBuilder::MemberInit {
                ty: ty.substitute(map),
                members: members.clone(),
            },
        }
    }
}

/// Supplies the receiver for instance methods. `arg_index` is `Some`
/// when the receiver is drawn from the actual arguments and `None` when
/// it is implicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceBuilder {
    pub arg_index: Option<usize>,
}

impl InstanceBuilder {
    pub fn implicit() -> Self {
        InstanceBuilder { arg_index: None }
    }

    pub fn from_argument(arg_index: usize) -> Self {
        InstanceBuilder {
            arg_index: Some(arg_index),
        }
    }

    pub fn consumed_argument_count(&self) -> usize {
        usize::from(self.arg_index.is_some())
    }
}
