//! Bindable candidates and the per-arity sets the resolver selects from.

mod mapping;

pub use mapping::ParameterMapping;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arguments::ArgumentBinding;
use crate::builders::{ArgBuilder, InstanceBuilder, ReturnBuilder};
use crate::overload::{OverloadDescriptor, ParameterWrapper};
use crate::types::Ty;

/// One bindable shape of an overload: a flattened parameter list plus
/// the builders that assemble the physical call. A single descriptor can
/// yield several candidates (default variants, params expansions,
/// inferred instantiations), all sharing the descriptor by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadCandidate {
    descriptor: Arc<OverloadDescriptor>,
    parameters: Vec<ParameterWrapper>,
    arg_builders: Vec<ArgBuilder>,
    return_builder: ReturnBuilder,
    instance_builder: InstanceBuilder,
}

impl OverloadCandidate {
    pub(crate) fn new(
        descriptor: Arc<OverloadDescriptor>,
        parameters: Vec<ParameterWrapper>,
        arg_builders: Vec<ArgBuilder>,
        return_builder: ReturnBuilder,
        instance_builder: InstanceBuilder,
    ) -> Self {
        OverloadCandidate {
            descriptor,
            parameters,
            arg_builders,
            return_builder,
            instance_builder,
        }
    }

    /// The primary candidate of a descriptor, without default variants.
    pub fn simple(descriptor: Arc<OverloadDescriptor>) -> Self {
        ParameterMapping::new(descriptor, true)
            .map()
            .into_iter()
            .next()
            .unwrap()
    }

    pub fn overload(&self) -> &OverloadDescriptor {
        &self.descriptor
    }

    pub fn descriptor(&self) -> &Arc<OverloadDescriptor> {
        &self.descriptor
    }

    pub fn parameters(&self) -> &[ParameterWrapper] {
        &self.parameters
    }

    pub fn parameter(&self, i: usize) -> &ParameterWrapper {
        &self.parameters[i]
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn arg_builders(&self) -> &[ArgBuilder] {
        &self.arg_builders
    }

    pub fn return_builder(&self) -> &ReturnBuilder {
        &self.return_builder
    }

    pub fn instance_builder(&self) -> &InstanceBuilder {
        &self.instance_builder
    }

    pub fn return_type(&self) -> Ty {
        self.return_builder.return_type().clone()
    }

    /// Slot of the named parameter, if the candidate exposes one.
    pub fn index_of_parameter(&self, name: &str) -> Option<usize> {
        self.parameters
            .iter()
            .position(|p| p.name.as_deref() == Some(name))
    }

    pub fn has_params_array(&self) -> bool {
        self.parameters.iter().any(|p| p.is_params_array())
    }

    pub fn params_array_index(&self) -> Option<usize> {
        self.parameters.iter().position(|p| p.is_params_array())
    }

    pub fn has_params_dict(&self) -> bool {
        self.arg_builders.iter().any(|b| {
            matches!(
                b,
                ArgBuilder::Simple {
                    is_params_dict: true,
                    ..
                } | ArgBuilder::ParamsDict { .. }
            )
        })
    }

    /// The names an expanded params dictionary has claimed, if any.
    pub fn params_dict_names(&self) -> Option<&[String]> {
        self.arg_builders.iter().find_map(|b| match b {
            ArgBuilder::ParamsDict { names, .. } => Some(names.as_slice()),
            _ => None,
        })
    }

    /// Whether any visible type still mentions an unbound type variable;
    /// such candidates cannot be bound directly and wait for inference.
    pub fn has_unbound_vars(&self) -> bool {
        self.parameters.iter().any(|p| p.ty.contains_vars())
            || self.return_builder.return_type().contains_vars()
    }

    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .filter(|p| !p.is_hidden())
            .map(|p| {
                if p.is_params_array() {
                    format!("params {}", p.ty.name())
                } else {
                    p.ty.name().to_string()
                }
            })
            .collect();
        format!("{}({})", self.descriptor.name, params.join(", "))
    }

    /// Ground every type variable per `bindings`. `None` when a builder
    /// cannot be grounded, which removes the candidate from inference.
    pub fn substitute(&self, bindings: &HashMap<String, Ty>) -> Option<OverloadCandidate> {
        let parameters = self
            .parameters
            .iter()
            .map(|p| p.substitute(bindings))
            .collect();
        let arg_builders = self
            .arg_builders
            .iter()
            .map(|b| b.substitute(bindings))
            .collect::<Option<Vec<_>>>()?;
        Some(OverloadCandidate {
            descriptor: Arc::clone(&self.descriptor),
            parameters,
            arg_builders,
            return_builder: self.return_builder.substitute(bindings),
            instance_builder: self.instance_builder.clone(),
        })
    }

    /// Expand a variadic candidate to bind exactly `count` arguments.
    ///
    /// `names`/`name_indices` are the call's named arguments; names that
    /// match declared parameters stay keyword-bound, the rest must be
    /// absorbable by a params dictionary. Returns `None` when the shape
    /// cannot stretch or shrink to `count`.
    pub fn make_params_extended(
        &self,
        count: usize,
        names: &[String],
        name_indices: &[usize],
    ) -> Option<OverloadCandidate> {
        let mut unused_names: Vec<String> = names.to_vec();
        let mut unused_indices: Vec<usize> = name_indices.to_vec();
        let mut new_params: Vec<ParameterWrapper> = Vec::with_capacity(count);
        let mut params_array: Option<ParameterWrapper> = None;
        let mut params_array_slot: Option<usize> = None;

        for (i, p) in self.parameters.iter().enumerate() {
            if p.is_params_array() {
                params_array = Some(p.clone());
                params_array_slot = Some(i);
            } else {
                if let Some(pos) = unused_names
                    .iter()
                    .position(|n| p.name.as_deref() == Some(n))
                {
                    unused_names.remove(pos);
                    unused_indices.remove(pos);
                }
                new_params.push(p.clone());
            }
        }

        let has_dict = self
            .arg_builders
            .iter()
            .any(|b| matches!(b, ArgBuilder::Simple { is_params_dict: true, .. }));
        if params_array.is_none() && !has_dict {
            return None;
        }
        if !unused_names.is_empty() && !has_dict {
            return None;
        }

        let positional_target = count.checked_sub(unused_names.len())?;
        if let (Some(array), Some(slot)) = (&params_array, params_array_slot) {
            let expanded = array.expand();
            while new_params.len() < positional_target {
                let at = slot.min(new_params.len());
                new_params.insert(at, expanded.clone());
            }
        }
        if new_params.len() != positional_target {
            return None;
        }

        let expanded_item_count = match params_array {
            Some(_) => positional_target - (self.parameters.len() - 1),
            None => 0,
        };

        let mut new_builders = Vec::with_capacity(self.arg_builders.len() + 1);
        let mut dict_builder = None;
        let mut cur_arg = self.instance_builder.consumed_argument_count();
        for b in &self.arg_builders {
            match b {
                ArgBuilder::Simple {
                    param_index,
                    ty,
                    is_params_array,
                    is_params_dict,
                    ..
                } => {
                    if *is_params_dict {
                        dict_builder = Some(ArgBuilder::ParamsDict {
                            param_index: *param_index,
                            names: unused_names.clone(),
                            name_indices: unused_indices.clone(),
                        });
                    } else if *is_params_array {
                        let elem = ty.element_type().cloned().unwrap_or(Ty::Object);
                        new_builders.push(ArgBuilder::ParamsArray {
                            param_index: *param_index,
                            elem_ty: elem,
                            first_arg: cur_arg,
                            expanded_count: expanded_item_count,
                        });
                        cur_arg += expanded_item_count;
                    } else {
                        new_builders.push(ArgBuilder::Simple {
                            param_index: *param_index,
                            arg_index: cur_arg,
                            ty: ty.clone(),
                            is_params_array: false,
                            is_params_dict: false,
                        });
                        cur_arg += 1;
                    }
                }
                ArgBuilder::Reference {
                    param_index,
                    elem_ty,
                    ..
                } => {
                    new_builders.push(ArgBuilder::Reference {
                        param_index: *param_index,
                        arg_index: cur_arg,
                        elem_ty: elem_ty.clone(),
                    });
                    cur_arg += 1;
                }
                other => new_builders.push(other.clone()),
            }
        }
        if let Some(d) = dict_builder {
            new_builders.push(d);
        }

        Some(OverloadCandidate {
            descriptor: Arc::clone(&self.descriptor),
            parameters: new_params,
            arg_builders: new_builders,
            return_builder: self.return_builder.clone(),
            instance_builder: self.instance_builder.clone(),
        })
    }

    /// Rewire builders for a keyword-bound call: each builder whose slot
    /// was filled by name reads the named argument's actual position and
    /// is tagged with its keyword index.
    pub fn route_named(&self, binding: &ArgumentBinding) -> OverloadCandidate {
        if binding.named_count() == 0 {
            return self.clone();
        }
        let pc = binding.positional_count();
        let mut builders = self.arg_builders.clone();
        for kw in 0..binding.named_count() {
            let arg_index = pc + kw;
            let Some(slot) = binding.argument_to_parameter(arg_index) else {
                continue;
            };
            let pos = builders.iter().position(|b| match b {
                ArgBuilder::Simple { arg_index: a, .. }
                | ArgBuilder::Reference { arg_index: a, .. } => *a == slot,
                _ => false,
            });
            if let Some(pos) = pos {
                let inner = match &builders[pos] {
                    ArgBuilder::Simple {
                        param_index,
                        ty,
                        is_params_array,
                        is_params_dict,
                        ..
                    } => ArgBuilder::Simple {
                        param_index: *param_index,
                        arg_index,
                        ty: ty.clone(),
                        is_params_array: *is_params_array,
                        is_params_dict: *is_params_dict,
                    },
                    ArgBuilder::Reference {
                        param_index,
                        elem_ty,
                        ..
                    } => ArgBuilder::Reference {
                        param_index: *param_index,
                        arg_index,
                        elem_ty: elem_ty.clone(),
                    },
                    other => other.clone(),
                };
                builders[pos] = ArgBuilder::Keyword {
                    kw_index: kw,
                    inner: Box::new(inner),
                };
            }
        }
        OverloadCandidate {
            descriptor: Arc::clone(&self.descriptor),
            parameters: self.parameters.clone(),
            arg_builders: builders,
            return_builder: self.return_builder.clone(),
            instance_builder: self.instance_builder.clone(),
        }
    }

    /// Wrap the return in member initialization for the given surplus
    /// names; only meaningful for constructor candidates.
    pub fn with_member_init(&self, members: Vec<String>) -> OverloadCandidate {
        OverloadCandidate {
            return_builder: ReturnBuilder::MemberInit {
                ty: self.return_builder.return_type().clone(),
                members,
            },
            ..self.clone()
        }
    }
}

impl std::fmt::Display for OverloadCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.signature())
    }
}

/// All candidates sharing one arity.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    arity: usize,
    candidates: Vec<OverloadCandidate>,
}

impl CandidateSet {
    pub fn new(arity: usize) -> Self {
        CandidateSet {
            arity,
            candidates: Vec::new(),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn add(&mut self, candidate: OverloadCandidate) {
        debug_assert_eq!(candidate.parameter_count(), self.arity);
        self.candidates.push(candidate);
    }

    pub fn candidates(&self) -> &[OverloadCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
