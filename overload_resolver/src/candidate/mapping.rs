//! One-directional construction of candidates from an overload
//! descriptor.
//!
//! The mapping walks the declared parameter list exactly once, producing
//! the flattened wrapper list and the matching argument builders, then
//! emits the primary candidate plus one variant per omissible suffix of
//! defaulted parameters. A mapping is consumed by `map`; it never
//! reflects state back into the descriptor.

use std::sync::Arc;

use crate::builders::{ArgBuilder, InstanceBuilder, ReturnBuilder};
use crate::overload::{OverloadDescriptor, Param, ParameterFlags, ParameterWrapper};
use crate::types::Ty;

use super::OverloadCandidate;

pub struct ParameterMapping {
    descriptor: Arc<OverloadDescriptor>,
    /// Reduce by-ref parameters to value parameters whose updated value
    /// is returned, instead of requiring a caller-supplied cell.
    reduce_by_ref: bool,
    parameters: Vec<ParameterWrapper>,
    arg_builders: Vec<ArgBuilder>,
    return_extra: Vec<usize>,
    instance: InstanceBuilder,
}

impl std::fmt::Debug for ParameterMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterMapping")
            .field("overload", &self.descriptor.signature())
            .field("reduce_by_ref", &self.reduce_by_ref)
            .finish_non_exhaustive()
    }
}

impl ParameterMapping {
    pub fn new(descriptor: Arc<OverloadDescriptor>, reduce_by_ref: bool) -> Self {
        ParameterMapping {
            descriptor,
            reduce_by_ref,
            parameters: Vec::new(),
            arg_builders: Vec::new(),
            return_extra: Vec::new(),
            instance: InstanceBuilder::implicit(),
        }
    }

    /// Produce the primary candidate followed by its default-filling
    /// variants, shortest omission first.
    pub fn map(mut self) -> Vec<OverloadCandidate> {
        self.map_instance();
        let params: Vec<Param> = self.descriptor.params.clone();
        for (i, p) in params.iter().enumerate() {
            self.map_parameter(i, p);
        }

        let return_builder = self.make_return_builder();
        let primary = OverloadCandidate::new(
            Arc::clone(&self.descriptor),
            self.parameters.clone(),
            self.arg_builders.clone(),
            return_builder.clone(),
            self.instance.clone(),
        );

        let mut candidates = vec![primary];
        candidates.extend(self.default_variants(&params, &return_builder));
        candidates
    }

    fn map_instance(&mut self) {
        if !self.descriptor.is_static && !self.descriptor.is_constructor {
            // the receiver occupies slot 0 and consumes argument 0
            self.parameters.push(ParameterWrapper::new(
                self.descriptor.declaring_type.clone(),
                None,
                ParameterFlags::PROHIBIT_NULL,
                None,
            ));
            self.instance = InstanceBuilder::from_argument(0);
        }
    }

    fn map_parameter(&mut self, index: usize, p: &Param) {
        if p.is_out && self.reduce_by_ref {
            // vanishes from the visible signature, surfaces in the return
            self.arg_builders.push(ArgBuilder::ReturnReference {
                param_index: index,
                ty: p.ty.clone(),
            });
            self.return_extra.push(index);
            return;
        }

        if p.is_params_dict {
            // no wrapper; the builder is a placeholder until expansion
            self.arg_builders.push(ArgBuilder::Simple {
                param_index: index,
                arg_index: self.parameters.len(),
                ty: p.ty.clone(),
                is_params_array: false,
                is_params_dict: true,
            });
            return;
        }

        let slot = self.parameters.len();
        let mut flags = ParameterFlags::NONE;
        if p.prohibit_null {
            flags = flags | ParameterFlags::PROHIBIT_NULL;
        }
        if p.prohibit_null_items {
            flags = flags | ParameterFlags::PROHIBIT_NULL_ITEMS;
        }

        if p.is_by_ref {
            if self.reduce_by_ref {
                self.parameters.push(ParameterWrapper::new(
                    p.ty.clone(),
                    Some(p.name.clone()),
                    flags,
                    Some(index),
                ));
                self.arg_builders.push(ArgBuilder::Reference {
                    param_index: index,
                    arg_index: slot,
                    elem_ty: p.ty.clone(),
                });
                self.return_extra.push(index);
            } else {
                let cell = Ty::by_ref(p.ty.clone());
                self.parameters.push(ParameterWrapper::new(
                    cell.clone(),
                    Some(p.name.clone()),
                    flags | ParameterFlags::PROHIBIT_NULL,
                    Some(index),
                ));
                self.arg_builders.push(ArgBuilder::Simple {
                    param_index: index,
                    arg_index: slot,
                    ty: cell,
                    is_params_array: false,
                    is_params_dict: false,
                });
            }
            return;
        }

        if p.is_params_array {
            flags = flags | ParameterFlags::IS_PARAMS_ARRAY;
        }
        self.parameters.push(ParameterWrapper::new(
            p.ty.clone(),
            Some(p.name.clone()),
            flags,
            Some(index),
        ));
        self.arg_builders.push(ArgBuilder::Simple {
            param_index: index,
            arg_index: slot,
            ty: p.ty.clone(),
            is_params_array: p.is_params_array,
            is_params_dict: false,
        });
    }

    fn make_return_builder(&self) -> ReturnBuilder {
        let ty = if self.descriptor.is_constructor {
            self.descriptor.declaring_type.clone()
        } else {
            self.descriptor.return_type.clone()
        };
        if self.return_extra.is_empty() {
            ReturnBuilder::Plain { ty }
        } else {
            ReturnBuilder::ByRefReduced {
                ty,
                extra: self.return_extra.clone(),
            }
        }
    }

    /// One candidate per omissible suffix of defaulted parameters: the
    /// suffix's wrappers disappear and their builders become defaults.
    /// Trailing params collections sit after the suffix and keep a
    /// candidate variadic even when defaults are omitted.
    fn default_variants(
        &self,
        params: &[Param],
        return_builder: &ReturnBuilder,
    ) -> Vec<OverloadCandidate> {
        let omissible = self.trailing_defaults(params);
        let mut variants = Vec::with_capacity(omissible.len());
        for omitted in 1..=omissible.len() {
            let drop: &[usize] = &omissible[omissible.len() - omitted..];
            let parameters: Vec<ParameterWrapper> = self
                .parameters
                .iter()
                .filter(|w| !w.source_index.is_some_and(|i| drop.contains(&i)))
                .cloned()
                .collect();
            // omitting a wrapper shifts every consuming builder after it,
            // so argument indices are re-derived from scratch
            let mut cur_arg = self.instance.consumed_argument_count();
            let arg_builders: Vec<ArgBuilder> = self
                .arg_builders
                .iter()
                .map(|b| match b {
                    ArgBuilder::Simple {
                        param_index, ty, ..
                    } if drop.contains(param_index) => ArgBuilder::Default {
                        param_index: *param_index,
                        value: params[*param_index]
                            .default
                            .clone()
                            .unwrap_or(crate::overload::DefaultValue::Null),
                        ty: ty.clone(),
                    },
                    ArgBuilder::Simple {
                        param_index,
                        ty,
                        is_params_array,
                        is_params_dict,
                        ..
                    } => {
                        let b = ArgBuilder::Simple {
                            param_index: *param_index,
                            arg_index: cur_arg,
                            ty: ty.clone(),
                            is_params_array: *is_params_array,
                            is_params_dict: *is_params_dict,
                        };
                        if !*is_params_dict {
                            cur_arg += 1;
                        }
                        b
                    }
                    ArgBuilder::Reference {
                        param_index,
                        elem_ty,
                        ..
                    } => {
                        let b = ArgBuilder::Reference {
                            param_index: *param_index,
                            arg_index: cur_arg,
                            elem_ty: elem_ty.clone(),
                        };
                        cur_arg += 1;
                        b
                    }
                    other => other.clone(),
                })
                .collect();
            variants.push(OverloadCandidate::new(
                Arc::clone(&self.descriptor),
                parameters,
                arg_builders,
                return_builder.clone(),
                self.instance.clone(),
            ));
        }
        variants
    }

    /// Indices of the trailing run of defaulted parameters, in
    /// declaration order. Params collections after the run do not break
    /// it; anything else does.
    fn trailing_defaults(&self, params: &[Param]) -> Vec<usize> {
        let mut run = Vec::new();
        for (i, p) in params.iter().enumerate().rev() {
            if p.is_params_array || p.is_params_dict {
                continue;
            }
            if p.default.is_some() && !p.is_by_ref {
                run.push(i);
            } else {
                break;
            }
        }
        run.reverse();
        run
    }
}
