//! Overload descriptors: the externally supplied view of one callable
//! signature, plus the per-parameter wrapper the resolver works with.
//!
//! An `OverloadDescriptor` is immutable once constructed. The resolver
//! never reaches back into the language's reflection layer; everything it
//! needs about a method is materialized here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Ty;

/// Literal default value for an optional parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// One declared formal parameter of an overload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
    /// In-out parameter: caller passes a box, callee reads and writes it.
    pub is_by_ref: bool,
    /// Out-only parameter: callee writes it, the incoming value is unused.
    /// Implies `is_by_ref`.
    pub is_out: bool,
    /// Absorbs a variable number of trailing positional arguments.
    pub is_params_array: bool,
    /// Absorbs keyword arguments that match no declared parameter.
    pub is_params_dict: bool,
    pub default: Option<DefaultValue>,
    pub prohibit_null: bool,
    /// For params collections: the individual absorbed items must not be
    /// null even if the collection type itself accepts null.
    pub prohibit_null_items: bool,
}

impl Param {
    /// A plain positional parameter.
    pub fn positional(name: impl Into<String>, ty: Ty) -> Self {
        Param {
            name: name.into(),
            ty,
            is_by_ref: false,
            is_out: false,
            is_params_array: false,
            is_params_dict: false,
            default: None,
            prohibit_null: false,
            prohibit_null_items: false,
        }
    }

    /// A parameter with a default value.
    pub fn with_default(name: impl Into<String>, ty: Ty, default: DefaultValue) -> Self {
        Param {
            default: Some(default),
            ..Param::positional(name, ty)
        }
    }

    /// A by-ref (in-out) parameter of the given element type.
    pub fn by_ref(name: impl Into<String>, elem: Ty) -> Self {
        Param {
            is_by_ref: true,
            ..Param::positional(name, elem)
        }
    }

    /// An out-only parameter of the given element type.
    pub fn out(name: impl Into<String>, elem: Ty) -> Self {
        Param {
            is_by_ref: true,
            is_out: true,
            ..Param::positional(name, elem)
        }
    }

    /// A params-array parameter; `ty` must be the array type.
    pub fn params_array(name: impl Into<String>, ty: Ty) -> Self {
        Param {
            is_params_array: true,
            ..Param::positional(name, ty)
        }
    }

    /// A params-dictionary parameter.
    pub fn params_dict(name: impl Into<String>) -> Self {
        Param {
            is_params_dict: true,
            ..Param::positional(name, Ty::Dict)
        }
    }
}

/// A generic method type parameter and its declared constraints.
///
/// A constraint may mention other type parameters (directly or nested),
/// which induces the inference dependency ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericParam {
    pub name: String,
    pub constraints: Vec<Ty>,
}

impl GenericParam {
    pub fn new(name: impl Into<String>) -> Self {
        GenericParam {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    pub fn with_constraints(name: impl Into<String>, constraints: Vec<Ty>) -> Self {
        GenericParam {
            name: name.into(),
            constraints,
        }
    }
}

/// Immutable description of one candidate method overload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadDescriptor {
    pub name: String,
    pub declaring_type: Ty,
    pub return_type: Ty,
    pub params: Vec<Param>,
    pub generic_params: Vec<GenericParam>,
    pub is_static: bool,
    pub is_constructor: bool,
    /// Explicit interface implementations and private methods rank below
    /// ordinary methods in candidate comparison.
    pub is_private: bool,
    /// Legacy vararg calling convention; such overloads are skipped
    /// entirely during candidate-set construction.
    pub uses_legacy_varargs: bool,
}

impl OverloadDescriptor {
    /// A static function overload.
    pub fn function(name: impl Into<String>, params: Vec<Param>, return_type: Ty) -> Self {
        OverloadDescriptor {
            name: name.into(),
            declaring_type: Ty::Object,
            return_type,
            params,
            generic_params: Vec::new(),
            is_static: true,
            is_constructor: false,
            is_private: false,
            uses_legacy_varargs: false,
        }
    }

    /// An instance method on the given declaring type.
    pub fn method(
        name: impl Into<String>,
        declaring_type: Ty,
        params: Vec<Param>,
        return_type: Ty,
    ) -> Self {
        OverloadDescriptor {
            declaring_type,
            is_static: false,
            ..OverloadDescriptor::function(name, params, return_type)
        }
    }

    /// A constructor for the given type; the return type is the type.
    pub fn constructor(ty: Ty, params: Vec<Param>) -> Self {
        let name = ty.name().into_owned();
        OverloadDescriptor {
            declaring_type: ty.clone(),
            is_constructor: true,
            ..OverloadDescriptor::function(name, params, ty)
        }
    }

    /// A static generic function with the given type parameters.
    pub fn generic_function(
        name: impl Into<String>,
        generic_params: Vec<GenericParam>,
        params: Vec<Param>,
        return_type: Ty,
    ) -> Self {
        OverloadDescriptor {
            generic_params,
            ..OverloadDescriptor::function(name, params, return_type)
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_params.is_empty()
    }

    pub fn is_variadic(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.is_params_array || p.is_params_dict)
    }

    /// Signature string for diagnostics, e.g. `f(Int32, Str[])`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.ty.name().to_string()).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// Binding flags carried by a `ParameterWrapper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterFlags(u8);

impl ParameterFlags {
    pub const NONE: ParameterFlags = ParameterFlags(0);
    pub const PROHIBIT_NULL: ParameterFlags = ParameterFlags(1);
    pub const PROHIBIT_NULL_ITEMS: ParameterFlags = ParameterFlags(2);
    pub const IS_PARAMS_ARRAY: ParameterFlags = ParameterFlags(4);
    pub const IS_PARAMS_DICT: ParameterFlags = ParameterFlags(8);
    pub const IS_HIDDEN: ParameterFlags = ParameterFlags(16);

    pub fn contains(self, other: ParameterFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ParameterFlags {
    type Output = ParameterFlags;

    fn bitor(self, rhs: ParameterFlags) -> ParameterFlags {
        ParameterFlags(self.0 | rhs.0)
    }
}

/// One slot of a candidate's flattened parameter list.
///
/// Wrappers are value-like: params expansion, default reduction, and
/// inference all construct fresh wrappers rather than mutating shared
/// ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterWrapper {
    pub ty: Ty,
    pub name: Option<String>,
    pub flags: ParameterFlags,
    /// Index of the source parameter in the overload's declared list.
    /// `None` for the synthetic instance parameter.
    pub source_index: Option<usize>,
}

impl ParameterWrapper {
    /// Panics if both params-array and params-dict flags are set; a
    /// wrapper represents at most one collection role.
    pub fn new(
        ty: Ty,
        name: Option<String>,
        flags: ParameterFlags,
        source_index: Option<usize>,
    ) -> Self {
        assert!(
            !(flags.contains(ParameterFlags::IS_PARAMS_ARRAY)
                && flags.contains(ParameterFlags::IS_PARAMS_DICT)),
            "a parameter wrapper cannot be both params-array and params-dict"
        );
        ParameterWrapper {
            ty,
            name,
            flags,
            source_index,
        }
    }

    pub fn prohibits_null(&self) -> bool {
        self.flags.contains(ParameterFlags::PROHIBIT_NULL)
    }

    pub fn prohibits_null_items(&self) -> bool {
        self.flags.contains(ParameterFlags::PROHIBIT_NULL_ITEMS)
    }

    pub fn is_params_array(&self) -> bool {
        self.flags.contains(ParameterFlags::IS_PARAMS_ARRAY)
    }

    pub fn is_params_dict(&self) -> bool {
        self.flags.contains(ParameterFlags::IS_PARAMS_DICT)
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(ParameterFlags::IS_HIDDEN)
    }

    /// Expand a params-array wrapper into a plain wrapper of its element
    /// type, used when building arity-matched expanded candidates. The
    /// prohibit-null-items flag of the array becomes prohibit-null on the
    /// element wrapper.
    pub fn expand(&self) -> ParameterWrapper {
        debug_assert!(self.is_params_array());
        let elem = self
            .ty
            .element_type()
            .cloned()
            .unwrap_or(Ty::Object);
        let mut flags = ParameterFlags::NONE;
        if self.prohibits_null_items() {
            flags = flags | ParameterFlags::PROHIBIT_NULL;
        }
        if self.is_hidden() {
            flags = flags | ParameterFlags::IS_HIDDEN;
        }
        ParameterWrapper::new(elem, self.name.clone(), flags, self.source_index)
    }

    /// Apply inferred type bindings, producing a closed wrapper.
    pub fn substitute(&self, bindings: &HashMap<String, Ty>) -> ParameterWrapper {
        ParameterWrapper {
            ty: self.ty.substitute(bindings),
            ..self.clone()
        }
    }
}
