//! Type model for overload resolution.
//!
//! The resolver never inspects runtime values; it works over this closed
//! type enum. The hierarchy is deliberately small: enough structure for
//! conversion checks, params-array expansion, by-ref boxing, and generic
//! method inference.
//!
//! ```text
//! Object
//!  ├── value types: Bool, Int8..Int64, UInt32, UInt64,
//!  │                Float32, Float64, Decimal, Char, Nullable<T>
//!  ├── reference types: Str, Array<T>, Dict, Class, Generic, Interface,
//!  │                    Delegate
//!  ├── ByRef<T>   box wrapper for by-ref parameters (not a value type)
//!  ├── Var(T)     open generic method type parameter
//!  └── Null       the type of a null argument value
//! ```
//!
//! # Sub-modules
//!
//! - `display`: type name formatting for diagnostics

mod display;


use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A nominal class type with its inheritance environment.
///
/// `base` and `ifaces` exist so generic inference can walk the base chain
/// (`class IntList : List<Int32>`) and enumerate implemented interface
/// instantiations (`class C : IEnumerable<Int32>, IEnumerable<Str>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassTy {
    /// Class name, unique within the embedding type universe.
    pub name: String,
    /// Direct base type, if any. `None` means the base is `Object`.
    pub base: Option<Box<Ty>>,
    /// Implemented interface instantiations, nearest-declared first.
    pub ifaces: Vec<Ty>,
}

impl ClassTy {
    /// A class deriving directly from `Object` with no interfaces.
    pub fn simple(name: impl Into<String>) -> Self {
        ClassTy {
            name: name.into(),
            base: None,
            ifaces: Vec::new(),
        }
    }
}

/// The type of an actual argument or formal parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ty {
    /// The static type of a null argument value. Converts to any type
    /// that accepts null; never appears as a parameter type.
    Null,
    /// Top type; every non-by-ref type converts to it.
    Object,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Decimal,
    Char,
    /// Immutable string; a reference type.
    Str,
    /// Array with the given element type. Carrier for params arrays.
    Array(Box<Ty>),
    /// String-keyed map of `Object`. Carrier for params dictionaries.
    Dict,
    /// Nullable value type; null converts into it without narrowing.
    Nullable(Box<Ty>),
    /// Box wrapper for by-ref parameters. A caller passes a box whose
    /// content is read and written by the callee.
    ByRef(Box<Ty>),
    /// Nominal class type.
    Class(ClassTy),
    /// Constructed generic type, e.g. `List<Int32>` or `List<T>` when
    /// `args` mention open vars.
    Generic { name: String, args: Vec<Ty> },
    /// Interface instantiation, e.g. `IEnumerable<Int32>`.
    Interface { name: String, args: Vec<Ty> },
    /// Open generic method type parameter.
    Var(String),
    /// Callable shape; participates in delegate-driven inference.
    Delegate { params: Vec<Ty>, ret: Box<Ty> },
}

impl Ty {
    /// Convenience constructor for arrays.
    pub fn array(elem: Ty) -> Ty {
        Ty::Array(Box::new(elem))
    }

    /// Convenience constructor for by-ref boxes.
    pub fn by_ref(inner: Ty) -> Ty {
        Ty::ByRef(Box::new(inner))
    }

    /// Convenience constructor for nullable value types.
    pub fn nullable(inner: Ty) -> Ty {
        Ty::Nullable(Box::new(inner))
    }

    /// Convenience constructor for open type variables.
    pub fn var(name: impl Into<String>) -> Ty {
        Ty::Var(name.into())
    }

    /// Convenience constructor for simple classes.
    pub fn class(name: impl Into<String>) -> Ty {
        Ty::Class(ClassTy::simple(name))
    }

    /// Whether values of this type are copied rather than referenced.
    /// Null cannot be assigned to a value type (other than `Nullable`).
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            Ty::Bool
                | Ty::Int8
                | Ty::Int16
                | Ty::Int32
                | Ty::Int64
                | Ty::UInt32
                | Ty::UInt64
                | Ty::Float32
                | Ty::Float64
                | Ty::Decimal
                | Ty::Char
                | Ty::Nullable(_)
        )
    }

    /// Whether a null argument may bind to a parameter of this type,
    /// ignoring per-parameter prohibit-null flags.
    pub fn accepts_null(&self) -> bool {
        matches!(self, Ty::Nullable(_)) || !self.is_value_type()
    }

    /// Element type of arrays, by-ref boxes, and nullables.
    pub fn element_type(&self) -> Option<&Ty> {
        match self {
            Ty::Array(e) | Ty::ByRef(e) | Ty::Nullable(e) => Some(e),
            _ => None,
        }
    }

    /// Whether any open type variable occurs anywhere in this type.
    pub fn contains_vars(&self) -> bool {
        match self {
            Ty::Var(_) => true,
            Ty::Array(e) | Ty::ByRef(e) | Ty::Nullable(e) => e.contains_vars(),
            Ty::Generic { args, .. } | Ty::Interface { args, .. } => {
                args.iter().any(Ty::contains_vars)
            }
            Ty::Delegate { params, ret } => {
                params.iter().any(Ty::contains_vars) || ret.contains_vars()
            }
            Ty::Class(c) => {
                c.base.as_deref().is_some_and(Ty::contains_vars)
                    || c.ifaces.iter().any(Ty::contains_vars)
            }
            _ => false,
        }
    }

    /// Collect every open type variable mentioned in this type, in
    /// left-to-right order, without duplicates.
    pub fn collect_vars(&self, out: &mut Vec<String>) {
        match self {
            Ty::Var(name) => {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
            Ty::Array(e) | Ty::ByRef(e) | Ty::Nullable(e) => e.collect_vars(out),
            Ty::Generic { args, .. } | Ty::Interface { args, .. } => {
                for a in args {
                    a.collect_vars(out);
                }
            }
            Ty::Delegate { params, ret } => {
                for p in params {
                    p.collect_vars(out);
                }
                ret.collect_vars(out);
            }
            _ => {}
        }
    }

    /// Substitute bound type variables. Unbound vars are left in place so
    /// partially inferred types remain detectable via `contains_vars`.
    pub fn substitute(&self, bindings: &HashMap<String, Ty>) -> Ty {
        match self {
            Ty::Var(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            Ty::Array(e) => Ty::Array(Box::new(e.substitute(bindings))),
            Ty::ByRef(e) => Ty::ByRef(Box::new(e.substitute(bindings))),
            Ty::Nullable(e) => Ty::Nullable(Box::new(e.substitute(bindings))),
            Ty::Generic { name, args } => Ty::Generic {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            Ty::Interface { name, args } => Ty::Interface {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            Ty::Delegate { params, ret } => Ty::Delegate {
                params: params.iter().map(|p| p.substitute(bindings)).collect(),
                ret: Box::new(ret.substitute(bindings)),
            },
            _ => self.clone(),
        }
    }

    /// Direct base type for the base-chain walk. Scalars and composites
    /// other than classes derive directly from `Object`.
    pub fn base_type(&self) -> Option<&Ty> {
        match self {
            Ty::Object | Ty::Null | Ty::Var(_) | Ty::ByRef(_) => None,
            Ty::Class(c) => Some(c.base.as_deref().unwrap_or(&Ty::Object)),
            _ => Some(&Ty::Object),
        }
    }

    /// Interface instantiations implemented by this type. Arrays expose
    /// no interfaces in this model; classes expose their declared list.
    pub fn interfaces(&self) -> &[Ty] {
        match self {
            Ty::Class(c) => &c.ifaces,
            _ => &[],
        }
    }

    /// Identity-plus-widening assignability: can a value statically typed
    /// `other` be stored into a slot of type `self` without conversion?
    ///
    /// This is the relation used for binding restrictions and inference
    /// unification, not the narrowing-aware conversion check (which is the
    /// binder's job).
    pub fn is_assignable_from(&self, other: &Ty) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            // By-ref boxes are invariant and never implicitly produced.
            (Ty::ByRef(_), _) | (_, Ty::ByRef(_)) => false,
            (_, Ty::Null) => self.accepts_null(),
            (Ty::Object, _) => true,
            (Ty::Nullable(inner), _) => inner.as_ref() == other,
            // Covariant arrays of reference elements, per CLR rules.
            (Ty::Array(se), Ty::Array(oe)) => !oe.is_value_type() && se.is_assignable_from(oe),
            (Ty::Interface { .. }, _) => {
                other.interfaces().iter().any(|i| self.is_assignable_from(i))
                    || other
                        .base_type()
                        .is_some_and(|b| *b != Ty::Object && self.is_assignable_from(b))
            }
            (_, Ty::Class(c)) => c
                .base
                .as_deref()
                .is_some_and(|base| self.is_assignable_from(base)),
            _ => false,
        }
    }
}
