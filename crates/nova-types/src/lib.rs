//! Declaration model shared by Nova's operator-overload inference.
//!
//! The upstream Nova project has a much richer type system. This crate keeps the part of it the
//! `nova-oo` resolver needs: a small Java-like [`Type`] representation, class/method declarations,
//! the [`TypeEnv`] lookup trait and an in-memory [`TypeStore`] implementing it.

#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod java;
mod store;

pub use java::format::format_type;
pub use java::helpers::{flatten_methods, instantiate_as_supertype};
pub use java::subtyping::{is_assignable, is_subtype};
pub use store::{TypeStore, TypeStoreSnapshot};

/// A byte-span into a source string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(u32);

impl ClassId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Binary name of the wrapper class used by boxing conversion (JLS 5.1.7).
    pub fn boxed_binary_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    pub fn from_boxed_binary_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|prim| prim.boxed_binary_name() == name)
    }

    /// Widening primitive conversion (JLS 5.1.2). Identity is not a widening.
    pub fn widens_to(self, to: PrimitiveType) -> bool {
        use PrimitiveType::*;
        matches!(
            (self, to),
            (Byte, Short | Int | Long | Float | Double)
                | (Short, Int | Long | Float | Double)
                | (Char, Int | Long | Float | Double)
                | (Int, Long | Float | Double)
                | (Long, Float | Double)
                | (Float, Double)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
}

/// A Java-like type.
///
/// [`Type::Unknown`] doubles as the "no type" sentinel: every inference entry point reports an
/// unresolvable expression with it instead of an absent value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(Box<Type>),
    TypeVar(TypeVarId),
    /// A source spelling that has not been resolved to a [`ClassId`] yet.
    Named(String),
    Null,
    Unknown,
}

/// The universal "could not be resolved" answer.
pub const NO_TYPE: Type = Type::Unknown;

impl Type {
    pub fn class(def: ClassId, args: Vec<Type>) -> Self {
        Type::Class(ClassType { def, args })
    }

    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn long() -> Self {
        Type::Primitive(PrimitiveType::Long)
    }

    pub fn double() -> Self {
        Type::Primitive(PrimitiveType::Double)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::Class(_) | Type::Array(_) | Type::TypeVar(_) | Type::Named(_) | Type::Null
        )
    }

    /// Whether methods can be looked up on this type directly.
    pub fn is_class_shaped(&self) -> bool {
        matches!(self, Type::Class(_) | Type::Named(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    #[serde(default)]
    pub upper_bounds: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            is_static: false,
            is_abstract: false,
        }
    }

    pub fn new_static(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            is_static: true,
            ..Self::new(name, params, return_type)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.List`.
    pub name: String,
    pub kind: ClassKind,
    #[serde(default)]
    pub type_params: Vec<TypeVarId>,
    #[serde(default)]
    pub super_class: Option<Type>,
    #[serde(default)]
    pub interfaces: Vec<Type>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
}

/// Read access to a snapshot of program declarations.
///
/// Implementations must be safe for concurrent reads of the same snapshot; none of the queries
/// here mutate state.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;

    fn lookup_class(&self, name: &str) -> Option<ClassId>;

    fn well_known(&self) -> &WellKnownTypes;

    /// Methods named `name` visible on `class` (own declarations first, then inherited ones).
    ///
    /// Inherited signatures are expressed in terms of `class`'s own type parameters, so callers
    /// only need the receiver's type arguments to substitute them.
    fn methods_named(&self, class: ClassId, name: &str) -> Vec<MethodDef>;

    /// Whether a value of type `from` can be passed where `to` is expected.
    fn is_assignable(&self, from: &Type, to: &Type) -> bool;
}

pub type Substitution = HashMap<TypeVarId, Type>;

/// Map a class's formal type parameters to the type arguments of an instantiation.
///
/// Raw instantiations (no arguments) map each formal to its erasure, so substituted signatures
/// stay usable instead of leaking type variables.
pub fn class_substitution(env: &dyn TypeEnv, class_def: &ClassDef, args: &[Type]) -> Substitution {
    let raw = args.is_empty();
    class_def
        .type_params
        .iter()
        .copied()
        .enumerate()
        .map(|(idx, formal)| {
            let actual = if raw {
                erasure_of_type_param(env, formal)
            } else {
                args.get(idx).cloned().unwrap_or(Type::Unknown)
            };
            (formal, actual)
        })
        .collect()
}

fn erasure_of_type_param(env: &dyn TypeEnv, id: TypeVarId) -> Type {
    env.type_param(id)
        .and_then(|tp| tp.upper_bounds.first().cloned())
        .filter(|bound| !matches!(bound, Type::TypeVar(_)))
        .unwrap_or_else(|| Type::class(env.well_known().object, vec![]))
}

/// Replace type variables in `ty` according to `subst`.
pub fn substitute(ty: &Type, subst: &Substitution) -> Type {
    if subst.is_empty() {
        return ty.clone();
    }
    match ty {
        Type::TypeVar(id) => subst.get(id).cloned().unwrap_or_else(|| ty.clone()),
        Type::Class(ClassType { def, args }) => Type::class(
            *def,
            args.iter().map(|arg| substitute(arg, subst)).collect(),
        ),
        Type::Array(elem) => Type::array(substitute(elem, subst)),
        _ => ty.clone(),
    }
}

/// Resolve a [`Type::Named`] spelling through the environment when possible.
pub fn canonicalize_named(env: &dyn TypeEnv, ty: &Type) -> Type {
    match ty {
        Type::Named(name) => match env.lookup_class(name) {
            Some(id) => Type::class(id, vec![]),
            None => ty.clone(),
        },
        _ => ty.clone(),
    }
}
