//! # Type Shapes
//!
//! Converts `syn` type syntax into the closed set of shapes the classifier
//! understands. Shapes are purely structural; named types are resolved later
//! against the [`ModelSet`](crate::parser::ModelSet).

use crate::error::{AppError, AppResult};
use quote::ToTokens;
use std::collections::HashMap;
use std::fmt::{self, Display};

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `String` / `str`
    String,
}

impl Primitive {
    fn from_ident(ident: &str) -> Option<Self> {
        let primitive = match ident {
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "i128" => Self::I128,
            "isize" => Self::Isize,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            "usize" => Self::Usize,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "bool" => Self::Bool,
            "char" => Self::Char,
            "String" | "str" => Self::String,
            _ => return None,
        };
        Some(primitive)
    }

    fn rust_name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::String => "String",
        }
    }
}

/// Value types with a fixed textual wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnown {
    /// Unique identifier (`Uuid`).
    Uuid,
    /// Timestamp (`DateTime`, `NaiveDateTime`, `SystemTime`, ...).
    DateTime,
    /// Calendar date (`NaiveDate`, `Date`).
    Date,
}

impl WellKnown {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "Uuid" => Some(Self::Uuid),
            "DateTime" | "NaiveDateTime" | "OffsetDateTime" | "PrimitiveDateTime"
            | "SystemTime" => Some(Self::DateTime),
            "NaiveDate" | "Date" => Some(Self::Date),
            _ => None,
        }
    }

    /// The OpenAPI `format` for this value type.
    pub fn format(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::DateTime => "date-time",
            Self::Date => "date",
        }
    }
}

/// Structural description of a declared Rust type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// Built-in scalar.
    Primitive(Primitive),
    /// Well-known value type.
    WellKnown(WellKnown),
    /// `Option<T>`.
    Optional(Box<TypeShape>),
    /// Homogeneous sequence (`Vec<T>`, `[T]`, sets, ...).
    Sequence(Box<TypeShape>),
    /// Keyed mapping (`HashMap<K, V>`, `BTreeMap<K, V>`, `IndexMap<K, V>`).
    Map(Box<TypeShape>, Box<TypeShape>),
    /// Reference to a named model, possibly instantiated with type arguments.
    Named(String, Vec<TypeShape>),
    /// A type without a name (tuples).
    Anonymous(String),
    /// Syntax that can never be described (fn pointers, trait objects, ...).
    Unsupported(String),
}

impl TypeShape {
    /// Parses a Rust type expression such as `Vec<Person>`.
    pub fn parse(expr: &str) -> AppResult<Self> {
        let ty: syn::Type = syn::parse_str(expr)
            .map_err(|e| AppError::Parse(format!("Invalid type expression '{}': {}", expr, e)))?;
        Ok(Self::from_syn(&ty))
    }

    /// Maps a `syn` type node to a shape.
    pub fn from_syn(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Path(type_path) if type_path.qself.is_none() => {
                match type_path.path.segments.last() {
                    Some(segment) => shape_from_segment(segment),
                    None => Self::Unsupported(tokens(ty)),
                }
            }
            syn::Type::Reference(reference) => Self::from_syn(&reference.elem),
            syn::Type::Paren(paren) => Self::from_syn(&paren.elem),
            syn::Type::Group(group) => Self::from_syn(&group.elem),
            syn::Type::Slice(slice) => Self::Sequence(Box::new(Self::from_syn(&slice.elem))),
            syn::Type::Array(array) => Self::Sequence(Box::new(Self::from_syn(&array.elem))),
            syn::Type::Tuple(tuple) if !tuple.elems.is_empty() => Self::Anonymous(tokens(ty)),
            _ => Self::Unsupported(tokens(ty)),
        }
    }

    /// Replaces generic parameters by their bound shapes.
    pub fn substitute(&self, bindings: &HashMap<String, TypeShape>) -> Self {
        if bindings.is_empty() {
            return self.clone();
        }
        match self {
            Self::Named(name, args) if args.is_empty() => match bindings.get(name) {
                Some(bound) => bound.clone(),
                None => self.clone(),
            },
            Self::Named(name, args) => Self::Named(
                name.clone(),
                args.iter().map(|a| a.substitute(bindings)).collect(),
            ),
            Self::Optional(inner) => Self::Optional(Box::new(inner.substitute(bindings))),
            Self::Sequence(inner) => Self::Sequence(Box::new(inner.substitute(bindings))),
            Self::Map(key, value) => Self::Map(
                Box::new(key.substitute(bindings)),
                Box::new(value.substitute(bindings)),
            ),
            other => other.clone(),
        }
    }
}

impl Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p.rust_name()),
            Self::WellKnown(WellKnown::Uuid) => write!(f, "Uuid"),
            Self::WellKnown(WellKnown::DateTime) => write!(f, "DateTime"),
            Self::WellKnown(WellKnown::Date) => write!(f, "NaiveDate"),
            Self::Optional(inner) => write!(f, "Option<{}>", inner),
            Self::Sequence(inner) => write!(f, "Vec<{}>", inner),
            Self::Map(key, value) => write!(f, "HashMap<{}, {}>", key, value),
            Self::Named(name, args) if args.is_empty() => write!(f, "{}", name),
            Self::Named(name, args) => {
                write!(f, "{}<", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
            Self::Anonymous(text) | Self::Unsupported(text) => write!(f, "{}", text),
        }
    }
}

fn shape_from_segment(segment: &syn::PathSegment) -> TypeShape {
    let ident = segment.ident.to_string();
    let args = type_args(&segment.arguments);

    if let Some(primitive) = Primitive::from_ident(&ident) {
        return TypeShape::Primitive(primitive);
    }
    if let Some(well_known) = WellKnown::from_ident(&ident) {
        return TypeShape::WellKnown(well_known);
    }

    match ident.as_str() {
        "Option" => single_arg(&ident, args, |inner| TypeShape::Optional(Box::new(inner))),
        "Box" | "Rc" | "Arc" | "Cow" => single_arg(&ident, args, |inner| inner),
        "Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet" | "IndexSet" => {
            single_arg(&ident, args, |inner| TypeShape::Sequence(Box::new(inner)))
        }
        "HashMap" | "BTreeMap" | "IndexMap" => {
            let mut args = args.into_iter();
            match (args.next(), args.next()) {
                (Some(key), Some(value)) => TypeShape::Map(Box::new(key), Box::new(value)),
                _ => TypeShape::Unsupported(format!("{} without key/value types", ident)),
            }
        }
        _ => TypeShape::Named(ident, args),
    }
}

fn single_arg<F>(ident: &str, args: Vec<TypeShape>, wrap: F) -> TypeShape
where
    F: FnOnce(TypeShape) -> TypeShape,
{
    match args.into_iter().next() {
        Some(inner) => wrap(inner),
        None => TypeShape::Unsupported(format!("{} without a type argument", ident)),
    }
}

/// Type arguments only; lifetimes and const generics are dropped.
fn type_args(arguments: &syn::PathArguments) -> Vec<TypeShape> {
    match arguments {
        syn::PathArguments::AngleBracketed(angle) => angle
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(TypeShape::from_syn(ty)),
                _ => None,
            })
            .collect(),
        syn::PathArguments::Parenthesized(_) | syn::PathArguments::None => Vec::new(),
    }
}

fn tokens(ty: &syn::Type) -> String {
    ty.to_token_stream().to_string()
}
