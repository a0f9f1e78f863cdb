//! # Type Descriptors
//!
//! Read-only description of the types exported by a compiled API crate.
//! Nothing here is ever instantiated; it is a view over metadata only.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::naming::simple_name;

/// A reference to a type as it appears in a signature, property or attribute.
///
/// Snapshots encode these as a bare string (`"acme::User"`), an object
/// `{"generic": "Vec", "args": [...]}` or an object `{"array": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    /// A fixed-size or slice element type.
    Array {
        /// The element type.
        array: Box<TypeRef>,
    },
    /// A constructed generic type.
    Generic {
        /// Name of the generic definition (e.g. `Vec`, `core::option::Option`).
        generic: String,
        /// Ordered type arguments.
        #[serde(default)]
        args: Vec<TypeRef>,
    },
    /// A plain named type.
    Named(String),
}

impl TypeRef {
    /// Shorthand for a named reference.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Shorthand for a generic reference.
    pub fn generic(generic: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Generic {
            generic: generic.into(),
            args,
        }
    }

    /// Shorthand for an array reference.
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            array: Box::new(element),
        }
    }

    /// The name of a named type, or of the generic definition.
    pub fn definition_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            TypeRef::Generic { generic, .. } => Some(generic),
            TypeRef::Array { .. } => None,
        }
    }

    /// Simple (last segment) name of the definition.
    pub fn simple_name(&self) -> Option<&str> {
        self.definition_name().map(simple_name)
    }
}

/// The kind of a declared type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// A reference type with properties (struct in Rust terms).
    #[default]
    Class,
    /// An enumeration; `members` lists its variants.
    Enum,
    /// A built-in scalar.
    Primitive,
    /// An interface / trait. Never a leaf.
    Interface,
}

/// Member visibility as recorded in metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to every caller.
    #[default]
    Public,
    /// Visible to derived types.
    Protected,
    /// Visible within the declaring module.
    Internal,
    /// Visible to the declaring type only.
    Private,
}

/// A value passed to an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrValue {
    /// Integer literal.
    Int(i64),
    /// String literal.
    Str(String),
    /// Boolean literal.
    Bool(bool),
    /// Type argument.
    Type(TypeRef),
}

/// An attribute applied to a type or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, possibly qualified.
    pub name: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<AttrValue>,
    /// Keyword arguments.
    #[serde(default)]
    pub named: IndexMap<String, AttrValue>,
}

impl Attribute {
    /// Iterates positional arguments, then keyword arguments.
    pub fn values(&self) -> impl Iterator<Item = &AttrValue> {
        self.args.iter().chain(self.named.values())
    }

    /// Every integer argument.
    pub fn int_values(&self) -> impl Iterator<Item = i64> + '_ {
        self.values().filter_map(|v| match v {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    /// First type argument, if any.
    pub fn type_argument(&self) -> Option<&TypeRef> {
        self.values().find_map(|v| match v {
            AttrValue::Type(t) => Some(t),
            _ => None,
        })
    }
}

/// A declared property (field) of a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name as declared.
    pub name: String,
    /// Property type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// A method declared on (or inherited by) a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Declared visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Static (associated, no receiver) method.
    #[serde(default)]
    pub is_static: bool,
    /// True when the method is declared on an ancestor type.
    #[serde(default)]
    pub inherited: bool,
    /// Ordered parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Attributes applied to the method.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// A declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Fully-qualified name (`module::path::Name`).
    pub name: String,
    /// Owning module (crate) name. Filled from the snapshot when omitted.
    #[serde(default)]
    pub module: String,
    /// Type kind.
    #[serde(default)]
    pub kind: TypeKind,
    /// Base type, resolved by name through the session.
    #[serde(default)]
    pub base: Option<TypeRef>,
    /// Ordered declared properties.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Methods.
    #[serde(default)]
    pub methods: Vec<Method>,
    /// Type-level attributes.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Enum member names in declaration order.
    #[serde(default)]
    pub members: Vec<String>,
}

impl TypeDef {
    /// The simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }
}
