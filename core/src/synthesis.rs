//! # Example Value Synthesis
//!
//! Classifies property types into a closed set of primitive kinds and renders
//! an example expression for each.

use crate::metadata::{MetadataProvider, TypeKind, TypeRef};
use crate::naming::{clean_member_name, description_constant, simple_name};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default seed of the shared numeric generator.
pub const DEFAULT_SEED: u64 = 1;

/// The primitive kind of a property, as far as example synthesis cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Owned or borrowed string.
    String,
    /// `bool`.
    Boolean,
    /// Any signed or unsigned integer.
    Integer {
        /// Exclusive upper bound of generated values, capped at `i32::MAX`.
        max: i32,
    },
    /// Date, time or timestamp.
    DateTime,
    /// Unique identifier (`Uuid`).
    Uuid,
    /// Fixed-point decimal.
    Decimal,
    /// Enumeration with at least one member.
    Enum {
        /// Path used to reference the enum in generated code.
        path: String,
        /// Member names in declaration order.
        members: Vec<String>,
    },
    /// Anything else.
    Other,
}

/// A classified property type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
    /// The underlying kind.
    pub kind: PrimitiveKind,
    /// True when the declared type is `Option<kind>`.
    pub nullable: bool,
}

/// Integer types with the exclusive bound their examples are drawn below.
const INTEGERS: &[(&str, i32)] = &[
    ("i8", i8::MAX as i32),
    ("u8", u8::MAX as i32),
    ("i16", i16::MAX as i32),
    ("u16", u16::MAX as i32),
    ("i32", i32::MAX),
    ("u32", i32::MAX),
    ("i64", i32::MAX),
    ("u64", i32::MAX),
    ("i128", i32::MAX),
    ("u128", i32::MAX),
    ("isize", i32::MAX),
    ("usize", i32::MAX),
];

const DATE_TIMES: &[&str] = &[
    "DateTime",
    "NaiveDateTime",
    "NaiveDate",
    "OffsetDateTime",
    "PrimitiveDateTime",
    "SystemTime",
];

impl FieldShape {
    /// Classifies a property type, resolving enums through the session.
    pub fn classify(session: &dyn MetadataProvider, ty: &TypeRef) -> Self {
        if let TypeRef::Generic { generic, args } = ty {
            if simple_name(generic) == "Option" && args.len() == 1 {
                return Self {
                    kind: Self::kind_of(session, &args[0]),
                    nullable: true,
                };
            }
        }
        Self {
            kind: Self::kind_of(session, ty),
            nullable: false,
        }
    }

    fn kind_of(session: &dyn MetadataProvider, ty: &TypeRef) -> PrimitiveKind {
        let Some(name) = ty.simple_name() else {
            return PrimitiveKind::Other;
        };
        let name = name.trim_start_matches('&');
        if let Some((_, max)) = INTEGERS.iter().find(|(int, _)| *int == name) {
            return PrimitiveKind::Integer { max: *max };
        }
        match name {
            "String" | "str" => PrimitiveKind::String,
            "bool" => PrimitiveKind::Boolean,
            "Uuid" => PrimitiveKind::Uuid,
            "Decimal" => PrimitiveKind::Decimal,
            n if DATE_TIMES.contains(&n) => PrimitiveKind::DateTime,
            _ => match session.resolve(ty) {
                Some(def) if def.kind == TypeKind::Enum && !def.members.is_empty() => {
                    PrimitiveKind::Enum {
                        path: def.simple_name().to_string(),
                        members: def.members.clone(),
                    }
                }
                _ => PrimitiveKind::Other,
            },
        }
    }
}

/// True when a string property holds an identifier (`user_id`, `ID`, `orderID`).
pub fn is_identifier_field(name: &str) -> bool {
    clean_member_name(name).ends_with("ID") || name == "id" || name.ends_with("_id")
}

/// Renders example expressions.
///
/// Integers come from a single seeded generator shared across every property
/// rendered by this instance. Enum members are picked with a freshly
/// entropy-seeded generator at index `max(next(count) - 1, 0)`, so enum choice
/// is not reproducible and never lands on the last member of a multi-member
/// enum.
pub struct ValueSynthesizer {
    rng: StdRng,
    descriptions_type: String,
}

impl ValueSynthesizer {
    /// Creates a synthesizer whose numeric values are reproducible for `seed`.
    pub fn new(seed: u64, descriptions_type: impl Into<String>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            descriptions_type: descriptions_type.into(),
        }
    }

    /// Renders the example expression for `field` of `model`.
    pub fn render(&mut self, model: &str, field: &str, shape: &FieldShape) -> String {
        let expr = match &shape.kind {
            PrimitiveKind::String if is_identifier_field(field) => {
                "uuid::Uuid::new_v4().to_string()".to_string()
            }
            PrimitiveKind::String => format!(
                "{}::{}.into()",
                self.descriptions_type,
                description_constant(simple_name(model), field)
            ),
            PrimitiveKind::Boolean => "false".to_string(),
            PrimitiveKind::Integer { max } => self.rng.gen_range(0..*max).to_string(),
            PrimitiveKind::DateTime => "chrono::Utc::now()".to_string(),
            PrimitiveKind::Uuid => "uuid::Uuid::new_v4()".to_string(),
            PrimitiveKind::Decimal => "rust_decimal::Decimal::ZERO".to_string(),
            PrimitiveKind::Enum { members, .. } if members.is_empty() => {
                return "Default::default()".to_string();
            }
            PrimitiveKind::Enum { path, members } => {
                let mut fresh = StdRng::from_entropy();
                let index = fresh.gen_range(0..members.len()).saturating_sub(1);
                format!("{}::{}", path, members[index])
            }
            PrimitiveKind::Other => return "Default::default()".to_string(),
        };

        if shape.nullable {
            format!("Some({})", expr)
        } else {
            expr
        }
    }
}
