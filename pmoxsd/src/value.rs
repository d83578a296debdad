//! Valeurs typées manipulées par le codec.

use std::collections::BTreeMap;
use std::fmt;

use crate::{PrimitiveValue, QualifiedName, TypeDescriptor, XsdError};

/// Valeur d'une énumération.
///
/// Deux valeurs sont égales si elles appartiennent au même type
/// `(namespace, name)` et désignent le même membre.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    type_name: QualifiedName,
    member: String,
    index: usize,
}

impl EnumValue {
    /// Retourne le membre `member` de l'énumération `descriptor`.
    ///
    /// # Errors
    ///
    /// [`XsdError::UnknownMember`] si le membre n'existe pas,
    /// [`XsdError::TypeMismatch`] si le descripteur n'est pas une énumération.
    pub fn of(descriptor: &TypeDescriptor, member: &str) -> Result<Self, XsdError> {
        let members = descriptor.members().ok_or_else(|| XsdError::TypeMismatch {
            expected: descriptor.qualified_name(),
            found: "enumeration member".to_string(),
        })?;

        let index = members
            .iter()
            .position(|m| m == member)
            .ok_or_else(|| XsdError::UnknownMember {
                type_name: descriptor.qualified_name(),
                member: member.to_string(),
            })?;

        Ok(Self {
            type_name: descriptor.qualified_name(),
            member: member.to_string(),
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.member
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn type_name(&self) -> &QualifiedName {
        &self.type_name
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Valeur d'une structure : les champs présents, par nom.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeValue {
    fields: BTreeMap<String, Value>,
}

impl CompositeValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Primitive(PrimitiveValue),
    Enum(EnumValue),
    Composite(CompositeValue),
    Binary(Vec<u8>),
}

impl Value {
    /// Forme texte de la valeur, pour les valeurs scalaires.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Primitive(p) => Some(p.to_string()),
            Value::Enum(e) => Some(e.name().to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Primitive(PrimitiveValue::String(s)) => Some(s),
            Value::Enum(e) => Some(e.name()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Primitive(PrimitiveValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Valeur entière, quel que soit le type entier sous-jacent.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Primitive(p) => match p {
                PrimitiveValue::UI1(v) => Some(i64::from(*v)),
                PrimitiveValue::UI2(v) => Some(i64::from(*v)),
                PrimitiveValue::UI4(v) => Some(i64::from(*v)),
                PrimitiveValue::I1(v) => Some(i64::from(*v)),
                PrimitiveValue::I2(v) => Some(i64::from(*v)),
                PrimitiveValue::I4(v) => Some(i64::from(*v)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<PrimitiveValue> for Value {
    fn from(v: PrimitiveValue) -> Self {
        Value::Primitive(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Value::Enum(v)
    }
}

impl From<CompositeValue> for Value {
    fn from(v: CompositeValue) -> Self {
        Value::Composite(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Primitive(PrimitiveValue::String(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Primitive(PrimitiveValue::String(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Primitive(PrimitiveValue::Boolean(v))
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Primitive(PrimitiveValue::UI1(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Primitive(PrimitiveValue::UI2(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Primitive(PrimitiveValue::UI4(v))
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Primitive(PrimitiveValue::I2(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Primitive(PrimitiveValue::I4(v))
    }
}
