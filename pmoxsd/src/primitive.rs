//! Types primitifs et leurs valeurs.
//!
//! Les types primitifs reprennent les types de données UPnP (`ui4`, `boolean`,
//! `uri`...) et les projettent sur les types XML Schema correspondants.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use url::Url;
use uuid::Uuid;

use crate::XsdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    UI1,      // Unsigned 8-bit integer
    UI2,      // Unsigned 16-bit integer
    UI4,      // Unsigned 32-bit integer
    I1,       // Signed 8-bit integer
    I2,       // Signed 16-bit integer
    I4,       // Signed 32-bit integer
    R4,       // 32-bit floating point
    R8,       // 64-bit floating point
    Boolean,  // 1/0
    Char,     // Single Unicode character
    String,   // Character string
    Date,     // YYYY-MM-DD
    DateTime, // DateTime without timezone
    Time,     // Time without timezone
    UUID,     // Universally unique identifier
    URI,      // Uniform Resource Identifier
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    UI1(u8),
    UI2(u16),
    UI4(u32),
    I1(i8),
    I2(i16),
    I4(i32),
    R4(f32),
    R8(f64),
    Boolean(bool),
    Char(char),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    UUID(Uuid),
    URI(Url),
}

impl PrimitiveType {
    /// Tous les types primitifs, dans un ordre stable.
    pub const ALL: [PrimitiveType; 16] = [
        PrimitiveType::UI1,
        PrimitiveType::UI2,
        PrimitiveType::UI4,
        PrimitiveType::I1,
        PrimitiveType::I2,
        PrimitiveType::I4,
        PrimitiveType::R4,
        PrimitiveType::R8,
        PrimitiveType::Boolean,
        PrimitiveType::Char,
        PrimitiveType::String,
        PrimitiveType::Date,
        PrimitiveType::DateTime,
        PrimitiveType::Time,
        PrimitiveType::UUID,
        PrimitiveType::URI,
    ];

    /// Nom du type dans le registre (sans préfixe).
    ///
    /// `char` et `uuid` n'existent pas dans XML Schema : ce nom les distingue
    /// de `string` dans le registre, mais les schémas publiés utilisent
    /// [`PrimitiveType::schema_type`].
    pub fn xsd_name(&self) -> &'static str {
        match self {
            PrimitiveType::UI1 => "unsignedByte",
            PrimitiveType::UI2 => "unsignedShort",
            PrimitiveType::UI4 => "unsignedInt",
            PrimitiveType::I1 => "byte",
            PrimitiveType::I2 => "short",
            PrimitiveType::I4 => "int",
            PrimitiveType::R4 => "float",
            PrimitiveType::R8 => "double",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Char => "char",
            PrimitiveType::String => "string",
            PrimitiveType::Date => "date",
            PrimitiveType::DateTime => "dateTime",
            PrimitiveType::Time => "time",
            PrimitiveType::UUID => "uuid",
            PrimitiveType::URI => "anyURI",
        }
    }

    /// Type XML Schema réellement publié dans un WSDL.
    pub fn schema_type(&self) -> &'static str {
        match self {
            PrimitiveType::Char | PrimitiveType::UUID => "string",
            other => other.xsd_name(),
        }
    }

    /// Parse une chaîne selon ce type.
    ///
    /// # Examples
    ///
    /// ```
    /// use pmoxsd::{PrimitiveType, PrimitiveValue};
    ///
    /// let value = PrimitiveType::UI4.parse("42").unwrap();
    /// assert_eq!(value, PrimitiveValue::UI4(42));
    ///
    /// let value = PrimitiveType::Boolean.parse("yes").unwrap();
    /// assert_eq!(value, PrimitiveValue::Boolean(true));
    /// ```
    pub fn parse(&self, s: &str) -> Result<PrimitiveValue, XsdError> {
        let invalid = |reason: String| XsdError::InvalidValue {
            type_name: self.to_string(),
            value: s.to_string(),
            reason,
        };

        // Les chaînes sont conservées telles quelles, le reste est nettoyé
        let t = s.trim();

        match self {
            PrimitiveType::UI1 => t.parse::<u8>().map(PrimitiveValue::UI1).map_err(|e| invalid(e.to_string())),
            PrimitiveType::UI2 => t.parse::<u16>().map(PrimitiveValue::UI2).map_err(|e| invalid(e.to_string())),
            PrimitiveType::UI4 => t.parse::<u32>().map(PrimitiveValue::UI4).map_err(|e| invalid(e.to_string())),
            PrimitiveType::I1 => t.parse::<i8>().map(PrimitiveValue::I1).map_err(|e| invalid(e.to_string())),
            PrimitiveType::I2 => t.parse::<i16>().map(PrimitiveValue::I2).map_err(|e| invalid(e.to_string())),
            PrimitiveType::I4 => t.parse::<i32>().map(PrimitiveValue::I4).map_err(|e| invalid(e.to_string())),
            PrimitiveType::R4 => t.parse::<f32>().map(PrimitiveValue::R4).map_err(|e| invalid(e.to_string())),
            PrimitiveType::R8 => t.parse::<f64>().map(PrimitiveValue::R8).map_err(|e| invalid(e.to_string())),
            PrimitiveType::Boolean => match t.to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(PrimitiveValue::Boolean(true)),
                "false" | "0" | "no" => Ok(PrimitiveValue::Boolean(false)),
                _ => Err(invalid("not a boolean".to_string())),
            },
            PrimitiveType::Char => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(PrimitiveValue::Char(c)),
                    _ => Err(invalid("expected exactly one character".to_string())),
                }
            }
            PrimitiveType::String => Ok(PrimitiveValue::String(s.to_string())),
            PrimitiveType::Date => NaiveDate::parse_from_str(t, "%Y-%m-%d")
                .map(PrimitiveValue::Date)
                .map_err(|e| invalid(e.to_string())),
            PrimitiveType::DateTime => NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S%.f"))
                .map(PrimitiveValue::DateTime)
                .map_err(|e| invalid(e.to_string())),
            PrimitiveType::Time => NaiveTime::parse_from_str(t, "%H:%M:%S%.f")
                .map(PrimitiveValue::Time)
                .map_err(|e| invalid(e.to_string())),
            PrimitiveType::UUID => Uuid::parse_str(t)
                .map(PrimitiveValue::UUID)
                .map_err(|e| invalid(e.to_string())),
            PrimitiveType::URI => Url::parse(t)
                .map(PrimitiveValue::URI)
                .map_err(|e| invalid(e.to_string())),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            PrimitiveType::UI1 => "ui1",
            PrimitiveType::UI2 => "ui2",
            PrimitiveType::UI4 => "ui4",
            PrimitiveType::I1 => "i1",
            PrimitiveType::I2 => "i2",
            PrimitiveType::I4 => "i4",
            PrimitiveType::R4 => "r4",
            PrimitiveType::R8 => "r8",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Char => "char",
            PrimitiveType::String => "string",
            PrimitiveType::Date => "date",
            PrimitiveType::DateTime => "dateTime",
            PrimitiveType::Time => "time",
            PrimitiveType::UUID => "uuid",
            PrimitiveType::URI => "uri",
        };
        write!(f, "{}", s)
    }
}

impl PrimitiveValue {
    /// Type primitif porté par la valeur.
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            PrimitiveValue::UI1(_) => PrimitiveType::UI1,
            PrimitiveValue::UI2(_) => PrimitiveType::UI2,
            PrimitiveValue::UI4(_) => PrimitiveType::UI4,
            PrimitiveValue::I1(_) => PrimitiveType::I1,
            PrimitiveValue::I2(_) => PrimitiveType::I2,
            PrimitiveValue::I4(_) => PrimitiveType::I4,
            PrimitiveValue::R4(_) => PrimitiveType::R4,
            PrimitiveValue::R8(_) => PrimitiveType::R8,
            PrimitiveValue::Boolean(_) => PrimitiveType::Boolean,
            PrimitiveValue::Char(_) => PrimitiveType::Char,
            PrimitiveValue::String(_) => PrimitiveType::String,
            PrimitiveValue::Date(_) => PrimitiveType::Date,
            PrimitiveValue::DateTime(_) => PrimitiveType::DateTime,
            PrimitiveValue::Time(_) => PrimitiveType::Time,
            PrimitiveValue::UUID(_) => PrimitiveType::UUID,
            PrimitiveValue::URI(_) => PrimitiveType::URI,
        }
    }

    /// Convertit la valeur vers un autre type primitif en passant par sa
    /// forme lexicale.
    pub fn coerce(&self, target: PrimitiveType) -> Result<PrimitiveValue, XsdError> {
        if self.primitive_type() == target {
            return Ok(self.clone());
        }
        target.parse(&self.to_string())
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Numériques
            PrimitiveValue::UI1(v) => write!(f, "{}", v),
            PrimitiveValue::UI2(v) => write!(f, "{}", v),
            PrimitiveValue::UI4(v) => write!(f, "{}", v),
            PrimitiveValue::I1(v) => write!(f, "{}", v),
            PrimitiveValue::I2(v) => write!(f, "{}", v),
            PrimitiveValue::I4(v) => write!(f, "{}", v),
            PrimitiveValue::R4(v) => write!(f, "{}", v),
            PrimitiveValue::R8(v) => write!(f, "{}", v),

            // Booléen : 1 ou 0
            PrimitiveValue::Boolean(v) => write!(f, "{}", if *v { "1" } else { "0" }),

            PrimitiveValue::Char(v) => write!(f, "{}", v),
            PrimitiveValue::String(v) => write!(f, "{}", v),
            PrimitiveValue::UUID(v) => write!(f, "{}", v),
            PrimitiveValue::URI(v) => write!(f, "{}", v),

            // Dates et temps
            PrimitiveValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            PrimitiveValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            PrimitiveValue::Time(v) => write!(f, "{}", v.format("%H:%M:%S%.f")),
        }
    }
}
