//! Descripteurs de types.
//!
//! Un [`TypeDescriptor`] décrit un type nommé `(namespace, name)` :
//! primitif, énumération, structure ou binaire. Les descripteurs sont
//! immuables et partagés via `Arc`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::{NS_XSD, PrimitiveType, XsdError};

/// Nom qualifié d'un type ou d'un élément XML.
///
/// Affiché en notation de Clark : `{namespace}name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(PrimitiveType),
    /// Valeurs nommées, dans l'ordre de déclaration.
    Enum(Vec<String>),
    /// Champs nommés, dans l'ordre de déclaration.
    Composite(Vec<Field>),
    /// Octets bruts, transportés en base64.
    Binary,
}

/// Champ d'une structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub descriptor: Arc<TypeDescriptor>,
    pub optional: bool,
}

impl Field {
    pub fn required(name: impl Into<String>, descriptor: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            descriptor,
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, descriptor: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            descriptor,
            optional: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    name: String,
    namespace: String,
    kind: TypeKind,
}

impl TypeDescriptor {
    /// Descripteur d'un type primitif, publié dans le namespace XML Schema.
    pub fn primitive(primitive: PrimitiveType) -> Arc<Self> {
        Arc::new(Self {
            name: primitive.xsd_name().to_string(),
            namespace: NS_XSD.to_string(),
            kind: TypeKind::Primitive(primitive),
        })
    }

    /// Descripteur du type binaire (`xs:base64Binary`).
    pub fn binary() -> Arc<Self> {
        Arc::new(Self {
            name: "base64Binary".to_string(),
            namespace: NS_XSD.to_string(),
            kind: TypeKind::Binary,
        })
    }

    /// Crée une énumération.
    ///
    /// # Errors
    ///
    /// Retourne [`XsdError::InvalidDescriptor`] si la liste est vide ou
    /// contient des doublons.
    ///
    /// # Examples
    ///
    /// ```
    /// use pmoxsd::TypeDescriptor;
    ///
    /// let state = TypeDescriptor::enumeration(
    ///     "TransportState",
    ///     "urn:example",
    ///     ["STOPPED", "PLAYING"],
    /// ).unwrap();
    /// assert_eq!(state.members().unwrap().len(), 2);
    /// ```
    pub fn enumeration<I, S>(
        name: impl Into<String>,
        namespace: impl Into<String>,
        members: I,
    ) -> Result<Arc<Self>, XsdError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let descriptor = Self {
            name: name.into(),
            namespace: namespace.into(),
            kind: TypeKind::Enum(members.into_iter().map(Into::into).collect()),
        };
        descriptor.validate()?;
        Ok(Arc::new(descriptor))
    }

    /// Crée une structure à champs nommés.
    pub fn composite(
        name: impl Into<String>,
        namespace: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<Arc<Self>, XsdError> {
        let descriptor = Self {
            name: name.into(),
            namespace: namespace.into(),
            kind: TypeKind::Composite(fields),
        };
        descriptor.validate()?;
        Ok(Arc::new(descriptor))
    }

    fn validate(&self) -> Result<(), XsdError> {
        let invalid = |reason: String| XsdError::InvalidDescriptor {
            name: self.qualified_name(),
            reason,
        };

        match &self.kind {
            TypeKind::Enum(members) => {
                if members.is_empty() {
                    return Err(invalid("enumeration has no member".to_string()));
                }
                let mut seen = HashSet::new();
                for m in members {
                    if !seen.insert(m.as_str()) {
                        return Err(invalid(format!("duplicate member '{}'", m)));
                    }
                }
            }
            TypeKind::Composite(fields) => {
                let mut seen = HashSet::new();
                for f in fields {
                    if !seen.insert(f.name.as_str()) {
                        return Err(invalid(format!("duplicate field '{}'", f.name)));
                    }
                }
            }
            TypeKind::Primitive(_) | TypeKind::Binary => {}
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(&self.namespace, &self.name)
    }

    /// Vrai pour les types fournis par XML Schema (primitifs et binaire).
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_) | TypeKind::Binary)
    }

    /// Membres d'une énumération, `None` pour les autres types.
    pub fn members(&self) -> Option<&[String]> {
        match &self.kind {
            TypeKind::Enum(members) => Some(members),
            _ => None,
        }
    }

    /// Champs d'une structure, `None` pour les autres types.
    pub fn fields(&self) -> Option<&[Field]> {
        match &self.kind {
            TypeKind::Composite(fields) => Some(fields),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_rejects_duplicates() {
        let r = TypeDescriptor::enumeration("E", "urn:t", ["A", "B", "A"]);
        assert!(matches!(r, Err(XsdError::InvalidDescriptor { .. })));
    }

    #[test]
    fn test_enum_rejects_empty() {
        let r = TypeDescriptor::enumeration("E", "urn:t", Vec::<String>::new());
        assert!(r.is_err());
    }

    #[test]
    fn test_composite_rejects_duplicate_fields() {
        let s = TypeDescriptor::primitive(PrimitiveType::String);
        let r = TypeDescriptor::composite(
            "C",
            "urn:t",
            vec![Field::required("a", s.clone()), Field::optional("a", s)],
        );
        assert!(r.is_err());
    }

    #[test]
    fn test_primitive_lives_in_xsd_namespace() {
        let d = TypeDescriptor::primitive(PrimitiveType::UI4);
        assert_eq!(d.namespace(), NS_XSD);
        assert_eq!(d.name(), "unsignedInt");
        assert!(d.is_builtin());
    }

    #[test]
    fn test_qualified_name_display() {
        let q = QualifiedName::new("urn:t", "Foo");
        assert_eq!(q.to_string(), "{urn:t}Foo");
    }
}
