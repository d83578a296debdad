//! Erreurs du registre de types et du codec XML.

use thiserror::Error;

use crate::QualifiedName;

/// Erreurs liées aux types, à l'encodage et au décodage XML.
#[derive(Error, Debug)]
pub enum XsdError {
    /// Un type avec le même `(namespace, name)` est déjà enregistré
    #[error("Type {0} is already registered")]
    DuplicateType(QualifiedName),

    /// Deux descripteurs différents portent le même nom qualifié
    #[error("Conflicting definitions for type {0}")]
    ConflictingType(QualifiedName),

    /// Type absent du registre
    #[error("Type {0} is not registered")]
    UnknownType(QualifiedName),

    /// Descripteur mal formé (membres d'enum dupliqués, champ dupliqué...)
    #[error("Invalid descriptor {name}: {reason}")]
    InvalidDescriptor { name: QualifiedName, reason: String },

    /// L'élément XML ne correspond pas au descripteur attendu
    #[error("Schema mismatch: expected element {expected}, found {found}")]
    SchemaMismatch {
        expected: QualifiedName,
        found: QualifiedName,
    },

    /// Valeur d'enum inconnue
    #[error("'{member}' is not a member of {type_name}")]
    UnknownMember {
        type_name: QualifiedName,
        member: String,
    },

    /// Contenu base64 invalide
    #[error("Malformed base64 payload: {0}")]
    MalformedBinary(String),

    /// Valeur lexicale invalide pour un type primitif
    #[error("Invalid value '{value}' for type {type_name}: {reason}")]
    InvalidValue {
        type_name: String,
        value: String,
        reason: String,
    },

    /// Champ obligatoire absent d'une structure
    #[error("Missing required field '{field}' in {type_name}")]
    MissingField {
        type_name: QualifiedName,
        field: String,
    },

    /// Champ inconnu dans une valeur composite
    #[error("Unknown field '{field}' for {type_name}")]
    UnknownField {
        type_name: QualifiedName,
        field: String,
    },

    /// La valeur n'est pas de la forme attendue par le descripteur
    #[error("Value does not fit type {expected}: got {found}")]
    TypeMismatch {
        expected: QualifiedName,
        found: String,
    },

    /// Opération déclarée deux fois dans un même service
    #[error("Operation '{0}' is already declared")]
    DuplicateOperation(String),

    /// Erreur de sérialisation XML
    #[error("XML write error: {0}")]
    Xml(#[from] xmltree::Error),
}
