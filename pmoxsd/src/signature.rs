//! Signatures d'opérations et descripteurs de services.

use std::sync::Arc;

use crate::{TypeDescriptor, XsdError};

/// Paramètre nommé d'une opération.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub descriptor: Arc<TypeDescriptor>,
}

/// Signature d'une opération : paramètres d'entrée et de sortie, ordonnés.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSignature {
    name: String,
    inputs: Vec<Parameter>,
    outputs: Vec<Parameter>,
}

impl OperationSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, descriptor: Arc<TypeDescriptor>) -> Self {
        self.inputs.push(Parameter {
            name: name.into(),
            descriptor,
        });
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, descriptor: Arc<TypeDescriptor>) -> Self {
        self.outputs.push(Parameter {
            name: name.into(),
            descriptor,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[Parameter] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Parameter] {
        &self.outputs
    }

    /// Nom de l'élément de réponse : `<Name>Response`.
    pub fn response_name(&self) -> String {
        format!("{}Response", self.name)
    }
}

/// Description d'un service : type, identifiant, version, opérations et
/// variables évènementielles.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    service_type: String,
    service_id: String,
    version: u32,
    operations: Vec<OperationSignature>,
    evented: Vec<String>,
}

impl ServiceDescriptor {
    pub fn new(service_type: impl Into<String>, service_id: impl Into<String>, version: u32) -> Self {
        Self {
            service_type: service_type.into(),
            service_id: service_id.into(),
            version,
            operations: Vec::new(),
            evented: Vec::new(),
        }
    }

    /// Ajoute une opération.
    ///
    /// # Errors
    ///
    /// [`XsdError::DuplicateOperation`] si une opération de même nom existe.
    pub fn add_operation(&mut self, operation: OperationSignature) -> Result<(), XsdError> {
        if self.operation(operation.name()).is_some() {
            return Err(XsdError::DuplicateOperation(operation.name().to_string()));
        }
        self.operations.push(operation);
        Ok(())
    }

    pub fn add_evented(&mut self, variable: impl Into<String>) {
        let variable = variable.into();
        if !self.evented.contains(&variable) {
            self.evented.push(variable);
        }
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// `<type>:<version>`, par exemple `SwitchPower:1`.
    pub fn type_version(&self) -> String {
        format!("{}:{}", self.service_type, self.version)
    }

    pub fn operations(&self) -> &[OperationSignature] {
        &self.operations
    }

    /// Recherche exacte (sensible à la casse).
    pub fn operation(&self, name: &str) -> Option<&OperationSignature> {
        self.operations.iter().find(|o| o.name() == name)
    }

    pub fn evented(&self) -> &[String] {
        &self.evented
    }
}
