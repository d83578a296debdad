//! Dispatcher d'actions de contrôle.
//!
//! Une requête traverse les étapes
//! `Received → Parsed → Validated → Invoked → Encoded | Faulted`.
//! Toute erreur est traduite en code UPnP avant de quitter ce module.

use std::fmt;

use tracing::{debug, warn};

use super::{ActionArgs, Service};
use crate::soap::{UpnpError, build_soap_envelope, error_codes, parse_soap_action, response_element};

/// Étape atteinte par une requête de contrôle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Received,
    Parsed,
    Validated,
    Invoked,
    Encoded,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DispatchStage::Received => "RECEIVED",
            DispatchStage::Parsed => "PARSED",
            DispatchStage::Validated => "VALIDATED",
            DispatchStage::Invoked => "INVOKED",
            DispatchStage::Encoded => "ENCODED",
        };
        f.write_str(s)
    }
}

/// Requête passée à l'état FAULTED : dernière étape atteinte et erreur UPnP.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fault after {stage}: {error}")]
pub struct ControlFault {
    pub stage: DispatchStage,
    pub error: UpnpError,
}

impl ControlFault {
    fn new(stage: DispatchStage, error: UpnpError) -> Self {
        Self { stage, error }
    }

    pub fn code(&self) -> u16 {
        self.error.code
    }
}

/// Traite une enveloppe de contrôle destinée à `service`.
///
/// Retourne l'enveloppe de réponse sérialisée, ou la faute à renvoyer.
pub fn dispatch(service: &Service, body: &[u8]) -> Result<String, ControlFault> {
    // RECEIVED → PARSED
    let action = parse_soap_action(body).map_err(|e| {
        debug!("Unparseable control envelope for {}: {}", service.name(), e);
        ControlFault::new(
            DispatchStage::Received,
            UpnpError::from_code(error_codes::INVALID_ACTION),
        )
    })?;

    let stage = DispatchStage::Parsed;
    let invalid_action = || ControlFault::new(stage, UpnpError::from_code(error_codes::INVALID_ACTION));

    if action.namespace.as_deref() != Some(service.urn()) {
        warn!(
            "Action {} sent to {} with namespace {:?}",
            action.name,
            service.urn(),
            action.namespace
        );
        return Err(invalid_action());
    }

    let Some(signature) = service.descriptor().operation(&action.name) else {
        warn!("Unknown action {} on service {}", action.name, service.name());
        return Err(invalid_action());
    };
    let Some(handler) = service.handler(signature.name()) else {
        return Err(invalid_action());
    };

    // PARSED → VALIDATED
    let mut args = ActionArgs::new();
    for param in signature.inputs() {
        let element = action.arg(&param.name).ok_or_else(|| {
            debug!("Missing argument {} for {}", param.name, action.name);
            ControlFault::new(stage, UpnpError::from_code(error_codes::INVALID_ARGS))
        })?;
        let value = service.types().decode_content(element, &param.descriptor).map_err(|e| {
            debug!("Invalid argument {} for {}: {}", param.name, action.name, e);
            ControlFault::new(stage, UpnpError::from_code(error_codes::INVALID_ARGS))
        })?;
        args.insert(param.name.clone(), value);
    }

    // VALIDATED → INVOKED
    let stage = DispatchStage::Validated;
    let output = handler(&args).map_err(|e| {
        warn!("Action {}.{} failed: {}", service.name(), action.name, e);
        ControlFault::new(stage, e.to_upnp())
    })?;

    // INVOKED → ENCODED
    let stage = DispatchStage::Invoked;
    let action_failed = || ControlFault::new(stage, UpnpError::from_code(error_codes::ACTION_FAILED));

    let mut response = response_element(service.urn(), signature.name());
    for param in signature.outputs() {
        let value = output.get(&param.name).ok_or_else(|| {
            warn!("Action {} did not produce output {}", action.name, param.name);
            action_failed()
        })?;
        service.types().encode_named(value, &param.descriptor, &param.name, &mut response).map_err(|e| {
            warn!("Cannot encode output {} of {}: {}", param.name, action.name, e);
            action_failed()
        })?;
    }

    let xml = build_soap_envelope(response).map_err(|e| {
        warn!("Cannot serialize response of {}: {}", action.name, e);
        action_failed()
    })?;

    debug!("✅ {}.{} → {}", service.name(), action.name, DispatchStage::Encoded);
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pmoxsd::{OperationSignature, PrimitiveType, ServiceDescriptor, TypeDescriptor};
    use parking_lot::Mutex;
    use xmltree::Element;

    use super::*;
    use crate::action_handler;
    use crate::services::{ActionError, ActionOutput, ServiceBuilder};
    use crate::soap::build_soap_request;

    const URN: &str = "urn:schemas-upnp-org:service:Dimming:1";

    fn dimming(level: Arc<Mutex<u8>>) -> Service {
        let ui1 = TypeDescriptor::primitive(PrimitiveType::UI1);
        let mut d = ServiceDescriptor::new("Dimming", "Dimming", 1);
        d.add_operation(OperationSignature::new("SetLoadLevelTarget").with_input("newLoadlevelTarget", ui1.clone()))
            .unwrap();
        d.add_operation(
            OperationSignature::new("GetLoadLevelStatus")
                .with_output("RetLoadlevelStatus", ui1.clone())
                .with_output("Extra", TypeDescriptor::primitive(PrimitiveType::String)),
        )
        .unwrap();
        d.add_operation(OperationSignature::new("Broken").with_output("Missing", ui1))
            .unwrap();

        let set_level = level.clone();
        ServiceBuilder::new(d)
            .handler(
                "SetLoadLevelTarget",
                action_handler!(|args| {
                    let v = args.i64("newLoadlevelTarget")?;
                    if v > 100 {
                        return Err(ActionError::upnp(601, "Argument Value Out of Range"));
                    }
                    *set_level.lock() = v as u8;
                    Ok(ActionOutput::new())
                }),
            )
            .handler(
                "GetLoadLevelStatus",
                action_handler!(|_args| {
                    Ok(ActionOutput::new()
                        .with("Extra", "x")
                        .with("RetLoadlevelStatus", *level.lock()))
                }),
            )
            .handler("Broken", action_handler!(|_args| Ok(ActionOutput::new())))
            .build()
            .unwrap()
    }

    #[test]
    fn test_successful_dispatch_orders_outputs() {
        let level = Arc::new(Mutex::new(0u8));
        let service = dimming(level.clone());

        let req = build_soap_request(URN, "SetLoadLevelTarget", &[("newLoadlevelTarget", "75")]).unwrap();
        dispatch(&service, req.as_bytes()).unwrap();
        assert_eq!(*level.lock(), 75);

        let req = build_soap_request(URN, "GetLoadLevelStatus", &[]).unwrap();
        let xml = dispatch(&service, req.as_bytes()).unwrap();

        let root = Element::parse(xml.as_bytes()).unwrap();
        let response = root
            .get_child("Body")
            .and_then(|b| b.get_child("GetLoadLevelStatusResponse"))
            .unwrap();
        assert_eq!(response.namespace.as_deref(), Some(URN));

        let names: Vec<_> = response
            .children
            .iter()
            .filter_map(|n| n.as_element())
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["RetLoadlevelStatus", "Extra"]);
        assert_eq!(
            response.get_child("RetLoadlevelStatus").unwrap().get_text().unwrap(),
            "75"
        );
    }

    #[test]
    fn test_unknown_action_is_401() {
        let service = dimming(Arc::new(Mutex::new(0)));
        let req = build_soap_request(URN, "SetLoadLevel", &[]).unwrap();
        let fault = dispatch(&service, req.as_bytes()).unwrap_err();
        assert_eq!(fault.code(), 401);
        assert_eq!(fault.stage, DispatchStage::Parsed);
    }

    #[test]
    fn test_action_name_is_case_sensitive() {
        let service = dimming(Arc::new(Mutex::new(0)));
        let req = build_soap_request(URN, "getloadlevelstatus", &[]).unwrap();
        assert_eq!(dispatch(&service, req.as_bytes()).unwrap_err().code(), 401);
    }

    #[test]
    fn test_garbage_is_401() {
        let service = dimming(Arc::new(Mutex::new(0)));
        let fault = dispatch(&service, b"<<<").unwrap_err();
        assert_eq!(fault.code(), 401);
        assert_eq!(fault.stage, DispatchStage::Received);
    }

    #[test]
    fn test_wrong_namespace_is_401() {
        let service = dimming(Arc::new(Mutex::new(0)));
        let req = build_soap_request("urn:schemas-upnp-org:service:SwitchPower:1", "GetLoadLevelStatus", &[]).unwrap();
        assert_eq!(dispatch(&service, req.as_bytes()).unwrap_err().code(), 401);
    }

    #[test]
    fn test_missing_argument_is_402() {
        let service = dimming(Arc::new(Mutex::new(0)));
        let req = build_soap_request(URN, "SetLoadLevelTarget", &[]).unwrap();
        assert_eq!(dispatch(&service, req.as_bytes()).unwrap_err().code(), 402);
    }

    #[test]
    fn test_malformed_argument_is_402() {
        let service = dimming(Arc::new(Mutex::new(0)));
        let req = build_soap_request(URN, "SetLoadLevelTarget", &[("newLoadlevelTarget", "lots")]).unwrap();
        assert_eq!(dispatch(&service, req.as_bytes()).unwrap_err().code(), 402);
    }

    #[test]
    fn test_domain_error_passes_through() {
        let service = dimming(Arc::new(Mutex::new(0)));
        let req = build_soap_request(URN, "SetLoadLevelTarget", &[("newLoadlevelTarget", "200")]).unwrap();
        let fault = dispatch(&service, req.as_bytes()).unwrap_err();
        assert_eq!(fault.code(), 601);
        assert_eq!(fault.stage, DispatchStage::Validated);
    }

    #[test]
    fn test_missing_output_is_501() {
        let service = dimming(Arc::new(Mutex::new(0)));
        let req = build_soap_request(URN, "Broken", &[]).unwrap();
        let fault = dispatch(&service, req.as_bytes()).unwrap_err();
        assert_eq!(fault.code(), 501);
        assert_eq!(fault.stage, DispatchStage::Invoked);
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let level = Arc::new(Mutex::new(0u8));
        let service = dimming(level.clone());
        let req = build_soap_request(
            URN,
            "SetLoadLevelTarget",
            &[("newLoadlevelTarget", "10"), ("Unexpected", "1")],
        )
        .unwrap();
        dispatch(&service, req.as_bytes()).unwrap();
        assert_eq!(*level.lock(), 10);
    }
}
