//! Document de description d'un device (`desc.xml`).

use std::sync::Arc;

use pmoxsd::xml::{element, push, text_element, to_document};

use super::{DeviceError, DeviceManifest, DeviceProperties};
use crate::services::Service;

/// Namespace du schéma de description de device
pub const NS_DEVICE: &str = "urn:schemas-upnp-org:device-1-0";

/// Chemin de montage d'un device.
pub fn mount_path(uuid: &str) -> String {
    format!("/device/{}", uuid)
}

/// URLs d'un service, dérivées du chemin de montage du device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    pub description: String,
    pub control: String,
    pub event: String,
}

impl ServiceUrls {
    pub fn new(mount: &str, service: &str) -> Self {
        let base = format!("{}/service/{}", mount, service);
        Self {
            description: format!("{}/desc.xml", base),
            control: format!("{}/control", base),
            event: format!("{}/event", base),
        }
    }
}

/// Construit la description d'un device.
///
/// Les champs d'affichage vides sont omis ; le fabricant retombe sur
/// `default_manufacturer`.
pub fn build_device_description(
    uuid: &str,
    manifest: &DeviceManifest,
    properties: &DeviceProperties,
    services: &[Arc<Service>],
    default_manufacturer: &str,
    config_id: u32,
) -> Result<String, DeviceError> {
    let mut root = element(
        "root",
        &[("xmlns", NS_DEVICE), ("configId", config_id.to_string().as_str())],
    );

    let mut spec = element("specVersion", &[]);
    push(&mut spec, text_element("major", &properties.spec_major.to_string()));
    push(&mut spec, text_element("minor", &properties.spec_minor.to_string()));
    push(&mut root, spec);

    let mut device = element("device", &[]);
    push(&mut device, text_element("deviceType", &properties.urn()));

    let manufacturer = manifest
        .manufacturer
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(default_manufacturer);

    let fields = [
        ("friendlyName", Some(manifest.display_name.as_str())),
        ("manufacturer", Some(manufacturer)),
        ("modelDescription", manifest.description.as_deref()),
        ("modelName", Some(manifest.model_name())),
        ("modelNumber", manifest.model_number.as_deref()),
    ];
    for (tag, value) in fields {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            push(&mut device, text_element(tag, value));
        }
    }

    push(&mut device, text_element("UDN", &format!("uuid:{}", uuid)));

    if !services.is_empty() {
        let mount = mount_path(uuid);
        let mut list = element("serviceList", &[]);
        for service in services {
            let urls = ServiceUrls::new(&mount, service.name());
            let mut entry = element("service", &[]);
            push(&mut entry, text_element("serviceType", service.urn()));
            push(&mut entry, text_element("serviceId", service.descriptor().service_id()));
            push(&mut entry, text_element("SCPDURL", &urls.description));
            push(&mut entry, text_element("controlURL", &urls.control));
            push(&mut entry, text_element("eventSubURL", &urls.event));
            push(&mut list, entry);
        }
        push(&mut device, list);
    }

    push(&mut root, device);
    Ok(to_document(&root)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_handler;
    use crate::services::{ActionOutput, ServiceBuilder};
    use pmoxsd::{OperationSignature, PrimitiveType, ServiceDescriptor, TypeDescriptor};
    use xmltree::Element;

    fn switch_power() -> Arc<Service> {
        let mut d = ServiceDescriptor::new("SwitchPower", "urn:upnp-org:serviceId:SwitchPower:1", 1);
        d.add_operation(
            OperationSignature::new("GetStatus")
                .with_output("ResultStatus", TypeDescriptor::primitive(PrimitiveType::Boolean)),
        )
        .unwrap();
        Arc::new(
            ServiceBuilder::new(d)
                .handler("GetStatus", action_handler!(|_a| Ok(ActionOutput::new().with("ResultStatus", false))))
                .build()
                .unwrap(),
        )
    }

    fn text(parent: &Element, name: &str) -> Option<String> {
        parent.get_child(name).and_then(|e| e.get_text()).map(|t| t.into_owned())
    }

    #[test]
    fn test_description_document() {
        let manifest = DeviceManifest::new("Lamp").with_model_number("42");
        let props = DeviceProperties::new("BinaryLight", 1);
        let xml = build_device_description("abc", &manifest, &props, &[switch_power()], "PMOBridge", 7)
            .unwrap();

        let root = Element::parse(xml.as_bytes()).unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.namespace.as_deref(), Some(NS_DEVICE));
        assert_eq!(root.attributes.get("configId").map(String::as_str), Some("7"));

        let spec = root.get_child("specVersion").unwrap();
        assert_eq!(text(spec, "major").as_deref(), Some("1"));
        assert_eq!(text(spec, "minor").as_deref(), Some("0"));

        let device = root.get_child("device").unwrap();
        assert_eq!(
            text(device, "deviceType").as_deref(),
            Some("urn:schemas-upnp-org:device:BinaryLight:1")
        );
        assert_eq!(text(device, "friendlyName").as_deref(), Some("Lamp"));
        assert_eq!(text(device, "manufacturer").as_deref(), Some("PMOBridge"));
        assert_eq!(text(device, "modelName").as_deref(), Some("Lamp"));
        assert_eq!(text(device, "modelNumber").as_deref(), Some("42"));
        assert!(device.get_child("modelDescription").is_none());
        assert_eq!(text(device, "UDN").as_deref(), Some("uuid:abc"));

        let service = device
            .get_child("serviceList")
            .and_then(|l| l.get_child("service"))
            .unwrap();
        assert_eq!(
            text(service, "serviceType").as_deref(),
            Some("urn:schemas-upnp-org:service:SwitchPower:1")
        );
        assert_eq!(
            text(service, "serviceId").as_deref(),
            Some("urn:upnp-org:serviceId:SwitchPower:1")
        );
        assert_eq!(
            text(service, "SCPDURL").as_deref(),
            Some("/device/abc/service/SwitchPower/desc.xml")
        );
        assert_eq!(
            text(service, "controlURL").as_deref(),
            Some("/device/abc/service/SwitchPower/control")
        );
        assert_eq!(
            text(service, "eventSubURL").as_deref(),
            Some("/device/abc/service/SwitchPower/event")
        );
    }

    #[test]
    fn test_no_service_list_without_services() {
        let manifest = DeviceManifest::new("Bare").with_manufacturer("Acme");
        let props = DeviceProperties::new("Basic", 1);
        let xml = build_device_description("x", &manifest, &props, &[], "PMOBridge", 1).unwrap();

        let root = Element::parse(xml.as_bytes()).unwrap();
        let device = root.get_child("device").unwrap();
        assert!(device.get_child("serviceList").is_none());
        assert_eq!(text(device, "manufacturer").as_deref(), Some("Acme"));
    }
}
