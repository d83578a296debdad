//! Corps GENA `e:propertyset` d'une notification.

use pmoxsd::xml::{element, push, text_element, to_document};

use super::{EventError, Notification};

/// Namespace GENA
pub const NS_GENA_EVENT: &str = "urn:schemas-upnp-org:event-1-0";

/// Un `e:property` par variable de la notification.
pub fn render_property_set(notification: &Notification) -> Result<String, EventError> {
    let mut set = element("e:propertyset", &[("xmlns:e", NS_GENA_EVENT)]);
    for (name, value) in &notification.variables {
        let mut property = element("e:property", &[]);
        push(&mut property, text_element(name, value));
        push(&mut set, property);
    }
    Ok(to_document(&set)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmltree::Element;

    #[test]
    fn test_property_set() {
        let n = Notification::new(
            "uuid",
            "SwitchPower",
            vec![("Status".to_string(), "1".to_string())],
        );
        let xml = render_property_set(&n).unwrap();

        let root = Element::parse(xml.as_bytes()).unwrap();
        assert_eq!(root.name, "propertyset");
        assert_eq!(root.namespace.as_deref(), Some(NS_GENA_EVENT));
        let status = root
            .get_child("property")
            .and_then(|p| p.get_child("Status"))
            .unwrap();
        assert_eq!(status.get_text().unwrap(), "1");
    }

    #[test]
    fn test_last_change_is_escaped_text() {
        let doc = crate::events::render_last_change(
            crate::events::NS_RCS_EVENT,
            &[("Volume".to_string(), "50".to_string())],
        )
        .unwrap();
        let n = Notification::new("uuid", "RenderingControl", vec![("LastChange".to_string(), doc.clone())]);
        let xml = render_property_set(&n).unwrap();

        let root = Element::parse(xml.as_bytes()).unwrap();
        let last_change = root
            .get_child("property")
            .and_then(|p| p.get_child("LastChange"))
            .unwrap();
        assert_eq!(last_change.get_text().unwrap(), doc);
    }
}
