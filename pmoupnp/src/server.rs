//! Adaptateur HTTP (axum) des devices enregistrés.
//!
//! Routes exposées :
//!
//! - `GET  /device/{uuid}/desc.xml` : description du device
//! - `GET  /device/{uuid}/service/{name}/desc.xml` : schéma du service
//! - `POST /device/{uuid}/service/{name}/control` : requêtes de contrôle
//!
//! Les abonnements aux évènements ne sont pas servis ici.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use pmoxsd::WsdlBuilder;
use tracing::{debug, error, info};

use crate::devices::{DeviceRegistry, ServiceUrls, mount_path};
use crate::services::dispatch;
use crate::soap::build_soap_fault;

const XML_CONTENT_TYPE: &str = "text/xml; charset=\"utf-8\"";

/// État partagé des handlers.
#[derive(Clone)]
pub struct UpnpState {
    pub registry: Arc<DeviceRegistry>,
    /// Préfixe des URLs publiées (ex: `http://192.168.1.10:8080`)
    pub base_url: String,
}

/// Construit le routeur des devices de `registry`.
pub fn router(registry: Arc<DeviceRegistry>, base_url: impl Into<String>) -> Router {
    let state = UpnpState {
        registry,
        base_url: base_url.into(),
    };

    Router::new()
        .route("/device/{uuid}/desc.xml", get(device_description))
        .route("/device/{uuid}/service/{name}/desc.xml", get(service_description))
        .route("/device/{uuid}/service/{name}/control", post(control_handler))
        .with_state(state)
}

fn xml(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response()
}

async fn device_description(
    State(state): State<UpnpState>,
    Path(uuid): Path<String>,
) -> Response {
    match state.registry.get(&uuid) {
        Some(device) => xml(StatusCode::OK, device.description().to_string()),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn service_description(
    State(state): State<UpnpState>,
    Path((uuid, name)): Path<(String, String)>,
) -> Response {
    let Some(service) = state.registry.service(&uuid, &name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let control = ServiceUrls::new(&mount_path(&uuid), &name).control;
    let builder = WsdlBuilder::new(service.name(), service.urn())
        .with_location(format!("{}{}", state.base_url, control));

    match builder.to_xml(&[service.descriptor()]) {
        Ok(doc) => xml(StatusCode::OK, doc),
        Err(e) => {
            error!("❌ Cannot build schema for {}: {}", name, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn control_handler(
    State(state): State<UpnpState>,
    Path((uuid, name)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let Some(service) = state.registry.service(&uuid, &name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    info!("📡 Control request for {} on {}", name, uuid);

    match dispatch(&service, &body) {
        Ok(response) => xml(StatusCode::OK, response),
        Err(fault) => {
            debug!("SOAP fault for {}: {}", name, fault);
            match build_soap_fault(&fault.error) {
                Ok(doc) => xml(StatusCode::INTERNAL_SERVER_ERROR, doc),
                Err(e) => {
                    error!("❌ Cannot serialize SOAP fault: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
    }
}
