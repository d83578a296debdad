//! Service ConnectionManager:1 d'un lecteur.

use std::sync::Arc;

use pmoupnp::services::{ActionOutput, Service, ServiceBuilder, ServiceError};
use pmoupnp::{action_handler, define_operation};
use pmoxsd::ServiceDescriptor;

use crate::types::STRING;
use crate::{MediaPlayer, ServiceContext, ServiceKind};

define_operation! {
    pub static GET_PROTOCOL_INFO = "GetProtocolInfo" {
        out "Source" => STRING,
        out "Sink" => STRING,
    }
}

define_operation! {
    pub static GET_CURRENT_CONNECTION_IDS = "GetCurrentConnectionIDs" {
        out "ConnectionIDs" => STRING,
    }
}

pub fn descriptor() -> Result<ServiceDescriptor, ServiceError> {
    let kind = ServiceKind::ConnectionManager;
    let mut d = ServiceDescriptor::new(kind.service_type(), kind.service_id(), kind.version());
    d.add_operation(GET_PROTOCOL_INFO.clone())?;
    d.add_operation(GET_CURRENT_CONNECTION_IDS.clone())?;
    Ok(d)
}

/// Liste `Sink` : types de médias séparés par des virgules.
pub fn sink_protocol_info(player: &dyn MediaPlayer) -> String {
    player.supported_media_types().join(",")
}

/// Service sans état : une seule connexion, d'identifiant 0.
pub fn service(provider: Arc<dyn MediaPlayer>, ctx: &ServiceContext) -> Result<Service, ServiceError> {
    ServiceBuilder::new(descriptor()?)
        .types(ctx.types.clone())
        .handler(
            GET_PROTOCOL_INFO.name(),
            action_handler!(|_args| {
                Ok(ActionOutput::new()
                    .with("Source", "")
                    .with("Sink", sink_protocol_info(provider.as_ref())))
            }),
        )
        .handler(
            GET_CURRENT_CONNECTION_IDS.name(),
            action_handler!(|_args| Ok(ActionOutput::new().with("ConnectionIDs", "0"))),
        )
        .build()
}
