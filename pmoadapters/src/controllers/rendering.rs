//! Service RenderingControl:1 d'un lecteur.
//!
//! Le volume est exposé en pourcentage entier ; les changements sont publiés
//! dans la variable `LastChange` (espace RCS).

use std::sync::{Arc, Weak};

use pmoupnp::events::{ChangeCoalescer, LAST_CHANGE, NS_RCS_EVENT};
use pmoupnp::services::{ActionError, ActionOutput, Service, ServiceBuilder, ServiceError};
use pmoupnp::{action_handler, define_operation};
use pmoxsd::ServiceDescriptor;
use tracing::debug;

use crate::types::{I2, STRING, UI2, UI4};
use crate::{MediaPlayer, PlayerChange, ServiceContext, ServiceKind};

/// Bornes en dB, au format 1/256 dB.
pub const MIN_VOLUME_DB: i16 = -85 * 256;
pub const MAX_VOLUME_DB: i16 = 0;

define_operation! {
    pub static GET_VOLUME = "GetVolume" {
        in "InstanceID" => UI4,
        in "Channel" => STRING,
        out "CurrentVolume" => UI2,
    }
}

define_operation! {
    pub static SET_VOLUME = "SetVolume" {
        in "InstanceID" => UI4,
        in "Channel" => STRING,
        in "DesiredVolume" => UI2,
    }
}

define_operation! {
    pub static GET_VOLUME_DB_RANGE = "GetVolumeDBRange" {
        in "InstanceID" => UI4,
        in "Channel" => STRING,
        out "MinValue" => I2,
        out "MaxValue" => I2,
    }
}

pub fn descriptor() -> Result<ServiceDescriptor, ServiceError> {
    let kind = ServiceKind::RenderingControl;
    let mut d = ServiceDescriptor::new(kind.service_type(), kind.service_id(), kind.version());
    d.add_operation(GET_VOLUME.clone())?;
    d.add_operation(SET_VOLUME.clone())?;
    d.add_operation(GET_VOLUME_DB_RANGE.clone())?;
    d.add_evented(LAST_CHANGE);
    Ok(d)
}

/// Volume fournisseur (0.0 à 1.0) en pourcentage.
pub fn volume_percent(volume: f64) -> u16 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u16
}

pub struct RenderingControlController {
    provider: Arc<dyn MediaPlayer>,
    coalescer: Arc<ChangeCoalescer>,
}

impl RenderingControlController {
    pub fn service(provider: Arc<dyn MediaPlayer>, ctx: &ServiceContext) -> Result<Service, ServiceError> {
        let coalescer = ctx.coalescer(ServiceKind::RenderingControl, NS_RCS_EVENT);
        let controller = Arc::new(Self {
            provider,
            coalescer: coalescer.clone(),
        });

        let weak: Weak<Self> = Arc::downgrade(&controller);
        controller.provider.add_observer(Arc::new(move |changes: &[PlayerChange]| {
            if let Some(c) = weak.upgrade() {
                c.map_changes(changes);
            }
        }));

        let get = controller.clone();
        let set = controller;

        ServiceBuilder::new(descriptor()?)
            .types(ctx.types.clone())
            .handler(
                GET_VOLUME.name(),
                action_handler!(|_args| {
                    Ok(ActionOutput::new().with("CurrentVolume", volume_percent(get.provider.volume())))
                }),
            )
            .handler(
                SET_VOLUME.name(),
                action_handler!(|args| {
                    let desired = args.i64("DesiredVolume")?;
                    if !(0..=100).contains(&desired) {
                        return Err(ActionError::InvalidArgument("DesiredVolume".to_string()));
                    }
                    debug!("🔊 SetVolume {}", desired);
                    set.provider.set_volume(desired as f64 / 100.0)?;
                    Ok(ActionOutput::new())
                }),
            )
            .handler(
                GET_VOLUME_DB_RANGE.name(),
                action_handler!(|_args| {
                    Ok(ActionOutput::new()
                        .with("MinValue", MIN_VOLUME_DB)
                        .with("MaxValue", MAX_VOLUME_DB))
                }),
            )
            .coalescer(coalescer)
            .build()
    }

    fn map_changes(&self, changes: &[PlayerChange]) {
        for change in changes {
            if let PlayerChange::Volume(v) = change {
                self.coalescer.report_change("Volume", volume_percent(*v));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_percent_rounds_and_clamps() {
        assert_eq!(volume_percent(0.29), 29);
        assert_eq!(volume_percent(1.5), 100);
        assert_eq!(volume_percent(-0.1), 0);
    }

    #[test]
    fn test_db_range() {
        assert_eq!(MIN_VOLUME_DB, -21760);
    }
}
