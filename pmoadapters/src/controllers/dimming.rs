//! Service Dimming:1 d'une lampe à variateur.

use std::sync::{Arc, Weak};

use pmoupnp::services::{ActionError, ActionOutput, Service, ServiceBuilder, ServiceError};
use pmoupnp::{action_handler, define_operation};
use pmoxsd::ServiceDescriptor;
use tracing::debug;

use crate::types::UI1;
use crate::{DimmableLight, ServiceContext, ServiceKind, SwitchChange};

/// Niveau de charge maximal
pub const MAX_LOAD_LEVEL: i64 = 100;

define_operation! {
    pub static SET_LOAD_LEVEL_TARGET = "SetLoadLevelTarget" {
        in "newLoadlevelTarget" => UI1,
    }
}

define_operation! {
    pub static GET_LOAD_LEVEL_TARGET = "GetLoadLevelTarget" {
        out "GetLoadlevelTarget" => UI1,
    }
}

define_operation! {
    pub static GET_LOAD_LEVEL_STATUS = "GetLoadLevelStatus" {
        out "RetLoadlevelStatus" => UI1,
    }
}

pub fn descriptor() -> Result<ServiceDescriptor, ServiceError> {
    let kind = ServiceKind::Dimming;
    let mut d = ServiceDescriptor::new(kind.service_type(), kind.service_id(), kind.version());
    d.add_operation(SET_LOAD_LEVEL_TARGET.clone())?;
    d.add_operation(GET_LOAD_LEVEL_TARGET.clone())?;
    d.add_operation(GET_LOAD_LEVEL_STATUS.clone())?;
    d.add_evented("LoadLevelStatus");
    Ok(d)
}

pub struct DimmingController<P: DimmableLight + ?Sized + 'static> {
    provider: Arc<P>,
    ctx: ServiceContext,
}

impl<P: DimmableLight + ?Sized + 'static> DimmingController<P> {
    pub fn service(provider: Arc<P>, ctx: &ServiceContext) -> Result<Service, ServiceError> {
        let controller = Arc::new(Self {
            provider,
            ctx: ctx.clone(),
        });

        let weak: Weak<Self> = Arc::downgrade(&controller);
        controller.provider.add_observer(Arc::new(move |changes: &[SwitchChange]| {
            if let Some(c) = weak.upgrade() {
                c.on_changes(changes);
            }
        }));

        let set = controller.clone();
        let target = controller.clone();
        let status = controller;

        ServiceBuilder::new(descriptor()?)
            .types(ctx.types.clone())
            .handler(
                SET_LOAD_LEVEL_TARGET.name(),
                action_handler!(|args| {
                    let level = args.i64("newLoadlevelTarget")?;
                    if !(0..=MAX_LOAD_LEVEL).contains(&level) {
                        return Err(ActionError::InvalidArgument("newLoadlevelTarget".to_string()));
                    }
                    debug!("💡 SetLoadLevelTarget {} on {}", level, set.ctx.device);
                    set.provider.set_level(level as u8)?;
                    Ok(ActionOutput::new())
                }),
            )
            .handler(
                GET_LOAD_LEVEL_TARGET.name(),
                action_handler!(|_args| {
                    Ok(ActionOutput::new().with("GetLoadlevelTarget", target.provider.level()))
                }),
            )
            .handler(
                GET_LOAD_LEVEL_STATUS.name(),
                action_handler!(|_args| {
                    Ok(ActionOutput::new().with("RetLoadlevelStatus", status.provider.level()))
                }),
            )
            .build()
    }

    fn on_changes(&self, changes: &[SwitchChange]) {
        for change in changes {
            if let SwitchChange::Level(level) = change {
                self.ctx.notify(
                    ServiceKind::Dimming,
                    vec![("LoadLevelStatus".to_string(), level.to_string())],
                );
            }
        }
    }
}
