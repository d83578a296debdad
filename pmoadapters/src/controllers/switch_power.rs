//! Service SwitchPower:1 d'un interrupteur ou d'une lampe.

use std::sync::{Arc, Weak};

use pmoupnp::services::{ActionOutput, Service, ServiceBuilder, ServiceError};
use pmoupnp::{action_handler, define_operation};
use pmoxsd::ServiceDescriptor;
use tracing::debug;

use crate::types::BOOLEAN;
use crate::{BinarySwitch, ServiceContext, ServiceKind, SwitchChange};

define_operation! {
    pub static SET_TARGET = "SetTarget" {
        in "newTargetValue" => BOOLEAN,
    }
}

define_operation! {
    pub static GET_TARGET = "GetTarget" {
        out "RetTargetValue" => BOOLEAN,
    }
}

define_operation! {
    pub static GET_STATUS = "GetStatus" {
        out "ResultStatus" => BOOLEAN,
    }
}

pub fn descriptor() -> Result<ServiceDescriptor, ServiceError> {
    let kind = ServiceKind::SwitchPower;
    let mut d = ServiceDescriptor::new(kind.service_type(), kind.service_id(), kind.version());
    d.add_operation(SET_TARGET.clone())?;
    d.add_operation(GET_TARGET.clone())?;
    d.add_operation(GET_STATUS.clone())?;
    d.add_evented("Status");
    Ok(d)
}

/// Relaie les changements d'état du fournisseur vers la variable `Status`.
pub struct SwitchPowerController<P: BinarySwitch + ?Sized + 'static> {
    provider: Arc<P>,
    ctx: ServiceContext,
}

impl<P: BinarySwitch + ?Sized + 'static> SwitchPowerController<P> {
    /// Construit le service et abonne le contrôleur au fournisseur.
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
                SET_TARGET.name(),
                action_handler!(|args| {
                    let on = args.bool("newTargetValue")?;
                    debug!("💡 SetTarget {} on {}", on, set.ctx.device);
                    set.provider.set_state(on)?;
                    Ok(ActionOutput::new())
                }),
            )
            .handler(
                GET_TARGET.name(),
                action_handler!(|_args| {
                    Ok(ActionOutput::new().with("RetTargetValue", target.provider.state()))
                }),
            )
            .handler(
                GET_STATUS.name(),
                action_handler!(|_args| {
                    Ok(ActionOutput::new().with("ResultStatus", status.provider.state()))
                }),
            )
            .build()
    }

    fn on_changes(&self, changes: &[SwitchChange]) {
        for change in changes {
            if let SwitchChange::State(on) = change {
                let value = if *on { "1" } else { "0" };
                self.ctx.notify(
                    ServiceKind::SwitchPower,
                    vec![("Status".to_string(), value.to_string())],
                );
            }
        }
    }
}
