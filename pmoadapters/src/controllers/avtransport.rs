//! Service AVTransport:1 d'un lecteur.
//!
//! L'état de transport est suivi par le contrôleur à partir des changements
//! publiés par le fournisseur ; il vaut `STOPPED` tant que le fournisseur
//! n'a rien signalé. Les changements sont regroupés dans `LastChange`
//! (espace AVT).

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use pmoupnp::events::{ChangeCoalescer, LAST_CHANGE, NS_AVT_EVENT};
use pmoupnp::services::{ActionError, ActionOutput, Service, ServiceBuilder, ServiceError};
use pmoupnp::soap::error_codes;
use pmoupnp::{action_handler, define_operation};
use pmoxsd::{EnumValue, ServiceDescriptor};
use tracing::{debug, info};

use crate::types::{I4, STRING, TRANSPORT_STATE, UI4};
use crate::{MediaPlayer, PlayerChange, PlayerState, ServiceContext, ServiceKind};

/// Valeur des champs non pris en charge
pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";

/// Compteurs `RelCount`/`AbsCount` non suivis
pub const COUNT_NOT_IMPLEMENTED: i32 = i32::MAX;

/// Seule unité de positionnement acceptée par `Seek`
pub const SEEK_REL_TIME: &str = "REL_TIME";

/// État de transport exposé.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    PausedPlayback,
    Transitioning,
    NoMediaPresent,
}

impl TransportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportState::Stopped => "STOPPED",
            TransportState::Playing => "PLAYING",
            TransportState::PausedPlayback => "PAUSED_PLAYBACK",
            TransportState::Transitioning => "TRANSITIONING",
            TransportState::NoMediaPresent => "NO_MEDIA_PRESENT",
        }
    }
}

impl From<PlayerState> for TransportState {
    fn from(state: PlayerState) -> Self {
        match state {
            PlayerState::Idle => TransportState::Stopped,
            PlayerState::Playing => TransportState::Playing,
            PlayerState::Paused => TransportState::PausedPlayback,
            PlayerState::Transitioning => TransportState::Transitioning,
        }
    }
}

/// Durée au format `H:MM:SS`, `NOT_IMPLEMENTED` si inconnue.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() && s >= 0.0 => {
            let total = s as u64;
            format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
        }
        _ => NOT_IMPLEMENTED.to_string(),
    }
}

/// Analyse une cible `H:MM:SS[.fff]` en secondes entières.
pub fn parse_target(target: &str) -> Option<u64> {
    let mut parts = target.trim().split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let seconds: u64 = seconds.split('.').next()?.parse().ok()?;
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

define_operation! {
    pub static GET_TRANSPORT_INFO = "GetTransportInfo" {
        in "InstanceID" => UI4,
        out "CurrentTransportState" => TRANSPORT_STATE,
        out "CurrentTransportStatus" => STRING,
        out "CurrentSpeed" => STRING,
    }
}

define_operation! {
    pub static GET_MEDIA_INFO = "GetMediaInfo" {
        in "InstanceID" => UI4,
        out "NrTracks" => UI4,
        out "MediaDuration" => STRING,
        out "CurrentURI" => STRING,
        out "CurrentURIMetaData" => STRING,
        out "NextURI" => STRING,
        out "NextURIMetaData" => STRING,
        out "PlayMedium" => STRING,
        out "RecordMedium" => STRING,
        out "WriteStatus" => STRING,
    }
}

define_operation! {
    pub static GET_POSITION_INFO = "GetPositionInfo" {
        in "InstanceID" => UI4,
        out "Track" => UI4,
        out "TrackDuration" => STRING,
        out "TrackMetaData" => STRING,
        out "TrackURI" => STRING,
        out "RelTime" => STRING,
        out "AbsTime" => STRING,
        out "RelCount" => I4,
        out "AbsCount" => I4,
    }
}

define_operation! {
    pub static SET_AV_TRANSPORT_URI = "SetAVTransportURI" {
        in "InstanceID" => UI4,
        in "CurrentURI" => STRING,
        in "CurrentURIMetaData" => STRING,
    }
}

define_operation! {
    pub static SET_NEXT_AV_TRANSPORT_URI = "SetNextAVTransportURI" {
        in "InstanceID" => UI4,
        in "NextURI" => STRING,
        in "NextURIMetaData" => STRING,
    }
}

define_operation! {
    pub static PLAY = "Play" {
        in "InstanceID" => UI4,
        in "Speed" => STRING,
    }
}

define_operation! {
    pub static PAUSE = "Pause" {
        in "InstanceID" => UI4,
    }
}

define_operation! {
    pub static STOP = "Stop" {
        in "InstanceID" => UI4,
    }
}

define_operation! {
    pub static SEEK = "Seek" {
        in "InstanceID" => UI4,
        in "Unit" => STRING,
        in "Target" => STRING,
    }
}

pub fn descriptor() -> Result<ServiceDescriptor, ServiceError> {
    let kind = ServiceKind::AVTransport;
    let mut d = ServiceDescriptor::new(kind.service_type(), kind.service_id(), kind.version());
    for op in [
        &GET_TRANSPORT_INFO,
        &GET_MEDIA_INFO,
        &GET_POSITION_INFO,
        &SET_AV_TRANSPORT_URI,
        &SET_NEXT_AV_TRANSPORT_URI,
        &PLAY,
        &PAUSE,
        &STOP,
        &SEEK,
    ] {
        d.add_operation((**op).clone())?;
    }
    d.add_evented(LAST_CHANGE);
    Ok(d)
}

pub struct AVTransportController {
    provider: Arc<dyn MediaPlayer>,
    coalescer: Arc<ChangeCoalescer>,
    state: Mutex<TransportState>,
}

impl AVTransportController {
    pub fn service(provider: Arc<dyn MediaPlayer>, ctx: &ServiceContext) -> Result<Service, ServiceError> {
        let coalescer = ctx.coalescer(ServiceKind::AVTransport, NS_AVT_EVENT);
        let controller = Arc::new(Self {
            provider,
            coalescer: coalescer.clone(),
            state: Mutex::new(TransportState::Stopped),
        });

        let weak: Weak<Self> = Arc::downgrade(&controller);
        controller.provider.add_observer(Arc::new(move |changes: &[PlayerChange]| {
            if let Some(c) = weak.upgrade() {
                c.map_changes(changes);
            }
        }));

        let transport_info = controller.clone();
        let media_info = controller.clone();
        let position_info = controller.clone();
        let set_uri = controller.clone();
        let set_next = controller.clone();
        let play = controller.clone();
        let pause = controller.clone();
        let stop = controller.clone();
        let seek = controller;

        ServiceBuilder::new(descriptor()?)
            .types(ctx.types.clone())
            .handler(
                GET_TRANSPORT_INFO.name(),
                action_handler!(|_args| transport_info.transport_info()),
            )
            .handler(
                GET_MEDIA_INFO.name(),
                action_handler!(|_args| Ok(media_info.media_info())),
            )
            .handler(
                GET_POSITION_INFO.name(),
                action_handler!(|_args| Ok(position_info.position_info())),
            )
            .handler(
                SET_AV_TRANSPORT_URI.name(),
                action_handler!(|args| {
                    let uri = args.text("CurrentURI")?;
                    let meta = args.text("CurrentURIMetaData")?;
                    info!("🎵 SetAVTransportURI {}", uri);
                    set_uri.provider.load(&uri, &meta)?;
                    Ok(ActionOutput::new())
                }),
            )
            .handler(
                SET_NEXT_AV_TRANSPORT_URI.name(),
                action_handler!(|args| {
                    let uri = args.text("NextURI")?;
                    let meta = args.text("NextURIMetaData")?;
                    debug!("🎵 SetNextAVTransportURI {}", uri);
                    set_next.provider.prepare_next(&uri, &meta)?;
                    Ok(ActionOutput::new())
                }),
            )
            .handler(
                PLAY.name(),
                action_handler!(|_args| {
                    play.provider.play()?;
                    Ok(ActionOutput::new())
                }),
            )
            .handler(
                PAUSE.name(),
                action_handler!(|_args| {
                    pause.provider.pause()?;
                    Ok(ActionOutput::new())
                }),
            )
            .handler(
                STOP.name(),
                action_handler!(|_args| {
                    stop.provider.stop()?;
                    Ok(ActionOutput::new())
                }),
            )
            .handler(
                SEEK.name(),
                action_handler!(|args| {
                    let unit = args.text("Unit")?;
                    let target = args.text("Target")?;
                    seek.seek(&unit, &target)
                }),
            )
            .coalescer(coalescer)
            .build()
    }

    pub fn transport_state(&self) -> TransportState {
        *self.state.lock()
    }

    fn transport_info(&self) -> Result<ActionOutput, ActionError> {
        let state = EnumValue::of(&TRANSPORT_STATE, self.transport_state().as_str())?;
        Ok(ActionOutput::new()
            .with("CurrentTransportState", state)
            .with("CurrentTransportStatus", "OK")
            .with("CurrentSpeed", "1"))
    }

    fn media_info(&self) -> ActionOutput {
        let p = &self.provider;
        ActionOutput::new()
            .with("NrTracks", p.tracks())
            .with("MediaDuration", format_duration(p.current_track_duration()))
            .with("CurrentURI", p.source().unwrap_or_default())
            .with(
                "CurrentURIMetaData",
                p.source_meta_data().unwrap_or_else(|| NOT_IMPLEMENTED.to_string()),
            )
            .with("NextURI", p.next_source().unwrap_or_default())
            .with(
                "NextURIMetaData",
                p.next_source_meta_data().unwrap_or_else(|| NOT_IMPLEMENTED.to_string()),
            )
            .with("PlayMedium", "NONE")
            .with("RecordMedium", NOT_IMPLEMENTED)
            .with("WriteStatus", NOT_IMPLEMENTED)
    }

    fn position_info(&self) -> ActionOutput {
        let p = &self.provider;
        ActionOutput::new()
            .with("Track", p.current_track())
            .with("TrackDuration", format_duration(p.current_track_duration()))
            .with(
                "TrackMetaData",
                p.source_meta_data().unwrap_or_else(|| NOT_IMPLEMENTED.to_string()),
            )
            .with("TrackURI", p.source().unwrap_or_default())
            .with("RelTime", format_duration(p.current_position()))
            .with("AbsTime", NOT_IMPLEMENTED)
            .with("RelCount", COUNT_NOT_IMPLEMENTED)
            .with("AbsCount", COUNT_NOT_IMPLEMENTED)
    }

    /// L'état est vérifié avant l'unité.
    fn seek(&self, unit: &str, target: &str) -> Result<ActionOutput, ActionError> {
        let state = self.transport_state();
        if !matches!(state, TransportState::Playing | TransportState::Stopped) {
            return Err(ActionError::upnp(
                error_codes::TRANSITION_NOT_AVAILABLE,
                error_codes::description(error_codes::TRANSITION_NOT_AVAILABLE),
            ));
        }
        if unit != SEEK_REL_TIME {
            return Err(ActionError::upnp(
                error_codes::SEEK_MODE_NOT_SUPPORTED,
                error_codes::description(error_codes::SEEK_MODE_NOT_SUPPORTED),
            ));
        }
        let seconds =
            parse_target(target).ok_or_else(|| ActionError::InvalidArgument("Target".to_string()))?;

        debug!("⏩ Seek to {}s", seconds);
        self.provider.seek(seconds)?;
        Ok(ActionOutput::new())
    }

    /// Traduit un lot de changements du fournisseur en une seule émission.
    fn map_changes(&self, changes: &[PlayerChange]) {
        let c = &self.coalescer;
        for change in changes {
            match change {
                PlayerChange::Source(uri) => {
                    let uri = uri.clone().unwrap_or_default();
                    c.add_change("AVTransportURI", &uri, false);
                    c.add_change("CurrentTrackURI", &uri, false);
                }
                PlayerChange::SourceMetaData(meta) => {
                    let meta = meta.clone().unwrap_or_default();
                    c.add_change("AVTransportURIMetaData", &meta, false);
                    c.add_change("CurrentTrackMetaData", &meta, false);
                }
                PlayerChange::NextSource(uri) => {
                    c.add_change("NextAVTransportURI", uri.clone().unwrap_or_default(), false);
                }
                PlayerChange::NextSourceMetaData(meta) => {
                    c.add_change(
                        "NextAVTransportURIMetaData",
                        meta.clone().unwrap_or_default(),
                        false,
                    );
                }
                PlayerChange::TrackDuration(d) => {
                    let duration = format_duration(*d);
                    c.add_change("CurrentTrackDuration", &duration, false);
                    c.add_change("CurrentMediaDuration", &duration, false);
                }
                PlayerChange::State(s) => {
                    let state = TransportState::from(*s);
                    *self.state.lock() = state;
                    c.add_change("TransportState", state.as_str(), false);
                }
                PlayerChange::Volume(_) => {}
            }
        }
        c.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(3725.7)), "1:02:05");
        assert_eq!(format_duration(Some(59.0)), "0:00:59");
        assert_eq!(format_duration(None), NOT_IMPLEMENTED);
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("0:01:30"), Some(90));
        assert_eq!(parse_target("1:00:00.500"), Some(3600));
        assert_eq!(parse_target("01:30"), None);
        assert_eq!(parse_target("a:b:c"), None);
    }

    #[test]
    fn test_parse_target_rejects_overflow() {
        assert_eq!(parse_target("18446744073709551615:00:00"), None);
        assert_eq!(parse_target("0:18446744073709551615:00"), None);
        assert_eq!(parse_target("0:00:18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_target("5124095576030431:00:15"), Some(u64::MAX));
        assert_eq!(parse_target("5124095576030431:00:16"), None);
    }

    #[test]
    fn test_player_state_mapping() {
        assert_eq!(TransportState::from(PlayerState::Idle).as_str(), "STOPPED");
        assert_eq!(
            TransportState::from(PlayerState::Paused),
            TransportState::PausedPlayback
        );
    }

    #[test]
    fn test_descriptor_declares_every_operation() {
        let d = descriptor().unwrap();
        assert_eq!(d.operations().len(), 9);
        assert_eq!(d.evented(), &[LAST_CHANGE.to_string()]);
    }
}
