//! Interfaces des fournisseurs exposés en UPnP.
//!
//! Un fournisseur publie ses changements d'état auprès des observateurs
//! enregistrés ; les contrôleurs de service s'y abonnent à l'enregistrement
//! du device.

use std::sync::Arc;

use pmoupnp::devices::DeviceManifest;

use crate::ProviderError;

/// Observateur de changements d'un fournisseur.
pub type Observer<C> = Arc<dyn Fn(&[C]) + Send + Sync>;

/// Changement d'état d'un interrupteur ou d'une lampe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchChange {
    State(bool),
    /// Niveau de charge, 0 à 100
    Level(u8),
}

/// Interrupteur tout-ou-rien.
pub trait BinarySwitch: Send + Sync {
    fn manifest(&self) -> DeviceManifest;

    fn state(&self) -> bool;

    fn set_state(&self, on: bool) -> Result<(), ProviderError>;

    fn add_observer(&self, observer: Observer<SwitchChange>);
}

/// Lampe à variateur.
pub trait DimmableLight: BinarySwitch {
    /// Niveau de charge courant, 0 à 100
    fn level(&self) -> u8;

    fn set_level(&self, level: u8) -> Result<(), ProviderError>;
}

/// État d'un lecteur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Playing,
    Paused,
    Transitioning,
}

/// Changement d'état d'un lecteur.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerChange {
    /// Volume, entre 0.0 et 1.0
    Volume(f64),
    Source(Option<String>),
    SourceMetaData(Option<String>),
    NextSource(Option<String>),
    NextSourceMetaData(Option<String>),
    /// Durée de la piste courante, en secondes
    TrackDuration(Option<f64>),
    State(PlayerState),
}

/// Lecteur multimédia.
pub trait MediaPlayer: Send + Sync {
    fn manifest(&self) -> DeviceManifest;

    /// Volume, entre 0.0 et 1.0
    fn volume(&self) -> f64;

    fn set_volume(&self, volume: f64) -> Result<(), ProviderError>;

    /// Types de médias acceptés (`http-get:*:audio/mpeg:*`, ...)
    fn supported_media_types(&self) -> Vec<String>;

    fn source(&self) -> Option<String>;

    fn source_meta_data(&self) -> Option<String>;

    fn next_source(&self) -> Option<String>;

    fn next_source_meta_data(&self) -> Option<String>;

    fn tracks(&self) -> u32;

    fn current_track(&self) -> u32;

    /// Durée de la piste courante, en secondes
    fn current_track_duration(&self) -> Option<f64>;

    /// Position dans la piste courante, en secondes
    fn current_position(&self) -> Option<f64>;

    fn load(&self, uri: &str, meta_data: &str) -> Result<(), ProviderError>;

    fn prepare_next(&self, uri: &str, meta_data: &str) -> Result<(), ProviderError>;

    fn play(&self) -> Result<(), ProviderError>;

    fn pause(&self) -> Result<(), ProviderError>;

    fn stop(&self) -> Result<(), ProviderError>;

    /// Se positionne à `seconds` depuis le début de la piste
    fn seek(&self, seconds: u64) -> Result<(), ProviderError>;

    fn add_observer(&self, observer: Observer<PlayerChange>);
}

/// Fournisseur et capacité déclarée.
///
/// La capacité est résolue une fois, à l'enregistrement, par la table de
/// correspondance ; aucun sondage à l'exécution.
#[derive(Clone)]
pub enum Provider {
    BinarySwitch(Arc<dyn BinarySwitch>),
    DimmableLight(Arc<dyn DimmableLight>),
    MediaPlayer(Arc<dyn MediaPlayer>),
    /// Fournisseur sans correspondance UPnP connue
    Unsupported { kind: String, manifest: DeviceManifest },
}

impl Provider {
    pub fn manifest(&self) -> DeviceManifest {
        match self {
            Provider::BinarySwitch(p) => p.manifest(),
            Provider::DimmableLight(p) => p.manifest(),
            Provider::MediaPlayer(p) => p.manifest(),
            Provider::Unsupported { manifest, .. } => manifest.clone(),
        }
    }

    /// Nom de l'interface, pour les journaux.
    pub fn kind(&self) -> &str {
        match self {
            Provider::BinarySwitch(_) => "BinarySwitch",
            Provider::DimmableLight(_) => "DimmableLight",
            Provider::MediaPlayer(_) => "MediaPlayer",
            Provider::Unsupported { kind, .. } => kind,
        }
    }
}
