//! Fournisseurs en mémoire.
//!
//! Ils servent de devices de démonstration pour le binaire et de doublures
//! dans les tests : chaque modification notifie les observateurs.

use parking_lot::Mutex;
use pmoupnp::devices::DeviceManifest;
use tracing::debug;

use crate::{
    BinarySwitch, DimmableLight, MediaPlayer, Observer, PlayerChange, PlayerState, ProviderError,
    SwitchChange,
};

struct Observers<C> {
    list: Mutex<Vec<Observer<C>>>,
}

impl<C> Observers<C> {
    fn new() -> Self {
        Self {
            list: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, observer: Observer<C>) {
        self.list.lock().push(observer);
    }

    /// Appelle les observateurs hors du verrou.
    fn emit(&self, changes: &[C]) {
        if changes.is_empty() {
            return;
        }
        let list = self.list.lock().clone();
        for observer in list {
            observer(changes);
        }
    }
}

/// Interrupteur en mémoire.
pub struct MemorySwitch {
    manifest: DeviceManifest,
    on: Mutex<bool>,
    observers: Observers<SwitchChange>,
}

impl MemorySwitch {
    pub fn new(manifest: DeviceManifest) -> Self {
        Self {
            manifest,
            on: Mutex::new(false),
            observers: Observers::new(),
        }
    }
}

impl BinarySwitch for MemorySwitch {
    fn manifest(&self) -> DeviceManifest {
        self.manifest.clone()
    }

    fn state(&self) -> bool {
        *self.on.lock()
    }

    fn set_state(&self, on: bool) -> Result<(), ProviderError> {
        let changed = std::mem::replace(&mut *self.on.lock(), on) != on;
        if changed {
            debug!("💡 {} switched {}", self.manifest.display_name, if on { "on" } else { "off" });
            self.observers.emit(&[SwitchChange::State(on)]);
        }
        Ok(())
    }

    fn add_observer(&self, observer: Observer<SwitchChange>) {
        self.observers.add(observer);
    }
}

/// Lampe à variateur en mémoire.
pub struct MemoryDimmer {
    manifest: DeviceManifest,
    on: Mutex<bool>,
    level: Mutex<u8>,
    observers: Observers<SwitchChange>,
}

impl MemoryDimmer {
    pub fn new(manifest: DeviceManifest) -> Self {
        Self {
            manifest,
            on: Mutex::new(false),
            level: Mutex::new(0),
            observers: Observers::new(),
        }
    }
}

impl BinarySwitch for MemoryDimmer {
    fn manifest(&self) -> DeviceManifest {
        self.manifest.clone()
    }

    fn state(&self) -> bool {
        *self.on.lock()
    }

    fn set_state(&self, on: bool) -> Result<(), ProviderError> {
        if std::mem::replace(&mut *self.on.lock(), on) != on {
            self.observers.emit(&[SwitchChange::State(on)]);
        }
        Ok(())
    }

    fn add_observer(&self, observer: Observer<SwitchChange>) {
        self.observers.add(observer);
    }
}

impl DimmableLight for MemoryDimmer {
    fn level(&self) -> u8 {
        *self.level.lock()
    }

    fn set_level(&self, level: u8) -> Result<(), ProviderError> {
        if level > 100 {
            return Err(ProviderError::Rejected(format!("level {} out of range", level)));
        }
        if std::mem::replace(&mut *self.level.lock(), level) != level {
            self.observers.emit(&[SwitchChange::Level(level)]);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PlayerData {
    volume: f64,
    source: Option<String>,
    source_meta_data: Option<String>,
    next_source: Option<String>,
    next_source_meta_data: Option<String>,
    duration: Option<f64>,
    position: Option<f64>,
    state: Option<PlayerState>,
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Lecteur en mémoire : ne lit rien, mais suit les commandes reçues.
pub struct MemoryPlayer {
    manifest: DeviceManifest,
    media_types: Vec<String>,
    data: Mutex<PlayerData>,
    observers: Observers<PlayerChange>,
}

impl MemoryPlayer {
    pub fn new(manifest: DeviceManifest, media_types: Vec<String>) -> Self {
        Self {
            manifest,
            media_types,
            data: Mutex::new(PlayerData {
                volume: 0.5,
                ..Default::default()
            }),
            observers: Observers::new(),
        }
    }

    /// État de lecture courant.
    pub fn state(&self) -> PlayerState {
        self.data.lock().state.unwrap_or(PlayerState::Idle)
    }

    /// Fixe la durée de la piste, telle que découverte après chargement.
    pub fn set_track_duration(&self, seconds: Option<f64>) {
        self.data.lock().duration = seconds;
        self.observers.emit(&[PlayerChange::TrackDuration(seconds)]);
    }

    fn set_player_state(&self, state: PlayerState) {
        let previous = self.data.lock().state.replace(state);
        if previous != Some(state) {
            self.observers.emit(&[PlayerChange::State(state)]);
        }
    }
}

impl MediaPlayer for MemoryPlayer {
    fn manifest(&self) -> DeviceManifest {
        self.manifest.clone()
    }

    fn volume(&self) -> f64 {
        self.data.lock().volume
    }

    fn set_volume(&self, volume: f64) -> Result<(), ProviderError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(ProviderError::Rejected(format!("volume {} out of range", volume)));
        }
        self.data.lock().volume = volume;
        self.observers.emit(&[PlayerChange::Volume(volume)]);
        Ok(())
    }

    fn supported_media_types(&self) -> Vec<String> {
        self.media_types.clone()
    }

    fn source(&self) -> Option<String> {
        self.data.lock().source.clone()
    }

    fn source_meta_data(&self) -> Option<String> {
        self.data.lock().source_meta_data.clone()
    }

    fn next_source(&self) -> Option<String> {
        self.data.lock().next_source.clone()
    }

    fn next_source_meta_data(&self) -> Option<String> {
        self.data.lock().next_source_meta_data.clone()
    }

    fn tracks(&self) -> u32 {
        u32::from(self.data.lock().source.is_some())
    }

    fn current_track(&self) -> u32 {
        self.tracks()
    }

    fn current_track_duration(&self) -> Option<f64> {
        self.data.lock().duration
    }

    fn current_position(&self) -> Option<f64> {
        self.data.lock().position
    }

    fn load(&self, uri: &str, meta_data: &str) -> Result<(), ProviderError> {
        let changes = {
            let mut data = self.data.lock();
            data.source = non_empty(uri);
            data.source_meta_data = non_empty(meta_data);
            data.duration = None;
            data.position = None;
            vec![
                PlayerChange::Source(data.source.clone()),
                PlayerChange::SourceMetaData(data.source_meta_data.clone()),
                PlayerChange::TrackDuration(None),
            ]
        };
        self.observers.emit(&changes);
        Ok(())
    }

    fn prepare_next(&self, uri: &str, meta_data: &str) -> Result<(), ProviderError> {
        let changes = {
            let mut data = self.data.lock();
            data.next_source = non_empty(uri);
            data.next_source_meta_data = non_empty(meta_data);
            vec![
                PlayerChange::NextSource(data.next_source.clone()),
                PlayerChange::NextSourceMetaData(data.next_source_meta_data.clone()),
            ]
        };
        self.observers.emit(&changes);
        Ok(())
    }

    fn play(&self) -> Result<(), ProviderError> {
        if self.data.lock().source.is_none() {
            return Err(ProviderError::Rejected("no media loaded".to_string()));
        }
        self.data.lock().position.get_or_insert(0.0);
        self.set_player_state(PlayerState::Playing);
        Ok(())
    }

    fn pause(&self) -> Result<(), ProviderError> {
        self.set_player_state(PlayerState::Paused);
        Ok(())
    }

    fn stop(&self) -> Result<(), ProviderError> {
        self.data.lock().position = None;
        self.set_player_state(PlayerState::Idle);
        Ok(())
    }

    fn seek(&self, seconds: u64) -> Result<(), ProviderError> {
        self.data.lock().position = Some(seconds as f64);
        Ok(())
    }

    fn add_observer(&self, observer: Observer<PlayerChange>) {
        self.observers.add(observer);
    }
}
