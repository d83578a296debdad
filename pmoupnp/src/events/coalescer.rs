//! Regroupement des changements d'état en un évènement `LastChange`.
//!
//! Machine à états `idle → locked → idle` :
//!
//! - `flush` ne fait rien si le coalesceur est verrouillé ou si aucun
//!   changement n'est en attente ;
//! - sinon, il verrouille, vide la table des changements, livre un unique
//!   document et arme un timer de la durée de la fenêtre ;
//! - à l'expiration, il déverrouille puis relance `flush` pour émettre les
//!   changements accumulés pendant la fenêtre.
//!
//! Un changement reçu pendant la fenêtre n'est jamais perdu : il reste dans
//! la table jusqu'au flush suivant.
//!
//! Les documents sont livrés dans l'ordre de leurs flushes : le verrou de
//! livraison est pris avant de relâcher l'état. Le sink ne doit donc pas
//! rappeler le coalesceur depuis `deliver`.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::{Notification, NotificationSink, Scheduler, TimerHandle, render_last_change};

/// Fenêtre par défaut.
pub const DEFAULT_EVENT_WINDOW: Duration = Duration::from_millis(200);

/// Nom de la variable portant le document regroupé.
pub const LAST_CHANGE: &str = "LastChange";

#[derive(Default)]
struct CoalescerState {
    pending: BTreeMap<String, String>,
    locked: bool,
    timer: Option<TimerHandle>,
    closed: bool,
}

/// Coalesceur d'une instance de service.
pub struct ChangeCoalescer {
    device: String,
    service: String,
    namespace: String,
    window: Duration,
    sink: Arc<dyn NotificationSink>,
    scheduler: Arc<dyn Scheduler>,
    state: Mutex<CoalescerState>,
    delivery: Mutex<()>,
    this: Weak<ChangeCoalescer>,
}

impl ChangeCoalescer {
    /// Crée le coalesceur de `service` sur `device`, publiant dans
    /// `namespace` (espace d'évènements AVT ou RCS).
    pub fn new(
        device: impl Into<String>,
        service: impl Into<String>,
        namespace: impl Into<String>,
        window: Duration,
        sink: Arc<dyn NotificationSink>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Arc<Self> {
        let device = device.into();
        let service = service.into();
        let namespace = namespace.into();
        Arc::new_cyclic(|this| Self {
            device,
            service,
            namespace,
            window,
            sink,
            scheduler,
            state: Mutex::new(CoalescerState::default()),
            delivery: Mutex::new(()),
            this: this.clone(),
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Enregistre un changement puis tente un flush.
    pub fn report_change(&self, name: &str, value: impl ToString) {
        self.add_change(name, value, true);
    }

    /// Enregistre un changement ; le dernier écrit l'emporte.
    ///
    /// Avec `auto_flush = false`, l'appelant regroupe plusieurs changements
    /// et appelle [`ChangeCoalescer::flush`] lui-même.
    pub fn add_change(&self, name: &str, value: impl ToString, auto_flush: bool) {
        {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.pending.insert(name.to_string(), value.to_string());
        }
        trace!("{}.{} change recorded: {}", self.device, self.service, name);

        if auto_flush {
            self.flush();
        }
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }

    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Émet un unique document regroupant les changements en attente.
    pub fn flush(&self) {
        let (changes, _delivery): (Vec<(String, String)>, _) = {
            let mut state = self.state.lock();
            if state.closed || state.locked || state.pending.is_empty() {
                return;
            }
            state.locked = true;

            let this = self.this.clone();
            state.timer = Some(self.scheduler.schedule(
                self.window,
                Box::new(move || {
                    if let Some(coalescer) = this.upgrade() {
                        coalescer.on_window_expired();
                    }
                }),
            ));

            let changes = std::mem::take(&mut state.pending).into_iter().collect();
            (changes, self.delivery.lock())
        };

        debug!(
            "📦 {} flushing {} change(s) for {}",
            self.service,
            changes.len(),
            self.device
        );

        // Livraison hors verrou d'état ; un échec n'est pas rejoué.
        let result = render_last_change(&self.namespace, &changes).and_then(|doc| {
            self.sink.deliver(Notification::new(
                self.device.clone(),
                self.service.clone(),
                vec![(LAST_CHANGE.to_string(), doc)],
            ))
        });
        if let Err(e) = result {
            warn!("❌ {} event delivery failed for {}: {}", self.service, self.device, e);
        }
    }

    fn on_window_expired(&self) {
        {
            let mut state = self.state.lock();
            state.locked = false;
            state.timer = None;
        }
        self.flush();
    }

    /// Annule le timer en attente ; plus aucun évènement ne sera émis.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.pending.clear();
        if let Some(timer) = state.timer.take() {
            timer.cancel();
        }
    }
}
