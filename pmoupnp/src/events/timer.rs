//! Abstraction de timer : un callback différé, annulable.
//!
//! [`TokioScheduler`] s'appuie sur le runtime tokio ; [`ManualScheduler`]
//! permet de piloter le temps dans les tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Tâche différée.
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Planificateur de callbacks différés.
pub trait Scheduler: Send + Sync {
    /// Planifie `task` après `delay`. Ne bloque jamais l'appelant.
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;
}

/// Poignée d'un callback planifié.
///
/// Après [`TimerHandle::cancel`], le callback n'est plus jamais exécuté.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    fn new(cancelled: Arc<AtomicBool>, abort: Option<AbortHandle>) -> Self {
        Self { cancelled, abort }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Planificateur adossé à un runtime tokio.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Utilise le runtime courant.
    ///
    /// # Panics
    ///
    /// Si appelé hors d'un runtime tokio.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.load(Ordering::SeqCst) {
                task();
            }
        });

        TimerHandle::new(cancelled, Some(join.abort_handle()))
    }
}

struct ManualEntry {
    due: Duration,
    cancelled: Arc<AtomicBool>,
    task: TimerTask,
}

/// Planificateur à horloge manuelle, pour les tests.
#[derive(Default)]
pub struct ManualScheduler {
    now: Mutex<Duration>,
    pending: Mutex<Vec<ManualEntry>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nombre de callbacks planifiés et non annulés.
    pub fn pending(&self) -> usize {
        self.pending
            .lock()
            .iter()
            .filter(|e| !e.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Avance l'horloge et exécute les callbacks échus, dans l'ordre.
    ///
    /// Les callbacks sont exécutés hors verrou : ils peuvent replanifier.
    pub fn advance(&self, by: Duration) {
        let now = {
            let mut now = self.now.lock();
            *now += by;
            *now
        };

        loop {
            let next = {
                let mut pending = self.pending.lock();
                pending.retain(|e| !e.cancelled.load(Ordering::SeqCst));
                let index = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.due <= now)
                    .min_by_key(|(_, e)| e.due)
                    .map(|(i, _)| i);
                index.map(|i| pending.remove(i))
            };

            match next {
                Some(entry) => (entry.task)(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let due = *self.now.lock() + delay;
        self.pending.lock().push(ManualEntry {
            due,
            cancelled: cancelled.clone(),
            task,
        });
        TimerHandle::new(cancelled, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_manual_scheduler_fires_when_due() {
        let scheduler = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        scheduler.schedule(Duration::from_millis(200), Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        scheduler.advance(Duration::from_millis(199));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_manual_scheduler_cancel() {
        let scheduler = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let handle = scheduler.schedule(Duration::from_millis(10), Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        handle.cancel();
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn test_tokio_scheduler() {
        let scheduler = TokioScheduler::current();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        scheduler.schedule(Duration::from_millis(20), Box::new(move || {
            let _ = tx.send(());
        }));

        let fired = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert_eq!(fired.unwrap(), Some(()));
    }

    #[tokio::test]
    async fn test_tokio_scheduler_cancel() {
        let scheduler = TokioScheduler::current();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<()>();
        let handle = scheduler.schedule(Duration::from_millis(20), Box::new(move || {
            let _ = tx.send(());
        }));
        handle.cancel();

        // La tâche abandonnée libère l'émetteur : le canal se ferme.
        let closed = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert_eq!(closed.unwrap(), None);
    }
}
