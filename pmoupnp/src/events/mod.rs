//! # Module Events - Notifications d'état
//!
//! - [`ChangeCoalescer`] : regroupement des changements par fenêtre
//! - [`Scheduler`] : timers différés annulables (tokio ou manuel)
//! - [`NotificationSink`] : livraison des notifications
//! - rendu des documents `LastChange` et `e:propertyset`

mod coalescer;
mod errors;
mod lastchange;
mod propertyset;
mod sink;
mod timer;

pub use coalescer::{ChangeCoalescer, DEFAULT_EVENT_WINDOW, LAST_CHANGE};
pub use errors::EventError;
pub use lastchange::{NS_AVT_EVENT, NS_RCS_EVENT, render_last_change};
pub use propertyset::{NS_GENA_EVENT, render_property_set};
pub use sink::{ChannelSink, LoggingSink, Notification, NotificationSink};
pub use timer::{ManualScheduler, Scheduler, TimerHandle, TimerTask, TokioScheduler};
