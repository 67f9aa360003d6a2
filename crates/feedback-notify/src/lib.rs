//! Best-effort email notification for new feedback.
//!
//! A stored feedback event becomes one email per enabled recipient. Nothing in
//! this crate can fail a feedback submission: ingestion hands the event to
//! [`dispatcher::spawn_detached`] and never looks at the result.

pub mod dispatcher;
pub mod email;
pub mod remote;

pub use dispatcher::{DispatchError, DispatchOutcome, NotificationDispatcher, Notifier, spawn_detached};
pub use email::{Email, EmailError, EmailSender, HttpEmailSender, LogEmailSender};
pub use remote::RemoteNotifier;
