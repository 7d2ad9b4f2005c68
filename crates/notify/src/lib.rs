//! `aquaflow-notify` — notification dispatch.
//!
//! The mail transport is an external collaborator; this crate owns the
//! contract (message shape, synchronous success/failure) and the
//! send-then-record dispatch sequence, behind trait seams so the API crate
//! and tests can wire their own implementations.

pub mod dispatcher;
pub mod mail;

pub use dispatcher::{Dispatcher, NewNotification, NotificationLog};
pub use mail::{LogMailTransport, MailError, MailMessage, MailTransport};
