//! Threshold alerting module.
//!
//! Builds notification values on status crossings. The engine only constructs
//! notifications; delivery is behind the [`NotificationSink`] seam.

pub mod engine;
pub mod notification;

pub use engine::{AlertContext, AlertEngine, StockAlertContext};
pub use notification::{AlertSubject, Notification, NotificationKind, NotificationSink, Severity};
