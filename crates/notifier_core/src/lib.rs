pub mod config;
pub mod error;
pub mod memory;
pub mod notifications;
pub mod receiver;
pub mod service;
pub mod time;

pub use crate::config::NotifierConfig;
pub use crate::error::{NotifierError, Result};
pub use crate::service::{NotificationAdapter, NotificationAdapterBuilder};
