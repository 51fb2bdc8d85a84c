use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    error::{NotifierError, Result},
    notifications::{Intent, LocalNotification, LOCAL_NOTIFICATION_KEY},
    service::NotificationAdapter,
};

/// Runs when a scheduled trigger fires and posts the notification it carries.
pub struct ScheduledAlarmHandler {
    adapter: Arc<NotificationAdapter>,
}

impl ScheduledAlarmHandler {
    /// Component name put on every trigger intent.
    pub const COMPONENT: &'static str = "ScheduledAlarmHandler";

    pub fn new(adapter: Arc<NotificationAdapter>) -> Self {
        Self { adapter }
    }

    pub fn on_receive(&self, intent: &Intent) -> Result<LocalNotification> {
        let record = decode_trigger(intent)?;
        let notification = self
            .adapter
            .compose(&record.title, &record.body, record.icon_id, record.id)?;
        self.adapter.platform().notify(record.id, notification)?;
        info!(id = record.id, "scheduled notification delivered");
        Ok(record)
    }
}

pub fn decode_trigger(intent: &Intent) -> Result<LocalNotification> {
    let Some(payload) = intent.text_extra(LOCAL_NOTIFICATION_KEY) else {
        let action = intent.action.clone().unwrap_or_default();
        warn!(%action, "trigger fired without payload");
        return Err(NotifierError::MissingPayload { action });
    };
    LocalNotification::from_payload(payload)
}
