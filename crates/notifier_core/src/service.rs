use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, instrument};

use crate::{
    config::NotifierConfig,
    error::{NotifierError, Result},
    notifications::{
        IconId, Intent, LocalNotification, Notification, NotificationId, NotificationPlatform,
        NotificationRequest, LOCAL_NOTIFICATION_KEY, NOTIFICATION_ID_KEY, TRIGGER_ACTION_PREFIX,
    },
    receiver::ScheduledAlarmHandler,
    time::local_to_epoch_millis,
};

/// Forwards show/schedule/cancel requests to the host platform's
/// notification and alarm services.
pub struct NotificationAdapter {
    platform: Arc<dyn NotificationPlatform>,
    config: NotifierConfig,
}

pub struct NotificationAdapterBuilder {
    platform: Option<Arc<dyn NotificationPlatform>>,
    config: NotifierConfig,
}

impl NotificationAdapterBuilder {
    pub fn new() -> Self {
        Self {
            platform: None,
            config: NotifierConfig::default(),
        }
    }

    pub fn with_platform(mut self, platform: Arc<dyn NotificationPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn with_config(mut self, config: NotifierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<NotificationAdapter> {
        let platform = self.platform.ok_or(NotifierError::MissingPlatform)?;
        debug!(
            package = platform.package_name(),
            icon_id = self.config.icon_id,
            intent_action = ?self.config.intent_action,
            "notification adapter ready"
        );
        Ok(NotificationAdapter {
            platform,
            config: self.config,
        })
    }
}

impl Default for NotificationAdapterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationAdapter {
    pub fn builder() -> NotificationAdapterBuilder {
        NotificationAdapterBuilder::new()
    }

    pub fn platform(&self) -> &Arc<dyn NotificationPlatform> {
        &self.platform
    }

    pub fn submit(&self, request: NotificationRequest) -> Result<()> {
        match request.notify_time {
            Some(when) => self.show_at(&request.title, &request.body, request.id, when),
            None => self.show(&request.title, &request.body, request.id),
        }
    }

    /// Post a notification right away, replacing any shown under `id`.
    #[instrument(skip(self, title, body))]
    pub fn show(&self, title: &str, body: &str, id: NotificationId) -> Result<()> {
        let notification = self.compose(title, body, self.config.resolved_icon(), id)?;
        self.platform.notify(id, notification)?;
        info!(id, "notification posted");
        Ok(())
    }

    /// Register a trigger that posts the notification at the local wall-clock
    /// time `notify_time`. A later call with the same `id` replaces it.
    #[instrument(skip(self, title, body))]
    pub fn show_at(
        &self,
        title: &str,
        body: &str,
        id: NotificationId,
        notify_time: NaiveDateTime,
    ) -> Result<()> {
        let record = LocalNotification {
            id,
            title: title.to_string(),
            body: body.to_string(),
            notify_time,
            icon_id: self.config.resolved_icon(),
        };

        let mut trigger = self.trigger_intent(id);
        trigger.put_text(LOCAL_NOTIFICATION_KEY, record.to_payload()?);

        let trigger_at_millis = local_to_epoch_millis(record.notify_time, &Local)?;
        self.platform.set_exact_wake(trigger_at_millis, trigger)?;
        info!(id, trigger_at_millis, "notification scheduled");
        Ok(())
    }

    /// Drop the pending trigger for `id` and dismiss anything shown under it.
    /// Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn cancel(&self, id: NotificationId) -> Result<()> {
        let trigger = self.trigger_intent(id);
        self.platform.cancel_trigger(&trigger)?;
        self.platform.dismiss(id)?;
        debug!(id, "notification cancelled");
        Ok(())
    }

    /// Intent a tap on notification `id` launches.
    pub fn tap_target(&self, id: NotificationId) -> Result<Intent> {
        let mut intent = match self.config.tap_action() {
            Some(action) => Intent::for_action(action).with_new_task(),
            None => self.platform.launch_intent()?,
        };
        intent.put_int(NOTIFICATION_ID_KEY, id);
        Ok(intent)
    }

    /// Trigger intent for `id`. Scheduling and cancelling rebuild the same
    /// one, so they address the same alarm registration.
    pub fn trigger_intent(&self, id: NotificationId) -> Intent {
        Intent::for_component(
            self.platform.package_name(),
            ScheduledAlarmHandler::COMPONENT,
        )
        .with_action(format!("{TRIGGER_ACTION_PREFIX}{id}"))
    }

    pub(crate) fn compose(
        &self,
        title: &str,
        body: &str,
        small_icon: IconId,
        id: NotificationId,
    ) -> Result<Notification> {
        Ok(Notification {
            title: title.to_string(),
            body: body.to_string(),
            small_icon,
            auto_cancel: true,
            content_intent: self.tap_target(id)?,
        })
    }
}
