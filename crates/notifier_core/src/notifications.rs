use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub type NotificationId = i32;
pub type IconId = i32;

/// Extra key holding the serialized [`LocalNotification`] on a trigger intent.
pub const LOCAL_NOTIFICATION_KEY: &str = "LocalNotification";

/// Extra key carrying the tapped notification's id to the launched activity.
pub const NOTIFICATION_ID_KEY: &str = "NotificationId";

pub const TRIGGER_ACTION_PREFIX: &str = "LocalNotifierIntent";

/// Small icon used when no default icon has been configured.
pub const FALLBACK_ICON_ID: IconId = 0x7f02_0000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub id: NotificationId,
    pub notify_time: Option<NaiveDateTime>,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            id: 0,
            notify_time: None,
        }
    }

    pub fn with_id(mut self, id: NotificationId) -> Self {
        self.id = id;
        self
    }

    pub fn at(mut self, notify_time: NaiveDateTime) -> Self {
        self.notify_time = Some(notify_time);
        self
    }

    pub fn is_scheduled(&self) -> bool {
        self.notify_time.is_some()
    }
}

/// Record carried inside a scheduled trigger and decoded by the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNotification {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub notify_time: NaiveDateTime,
    pub icon_id: IconId,
}

impl LocalNotification {
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_payload(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extra {
    Int(i32),
    Text(String),
}

/// Launch or trigger description handed to the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub action: Option<String>,
    pub component: Option<String>,
    pub package: Option<String>,
    pub new_task: bool,
    pub extras: BTreeMap<String, Extra>,
}

impl Intent {
    pub fn for_action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    pub fn for_component(package: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            package: Some(package.into()),
            component: Some(component.into()),
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_new_task(mut self) -> Self {
        self.new_task = true;
        self
    }

    pub fn put_int(&mut self, key: &str, value: i32) -> &mut Self {
        self.extras.insert(key.to_string(), Extra::Int(value));
        self
    }

    pub fn put_text(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.extras
            .insert(key.to_string(), Extra::Text(value.into()));
        self
    }

    pub fn int_extra(&self, key: &str) -> Option<i32> {
        match self.extras.get(key) {
            Some(Extra::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn text_extra(&self, key: &str) -> Option<&str> {
        match self.extras.get(key) {
            Some(Extra::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// Two intents address the same registration when action, component and
    /// package agree. Extras take no part in the match.
    pub fn filter_equals(&self, other: &Intent) -> bool {
        self.action == other.action
            && self.component == other.component
            && self.package == other.package
    }
}

/// What ends up in the notification area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub small_icon: IconId,
    pub auto_cancel: bool,
    pub content_intent: Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMode {
    /// Wall-clock trigger that wakes the device and is not deferred while idle.
    RtcWakeupExact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRegistration {
    pub trigger_at_millis: i64,
    pub mode: AlarmMode,
    pub intent: Intent,
}

/// Platform-specific notification adapters will implement this trait.
pub trait NotificationPlatform: Send + Sync {
    /// Post `notification` under `id`, replacing whatever is shown with that id.
    fn notify(&self, id: NotificationId, notification: Notification) -> Result<()>;
    fn dismiss(&self, id: NotificationId) -> Result<()>;
    /// Register an exact wake-up trigger, replacing any matching registration.
    fn set_exact_wake(&self, trigger_at_millis: i64, intent: Intent) -> Result<()>;
    fn cancel_trigger(&self, intent: &Intent) -> Result<()>;
    /// Main entry point of the host application.
    fn launch_intent(&self) -> Result<Intent>;
    fn package_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn request_defaults_to_immediate_with_id_zero() {
        let request = NotificationRequest::new("Title", "Body");
        assert_eq!(request.id, 0);
        assert!(!request.is_scheduled());

        let when = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let scheduled = request.with_id(4).at(when);
        assert_eq!(scheduled.id, 4);
        assert_eq!(scheduled.notify_time, Some(when));
    }

    #[test]
    fn payload_keeps_every_field() {
        let record = LocalNotification {
            id: 12,
            title: "Standup".into(),
            body: "Room 4, bring notes".into(),
            notify_time: NaiveDate::from_ymd_opt(2025, 11, 7)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            icon_id: 42,
        };
        let payload = record.to_payload().unwrap();
        assert!(payload.contains("\"notify_time\":\"2025-11-07T09:30:00\""));
        assert_eq!(LocalNotification::from_payload(&payload).unwrap(), record);
    }

    #[test]
    fn malformed_payload_is_reported() {
        let err = LocalNotification::from_payload("<LocalNotification/>").unwrap_err();
        assert!(matches!(err, crate::error::NotifierError::Payload(_)));
    }

    #[test]
    fn filter_equality_ignores_extras() {
        let mut first = Intent::for_component("com.example", "Receiver").with_action("A1");
        first.put_text(LOCAL_NOTIFICATION_KEY, "one");
        let mut second = Intent::for_component("com.example", "Receiver").with_action("A1");
        second.put_text(LOCAL_NOTIFICATION_KEY, "two");
        assert!(first.filter_equals(&second));

        let other = Intent::for_component("com.example", "Receiver").with_action("A2");
        assert!(!first.filter_equals(&other));
    }

    #[test]
    fn typed_extras_do_not_cross() {
        let mut intent = Intent::for_action("OPEN");
        intent.put_int(NOTIFICATION_ID_KEY, 3).put_text("label", "x");
        assert_eq!(intent.int_extra(NOTIFICATION_ID_KEY), Some(3));
        assert_eq!(intent.text_extra(NOTIFICATION_ID_KEY), None);
        assert_eq!(intent.int_extra("label"), None);
    }
}
