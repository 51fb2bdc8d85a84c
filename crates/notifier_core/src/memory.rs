use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::{
    error::{NotifierError, Result},
    notifications::{
        AlarmMode, AlarmRegistration, Intent, Notification, NotificationId, NotificationPlatform,
    },
};

#[derive(Debug, Default)]
struct PlatformState {
    shown: BTreeMap<NotificationId, Notification>,
    alarms: Vec<AlarmRegistration>,
}

/// Platform backend that keeps the notification area and alarm table in
/// process. Alarms only fire when [`InMemoryPlatform::take_due`] is called.
#[derive(Debug)]
pub struct InMemoryPlatform {
    package: String,
    launcher: Option<String>,
    state: RwLock<PlatformState>,
}

impl InMemoryPlatform {
    /// A platform whose package has no launchable entry point.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            launcher: None,
            state: RwLock::new(PlatformState::default()),
        }
    }

    pub fn with_launcher(package: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            launcher: Some(activity.into()),
            ..Self::new(package)
        }
    }

    pub fn visible(&self) -> Vec<(NotificationId, Notification)> {
        self.state
            .read()
            .shown
            .iter()
            .map(|(id, notification)| (*id, notification.clone()))
            .collect()
    }

    pub fn visible_notification(&self, id: NotificationId) -> Option<Notification> {
        self.state.read().shown.get(&id).cloned()
    }

    pub fn pending(&self) -> Vec<AlarmRegistration> {
        self.state.read().alarms.clone()
    }

    /// Remove and return every registration due at `now_millis`, earliest first.
    pub fn take_due(&self, now_millis: i64) -> Vec<AlarmRegistration> {
        let mut state = self.state.write();
        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.alarms)
            .into_iter()
            .partition(|alarm| alarm.trigger_at_millis <= now_millis);
        state.alarms = waiting;
        due.sort_by_key(|alarm| alarm.trigger_at_millis);
        due
    }

    /// Earliest pending trigger time, if any.
    pub fn next_due(&self) -> Option<i64> {
        self.state
            .read()
            .alarms
            .iter()
            .map(|alarm| alarm.trigger_at_millis)
            .min()
    }
}

impl NotificationPlatform for InMemoryPlatform {
    fn notify(&self, id: NotificationId, notification: Notification) -> Result<()> {
        debug!(id, title = %notification.title, "notify");
        self.state.write().shown.insert(id, notification);
        Ok(())
    }

    fn dismiss(&self, id: NotificationId) -> Result<()> {
        self.state.write().shown.remove(&id);
        Ok(())
    }

    fn set_exact_wake(&self, trigger_at_millis: i64, intent: Intent) -> Result<()> {
        let mut state = self.state.write();
        state
            .alarms
            .retain(|existing| !existing.intent.filter_equals(&intent));
        state.alarms.push(AlarmRegistration {
            trigger_at_millis,
            mode: AlarmMode::RtcWakeupExact,
            intent,
        });
        Ok(())
    }

    fn cancel_trigger(&self, intent: &Intent) -> Result<()> {
        self.state
            .write()
            .alarms
            .retain(|existing| !existing.intent.filter_equals(intent));
        Ok(())
    }

    fn launch_intent(&self) -> Result<Intent> {
        match &self.launcher {
            Some(activity) => Ok(Intent::for_component(&self.package, activity)),
            None => Err(NotifierError::LaunchTargetUnavailable {
                package: self.package.clone(),
            }),
        }
    }

    fn package_name(&self) -> &str {
        &self.package
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(action: &str) -> Intent {
        Intent::for_component("com.example", "Receiver").with_action(action)
    }

    fn notification(title: &str) -> Notification {
        Notification {
            title: title.into(),
            body: String::new(),
            small_icon: 1,
            auto_cancel: true,
            content_intent: Intent::default(),
        }
    }

    #[test]
    fn matching_trigger_is_replaced() {
        let platform = InMemoryPlatform::new("com.example");
        platform.set_exact_wake(1_000, trigger("A")).unwrap();
        platform.set_exact_wake(2_000, trigger("A")).unwrap();
        platform.set_exact_wake(3_000, trigger("B")).unwrap();

        let pending = platform.pending();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().any(|alarm| {
            alarm.trigger_at_millis == 2_000 && alarm.intent.action.as_deref() == Some("A")
        }));
        assert_eq!(platform.next_due(), Some(2_000));
    }

    #[test]
    fn take_due_returns_earliest_first_and_keeps_the_rest() {
        let platform = InMemoryPlatform::new("com.example");
        platform.set_exact_wake(300, trigger("C")).unwrap();
        platform.set_exact_wake(100, trigger("A")).unwrap();
        platform.set_exact_wake(900, trigger("Z")).unwrap();

        let due = platform.take_due(300);
        let actions: Vec<_> = due
            .iter()
            .map(|alarm| alarm.intent.action.clone().unwrap())
            .collect();
        assert_eq!(actions, vec!["A", "C"]);
        assert_eq!(platform.pending().len(), 1);
        assert!(platform.take_due(299).is_empty());
    }

    #[test]
    fn cancel_and_dismiss_of_unknown_entries_are_noops() {
        let platform = InMemoryPlatform::new("com.example");
        platform.notify(1, notification("kept")).unwrap();
        platform.cancel_trigger(&trigger("missing")).unwrap();
        platform.dismiss(2).unwrap();
        assert_eq!(platform.visible().len(), 1);
    }

    #[test]
    fn launch_intent_requires_launcher() {
        let bare = InMemoryPlatform::new("com.example");
        assert!(matches!(
            bare.launch_intent(),
            Err(NotifierError::LaunchTargetUnavailable { ref package }) if package == "com.example"
        ));

        let app = InMemoryPlatform::with_launcher("com.example", "Main");
        let intent = app.launch_intent().unwrap();
        assert_eq!(intent.component.as_deref(), Some("Main"));
        assert_eq!(intent.package.as_deref(), Some("com.example"));
    }
}
