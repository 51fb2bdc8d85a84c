use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use notifier_core::{
    memory::InMemoryPlatform, receiver::ScheduledAlarmHandler, NotificationAdapter,
    NotifierConfig, NotifierError,
};
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub(crate) package: String,
    pub(crate) launcher: String,
    pub(crate) delay_secs: i64,
    pub(crate) notifier: NotifierConfig,
}

impl DemoConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base = match lookup("NOTIFIER_CONFIG") {
            Some(path) => NotifierConfig::load(&path)
                .with_context(|| format!("failed to load notifier config `{path}`"))?,
            None => NotifierConfig::default(),
        };
        let mut config = Self {
            notifier: base
                .overlay(&lookup)
                .context("invalid notifier settings")?,
            ..Self::default()
        };
        if let Some(package) = lookup("NOTIFIER_PACKAGE") {
            if !package.trim().is_empty() {
                config.package = package.trim().to_string();
            }
        }
        if let Some(delay) = lookup("NOTIFIER_DEMO_DELAY_SECS") {
            let value = delay
                .trim()
                .parse::<i64>()
                .map_err(|_| NotifierError::Config {
                    key: "NOTIFIER_DEMO_DELAY_SECS".into(),
                    message: format!("`{delay}` is not a whole number of seconds"),
                })?;
            config.delay_secs = value.max(0);
        }
        Ok(config)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            package: "com.example.notifier".to_string(),
            launcher: "MainActivity".to_string(),
            delay_secs: 60,
            notifier: NotifierConfig::default(),
        }
    }
}

struct DemoActivity {
    platform: Arc<InMemoryPlatform>,
    adapter: Arc<NotificationAdapter>,
    handler: ScheduledAlarmHandler,
    delay: Duration,
}

impl DemoActivity {
    fn new(config: DemoConfig) -> Result<Self> {
        info!(package = %config.package, "initializing demo activity");
        let platform = Arc::new(InMemoryPlatform::with_launcher(
            config.package,
            config.launcher,
        ));
        let adapter = NotificationAdapter::builder()
            .with_platform(platform.clone())
            .with_config(config.notifier)
            .build()
            .context("failed to initialize notification adapter")?;
        let adapter = Arc::new(adapter);
        Ok(Self {
            handler: ScheduledAlarmHandler::new(adapter.clone()),
            platform,
            adapter,
            delay: Duration::seconds(config.delay_secs),
        })
    }

    /// What the test button does: one notification now, one later.
    fn on_test_notifier(&self, now: NaiveDateTime) -> Result<()> {
        self.adapter
            .show("Test", "This is a test notification", 0)
            .context("failed to show notification")?;
        self.adapter
            .show_at(
                "Test",
                "This is a test notification from the future.",
                1,
                now + self.delay,
            )
            .context("failed to schedule notification")?;
        Ok(())
    }

    fn fire_due(&self, now_millis: i64) -> usize {
        let due = self.platform.take_due(now_millis);
        for alarm in &due {
            if let Err(err) = self.handler.on_receive(&alarm.intent) {
                warn!(%err, action = ?alarm.intent.action, "failed to deliver trigger");
            }
        }
        due.len()
    }

    fn log_visible(&self) {
        for (id, notification) in self.platform.visible() {
            info!(id, title = %notification.title, body = %notification.body, "visible");
        }
    }
}

pub fn run(config: DemoConfig) -> Result<()> {
    let activity = DemoActivity::new(config)?;
    activity.on_test_notifier(Local::now().naive_local())?;
    activity.log_visible();
    let fired = run_until_idle(&activity);
    info!(fired, "no triggers left");
    activity.log_visible();
    Ok(())
}

/// Sleep until each pending trigger is due and deliver it. Returns how many fired.
fn run_until_idle(activity: &DemoActivity) -> usize {
    let mut total = 0;
    while let Some(next) = activity.platform.next_due() {
        let wait = next - Local::now().timestamp_millis();
        if wait > 0 {
            debug!(wait_ms = wait, "waiting for next trigger");
            std::thread::sleep(StdDuration::from_millis(wait as u64));
        }
        let fired = activity.fire_due(Local::now().timestamp_millis());
        info!(fired, "alarm service tick");
        total += fired;
    }
    total
}
