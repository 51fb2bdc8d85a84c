pub mod app;

#[cfg(target_os = "android")]
use winit::platform::android::activity::AndroidApp;

#[cfg(target_os = "android")]
#[no_mangle]
pub extern "C" fn android_main(android_app: AndroidApp) {
    tracing_subscriber::fmt::init();

    let config = match app::DemoConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(err = %format!("{err:#}"), "invalid notifier configuration");
            return;
        }
    };
    tracing::info!(
        data_path = ?android_app.internal_data_path(),
        "starting notifier demo"
    );

    if let Err(err) = app::run(config) {
        tracing::error!(%err, "Android runtime terminated unexpectedly");
    }
}
