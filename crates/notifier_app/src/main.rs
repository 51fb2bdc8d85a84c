use notifier_app::app::{run, DemoConfig};

#[cfg(target_os = "android")]
fn main() {
    // Android entry-point handled via `lib.rs`.
}

#[cfg(not(target_os = "android"))]
fn main() {
    tracing_subscriber::fmt::init();
    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid notifier configuration: {err:#}");
            return;
        }
    };
    if let Err(err) = run(config) {
        eprintln!("Notifier demo failed: {err:#}");
    }
}
