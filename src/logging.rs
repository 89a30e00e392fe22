use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV_VAR: &str = "PROWLER_LOG";

static INIT: Once = Once::new();

/// Installs the stderr subscriber once. Levels come from `PROWLER_LOG`
/// (e.g. `PROWLER_LOG=prowler=debug`), defaulting to `prowler=info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("prowler=info"));
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}
