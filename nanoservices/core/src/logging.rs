/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` with
/// `debugging` on (see `settings.log.debugging`) and `info` without. Safe to
/// call more than once: later calls are ignored.
pub fn init(debugging: bool) {
    let default = if debugging { "debug" } else { "info" };
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| default.to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env))
        .try_init();
}
