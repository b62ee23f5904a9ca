use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::filter;
use tracing_subscriber::fmt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;
use tracing_subscriber::{self, layer::SubscriberExt};

/// Log to stderr, filtered through `RUST_LOG` (info and up when unset).
///
/// Filter directives like
/// `RUST_LOG=function_proxy::registry=trace,function_proxy=debug,info`
/// narrow the output per module; `RUST_LOG='[function_name]=trace'` logs
/// everything inside an instrumented function. For the full syntax see the
/// tracing-subscriber `EnvFilter` docs.
pub fn setup() {
    let env_filter = filter::EnvFilter::builder()
        .with_regex(true)
        .try_from_env()
        .unwrap_or_else(|_| {
            filter::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .parse_lossy("")
        });

    let fmt = fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    tracing_subscriber::Registry::default()
        .with(ErrorLayer::default())
        .with(fmt.with_filter(env_filter))
        .init();
}

/// Same as [`setup`] but safe to call from every test: only the first call
/// installs anything, and color-eyre comes along for readable reports.
pub fn setup_for_tests() {
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        color_eyre::install().unwrap();

        let fmt = fmt::layer()
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_ansi(true)
            .pretty()
            .with_filter(filter::EnvFilter::from_default_env());

        tracing_subscriber::registry()
            .with(fmt)
            .with(ErrorLayer::default())
            .init();
    });
}
