#![warn(missing_docs)]

//! Test setup shared by the tether crates.
//!
//! Annotate tests with `#[tether_testhelpers::test]` (usually through
//! `use tether_testhelpers::test;`) to get a tracing subscriber installed
//! before the test body runs. Output is filtered by the `TETHER_LOG`
//! environment variable, using `tracing_subscriber` target syntax
//! (`TETHER_LOG=tether=debug,tether_dom=off`). Everything is shown at TRACE
//! when it is unset.

pub use tether_testhelpers_macros::test;
#[doc(hidden)]
pub use tracing;

use std::sync::LazyLock;
use std::time::Instant;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter for tests.
pub const LOG_ENV: &str = "TETHER_LOG";

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

struct Uptime;

impl FormatTime for Uptime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:4}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

/// Parse a filter string, falling back to everything at TRACE.
fn filter_from(spec: Option<&str>) -> Targets {
    spec.and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::TRACE))
}

static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    let _ = *START_TIME;

    let spec = std::env::var(LOG_ENV).ok();
    let filter = filter_from(spec.as_deref());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_timer(Uptime)
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
});

/// Install the test subscriber. Safe to call from every test; only the first
/// call in a process does anything.
pub fn setup() {
    #[allow(clippy::let_unit_value)]
    let _ = *SUBSCRIBER_INIT;
}
