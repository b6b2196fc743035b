//! Logging macros shared by the tether crates.
//!
//! The `cfg` inside each macro is evaluated in the crate that expands it, so
//! a crate logs when built with its own `tracing` feature or for its own unit
//! tests and compiles the call away otherwise. Such a crate needs `tracing`
//! both as an optional dependency and as a dev-dependency.

/// Forward to `tracing::trace!` when logging is enabled.
#[doc(hidden)]
#[macro_export]
macro_rules! __trace {
    ($($arg:tt)*) => {
        #[cfg(any(test, feature = "tracing"))]
        ::tracing::trace!($($arg)*);
    };
}

/// Forward to `tracing::debug!` when logging is enabled.
#[doc(hidden)]
#[macro_export]
macro_rules! __debug {
    ($($arg:tt)*) => {
        #[cfg(any(test, feature = "tracing"))]
        ::tracing::debug!($($arg)*);
    };
}

/// Forward to `tracing::warn!` when logging is enabled.
#[doc(hidden)]
#[macro_export]
macro_rules! __warn {
    ($($arg:tt)*) => {
        #[cfg(any(test, feature = "tracing"))]
        ::tracing::warn!($($arg)*);
    };
}

pub(crate) use crate::__trace as trace;
