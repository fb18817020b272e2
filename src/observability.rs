//! Crate-internal logging macros.
//!
//! Events go to `tracing` when that feature is on, otherwise to `log` with the
//! `logging` feature. With neither, the macros compile to nothing but still
//! type-check their format arguments.

#[allow(dead_code)]
pub(crate) const TARGET: &str = "xfcc_authz";

macro_rules! log_event {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        { tracing::$level!(target: $crate::observability::TARGET, $($arg)*); }

        #[cfg(all(not(feature = "tracing"), feature = "logging"))]
        { log::$level!(target: $crate::observability::TARGET, $($arg)*); }

        #[cfg(all(not(feature = "tracing"), not(feature = "logging")))]
        { let _ = format_args!($($arg)*); }
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::observability::log_event!(debug, $($arg)*) };
}

macro_rules! log_info {
    ($($arg:tt)*) => { $crate::observability::log_event!(info, $($arg)*) };
}

macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::observability::log_event!(warn, $($arg)*) };
}

pub(crate) use log_debug;
pub(crate) use log_event;
pub(crate) use log_info;
pub(crate) use log_warn;
