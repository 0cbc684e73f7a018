//! Logging shims. With the `tracing` feature every event goes to the `cellscroll` target;
//! without it the macros expand to nothing.

#[cfg(feature = "tracing")]
macro_rules! log_event {
    ($level:ident, $($arg:tt)*) => {
        tracing::$level!(target: "cellscroll", $($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! log_event {
    ($level:ident, $($arg:tt)*) => {};
}

macro_rules! vtrace {
    ($($arg:tt)*) => {
        log_event!(trace, $($arg)*)
    };
}

macro_rules! vdebug {
    ($($arg:tt)*) => {
        log_event!(debug, $($arg)*)
    };
}

macro_rules! vwarn {
    ($($arg:tt)*) => {
        log_event!(warn, $($arg)*)
    };
}
