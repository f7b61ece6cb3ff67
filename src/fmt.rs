// Logging goes to defmt when the `defmt` feature is on. Without it the
// macros only borrow their arguments so call sites compile the same way.

#![allow(unused_macros)]

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:expr),* $(,)?) => {{ $( let _ = &$arg; )* }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:expr),* $(,)?) => {{ $( let _ = &$arg; )* }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:expr),* $(,)?) => {{ $( let _ = &$arg; )* }};
}

/// Report a failed collaborator write. Failures are never retried.
pub(crate) fn log_failure<E: core::fmt::Debug>(what: &str, err: &E) {
    #[cfg(feature = "defmt")]
    defmt::warn!("{} failed: {}", what, defmt::Debug2Format(err));
    #[cfg(not(feature = "defmt"))]
    let _ = (what, err);
}
