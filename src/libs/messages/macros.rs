//! Macros for operator-facing output.
//!
//! Every macro routes its message one of two ways:
//!
//! ```text
//! msg_info!(Message::..) ──▶ debug mode? ──yes──▶ tracing::info!
//!                                  │
//!                                  └───no───▶ println!
//! ```
//!
//! Debug mode is on when `DBKEEP_DEBUG` or `RUST_LOG` is set. In that mode
//! `main` installs a `tracing-subscriber` formatter, so operator messages and
//! the structured events emitted by the store layer end up in one stream.
//!
//! - **`msg_print!`**: section header, set off by blank lines
//! - **`msg_success!`**: ✅ prefix
//! - **`msg_info!`**: ℹ️ prefix
//! - **`msg_warning!`**: ⚠️ prefix
//! - **`msg_error!`**: ❌ prefix, stderr
//! - **`msg_debug!`**: 🔍 prefix, debug mode only
//!
//! `msg_success!` and `msg_warning!` take an optional second argument `true`
//! for closing summary lines, which are set off by blank lines as well.

use std::sync::OnceLock;

/// Cached result of the environment check.
static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Environment variable that switches output to `tracing`.
pub const DEBUG_ENV: &str = "DBKEEP_DEBUG";

#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var(DEBUG_ENV).is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Sends one formatted line to `tracing` at `$level` in debug mode, or to
/// the console macro `$console` otherwise.
#[doc(hidden)]
#[macro_export]
macro_rules! __msg_emit {
    ($level:ident, $console:ident, $($arg:tt)+) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$level!($($arg)+);
        } else {
            $console!($($arg)+);
        }
    };
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "\n{}\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "✅ {}", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "\n✅ {}\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        $crate::__msg_emit!(warn, println, "⚠️ {}", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(warn, println, "\n⚠️ {}\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "ℹ️ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        $crate::__msg_emit!(error, eprintln, "❌ {}", $msg)
    };
}

/// Only emitted in debug mode.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}
