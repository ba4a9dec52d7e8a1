pub mod diagnostics;
pub mod projection;
pub mod study;

use tracing::warn;

/// Surface envelope warnings on stderr for commands that print bare rows.
pub(crate) fn log_warnings(warnings: &[String]) {
    for w in warnings {
        warn!("{w}");
    }
}
