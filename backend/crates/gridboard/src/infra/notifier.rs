//! Reset link delivery
//!
//! Mail delivery lives outside this service. The bundled notifier writes the
//! link to the log so a developer can follow it.

use crate::application::password_reset::ResetNotifier;
use crate::domain::value_object::Email;

/// Logs reset links at `info`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResetNotifier;

impl ResetNotifier for LogResetNotifier {
    fn send_reset_link(&self, identity: &Email, link: &str) {
        tracing::info!(identity = %identity, link = %link, "Password reset link");
    }
}
