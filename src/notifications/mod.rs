use async_trait::async_trait;

use crate::auth::identifier::Identifier;
use crate::errors::ServiceError;

/// Outbound delivery of verification and password-reset codes.
///
/// The source system pushed these through a third-party email/SMS vendor;
/// that integration is out of scope here, so the default implementation logs
/// the message. Tests substitute a capturing implementation.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_verification_code(
        &self,
        target: &Identifier,
        full_name: &str,
        code: &str,
    ) -> Result<(), ServiceError>;

    async fn send_password_reset_code(
        &self,
        target: &Identifier,
        full_name: &str,
        code: &str,
    ) -> Result<(), ServiceError>;
}

/// Notifier that writes the code to the log instead of delivering it.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_verification_code(
        &self,
        target: &Identifier,
        full_name: &str,
        code: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            target = %target,
            full_name,
            code,
            "verification code issued (10 minute validity)"
        );
        Ok(())
    }

    async fn send_password_reset_code(
        &self,
        target: &Identifier,
        full_name: &str,
        code: &str,
    ) -> Result<(), ServiceError> {
        tracing::info!(
            target = %target,
            full_name,
            code,
            "password reset code issued (10 minute validity)"
        );
        Ok(())
    }
}
