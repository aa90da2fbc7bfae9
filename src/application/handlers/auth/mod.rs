//! Authentication command handlers.
//!
//! Each handler consults its rate limiter before touching credentials,
//! delegates session work to the `SessionValidator`, and publishes a
//! domain event once state has changed. Event delivery failures are
//! logged and never fail the command.

mod authenticate;
mod change_password;
mod login;
mod logout;
mod register;

#[cfg(test)]
pub(crate) mod test_support;

pub use authenticate::{AuthenticateCommand, AuthenticateHandler};
pub use change_password::{ChangePasswordCommand, ChangePasswordHandler, ChangePasswordResult};
pub use login::{LoginCommand, LoginHandler, LoginResult};
pub use logout::{LogoutCommand, LogoutHandler, LogoutResult};
pub use register::{RegisterCommand, RegisterHandler, RegisterResult};

use tracing::warn;

use crate::domain::foundation::{RequestContext, SerializableDomainEvent, UserId};
use crate::ports::EventPublisher;

/// Rate-limit key for login attempts from one client address.
pub fn login_ip_key(ip_address: &str) -> String {
    format!("login:{}", ip_address)
}

/// Rate-limit key for login attempts against one account.
pub fn login_email_key(email: &str) -> String {
    format!("login:{}", email)
}

/// Rate-limit key for registrations from one client address.
pub fn register_ip_key(ip_address: &str) -> String {
    format!("register:{}", ip_address)
}

/// Rate-limit key for password changes on one account.
pub fn password_change_key(user_id: &UserId) -> String {
    format!("password:{}", user_id)
}

async fn publish_event<E: SerializableDomainEvent>(
    publisher: &dyn EventPublisher,
    event: &E,
    user_id: &UserId,
    ctx: &RequestContext,
) {
    let envelope = event
        .to_envelope()
        .with_correlation_id(ctx.correlation_id())
        .with_user_id(user_id.to_string());

    if let Err(e) = publisher.publish(envelope).await {
        warn!(
            event_type = event.event_type(),
            user_id = %user_id,
            error = %e,
            "Failed to publish domain event"
        );
    }
}
