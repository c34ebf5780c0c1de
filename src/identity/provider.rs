use super::{AuthError, Session};

/// External identity provider seam.
///
/// Push-based like the store: `on_session` delivers the current session
/// whenever it changes, `None` when signed out.
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    fn signup(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Sign an existing account in.
    fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Sign the current session out.
    fn logout(&self) -> Result<(), AuthError>;

    /// The currently signed-in session, if any.
    fn current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Register a listener pushed the session on every change.
    fn on_session<F>(&self, listener: F) -> Result<(), AuthError>
    where
        F: Fn(Option<Session>) + Send + Sync + 'static;
}
