use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use event_emitter_rs::EventEmitter;
use uuid::Uuid;

use super::provider::IdentityProvider;
use super::{AccountId, AuthError, Session, MIN_PASSWORD_LEN};

const SESSION_EVENT: &str = "session";

struct Account {
    id: AccountId,
    password: String,
}

/// In-memory identity provider for tests and development.
///
/// Email/password table plus a single current session. Clone-friendly
/// via Arc.
#[derive(Clone)]
pub struct InMemoryIdentity {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    current: Arc<RwLock<Option<Session>>>,
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for InMemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        InMemoryIdentity {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            current: Arc::new(RwLock::new(None)),
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    fn set_session(&self, session: Option<Session>) -> Result<(), AuthError> {
        {
            let mut current = self
                .current
                .write()
                .map_err(|_| AuthError::Unexpected("session lock poisoned".to_string()))?;
            *current = session.clone();
        }
        let payload = serde_json::to_string(&session)
            .map_err(|e| AuthError::Unexpected(e.to_string()))?;
        let handles = {
            let mut emitter = self
                .emitter
                .lock()
                .map_err(|_| AuthError::Unexpected("emitter lock poisoned".to_string()))?;
            emitter.emit(SESSION_EVENT, payload)
        };
        // Listeners run on spawned threads; wait so a change returns only
        // after every subscriber has seen it.
        for handle in handles {
            let _ = handle.join();
        }
        Ok(())
    }
}

impl IdentityProvider for InMemoryIdentity {
    fn signup(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if !email.contains('@') || email.trim().is_empty() {
            return Err(AuthError::InvalidEmail);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let session = {
            let mut accounts = self
                .accounts
                .write()
                .map_err(|_| AuthError::Unexpected("accounts lock poisoned".to_string()))?;
            if accounts.contains_key(email) {
                return Err(AuthError::EmailTaken);
            }

            let id = AccountId::from(Uuid::new_v4().to_string());
            accounts.insert(
                email.to_string(),
                Account {
                    id: id.clone(),
                    password: password.to_string(),
                },
            );
            Session {
                account: id,
                email: email.to_string(),
            }
        };

        self.set_session(Some(session.clone()))?;
        Ok(session)
    }

    fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = {
            let accounts = self
                .accounts
                .read()
                .map_err(|_| AuthError::Unexpected("accounts lock poisoned".to_string()))?;
            let account = accounts.get(email).ok_or(AuthError::InvalidCredentials)?;
            if account.password != password {
                return Err(AuthError::InvalidCredentials);
            }
            Session {
                account: account.id.clone(),
                email: email.to_string(),
            }
        };

        self.set_session(Some(session.clone()))?;
        Ok(session)
    }

    fn logout(&self) -> Result<(), AuthError> {
        self.set_session(None)
    }

    fn current_session(&self) -> Result<Option<Session>, AuthError> {
        self.current
            .read()
            .map(|session| session.clone())
            .map_err(|_| AuthError::Unexpected("session lock poisoned".to_string()))
    }

    fn on_session<F>(&self, listener: F) -> Result<(), AuthError>
    where
        F: Fn(Option<Session>) + Send + Sync + 'static,
    {
        listener(self.current_session()?);

        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| AuthError::Unexpected("emitter lock poisoned".to_string()))?;
        emitter.on(SESSION_EVENT, move |payload: String| {
            if let Ok(session) = serde_json::from_str::<Option<Session>>(&payload) {
                listener(session);
            }
        });
        Ok(())
    }
}
