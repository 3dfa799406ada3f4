use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::password::{hash_password, verify_password};
use super::{AuthError, AuthService, MIN_PASSWORD_LEN};
use crate::models::{AuthUser, ProfileUpdate};

/// In-memory AuthService for testing and offline fallback.
///
/// Accounts are keyed by lower-cased email. Passwords are kept as Argon2
/// hashes. Cheap to clone; clones share accounts and session.
#[derive(Clone, Debug, Default)]
pub struct MemoryAuth {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    /// Key into `accounts` of the signed-in account.
    current: Option<String>,
    fail_next: Option<AuthError>,
    calls: usize,
}

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    email: String,
    password_hash: String,
    display_name: Option<String>,
    photo_url: Option<String>,
}

impl Account {
    fn to_user(&self) -> AuthUser {
        AuthUser {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

impl State {
    /// Count a provider round-trip and surface an injected failure, if any.
    fn begin_call(&mut self) -> Result<(), AuthError> {
        self.calls += 1;
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn current_account(&mut self) -> Result<&mut Account, AuthError> {
        let key = self.current.clone().ok_or(AuthError::NotSignedIn)?;
        self.accounts.get_mut(&key).ok_or(AuthError::NotSignedIn)
    }
}

/// Loose `local@domain.tld` shape check, as the provider applies.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next provider call fail with `err`.
    pub fn fail_next(&self, err: AuthError) {
        self.lock().fail_next = Some(err);
    }

    /// Number of provider calls issued so far (session reads excluded).
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }
}

impl AuthService for MemoryAuth {
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let mut state = self.lock();
        state.begin_call()?;

        let key = account_key(email);
        if !is_valid_email(&key) {
            return Err(AuthError::InvalidEmail);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if state.accounts.contains_key(&key) {
            return Err(AuthError::EmailAlreadyInUse);
        }

        // The account's email is stored normalised; sessions report that form.
        let account = Account {
            uid: uuid::Uuid::new_v4().to_string(),
            email: key.clone(),
            password_hash: hash_password(password)?,
            display_name: None,
            photo_url: None,
        };
        let user = account.to_user();
        state.accounts.insert(key.clone(), account);
        state.current = Some(key);
        tracing::debug!(uid = %user.uid, "account created");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let mut state = self.lock();
        state.begin_call()?;

        let key = account_key(email);
        let account = state.accounts.get(&key).ok_or(AuthError::UserNotFound)?;
        if !verify_password(password, &account.password_hash)? {
            return Err(AuthError::InvalidCredential);
        }
        let user = account.to_user();
        state.current = Some(key);
        Ok(user)
    }

    fn current_session(&self) -> Option<AuthUser> {
        let state = self.lock();
        let key = state.current.as_ref()?;
        state.accounts.get(key).map(Account::to_user)
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<AuthUser, AuthError> {
        let mut state = self.lock();
        state.begin_call()?;

        let account = state.current_account()?;
        if let Some(name) = update.display_name {
            account.display_name = Some(name);
        }
        if let Some(url) = update.photo_url {
            account.photo_url = Some(url);
        }
        Ok(account.to_user())
    }

    async fn update_password(&self, new_password: &str) -> Result<(), AuthError> {
        let mut state = self.lock();
        state.begin_call()?;

        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let hash = hash_password(new_password)?;
        state.current_account()?.password_hash = hash;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut state = self.lock();
        state.begin_call()?;
        state.current = None;
        Ok(())
    }
}
