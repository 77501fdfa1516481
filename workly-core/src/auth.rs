//! Account registration and credential checks.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::{WorklyError, WorklyResult};
use crate::user::User;
use crate::validation::{
    validate_email, validate_not_empty, validate_password, validate_password_match,
};

/// A stored account: the public user plus its credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub user: User,
    pub credential: Credential,
}

/// Argon2id password hash in PHC string form (salt and parameters included).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    hash: String,
}

impl Credential {
    pub fn new(password: &str) -> WorklyResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| WorklyError::Credential(e.to_string()))?
            .to_string();
        Ok(Credential { hash })
    }

    /// False for a wrong password and for a hash that can't be parsed.
    pub fn verify(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            tracing::warn!("stored credential is not a valid PHC string");
            return false;
        };
        hasher().verify_password(password.as_bytes(), &parsed).is_ok()
    }
}

#[cfg(not(test))]
fn hasher() -> Argon2<'static> {
    Argon2::default()
}

// Minimum cost so the test suite doesn't spend seconds per sign-up.
#[cfg(test)]
fn hasher() -> Argon2<'static> {
    use argon2::{Algorithm, Params, Version};

    let params = Params::new(
        Params::MIN_M_COST,
        Params::MIN_T_COST,
        Params::MIN_P_COST,
        None,
    )
    .expect("minimum argon2 params are valid");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// Sign-up form input.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl SignUp {
    pub fn validate(&self) -> WorklyResult<()> {
        validate_not_empty("Name", &self.display_name)
            .and(|| validate_email(&self.email))
            .and(|| validate_password(&self.password))
            .and(|| validate_password_match(&self.password, &self.confirmation))
            .into_result()
    }
}

/// Validate the form and register a new account.
pub async fn sign_up(backend: &dyn Backend, form: SignUp) -> WorklyResult<User> {
    form.validate()?;

    let user = User::new(&form.email, &form.display_name);
    let account = Account {
        user: user.clone(),
        credential: Credential::new(&form.password)?,
    };
    backend.insert_account(account).await?;

    tracing::info!(user_id = %user.id, "account created");
    Ok(user)
}

/// Check credentials. Unknown emails and wrong passwords fail the same way.
pub async fn sign_in(backend: &dyn Backend, email: &str, password: &str) -> WorklyResult<User> {
    validate_email(email).into_result()?;

    let Some(account) = backend.account_by_email(email).await? else {
        tracing::debug!("sign-in for unknown email");
        return Err(WorklyError::InvalidCredentials);
    };

    if !account.credential.verify(password) {
        tracing::debug!(user_id = %account.user.id, "sign-in with wrong password");
        return Err(WorklyError::InvalidCredentials);
    }

    Ok(account.user)
}
