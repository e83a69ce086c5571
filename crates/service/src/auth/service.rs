use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use configs::AuthConfig;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::{Admin, Lookup};
use rand::rngs::OsRng;
use tracing::{info, instrument, warn};

use super::domain::{AdminSession, BootstrapInput, BootstrapOutcome, Claims, LoginInput, ResetPasswordInput};
use super::errors::AuthError;
use crate::storage::document_store::DocumentStore;

const MIN_PASSWORD_LEN: usize = 8;

/// Admin auth service independent of web framework
pub struct AdminAuthService {
    admins: Arc<dyn DocumentStore<Admin>>,
    cfg: AuthConfig,
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

fn check_new_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    Ok(())
}

impl AdminAuthService {
    pub fn new(admins: Arc<dyn DocumentStore<Admin>>, cfg: AuthConfig) -> Self { Self { admins, cfg } }

    async fn find(&self, username: &str) -> Result<Option<Admin>, AuthError> {
        let mut found = self.admins.find_by(&Lookup::Username(username.to_string())).await?;
        Ok(found.pop())
    }

    /// Whether any admin credential exists yet.
    pub async fn has_admin(&self) -> Result<bool, AuthError> {
        Ok(!self.admins.list().await?.is_empty())
    }

    /// Create the admin credential from an operator-supplied secret.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AdminAuthService, domain::{BootstrapInput, BootstrapOutcome}};
    /// use service::storage::Stores;
    /// use configs::AuthConfig;
    /// let stores = Stores::in_memory();
    /// let cfg = AuthConfig { jwt_secret: "0123456789abcdef".into(), token_ttl_hours: 1 };
    /// let svc = AdminAuthService::new(stores.admins.clone(), cfg);
    /// let input = BootstrapInput { username: "admin".into(), password: "long-enough".into(), reset: false };
    /// let out = tokio_test::block_on(svc.bootstrap(input)).unwrap();
    /// assert_eq!(out, BootstrapOutcome::Created);
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, reset = input.reset))]
    pub async fn bootstrap(&self, input: BootstrapInput) -> Result<BootstrapOutcome, AuthError> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("username must not be blank".into()));
        }
        check_new_password(&input.password)?;

        match self.find(username).await? {
            Some(existing) if !input.reset => {
                info!(event = "admin_bootstrap", admin_id = %existing.id, "admin already present; left unchanged");
                Ok(BootstrapOutcome::AlreadyPresent)
            }
            Some(mut existing) => {
                existing.password_hash = hash_password(&input.password)?;
                let id = existing.id.clone();
                self.admins.update(&id, existing).await?;
                warn!(event = "admin_bootstrap", admin_id = %id, "admin password reset by operator");
                Ok(BootstrapOutcome::Reset)
            }
            None => {
                let admin = Admin {
                    id: String::new(),
                    username: username.to_string(),
                    password_hash: hash_password(&input.password)?,
                };
                let created = self.admins.create(admin).await?;
                info!(event = "admin_bootstrap", admin_id = %created.id, "admin created");
                Ok(BootstrapOutcome::Created)
            }
        }
    }

    /// Verify the admin credential and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AdminAuthService, domain::{BootstrapInput, LoginInput}};
    /// use service::storage::Stores;
    /// use configs::AuthConfig;
    /// let stores = Stores::in_memory();
    /// let cfg = AuthConfig { jwt_secret: "0123456789abcdef".into(), token_ttl_hours: 1 };
    /// let svc = AdminAuthService::new(stores.admins.clone(), cfg);
    /// tokio_test::block_on(svc.bootstrap(BootstrapInput { username: "admin".into(), password: "Passw0rd!".into(), reset: false })).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "admin".into(), password: "Passw0rd!".into() })).unwrap();
    /// assert_eq!(session.username, "admin");
    /// assert!(svc.verify_token(&session.token).is_ok());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AdminSession, AuthError> {
        let admin = self.find(input.username.trim()).await?.ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.password, &admin.password_hash)? {
            warn!(event = "admin_login_failed", "password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let now = chrono::Utc::now();
        let exp = (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp();
        let claims = Claims { sub: admin.username.clone(), iat: now.timestamp(), exp };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;

        info!(event = "admin_login", admin_id = %admin.id, "admin logged in");
        Ok(AdminSession { username: admin.username, token, expires_at: exp })
    }

    /// Replace the admin password after verifying the current one.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn reset_password(&self, input: ResetPasswordInput) -> Result<(), AuthError> {
        check_new_password(&input.new_password)?;
        let mut admin = self.find(input.username.trim()).await?.ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.current_password, &admin.password_hash)? {
            return Err(AuthError::Unauthorized);
        }
        admin.password_hash = hash_password(&input.new_password)?;
        let id = admin.id.clone();
        self.admins.update(&id, admin).await?;
        info!(event = "admin_password_changed", admin_id = %id, "admin password changed");
        Ok(())
    }

    /// Decode and validate a bearer token, returning its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::Unauthorized)?;
        Ok(data.claims)
    }
}
