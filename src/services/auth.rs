//! Credential service: registration, login, token issuance and
//! verification, password change.

use chrono::Utc;
use rand::Rng;
use std::sync::Arc;

use crate::models::{LoginResponse, NewUser, TokenIdentity, User, UserProfile, UserUpdate};
use crate::services::{JwtService, ServiceError};
use crate::store::RecordStore;
use crate::utils::{
    classify_identity, hash_password, verify_password, LoginIdentity, Password,
    PasswordHashString,
};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn RecordStore>,
    jwt: JwtService,
    password_cost: u32,
    registration_group_id: i64,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        jwt: JwtService,
        password_cost: u32,
        registration_group_id: i64,
    ) -> Self {
        Self {
            store,
            jwt,
            password_cost,
            registration_group_id,
        }
    }

    /// Create a user in the default registration group.
    ///
    /// A taken name or email surfaces as `DuplicateEntry`, distinct from
    /// other store failures.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ServiceError> {
        let password_hash = hash_password(&Password::new(password.to_string()), self.password_cost)
            .map_err(ServiceError::Internal)?;

        let user = self
            .store
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.into_string(),
                group_id: self.registration_group_id,
            })
            .await?;

        let group = self.group_name(user.group_id).await?;

        tracing::info!(user_id = user.id, "user registered");

        Ok(UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            group,
        })
    }

    /// Authenticate with a name or email plus password.
    ///
    /// The refresh token is created on the first successful login and
    /// reused afterwards; only a password change rotates it. The access
    /// token is fresh on every call.
    pub async fn login(&self, identity: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        let identity = classify_identity(identity).ok_or_else(|| {
            ServiceError::InvalidArgument("name or email is not provided".to_string())
        })?;

        let user = match identity {
            LoginIdentity::Email(email) => self.store.get_user_by_email(email).await?,
            LoginIdentity::Name(name) => self.store.get_user_by_name(name).await?,
        }
        .ok_or(ServiceError::UserNotFound)?;

        self.check_password(&user, password)?;

        let group = self.group_name(user.group_id).await?;

        let now = Utc::now();
        let mut update = UserUpdate {
            last_login: Some(now),
            last_access_token_issued: Some(now),
            ..Default::default()
        };

        let refresh_token = match user.refresh_token.clone() {
            Some(token) => token,
            None => {
                // First login. Two concurrent first logins race benignly:
                // last write wins, and the loser self-corrects next login.
                let token = generate_refresh_token();
                update.refresh_token = Some(token.clone());
                update.last_refresh_token_issued = Some(now);
                token
            }
        };

        let access_token = self
            .jwt
            .generate_access_token(user.id, &user.name, &group)
            .map_err(ServiceError::Internal)?;

        if self.store.update_user(user.id, update).await? == 0 {
            return Err(ServiceError::UserNotFound);
        }

        tracing::info!(user_id = user.id, "user logged in");

        Ok(LoginResponse {
            id: user.id,
            name: user.name,
            group,
            refresh_token,
            access_token,
        })
    }

    /// Mint a new access token for the holder of a refresh token.
    ///
    /// No password required, and the refresh token is not rotated.
    pub async fn issue_access_token(&self, refresh_token: &str) -> Result<String, ServiceError> {
        let user = self
            .store
            .get_user_by_refresh_token(refresh_token)
            .await?
            .ok_or(ServiceError::InvalidRefreshToken)?;

        let group = self.group_name(user.group_id).await?;

        let access_token = self
            .jwt
            .generate_access_token(user.id, &user.name, &group)
            .map_err(ServiceError::Internal)?;

        let update = UserUpdate {
            last_access_token_issued: Some(Utc::now()),
            ..Default::default()
        };
        if self.store.update_user(user.id, update).await? == 0 {
            return Err(ServiceError::UserNotFound);
        }

        tracing::info!(user_id = user.id, "access token issued from refresh token");

        Ok(access_token)
    }

    /// Validate an access token and return the identity it carries.
    ///
    /// Signature mismatch, expiry, and malformed payloads all collapse
    /// into the same error kind; callers learn nothing more.
    pub fn verify_access_token(&self, token: &str) -> Result<TokenIdentity, ServiceError> {
        let claims = self.jwt.validate_access_token(token).map_err(|_| {
            ServiceError::InvalidArgument("invalid or expired access token".to_string())
        })?;

        Ok(TokenIdentity {
            id: claims.sub,
            name: claims.name,
            group: claims.group,
        })
    }

    /// Verify the current password, store a new hash, and rotate the
    /// refresh token — invalidating every previously issued
    /// refresh-based session.
    pub async fn change_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let user = self
            .store
            .get_user_by_id(id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        self.check_password(&user, current_password)?;

        let password_hash =
            hash_password(&Password::new(new_password.to_string()), self.password_cost)
                .map_err(ServiceError::Internal)?;

        let now = Utc::now();
        let update = UserUpdate {
            password_hash: Some(password_hash.into_string()),
            refresh_token: Some(generate_refresh_token()),
            last_password_changed: Some(now),
            last_refresh_token_issued: Some(now),
            ..Default::default()
        };

        // Update-by-id: the user vanishing mid-flight shows up here as
        // zero affected rows.
        if self.store.update_user(id, update).await? == 0 {
            return Err(ServiceError::UserNotFound);
        }

        tracing::info!(user_id = id, "password changed, refresh token rotated");

        Ok(())
    }

    fn check_password(&self, user: &User, password: &str) -> Result<(), ServiceError> {
        verify_password(
            &Password::new(password.to_string()),
            &PasswordHashString::new(user.password_hash.clone()),
        )
        .map_err(|_| ServiceError::PasswordMismatch)
    }

    async fn group_name(&self, group_id: i64) -> Result<String, ServiceError> {
        Ok(self
            .store
            .get_group_by_id(group_id)
            .await?
            .ok_or(ServiceError::GroupNotFound(group_id))?
            .name)
    }
}

/// Opaque refresh token: 64 random bytes, hex-encoded.
fn generate_refresh_token() -> String {
    let mut token_bytes = [0u8; 64];
    rand::thread_rng().fill(&mut token_bytes[..]);
    hex::encode(token_bytes)
}
