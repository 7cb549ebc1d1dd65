// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, password verification and the demo login.

use crate::db::memory::index_key;
use crate::db::MemoryDb;
use crate::error::{AppError, Result};
use crate::models::{Credentials, GradeLevel, User};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use serde::Deserialize;
use std::num::NonZeroU32;
use validator::{Validate, ValidationError};

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo";
pub const DEMO_EMAIL: &str = "demo@mergington.edu";

const SALT_LEN: usize = 16;
const PBKDF2_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Registration form.
#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(
        length(min = 3, max = 150),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub grade_level: Option<GradeLevel>,
}

fn validate_username(username: &str) -> std::result::Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset"))
    }
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<(String, String)> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to generate password salt")))?;

    let mut hash = [0u8; digest::SHA256_OUTPUT_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        PBKDF2_ITERATIONS,
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok((hex::encode(salt), hex::encode(hash)))
}

/// Check a password against stored credentials in constant time.
pub fn verify_password(credentials: &Credentials, password: &str) -> bool {
    let (Ok(salt), Ok(hash)) = (
        hex::decode(&credentials.salt),
        hex::decode(&credentials.password_hash),
    ) else {
        return false;
    };

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        PBKDF2_ITERATIONS,
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}

/// Whether `email` is the demo student's address.
pub fn is_demo_email(email: &str) -> bool {
    index_key(email) == DEMO_EMAIL
}

/// Account creation and login.
#[derive(Clone)]
pub struct AuthService {
    db: MemoryDb,
    demo_login_enabled: bool,
}

impl AuthService {
    pub fn new(db: MemoryDb, demo_login_enabled: bool) -> Self {
        Self {
            db,
            demo_login_enabled,
        }
    }

    /// Create an account.
    pub fn register(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User> {
        new_user.validate()?;

        if self.demo_login_enabled && index_key(&new_user.username) == DEMO_USERNAME {
            return Err(AppError::Conflict(format!(
                "Username '{}' is reserved",
                new_user.username
            )));
        }
        if self.demo_login_enabled && is_demo_email(&new_user.email) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is reserved",
                new_user.email.trim()
            )));
        }

        let user = self.store_user(
            new_user.username.trim(),
            new_user.email.trim(),
            &new_user.password,
            new_user.first_name.trim(),
            new_user.last_name.trim(),
            new_user.grade_level,
            now,
        )?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verify a username/password pair.
    ///
    /// When demo login is enabled and verification fails, `demo` / `demo`
    /// is still accepted and resolves to the demo student.
    pub fn login(&self, username: &str, password: &str, now: DateTime<Utc>) -> Result<User> {
        if let Some(credentials) = self.db.find_credentials(username) {
            if verify_password(&credentials, password) {
                if let Some(user) = self.db.get_user(credentials.user_id) {
                    tracing::info!(user_id = user.id, "Login successful");
                    return Ok(user);
                }
            }
        }

        if self.demo_login_enabled && username == DEMO_USERNAME && password == DEMO_PASSWORD {
            tracing::info!("Demo credentials accepted");
            return self.ensure_demo_user(now);
        }

        tracing::warn!(username, "Login failed");
        Err(AppError::InvalidCredentials)
    }

    /// Return the demo student, creating it on first use.
    pub fn ensure_demo_user(&self, now: DateTime<Utc>) -> Result<User> {
        if let Some(user) = self.db.find_user_by_username(DEMO_USERNAME) {
            return Ok(user);
        }

        match self.store_user(
            DEMO_USERNAME,
            DEMO_EMAIL,
            DEMO_PASSWORD,
            "Demo",
            "Student",
            None,
            now,
        ) {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Demo user created");
                Ok(user)
            }
            // Lost a race with a concurrent login; the winner's record is there now.
            Err(AppError::Conflict(_)) => self
                .db
                .find_user_by_username(DEMO_USERNAME)
                .ok_or(AppError::InvalidCredentials),
            Err(e) => Err(e),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn store_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        grade_level: Option<GradeLevel>,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let (salt, password_hash) = hash_password(password)?;
        let id = self.db.next_id();
        let timestamp = format_utc_rfc3339(now);

        let user = User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            grade_level,
            height_cm: None,
            weight_kg: None,
            fitness_goals: String::new(),
            preferred_activities: String::new(),
            carried_points: 0,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        let credentials = Credentials {
            user_id: id,
            salt,
            password_hash,
        };

        self.db.insert_user(user.clone(), credentials)?;
        Ok(user)
    }
}
