//! Authentication use-case service.
//!
//! # Responsibility
//! - Register students with salted password hashes.
//! - Verify credentials and issue, resolve and revoke session tokens.
//! - Check the configured administrator credential pair.
//!
//! # Invariants
//! - Plaintext passwords never reach the store, the logs, or a response.
//! - Email uniqueness is checked inside the same locked cycle as the append.

use super::password::{burn_verification, constant_time_eq, hash_password, verify_password};
use super::{required, ServiceError, ServiceResult};
use crate::config::AdminCredentials;
use crate::model::id::RecordId;
use crate::model::student::{deserialize_optional_percentage, Student, StudentProfile};
use crate::session::SessionStore;
use crate::store::RecordStore;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Registration input. Absent or blank required fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Number or numeric string; anything unparsable reads as 0.
    #[serde(default, deserialize_with = "deserialize_optional_percentage")]
    pub percentage: Option<f64>,
}

impl RegisterRequest {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            percentage: None,
        }
    }

    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }
}

/// Student login input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }
}

/// Administrator login input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdminLoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Successful login: the session token plus the public profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: StudentProfile,
}

/// Authentication service over a record store and a session registry.
pub struct AuthService<S: RecordStore, R: SessionStore> {
    store: S,
    sessions: R,
    admin: Option<AdminCredentials>,
}

impl<S: RecordStore, R: SessionStore> AuthService<S, R> {
    /// Creates a service with no administrator pair; admin login always fails.
    pub fn new(store: S, sessions: R) -> Self {
        Self {
            store,
            sessions,
            admin: None,
        }
    }

    pub fn with_admin(mut self, admin: Option<AdminCredentials>) -> Self {
        self.admin = admin;
        self
    }

    pub fn sessions(&self) -> &R {
        &self.sessions
    }

    /// Registers one student and returns the new identifier.
    ///
    /// # Errors
    /// - `InvalidInput` when name, email or password is missing.
    /// - `DuplicateUser` when the email is already registered.
    /// - `Storage` when the document cannot be read or written.
    pub fn register(&self, request: &RegisterRequest) -> ServiceResult<RecordId> {
        let (Some(name), Some(email), Some(password)) = (
            required(request.name.as_deref()),
            required(request.email.as_deref()),
            request.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(ServiceError::missing("name, email, password"));
        };

        let password_hash = hash_password(password).map_err(|err| {
            warn!("event=register module=auth status=error error_code=hash_failed error={err}");
            ServiceError::Internal("password could not be hashed".to_string())
        })?;

        let id = self.store.update(|document| {
            if document.find_student_by_email(email).is_some() {
                return Err(ServiceError::DuplicateUser);
            }
            let id = RecordId::generate();
            document.students.push(Student {
                id: id.clone(),
                name: name.to_string(),
                email: email.to_string(),
                password: password_hash,
                percentage: request.percentage.unwrap_or(0.0),
            });
            Ok(id)
        });

        match &id {
            Ok(id) => info!("event=register module=auth status=ok student_id={id}"),
            Err(err) => info!(
                "event=register module=auth status=rejected error_code={}",
                err.kind().as_str()
            ),
        }
        id
    }

    /// Verifies credentials and opens a session.
    ///
    /// # Errors
    /// - `InvalidInput` when email or password is missing.
    /// - `InvalidCredentials` when the email is unknown or the password is wrong.
    pub fn login(&self, request: &LoginRequest) -> ServiceResult<LoginOutcome> {
        let (Some(email), Some(password)) = (
            required(request.email.as_deref()),
            request.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(ServiceError::missing("email, password"));
        };

        let document = self.store.load()?;
        let Some(student) = document.find_student_by_email(email) else {
            burn_verification(password);
            info!("event=login module=auth status=rejected error_code=invalid_credentials");
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_password(password, &student.password) {
            info!("event=login module=auth status=rejected error_code=invalid_credentials");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.sessions.create(&student.email);
        info!("event=login module=auth status=ok student_id={}", student.id);
        Ok(LoginOutcome {
            token,
            user: student.profile(),
        })
    }

    /// Resolves a session token to the student's public profile.
    ///
    /// # Errors
    /// - `InvalidSession` when the token is absent, unknown, or its student
    ///   no longer exists.
    pub fn check_session(&self, token: Option<&str>) -> ServiceResult<StudentProfile> {
        let email = token
            .filter(|t| !t.is_empty())
            .and_then(|t| self.sessions.lookup(t))
            .ok_or(ServiceError::InvalidSession)?;

        let document = self.store.load()?;
        document
            .find_student_by_email(&email)
            .map(Student::profile)
            .ok_or(ServiceError::InvalidSession)
    }

    /// Revokes the token when present. Always succeeds.
    pub fn logout(&self, token: Option<&str>) {
        if let Some(token) = token {
            self.sessions.revoke(token);
        }
    }

    /// Checks the configured administrator pair in constant time.
    ///
    /// # Errors
    /// - `InvalidInput` when username or password is missing.
    /// - `InvalidCredentials` on mismatch or when no pair is configured.
    pub fn admin_login(&self, request: &AdminLoginRequest) -> ServiceResult<()> {
        let (Some(username), Some(password)) =
            (request.username.as_deref(), request.password.as_deref())
        else {
            return Err(ServiceError::missing("username, password"));
        };

        let Some(admin) = &self.admin else {
            warn!("event=admin_login module=auth status=rejected reason=not_configured");
            return Err(ServiceError::InvalidCredentials);
        };

        let user_ok = constant_time_eq(username.as_bytes(), admin.username.as_bytes());
        let pass_ok = constant_time_eq(password.as_bytes(), admin.password.as_bytes());
        if user_ok & pass_ok {
            info!("event=admin_login module=auth status=ok");
            Ok(())
        } else {
            info!("event=admin_login module=auth status=rejected");
            Err(ServiceError::InvalidCredentials)
        }
    }
}
