//! Authentication endpoints
//!
//! Maps to the backend `/auth` router:
//! - Login with the OAuth2 password form, storing the returned token
//! - Register a new account
//! - Fetch the logged-in user
//!
//! Logout and the authentication check are local: they only touch the session.

use crate::client::PlantsitterClient;
use crate::error::ApiResult;
use crate::operation::Operation;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Authentication API interface
#[derive(Clone)]
pub struct AuthApi {
    client: PlantsitterClient,
}

impl AuthApi {
    /// Create a new auth API interface
    pub(crate) fn new(client: PlantsitterClient) -> Self {
        Self { client }
    }

    /// Log in and persist the returned access token.
    ///
    /// POST /auth/login (form-encoded `username`, `password`)
    ///
    /// A rejected login leaves any previously stored token untouched.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<TokenResponse> {
        let form = [
            ("username", credentials.email.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let request = self
            .client
            .request_builder(Method::POST, "auth/login")
            .form(&form);

        let token: TokenResponse = self.client.execute(Operation::Login, request).await?;

        match token.access_token.as_deref() {
            Some(access_token) if !access_token.is_empty() => {
                self.client.session().store_token(access_token)?;
                info!("Logged in");
            }
            _ => debug!("Login response carried no access token"),
        }

        Ok(token)
    }

    /// Create a new account
    ///
    /// POST /auth/register
    pub async fn register(&self, user: &NewUser) -> ApiResult<User> {
        let request = self
            .client
            .request_builder(Method::POST, "auth/register")
            .json(user);
        self.client.execute(Operation::Register, request).await
    }

    /// Fetch the account behind the stored token
    ///
    /// GET /auth/me
    pub async fn current_user(&self) -> ApiResult<User> {
        let request = self
            .client
            .authorize(self.client.request_builder(Method::GET, "auth/me"))?;
        self.client.execute(Operation::CurrentUser, request).await
    }

    /// Forget the stored token
    pub fn logout(&self) -> ApiResult<()> {
        self.client.session().clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Whether a token is stored
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Login credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
}

/// Registration request
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "prenom")]
    pub surname: String,
    pub email: String,
    #[serde(rename = "mot_de_passe")]
    pub password: String,
    #[serde(rename = "telephone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "localisation", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl NewUser {
    /// Registration with the required fields only
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            email: email.into(),
            password: password.into(),
            phone: None,
            location: None,
        }
    }

    /// Set phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .field("location", &self.location)
            .finish()
    }
}

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "prenom")]
    pub surname: String,
    pub email: String,
    #[serde(rename = "telephone", default)]
    pub phone: Option<String>,
    #[serde(rename = "localisation", default)]
    pub location: Option<String>,
}
