//! Wire DTOs and session records shared by the auth flows.
//!
//! DESIGN
//! ======
//! Roles arrive as free-form strings from two places (the backend login
//! payload and auth-provider metadata). They are folded into the closed
//! [`Role`] enum at the serde boundary so nothing downstream matches on raw
//! strings, and unrecognized values survive as [`Role::Unknown`].

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Tokens are treated as expired this many seconds before `expires_at`.
pub const EXPIRY_SKEW_SECS: i64 = 30;

/// Permission tier of a signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Role {
    SuperAdmin,
    HrAdmin,
    /// `hr_user` and the legacy `hr_staff`.
    HrUser,
    Candidate,
    /// Anything else, including a missing role. Keeps the raw string.
    Unknown(String),
}

impl Default for Role {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "super_admin" => Self::SuperAdmin,
            "hr_admin" => Self::HrAdmin,
            "hr_user" | "hr_staff" => Self::HrUser,
            "candidate" => Self::Candidate,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::HrAdmin => "hr_admin",
            Self::HrUser => "hr_user",
            Self::Candidate => "candidate",
            Self::Unknown(raw) => raw,
        }
    }

    /// Human-readable badge text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::HrAdmin => "HR Admin",
            Self::HrUser => "HR",
            Self::Candidate => "Candidate",
            Self::Unknown(_) => "Member",
        }
    }
}

/// Null, absent, or non-string roles decode as `Unknown("")`.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(serde_json::Value::as_str).map(Role::parse).unwrap_or_default())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_owned()
    }
}

/// A signed-in user as reported by the backend login endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
}

/// Email + password pair posted to `/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self { email: email.trim().to_owned(), password: password.to_owned() }
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

/// Successful `/auth/login` response body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

/// User record as returned by the auth provider.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ProviderUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub app_metadata: serde_json::Value,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl ProviderUser {
    /// Convert to a [`User`], preferring the server-controlled `app_metadata`
    /// role over the self-declared `user_metadata` one.
    pub fn into_user(self) -> User {
        let role = metadata_str(&self.app_metadata, "role")
            .or_else(|| metadata_str(&self.user_metadata, "role"))
            .map(Role::parse)
            .unwrap_or_default();
        let full_name = metadata_str(&self.user_metadata, "full_name").map(str::to_owned);
        let company_id = metadata_str(&self.app_metadata, "company_id").map(str::to_owned);
        User { id: self.id, email: self.email.unwrap_or_default(), role, full_name, company_id }
    }
}

fn metadata_str<'a>(meta: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    meta.get(key).and_then(serde_json::Value::as_str).filter(|v| !v.is_empty())
}

/// Token response from the auth provider's refresh grant.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProviderGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: ProviderUser,
}

/// The authenticated visit: bearer credentials plus the user they belong to.
///
/// This is also the record persisted in browser storage between visits.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix seconds; `None` when the issuer did not say.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    pub fn from_login(grant: LoginGrant, now: i64) -> Self {
        Self {
            expires_at: resolve_expiry(grant.expires_at, grant.expires_in, now),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            user: grant.user,
        }
    }

    pub fn from_provider(grant: ProviderGrant, now: i64) -> Self {
        Self {
            expires_at: resolve_expiry(grant.expires_at, grant.expires_in, now),
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            user: grant.user.into_user(),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now + EXPIRY_SKEW_SECS)
    }
}

fn resolve_expiry(expires_at: Option<i64>, expires_in: Option<i64>, now: i64) -> Option<i64> {
    expires_at.or_else(|| expires_in.map(|secs| now + secs))
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}
