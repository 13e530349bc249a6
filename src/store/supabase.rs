use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::AppError;
use crate::profile::Profile;

use super::{ProfileStore, ProfileUpdate};

// ============================================================================
// Helper
// ============================================================================

/// Convert any displayable error into `AppError::Store`.
fn store_err(e: impl std::fmt::Display) -> AppError {
    AppError::Store(e.to_string())
}

// ============================================================================
// Configuration
// ============================================================================

/// Supabase project endpoint and anon key.
///
/// The anon key is a public client key by Supabase design — safe to embed in
/// the binary. Access control is enforced by Row Level Security policies and
/// the user's access token, not by the secrecy of this key.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub base_url: Url,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Auth(format!("Invalid Supabase URL: {}", e)))?;
        Ok(Self {
            base_url,
            anon_key: anon_key.into(),
        })
    }

    /// Resolve configuration from the environment.
    ///
    /// Priority per value: compile-time env (set during CI build) → runtime
    /// env var. `.env` files are honored for development.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::new(&resolve_env("SUPABASE_URL")?, resolve_env("SUPABASE_ANON_KEY")?)
    }
}

fn resolve_env(name: &'static str) -> Result<String, AppError> {
    let compiled = match name {
        "SUPABASE_URL" => option_env!("SUPABASE_URL"),
        "SUPABASE_ANON_KEY" => option_env!("SUPABASE_ANON_KEY"),
        _ => None,
    };
    if let Some(value) = compiled {
        return Ok(value.to_string());
    }
    std::env::var(name).map_err(|_| {
        AppError::Auth(format!(
            "{} not configured. Set it as an environment variable or rebuild with it set at compile time.",
            name
        ))
    })
}

// ============================================================================
// Row types (internal)
// ============================================================================

/// A `profiles` row as PostgREST returns it. Converted to the UI-facing
/// `Profile` before leaving this module.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    email: Option<String>,
    display_name: Option<String>,
    preferences: Option<serde_json::Value>,
    updated_at: Option<String>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            preferences: self.preferences,
            updated_at: self.updated_at,
        }
    }
}

// ============================================================================
// SupabaseProfileStore
// ============================================================================

/// HTTP client for the `profiles` table behind Supabase PostgREST.
pub struct SupabaseProfileStore {
    http: reqwest::Client,
    config: SupabaseConfig,
    access_token: String,
    user_id: String,
}

impl SupabaseProfileStore {
    /// Create a store scoped to one authenticated user.
    ///
    /// The underlying `reqwest::Client` is configured with a 30-second timeout.
    pub fn new(
        config: SupabaseConfig,
        access_token: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build reqwest client");

        Self {
            http,
            config,
            access_token: access_token.into(),
            user_id: user_id.into(),
        }
    }

    /// `{base}/rest/v1/profiles?id=eq.{user_id}` -- the single-row endpoint
    /// both operations hit.
    fn profile_endpoint(&self) -> String {
        format!(
            "{}rest/v1/profiles?id=eq.{}",
            self.config.base_url, self.user_id
        )
    }

    /// Build an authenticated request. PostgREST wants both the project
    /// `apikey` header and the user's bearer token; the `Accept` header asks
    /// for a bare object instead of a one-element array.
    fn authed(&self, method: reqwest::Method, endpoint: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, endpoint)
            .header("apikey", &self.config.anon_key)
            .header("Accept", "application/vnd.pgrst.object+json")
            .bearer_auth(&self.access_token)
    }

    /// Send a request, check the status code, and deserialize the row.
    async fn send_row(&self, req: reqwest::RequestBuilder) -> Result<Profile, AppError> {
        let resp = req.send().await.map_err(store_err)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "profiles endpoint returned {}: {}",
                status, body
            )));
        }

        let row: ProfileRow = resp.json().await.map_err(store_err)?;
        Ok(row.into_profile())
    }
}

#[async_trait]
impl ProfileStore for SupabaseProfileStore {
    /// `GET /rest/v1/profiles?id=eq.{uid}` -- fetch the user's profile row.
    async fn get_profile(&self) -> Result<Profile, AppError> {
        let endpoint = format!("{}&select=*", self.profile_endpoint());
        self.send_row(self.authed(reqwest::Method::GET, &endpoint)).await
    }

    /// `PATCH /rest/v1/profiles?id=eq.{uid}` -- write the preferences document
    /// and return the updated row.
    async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile, AppError> {
        let req = self
            .authed(reqwest::Method::PATCH, &self.profile_endpoint())
            .header("Prefer", "return=representation")
            .json(&update);
        self.send_row(req).await
    }
}
