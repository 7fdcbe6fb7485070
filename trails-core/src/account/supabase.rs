use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::{sync::RwLock, time::Duration};
use tracing::debug;

use crate::{
    Config,
    error::{AuthError, AuthResult},
    provider::open_meteo::truncate_body,
};

use super::{
    AuthBackend, AuthSession, AuthUser, NewProfile, Profile, RecentUser, SignUpResponse,
    UserMetadata,
};

/// Auth endpoints under `/auth/v1`, the `profiles` table and stored procedures
/// under `/rest/v1`.
#[derive(Debug)]
pub struct SupabaseBackend {
    http: Client,
    base_url: String,
    anon_key: String,
    /// Token of the signed-in user; requests fall back to the anon key.
    access_token: RwLock<Option<String>>,
}

impl SupabaseBackend {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> AuthResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: RwLock::new(None),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (url, key) = config.backend_credentials()?;
        Ok(Self::new(url, key, config.backend_timeout())?)
    }

    /// Act as the user behind `token` for row-level-secured requests.
    pub fn set_access_token(&self, token: Option<String>) {
        let mut guard = self.access_token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    fn bearer(&self) -> String {
        let guard = self.access_token.read().unwrap_or_else(|e| e.into_inner());
        guard.clone().unwrap_or_else(|| self.anon_key.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_as(method, path, &self.bearer())
    }

    fn request_as(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> AuthResult<T> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "backend request failed");
            return Err(AuthError::from_backend_message(&error_message(status, &body)));
        }

        parse_json(&body)
    }

    async fn rpc<T: DeserializeOwned>(&self, function: &str, args: Value) -> AuthResult<T> {
        debug!(function, "calling stored procedure");
        let req = self.request(Method::POST, &format!("/rest/v1/rpc/{function}")).json(&args);
        self.send(req).await
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// `/signup` returns a bare user when confirmation is pending, or a session
/// when the project auto-confirms.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(AuthSession),
    User(AuthUser),
}

#[async_trait]
impl AuthBackend for SupabaseBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> AuthResult<SignUpResponse> {
        let req = self
            .request(Method::POST, "/auth/v1/signup")
            .json(&json!({ "email": email, "password": password, "data": metadata }));

        match self.send::<SignUpBody>(req).await? {
            SignUpBody::Session(session) => {
                self.set_access_token(Some(session.access_token.clone()));
                Ok(SignUpResponse {
                    user: session.user.clone(),
                    session: Some(session),
                })
            }
            SignUpBody::User(user) => Ok(SignUpResponse {
                user,
                session: None,
            }),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let req = self
            .request(Method::POST, "/auth/v1/token?grant_type=password")
            .json(&Credentials { email, password });

        let session: AuthSession = self.send(req).await?;
        self.set_access_token(Some(session.access_token.clone()));
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let res = self
            .request_as(Method::POST, "/auth/v1/logout", access_token)
            .send()
            .await?;
        self.set_access_token(None);

        let status = res.status();
        // An already-expired token is as signed out as it gets.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        let body = res.text().await?;
        Err(AuthError::from_backend_message(&error_message(status, &body)))
    }

    async fn get_user(&self, access_token: &str) -> AuthResult<Option<AuthUser>> {
        let res = self
            .request_as(Method::GET, "/auth/v1/user", access_token)
            .send()
            .await?;

        let status = res.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }

        let body = res.text().await?;
        if !status.is_success() {
            return Err(AuthError::from_backend_message(&error_message(status, &body)));
        }

        self.set_access_token(Some(access_token.to_string()));
        parse_json(&body).map(Some)
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> AuthResult<()> {
        let req = self
            .request(Method::POST, "/auth/v1/recover")
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }));

        self.send::<Value>(req).await.map(|_| ())
    }

    async fn force_confirm_user(&self, email: &str) -> AuthResult<bool> {
        let result: Value = self.rpc("force_confirm_user", json!({ "user_email": email })).await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    async fn create_user_profile(&self, profile: &NewProfile) -> AuthResult<()> {
        let args = serde_json::to_value(profile)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        self.rpc::<Value>("create_user_profile", args).await.map(|_| ())
    }

    async fn get_profile(&self, user_id: &str) -> AuthResult<Option<Profile>> {
        let filter = format!("eq.{user_id}");
        let req = self
            .request(Method::GET, "/rest/v1/profiles")
            .query(&[("id", filter.as_str()), ("select", "*")]);

        let rows: Vec<Profile> = self.send(req).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_recent_users(&self) -> AuthResult<Vec<RecentUser>> {
        self.rpc("list_recent_users", json!({})).await
    }

    async fn confirm_all_unconfirmed_users(&self) -> AuthResult<u64> {
        let result: Value = self.rpc("confirm_all_unconfirmed_users", json!({})).await?;
        result
            .as_u64()
            .ok_or_else(|| AuthError::InvalidResponse(format!("expected a count, got {result}")))
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> AuthResult<T> {
    // Some endpoints answer 2xx with an empty body.
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body)
        .map_err(|e| AuthError::InvalidResponse(format!("{e}: {}", truncate_body(body))))
}

/// Pull the human-readable message out of an error body. Auth endpoints use
/// `msg` or `error_description`; the REST layer uses `message`.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    field("msg")
        .or_else(|| field("error_description"))
        .or_else(|| field("message"))
        .or_else(|| field("error"))
        .unwrap_or_else(|| format!("Backend request failed with status {status}"))
}
