//! Accounts against the hosted auth/database backend.
//!
//! Every account is created through [`AuthBackend`]; the local [`SessionStore`]
//! only caches what the backend issued, plus the demo session.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};
use tracing::{debug, info, warn};

use crate::{
    demo::{self, DemoUserData},
    error::AuthResult,
    session::SessionStore,
};

pub mod supabase;
pub mod validation;

pub use validation::{ResetPasswordForm, SignInForm, SignUpForm, SimpleCaptcha, generate_username};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserMetadata {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AuthUser {
    pub fn is_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }
}

/// A row of the `profiles` table, keyed by user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            self.username.clone().unwrap_or_else(|| self.id.clone())
        } else {
            name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpResponse {
    pub user: AuthUser,
    pub session: Option<AuthSession>,
}

/// Arguments of the `create_user_profile` procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProfile {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait AuthBackend: Send + Sync + Debug {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> AuthResult<SignUpResponse>;

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession>;

    async fn sign_out(&self, access_token: &str) -> AuthResult<()>;

    /// The user behind `access_token`, or `None` when the token is no longer valid.
    async fn get_user(&self, access_token: &str) -> AuthResult<Option<AuthUser>>;

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> AuthResult<()>;

    /// Mark the account for `email` as confirmed. Returns whether a row changed.
    async fn force_confirm_user(&self, email: &str) -> AuthResult<bool>;

    async fn create_user_profile(&self, profile: &NewProfile) -> AuthResult<()>;

    async fn get_profile(&self, user_id: &str) -> AuthResult<Option<Profile>>;

    async fn list_recent_users(&self) -> AuthResult<Vec<RecentUser>>;

    /// Returns the number of accounts confirmed.
    async fn confirm_all_unconfirmed_users(&self) -> AuthResult<u64>;
}

/// Bounded polling with exponential backoff, used to wait for a backend side
/// effect (such as a trigger-created profile row) to become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl PollPolicy {
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// How the profile row came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    /// Visible after polling (typically created by a database trigger).
    Existing,
    /// Created through the `create_user_profile` procedure.
    Created,
    /// Neither appeared nor could be created.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user_id: String,
    pub email_confirmed: bool,
    pub profile: ProfileStatus,
    pub auto_signed_in: bool,
}

impl SignUpOutcome {
    pub fn message(&self) -> &'static str {
        if self.auto_signed_in {
            "Account created successfully! Welcome to Tail Trails!"
        } else {
            "Account created successfully! Please sign in with your credentials."
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    Demo(DemoUserData),
    User {
        user: AuthUser,
        profile: Option<Profile>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentProfile {
    pub user: AuthUser,
    pub profile: Option<Profile>,
    pub is_demo: bool,
}

/// Starts the demo session when `form` carries the demo credentials.
///
/// Needs no backend, so callers can try it before any backend is configured.
pub fn demo_sign_in(
    sessions: &SessionStore,
    form: &SignInForm,
) -> AuthResult<Option<DemoUserData>> {
    if !demo::is_demo_credentials(form.email.trim(), &form.password) {
        return Ok(None);
    }

    info!("demo login detected");
    let session = sessions.create_demo_session()?;
    Ok(Some(DemoUserData {
        user: session.user,
        profile: session.profile,
    }))
}

#[derive(Debug)]
pub struct AccountService<B: AuthBackend> {
    backend: B,
    sessions: SessionStore,
    site_url: Option<String>,
    poll: PollPolicy,
}

impl<B: AuthBackend> AccountService<B> {
    pub fn new(backend: B, sessions: SessionStore) -> Self {
        Self {
            backend,
            sessions,
            site_url: None,
            poll: PollPolicy::default(),
        }
    }

    pub fn with_site_url(mut self, site_url: Option<String>) -> Self {
        self.site_url = site_url;
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Validate, create the account, confirm it, make sure its profile row exists,
    /// then sign in.
    pub async fn sign_up(&self, form: &SignUpForm) -> AuthResult<SignUpOutcome> {
        form.validate()?;

        let username =
            generate_username(&form.first_name, &form.last_name, &mut rand::thread_rng());
        let metadata = UserMetadata {
            first_name: Some(form.first_name.trim().to_string()),
            last_name: Some(form.last_name.trim().to_string()),
            username: Some(username.clone()),
        };
        let email = form.email.trim();

        info!(email, "attempting sign up");
        let response = self.backend.sign_up(email, &form.password, &metadata).await?;
        let user = response.user;
        debug!(
            user_id = %user.id,
            confirmed = user.is_confirmed(),
            has_session = response.session.is_some(),
            "sign up accepted"
        );

        let mut email_confirmed = user.is_confirmed();
        if !email_confirmed {
            email_confirmed = self.confirm_best_effort(email).await;
        }

        let profile = self
            .ensure_profile(NewProfile {
                user_id: user.id.clone(),
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                username,
            })
            .await;

        let auto_signed_in = match self.backend.sign_in(email, &form.password).await {
            Ok(session) => match self.sessions.store_backend_session(&session) {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "signed in but could not store session");
                    false
                }
            },
            Err(err) => {
                warn!(error = %err, "auto sign-in after sign up failed");
                false
            }
        };

        Ok(SignUpOutcome {
            user_id: user.id,
            email_confirmed,
            profile,
            auto_signed_in,
        })
    }

    pub async fn sign_in(&self, form: &SignInForm) -> AuthResult<SignInOutcome> {
        form.validate()?;
        if let Some(data) = demo_sign_in(&self.sessions, form)? {
            return Ok(SignInOutcome::Demo(data));
        }
        let email = form.email.trim();

        self.confirm_best_effort(email).await;

        let session = self.backend.sign_in(email, &form.password).await?;
        info!(user_id = %session.user.id, "sign in successful");

        let profile = match self.backend.get_profile(&session.user.id).await {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                info!("no profile found during sign in, creating one");
                self.create_profile_for(&session.user).await
            }
            Err(err) => {
                warn!(error = %err, "could not load profile during sign in");
                None
            }
        };

        self.sessions.store_backend_session(&session)?;
        Ok(SignInOutcome::User {
            user: session.user,
            profile,
        })
    }

    /// Ends whichever session is active. Signing out with no session is a no-op.
    pub async fn sign_out(&self) -> AuthResult<()> {
        if self.sessions.is_demo_session_active() {
            self.sessions.clear_demo_session()?;
            return Ok(());
        }

        if let Some(stored) = self.sessions.backend_session() {
            let result = self.backend.sign_out(&stored.access_token).await;
            self.sessions.clear_backend_session()?;
            result?;
        }
        Ok(())
    }

    pub async fn reset_password(&self, form: &ResetPasswordForm) -> AuthResult<&'static str> {
        form.validate()?;

        let site_url = self.site_url.as_deref().map(|s| s.trim_end_matches('/')).unwrap_or_else(|| {
            warn!("site URL is not configured; reset link will be relative");
            ""
        });
        let redirect_to = format!("{site_url}/auth/reset-password");

        self.backend.reset_password_for_email(form.email.trim(), &redirect_to).await?;
        Ok("Password reset email sent! Check your inbox.")
    }

    /// The signed-in identity, demo session first. `None` when nobody is signed in.
    pub async fn current_profile(&self) -> AuthResult<Option<CurrentProfile>> {
        if let Some(demo) = self.sessions.demo_session() {
            return Ok(Some(CurrentProfile {
                user: demo.user,
                profile: Some(demo.profile),
                is_demo: true,
            }));
        }

        let Some(stored) = self.sessions.backend_session() else {
            return Ok(None);
        };

        let Some(user) = self.backend.get_user(&stored.access_token).await? else {
            debug!("stored session is no longer valid");
            return Ok(None);
        };

        let profile = self.backend.get_profile(&user.id).await?;
        Ok(Some(CurrentProfile {
            user,
            profile,
            is_demo: false,
        }))
    }

    pub async fn debug_users(&self) -> AuthResult<Vec<RecentUser>> {
        self.backend.list_recent_users().await
    }

    pub async fn confirm_all_users(&self) -> AuthResult<u64> {
        self.backend.confirm_all_unconfirmed_users().await
    }

    async fn confirm_best_effort(&self, email: &str) -> bool {
        match self.backend.force_confirm_user(email).await {
            Ok(confirmed) => {
                debug!(email, confirmed, "manual confirmation result");
                confirmed
            }
            Err(err) => {
                warn!(email, error = %err, "manual confirmation failed");
                false
            }
        }
    }

    /// Wait for the profile row to become visible; create it only if it never does.
    async fn ensure_profile(&self, profile: NewProfile) -> ProfileStatus {
        for attempt in 0..self.poll.attempts {
            match self.backend.get_profile(&profile.user_id).await {
                Ok(Some(_)) => {
                    debug!(attempt, "profile row visible");
                    return ProfileStatus::Existing;
                }
                Ok(None) => {}
                Err(err) => warn!(attempt, error = %err, "profile lookup failed"),
            }

            if attempt + 1 < self.poll.attempts {
                tokio::time::sleep(self.poll.delay_after(attempt)).await;
            }
        }

        info!(user_id = %profile.user_id, "profile not visible after polling, creating it");
        match self.backend.create_user_profile(&profile).await {
            Ok(()) => ProfileStatus::Created,
            Err(err) => {
                warn!(error = %err, "profile creation failed");
                ProfileStatus::Missing
            }
        }
    }

    async fn create_profile_for(&self, user: &AuthUser) -> Option<Profile> {
        let meta = &user.user_metadata;
        let new_profile = NewProfile {
            user_id: user.id.clone(),
            first_name: meta.first_name.clone().unwrap_or_else(|| "User".to_string()),
            last_name: meta.last_name.clone().unwrap_or_default(),
            username: meta.username.clone().unwrap_or_else(|| {
                format!("user_{}", user.id.chars().take(8).collect::<String>())
            }),
        };

        if let Err(err) = self.backend.create_user_profile(&new_profile).await {
            warn!(error = %err, "failed to create profile during sign in");
            return None;
        }
        self.backend.get_profile(&user.id).await.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use std::{
        collections::HashMap,
        path::PathBuf,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    #[derive(Debug, Clone)]
    struct Account {
        user: AuthUser,
        password: String,
    }

    /// In-memory backend. `profile_visible_after` simulates a trigger that creates
    /// the profile row only after that many lookups.
    #[derive(Debug, Default)]
    struct FakeBackend {
        accounts: Mutex<HashMap<String, Account>>,
        profiles: Mutex<HashMap<String, Profile>>,
        profile_visible_after: Option<usize>,
        profile_lookups: AtomicUsize,
        created_profiles: Mutex<Vec<NewProfile>>,
        reset_requests: Mutex<Vec<(String, String)>>,
        signed_out: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn with_trigger_after(lookups: usize) -> Self {
            Self {
                profile_visible_after: Some(lookups),
                ..Self::default()
            }
        }

        fn token_for(user_id: &str) -> String {
            format!("token-{user_id}")
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn sign_up(
            &self,
            email: &str,
            password: &str,
            metadata: &UserMetadata,
        ) -> AuthResult<SignUpResponse> {
            let mut accounts = self.accounts.lock().expect("lock");
            if accounts.contains_key(email) {
                return Err(AuthError::from_backend_message("User already registered"));
            }
            let user = AuthUser {
                id: format!("user-{}", accounts.len() + 1),
                email: Some(email.to_string()),
                created_at: Some(Utc::now()),
                email_confirmed_at: None,
                user_metadata: metadata.clone(),
            };
            accounts.insert(
                email.to_string(),
                Account {
                    user: user.clone(),
                    password: password.to_string(),
                },
            );
            Ok(SignUpResponse {
                user,
                session: None,
            })
        }

        async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
            let accounts = self.accounts.lock().expect("lock");
            match accounts.get(email) {
                Some(account) if account.password == password => {
                    if !account.user.is_confirmed() {
                        return Err(AuthError::from_backend_message("Email not confirmed"));
                    }
                    Ok(AuthSession {
                        access_token: Self::token_for(&account.user.id),
                        refresh_token: None,
                        user: account.user.clone(),
                    })
                }
                _ => Err(AuthError::from_backend_message("Invalid login credentials")),
            }
        }

        async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
            self.signed_out.lock().expect("lock").push(access_token.to_string());
            Ok(())
        }

        async fn get_user(&self, access_token: &str) -> AuthResult<Option<AuthUser>> {
            let accounts = self.accounts.lock().expect("lock");
            Ok(accounts
                .values()
                .find(|a| Self::token_for(&a.user.id) == access_token)
                .map(|a| a.user.clone()))
        }

        async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> AuthResult<()> {
            self.reset_requests
                .lock()
                .expect("lock")
                .push((email.to_string(), redirect_to.to_string()));
            Ok(())
        }

        async fn force_confirm_user(&self, email: &str) -> AuthResult<bool> {
            let mut accounts = self.accounts.lock().expect("lock");
            match accounts.get_mut(email) {
                Some(account) if !account.user.is_confirmed() => {
                    account.user.email_confirmed_at = Some(Utc::now());
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        async fn create_user_profile(&self, profile: &NewProfile) -> AuthResult<()> {
            self.created_profiles.lock().expect("lock").push(profile.clone());
            self.profiles.lock().expect("lock").insert(
                profile.user_id.clone(),
                Profile {
                    id: profile.user_id.clone(),
                    first_name: Some(profile.first_name.clone()),
                    last_name: Some(profile.last_name.clone()),
                    username: Some(profile.username.clone()),
                    avatar_url: None,
                    created_at: None,
                    updated_at: None,
                },
            );
            Ok(())
        }

        async fn get_profile(&self, user_id: &str) -> AuthResult<Option<Profile>> {
            let seen = self.profile_lookups.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(after) = self.profile_visible_after {
                if seen >= after {
                    return Ok(Some(Profile {
                        id: user_id.to_string(),
                        first_name: None,
                        last_name: None,
                        username: Some("from_trigger".into()),
                        avatar_url: None,
                        created_at: None,
                        updated_at: None,
                    }));
                }
            }
            Ok(self.profiles.lock().expect("lock").get(user_id).cloned())
        }

        async fn list_recent_users(&self) -> AuthResult<Vec<RecentUser>> {
            Ok(self
                .accounts
                .lock()
                .expect("lock")
                .values()
                .map(|a| RecentUser {
                    id: a.user.id.clone(),
                    email: a.user.email.clone(),
                    created_at: a.user.created_at,
                    email_confirmed_at: a.user.email_confirmed_at,
                })
                .collect())
        }

        async fn confirm_all_unconfirmed_users(&self) -> AuthResult<u64> {
            let mut accounts = self.accounts.lock().expect("lock");
            let mut count = 0;
            for account in accounts.values_mut().filter(|a| !a.user.is_confirmed()) {
                account.user.email_confirmed_at = Some(Utc::now());
                count += 1;
            }
            Ok(count)
        }
    }

    fn store(name: &str) -> (SessionStore, PathBuf) {
        let dir = std::env::temp_dir()
            .join(format!("tail-trails-account-test-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        (SessionStore::new(dir.join("session.toml")), dir)
    }

    fn service(backend: FakeBackend, name: &str) -> (AccountService<FakeBackend>, PathBuf) {
        let (sessions, dir) = store(name);
        let svc = AccountService::new(backend, sessions)
            .with_poll_policy(PollPolicy::immediate(4))
            .with_site_url(Some("https://tailtrails.example/".into()));
        (svc, dir)
    }

    fn signup_form(email: &str) -> SignUpForm {
        SignUpForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            password: "correct-horse".into(),
            confirm_password: "correct-horse".into(),
            captcha_answer: "9".into(),
            captcha_expected: 9,
        }
    }

    #[tokio::test]
    async fn sign_up_waits_for_trigger_created_profile() {
        let (svc, dir) = service(FakeBackend::with_trigger_after(3), "trigger");

        let outcome = svc.sign_up(&signup_form("ada@example.com")).await.expect("sign up");

        assert_eq!(outcome.profile, ProfileStatus::Existing);
        assert!(outcome.email_confirmed);
        assert!(outcome.auto_signed_in);
        assert_eq!(svc.backend().profile_lookups.load(Ordering::SeqCst), 3);
        assert!(svc.backend().created_profiles.lock().expect("lock").is_empty());
        assert!(svc.sessions().backend_session().is_some());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn sign_up_creates_profile_when_it_never_appears() {
        let (svc, dir) = service(FakeBackend::default(), "create");

        let outcome = svc.sign_up(&signup_form("grace@example.com")).await.expect("sign up");

        assert_eq!(outcome.profile, ProfileStatus::Created);
        assert_eq!(svc.backend().profile_lookups.load(Ordering::SeqCst), 4);

        let created = svc.backend().created_profiles.lock().expect("lock").clone();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].first_name, "Ada");
        assert!(created[0].username.starts_with("ada_lovelace_"));
        assert_eq!(
            outcome.message(),
            "Account created successfully! Welcome to Tail Trails!"
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_friendly() {
        let (svc, dir) = service(FakeBackend::default(), "duplicate");
        svc.sign_up(&signup_form("ada@example.com")).await.expect("first sign up");

        let err = svc.sign_up(&signup_form("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
        assert!(err.to_string().contains("already exists"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let (svc, dir) = service(FakeBackend::default(), "invalid");
        let form = SignUpForm {
            captcha_answer: "1".into(),
            ..signup_form("ada@example.com")
        };

        let err = svc.sign_up(&form).await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect math answer");
        assert!(svc.backend().accounts.lock().expect("lock").is_empty());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn demo_credentials_start_a_demo_session() {
        let (svc, dir) = service(FakeBackend::default(), "demo");
        let form = SignInForm {
            email: "demo@tailtrails.com".into(),
            password: "demo123456".into(),
        };

        let outcome = svc.sign_in(&form).await.expect("demo sign in");
        assert!(matches!(outcome, SignInOutcome::Demo(ref data) if data.user.id == "demo-user-id"));

        let current = svc.current_profile().await.expect("profile").expect("signed in");
        assert!(current.is_demo);

        svc.sign_out().await.expect("sign out");
        assert!(svc.current_profile().await.expect("profile").is_none());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn sign_in_creates_missing_profile_and_persists_session() {
        let (svc, dir) = service(FakeBackend::default(), "signin");
        svc.backend()
            .sign_up("linus@example.com", "penguins!", &UserMetadata::default())
            .await
            .expect("seed account");

        let form = SignInForm {
            email: "linus@example.com".into(),
            password: "penguins!".into(),
        };
        let outcome = svc.sign_in(&form).await.expect("sign in");

        let SignInOutcome::User { user, profile } = outcome else {
            panic!("expected a regular user");
        };
        let profile = profile.expect("profile created");
        assert_eq!(profile.first_name.as_deref(), Some("User"));
        assert_eq!(
            profile.username,
            Some(format!("user_{}", &user.id[..user.id.len().min(8)]))
        );

        let current = svc.current_profile().await.expect("profile").expect("signed in");
        assert!(!current.is_demo);
        assert_eq!(current.user.id, user.id);

        svc.sign_out().await.expect("sign out");
        assert_eq!(svc.backend().signed_out.lock().expect("lock").len(), 1);
        assert!(svc.sessions().backend_session().is_none());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn wrong_password_is_friendly() {
        let (svc, dir) = service(FakeBackend::default(), "wrongpw");
        svc.backend()
            .sign_up("linus@example.com", "penguins!", &UserMetadata::default())
            .await
            .expect("seed account");

        let form = SignInForm {
            email: "linus@example.com".into(),
            password: "nope".into(),
        };
        let err = svc.sign_in(&form).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn reset_password_builds_redirect_from_site_url() {
        let (svc, dir) = service(FakeBackend::default(), "reset");
        let msg = svc
            .reset_password(&ResetPasswordForm {
                email: "ada@example.com".into(),
            })
        .await
        .expect("reset");

        assert_eq!(msg, "Password reset email sent! Check your inbox.");
        let requests = svc.backend().reset_requests.lock().expect("lock").clone();
        assert_eq!(
            requests,
            vec![(
                "ada@example.com".to_string(),
                "https://tailtrails.example/auth/reset-password".to_string()
            )]
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn reset_password_without_site_url_uses_relative_link() {
        let (svc, dir) = service(FakeBackend::default(), "reset-relative");
        let svc = svc.with_site_url(None);
        svc.reset_password(&ResetPasswordForm {
            email: " ada@example.com ".into(),
        })
        .await
        .expect("reset");

        let requests = svc.backend().reset_requests.lock().expect("lock").clone();
        assert_eq!(
            requests,
            vec![("ada@example.com".to_string(), "/auth/reset-password".to_string())]
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn demo_sign_in_only_accepts_demo_credentials() {
        let (sessions, dir) = store("demo-fn");

        let stranger = SignInForm {
            email: "ada@example.com".into(),
            password: demo::DEMO_USER.password.into(),
        };
        assert!(demo_sign_in(&sessions, &stranger).expect("no error").is_none());
        assert!(!sessions.is_demo_session_active());

        let form = SignInForm {
            email: format!(" {} ", demo::DEMO_USER.email),
            password: demo::DEMO_USER.password.into(),
        };
        let data = demo_sign_in(&sessions, &form).expect("no error").expect("demo data");
        assert_eq!(data.user.email.as_deref(), Some(demo::DEMO_USER.email));
        assert!(sessions.is_demo_session_active());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn nobody_signed_in_is_not_an_error() {
        let (svc, dir) = service(FakeBackend::default(), "anon");
        assert!(svc.current_profile().await.expect("no error").is_none());
        svc.sign_out().await.expect("no-op sign out");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn confirm_all_users_counts_unconfirmed() {
        let (svc, dir) = service(FakeBackend::default(), "confirm-all");
        for email in ["a@example.com", "b@example.com"] {
            svc.backend()
                .sign_up(email, "password1", &UserMetadata::default())
                .await
                .expect("seed");
        }

        assert_eq!(svc.confirm_all_users().await.expect("confirm"), 2);
        assert_eq!(svc.confirm_all_users().await.expect("confirm"), 0);
        assert_eq!(svc.debug_users().await.expect("users").len(), 2);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn poll_delay_backs_off_up_to_cap() {
        let policy = PollPolicy::default();
        assert_eq!(policy.delay_after(0), Duration::from_millis(200));
        assert_eq!(policy.delay_after(1), Duration::from_millis(400));
        assert_eq!(policy.delay_after(4), Duration::from_secs(2));
        assert_eq!(policy.delay_after(40), Duration::from_secs(2));
    }
}
