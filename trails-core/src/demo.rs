//! The demo identity: the single definition every demo check goes through.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{AuthUser, Profile, UserMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemoStats {
    pub parks_visited: u32,
    pub photos_shared: u32,
    pub friends: u32,
    pub reviews_written: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemoActivity {
    pub id: &'static str,
    pub kind: &'static str,
    pub park_name: &'static str,
    pub date: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct DemoUser {
    pub email: &'static str,
    pub password: &'static str,
    pub id: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub username: &'static str,
    pub avatar_url: &'static str,
    pub stats: DemoStats,
    pub recent_activity: &'static [DemoActivity],
}

pub const DEMO_USER: DemoUser = DemoUser {
    email: "demo@tailtrails.com",
    password: "demo123456",
    id: "demo-user-id",
    first_name: "Demo",
    last_name: "User",
    username: "demo_user",
    avatar_url: "/placeholder.svg?height=40&width=40",
    stats: DemoStats {
        parks_visited: 12,
        photos_shared: 28,
        friends: 15,
        reviews_written: 8,
    },
    recent_activity: &[
        DemoActivity {
            id: "1",
            kind: "park_visit",
            park_name: "Centennial Park",
            date: "2024-01-15",
            description: "Visited with Max - great off-leash area!",
        },
        DemoActivity {
            id: "2",
            kind: "photo_share",
            park_name: "Hyde Park",
            date: "2024-01-14",
            description: "Shared a photo of Bella playing fetch",
        },
        DemoActivity {
            id: "3",
            kind: "review",
            park_name: "Bicentennial Park",
            date: "2024-01-13",
            description: "Left a 5-star review - excellent facilities",
        },
    ],
};

/// Fixed creation time of the demo account.
pub fn demo_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default()
}

pub fn is_demo_user(email: &str) -> bool {
    email.trim().eq_ignore_ascii_case(DEMO_USER.email)
}

pub fn is_demo_credentials(email: &str, password: &str) -> bool {
    is_demo_user(email) && password == DEMO_USER.password
}

/// The demo user and profile as the backend would have returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoUserData {
    pub user: AuthUser,
    pub profile: Profile,
}

pub fn demo_user_data() -> DemoUserData {
    let created_at = demo_created_at();

    DemoUserData {
        user: AuthUser {
            id: DEMO_USER.id.to_string(),
            email: Some(DEMO_USER.email.to_string()),
            created_at: Some(created_at),
            email_confirmed_at: Some(created_at),
            user_metadata: UserMetadata {
                first_name: Some(DEMO_USER.first_name.to_string()),
                last_name: Some(DEMO_USER.last_name.to_string()),
                username: Some(DEMO_USER.username.to_string()),
            },
        },
        profile: Profile {
            id: DEMO_USER.id.to_string(),
            first_name: Some(DEMO_USER.first_name.to_string()),
            last_name: Some(DEMO_USER.last_name.to_string()),
            username: Some(DEMO_USER.username.to_string()),
            avatar_url: Some(DEMO_USER.avatar_url.to_string()),
            created_at: Some(created_at),
            updated_at: Some(created_at),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_email_check_ignores_case_and_whitespace() {
        assert!(is_demo_user("demo@tailtrails.com"));
        assert!(is_demo_user(" Demo@TailTrails.com "));
        assert!(!is_demo_user("someone@tailtrails.com"));
    }

    #[test]
    fn demo_credentials_need_the_demo_password() {
        assert!(is_demo_credentials("demo@tailtrails.com", "demo123456"));
        assert!(!is_demo_credentials("demo@tailtrails.com", "hunter22"));
    }

    #[test]
    fn demo_user_data_is_stable() {
        let data = demo_user_data();
        assert_eq!(data.user.id, "demo-user-id");
        assert_eq!(data.profile.username.as_deref(), Some("demo_user"));
        assert_eq!(data.profile.created_at, Some(demo_created_at()));
        assert_eq!(data, demo_user_data());
        assert!(data.user.is_confirmed());
    }
}
