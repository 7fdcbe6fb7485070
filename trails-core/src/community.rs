//! The community feed and profile achievements.
//!
//! Like the park catalog, the feed is fixed data: headline numbers, recent posts,
//! upcoming events and the top contributors. Nothing is posted at runtime.

use serde::Serialize;

use crate::demo::DemoStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommunityStat {
    pub label: &'static str,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: u32,
    pub author: &'static str,
    /// Relative posting time as shown in the feed, e.g. "2 hours ago".
    pub posted: &'static str,
    pub content: &'static str,
    pub likes: u32,
    pub comments: u32,
    pub location: Option<&'static str>,
    pub has_photo: bool,
}

impl Post {
    pub fn author_initials(&self) -> String {
        initials(self.author)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u32,
    pub title: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub location: &'static str,
    pub attendees: u32,
    pub max_attendees: u32,
}

impl Event {
    pub fn spots_left(&self) -> u32 {
        self.max_attendees.saturating_sub(self.attendees)
    }

    pub fn is_full(&self) -> bool {
        self.spots_left() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub name: &'static str,
    pub posts: u32,
}

/// Everything the community page shows, in display order.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityFeed {
    pub stats: &'static [CommunityStat],
    pub posts: &'static [Post],
    pub events: &'static [Event],
    pub top_contributors: &'static [Contributor],
}

static STATS: [CommunityStat; 4] = [
    CommunityStat {
        label: "Active Members",
        value: 2847,
    },
    CommunityStat {
        label: "Posts This Week",
        value: 156,
    },
    CommunityStat {
        label: "Upcoming Events",
        value: 8,
    },
    CommunityStat {
        label: "Top Contributors",
        value: 24,
    },
];

static POSTS: [Post; 3] = [
    Post {
        id: 1,
        author: "Sarah M.",
        posted: "2 hours ago",
        content: "Just discovered the most amazing off-leash area at Centennial Park! \
                  My golden retriever Max had the time of his life. \
                  The new agility equipment is fantastic! 🐕",
        likes: 23,
        comments: 8,
        location: Some("Centennial Park"),
        has_photo: true,
    },
    Post {
        id: 2,
        author: "Mike T.",
        posted: "4 hours ago",
        content: "Looking for other border collie owners in the Inner West! \
                  Luna loves to play fetch and would love some playmates. \
                  Anyone interested in a weekend meetup?",
        likes: 15,
        comments: 12,
        location: Some("Inner West Sydney"),
        has_photo: false,
    },
    Post {
        id: 3,
        author: "Emma K.",
        posted: "6 hours ago",
        content: "PSA: The water fountains at Rushcutters Bay Park have been fixed! \
                  Perfect timing with this warm weather. \
                  Remember to bring a bowl for your furry mates! 💧",
        likes: 31,
        comments: 5,
        location: Some("Rushcutters Bay Park"),
        has_photo: false,
    },
];

static EVENTS: [Event; 3] = [
    Event {
        id: 1,
        title: "Puppy Socialisation Class",
        date: "Saturday, 15 Dec",
        time: "10:00 AM",
        location: "Bicentennial Park",
        attendees: 12,
        max_attendees: 15,
    },
    Event {
        id: 2,
        title: "Dog Photography Workshop",
        date: "Sunday, 16 Dec",
        time: "2:00 PM",
        location: "Royal Botanic Gardens",
        attendees: 8,
        max_attendees: 10,
    },
    Event {
        id: 3,
        title: "Large Breed Playdate",
        date: "Wednesday, 19 Dec",
        time: "5:30 PM",
        location: "Centennial Park",
        attendees: 18,
        max_attendees: 25,
    },
];

/// Ordered by post count, highest first.
static TOP_CONTRIBUTORS: [Contributor; 3] = [
    Contributor {
        name: "Jessica L.",
        posts: 47,
    },
    Contributor {
        name: "David R.",
        posts: 39,
    },
    Contributor {
        name: "Amy C.",
        posts: 31,
    },
];

pub fn feed() -> CommunityFeed {
    CommunityFeed {
        stats: &STATS,
        posts: &POSTS,
        events: &EVENTS,
        top_contributors: &TOP_CONTRIBUTORS,
    }
}

/// First letter of each word: "Sarah M." gives "SM".
pub fn initials(name: &str) -> String {
    name.split_whitespace().filter_map(|word| word.chars().next()).collect()
}

/// Thousands separated with commas, e.g. 2847 gives "2,847".
pub fn format_count(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

/// What a profile has to reach to unlock an achievement.
#[derive(Debug, Clone, Copy)]
enum Goal {
    ParksVisited(u32),
    ReviewsWritten(u32),
    PhotosShared(u32),
    Friends(u32),
    /// Activity the profile does not track yet.
    Untracked,
}

impl Goal {
    fn reached(self, stats: &DemoStats) -> bool {
        match self {
            Goal::ParksVisited(n) => stats.parks_visited >= n,
            Goal::ReviewsWritten(n) => stats.reviews_written >= n,
            Goal::PhotosShared(n) => stats.photos_shared >= n,
            Goal::Friends(n) => stats.friends >= n,
            Goal::Untracked => false,
        }
    }
}

const ACHIEVEMENTS: [(&str, &str, &str, Goal); 6] = [
    ("Park Explorer", "Visited 10+ parks", "🏆", Goal::ParksVisited(10)),
    ("Review Master", "Written 5+ reviews", "⭐", Goal::ReviewsWritten(5)),
    ("Photo Enthusiast", "Shared 20+ photos", "📸", Goal::PhotosShared(20)),
    ("Social Butterfly", "Connected with 10+ dog owners", "🦋", Goal::Friends(10)),
    ("Distance Walker", "Walked 50km total", "🚶", Goal::Untracked),
    ("Weather Warrior", "Visited parks in all weather", "⛈️", Goal::Untracked),
];

/// Dashboard achievements for a profile's activity counts, in display order.
pub fn achievements(stats: &DemoStats) -> Vec<Achievement> {
    ACHIEVEMENTS
        .iter()
        .map(|&(name, description, icon, goal)| Achievement {
            name,
            description,
            icon,
            unlocked: goal.reached(stats),
        })
        .collect()
}
