use trails_core::{
    Park, WeatherSnapshot,
    account::{CurrentProfile, RecentUser},
    advice,
    community::{self, CommunityFeed},
    demo::DEMO_USER,
    planner::{ItineraryStep, Recommendation, RecommendationKind, VisitPlan},
    search::parse_leading_distance,
};

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

pub fn print_park_list(parks: &[&Park]) {
    if parks.is_empty() {
        println!("No parks match those filters.");
        return;
    }

    for park in parks {
        let distance = park
            .distance
            .map(|_| format!("{:.1} km", parse_leading_distance(park.distance)))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<28} {:>4.1}* {:>5} reviews  {:>8}  {}",
            park.name, park.rating, park.reviews, distance, park.location
        );
        println!("    slug: {}", park.slug);
    }
    println!("\n{} park(s)", parks.len());
}

pub fn print_park(park: &Park) {
    println!("{} ({})", park.name, park.location);
    println!("{:.1}* from {} reviews", park.rating, park.reviews);
    println!();
    println!("{}", park.long_description.unwrap_or(park.description));
    println!();
    println!("Address:   {}", park.address);
    println!("Hours:     {}", park.hours);
    println!("Size:      {}", park.size);
    if let Some(phone) = park.phone {
        println!("Phone:     {phone}");
    }
    if let Some(website) = park.website {
        println!("Website:   {website}");
    }
    if !park.terrain.is_empty() {
        println!("Terrain:   {}", park.terrain.join(", "));
    }
    if !park.best_for.is_empty() {
        println!("Best for:  {}", park.best_for.join(", "));
    }

    println!("\nFacilities:");
    for facility in park.facilities {
        match facility.description {
            Some(desc) => println!("  - {}: {desc}", facility.name),
            None => println!("  - {}", facility.name),
        }
    }

    let rules = &park.rules;
    println!("\nRules:");
    println!("  Off-leash areas:   {}", yes_no(rules.off_leash_areas));
    if let Some(hours) = rules.off_leash_hours {
        println!("  Off-leash hours:   {hours}");
    }
    println!("  Dog water access:  {}", yes_no(rules.dog_water_access));
    println!(
        "  Bag dispensers:    {}",
        yes_no(rules.bag_dispenser_available)
    );
    if let Some(size) = rules.size_restrictions {
        println!("  Size restrictions: {size}");
    }

    let access = &park.accessibility;
    println!("\nAccessibility:");
    println!("  Parking:           {}", yes_no(access.parking));
    println!("  Public transport:  {}", yes_no(access.public_transport));
    println!(
        "  Wheelchair access: {}",
        yes_no(access.wheelchair_accessible)
    );
    if !access.nearby_amenities.is_empty() {
        println!(
            "  Nearby:            {}",
            access.nearby_amenities.join(", ")
        );
    }

    if let Some(times) = park.popular_times {
        println!("\nBusyness (1-5):");
        println!(
            "  morning {}  afternoon {}  evening {}  weekend {}",
            times.morning, times.afternoon, times.evening, times.weekend
        );
    }
}

pub fn print_weather(snapshot: &WeatherSnapshot) {
    let current = &snapshot.current;
    let daily = &snapshot.daily;
    let uv = advice::uv_index_or_default(snapshot);
    let uv_desc = advice::uv_description(uv);
    let minutes = |value: Option<f64>| {
        advice::format_duration(value.unwrap_or(0.0).max(0.0).round() as u32)
    };

    println!("{} {}", advice::icon(snapshot), advice::describe(snapshot));
    if snapshot.is_mock() {
        println!("(synthetic data: live weather is unavailable here)");
    }
    println!();
    println!(
        "Temperature:   {:.1}°C (feels like {:.1}°C)",
        current.temperature, current.apparent_temperature
    );
    println!("Precipitation: {:.1} mm", current.precipitation);
    println!("Cloud cover:   {:.0}%", current.cloud_cover);
    println!(
        "UV index:      {uv:.0} ({}): {}",
        uv_desc.level, uv_desc.advice
    );
    println!(
        "Sunrise:       {}",
        advice::format_sun_time(daily.sunrise.first().map(String::as_str).unwrap_or(""))
    );
    println!(
        "Sunset:        {}",
        advice::format_sun_time(daily.sunset.first().map(String::as_str).unwrap_or(""))
    );
    println!("Daylight:      {}", minutes(daily.daylight_minutes_today()));
    println!("Sunshine:      {}", minutes(daily.sunshine_minutes_today()));
    println!();
    println!("{}", advice::dog_advice(snapshot));
}

fn kind_marker(kind: RecommendationKind) -> &'static str {
    match kind {
        RecommendationKind::Warning => "!",
        RecommendationKind::Info => "i",
        RecommendationKind::Success => "+",
    }
}

pub fn print_plan(
    plan: &VisitPlan,
    recommendations: &[Recommendation],
    itinerary: &[ItineraryStep],
) {
    println!(
        "Visit plan: {} on {}",
        plan.park.name,
        plan.date.format("%A %-d %B %Y")
    );
    println!(
        "{} for {} hours (crowds: {}, temperature: {})",
        plan.time.label(),
        plan.duration,
        plan.time.crowd(),
        plan.time.feel()
    );
    println!("Dog: {} size, {} energy", plan.dog_size, plan.energy);

    println!("\nRecommendations:");
    if recommendations.is_empty() {
        println!("  Conditions look good. Enjoy the visit!");
    }
    for rec in recommendations {
        println!(
            "  [{}] {}: {}",
            kind_marker(rec.kind),
            rec.title,
            rec.description
        );
    }

    println!("\nItinerary:");
    for step in itinerary {
        println!(
            "  {:<16} {}: {}",
            step.time, step.activity, step.description
        );
    }

    println!("\nChecklist ({}/8 packed):", plan.checklist.packed());
    for (item, packed) in plan.checklist.items() {
        println!("  [{}] {item}", if packed { "x" } else { " " });
    }

    if !plan.notes.is_empty() {
        println!("\nNotes: {}", plan.notes);
    }
}

pub fn print_profile(profile: &CurrentProfile) {
    let email = profile.user.email.as_deref().unwrap_or("(no email)");
    match &profile.profile {
        Some(p) => println!("Signed in as {} <{email}>", p.display_name()),
        None => println!("Signed in as <{email}> (no profile row yet)"),
    }
    if let Some(username) = profile.profile.as_ref().and_then(|p| p.username.as_deref()) {
        println!("Username: {username}");
    }
    println!("User id:  {}", profile.user.id);

    if profile.is_demo {
        let stats = DEMO_USER.stats;
        println!("\nDemo account");
        println!(
            "  {} parks visited, {} photos shared, {} friends, {} reviews written",
            stats.parks_visited, stats.photos_shared, stats.friends, stats.reviews_written
        );
        println!("\nRecent activity:");
        for activity in DEMO_USER.recent_activity {
            println!(
                "  {}  {}: {}",
                activity.date, activity.park_name, activity.description
            );
        }

        println!("\nAchievements:");
        for achievement in community::achievements(&stats) {
            let mark = if achievement.unlocked { "x" } else { " " };
            println!(
                "  [{mark}] {} {}: {}",
                achievement.icon, achievement.name, achievement.description
            );
        }
    }
}

pub fn print_community(feed: &CommunityFeed) {
    println!("Tail Trails Community\n");
    for stat in feed.stats {
        println!(
            "  {:>6}  {}",
            community::format_count(stat.value),
            stat.label
        );
    }

    println!("\nRecent posts:");
    for post in feed.posts {
        let place = post.location.map(|l| format!(" @ {l}")).unwrap_or_default();
        println!(
            "\n  [{}] {} ({}){place}",
            post.author_initials(),
            post.author,
            post.posted
        );
        println!("  {}", post.content);
        let photo = if post.has_photo { "  (photo)" } else { "" };
        println!("  {} likes, {} comments{photo}", post.likes, post.comments);
    }

    println!("\nUpcoming events:");
    for event in feed.events {
        let status = if event.is_full() {
            "full".to_string()
        } else {
            format!("{} spots left", event.spots_left())
        };
        println!("\n  {}", event.title);
        println!("  {} at {}, {}", event.date, event.time, event.location);
        println!(
            "  {}/{} attending, {status}",
            event.attendees, event.max_attendees
        );
    }

    println!("\nTop contributors:");
    for (rank, contributor) in feed.top_contributors.iter().enumerate() {
        println!(
            "  {}. {} ({} posts)",
            rank + 1,
            contributor.name,
            contributor.posts
        );
    }
}

pub fn print_recent_users(users: &[RecentUser]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    for user in users {
        let created = user.created_at.map(|t| t.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{:<36}  {:<32}  created {:<16}  confirmed: {}",
            user.id,
            user.email.as_deref().unwrap_or("-"),
            created.as_deref().unwrap_or("-"),
            yes_no(user.email_confirmed_at.is_some())
        );
    }
}
