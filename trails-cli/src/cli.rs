use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use std::{convert::TryFrom, fs, path::PathBuf};
use tracing::debug;

use trails_core::{
    AccountService, AuthError, Config, Coordinates, ParkQuery, ProviderId, SessionStore, SortKey,
    SupabaseBackend, WeatherFetcher,
    account::{
        self, CurrentProfile, ResetPasswordForm, SignInForm, SignInOutcome, SignUpForm,
        SimpleCaptcha,
    },
    catalog,
    community,
    demo::DEMO_USER,
    planner::{DogSize, EnergyLevel, TimeSlot, VisitDuration, VisitPlan, resolve_park},
    search::filter_parks,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tail-trails", version, about = "Find dog parks around Sydney and plan a visit")]
pub struct Cli {
    /// Print debug logs (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the park catalog.
    #[command(subcommand)]
    Parks(ParksCommand),

    /// Show current weather and dog advice for a park or coordinates.
    Weather {
        /// Park slug, e.g. "granville-park".
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        park: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Print the raw snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Plan a park visit with recommendations and an itinerary.
    Plan(PlanArgs),

    /// Show community posts, upcoming events and top contributors.
    Community {
        #[arg(long)]
        json: bool,
    },

    /// Interactively set backend credentials and defaults.
    Configure,

    /// Report which required settings are missing.
    Doctor,

    /// Create an account.
    Signup,

    /// Sign in (the demo credentials start a demo session).
    Login {
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out of the current session.
    Logout,

    /// Send a password reset email.
    ResetPassword {
        #[arg(long)]
        email: Option<String>,
    },

    /// Start a demo session without an account.
    Demo,

    /// Show the signed-in user.
    Whoami,

    /// List recently created users on the backend.
    DebugUsers {
        /// Also confirm every unconfirmed account.
        #[arg(long)]
        confirm_all: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ParksCommand {
    /// List parks, filtered and sorted.
    List {
        /// Case-insensitive match on name, location or description.
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(long)]
        off_leash: bool,

        #[arg(long)]
        fenced: bool,

        /// Only parks with water access.
        #[arg(long)]
        water: bool,

        #[arg(long, default_value_t = ParkQuery::DEFAULT_MAX_DISTANCE_KM)]
        max_distance: f64,

        /// rating, distance or reviews.
        #[arg(long, default_value = "distance")]
        sort: String,

        #[arg(long)]
        json: bool,
    },

    /// Show everything known about one park.
    Show {
        slug: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Park slug; unknown slugs fall back to the first park.
    pub park: Option<String>,

    /// Visit date as YYYY-MM-DD (defaults to today).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// early-morning, morning, midday, afternoon, evening or late-evening.
    #[arg(long, default_value = "morning")]
    pub time: String,

    /// Hours: 1-2, 2-3 or 3+.
    #[arg(long, default_value = "1-2")]
    pub duration: String,

    /// small, medium or large.
    #[arg(long, default_value = "medium")]
    pub dog_size: String,

    /// low, medium or high.
    #[arg(long, default_value = "medium")]
    pub energy: String,

    #[arg(long, default_value = "")]
    pub notes: String,

    /// Items already packed, e.g. --packed water,bags.
    #[arg(long, value_delimiter = ',')]
    pub packed: Vec<String>,

    /// Write the plan as JSON into this directory.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Parks(cmd) => run_parks(cmd)?,
            Command::Weather {
                park,
                lat,
                lon,
                json,
            } => run_weather(park, lat, lon, json).await?,
            Command::Plan(args) => run_plan(args).await?,
            Command::Community { json } => run_community(json)?,
            Command::Configure => run_configure()?,
            Command::Doctor => run_doctor()?,
            Command::Signup => run_signup().await?,
            Command::Login { email } => run_login(email).await?,
            Command::Logout => run_logout().await?,
            Command::ResetPassword { email } => run_reset_password(email).await?,
            Command::Demo => run_demo()?,
            Command::Whoami => run_whoami().await?,
            Command::DebugUsers { confirm_all } => run_debug_users(confirm_all).await?,
        }

        Ok(())
    }
}

fn run_parks(cmd: ParksCommand) -> Result<()> {
    match cmd {
        ParksCommand::List {
            search,
            off_leash,
            fenced,
            water,
            max_distance,
            sort,
            json,
        } => {
            let query = ParkQuery {
                search,
                off_leash,
                fenced,
                water,
                max_distance_km: max_distance,
                sort: SortKey::try_from(sort.as_str())?,
            };
            let parks = filter_parks(catalog::all(), &query);

            if json {
                println!("{}", serde_json::to_string_pretty(&parks)?);
            } else {
                output::print_park_list(&parks);
            }
        }
        ParksCommand::Show { slug, json } => {
            let park = catalog::find_by_slug(&slug)
                .ok_or_else(|| anyhow!("Park not found: '{slug}'. Try `tail-trails parks list`."))?;

            if json {
                println!("{}", serde_json::to_string_pretty(park)?);
            } else {
                output::print_park(park);
            }
        }
    }
    Ok(())
}

async fn run_weather(
    park: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    json: bool,
) -> Result<()> {
    let config = Config::load()?;

    let coordinates = match (park, lat, lon) {
        (Some(slug), _, _) => {
            catalog::find_by_slug(&slug)
                .ok_or_else(|| anyhow!("Park not found: '{slug}'."))?
                .coordinates
        }
        (None, Some(lat), Some(lon)) => Coordinates::new(lat, lon),
        _ => config.default_location,
    };

    debug!(%coordinates, "fetching weather");
    let fetcher = WeatherFetcher::from_config(&config)?;
    let snapshot = fetcher.fetch(Some(coordinates)).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        output::print_weather(&snapshot);
    }
    Ok(())
}

async fn run_plan(args: PlanArgs) -> Result<()> {
    let park = resolve_park(args.park.as_deref()).context("The park catalog is empty")?;
    if let Some(slug) = args.park.as_deref().filter(|s| catalog::find_by_slug(s).is_none()) {
        eprintln!("Unknown park '{slug}', planning for {} instead.", park.name);
    }

    let mut plan = VisitPlan::new(park, args.date.unwrap_or_else(|| Local::now().date_naive()));
    plan.time = TimeSlot::try_from(args.time.as_str())?;
    plan.duration = VisitDuration::try_from(args.duration.as_str())?;
    plan.dog_size = DogSize::try_from(args.dog_size.as_str())?;
    plan.energy = EnergyLevel::try_from(args.energy.as_str())?;
    plan.notes = args.notes;
    for item in &args.packed {
        let list = &mut plan.checklist;
        match item.trim().to_lowercase().as_str() {
            "water" => list.water = true,
            "treats" => list.treats = true,
            "leash" => list.leash = true,
            "bags" => list.bags = true,
            "towel" => list.towel = true,
            "toys" => list.toys = true,
            "first-aid" | "firstaid" => list.first_aid = true,
            "camera" => list.camera = true,
            other => return Err(anyhow!("Unknown checklist item '{other}'.")),
        }
    }

    let config = Config::load()?;
    let fetcher = WeatherFetcher::from_config(&config)?;
    let weather = fetcher.fetch(Some(park.coordinates)).await;

    let exported = plan.export(Some(&weather));
    output::print_plan(&plan, &exported.recommendations, &exported.itinerary);

    if let Some(dir) = args.export {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
        let path = dir.join(plan.export_file_name());
        let json =
            serde_json::to_string_pretty(&exported).context("Failed to serialize visit plan")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write visit plan: {}", path.display()))?;
        println!("\nPlan exported to {}", path.display());
    }
    Ok(())
}

fn run_community(json: bool) -> Result<()> {
    let feed = community::feed();
    if json {
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(());
    }

    let demo = SessionStore::open_default()
        .map(|sessions| sessions.is_demo_session_active())
        .unwrap_or(false);
    if demo {
        println!("Demo mode: this is a preview of the community features.\n");
    }
    output::print_community(&feed);
    Ok(())
}

fn prompt_optional(label: &str, current: Option<&str>) -> Result<Option<String>> {
    let mut prompt = Text::new(label);
    if let Some(value) = current {
        prompt = prompt.with_default(value);
    }
    let value = prompt.prompt()?;
    Ok(Some(value.trim().to_string()).filter(|v| !v.is_empty()))
}

fn run_configure() -> Result<()> {
    let mut config = Config::load()?;

    config.backend_url = prompt_optional("Backend URL:", config.backend_url.as_deref())?;
    config.backend_anon_key =
        prompt_optional("Backend anon key:", config.backend_anon_key.as_deref())?;
    config.site_url = prompt_optional(
        "Site URL (used in reset links):",
        config.site_url.as_deref(),
    )?;

    let current = config.default_provider_id()?;
    let mut options: Vec<ProviderId> = ProviderId::all().to_vec();
    if let Some(pos) = options.iter().position(|p| *p == current) {
        options.swap(0, pos);
    }
    let provider = Select::new("Weather provider:", options).prompt()?;
    config.set_default_provider(provider);

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn run_doctor() -> Result<()> {
    let config = Config::load()?;
    let diagnostics = config.diagnostics();

    println!("Config file: {}", Config::config_file_path()?.display());
    println!("Session file: {}", Config::state_file_path()?.display());
    println!("Weather provider: {}", config.default_provider_id()?);
    let preview = if config.is_preview() {
        "yes (weather is synthetic)"
    } else {
        "no"
    };
    println!("Preview host: {preview}");

    if diagnostics.is_complete() {
        println!("All required settings are present.");
    } else {
        println!("Missing settings:");
        for name in diagnostics.missing() {
            println!("  - {name}");
        }
    }
    Ok(())
}

fn account_service(config: &Config) -> Result<AccountService<SupabaseBackend>> {
    account_service_with(config, SessionStore::open_default()?)
}

fn account_service_with(
    config: &Config,
    sessions: SessionStore,
) -> Result<AccountService<SupabaseBackend>> {
    let backend = SupabaseBackend::from_config(config)?;
    Ok(AccountService::new(backend, sessions).with_site_url(config.site_url.clone()))
}

/// The demo account signs in offline; every other account needs a configured backend.
async fn sign_in(
    config: &Config,
    sessions: SessionStore,
    form: &SignInForm,
) -> Result<SignInOutcome> {
    if let Some(data) = account::demo_sign_in(&sessions, form).map_err(friendly)? {
        return Ok(SignInOutcome::Demo(data));
    }
    let service = account_service_with(config, sessions)?;
    service.sign_in(form).await.map_err(friendly)
}

/// Show validation and friendly backend messages as-is, without a backtrace-style chain.
fn friendly(err: AuthError) -> anyhow::Error {
    anyhow!("{err}")
}

fn prompt_password(label: &str) -> Result<String> {
    Ok(Password::new(label)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?)
}

async fn run_signup() -> Result<()> {
    let config = Config::load()?;
    let service = account_service(&config)?;

    let captcha = SimpleCaptcha::generate(&mut rand::thread_rng());
    let form = SignUpForm {
        first_name: Text::new("First name:").prompt()?,
        last_name: Text::new("Last name:").prompt()?,
        email: Text::new("Email:").prompt()?,
        password: prompt_password("Password (8+ characters):")?,
        confirm_password: prompt_password("Confirm password:")?,
        captcha_answer: Text::new(&captcha.question()).prompt()?,
        captcha_expected: captcha.answer(),
    };

    let outcome = service.sign_up(&form).await.map_err(friendly)?;
    println!("{}", outcome.message());
    Ok(())
}

async fn run_login(email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => Text::new("Email:").prompt()?,
    };
    let form = SignInForm {
        email,
        password: prompt_password("Password:")?,
    };

    let config = Config::load()?;
    match sign_in(&config, SessionStore::open_default()?, &form).await? {
        SignInOutcome::Demo(data) => {
            let name = data.profile.display_name();
            println!("Welcome, {name}! You are using the demo account.");
        }
        SignInOutcome::User { user, profile } => {
            let name = profile
                .map(|p| p.display_name())
                .or(user.email)
                .unwrap_or(user.id);
            println!("Welcome back, {name}!");
        }
    }
    Ok(())
}

async fn run_logout() -> Result<()> {
    let sessions = SessionStore::open_default()?;
    if sessions.is_demo_session_active() {
        sessions.clear_demo_session()?;
        println!("Signed out of the demo account.");
        return Ok(());
    }
    if sessions.backend_session().is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    let config = Config::load()?;
    account_service(&config)?.sign_out().await.map_err(friendly)?;
    println!("Signed out.");
    Ok(())
}

async fn run_reset_password(email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => Text::new("Email:").prompt()?,
    };

    let config = Config::load()?;
    let message = account_service(&config)?
        .reset_password(&ResetPasswordForm { email })
        .await
        .map_err(friendly)?;
    println!("{message}");
    Ok(())
}

fn run_demo() -> Result<()> {
    let sessions = SessionStore::open_default()?;
    if sessions.backend_session().is_some()
        && !Confirm::new("You are signed in. Switch to the demo account?")
            .with_default(false)
            .prompt()?
    {
        return Ok(());
    }

    let session = sessions.create_demo_session()?;
    println!(
        "Demo session started for {}.",
        session.profile.display_name()
    );
    println!("Explore freely; nothing is saved to the backend.");
    Ok(())
}

async fn run_whoami() -> Result<()> {
    let sessions = SessionStore::open_default()?;
    if let Some(demo) = sessions.demo_session() {
        output::print_profile(&CurrentProfile {
            user: demo.user,
            profile: Some(demo.profile),
            is_demo: true,
        });
        return Ok(());
    }
    if sessions.backend_session().is_none() {
        println!("Not signed in. Try `tail-trails login` or `tail-trails demo`.");
        return Ok(());
    }

    let config = Config::load()?;
    match account_service(&config)?.current_profile().await.map_err(friendly)? {
        Some(profile) => output::print_profile(&profile),
        None => println!("Your session has expired. Please sign in again."),
    }
    Ok(())
}

async fn run_debug_users(confirm_all: bool) -> Result<()> {
    let config = Config::load()?;
    let service = account_service(&config)?;

    if confirm_all {
        let count = service.confirm_all_users().await.map_err(friendly)?;
        println!("Confirmed {count} users");
    }

    let users = service.debug_users().await.map_err(friendly)?;
    output::print_recent_users(&users);

    if !users.iter().any(|u| u.email.as_deref() == Some(DEMO_USER.email)) {
        println!(
            "\nThe demo account ({}) is local only and never appears here.",
            DEMO_USER.email
        );
    }
    Ok(())
}
