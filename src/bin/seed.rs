use bulletin::{
    auth::AuthService,
    config::Settings,
    domain::{Condition, CreateUserRequest, NewAnnouncement},
    repository::{
        AnnouncementRepository, SqliteAnnouncementRepository,
        UserRepository, SqliteUserRepository,
    },
};
use chrono::{Duration, Utc};
use clap::Parser;
use fake::{
    faker::{
        internet::en::{SafeEmail, Username},
        lorem::en::{Paragraph, Sentence},
    },
    Fake,
};
use sqlx::sqlite::SqlitePoolOptions;

/// Fill a Bulletin database with demo users, sessions and announcements.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// SQLite connection string
    #[arg(long, default_value = "sqlite://bulletin.db?mode=rwc")]
    database_url: String,

    /// Number of extra users with random subscriptions
    #[arg(long, default_value_t = 5)]
    users: usize,

    /// Session lifetime for the printed tokens [default: auth.session_duration_hours]
    #[arg(long)]
    session_hours: Option<i64>,
}

const SUBSCRIPTIONS: &[Option<&str>] = &[None, Some("weekly"), Some("monthly")];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let settings = Settings::new().unwrap_or_else(|e| {
        eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });
    let session_hours = args.session_hours.unwrap_or(settings.auth.session_duration_hours);

    println!("🌱 Starting database seeding...");

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());
    let auth_service = AuthService::new(db_pool.clone());

    println!("👥 Creating users...");

    let weekly = user_repo.create(CreateUserRequest {
        username: "weekly".to_string(),
        email: "weekly@bulletin.local".to_string(),
        subscription: Some("weekly".to_string()),
        locale: Some("en".to_string()),
    }).await?;

    let free = user_repo.create(CreateUserRequest {
        username: "free".to_string(),
        email: "free@bulletin.local".to_string(),
        subscription: None,
        locale: Some("de".to_string()),
    }).await?;

    for (i, user) in [&weekly, &free].into_iter().enumerate() {
        let (_, token) = auth_service.create_session(user.id, session_hours).await?;
        println!("  ✅ {} (session cookie: session={})", user.username, token);
        if i == 0 {
            println!("     try: curl -b session={} http://127.0.0.1:8080/announcements/recent", token);
        }
    }

    for i in 0..args.users {
        let username: String = Username().fake();
        let email: String = SafeEmail().fake();
        user_repo.create(CreateUserRequest {
            username: format!("{}{}", username, i),
            email: format!("{}.{}", i, email),
            subscription: SUBSCRIPTIONS[i % SUBSCRIPTIONS.len()].map(str::to_string),
            locale: None,
        }).await?;
    }
    println!("  ✅ Created {} random users", args.users);

    println!("📢 Creating announcements...");
    let now = Utc::now();

    let fixtures = vec![
        NewAnnouncement {
            title: "Welcome!".to_string(),
            body: "Thanks for trying Bulletin.".to_string(),
            ..Default::default()
        },
        NewAnnouncement {
            title: "Scheduled maintenance".to_string(),
            body: Paragraph(1..3).fake(),
            category: Some("en".to_string()),
            start_delivering_at: Some(now - Duration::hours(1)),
            stop_delivering_at: Some(now + Duration::days(3)),
            ..Default::default()
        },
        NewAnnouncement {
            title: "Weekly digest is here".to_string(),
            body: Paragraph(1..3).fake(),
            limit_to_users: vec![Condition::new("subscription", "weekly")],
            ..Default::default()
        },
        NewAnnouncement {
            title: "Upgrade your plan".to_string(),
            body: Paragraph(1..3).fake(),
            limit_to_users: vec![Condition::new("free?", true)],
            ..Default::default()
        },
        NewAnnouncement {
            title: Sentence(3..6).fake(),
            body: Paragraph(1..3).fake(),
            start_delivering_at: Some(now + Duration::days(2)),
            ..Default::default()
        },
        NewAnnouncement {
            title: "Last month's news".to_string(),
            body: Paragraph(1..3).fake(),
            created_at: Some(now - Duration::weeks(4)),
            ..Default::default()
        },
    ];

    let count = fixtures.len();
    for announcement in fixtures {
        announcement_repo.create(announcement).await?;
    }
    println!("  ✅ Created {} announcements", count);

    println!("🎉 Seeding complete!");

    Ok(())
}
