use chrono::Utc;
use dotenvy::dotenv;
use halaqa::auth::hash_password;
use halaqa::config::AppConfig;
use halaqa::db::{self, ustazs};
use halaqa::models::Ustaz;

/// (user_name, full_name, password)
const ACCOUNTS: &[(&str, &str, &str)] = &[
    ("admin", "Administrator", "admin123"),
    ("teacher1", "Teacher One", "teacher123"),
    ("teacher2", "Teacher Two", "teacher123"),
    ("assistant1", "Assistant One", "assistant123"),
];

fn is_dry_run() -> bool {
    !std::env::args().any(|a| a == "--apply")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config.database_url).await?;

    let dry_run = is_dry_run();

    let mut created = 0;
    let mut reset = 0;

    for (user_name, full_name, password) in ACCOUNTS {
        let existing = ustazs::find_ustaz_by_user_name(&pool, user_name).await?;

        let (id, created_at) = match &existing {
            Some(ustaz) => (ustaz.id.clone(), ustaz.created_at.clone()),
            None => (uuid::Uuid::new_v4().to_string(), Utc::now().to_rfc3339()),
        };
        let action = if existing.is_some() { "reset" } else { "create" };

        if dry_run {
            println!("[DRY RUN] Would {} account {}", action, user_name);
        } else {
            let ustaz = Ustaz {
                id,
                user_name: user_name.to_string(),
                full_name: full_name.to_string(),
                password_hash: hash_password(password),
                created_at,
            };
            ustazs::upsert_ustaz(&pool, &ustaz).await?;
            println!("{} account {} ({})", action, user_name, ustaz.id);
        }

        if existing.is_some() {
            reset += 1;
        } else {
            created += 1;
        }
    }

    println!(
        "Accounts created: {}, reset: {} / {}",
        created,
        reset,
        ACCOUNTS.len()
    );

    if dry_run {
        println!("Dry run only. Re-run with --apply to write.");
    }

    Ok(())
}
