use std::env;
use std::process::exit;

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
use dotenvy::dotenv;

use merchtopia::application::ports::user_repository::UserRepository;
use merchtopia::bootstrap::config::Config;
use merchtopia::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;

/// Seeds a back office account. There is no self-service registration;
/// operators run this against the same DATABASE_URL the server uses.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let mut args = env::args().skip(1);
    let (Some(email), Some(password)) = (args.next(), args.next()) else {
        eprintln!("Usage: create_user <email> <password>");
        exit(2);
    };
    if password.len() < 8 {
        eprintln!("Error: password must be at least 8 characters");
        exit(1);
    }

    let cfg = Config::from_env()?;
    let pool = merchtopia::infrastructure::db::connect_pool(&cfg.database_url).await?;
    merchtopia::infrastructure::db::migrate(&pool).await?;
    let repo = SqlxUserRepository::new(pool);

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?
        .to_string();

    match repo.create_user(email.trim(), &password_hash).await {
        Ok(user) => println!("User created: {}", user.email),
        Err(err) => {
            let duplicate = err
                .downcast_ref::<sqlx::Error>()
                .and_then(|e| e.as_database_error())
                .map(|db| db.code().as_deref() == Some("23505"))
                .unwrap_or(false);
            if duplicate {
                eprintln!("Error: user with email \"{email}\" already exists");
            } else {
                eprintln!("Error creating user: {err}");
            }
            exit(1);
        }
    }
    Ok(())
}
