use campussync_cli::admin::create_admin;
use campussync_cli::seeder::{self, SeedConfig};
use campussync_config::{DatabaseConfig, SecretConfig};
use campussync_core::{BcryptSecrets, SecretVerifier};
use campussync_db::init_db_pool;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

/// Password given to every seeded account.
const SEED_PASSWORD: &str = "password123";

#[derive(Parser)]
#[command(name = "campussync-cli")]
#[command(about = "CampusSync CLI - Administrative tools for CampusSync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Login username
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake courses, faculty, students and subjects
    Seed {
        /// Number of courses to create
        #[arg(short = 'c', long, default_value = "4")]
        courses: usize,

        /// Number of faculty members
        #[arg(short = 'f', long, default_value = "10")]
        faculty: usize,

        /// Number of students per course
        #[arg(short = 's', long, default_value = "30")]
        students: usize,

        /// Number of subjects per course
        #[arg(long, default_value = "5")]
        subjects: usize,
    },
    /// Clear all seeded data (keeps admins and rows created through the API)
    Clear,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let pool = init_db_pool(&DatabaseConfig::from_env())
        .await
        .expect("Failed to connect to database");

    let secret_config = SecretConfig::from_env();
    let secrets =
        BcryptSecrets::new(secret_config.bcrypt_cost).expect("BCRYPT_COST must be between 4 and 31");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin { username, password } => {
            handle_create_admin(&pool, &secrets, username, password).await
        }
        Commands::Seed {
            courses,
            faculty,
            students,
            subjects,
        } => {
            let config = SeedConfig {
                courses,
                faculty,
                students_per_course: students,
                subjects_per_course: subjects,
            };
            handle_seed(&pool, &secrets, config).await
        }
        Commands::Clear => handle_clear(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &sqlx::PgPool,
    secrets: &BcryptSecrets,
    username: Option<String>,
    password: Option<String>,
) {
    let username = username.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Username")
            .interact_text()
            .expect("Failed to read username")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    let hashed = match secrets.hash(&password) {
        Ok(hashed) => hashed,
        Err(e) => {
            eprintln!("\n❌ {}", e);
            std::process::exit(1);
        }
    };

    match create_admin(pool, &username, &hashed).await {
        Ok(_) => {
            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", username);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::PgPool, secrets: &BcryptSecrets, config: SeedConfig) {
    println!(
        "Seeding {} courses, {} faculty, {} students, {} subjects",
        config.courses,
        config.faculty,
        config.total_students(),
        config.total_subjects()
    );

    // One hash shared by every seeded account
    let password_hash = match secrets.hash(SEED_PASSWORD) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("\n❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = seeder::seed_all(pool, config, &password_hash).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
    println!("   Seeded accounts log in with password '{}'", SEED_PASSWORD);
}

async fn handle_clear(pool: &sqlx::PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
    println!("✅ Cleared seeded data");
}
