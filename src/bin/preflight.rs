use product_catalog::infra::config::{AppConfig, StorageBackend};
use product_catalog::{PostgresProductRepository, ProductRepository};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Optional:\n\
           DB_MAX_CONNECTIONS, MIGRATIONS_DIR, BIND_ADDR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = AppConfig::from_env()?;
    if config.storage != StorageBackend::Postgres {
        return Err(anyhow::anyhow!(
            "STORAGE_BACKEND is {:?}; preflight only checks the PostgreSQL backend",
            config.storage
        ));
    }
    let database_url = config.require_database_url()?;

    println!("> Preflight:");
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  DB_MAX_CONNECTIONS={}", config.db_max_connections);
    println!("  MIGRATIONS_DIR={}", config.migrations_dir.display());

    let repository =
        PostgresProductRepository::connect(database_url, config.db_max_connections).await?;
    repository.ping().await?;
    println!("  Database reachable.");

    repository.run_migrations(&config.migrations_dir).await?;
    println!("  Migrations applied.");

    let count = repository.find_all().await?.len();
    println!("  products table readable ({} rows).", count);

    println!("> Preflight OK.");
    Ok(())
}
