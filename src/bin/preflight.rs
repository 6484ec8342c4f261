use book_tracker::infra::{config, logging};
use book_tracker::{BookFilter, BookStore, ReadingStatus, SqliteBookStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads env vars (all optional):\n\
           PORT (default {}), DB_PATH (default {}), DB_MAX_CONNECTIONS (default {})\n",
        config::DEFAULT_PORT,
        config::DEFAULT_DB_PATH,
        config::DEFAULT_DB_MAX_CONNECTIONS,
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if malformed)
    let port = config::port()?;
    let db_path = config::db_path();
    let max_connections = config::db_max_connections()?;

    println!("> Preflight:");
    println!("  PORT={}", port);
    println!("  DB_PATH={}", db_path);
    println!("  DB_MAX_CONNECTIONS={}", max_connections);

    // Opening the store applies the schema.
    let store = SqliteBookStore::connect(&db_path, max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", db_path, e))?;
    println!("  Storage opened and schema is current.");

    let total = store.count(&BookFilter::default()).await?;
    println!("  Books stored: {}", total);
    for status in ReadingStatus::ALL {
        let n = store.count(&BookFilter::by_status(status)).await?;
        println!("    {:<12} {}", status.as_str(), n);
    }

    // Port must be free for the API server.
    match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(_) => println!("  Port {} is available.", port),
        Err(e) => return Err(anyhow::anyhow!("Port {} is not available: {}", port, e)),
    }

    println!("> Preflight OK.");
    Ok(())
}
