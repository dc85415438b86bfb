use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "agora",
    version,
    about = "Minimal web forum: accounts, sessions, topics"
)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, env = "DATABASE_URL", default_value = "localhost.sqlite")]
    db: PathBuf,

    /// Redis URL for the CSRF token store (in-process store when unset)
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = agora::web::serve(&cli.db, cli.redis_url.as_deref(), cli.port).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
