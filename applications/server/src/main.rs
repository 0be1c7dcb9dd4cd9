/// Cadence Server - music streaming backend
use cadence_core::PageRequest;
use cadence_server::{config::ServerConfig, create_router};
use cadence_storage::Database;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-server")]
#[command(about = "Cadence music streaming server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a verified account without sending email
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long, env = "CADENCE_NEW_USER_PASSWORD")]
        password: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// List all accounts
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config)?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser {
            username,
            email,
            password,
            admin,
        } => {
            add_user(config, &username, &email, &password, admin).await?;
        }
        Commands::ListUsers => {
            list_users(config).await?;
        }
    }

    Ok(())
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<Arc<Database>> {
    let db = Database::connect(&config.storage.database_url).await?;
    tracing::info!("Database connected");
    Ok(Arc::new(db))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Cadence Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let db = open_database(&config).await?;
    let notifier = cadence_server::notifier(&config)?;
    let app_state = cadence_server::build_state(&config, db, notifier);
    tracing::info!("Auth service initialized");

    let app = create_router(app_state, &config.server.cors_origins);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn add_user(
    config: ServerConfig,
    username: &str,
    email: &str,
    password: &str,
    admin: bool,
) -> anyhow::Result<()> {
    config.validate()?;

    let db = open_database(&config).await?;
    let notifier = cadence_server::notifier(&config)?;
    let app_state = cadence_server::build_state(&config, db, notifier);

    let account = app_state
        .credentials
        .provision(username, email, password, admin)
        .await?;

    println!(
        "Created {} {} ({}) with id {}",
        if account.is_admin { "admin" } else { "user" },
        account.username,
        account.email,
        account.id
    );
    Ok(())
}

async fn list_users(config: ServerConfig) -> anyhow::Result<()> {
    let db = open_database(&config).await?;

    let mut page = PageRequest::new(0, 100);
    println!("Users:");
    loop {
        let users = cadence_storage::accounts::list(db.pool(), page).await?;
        for user in &users.content {
            println!(
                "  {} - {} <{}>{}{}",
                user.id,
                user.username,
                user.email,
                if user.is_admin { " [admin]" } else { "" },
                if user.is_verified { "" } else { " [unverified]" },
            );
        }
        if i64::from(page.page) + 1 >= users.total_pages {
            break;
        }
        page.page += 1;
    }

    Ok(())
}
