use clap::Parser;
use recipebox::{
    app::AppContext,
    cli::{commands, Cli, Commands},
    config::Settings,
    search::SearchFilters,
    web::{create_router, AppState},
    Error, Result,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipebox=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Search {
            query,
            diet,
            cuisine,
            max_time,
            pages,
        } => {
            let app = AppContext::new(settings)?;
            let filters = SearchFilters {
                diet,
                cuisine,
                max_time,
            };
            commands::search(&app, &query, filters, pages.max(1)).await?;
        }
        Commands::Random { count } => {
            let app = AppContext::new(settings)?;
            commands::random(&app, count).await?;
        }
        Commands::Show { id } => {
            let app = AppContext::new(settings)?;
            commands::show(&app, &id).await?;
        }
        Commands::Suggest { query } => {
            let app = AppContext::new(settings)?;
            commands::suggest(&app, &query).await?;
        }
        Commands::Login { email, password } => {
            let app = AppContext::new(settings)?;
            commands::login(&app, &email, &password).await?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting RecipeBox server");
    info!("Backend: {}", settings.backend.base_url);
    info!("Server: {}:{}", settings.server.host, settings.server.port);

    let app_context = AppContext::new(settings.clone())?;
    let provider_status = if app_context.provider.is_configured() {
        "Configured"
    } else {
        "Not configured (local recipes)"
    };
    let state = AppState::new(app_context);
    let app = create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("RecipeBox Server");
    println!("========================================");
    println!("Status: Running");
    println!("Address: http://{addr}");
    println!("Backend: {}", settings.backend.base_url);
    println!("Recipe API: {provider_status}");
    println!("Storage: {}", settings.storage.path.display());
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}
