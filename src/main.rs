//! Countdown Pad - A state-managed HTTP server for a keypad-driven countdown timer
//! 
//! This is the main entry point for the countdown-pad application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_pad::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::countdown_driver_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_pad={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-pad server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_ms);

    let shutdown = shutdown_signal()?;

    // Create application state and the tick event stream it is driven by
    let (state, tick_events) = AppState::new(config.port, config.host.clone(), config.tick_ms);
    let state = Arc::new(state);

    if let Some(digits) = &config.preset {
        let snapshot = state.preset(digits)?;
        info!("Preset countdown {}", snapshot.clock());
    }

    // Start the countdown driver background task
    let driver_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_driver_task(driver_state, tick_events).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /digit/:d  - Append a keypad digit (0-9)");
    info!("  POST /start     - Start the entered countdown");
    info!("  POST /pause     - Pause the running countdown");
    info!("  POST /resume    - Resume from the paused time");
    info!("  POST /restart   - Restart the paused countdown from the top");
    info!("  GET  /status    - Current timer state");
    info!("  GET  /events    - Server-sent stream of timer state");
    info!("  GET  /health    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
