use crate::{
    config::Config,
    controller::{BoardController, BoardHandle},
    domain::ToyRepository,
    errors::AppError,
    repositories::HttpToyRepository,
    routes::create_router,
    view::PageRenderer,
    AppState,
};
use axum::Router;
use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, task::JoinHandle};

pub struct App {
    pub router: Router,
    pub board: BoardHandle,
    pub controller: JoinHandle<()>,
}

/// Starts the board controller on `repo` and builds the router around it.
pub fn build_app(repo: Arc<dyn ToyRepository>, settle_timeout: Duration) -> Result<App, AppError> {
    let pages = PageRenderer::new()?;
    let (board, controller) = BoardController::spawn(repo);
    let state = Arc::new(AppState {
        board: board.clone(),
        pages,
        settle_timeout,
    });
    Ok(App {
        router: create_router(state),
        board,
        controller,
    })
}

/// Wires the HTTP repository, controller and router, then serves until Ctrl-C.
pub async fn run(config: Config) -> Result<(), AppError> {
    tracing::info!(store = %config.toys_api_url, "Startup: Connecting to toy store");
    let repo = HttpToyRepository::from_config(&config)?;
    let App {
        router,
        board,
        controller,
    } = build_app(Arc::new(repo), config.settle_timeout)?;

    match board.settled().await {
        Ok(()) => tracing::info!("Startup: Initial toy list request finished"),
        Err(e) => tracing::error!(error = %e, "Startup: Board controller stopped early"),
    }
    // Handlers keep their own handle; this one must not outlive the server.
    drop(board);

    let listener = TcpListener::bind(config.bind_address).await?;
    tracing::info!("Server listening on http://{}", config.bind_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last board handle) is gone; let in-flight
    // store calls finish so the controller can wind down.
    if let Err(e) = controller.await {
        tracing::error!(error = %e, "Board controller task failed");
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
