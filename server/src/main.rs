// Forbid unwrap() in production code to prevent panics on bad input.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::any,
};
use futures::StreamExt;
use server::{
    ClientConnection,
    auth::{AuthService, PasswordHasher},
    config::{Environment, ServerConfig},
    socket::serve_socket,
    storage::{AppStore, MemoryStorage, UserStore},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct AppState {
    /// Shared by every connection.
    service: Arc<AuthService>,
    /// Server configuration.
    config: Arc<ServerConfig>,
}

#[tokio::main]
async fn main() {
    // Load configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(Environment::Local);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.environment);

    tracing::info!(
        environment = ?config.environment,
        listen_port = config.listen_port,
        token_ttl = ?config.token_ttl,
        request_timeout = ?config.request_timeout,
        apps = config.apps.len(),
        "loaded configuration"
    );

    let hasher = match PasswordHasher::new(config.hash_params) {
        Ok(hasher) => hasher,
        Err(e) => {
            tracing::error!("Invalid password hashing parameters: {e}");
            std::process::exit(1);
        }
    };

    let storage = Arc::new(MemoryStorage::new(
        config.apps.iter().cloned(),
        config.admin_emails.iter().cloned(),
    ));
    let service = AuthService::new(
        Arc::clone(&storage) as Arc<dyn UserStore>,
        storage as Arc<dyn AppStore>,
        hasher,
        config.token_ttl,
    );

    let listen_port = config.listen_port;
    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/ws", any(ws_handler))
        .with_state(state);

    // Connect to the websocket on ws://<host>:<port>/ws
    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Server error: {e}");
            std::process::exit(1);
        });

    tracing::info!("server stopped");
}

/// Install the global subscriber. `RUST_LOG` overrides the default level.
fn init_tracing(environment: Environment) {
    let default_directive = match environment {
        Environment::Local | Environment::Dev => "server=debug",
        Environment::Prod => "server=info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    match environment {
        Environment::Local => registry.with(tracing_subscriber::fmt::layer()).init(),
        Environment::Dev | Environment::Prod => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("got a websocket connection");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_connection =
        ClientConnection::new(Arc::clone(&state.service), state.config.request_timeout);

    let (outgoing, incoming) = socket.split();
    serve_socket(incoming, outgoing, client_connection).await;
}
