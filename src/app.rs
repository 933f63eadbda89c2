use std::{convert::Infallible, net::SocketAddr};

use axum::{
    extract::Request, middleware, response::Response, routing::get, Router, ServiceExt,
};
use tower::{util::BoxCloneService, Layer};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{method_override::method_override, state::AppState, users};

pub type AppService = BoxCloneService<Request, Response, Infallible>;

/// Routes plus static files. Unmatched paths fall through to `public_dir`.
pub fn build_router(state: AppState, public_dir: &str) -> Router {
    Router::new()
        .merge(users::router())
        .route("/", get(|| async { axum::response::Redirect::to("/users") }))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// The router wrapped in method override, which has to run before routing.
pub fn build_app(state: AppState, public_dir: &str) -> AppService {
    let router = build_router(state, public_dir);
    BoxCloneService::new(middleware::from_fn(method_override).layer(router))
}

pub async fn serve(app: AppService, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
