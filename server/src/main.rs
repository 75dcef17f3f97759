use std::net::SocketAddr;

use eaglechat_server::{bootstrap, routes};
use eaglechat_types::prelude::*;

#[tokio::main]
async fn main() -> ClResult<()> {
	let app = bootstrap::run().await?;
	let listen = app.settings.api.listen.clone();

	let router = routes::build(app).into_make_service_with_connect_info::<SocketAddr>();

	let listener = tokio::net::TcpListener::bind(&listen)
		.await
		.map_err(|e| Error::ConfigError(format!("failed to bind {listen}: {e}")))?;

	info!(addr = %listen, "listening");

	axum::serve(listener, router)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.map_err(|e| Error::Internal(format!("server error: {e}")))
}

async fn shutdown_signal() {
	let ctrl_c = async {
		let _ = tokio::signal::ctrl_c().await;
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(_) => std::future::pending::<()>().await,
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("shutting down");
}

// vim: ts=4
