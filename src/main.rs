use axum::Router;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use wallet_server::routes::build_app;
use wallet_server::shared::config::AppConfig;
use wallet_server::shared::database::Database;
use wallet_server::shared::services::AppState;
use wallet_server::shared::utils::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 설정 로드 (.env 포함)
    let config = AppConfig::from_env().context("could not load configuration")?;
    init_logging();

    // DB 연결 + 마이그레이션
    let db = Database::new(&config.database).await?;
    db.initialize().await?;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(&db, &config);

    let app = build_app(app_state, &config.server)?;

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/api", addr);

    let result = serve(listener, app, config.server.shutdown_timeout).await;

    db.close().await;
    result
}

// 서버 실행 + graceful shutdown
// 종료 신호 이후 shutdown_timeout 안에 진행 중인 요청이 끝나지 않으면 에러
async fn serve(listener: TcpListener, app: Router, shutdown_timeout: Duration) -> Result<()> {
    let (signalled_tx, mut signalled_rx) = watch::channel(false);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("shutdown signal received, draining in-flight requests");
        let _ = signalled_tx.send(true);
    });
    let mut server = tokio::spawn(async move { server.await });

    let deadline = async {
        if signalled_rx.wait_for(|signalled| *signalled).await.is_err() {
            // 서버가 먼저 끝남
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        joined = &mut server => {
            joined
                .context("server task panicked")?
                .context("server failed")?;
            tracing::info!("server has shutdown gracefully");
            Ok(())
        }
        _ = deadline => {
            server.abort();
            tracing::error!(?shutdown_timeout, "server failed to shutdown gracefully");
            anyhow::bail!("graceful shutdown timed out after {:?}", shutdown_timeout)
        }
    }
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
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
}
