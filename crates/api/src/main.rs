#[tokio::main]
async fn main() {
    aquaflow_observability::init();

    let config = aquaflow_api::config::AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    let pool = aquaflow_store::build_pool(&config.database_url, config.db_acquire_timeout)
        .expect("failed to configure database pool");

    let app = aquaflow_api::app::build_app(&config, pool.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server exited");
    }

    aquaflow_store::close_pool(&pool).await;
}
