use anyhow::Result;
use battery_decision_engine::{api, config, optimizer::MdpSolver, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing(cfg.log_format);

    let solver = MdpSolver::new(cfg.solver.clone(), cfg.policy)?;
    info!(
        grid_size = cfg.solver.grid_size,
        horizon = cfg.solver.horizon,
        step_percent = cfg.solver.step_percent,
        policy = ?cfg.policy,
        "solver configured"
    );

    let app = api::router(api::AppState::new(solver), &cfg.server);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("binding to 0.0.0.0 - decision endpoint is reachable from the network");
    }

    info!(%addr, "starting battery decision engine");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    info!("shutdown complete");
    Ok(())
}
