use dotenvy::dotenv;
use gateway::{bootstrap, config::ProxyConfig};
use tracing::{error, info};
use common::utils::logging::init_logging_from_env;
use uuid::Uuid;

fn init_logging() {
    // load .env first so RUST_LOG and LOG_FORMAT take effect
    dotenv().ok();
    init_logging_from_env();
    info!(service = "gateway", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "gateway",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let config = match ProxyConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!(service = "gateway", event = "config_invalid", error = %e, "failed to load gateway configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "gateway",
        event = "start",
        %service_id,
        pid,
        version,
        upstream = %config.upstream_base_url(),
        "gateway service starting"
    );

    // runs until the listener fails or Ctrl+C
    if let Err(e) = bootstrap::run(config) {
        error!(service = "gateway", event = "run_failed", error = %e, "gateway::bootstrap::run returned error");
        return std::process::ExitCode::FAILURE;
    }

    info!(
        service = "gateway",
        event = "stop",
        %service_id,
        pid,
        "gateway service stopped"
    );
    std::process::ExitCode::SUCCESS
}
