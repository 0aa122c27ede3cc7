use crate::cli::SandboxArgs;
use hr_portal::config::AppConfig;
use hr_portal::error::AppError;
use hr_portal::sandbox::{sandbox_router, SandboxState, APPLICATIONS_PATH, DEPARTMENT_PATH};
use tracing::info;

pub(crate) async fn run(mut config: AppConfig, mut args: SandboxArgs) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let app = sandbox_router(SandboxState::seeded());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        ?config.environment,
        %addr,
        applications = APPLICATIONS_PATH,
        department = DEPARTMENT_PATH,
        "hr portal sandbox ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
