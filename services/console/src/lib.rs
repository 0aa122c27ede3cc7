mod careers;
mod cli;
mod department;
mod infra;
mod server;

use hr_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
