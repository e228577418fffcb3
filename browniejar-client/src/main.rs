use browniejar_client::{Cli, run};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), browniejar_client::AppError> {
    run(Cli::parse()).await
}
