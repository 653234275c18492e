use clap::{Parser, Subcommand};
use diamond_pricer::{api, client, fetch};
use tracing::Level;

#[derive(Parser)]
#[command(name = "diamond-pricer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the prediction API (POST /predict)
    Serve,
    /// Download missing model artifacts, then exit
    Fetch,
    /// Post one record to a running API and print the predicted price
    Predict(client::PredictArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    match Cli::parse().cmd {
        Cmd::Serve => api::run().await?,
        Cmd::Fetch => fetch::run_once().await?,
        Cmd::Predict(args) => client::run(args).await?,
    }
    Ok(())
}
