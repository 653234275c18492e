//! CLI front end: collects one record, posts it to a running API, renders
//! the predicted price.

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use serde_json::json;

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Weight in carats
    #[arg(long)]
    pub carat: f64,
    /// Cut grade: Fair, Good, Very Good, Premium or Ideal
    #[arg(long)]
    pub cut: String,
    /// Color grade, D (colorless) through J
    #[arg(long)]
    pub color: String,
    /// Clarity grade, IF through I1
    #[arg(long)]
    pub clarity: String,
    /// Table width as a percentage of the widest point
    #[arg(long)]
    pub table: f64,
    /// Length in mm
    #[arg(long)]
    pub x: f64,
    /// Width in mm
    #[arg(long)]
    pub y: f64,
    /// Depth in mm
    #[arg(long)]
    pub z: f64,
}

/// Either an error or a price; never both. Callers must check `error`
/// before trusting `predicted_price`.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    predicted_price: Option<f64>,
}

pub async fn run(args: PredictArgs) -> anyhow::Result<()> {
    let api_url = std::env::var("API_URL")
        .unwrap_or_else(|_| crate::defaults::DEFAULT_API_URL.to_string());

    let payload = json!({
        "carat": args.carat,
        "cut": args.cut,
        "color": args.color,
        "clarity": args.clarity,
        "table": args.table,
        "x": args.x,
        "y": args.y,
        "z": args.z,
    });

    let resp = reqwest::Client::new()
        .post(&api_url)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("failed to reach prediction API at {api_url}"))?;
    let status = resp.status();
    let body: PredictResponse = resp
        .json()
        .await
        .context("prediction API returned a non-JSON body")?;

    if let Some(error) = body.error {
        anyhow::bail!("prediction API returned {status}: {error}");
    }
    let price = body
        .predicted_price
        .context("response missing predicted_price")?;

    println!("predicted price: {:.2} ({})", price, price_band(price));
    Ok(())
}

/// Banding used by the form front end, prices in thousands.
fn price_band(price: f64) -> &'static str {
    if price < 2.0 {
        "low"
    } else if price < 5.0 {
        "mid"
    } else {
        "high"
    }
}
