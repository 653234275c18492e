//! Pre-startup artifact bootstrap.
//!
//! Deployment convenience: when an artifact file is missing and
//! `ARTIFACT_BASE_URL` is configured, pull it over HTTP before the loader
//! runs. Fetch failures are logged, not returned; the loader's fatal
//! precondition stays the authority on whether the service can start.

use anyhow::Context;
use std::path::Path;

use crate::artifact::{self, FEATURES_FILE, MODEL_FILE};

/// Download any missing artifact files into `dir`, if a base URL is set.
pub async fn ensure_artifacts(dir: &Path) {
    let Ok(base) = std::env::var("ARTIFACT_BASE_URL") else {
        return;
    };
    let base = base.trim_end_matches('/');

    for name in [MODEL_FILE, FEATURES_FILE] {
        let target = dir.join(name);
        if target.exists() {
            continue;
        }
        let url = format!("{base}/{name}");
        tracing::info!("fetching missing artifact {name} from {url}");
        match download(&url, &target).await {
            Ok(len) => tracing::info!("wrote {} ({len} bytes)", target.display()),
            Err(e) => tracing::warn!("artifact fetch failed for {url}: {e:#}"),
        }
    }
}

async fn download(url: &str, target: &Path) -> anyhow::Result<usize> {
    let resp = reqwest::get(url)
        .await
        .with_context(|| format!("request to {url} failed"))?;
    anyhow::ensure!(
        resp.status().is_success(),
        "server returned {}",
        resp.status()
    );
    let bytes = resp.bytes().await.context("failed to read response body")?;
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, &bytes).await?;
    Ok(bytes.len())
}

/// The `fetch` subcommand: bootstrap the artifact directory, then verify
/// both files actually landed.
pub async fn run_once() -> anyhow::Result<()> {
    let dir = artifact::artifact_dir();
    ensure_artifacts(&dir).await;

    for name in [MODEL_FILE, FEATURES_FILE] {
        let path = dir.join(name);
        anyhow::ensure!(
            path.exists(),
            "artifact still missing after fetch: {}",
            path.display()
        );
    }
    tracing::info!("artifacts present in {}", dir.display());
    Ok(())
}
