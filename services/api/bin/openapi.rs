//! Writes the REST catalog's OpenAPI document, by default to `openapi.json`.
//!
//! Usage: `openapi [OUTPUT_PATH]`

use anyhow::Context;
use commai_api::router::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());

    let spec_json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize the OpenAPI document")?;
    std::fs::write(&path, spec_json).with_context(|| format!("Failed to write {path}"))?;

    println!("Wrote OpenAPI specification to {path}");
    Ok(())
}
