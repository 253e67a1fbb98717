//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the summary endpoints (the same one served
//! at `/api-docs/openapi.json`) so clients can be generated without a running
//! server. Usage: `openapi [OUTPUT]`, defaulting to `openapi.json`.

use api_lib::web::rest::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    let document = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&output, document)?;
    println!("Wrote the summary API document to {}", output.display());
    Ok(())
}
