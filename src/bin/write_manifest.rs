//! Integrity manifest utility for CardioScreen model directories.
//!
//! Validates the artifacts in a model directory by loading them exactly as
//! the application would, then writes `manifest.json` binding each artifact
//! to its SHA-256 digest.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <model_dir> [--model <file>] [--scaler <file>]
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use cardioscreen::adapters::json::{ArtifactManifest, MANIFEST_FILE, MODEL_FILE, SCALER_FILE};
use cardioscreen::domain::{DecisionPolicy, NetworkParams, ScalerParams};
use cardioscreen::InferenceContext;

struct Args {
    model_dir: PathBuf,
    model_file: String,
    scaler_file: String,
}

fn usage() -> anyhow::Error {
    anyhow!("Usage: write_manifest <model_dir> [--model <file>] [--scaler <file>]")
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let mut model_dir: Option<PathBuf> = None;
    let mut model_file = MODEL_FILE.to_string();
    let mut scaler_file = SCALER_FILE.to_string();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model" => model_file = args.next().ok_or_else(usage)?,
            "--scaler" => scaler_file = args.next().ok_or_else(usage)?,
            "-h" | "--help" => return Err(usage()),
            _ => {
                if model_dir.is_some() {
                    return Err(usage());
                }
                model_dir = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(Args {
        model_dir: model_dir.ok_or_else(usage)?,
        model_file,
        scaler_file,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, name: &str) -> Result<T> {
    let path = dir.join(name);
    let bytes = fs::read(&path).with_context(|| format!("Failed to read {path:?}"))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse {path:?}"))
}

fn main() -> Result<()> {
    let args = parse_args()?;

    if !args.model_dir.is_dir() {
        bail!("Model directory not found: {:?}", args.model_dir);
    }

    // Refuse to bind artifacts the application would reject. Parsed directly
    // so that a stale manifest does not block regeneration.
    let scaler: ScalerParams = read_json(&args.model_dir, &args.scaler_file)?;
    let network: NetworkParams = read_json(&args.model_dir, &args.model_file)?;
    let context = InferenceContext::from_parts(scaler, network, DecisionPolicy::default())
        .with_context(|| format!("Artifacts in {:?} failed validation", args.model_dir))?;

    let manifest_path = args.model_dir.join(MANIFEST_FILE);
    let manifest = ArtifactManifest::for_files(
        &args.model_dir,
        &[args.model_file.as_str(), args.scaler_file.as_str()],
    )?;
    let manifest_bytes =
        serde_json::to_vec_pretty(&manifest).context("Failed to serialize manifest.json")?;
    fs::write(&manifest_path, &manifest_bytes)
        .with_context(|| format!("Failed to write {manifest_path:?}"))?;

    println!(
        "Validated artifacts (architecture {:?}, encoding {})",
        context.architecture(),
        context.encoding()
    );
    for (name, digest) in &manifest.files {
        println!("  {name}  sha256:{digest}");
    }
    println!("Wrote manifest: {manifest_path:?}");

    Ok(())
}
