//! Build command - create a distribution from a source tree.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use packsmith::builder::{BuildOptions, BuilderConfig, PackBuilder};

use crate::error::CliError;

/// Arguments for `packsmith build`.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Path to the modpack definition JSON
    #[arg(long)]
    pub config: PathBuf,

    /// Source tree to collect files from
    #[arg(long)]
    pub source: PathBuf,

    /// Distribution output directory
    #[arg(long)]
    pub output: PathBuf,

    /// Write the manifest here instead of `<output>/<name>.json`
    #[arg(long)]
    pub manifest_dest: Option<PathBuf>,

    /// Version stamped into the manifest
    #[arg(long)]
    pub pack_version: Option<String>,

    /// Base URL the distribution will be served from
    #[arg(long)]
    pub base_url: Option<String>,

    /// Objects location recorded in the manifest
    #[arg(long, default_value = "objects")]
    pub objects_location: String,

    /// Libraries location recorded in the manifest
    #[arg(long)]
    pub libraries_location: Option<String>,

    /// Resolve `.url.txt` redirect sidecars
    #[arg(long)]
    pub url_redirects: bool,
}

/// Run the build command.
pub fn run(args: BuildArgs) -> Result<(), CliError> {
    let config = BuilderConfig::load(&args.config)?;

    fs::create_dir_all(&args.output).map_err(|e| CliError::Io {
        path: args.output.clone(),
        source: e,
    })?;

    let options = BuildOptions {
        source_dir: args.source.clone(),
        objects_dir: args.output.join(&args.objects_location),
        url_redirects: args.url_redirects,
    };

    let outcome = PackBuilder::new(config, options).build()?;
    let mut manifest = outcome.manifest;

    manifest.update_version(args.pack_version.as_deref());
    manifest.base_url = args.base_url;
    manifest.objects_location = Some(args.objects_location);
    manifest.libraries_location = args.libraries_location;

    let manifest_dest = match args.manifest_dest {
        Some(dest) => dest,
        None => {
            let name = manifest.name.as_deref().unwrap_or("manifest");
            args.output.join(format!("{}.json", name))
        }
    };
    info!(manifest = %manifest_dest.display(), "Writing manifest");
    manifest.save(&manifest_dest)?;

    let stats = outcome.stats;
    println!("Built {} install tasks", stats.entries);
    println!("  Objects written: {}", stats.objects_written);
    println!("  Deduplicated:    {}", stats.objects_deduplicated);
    println!("  URL redirects:   {}", stats.redirected);
    println!("  Bytes hashed:    {}", stats.bytes_hashed);
    println!("Manifest: {}", manifest_dest.display());
    Ok(())
}
