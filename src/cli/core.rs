
use anyhow::bail;
use clap::Parser;
use chrono::Datelike;
use lazy_static::lazy_static;
use std::path::Path;

use crate::cli::merge::MergeSettings;

lazy_static! {
    /// Stores the full version string we plan to use, which is generated in build.rs
    /// # Examples
    /// * `0.1.0-6bb9635-dirty` - while on a dirty branch
    /// * `0.1.0-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));

    /// Shared after help string containing the legalese.
    pub static ref AFTER_HELP: String = format!("Copyright (C) 2024-{}     vcfweave contributors
This program comes with ABSOLUTELY NO WARRANTY; see the license for details.", chrono::Utc::now().year());
}

/// vcfweave, merges position-sorted, indexed VCF files into a single ordered VCF.
/// Contigs are processed one at a time (numeric, then X, Y, M, MT, then the rest) and records within a contig are ordered by POS, REF, then ALT.
#[derive(Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = &**AFTER_HELP)]
pub struct Cli {
    #[command(flatten)]
    pub settings: MergeSettings
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_required_filename(filename: &Path, label: &str) -> anyhow::Result<()> {
    if !filename.exists() {
        bail!("{} does not exist: \"{}\"", label, filename.display());
    }

    // file exists
    Ok(())
}
