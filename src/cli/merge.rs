
use anyhow::ensure;
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, FULL_VERSION};

#[derive(Args, Clone, Default)]
pub struct MergeSettings {
    /// Input variant call files (bgzipped VCF or BCF, with .tbi or .csi index); the header of the first one is used for the output
    #[clap(required = true)]
    #[clap(num_args = 2..)]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub vcf_filenames: Vec<PathBuf>,

    /// Output VCF file; ".gz" writes bgzipped output [default: stdout]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: Option<PathBuf>,

    /// Disables writing a .tbi index for bgzipped output
    #[clap(long = "no-index")]
    #[clap(help_heading = Some("Input/Output"))]
    pub disable_index: bool,

    /// Number of threads to use for output compression
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8
}

pub fn check_merge_settings(mut settings: MergeSettings) -> anyhow::Result<MergeSettings> {
    info!("vcfweave version: {:?}", FULL_VERSION.as_str());
    info!("Inputs:");

    // check the input VCFs
    ensure!(settings.vcf_filenames.len() >= 2, "At least two input VCFs are required");
    for (i, i_vcf) in settings.vcf_filenames.iter().enumerate() {
        check_required_filename(i_vcf, format!("Input VCF #{i}").as_str())?;
        info!("\tInput VCF #{i}: {i_vcf:?}");
    }

    // outputs
    info!("Outputs:");
    if settings.output_filename.as_deref().is_some_and(|p| p.as_os_str() == "-") {
        settings.output_filename = None;
    }
    match settings.output_filename.as_deref() {
        Some(out_fn) => info!("\tMerged VCF: {out_fn:?}"),
        None => info!("\tMerged VCF: stdout")
    };
    info!("\tIndexing: {}", if settings.disable_index { "DISABLED" } else { "ENABLED" });

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Compression threads: {}", settings.threads);

    Ok(settings)
}
