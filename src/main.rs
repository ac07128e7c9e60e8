
use indicatif::ProgressBar;
use log::{LevelFilter, error, info};
use std::time::{Duration, Instant};

use vcfweave::cli::core::get_cli;
use vcfweave::cli::merge::{MergeSettings, check_merge_settings};
use vcfweave::merge_driver::merge_sources;
use vcfweave::parsing::vcf_source::VcfSource;
use vcfweave::util::progress_bar::get_spinner_style;
use vcfweave::writers::vcf_sink::{OutputTarget, VcfSink, build_output_header};

fn run_merge(settings: MergeSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_merge_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // open all the inputs up front so a bad file fails before anything is written
    info!("Opening input VCF files...");
    let mut sources: Vec<VcfSource> = match settings.vcf_filenames.iter()
        .map(|vcf_fn| VcfSource::open(vcf_fn))
        .collect() {
        Ok(s) => s,
        Err(e) => {
            error!("Error while opening input VCF files: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    // the output header is copied from the first input
    let out_header = match build_output_header(sources[0].header()) {
        Ok(h) => h,
        Err(e) => {
            error!("Error while building output header: {e:#}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    let target = OutputTarget::from_path(settings.output_filename.as_deref());
    let mut vcf_sink = match VcfSink::new(out_header, target, settings.threads) {
        Ok(vs) => vs,
        Err(e) => {
            error!("Error while opening merged VCF output: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    info!("Merging all inputs...");
    let progress = ProgressBar::new_spinner()
        .with_style(get_spinner_style());
    progress.enable_steady_tick(Duration::from_millis(200));
    let summary = match merge_sources(&mut sources, &mut vcf_sink, &progress) {
        Ok(s) => s,
        Err(e) => {
            progress.abandon();
            error!("Error while merging input VCF files: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    progress.finish_and_clear();
    info!("Wrote {} records across {} contigs.", summary.records_written(), summary.contigs_merged());

    if let Err(e) = vcf_sink.finish(!settings.disable_index) {
        error!("Error while finalizing merged VCF output: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Merge completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    run_merge(cli.settings);

    info!("Process finished successfully.");
}
