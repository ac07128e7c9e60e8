
use anyhow::Context;
use indexmap::IndexSet;
use indicatif::ProgressBar;
use itertools::Itertools;
use log::{debug, info};

use crate::contig_order::chrom_cmp;
use crate::data_types::merge_error::MergeError;
use crate::data_types::variant_record::MergeRecord;
use crate::parsing::record_source::{ContigFetch, RecordSource};
use crate::source_cursor::SourceCursor;
use crate::stream_merger::StreamMerger;
use crate::writers::record_sink::RecordSink;

/// Tracks what a full merge run wrote out
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Total records sent to the sink
    records_written: u64,
    /// Records written for each contig, in processing order
    per_contig: Vec<(String, u64)>
}

impl MergeSummary {
    // getters
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn contigs_merged(&self) -> usize {
        self.per_contig.len()
    }

    pub fn per_contig(&self) -> &[(String, u64)] {
        &self.per_contig
    }
}

/// Collects every contig reported by any input, without duplicates, sorted by `chrom_cmp`.
/// # Arguments
/// * `sources` - all inputs
pub fn contig_union<S: RecordSource>(sources: &[S]) -> Vec<String> {
    let union: IndexSet<String> = sources.iter()
        .flat_map(|s| s.contigs().iter().cloned())
        .collect();
    union.into_iter()
        .sorted_by(|a, b| chrom_cmp(a, b))
        .collect()
}

/// Merges all inputs into the sink, one contig at a time.
/// A contig is fully drained before the next one starts.
/// # Arguments
/// * `sources` - all inputs, in priority order
/// * `sink` - receives every record in final order
/// * `progress` - updated with the running record count
/// # Errors
/// * if any input fails to load or read a contig
/// * if a contig from the union is not present in any input
/// * if the sink fails to write
pub fn merge_sources<S, K>(sources: &mut [S], sink: &mut K, progress: &ProgressBar) -> anyhow::Result<MergeSummary>
where
    S: RecordSource,
    S::Record: MergeRecord,
    K: RecordSink<S::Record> + ?Sized
{
    let contigs = contig_union(sources);
    info!("Found {} contigs across {} inputs.", contigs.len(), sources.len());
    debug!("Contig order: {contigs:?}");

    let mut summary = MergeSummary::default();
    for contig in contigs.into_iter() {
        progress.set_message(contig.clone());
        let num_records = merge_contig(sources, &contig, sink, progress)?;
        summary.records_written += num_records;
        summary.per_contig.push((contig, num_records));
    }

    Ok(summary)
}

/// Merges a single contig from all inputs into the sink.
/// Inputs that do not have the contig, or have it but with no records, do not take part.
/// # Arguments
/// * `sources` - all inputs
/// * `contig` - the contig to merge
/// * `sink` - receives every record for the contig in order
/// * `progress` - incremented once per written record
pub fn merge_contig<S, K>(sources: &mut [S], contig: &str, sink: &mut K, progress: &ProgressBar) -> anyhow::Result<u64>
where
    S: RecordSource,
    S::Record: MergeRecord,
    K: RecordSink<S::Record> + ?Sized
{
    let mut num_present = 0;
    let mut cursors = vec![];
    for source in sources.iter_mut() {
        let label = source.label();
        let fetch = source.fetch(contig)
            .with_context(|| format!("Error while loading {contig} from {label}:"))?;
        if matches!(fetch, ContigFetch::Present(_)) {
            num_present += 1;
        }

        let cursor = SourceCursor::from_fetch(contig, fetch)
            .with_context(|| format!("Error while reading {contig} from {label}:"))?;
        if cursor.is_exhausted() {
            debug!("No records on {contig} in {label}");
        } else {
            cursors.push(cursor);
        }
    }

    if num_present == 0 {
        return Err(MergeError::ContigAbsentEverywhere { contig: contig.to_string() }.into());
    }

    info!("Merging {contig} from {} inputs...", cursors.len());
    let mut num_records = 0;
    for result in StreamMerger::new(cursors) {
        let record = result
            .with_context(|| format!("Error while merging {contig}:"))?;
        sink.write_record(&record)?;
        num_records += 1;
        progress.inc(1);
    }
    debug!("Wrote {num_records} records on {contig}.");

    Ok(num_records)
}
