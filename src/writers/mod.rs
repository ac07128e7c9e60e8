/*!
# Writers module
Contains the logic for writing merged records out.
*/
/// Helper functions for indexing files
pub mod noodles_idx;
/// The output seam used by the merge driver
pub mod record_sink;
/// Writes merged records as VCF
pub mod vcf_sink;
