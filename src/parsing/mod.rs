/*!
# Parsing module
Contains the logic for opening inputs and pulling per-contig records out of them.
*/
/// The input seam used by the merge core
pub mod record_source;
/// Indexed VCF/BCF input backed by noodles
pub mod vcf_source;
/// In-memory input used by the unit tests
#[cfg(test)]
pub mod memory_source;
/// Writes small indexed VCFs for the unit tests
#[cfg(test)]
pub mod test_files;
