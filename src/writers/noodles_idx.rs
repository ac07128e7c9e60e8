
use std::path::Path;

use crate::parsing::vcf_source::append_extension;

/// Wrapper that indexes a bgzipped VCF file using noodles indexer, generating a .tbi file.
/// # Arguments
/// * `vcf_fn` - the filename to index
/// # Errors
/// * if the file is not bgzipped or the records are not sorted
pub fn index_vcf(vcf_fn: &Path) -> anyhow::Result<()> {
    // first, build the index
    let index = noodles::vcf::fs::index(vcf_fn)?;

    // write the index out next to the file
    let tbi_fn = append_extension(vcf_fn, "tbi");
    noodles::tabix::fs::write(&tbi_fn, &index)?;

    Ok(())
}
