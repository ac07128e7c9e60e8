
use anyhow::Context;
use log::debug;
use noodles::core::Region;
use noodles::core::region::Interval;
use noodles::csi::BinningIndex;
use noodles::csi::binning_index::index::reference_sequence::bin::Chunk;
use noodles::vcf;
use noodles_util::variant::io::IndexedReader as VcfReader;
use noodles_util::variant::io::indexed_reader::Builder as VcfBuilder;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::data_types::variant_record::VariantRecord;
use crate::parsing::record_source::{ContigFetch, RecordSource};

/// An indexed VCF (or BCF) input.
/// Requires a bgzipped file with a `.tbi` or `.csi` index next to it.
pub struct VcfSource {
    /// Where this input came from
    filename: PathBuf,
    /// Reader for the VCF file
    vcf_reader: VcfReader<noodles::bgzf::Reader<File>>,
    /// Header for the VCF file
    vcf_header: vcf::Header,
    /// Contigs with data in this file
    contigs: Vec<String>
}

impl VcfSource {
    /// Opens an indexed VCF and determines which contigs it has data for.
    /// Contigs come from the index when it records them, otherwise from the `##contig` header lines.
    /// # Arguments
    /// * `filename` - path to the bgzipped VCF or BCF
    /// # Errors
    /// * if the file or its index cannot be opened
    /// * if the header cannot be parsed
    pub fn open(filename: &Path) -> anyhow::Result<Self> {
        let mut vcf_reader = VcfBuilder::default()
            .build_from_path(filename)
            .with_context(|| format!("Error while opening {filename:?} (or associated index):"))?;
        let vcf_header = vcf_reader.read_header()
            .with_context(|| format!("Error while reading header of {filename:?}:"))?;

        let contigs = match read_index_contigs(filename)? {
            Some(contigs) => contigs,
            None => {
                debug!("No contig names in index for {filename:?}, using header contigs");
                vcf_header.contigs().keys().cloned().collect()
            }
        };
        debug!("Found {} contigs in {filename:?}", contigs.len());

        Ok(Self {
            filename: filename.to_owned(),
            vcf_reader,
            vcf_header,
            contigs
        })
    }

    // getters
    pub fn header(&self) -> &vcf::Header {
        &self.vcf_header
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }
}

impl RecordSource for VcfSource {
    type Record = VariantRecord;

    fn label(&self) -> String {
        format!("{:?}", self.filename)
    }

    fn contigs(&self) -> &[String] {
        &self.contigs
    }

    fn fetch(&mut self, contig: &str) -> anyhow::Result<ContigFetch<'_, VariantRecord>> {
        if !self.contigs.iter().any(|c| c == contig) {
            return Ok(ContigFetch::Absent);
        }

        let label = self.label();
        let vcf_header = &self.vcf_header;
        match &mut self.vcf_reader {
            VcfReader::Vcf(vcf_reader) => {
                // text VCF lines are handed through untouched, so we read them straight out of the indexed chunks
                let chunks = contig_chunks(vcf_reader.index(), vcf_header, contig)
                    .with_context(|| format!("Error while querying {contig} in {label}:"))?;
                let query = noodles::csi::io::Query::new(vcf_reader.get_mut(), chunks);

                let contig = contig.to_string();
                let records = query.lines().filter_map(move |result| {
                    let line = match result {
                        Ok(line) => line,
                        Err(e) => return Some(Err(anyhow::Error::new(e)
                            .context(format!("Error while reading {contig} in {label}:"))))
                    };
                    if line.is_empty() || line.starts_with('#') {
                        return None;
                    }
                    match VariantRecord::from_vcf_line(line) {
                        // chunks can spill into neighboring contigs
                        Ok(record) if record.contig() != contig => None,
                        result => Some(result.with_context(|| format!("Error while parsing record in {contig} of {label}:")))
                    }
                });
                Ok(ContigFetch::Present(Box::new(records)))
            },
            VcfReader::Bcf(bcf_reader) => {
                let region = Region::new(contig.to_string(), ..);
                let query = bcf_reader.query(vcf_header, &region)
                    .with_context(|| format!("Error while querying {region} in {label}:"))?;

                let records = query.map(move |result| {
                    let record = result
                        .with_context(|| format!("Error while reading {region} in {label}:"))?;
                    VariantRecord::from_variant_record(vcf_header, &record)
                        .with_context(|| format!("Error while parsing record in {region} of {label}:"))
                });
                Ok(ContigFetch::Present(Box::new(records)))
            }
        }
    }
}

/// Finds the chunks of a bgzipped file that hold a contig's records.
/// The contig is looked up by name in the index; indices without names are matched against the header `##contig` order.
/// A contig the index has no bins for yields no chunks.
/// # Arguments
/// * `index` - the tabix or CSI index of the file
/// * `vcf_header` - the parsed VCF header
/// * `contig` - the contig to look up
/// # Errors
/// * if the index cannot be queried
fn contig_chunks(index: &dyn BinningIndex, vcf_header: &vcf::Header, contig: &str) -> anyhow::Result<Vec<Chunk>> {
    let opt_id = match index.header() {
        Some(index_header) => index_header.reference_sequence_names().get_index_of(contig.as_bytes()),
        None => vcf_header.contigs().get_index_of(contig)
    };

    match opt_id {
        Some(id) if id < index.reference_sequences().count() => {
            Ok(index.query(id, Interval::from(..))?)
        },
        _ => Ok(vec![])
    }
}

/// Appends an extra extension to a path, e.g. `a.vcf.gz` -> `a.vcf.gz.tbi`
pub fn append_extension(filename: &Path, extension: &str) -> PathBuf {
    let mut full_fn = filename.to_owned().into_os_string();
    full_fn.push(".");
    full_fn.push(extension);
    PathBuf::from(full_fn)
}

/// Reads the contig names stored in the tabix or CSI index of a file.
/// Returns `None` if there is no index file we recognize or it does not store names.
/// # Arguments
/// * `filename` - the indexed data file, not the index itself
fn read_index_contigs(filename: &Path) -> anyhow::Result<Option<Vec<String>>> {
    let tbi_fn = append_extension(filename, "tbi");
    let csi_fn = append_extension(filename, "csi");

    let opt_header = if tbi_fn.exists() {
        let index = noodles::tabix::fs::read(&tbi_fn)
            .with_context(|| format!("Error while reading index {tbi_fn:?}:"))?;
        index.header().cloned()
    } else if csi_fn.exists() {
        let index = noodles::csi::fs::read(&csi_fn)
            .with_context(|| format!("Error while reading index {csi_fn:?}:"))?;
        index.header().cloned()
    } else {
        None
    };

    Ok(opt_header.map(|header| {
        header.reference_sequence_names().iter()
            .map(|name| name.to_string())
            .collect()
    }))
}
