
use anyhow::Context;
use log::{debug, info};
use noodles::bgzf;
use noodles::vcf;
use noodles::vcf::variant::io::Write as VariantWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::data_types::variant_record::{MergeRecord, RecordPayload, VariantRecord};
use crate::writers::record_sink::RecordSink;

/// Header key for the version that wrote the file
pub const HEADER_KEY_VERSION: &str = "vcfweave_version";
/// Header key for the command line that wrote the file
pub const HEADER_KEY_COMMAND: &str = "vcfweave_command";

/// Where the merged VCF ends up
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    /// Uncompressed VCF on stdout
    Stdout,
    /// Uncompressed VCF file
    Plain(PathBuf),
    /// BGZF compressed VCF file, which can be indexed afterwards
    Bgzf(PathBuf)
}

impl OutputTarget {
    /// Picks the target from an optional output path; missing or "-" means stdout.
    /// # Arguments
    /// * `opt_filename` - the user provided output path
    pub fn from_path(opt_filename: Option<&Path>) -> Self {
        match opt_filename {
            None => OutputTarget::Stdout,
            Some(filename) if filename == Path::new("-") => OutputTarget::Stdout,
            Some(filename) => {
                let is_compressed = match filename.extension() {
                    Some(extension) => extension == "gz",
                    None => false
                };
                if is_compressed {
                    OutputTarget::Bgzf(filename.to_owned())
                } else {
                    OutputTarget::Plain(filename.to_owned())
                }
            }
        }
    }
}

/// Copies the header of the primary input and tags it with the version and command line that produced the merge.
/// Headers of the other inputs are not checked against it.
/// # Arguments
/// * `primary_header` - header of the first input
pub fn build_output_header(primary_header: &vcf::Header) -> anyhow::Result<vcf::Header> {
    let mut vcf_header = primary_header.clone();

    let ver: &str = crate::cli::core::FULL_VERSION.as_str(); // clippy gets weird about direct access
    let cli_version = format!("\"{ver}\"");
    let cli_string = format!("\"{}\"", std::env::args().collect::<Vec<String>>().join(" "));
    vcf_header.insert(HEADER_KEY_VERSION.parse()?, vcf::header::record::Value::from(cli_version))?;
    vcf_header.insert(HEADER_KEY_COMMAND.parse()?, vcf::header::record::Value::from(cli_string))?;
    Ok(vcf_header)
}

/// The byte stream under the VCF writer, kept typed so each kind can be finalized properly
pub enum OutputWriter {
    Stdout(BufWriter<std::io::Stdout>),
    Plain(BufWriter<File>),
    Bgzf(bgzf::io::MultithreadedWriter<File>)
}

impl OutputWriter {
    /// Opens the stream for a target.
    /// # Arguments
    /// * `target` - where to write
    /// * `threads` - compression workers for BGZF output
    fn open(target: &OutputTarget, threads: usize) -> anyhow::Result<Self> {
        let writer = match target {
            OutputTarget::Stdout => {
                debug!("Writing merged VCF to stdout...");
                OutputWriter::Stdout(BufWriter::new(std::io::stdout()))
            },
            OutputTarget::Plain(filename) => {
                debug!("Opening {filename:?} for writing...");
                let file = File::create(filename)
                    .with_context(|| format!("Error while creating {filename:?}:"))?;
                OutputWriter::Plain(BufWriter::new(file))
            },
            OutputTarget::Bgzf(filename) => {
                debug!("Opening {filename:?} for writing...");
                let file = File::create(filename)
                    .with_context(|| format!("Error while creating {filename:?}:"))?;
                let w_threads = std::num::NonZeroUsize::new(threads.clamp(1, 4)).unwrap_or(std::num::NonZeroUsize::MIN);
                OutputWriter::Bgzf(bgzf::io::MultithreadedWriter::with_worker_count(w_threads, file))
            }
        };
        Ok(writer)
    }

    /// Flushes all buffered data; BGZF output also gets its final blocks and EOF marker written.
    /// # Errors
    /// * if any of the final writes fail
    pub fn finish(self) -> std::io::Result<()> {
        match self {
            OutputWriter::Stdout(mut writer) => writer.flush(),
            OutputWriter::Plain(mut writer) => writer.flush(),
            OutputWriter::Bgzf(mut writer) => {
                let mut file = writer.finish()?;
                file.flush()
            }
        }
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            OutputWriter::Stdout(writer) => writer.write(buf),
            OutputWriter::Plain(writer) => writer.write(buf),
            OutputWriter::Bgzf(writer) => writer.write(buf)
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            OutputWriter::Stdout(writer) => writer.flush(),
            OutputWriter::Plain(writer) => writer.flush(),
            OutputWriter::Bgzf(writer) => writer.flush()
        }
    }
}

/// Writes merged records as VCF text, either to stdout or a file.
pub struct VcfSink {
    /// Header written at the top of the output, also used to encode decoded records
    vcf_header: vcf::Header,
    /// Writer for the merged output
    vcf_writer: vcf::io::Writer<OutputWriter>,
    /// Where the writer goes
    target: OutputTarget
}

impl VcfSink {
    /// Opens the output and writes the header.
    /// # Arguments
    /// * `vcf_header` - the header for the output
    /// * `target` - where to write
    /// * `threads` - compression workers for BGZF output
    pub fn new(vcf_header: vcf::Header, target: OutputTarget, threads: usize) -> anyhow::Result<Self> {
        let inner = OutputWriter::open(&target, threads)?;
        let mut vcf_writer = vcf::io::Writer::new(inner);
        vcf_writer.write_header(&vcf_header)
            .context("Error while writing VCF header:")?;

        Ok(Self {
            vcf_header,
            vcf_writer,
            target
        })
    }

    /// Flushes everything and finalizes the output, consuming the sink.
    /// BGZF output is indexed afterwards if requested.
    /// # Arguments
    /// * `index_output` - if true, writes a .tbi next to BGZF output
    /// # Errors
    /// * if flushing or finalizing the output fails
    /// * if the noodles indexing fails
    pub fn finish(self, index_output: bool) -> anyhow::Result<()> {
        let VcfSink { vcf_writer, target, .. } = self;
        vcf_writer.into_inner().finish()
            .context("Error while finalizing merged VCF:")?;

        if let OutputTarget::Bgzf(filename) = target {
            if index_output {
                info!("Generating index for {filename:?}...");
                crate::writers::noodles_idx::index_vcf(&filename)
                    .with_context(|| format!("Error while writing index for {filename:?}"))?;
            }
        }
        Ok(())
    }

    // getters
    pub fn target(&self) -> &OutputTarget {
        &self.target
    }
}

impl RecordSink<VariantRecord> for VcfSink {
    fn write_record(&mut self, record: &VariantRecord) -> anyhow::Result<()> {
        let result = match record.payload() {
            RecordPayload::Text(line) => {
                let writer = self.vcf_writer.get_mut();
                writer.write_all(line.as_bytes())
                    .and_then(|()| writer.write_all(b"\n"))
            },
            RecordPayload::Decoded(record_buf) => {
                self.vcf_writer.write_variant_record(&self.vcf_header, record_buf)
            }
        };
        result.with_context(|| format!("Error while writing record at {}:{}", record.contig(), record.position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressBar;

    use crate::merge_driver::merge_sources;
    use crate::parsing::record_source::{ContigFetch, RecordSource};
    use crate::parsing::test_files::{write_indexed_vcf, write_indexed_vcf_lines};
    use crate::parsing::vcf_source::{append_extension, VcfSource};

    fn open_test_inputs(folder: &Path) -> Vec<VcfSource> {
        let inputs = [
            write_indexed_vcf(folder, "a.vcf.gz", &[
                ("chr1", 5, "A", "C"),
                ("chr1", 10, "G", "T"),
                ("chr1", 15, "C", "G"),
            ]),
            write_indexed_vcf(folder, "b.vcf.gz", &[
                ("chr1", 7, "T", "A"),
                ("chr1", 10, "A", "C"),
                ("chr1", 20, "G", "C"),
                ("chr2", 1, "A", "T"),
            ]),
            write_indexed_vcf(folder, "c.vcf.gz", &[
                ("chr1", 10, "T", "G"),
            ]),
        ];
        inputs.iter()
            .map(|p| VcfSource::open(p).unwrap())
            .collect()
    }

    #[test]
    fn test_output_target() {
        assert_eq!(OutputTarget::from_path(None), OutputTarget::Stdout);
        assert_eq!(OutputTarget::from_path(Some(Path::new("-"))), OutputTarget::Stdout);
        assert_eq!(
            OutputTarget::from_path(Some(Path::new("out.vcf"))),
            OutputTarget::Plain(PathBuf::from("out.vcf"))
        );
        assert_eq!(
            OutputTarget::from_path(Some(Path::new("out.vcf.gz"))),
            OutputTarget::Bgzf(PathBuf::from("out.vcf.gz"))
        );
    }

    #[test]
    fn test_output_header() {
        let header = vcf::Header::default();
        let out_header = build_output_header(&header).unwrap();

        let mut writer = vcf::io::Writer::new(Vec::new());
        writer.write_header(&out_header).unwrap();
        let text = String::from_utf8(writer.get_ref().clone()).unwrap();
        assert!(text.contains(&format!("##{HEADER_KEY_VERSION}=")));
        assert!(text.contains(&format!("##{HEADER_KEY_COMMAND}=")));
        // the input header is left alone
        assert!(header.other_records().is_empty());
    }

    #[test]
    fn test_merge_to_plain_vcf() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut sources = open_test_inputs(temp_dir.path());

        let out_fn = temp_dir.path().join("merged.vcf");
        let out_header = build_output_header(sources[0].header()).unwrap();
        let mut sink = VcfSink::new(out_header, OutputTarget::Plain(out_fn.clone()), 1).unwrap();
        let summary = merge_sources(&mut sources, &mut sink, &ProgressBar::hidden()).unwrap();
        sink.finish(true).unwrap();
        assert_eq!(summary.records_written(), 8);

        let text = std::fs::read_to_string(&out_fn).unwrap();
        assert!(text.starts_with("##fileformat=VCFv4.3"));
        assert!(text.contains(&format!("##{HEADER_KEY_VERSION}=")));

        let records: Vec<(&str, &str, &str)> = text.lines()
            .filter(|l| !l.starts_with('#'))
            .map(|l| {
                let columns: Vec<&str> = l.split('\t').collect();
                (columns[0], columns[1], columns[3])
            })
            .collect();
        assert_eq!(records, vec![
            ("chr1", "5", "A"),
            ("chr1", "7", "T"),
            ("chr1", "10", "A"),
            ("chr1", "10", "G"),
            ("chr1", "10", "T"),
            ("chr1", "15", "C"),
            ("chr1", "20", "G"),
            ("chr2", "1", "A"),
        ]);

        // plain output never gets an index
        assert!(!append_extension(&out_fn, "tbi").exists());
    }

    #[test]
    fn test_merge_to_bgzf_vcf() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut sources = open_test_inputs(temp_dir.path());

        let out_fn = temp_dir.path().join("merged.vcf.gz");
        let out_header = build_output_header(sources[0].header()).unwrap();
        let mut sink = VcfSink::new(out_header, OutputTarget::from_path(Some(&out_fn)), 2).unwrap();
        assert_eq!(sink.target(), &OutputTarget::Bgzf(out_fn.clone()));
        merge_sources(&mut sources, &mut sink, &ProgressBar::hidden()).unwrap();
        sink.finish(true).unwrap();
        assert!(append_extension(&out_fn, "tbi").exists());

        // the merged output is itself a valid, indexed input
        let mut merged = VcfSource::open(&out_fn).unwrap();
        assert_eq!(merged.contigs(), &["chr1".to_string(), "chr2".to_string()]);
        let positions: Vec<u64> = match merged.fetch("chr1").unwrap() {
            ContigFetch::Present(iter) => iter.map(|r| r.unwrap().position()).collect(),
            ContigFetch::Absent => panic!("chr1 should be present")
        };
        assert_eq!(positions, vec![5, 7, 10, 10, 10, 15, 20]);
    }

    #[test]
    fn test_merge_keeps_lines_verbatim() {
        let temp_dir = tempfile::tempdir().unwrap();
        let a_lines = [
            "chr1\t5\trs1\tA\tC\t29.50\tPASS\tAF=0.100",
            "chr1\t12\t.\tT\tTA,TAA\t.\tlowq\tAF=0.5,0.25",
        ];
        let b_lines = [
            "chr1\t9\trs2\tG\tA\t7\tPASS\tAF=0.123456789",
            "chr2\t1\t.\tC\t.\t1000.0\t.\t.",
        ];
        let mut sources: Vec<VcfSource> = [
            write_indexed_vcf_lines(temp_dir.path(), "a.vcf.gz", &a_lines),
            write_indexed_vcf_lines(temp_dir.path(), "b.vcf.gz", &b_lines),
        ].iter()
            .map(|p| VcfSource::open(p).unwrap())
            .collect();

        let out_fn = temp_dir.path().join("merged.vcf");
        let out_header = build_output_header(sources[0].header()).unwrap();
        let mut sink = VcfSink::new(out_header, OutputTarget::Plain(out_fn.clone()), 1).unwrap();
        merge_sources(&mut sources, &mut sink, &ProgressBar::hidden()).unwrap();
        sink.finish(false).unwrap();

        let text = std::fs::read_to_string(&out_fn).unwrap();
        let data_lines: Vec<&str> = text.lines()
            .filter(|l| !l.starts_with('#'))
            .collect();
        assert_eq!(data_lines, vec![a_lines[0], b_lines[0], a_lines[1], b_lines[1]]);
    }

    #[test]
    fn test_finish_finalizes_bgzf() {
        // the empty block every BGZF file has to end with
        const BGZF_EOF: [u8; 28] = [
            0x1f, 0x8b, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x06, 0x00, 0x42, 0x43,
            0x02, 0x00, 0x1b, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let temp_dir = tempfile::tempdir().unwrap();
        let out_fn = temp_dir.path().join("empty.vcf.gz");
        let sink = VcfSink::new(vcf::Header::default(), OutputTarget::Bgzf(out_fn.clone()), 2).unwrap();
        sink.finish(false).unwrap();

        let bytes = std::fs::read(&out_fn).unwrap();
        assert!(bytes.len() > BGZF_EOF.len());
        assert!(bytes.ends_with(&BGZF_EOF));
        assert!(!append_extension(&out_fn, "tbi").exists());
    }

    #[test]
    fn test_output_writer_finish() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out_fn = temp_dir.path().join("raw.txt");
        let mut writer = OutputWriter::open(&OutputTarget::Plain(out_fn.clone()), 1).unwrap();
        writer.write_all(b"buffered").unwrap();
        writer.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&out_fn).unwrap(), "buffered");
    }
}
