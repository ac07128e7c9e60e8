
use anyhow::{anyhow, ensure, Context};
use noodles::vcf;
use std::cmp::Ordering;

/// Anything that can be sequenced by the stream merger.
/// Only these three fields are inspected; everything else about a record is carried along untouched.
pub trait MergeRecord {
    /// Position of the record within its contig, exactly as the input reported it
    fn position(&self) -> u64;
    /// The REF allele
    fn reference_allele(&self) -> &str;
    /// The first ALT allele, empty if there is none
    fn alternate_allele(&self) -> &str;
}

/// Orders two records by position, then REF, then ALT.
/// # Arguments
/// * `a` - the first record
/// * `b` - the second record
pub fn compare_records<R: MergeRecord>(a: &R, b: &R) -> Ordering {
    a.position().cmp(&b.position())
        .then_with(|| a.reference_allele().cmp(b.reference_allele()))
        .then_with(|| a.alternate_allele().cmp(b.alternate_allele()))
}

/// What gets written back out for a record
#[derive(Clone, Debug)]
pub enum RecordPayload {
    /// The VCF data line exactly as read, without the line terminator
    Text(String),
    /// A decoded record, for inputs that have no text form (BCF)
    Decoded(vcf::variant::RecordBuf)
}

/// A single VCF record pulled from an input, with its ordering fields cached up front.
#[derive(Clone, Debug)]
pub struct VariantRecord {
    /// CHROM
    contig: String,
    /// POS as stored in the file (1-based)
    position: u64,
    /// Cached REF
    reference_allele: String,
    /// Cached first ALT, empty when ALT is missing
    alternate_allele: String,
    /// The full record, only used when writing it back out
    payload: RecordPayload
}

impl VariantRecord {
    /// Wraps a raw VCF data line, reading only CHROM, POS, REF, and ALT out of it.
    /// The line itself is kept as-is for output.
    /// # Arguments
    /// * `line` - the tab-delimited data line, without the trailing newline
    /// # Errors
    /// * if the line has fewer than 5 columns
    /// * if POS is not an unsigned integer
    pub fn from_vcf_line(line: String) -> anyhow::Result<Self> {
        let mut fields = line.split('\t');
        let contig = fields.next().unwrap_or_default().to_string();
        let position = fields.next()
            .ok_or(anyhow!("Missing POS"))?;
        let position = position.parse::<u64>()
            .with_context(|| format!("Invalid POS {position:?}"))?;
        let reference_allele = fields.nth(1)
            .ok_or(anyhow!("Missing REF"))?
            .to_string();
        let alternate_allele = match fields.next().ok_or(anyhow!("Missing ALT"))? {
            "." => String::new(),
            alts => alts.split(',').next().unwrap_or_default().to_string()
        };
        ensure!(!contig.is_empty(), "Missing CHROM");

        Ok(Self {
            contig,
            position,
            reference_allele,
            alternate_allele,
            payload: RecordPayload::Text(line)
        })
    }

    /// Wraps a decoded record, pulling out the fields used for ordering.
    /// # Arguments
    /// * `record` - the fully parsed record from noodles
    /// # Errors
    /// * if the record does not have a POS
    pub fn from_record_buf(record: vcf::variant::RecordBuf) -> anyhow::Result<Self> {
        let position = record.variant_start()
            .ok_or(anyhow!("Missing POS"))?
            .get() as u64;
        let contig = record.reference_sequence_name().to_string();
        let reference_allele = record.reference_bases().to_string();
        let alternate_allele = record.alternate_bases().as_ref()
            .first()
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            contig,
            position,
            reference_allele,
            alternate_allele,
            payload: RecordPayload::Decoded(record)
        })
    }

    /// Decodes a record coming out of a binary noodles reader into our wrapper.
    /// # Arguments
    /// * `header` - the header of the file the record came from
    /// * `record` - the lazily parsed record
    pub fn from_variant_record(header: &vcf::Header, record: &dyn vcf::variant::Record) -> anyhow::Result<Self> {
        let record_buf = vcf::variant::RecordBuf::try_from_variant_record(header, record)
            .context("Error while parsing VCF record:")?;
        Self::from_record_buf(record_buf)
    }

    // getters
    pub fn payload(&self) -> &RecordPayload {
        &self.payload
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }
}

impl MergeRecord for VariantRecord {
    fn position(&self) -> u64 {
        self.position
    }

    fn reference_allele(&self) -> &str {
        &self.reference_allele
    }

    fn alternate_allele(&self) -> &str {
        &self.alternate_allele
    }
}
