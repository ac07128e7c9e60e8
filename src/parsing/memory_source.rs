
use indexmap::IndexMap;

use crate::data_types::variant_record::MergeRecord;
use crate::parsing::record_source::{ContigFetch, RecordSource};

/// Minimal record for exercising the merge core
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRecord {
    pub position: u64,
    pub reference: String,
    pub alternate: String,
    /// Tags where the record came from so tests can follow it through the merge
    pub tag: String
}

impl TestRecord {
    pub fn new(position: u64, reference: &str, alternate: &str, tag: &str) -> Self {
        Self {
            position,
            reference: reference.to_string(),
            alternate: alternate.to_string(),
            tag: tag.to_string()
        }
    }
}

impl MergeRecord for TestRecord {
    fn position(&self) -> u64 {
        self.position
    }

    fn reference_allele(&self) -> &str {
        &self.reference
    }

    fn alternate_allele(&self) -> &str {
        &self.alternate
    }
}

/// In-memory input; a contig can be configured to fail after a number of records
#[derive(Default)]
pub struct MemorySource {
    label: String,
    contigs: Vec<String>,
    records: IndexMap<String, Vec<TestRecord>>,
    fail_after: IndexMap<String, usize>,
    /// Number of `fetch` calls, to check each contig is only opened once
    pub fetch_count: usize
}

impl MemorySource {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }

    pub fn with_contig(mut self, contig: &str, records: Vec<TestRecord>) -> Self {
        self.contigs.push(contig.to_string());
        self.records.insert(contig.to_string(), records);
        self
    }

    /// Lists the contig without having any data behind it, so `fetch` reports it absent
    pub fn with_listed_contig(mut self, contig: &str) -> Self {
        self.contigs.push(contig.to_string());
        self
    }

    /// Yields `count` records from the contig and then an error
    pub fn with_failure(mut self, contig: &str, count: usize) -> Self {
        self.fail_after.insert(contig.to_string(), count);
        self
    }
}

impl RecordSource for MemorySource {
    type Record = TestRecord;

    fn label(&self) -> String {
        self.label.clone()
    }

    fn contigs(&self) -> &[String] {
        &self.contigs
    }

    fn fetch(&mut self, contig: &str) -> anyhow::Result<ContigFetch<'_, TestRecord>> {
        self.fetch_count += 1;
        let Some(records) = self.records.get(contig) else {
            return Ok(ContigFetch::Absent);
        };

        let label = self.label.clone();
        let iter: Box<dyn Iterator<Item = anyhow::Result<TestRecord>>> = match self.fail_after.get(contig) {
            Some(&count) => Box::new(
                records.clone().into_iter()
                    .take(count)
                    .map(Ok)
                    .chain(std::iter::once(Err(anyhow::anyhow!("simulated read failure in {label}"))))
            ),
            None => Box::new(records.clone().into_iter().map(Ok))
        };
        Ok(ContigFetch::Present(iter))
    }
}
