
/// Lazy, position-sorted records for one contig of one input
pub type RecordIter<'a, R> = Box<dyn Iterator<Item = anyhow::Result<R>> + 'a>;

/// Outcome of asking an input for one contig.
/// A missing contig is an expected result and is kept apart from real failures, which come back as `Err`.
pub enum ContigFetch<'a, R> {
    /// The input has no data for this contig
    Absent,
    /// The input has the contig; records may still turn out to be empty
    Present(RecordIter<'a, R>)
}

impl<R> std::fmt::Debug for ContigFetch<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContigFetch::Absent => write!(f, "ContigFetch::Absent"),
            ContigFetch::Present(_) => write!(f, "ContigFetch::Present(..)")
        }
    }
}

/// An already-open input that can hand out sorted records one contig at a time.
pub trait RecordSource {
    /// The record type this input produces
    type Record;

    /// Printable name for logs and errors, usually the file path
    fn label(&self) -> String;

    /// All contigs this input has data for, in the input's own order
    fn contigs(&self) -> &[String];

    /// Opens the records for a contig.
    /// Each contig query is independent of the previous ones; the returned iterator borrows the input until it is dropped.
    /// # Arguments
    /// * `contig` - the contig to load
    /// # Errors
    /// * if the input fails for any reason other than the contig being absent
    fn fetch(&mut self, contig: &str) -> anyhow::Result<ContigFetch<'_, Self::Record>>;
}
