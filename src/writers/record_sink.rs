
/// Destination for merged records, written strictly in the order they are given.
pub trait RecordSink<R> {
    /// Appends one record to the output
    /// # Arguments
    /// * `record` - the next record in merged order
    fn write_record(&mut self, record: &R) -> anyhow::Result<()>;
}

/// Collects records in memory
impl<R: Clone> RecordSink<R> for Vec<R> {
    fn write_record(&mut self, record: &R) -> anyhow::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}
