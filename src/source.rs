//! Sources of ping records
//!
//! A waterfall needs two full passes over the same records, so every
//! source must be able to start again from the beginning.
use crate::error::Result;
use crate::model::PingRecord;
use time::OffsetDateTime;

/// A rewindable stream of decoded ping records
pub trait PingSource {
    /// Decode the next record, or `None` at the end of the stream
    fn next_record(&mut self) -> Option<Result<PingRecord>>;

    /// Approximate number of records in the stream, for progress reporting
    fn estimated_record_count(&self) -> usize;

    /// Timestamp of the most recently decoded record
    fn current_timestamp(&self) -> Option<OffsetDateTime>;

    /// Return to the first record
    fn rewind(&mut self) -> Result<()>;
}

impl<S: PingSource + ?Sized> PingSource for &mut S {
    fn next_record(&mut self) -> Option<Result<PingRecord>> {
        (**self).next_record()
    }

    fn estimated_record_count(&self) -> usize {
        (**self).estimated_record_count()
    }

    fn current_timestamp(&self) -> Option<OffsetDateTime> {
        (**self).current_timestamp()
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

/// Records held in memory and replayed on every pass
///
/// Useful when the records are cheaper to keep than to decode twice.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<PingRecord>,
    cursor: usize,
}

impl MemorySource {
    /// Create a source over the given records
    pub fn new(records: Vec<PingRecord>) -> Self {
        MemorySource { records, cursor: 0 }
    }

    /// Drain another source into memory
    pub fn buffer<S: PingSource>(mut source: S) -> Result<Self> {
        let mut records = Vec::with_capacity(source.estimated_record_count());
        while let Some(rec) = source.next_record() {
            records.push(rec?);
        }
        Ok(MemorySource::new(records))
    }
}

impl PingSource for MemorySource {
    fn next_record(&mut self) -> Option<Result<PingRecord>> {
        let rec = self.records.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(Ok(rec))
    }

    fn estimated_record_count(&self) -> usize {
        self.records.len()
    }

    fn current_timestamp(&self) -> Option<OffsetDateTime> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.records.get(i))
            .and_then(PingRecord::timestamp)
    }

    fn rewind(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::Position;

    #[test]
    fn test_memory_source_rewind() {
        let t = OffsetDateTime::UNIX_EPOCH;
        let mut src = MemorySource::new(vec![
            PingRecord::Position(Position::new(t, 1.0, 2.0)),
            PingRecord::Unknown,
        ]);
        assert_eq!(src.current_timestamp(), None);
        assert!(src.next_record().is_some());
        assert_eq!(src.current_timestamp(), Some(t));
        assert!(src.next_record().is_some());
        assert!(src.next_record().is_none());

        src.rewind().unwrap();
        let first = src.next_record().unwrap().unwrap();
        assert!(matches!(first, PingRecord::Position(_)));
    }
}
