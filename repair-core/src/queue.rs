//! Daily repair queue
//!
//! An ordered list of repair requests with a "now servicing" cursor. The
//! cursor is an index into the entry list; an index equal to the number of
//! entries is the end sentinel, meaning there is no more work for the day.
//!
//! Reading at the end sentinel yields `None`. Advancing past it is a
//! contract violation and panics: callers check [`RepairQueue::is_exhausted`]
//! before moving on.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::domain::repair::Repair;
use crate::error::{IngestError, LoadError, QueueError};
use crate::source::{self, RecordFormat};

/// Where a new request goes relative to the one being serviced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Priority customer: served next, ahead of the current request
    BeforeCursor,
    /// Loyal customer: served right after the current request
    AfterCursor,
}

/// Ordered repair requests for one day plus the servicing cursor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairQueue {
    entries: Vec<Repair>,
    cursor: usize,
}

impl RepairQueue {
    /// Creates an empty queue, cursor at the end sentinel
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a day's queue from a file, picking the format from its extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let mut queue = Self::new();
        queue.load_from_path(path, RecordFormat::from_path(path))?;
        Ok(queue)
    }

    /// Number of requests in the queue, serviced or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The request now being serviced, `None` once the day's work is done
    pub fn current(&self) -> Option<&Repair> {
        self.entries.get(self.cursor)
    }

    /// Owned copy of the request now being serviced
    pub fn current_cloned(&self) -> Option<Repair> {
        self.current().cloned()
    }

    /// True when the cursor sits on the end sentinel
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// 1-indexed position of the current request, `None` when exhausted
    pub fn position(&self) -> Option<usize> {
        (!self.is_exhausted()).then_some(self.cursor + 1)
    }

    /// Requests still to be serviced, current one first
    pub fn remaining(&self) -> &[Repair] {
        &self.entries[self.cursor.min(self.entries.len())..]
    }

    /// Marks the current request as serviced and moves to the next one
    ///
    /// After the last request the cursor lands on the end sentinel.
    ///
    /// # Panics
    /// Panics if the queue is already exhausted.
    pub fn advance(&mut self) {
        assert!(
            !self.is_exhausted(),
            "advance() called on an exhausted repair queue ({} entries)",
            self.entries.len()
        );
        self.cursor += 1;
        debug!(position = self.cursor, len = self.entries.len(), "advanced cursor");
    }

    /// Adds a request to the end of the day
    ///
    /// The cursor index is untouched, so on an exhausted queue the new
    /// request becomes the current one.
    pub fn append(&mut self, repair: Repair) {
        debug!(vehicle = repair.vehicle(), "appending repair");
        self.entries.push(repair);
    }

    /// Inserts a request around the cursor
    ///
    /// - [`Placement::AfterCursor`] keeps the cursor on the request being
    ///   serviced; the new one follows it.
    /// - [`Placement::BeforeCursor`] re-anchors the cursor on the new
    ///   request; the previous one follows it.
    ///
    /// On an exhausted queue both placements append, and the new request
    /// becomes current.
    pub fn insert(&mut self, repair: Repair, placement: Placement) {
        let index = match placement {
            Placement::BeforeCursor => self.cursor,
            Placement::AfterCursor if self.is_exhausted() => self.cursor,
            Placement::AfterCursor => self.cursor + 1,
        };
        debug!(vehicle = repair.vehicle(), ?placement, index, "inserting repair");
        // Cursor index stays put for every placement.
        self.entries.insert(index, repair);
    }

    /// Loyal customer: served right after the request in progress
    pub fn insert_loyal(&mut self, repair: Repair) {
        self.insert(repair, Placement::AfterCursor);
    }

    /// Priority customer: served immediately, ahead of the request in progress
    pub fn insert_priority(&mut self, repair: Repair) {
        self.insert(repair, Placement::BeforeCursor);
    }

    /// The request at 1-indexed `position` in the full day's list
    pub fn get(&self, position: usize) -> Result<&Repair, QueueError> {
        position
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .ok_or(QueueError::OutOfRange {
                position,
                len: self.entries.len(),
            })
    }

    /// Vehicle at 1-indexed `position`, regardless of the cursor
    pub fn vehicle_at(&self, position: usize) -> Result<&str, QueueError> {
        self.get(position).map(Repair::vehicle)
    }

    /// Highest cost of the day, `0.0` for an empty queue
    pub fn max_cost(&self) -> f64 {
        self.entries.iter().map(Repair::cost).fold(0.0, f64::max)
    }

    /// Sum of all costs of the day
    pub fn total_cost(&self) -> f64 {
        self.entries.iter().map(Repair::cost).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Repair> {
        self.entries.iter()
    }

    /// Replaces the queue with the records of a file
    ///
    /// The whole file is decoded before anything changes; on error the
    /// queue is left as it was. The file is closed before returning.
    pub fn load_from_path(
        &mut self,
        path: impl AsRef<Path>,
        format: RecordFormat,
    ) -> Result<(), LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
        let records = source::read_records(BufReader::new(file), format).map_err(|e| match e {
            LoadError::Io { source, .. } => LoadError::io(path, source),
            other => other,
        })?;
        self.replace(records);
        info!(path = %path.display(), count = self.entries.len(), "loaded repair queue");
        Ok(())
    }

    /// Replaces the queue with the records of a reader
    pub fn load_from_reader<R: BufRead>(
        &mut self,
        reader: R,
        format: RecordFormat,
    ) -> Result<(), LoadError> {
        let records = source::read_records(reader, format)?;
        self.replace(records);
        info!(count = self.entries.len(), "loaded repair queue");
        Ok(())
    }

    /// Appends text records from an open stream until end-of-stream
    ///
    /// Returns the number of records appended. Unlike the `load_*` methods
    /// this keeps whatever was read before a failure: the error reports how
    /// many records made it in.
    pub fn extend_from_reader<R: BufRead>(&mut self, reader: R) -> Result<usize, IngestError> {
        let mut appended = 0;
        for (index, line) in reader.lines().enumerate() {
            let parsed = line
                .map_err(|e| source::line_error(index + 1, e))
                .and_then(|line| source::parse_line(index + 1, &line));
            match parsed {
                Ok(Some(repair)) => {
                    self.append(repair);
                    appended += 1;
                }
                Ok(None) => {}
                Err(err) => return Err(IngestError { appended, source: err }),
            }
        }
        Ok(appended)
    }

    fn replace(&mut self, records: Vec<Repair>) {
        self.entries = records;
        self.cursor = 0;
    }
}

impl FromIterator<Repair> for RepairQueue {
    fn from_iter<I: IntoIterator<Item = Repair>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl Extend<Repair> for RepairQueue {
    fn extend<I: IntoIterator<Item = Repair>>(&mut self, iter: I) {
        for repair in iter {
            self.append(repair);
        }
    }
}

impl<'a> IntoIterator for &'a RepairQueue {
    type Item = &'a Repair;
    type IntoIter = std::slice::Iter<'a, Repair>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One request per line, in service order, regardless of the cursor
impl fmt::Display for RepairQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for repair in &self.entries {
            writeln!(f, "{repair}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    fn repair(vehicle: &str, cost: f64) -> Repair {
        Repair::new(vehicle, cost).unwrap()
    }

    fn sample() -> RepairQueue {
        let mut queue = RepairQueue::new();
        queue
            .load_from_reader(
                Cursor::new("ABC123 120.0\nXYZ999 75.50\n"),
                RecordFormat::Text,
            )
            .unwrap();
        queue
    }

    fn vehicles(queue: &RepairQueue) -> Vec<&str> {
        queue.iter().map(Repair::vehicle).collect()
    }

    #[test]
    fn test_worked_example() {
        let mut queue = sample();
        assert_eq!(queue.current(), Some(&repair("ABC123", 120.0)));
        assert_eq!(queue.max_cost(), 120.0);
        assert_eq!(queue.vehicle_at(2), Ok("XYZ999"));

        queue.insert_priority(repair("PRI001", 40.0));
        assert_eq!(queue.current(), Some(&repair("PRI001", 40.0)));

        queue.advance();
        assert_eq!(queue.current(), Some(&repair("ABC123", 120.0)));
    }

    #[test]
    fn test_empty_queue() {
        let queue = RepairQueue::new();
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
        assert!(queue.is_exhausted());
        assert_eq!(queue.current(), None);
        assert_eq!(queue.position(), None);
        assert_eq!(queue.max_cost(), 0.0);
        assert_eq!(
            queue.vehicle_at(1),
            Err(QueueError::OutOfRange { position: 1, len: 0 })
        );
    }

    #[test]
    fn test_append_on_fresh_queue_becomes_current() {
        let mut queue = RepairQueue::new();
        queue.append(repair("A1", 1.0));
        queue.append(repair("B2", 2.0));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.current().map(Repair::vehicle), Some("A1"));
        assert_eq!(vehicles(&queue), vec!["A1", "B2"]);
    }

    #[test]
    fn test_append_does_not_move_cursor() {
        let mut queue = sample();
        queue.advance();
        queue.append(repair("LATE1", 10.0));
        assert_eq!(queue.current().map(Repair::vehicle), Some("XYZ999"));
        assert_eq!(queue.position(), Some(2));
    }

    #[test]
    fn test_advance_to_last_then_end_sentinel() {
        let mut queue = sample();
        queue.advance();
        assert_eq!(queue.current().map(Repair::vehicle), Some("XYZ999"));
        assert!(!queue.is_exhausted());

        queue.advance();
        assert!(queue.is_exhausted());
        assert_eq!(queue.current(), None);
        assert_eq!(queue.current_cloned(), None);
        assert!(queue.remaining().is_empty());
    }

    #[test]
    #[should_panic(expected = "exhausted repair queue")]
    fn test_advance_past_end_panics() {
        let mut queue = sample();
        queue.advance();
        queue.advance();
        queue.advance();
    }

    #[test]
    #[should_panic(expected = "exhausted repair queue")]
    fn test_advance_empty_panics() {
        RepairQueue::new().advance();
    }

    #[test]
    fn test_insert_loyal_keeps_current() {
        let mut queue = sample();
        let before = queue.current_cloned();
        queue.insert_loyal(repair("LOY001", 55.0));
        assert_eq!(queue.current_cloned(), before);
        assert_eq!(vehicles(&queue), vec!["ABC123", "LOY001", "XYZ999"]);

        queue.advance();
        assert_eq!(queue.current().map(Repair::vehicle), Some("LOY001"));
        queue.advance();
        assert_eq!(queue.current().map(Repair::vehicle), Some("XYZ999"));
    }

    #[test]
    fn test_insert_loyal_on_last_entry() {
        let mut queue = sample();
        queue.advance();
        queue.insert_loyal(repair("LOY001", 55.0));
        assert_eq!(queue.current().map(Repair::vehicle), Some("XYZ999"));
        queue.advance();
        assert_eq!(queue.current().map(Repair::vehicle), Some("LOY001"));
        queue.advance();
        assert!(queue.is_exhausted());
    }

    #[test]
    fn test_insert_loyal_when_exhausted_becomes_next() {
        let mut queue = sample();
        queue.advance();
        queue.advance();
        queue.insert_loyal(repair("LOY001", 55.0));
        assert_eq!(vehicles(&queue), vec!["ABC123", "XYZ999", "LOY001"]);
        assert_eq!(queue.current().map(Repair::vehicle), Some("LOY001"));
        assert_eq!(queue.position(), Some(3));
    }

    #[test]
    fn test_insert_priority_bumps_current() {
        let mut queue = sample();
        queue.advance();
        queue.insert_priority(repair("PRI001", 40.0));
        assert_eq!(vehicles(&queue), vec!["ABC123", "PRI001", "XYZ999"]);
        assert_eq!(queue.current().map(Repair::vehicle), Some("PRI001"));
        queue.advance();
        assert_eq!(queue.current().map(Repair::vehicle), Some("XYZ999"));
    }

    #[test]
    fn test_insert_priority_on_empty_queue() {
        let mut queue = RepairQueue::new();
        queue.insert_priority(repair("PRI001", 40.0));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current(), Some(&repair("PRI001", 40.0)));
    }

    #[test]
    fn test_insert_placement_variants_match_shortcuts() {
        let mut a = sample();
        let mut b = sample();
        a.insert(repair("N1", 1.0), Placement::AfterCursor);
        b.insert_loyal(repair("N1", 1.0));
        assert_eq!(a, b);

        a.insert(repair("N2", 2.0), Placement::BeforeCursor);
        b.insert_priority(repair("N2", 2.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_vehicle_at_bounds() {
        let queue = sample();
        assert_eq!(queue.vehicle_at(1), Ok("ABC123"));
        assert_eq!(
            queue.vehicle_at(0),
            Err(QueueError::OutOfRange { position: 0, len: 2 })
        );
        assert_eq!(
            queue.vehicle_at(3),
            Err(QueueError::OutOfRange { position: 3, len: 2 })
        );
    }

    #[test]
    fn test_vehicle_at_ignores_cursor() {
        let mut queue = sample();
        queue.advance();
        assert_eq!(queue.vehicle_at(1), Ok("ABC123"));
        assert_eq!(queue.position(), Some(2));
    }

    #[test]
    fn test_max_cost_leaves_cursor() {
        let mut queue = sample();
        queue.advance();
        assert_eq!(queue.max_cost(), 120.0);
        assert_eq!(queue.max_cost(), 120.0);
        assert_eq!(queue.current().map(Repair::vehicle), Some("XYZ999"));
    }

    #[test]
    fn test_total_cost() {
        assert_eq!(sample().total_cost(), 195.5);
        assert_eq!(RepairQueue::new().total_cost(), 0.0);
    }

    #[test]
    fn test_load_resets_prior_state() {
        let mut queue = sample();
        queue.advance();
        queue
            .load_from_reader(Cursor::new("NEW1 5\n"), RecordFormat::Text)
            .unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.position(), Some(1));
    }

    #[test]
    fn test_load_empty_source_is_exhausted() {
        let mut queue = sample();
        queue
            .load_from_reader(Cursor::new("# nothing today\n"), RecordFormat::Text)
            .unwrap();
        assert!(queue.is_empty());
        assert!(queue.is_exhausted());
    }

    #[test]
    fn test_failed_load_leaves_queue_untouched() {
        let mut queue = sample();
        queue.advance();
        let snapshot = queue.clone();

        let err = queue
            .load_from_reader(Cursor::new("NEW1 5\nBROKEN\n"), RecordFormat::Text)
            .unwrap_err();
        assert!(matches!(err, LoadError::Malformed { line: 2, .. }));
        assert_eq!(queue, snapshot);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monday.txt");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "ABC123 120.0").unwrap();
        writeln!(file, "XYZ999 75.50").unwrap();
        drop(file);

        let queue = RepairQueue::from_path(&path).unwrap();
        assert_eq!(queue, sample());
    }

    #[test]
    fn test_load_from_json_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monday.json");
        std::fs::write(
            &path,
            r#"[{"vehicle":"ABC123","cost":120.0},{"vehicle":"XYZ999","cost":75.5}]"#,
        )
        .unwrap();

        let queue = RepairQueue::from_path(&path).unwrap();
        assert_eq!(queue, sample());
    }

    #[test]
    fn test_failed_json_load_leaves_queue_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monday.json");
        std::fs::write(
            &path,
            r#"[{"vehicle":"NEW1","cost":5.0},{"vehicle":"NEW2","cost":-5.0}]"#,
        )
        .unwrap();

        let mut queue = sample();
        queue.advance();
        let snapshot = queue.clone();

        let err = queue.load_from_path(&path, RecordFormat::Json).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRecord { index: 2, .. }));
        assert_eq!(queue, snapshot);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let mut queue = sample();

        let err = queue.load_from_path(&path, RecordFormat::Text).unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("missing.txt"));
        assert_eq!(queue, sample());
    }

    #[test]
    fn test_extend_from_reader() {
        let mut queue = sample();
        let appended = queue
            .extend_from_reader(Cursor::new("NEW1 5\n\nNEW2 6\n"))
            .unwrap();
        assert_eq!(appended, 2);
        assert_eq!(vehicles(&queue), vec!["ABC123", "XYZ999", "NEW1", "NEW2"]);
        assert_eq!(queue.position(), Some(1));
    }

    #[test]
    fn test_extend_from_reader_keeps_partial() {
        let mut queue = RepairQueue::new();
        let err = queue
            .extend_from_reader(Cursor::new("NEW1 5\nNEW2 6\nNEW3"))
            .unwrap_err();
        assert_eq!(err.appended, 2);
        assert!(matches!(err.source, LoadError::Malformed { line: 3, .. }));
        assert_eq!(vehicles(&queue), vec!["NEW1", "NEW2"]);
    }

    #[test]
    fn test_extend_from_reader_invalid_utf8() {
        let mut queue = RepairQueue::new();
        let input: &[u8] = b"NEW1 5\nNEW2 6\nN\xffW3 7\nNEW4 8\n";
        let err = queue.extend_from_reader(Cursor::new(input)).unwrap_err();
        assert_eq!(err.appended, 2);
        assert!(matches!(err.source, LoadError::Malformed { line: 3, .. }));
        assert!(!err.source.is_unavailable());
        assert_eq!(vehicles(&queue), vec!["NEW1", "NEW2"]);
    }

    #[test]
    fn test_display_lists_all_entries() {
        let mut queue = sample();
        queue.advance();
        queue.advance();
        assert_eq!(
            queue.to_string(),
            "ABC123     120.00\nXYZ999      75.50\n"
        );
        assert_eq!(RepairQueue::new().to_string(), "");
    }

    #[test]
    fn test_from_iterator_and_extend() {
        let mut queue: RepairQueue = vec![repair("A1", 1.0), repair("B2", 2.0)]
            .into_iter()
            .collect();
        assert_eq!(queue.current().map(Repair::vehicle), Some("A1"));

        queue.extend([repair("C3", 3.0)]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.remaining().len(), 3);
    }
}
