use shared_types::{CandidateContact, ImportError};

pub const MIN_BATCH_SIZE: usize = 10;
pub const MAX_BATCH_SIZE: usize = 500;
pub const MAX_THREADS: usize = 16;

/// A bounded, ordered group of candidates from a single sheet. Batches
/// are independent units of work; record order inside a batch is source
/// order.
#[derive(Debug, Clone)]
pub struct Batch {
    pub sheet: String,
    /// 1-based index within the sheet.
    pub index: usize,
    pub records: Vec<CandidateContact>,
}

/// Zero is a configuration error; any other value outside
/// `MIN_BATCH_SIZE..=MAX_BATCH_SIZE` is clamped with a warning.
pub fn validate_batch_size(requested: usize) -> Result<usize, ImportError> {
    if requested == 0 {
        return Err(ImportError::InvalidConfig(
            "batch size must be positive".to_string(),
        ));
    }
    let effective = requested.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE);
    if effective != requested {
        tracing::warn!(
            requested,
            effective,
            "batch size outside {}..={}, clamped",
            MIN_BATCH_SIZE,
            MAX_BATCH_SIZE
        );
    }
    Ok(effective)
}

pub fn validate_threads(requested: usize) -> Result<usize, ImportError> {
    if !(1..=MAX_THREADS).contains(&requested) {
        return Err(ImportError::InvalidConfig(format!(
            "threads must be between 1 and {}",
            MAX_THREADS
        )));
    }
    Ok(requested)
}

/// Chunk one sheet's candidates into batches of `batch_size`; only the
/// final batch may be shorter. Batches never span sheets.
pub fn partition(sheet: &str, records: Vec<CandidateContact>, batch_size: usize) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut current: Vec<CandidateContact> = Vec::new();

    for record in records {
        current.push(record);
        if current.len() == batch_size {
            batches.push(Batch {
                sheet: sheet.to_string(),
                index: batches.len() + 1,
                records: std::mem::take(&mut current),
            });
        }
    }
    if !current.is_empty() {
        batches.push(Batch {
            sheet: sheet.to_string(),
            index: batches.len() + 1,
            records: current,
        });
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn records(count: usize) -> Vec<CandidateContact> {
        (1..=count)
            .map(|i| CandidateContact {
                name: format!("Contact {}", i),
                email: None,
                phone: None,
                company: None,
                source_sheet: "edu".to_string(),
                raw_row_index: i,
                extra_fields: HashMap::new(),
            })
            .collect()
    }

    #[test]
    fn test_batch_count_is_ceiling_of_records_over_size() {
        for (count, size, expected) in [(10, 3, 4), (9, 3, 3), (1, 100, 1), (0, 5, 0)] {
            let batches = partition("edu", records(count), size);
            assert_eq!(batches.len(), expected, "count={} size={}", count, size);
        }
    }

    #[test]
    fn test_only_last_batch_is_short() {
        let batches = partition("edu", records(10), 3);
        assert_eq!(batches[0].records.len(), 3);
        assert_eq!(batches[1].records.len(), 3);
        assert_eq!(batches[2].records.len(), 3);
        assert_eq!(batches[3].records.len(), 1);
    }

    #[test]
    fn test_batches_preserve_source_order_and_index() {
        let batches = partition("edu", records(5), 2);
        assert_eq!(batches[0].index, 1);
        assert_eq!(batches[2].index, 3);
        assert_eq!(batches[1].records[0].raw_row_index, 3);
        assert_eq!(batches[2].records[0].raw_row_index, 5);
        assert!(batches.iter().all(|b| b.sheet == "edu"));
    }

    #[test]
    fn test_zero_batch_size_is_invalid() {
        let err = validate_batch_size(0).unwrap_err();
        assert!(matches!(err, ImportError::InvalidConfig(_)));
    }

    #[test]
    fn test_batch_size_clamping() {
        assert_eq!(validate_batch_size(2).unwrap(), MIN_BATCH_SIZE);
        assert_eq!(validate_batch_size(100).unwrap(), 100);
        assert_eq!(validate_batch_size(10_000).unwrap(), MAX_BATCH_SIZE);
    }

    #[test]
    fn test_thread_bounds() {
        assert!(validate_threads(0).is_err());
        assert!(validate_threads(17).is_err());
        assert_eq!(validate_threads(1).unwrap(), 1);
        assert_eq!(validate_threads(16).unwrap(), 16);
    }
}
