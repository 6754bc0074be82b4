/// Errors that can occur while decoding payload records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The payload ends before the fixed part of the record does.
    #[error("{record} payload truncated ({actual} of {needed} bytes)")]
    Truncated {
        record: &'static str,
        needed: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, RecordError>;

pub(crate) fn ensure_len(record: &'static str, src: &[u8], needed: usize) -> Result<()> {
    if src.len() < needed {
        return Err(RecordError::Truncated {
            record,
            needed,
            actual: src.len(),
        });
    }
    Ok(())
}
