//! Transaction id generator

use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::TransactionId;

/// Issues strictly increasing transaction ids starting at 1.
///
/// Safe under any number of concurrent callers: every call observes a
/// distinct value of the counter, so ids are never duplicated.
#[derive(Debug, Default)]
pub struct TransactionIdGenerator {
    last: AtomicI64,
}

impl TransactionIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> TransactionId {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Most recently issued id, 0 before the first call
    pub fn last_issued(&self) -> TransactionId {
        self.last.load(Ordering::SeqCst)
    }
}
