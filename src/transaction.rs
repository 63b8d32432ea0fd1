use crate::reference::{TRANSACTION_PREFIX, TRANSACTION_SUFFIX_LEN};
use crate::util::random_alphanum_upper;

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionId {
    pub value: String,
    /// The instant encoded in `value`; payload timestamps use this, not the raw clock.
    pub issued_at: DateTime<Utc>,
}

/// Issues `TXN<millis><SUFFIX>` identifiers for single payment attempts.
///
/// The millisecond component never repeats or goes backwards for one
/// generator: when the clock has not advanced since the previous id, the
/// last issued value is bumped by one and `issued_at` follows it.
pub struct TransactionIdGenerator {
    rng: ChaCha8Rng,
    last_millis: Option<i64>,
}

impl TransactionIdGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            last_millis: None,
        }
    }

    pub fn from_os_seed() -> Self {
        Self::new(random_seed())
    }

    pub fn next_id_at(&mut self, now: DateTime<Utc>) -> TransactionId {
        let mut millis = now.timestamp_millis();
        if let Some(last) = self.last_millis {
            if millis <= last {
                millis = last + 1;
            }
        }
        self.last_millis = Some(millis);

        let suffix = random_alphanum_upper(&mut self.rng, TRANSACTION_SUFFIX_LEN);
        TransactionId {
            value: format!("{TRANSACTION_PREFIX}{millis}{suffix}"),
            issued_at: DateTime::from_timestamp_millis(millis).unwrap_or(now),
        }
    }
}

pub fn random_seed() -> u64 {
    let mut rng = rand::rngs::OsRng;
    rng.gen()
}
