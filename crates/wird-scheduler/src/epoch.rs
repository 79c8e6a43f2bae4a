//! The scheduling epoch: which calendar day the wake-up set was last armed for.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Store key holding the last scheduled day.
pub const EPOCH_KEY: &str = "last_scheduled_date";

/// Format a day as `YYYY-M-D` (month and day not zero-padded).
pub fn day_key(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Parse a `YYYY-M-D` key. Zero-padded fields are accepted too.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    let mut parts = key.trim().splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Gate over repeated scheduling passes, persisted under [`EPOCH_KEY`].
///
/// Any doubt about the stored value (missing, unparseable, store failure)
/// reads as "not scheduled": re-arming is idempotent, skipping is not.
#[derive(Clone)]
pub struct EpochGate {
    store: Arc<dyn KeyValueStore>,
}

impl EpochGate {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The recorded day, if one is stored and readable.
    pub fn read(&self) -> Option<NaiveDate> {
        match self.store.get(EPOCH_KEY) {
            Ok(Some(raw)) => {
                let parsed = parse_day_key(&raw);
                if parsed.is_none() {
                    warn!(value = %raw, "unparseable scheduling epoch; treating as unset");
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "scheduling epoch unreadable; treating as unset");
                None
            }
        }
    }

    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.read() == Some(today)
    }

    pub fn mark(&self, today: NaiveDate) -> Result<(), StoreError> {
        let key = day_key(today);
        self.store.set(EPOCH_KEY, &key)?;
        debug!(epoch = %key, "scheduling epoch recorded");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(EPOCH_KEY)?;
        debug!("scheduling epoch cleared");
        Ok(())
    }
}
