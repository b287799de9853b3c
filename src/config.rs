//! Konfigurasi ring buffer

use crate::error::{RingError, RingResult};

/// Perlakuan isi slot saat `reset()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPolicy {
    /// Hanya index yang di-reset; nilai lama dilepas saat tertimpa insert berikutnya.
    #[default]
    Retain,
    /// Semua nilai yang tersimpan langsung di-drop.
    Clear,
}

/// Ring configuration
#[derive(Debug, Clone)]
pub struct RingConfig {
    /// Jumlah elemen maksimum di Slot Store
    pub capacity: usize,
    /// Jumlah push yang bisa antre sebelum producer tertahan (backpressure)
    pub queue_capacity: usize,
    pub reset_policy: ResetPolicy,
    /// Nama thread worker
    pub worker_name: String,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            queue_capacity: 64,
            reset_policy: ResetPolicy::Retain,
            worker_name: "seqring-worker".to_string(),
        }
    }
}

impl RingConfig {
    pub fn new(capacity: usize, queue_capacity: usize) -> Self {
        Self {
            capacity,
            queue_capacity,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_reset_policy(mut self, reset_policy: ResetPolicy) -> Self {
        self.reset_policy = reset_policy;
        self
    }

    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    pub(crate) fn validate(&self) -> RingResult<()> {
        if self.capacity == 0 {
            return Err(RingError::ZeroCapacity { what: "capacity" });
        }
        if self.queue_capacity == 0 {
            return Err(RingError::ZeroCapacity {
                what: "queue_capacity",
            });
        }
        Ok(())
    }
}
