//! Lifecycle Controller: `Open -> ClosePending -> Closed`
//!
//! Transisi satu arah. `ClosePending` dipicu oleh pemanggil `close()`,
//! `Closed` hanya dicapai oleh worker setelah queue terkuras.

use crate::error::{RingError, RingResult};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use super::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Open = 0,
    ClosePending = 1,
    Closed = 2,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Open,
            1 => LifecycleState::ClosePending,
            _ => LifecycleState::Closed,
        }
    }
}

pub struct Lifecycle {
    state: AtomicU8,
    // Producer yang sudah lolos cek state tapi belum selesai enqueue
    producers: AtomicUsize,
}

/// Menandai satu producer sedang berada di jalur enqueue (satu elemen).
///
/// Worker tidak akan menandai `Closed` selama masih ada guard aktif.
/// Guard terakhir yang lepas saat close diminta membangunkan worker lewat `Wake`.
pub struct ProducerGuard<'a, T> {
    lifecycle: &'a Lifecycle,
    tx: &'a Sender<Command<T>>,
}

impl<T> Drop for ProducerGuard<'_, T> {
    fn drop(&mut self) {
        let remaining = self.lifecycle.producers.fetch_sub(1, Ordering::SeqCst) - 1;
        if remaining == 0 && self.lifecycle.state() != LifecycleState::Open {
            // Queue penuh berarti worker pasti bangun untuk item lain
            let _ = self.tx.try_send(Command::Wake);
        }
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Open as u8),
            producers: AtomicUsize::new(0),
        }
    }

    #[inline(always)]
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Masuk ke jalur producer. Gagal dengan `RingError::Closed` jika tidak `Open`.
    ///
    /// Counter dinaikkan sebelum membaca state (SeqCst di kedua sisi), jadi
    /// producer yang melihat `Open` pasti terlihat oleh worker saat shutdown.
    pub fn enter<'a, T>(&'a self, tx: &'a Sender<Command<T>>) -> RingResult<ProducerGuard<'a, T>> {
        self.producers.fetch_add(1, Ordering::SeqCst);
        let guard = ProducerGuard {
            lifecycle: self,
            tx,
        };

        if self.state() != LifecycleState::Open {
            return Err(RingError::Closed);
        }
        Ok(guard)
    }

    #[inline(always)]
    pub fn active_producers(&self) -> usize {
        self.producers.load(Ordering::SeqCst)
    }

    /// `Open -> ClosePending`. Gagal jika close sudah pernah diminta.
    pub fn request_close(&self) -> RingResult<()> {
        self.state
            .compare_exchange(
                LifecycleState::Open as u8,
                LifecycleState::ClosePending as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map(|_| ())
            .map_err(|_| RingError::Closed)
    }

    /// Terminal state, hanya dipanggil worker.
    pub fn mark_closed(&self) {
        self.state
            .store(LifecycleState::Closed as u8, Ordering::SeqCst);
    }
}
