//! Public handle: `Ring<T>`
//!
//! Jalur tulis: caller -> Ordering Queue -> worker -> Slot Store.
//! Jalur baca (`pop`, `iter`, `len`) langsung ke Slot Store di bawah lock yang sama.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Sender, TrySendError};
use tracing::{debug, warn};

use crate::config::{ResetPolicy, RingConfig};
use crate::core::Slots;
use crate::error::{RingError, RingResult};
use crate::pipeline::{Command, LifecycleState, Shared, Worker};

/// Ring buffer berkapasitas tetap dengan satu worker yang menserialisasi semua push.
///
/// `Ring` bersifat `Send + Sync`; bagikan lewat `Arc<Ring<T>>` ke banyak producer.
/// Insert ke buffer penuh menimpa elemen tertua tanpa sinyal ke pemanggil.
///
/// # Example
///
/// ```
/// use seqring::Ring;
///
/// let ring = Ring::new(3, 1).unwrap();
/// ring.push_all_and_wait(["a", "b", "c", "d"]).unwrap();
///
/// // "a" sudah ter-evict
/// assert_eq!(ring.flush_and_close().unwrap(), vec!["b", "c", "d"]);
/// ```
pub struct Ring<T: Send + 'static> {
    shared: Arc<Shared<T>>,
    tx: Sender<Command<T>>,
    worker: Option<JoinHandle<()>>,
    capacity: usize,
    queue_capacity: usize,
    reset_policy: ResetPolicy,
}

impl<T: Send + 'static> Ring<T> {
    /// Membuat ring dengan `capacity` slot dan queue berkapasitas `queue_capacity`.
    ///
    /// Worker thread langsung di-spawn.
    pub fn new(capacity: usize, queue_capacity: usize) -> RingResult<Self> {
        Self::with_config(RingConfig::new(capacity, queue_capacity))
    }

    pub fn with_config(config: RingConfig) -> RingResult<Self> {
        config.validate()?;

        let shared = Arc::new(Shared::new(config.capacity));
        let (tx, rx) = bounded(config.queue_capacity);
        let worker = Worker::new(rx, shared.clone());

        let handle = thread::Builder::new()
            .name(config.worker_name.clone())
            .spawn(move || worker.run())
            .map_err(RingError::Spawn)?;

        debug!(
            capacity = config.capacity,
            queue_capacity = config.queue_capacity,
            worker = %config.worker_name,
            "ring created"
        );

        Ok(Self {
            shared,
            tx,
            worker: Some(handle),
            capacity: config.capacity,
            queue_capacity: config.queue_capacity,
            reset_policy: config.reset_policy,
        })
    }

    /// Enqueue satu elemen. Hanya block jika queue penuh.
    ///
    /// # Errors
    /// `RingError::Closed` jika close sudah diminta.
    pub fn push(&self, value: T) -> RingResult<()> {
        let _guard = self.shared.lifecycle.enter(&self.tx)?;
        self.tx
            .send(Command::Push(value))
            .map_err(|_| RingError::Closed)
    }

    /// Enqueue beberapa elemen sesuai urutan iterator.
    ///
    /// Elemen dari satu panggilan tidak dijamin bersebelahan jika ada producer lain.
    /// State dicek per elemen: begitu close diminta, sisa iterator tidak diambil
    /// dan pemanggil menerima `RingError::Closed`.
    pub fn push_all<I>(&self, values: I) -> RingResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.push(value)?;
        }
        Ok(())
    }

    /// Push lalu block sampai semua push yang sudah antre (termasuk dari thread lain)
    /// diterapkan ke Slot Store.
    pub fn push_and_wait(&self, value: T) -> RingResult<()> {
        self.push(value)?;
        self.wait()
    }

    pub fn push_all_and_wait<I>(&self, values: I) -> RingResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.push_all(values)?;
        self.wait()
    }

    /// Ambil elemen tertua, `None` jika kosong.
    pub fn pop(&self) -> Option<T> {
        self.shared.store.lock().remove()
    }

    /// Jumlah elemen yang sudah diterapkan ke Slot Store.
    pub fn len(&self) -> usize {
        self.shared.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.store.lock().is_empty()
    }

    /// Jumlah command yang masih antre untuk worker.
    pub fn queued(&self) -> usize {
        self.tx.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Kosongkan ring secara logis. Worker dan queue tidak disentuh.
    ///
    /// Nilai lama ikut di-drop hanya dengan `ResetPolicy::Clear`.
    pub fn reset(&self) {
        self.shared.store.lock().reset(self.reset_policy);
    }

    /// Pop sampai kosong, urut dari tertua ke terbaru.
    pub fn flush(&self) -> Vec<T> {
        let mut store = self.shared.store.lock();
        let mut result = Vec::with_capacity(store.len());
        while let Some(value) = store.remove() {
            result.push(value);
        }
        result
    }

    /// Daftarkan callback one-shot untuk idle tick berikutnya.
    ///
    /// Hook dijalankan di thread worker; hook tidak boleh memanggil operasi
    /// yang menunggu worker (`push` saat queue penuh, `wait`, `close`).
    ///
    /// # Errors
    /// `RingError::Closed` jika close sudah diminta.
    pub fn add_idle_hook<F>(&self, hook: F) -> RingResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let _guard = self.shared.lifecycle.enter(&self.tx)?;
        self.shared.idle.register(Box::new(hook));

        // Queue penuh berarti worker sedang sibuk dan pasti mencapai idle tick
        match self.tx.try_send(Command::Wake) {
            Ok(()) | Err(TrySendError::Full(_)) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(RingError::Closed),
        }
    }

    /// Block sampai queue terkuras setidaknya sekali setelah pemanggilan ini.
    pub fn wait(&self) -> RingResult<()> {
        let (done_tx, done_rx) = bounded::<()>(1);
        self.add_idle_hook(move || {
            let _ = done_tx.send(());
        })?;

        // Hook di-drop tanpa dipanggil hanya jika worker mati
        done_rx.recv().map_err(|_| RingError::Closed)
    }

    /// Minta shutdown dan block sampai worker menguras queue dan berhenti.
    ///
    /// # Errors
    /// `RingError::Closed` jika close sudah pernah diminta.
    pub fn close(&self) -> RingResult<()> {
        self.shared.lifecycle.request_close()?;
        debug!("ring close requested");

        let (ack_tx, ack_rx) = bounded(1);
        if self.tx.send(Command::Close { ack: ack_tx }).is_err() {
            // Worker sudah berhenti
            self.shared.lifecycle.mark_closed();
            return Ok(());
        }

        if ack_rx.recv().is_err() {
            warn!("ring worker exited without acknowledging close");
            self.shared.lifecycle.mark_closed();
        }
        Ok(())
    }

    /// `close()` lalu `flush()`.
    pub fn flush_and_close(&self) -> RingResult<Vec<T>> {
        self.close()?;
        Ok(self.flush())
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lifecycle.state() == LifecycleState::Closed
    }

    pub fn state(&self) -> LifecycleState {
        self.shared.lifecycle.state()
    }
}

impl<T: Clone + Send + 'static> Ring<T> {
    /// Iterasi tertua -> terbaru tanpa pop.
    ///
    /// Isi ring di-snapshot (clone) saat pemanggilan; push berikutnya tidak terlihat.
    pub fn iter(&self) -> Iter<T> {
        let store = self.shared.store.lock();
        Iter {
            items: store.iter(true).cloned().collect::<Vec<_>>().into_iter(),
        }
    }

    /// Iterasi terbaru -> tertua tanpa pop.
    pub fn iter_rev(&self) -> Iter<T> {
        let store = self.shared.store.lock();
        Iter {
            items: store.iter(false).cloned().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl<T: Send + 'static> Ring<T> {
    /// Iterasi lazy tertua -> terbaru tanpa clone, untuk `T` apa pun.
    ///
    /// `f` berjalan di bawah lock Slot Store: worker tertahan selama `f` berjalan,
    /// dan `f` tidak boleh memanggil operasi ring lain (lock tidak reentrant).
    pub fn with_iter<R, F>(&self, f: F) -> R
    where
        F: FnOnce(Slots<'_, T>) -> R,
    {
        let store = self.shared.store.lock();
        f(store.iter(true))
    }

    /// Seperti `with_iter`, terbaru -> tertua.
    pub fn with_iter_rev<R, F>(&self, f: F) -> R
    where
        F: FnOnce(Slots<'_, T>) -> R,
    {
        let store = self.shared.store.lock();
        f(store.iter(false))
    }
}

impl<T: Send + 'static> Drop for Ring<T> {
    fn drop(&mut self) {
        if self.shared.lifecycle.state() == LifecycleState::Open {
            warn!("ring dropped without close, shutting down worker");
            let _ = self.close();
        }

        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("ring worker panicked");
            }
        }
    }
}

impl<T: fmt::Debug + Send + 'static> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.shared.store.lock();
        f.debug_struct("Ring")
            .field("capacity", &store.capacity())
            .field("head", &store.head())
            .field("tail", &store.tail())
            .field("len", &store.len())
            .field("data", &store.raw_slots())
            .field("state", &self.shared.lifecycle.state())
            .finish()
    }
}

/// Snapshot iterator dari `Ring::iter` / `Ring::iter_rev`.
///
/// Clone iterator untuk mengulang dari awal.
#[derive(Debug, Clone)]
pub struct Iter<T> {
    items: std::vec::IntoIter<T>,
}

impl<T> Iterator for Iter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.items.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.items.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_capacity_three_scenario() {
        let ring = Ring::new(3, 1).unwrap();
        ring.push_all_and_wait(["a", "b", "c", "d"]).unwrap();

        {
            let store = ring.shared.store.lock();
            let raw: Vec<_> = store.raw_slots().iter().map(|s| s.unwrap()).collect();
            assert_eq!(raw, vec!["d", "b", "c"]);
        }

        assert_eq!(ring.len(), 3);
        assert_eq!(ring.iter().next(), Some("b"));
        assert_eq!(ring.iter_rev().next(), Some("d"));
        ring.close().unwrap();
    }

    #[test]
    fn test_pop_after_push_and_wait() {
        let ring = Ring::new(10, 10).unwrap();
        ring.push_all_and_wait(1..=4u32).unwrap();

        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.len(), 3);
        ring.close().unwrap();
    }

    #[test]
    fn test_pop_empty_is_none() {
        let ring = Ring::<u8>::new(4, 4).unwrap();
        assert_eq!(ring.pop(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_idle_hook_fires_once() {
        let ring = Ring::new(4, 4).unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        ring.add_idle_hook(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        ring.push_and_wait(1u8).unwrap();
        ring.wait().unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_rejects_producers() {
        let ring = Ring::new(4, 2).unwrap();
        ring.push_and_wait(7u8).unwrap();
        ring.close().unwrap();

        assert!(ring.is_closed());
        assert!(ring.push(1).unwrap_err().is_closed());
        assert!(ring.push_all([1, 2]).unwrap_err().is_closed());
        assert!(ring.add_idle_hook(|| {}).unwrap_err().is_closed());
        assert!(ring.wait().unwrap_err().is_closed());
        assert!(ring.close().unwrap_err().is_closed());
        assert!(ring.flush_and_close().unwrap_err().is_closed());

        // Jalur baca tetap valid
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![7]);
        assert_eq!(ring.pop(), Some(7));
        assert!(ring.flush().is_empty());
        ring.reset();
    }

    #[test]
    fn test_reset_clear_policy() {
        let config = RingConfig::new(4, 4).with_reset_policy(ResetPolicy::Clear);
        let ring = Ring::with_config(config).unwrap();
        let value = Arc::new(());

        ring.push_and_wait(value.clone()).unwrap();
        assert_eq!(Arc::strong_count(&value), 2);

        ring.reset();
        assert_eq!(ring.len(), 0);
        assert_eq!(Arc::strong_count(&value), 1);
    }

    #[test]
    fn test_reset_retain_policy() {
        let ring = Ring::new(4, 4).unwrap();
        let value = Arc::new(());

        ring.push_and_wait(value.clone()).unwrap();
        ring.reset();
        assert_eq!(ring.len(), 0);
        // Nilai lama masih dipegang slot sampai tertimpa
        assert_eq!(Arc::strong_count(&value), 2);
    }

    #[test]
    fn test_zero_capacity() {
        assert!(matches!(
            Ring::<u8>::new(0, 1),
            Err(RingError::ZeroCapacity { .. })
        ));
        assert!(matches!(
            Ring::<u8>::new(1, 0),
            Err(RingError::ZeroCapacity { .. })
        ));
    }

    #[test]
    fn test_debug_output() {
        let ring = Ring::new(2, 1).unwrap();
        ring.push_and_wait(5u8).unwrap();
        let text = format!("{:?}", ring);
        assert!(text.contains("capacity: 2"));
        assert!(text.contains("len: 1"));
    }

    #[test]
    fn test_drop_without_close_joins_worker() {
        let value = Arc::new(());
        {
            let ring = Ring::new(4, 4).unwrap();
            ring.push(value.clone()).unwrap();
        }
        // Drop menguras queue lalu melepas semua slot
        assert_eq!(Arc::strong_count(&value), 1);
    }

    #[test]
    fn test_close_releases_pending_waiter() {
        let ring = Arc::new(Ring::<u8>::new(8, 8).unwrap());
        let (entered_tx, entered_rx) = bounded::<()>(1);
        let (release_tx, release_rx) = bounded::<()>(1);

        // Tahan worker di dalam hook supaya hook waiter tetap pending
        ring.add_idle_hook(move || {
            entered_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        })
        .unwrap();
        entered_rx.recv().unwrap();

        let waiter = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.wait())
        };
        while ring.shared.idle.pending() == 0 {
            thread::yield_now();
        }

        let closer = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || ring.close())
        };
        while ring.state() == LifecycleState::Open {
            thread::yield_now();
        }

        release_tx.send(()).unwrap();
        assert!(closer.join().unwrap().is_ok());
        // Dilepas oleh final idle tick, bukan error
        assert!(waiter.join().unwrap().is_ok());
        assert!(ring.is_closed());
    }
}
