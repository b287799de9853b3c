//! Serializing Worker
//!
//! Satu thread per ring. Semua mutasi Slot Store dari jalur tulis terjadi di sini,
//! sesuai urutan FIFO dari Ordering Queue.
//!
//! Prioritas tiap iterasi:
//! 1. Ada item di queue -> insert ke Slot Store
//! 2. Close diminta -> kuras queue, tandai `Closed`, berhenti
//! 3. Queue kosong -> idle tick (panggil semua idle hook)

use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError};
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::command::Command;
use super::lifecycle::Lifecycle;
use crate::core::{IdleRegistry, SlotStore};

/// State yang dibagi antara handle `Ring` dan worker.
pub(crate) struct Shared<T> {
    pub store: Mutex<SlotStore<T>>,
    pub idle: IdleRegistry,
    pub lifecycle: Lifecycle,
}

impl<T> Shared<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: Mutex::new(SlotStore::new(capacity)),
            idle: IdleRegistry::new(),
            lifecycle: Lifecycle::new(),
        }
    }
}

pub(crate) struct Worker<T> {
    rx: Receiver<Command<T>>,
    shared: Arc<Shared<T>>,
}

impl<T> Worker<T> {
    pub fn new(rx: Receiver<Command<T>>, shared: Arc<Shared<T>>) -> Self {
        Self { rx, shared }
    }

    pub fn run(self) {
        debug!("ring worker started");

        loop {
            let command = match self.rx.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) => {
                    self.idle_tick();
                    // Block sampai ada push, wake, atau close - tidak busy-spin
                    match self.rx.recv() {
                        Ok(command) => command,
                        Err(_) => break,
                    }
                }
                Err(TryRecvError::Disconnected) => break,
            };

            match command {
                Command::Push(value) => self.apply(value),
                Command::Wake => {}
                Command::Close { ack } => {
                    self.shutdown();
                    // Receiver di-drop sebelum ack, jadi send setelah ini langsung gagal
                    drop(self.rx);
                    let _ = ack.send(());
                    debug!("ring worker stopped");
                    return;
                }
            }
        }

        // Semua sender hilang tanpa close
        self.shared.lifecycle.mark_closed();
        self.shared.idle.fire();
        debug!("ring worker stopped: queue disconnected");
    }

    #[inline]
    fn apply(&self, value: T) {
        // Elemen yang ter-evict di-drop di luar lock
        let evicted = self.shared.store.lock().insert(value);
        if evicted.is_some() {
            trace!("ring full, oldest element overwritten");
        }
    }

    /// Panggil idle hook hanya jika queue masih kosong setelah hook diambil.
    ///
    /// Hook yang terdaftar sebelum `take()` hanya bisa didahului push yang sudah
    /// ada di queue saat itu; kalau queue kosong, semuanya sudah diterapkan.
    fn idle_tick(&self) {
        let hooks = self.shared.idle.take();
        if hooks.is_empty() {
            return;
        }

        if !self.rx.is_empty() {
            self.shared.idle.restore(hooks);
            return;
        }

        trace!(hooks = hooks.len(), "idle tick");
        for hook in hooks {
            hook();
        }
    }

    /// Kuras semua push yang sudah diterima, termasuk dari producer yang
    /// masih berada di tengah enqueue saat close diminta.
    ///
    /// Tidak spin: worker tidur di `recv()` sampai producer berikutnya enqueue
    /// atau guard producer terakhir mengirim `Wake`.
    fn shutdown(&self) {
        debug!("close requested, draining queue");

        loop {
            while let Ok(command) = self.rx.try_recv() {
                self.drain_one(command);
            }

            if self.shared.lifecycle.active_producers() == 0 {
                // Producer terakhir bisa saja enqueue tepat sebelum keluar
                while let Ok(command) = self.rx.try_recv() {
                    self.drain_one(command);
                }
                break;
            }

            match self.rx.recv() {
                Ok(command) => self.drain_one(command),
                Err(_) => break,
            }
        }

        self.shared.lifecycle.mark_closed();
        let fired = self.shared.idle.fire();
        if fired > 0 {
            trace!(hooks = fired, "final idle tick");
        }
    }

    fn drain_one(&self, command: Command<T>) {
        match command {
            Command::Push(value) => self.apply(value),
            Command::Wake => {}
            // Hanya satu close yang bisa lolos `request_close`
            Command::Close { ack } => {
                let _ = ack.send(());
            }
        }
    }
}
