//! Idle Notification Registry
//!
//! Daftar callback one-shot yang dipanggil worker pada idle tick berikutnya,
//! lalu dibuang. Punya lock sendiri, terpisah dari lock Slot Store.

use parking_lot::Mutex;

/// Callback tanpa argumen, dipanggil paling banyak sekali.
pub type IdleHook = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
pub struct IdleRegistry {
    hooks: Mutex<Vec<IdleHook>>,
}

impl IdleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hook: IdleHook) {
        self.hooks.lock().push(hook);
    }

    /// Ambil dan kosongkan seluruh registry secara atomik.
    pub fn take(&self) -> Vec<IdleHook> {
        std::mem::take(&mut *self.hooks.lock())
    }

    /// Kembalikan hook hasil `take()` ke depan antrean, sebelum hook yang
    /// didaftarkan sesudahnya.
    pub fn restore(&self, mut hooks: Vec<IdleHook>) {
        let mut pending = self.hooks.lock();
        hooks.append(&mut pending);
        *pending = hooks;
    }

    /// Ambil seluruh registry lalu panggil tiap hook.
    ///
    /// Hook dipanggil di luar lock supaya hook boleh mendaftarkan hook baru.
    /// Returns jumlah hook yang dipanggil.
    pub fn fire(&self) -> usize {
        let hooks = self.take();
        let fired = hooks.len();
        for hook in hooks {
            hook();
        }
        fired
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.hooks.lock().len()
    }
}
