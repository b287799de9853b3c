//! Slot Store: inti circular buffer dengan kebijakan overwrite-oldest
//!
//! Struktur data murni tanpa sinkronisasi sendiri.
//! Selalu diakses di bawah lock milik `Ring`.

use crate::config::ResetPolicy;

/// Circular buffer berkapasitas tetap.
///
/// `head` = posisi tulis berikutnya, `tail` = elemen tertua.
/// `len` membedakan kondisi penuh dari kosong saat `head == tail`.
pub struct SlotStore<T> {
    // Pre-allocated slots - tidak ada alokasi setelah init
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> SlotStore<T> {
    /// Membuat slot store baru.
    ///
    /// # Panics
    /// Panic jika `capacity == 0` (sudah divalidasi oleh `RingConfig`)
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline(always)]
    fn next(&self, index: usize) -> usize {
        (index + 1) % self.slots.len()
    }

    /// Tulis `value` di `head`.
    ///
    /// Jika buffer sudah penuh, elemen tertua ditimpa dan dikembalikan
    /// supaya pemanggil bisa mencatat eviction.
    #[inline]
    pub fn insert(&mut self, value: T) -> Option<T> {
        let evicted = self.slots[self.head].replace(value);
        self.head = self.next(self.head);

        if self.len == self.slots.len() {
            // Buffer penuh: tail ikut maju, elemen tertua hilang
            self.tail = self.next(self.tail);
            evicted
        } else {
            self.len += 1;
            None
        }
    }

    /// Ambil elemen tertua, `None` jika kosong.
    #[inline]
    pub fn remove(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let value = self.slots[self.tail].take();
        self.tail = self.next(self.tail);
        self.len -= 1;
        value
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[cfg(test)]
    fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Kosongkan buffer secara logis.
    ///
    /// Dengan `ResetPolicy::Retain` isi slot lama tidak disentuh dan baru dilepas
    /// saat tertimpa insert berikutnya.
    pub fn reset(&mut self, policy: ResetPolicy) {
        if policy == ResetPolicy::Clear {
            for slot in self.slots.iter_mut() {
                *slot = None;
            }
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Iterasi tanpa pop, tertua ke terbaru (`forward`) atau sebaliknya.
    ///
    /// Index di-snapshot saat pemanggilan; iterator meminjam store sehingga
    /// tidak ada write yang bisa menyela.
    pub fn iter(&self, forward: bool) -> Slots<'_, T> {
        let capacity = self.slots.len();
        let start = if forward {
            self.tail
        } else {
            (self.head + capacity - 1) % capacity
        };

        Slots {
            slots: &self.slots,
            index: start,
            remaining: self.len,
            forward,
        }
    }

    /// Isi slot mentah sesuai urutan fisik (untuk `Debug`).
    pub fn raw_slots(&self) -> &[Option<T>] {
        &self.slots
    }
}

/// Iterator lazy atas isi Slot Store, dari `SlotStore::iter`.
pub struct Slots<'a, T> {
    slots: &'a [Option<T>],
    index: usize,
    remaining: usize,
    forward: bool,
}

impl<'a, T> Iterator for Slots<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while self.remaining > 0 {
            let capacity = self.slots.len();
            let current = self.index;
            self.index = if self.forward {
                (current + 1) % capacity
            } else {
                (current + capacity - 1) % capacity
            };
            self.remaining -= 1;

            // Slot di antara tail dan head selalu terisi
            if let Some(value) = self.slots[current].as_ref() {
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
