//! Pesan yang mengalir lewat Ordering Queue

use crossbeam_channel::Sender;

/// Satu entri di Ordering Queue (bounded MPSC, FIFO).
pub enum Command<T> {
    /// Transfer ownership elemen ke worker
    Push(T),
    /// Bangunkan worker supaya mengecek idle hook yang baru didaftarkan
    Wake,
    /// Permintaan shutdown; worker membalas lewat `ack` setelah `Closed`
    Close { ack: Sender<()> },
}

impl<T> std::fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Push(_) => f.write_str("Push(..)"),
            Command::Wake => f.write_str("Wake"),
            Command::Close { .. } => f.write_str("Close"),
        }
    }
}
