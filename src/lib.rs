//! seqring - Fixed-capacity ring buffer dengan satu worker penserialisasi
//!
//! Arsitektur:
//! - Slot Store: array slot tetap + index head/tail, overwrite-oldest saat penuh
//! - Ordering Queue: bounded MPSC FIFO antara producer dan worker
//! - Serializing Worker: satu thread yang menerapkan semua push secara berurutan
//! - Idle hooks: callback one-shot saat queue terkuras, dasar `wait()`
//! - Lifecycle: `Open -> ClosePending -> Closed`, close selalu menguras queue dulu
//!
//! ```
//! use seqring::Ring;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let ring = Arc::new(Ring::new(16, 4).unwrap());
//!
//! let producers: Vec<_> = (0..4u32)
//!     .map(|id| {
//!         let ring = ring.clone();
//!         thread::spawn(move || ring.push_all((0..3).map(|i| id * 10 + i)).unwrap())
//!     })
//!     .collect();
//! for p in producers {
//!     p.join().unwrap();
//! }
//!
//! ring.wait().unwrap();
//! assert_eq!(ring.len(), 12);
//! ```

mod config;
pub mod core;
mod error;
mod pipeline;
mod ring;

pub use config::{ResetPolicy, RingConfig};
pub use error::{RingError, RingResult};
pub use pipeline::LifecycleState;
pub use crate::core::Slots;
pub use ring::{Iter, Ring};
