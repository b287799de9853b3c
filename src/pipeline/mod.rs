//! Pipeline: Ordering Queue -> Serializing Worker -> Slot Store
//!
//! Prinsip desain:
//! - Banyak producer, satu consumer: urutan push global = urutan FIFO queue
//! - Bounded queue: producer hanya tertahan saat queue penuh
//! - Event-driven: worker tidur di `recv()`, dibangunkan oleh push, wake, atau close

mod command;
mod lifecycle;
mod worker;

pub(crate) use command::Command;
pub use lifecycle::LifecycleState;
pub(crate) use worker::{Shared, Worker};
