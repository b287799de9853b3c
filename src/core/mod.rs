//! Core module: Slot Store dan Idle Notification Registry
//!
//! Prinsip desain:
//! - Fixed capacity: semua slot pre-allocated saat init
//! - Overwrite-oldest: insert ke buffer penuh menimpa elemen tertua tanpa error
//! - Tanpa sinkronisasi sendiri: lock dipegang oleh `Ring`

mod idle;
mod slot_store;

pub use idle::{IdleHook, IdleRegistry};
pub use slot_store::{SlotStore, Slots};
