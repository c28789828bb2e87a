//! Radio Control Logic
//!
//! The functional core of the tuner: channel arithmetic, settings encoding
//! and the cooperative task slot. Nothing here touches the bus.

pub mod channel;
pub mod settings;
pub mod task;
