//! Sensor subsystem — the two frequency-capture channels and the ADC
//! temperature channel.
//!
//! The tacho and water-level channels share one generic
//! [`CaptureChannel`](capture::CaptureChannel) behind per-channel statics
//! with ISR entry points; the main loop reads them through the snapshot
//! protocol only.  Temperature is a plain polled ADC read.

pub mod capture;
pub mod tacho;
pub mod temperature;
pub mod water_level;
