//! Drive control core — firing window math, the triac firing state machine,
//! the ramp-limited power stage, and the closed-loop speed controller.
//!
//! Data flows one way:
//!
//! ```text
//!  SpeedController ──▶ PowerStage ──▶ pending FiringWindow ──▶ TriacFiring
//!   (100 ms cadence)    (ramp limit)    (atomic, staged)      (ISR, armed at ZC)
//! ```
//!
//! Everything left of the pending window runs in the cooperative main loop;
//! everything right of it runs in the high-priority interrupt context.  The
//! pending cell is the only hand-over point.

pub mod power;
pub mod speed;
pub mod triac;
pub mod window;
