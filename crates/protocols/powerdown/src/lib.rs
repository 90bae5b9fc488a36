//! Power-Down Schedule Engine
//!
//! Pure math over [`bonk_core::PowerDownStatus`]: the weekly unlock schedule,
//! progress accounting, and the BONK⇄dBONK conversion previews. No I/O, no
//! async — deterministic calculations only; the backend's unlock job is the
//! sole authority on actual releases.

pub mod calculator;
pub mod schedule;

pub use calculator::{
    cancel_outcome, power_down_preview, power_up_preview, CancelOutcome, PowerDownPreview,
    PowerUpPreview,
};
pub use schedule::{
    bonk_remaining, compute_schedule, dbonk_remaining, progress_pct, WeekEntry, WeekStatus,
};
