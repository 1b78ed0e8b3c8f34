//! Threshold Scorers
//!
//! Two deterministic rule sets turn raw readings into a 0-100 composite and
//! a category:
//!
//! - [`WorkerScorer`]: Composite Index Score (CIS) and risk state
//! - [`MachineScorer`]: health score, failure probability, status,
//!   predicted maintenance days and maintenance state
//!
//! Scorers hold no state. Calling one twice on the same reading yields the
//! same assessment, and every composite is clamped to `[0, 100]` however
//! extreme the input.
//!
//! ```rust
//! use aura_core::{RiskState, Scorer, WorkerReading, WorkerScorer};
//!
//! let reading = WorkerReading { heart_rate: 110, hrv: 30, ..Default::default() };
//! let assessment = WorkerScorer.score(&reading);
//! assert_eq!(assessment.cis_score, 70);
//! assert_eq!(assessment.risk_state, RiskState::Medium);
//! ```

pub mod machine;
pub mod worker;

pub use machine::{MachineAssessment, MachineScorer};
pub use worker::{WorkerAssessment, WorkerScorer};
