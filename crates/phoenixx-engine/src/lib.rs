//! Phoenixx Interview Engine
//!
//! Deterministic interview-session core: session state, the progressive
//! hint ladder, and submission scoring. All external interaction (code
//! execution, timers, natural-language hint text) is injected by the
//! caller; the engine itself performs no I/O.

pub mod clock;
pub mod config;
pub mod error;
pub mod hint;
pub mod problem;
pub mod scoring;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, HintPenalties};
pub use error::{EngineError, Result};
pub use hint::{tiers_monotonic, HintGrant, HintLadder, HintRecord, HintTier};
pub use problem::{Difficulty, Example, Problem, TestCase, MAX_PROBLEM_SIZE};
pub use scoring::{
    evaluate, estimate_complexity, penalty_from_hints, reweight, Complexity, Execution,
    ExecutionError, ExecutionErrorKind, Executor, QualityOnly, ScoreReport, TestResult, Weighting,
};
pub use session::{SessionState, Submission};
