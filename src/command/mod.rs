//! Command execution pipeline
//!
//! Turns a parsed command into robot movement:
//! ParsedCommand -> LabelResolver -> ExecutionPlan -> CommandExecutor (animator legs)

pub mod animator;
pub mod executor;
pub mod resolver;
pub mod session;

pub use animator::{AnimationHandle, AnimationOutcome, AnimationTiming, CancelToken};
pub use executor::{CommandExecutor, ExecutionOutcome};
pub use resolver::{ExecutionPlan, LabelResolver, ResolveError, Resolution, Stop};
pub use session::{Session, SubmitOutcome};
