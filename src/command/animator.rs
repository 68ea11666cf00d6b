//! Robot movement animation
//!
//! A leg is a straight-line interpolation from the robot's cell to a target
//! cell, published one position per step on a spawned task. No obstacle
//! handling; intermediate cells are never checked.

use crate::core::config::AnimationConfig;
use crate::core::types::GridPos;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Pacing of a leg and of the pause after a pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTiming {
    pub leg_duration: Duration,
    pub steps: u32,
    pub pickup_pause: Duration,
}

impl AnimationTiming {
    /// Zero-delay timing, positions still published step by step
    pub fn instant(steps: u32) -> Self {
        Self {
            leg_duration: Duration::ZERO,
            steps,
            pickup_pause: Duration::ZERO,
        }
    }

    pub fn step_delay(&self) -> Duration {
        self.leg_duration / self.steps.max(1)
    }
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self::from(&AnimationConfig::default())
    }
}

impl From<&AnimationConfig> for AnimationTiming {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            leg_duration: Duration::from_millis(config.leg_duration_ms),
            steps: config.steps,
            pickup_pause: Duration::from_millis(config.pickup_pause_ms),
        }
    }
}

/// Positions visited on a leg: `steps + 1` points, start and target included
pub fn interpolate(start: GridPos, target: GridPos, steps: u32) -> Vec<GridPos> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| start.lerp(target, i as f64 / steps as f64))
        .collect()
}

/// Shared cancellation flag
///
/// Clones observe the same flag. Once cancelled a token stays cancelled.
#[derive(Debug, Clone)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { state: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// How a leg ended, with the last published position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    Completed(GridPos),
    Cancelled(GridPos),
}

impl AnimationOutcome {
    pub fn position(&self) -> GridPos {
        match self {
            AnimationOutcome::Completed(pos) | AnimationOutcome::Cancelled(pos) => *pos,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnimationOutcome::Cancelled(_))
    }
}

/// A running leg
pub struct AnimationHandle {
    positions: mpsc::Receiver<GridPos>,
    cancel: CancelToken,
    task: JoinHandle<AnimationOutcome>,
    last: GridPos,
}

impl AnimationHandle {
    /// Next position to show; `None` once the leg has ended
    pub async fn next_position(&mut self) -> Option<GridPos> {
        let pos = self.positions.recv().await?;
        self.last = pos;
        Some(pos)
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the task to end
    pub async fn finish(self) -> AnimationOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("animation task failed: {}", e);
                AnimationOutcome::Cancelled(self.last)
            }
        }
    }
}

/// Start animating a leg on the current tokio runtime
///
/// The task publishes each position, then sleeps one step delay, so the
/// whole leg takes `steps + 1` delays. Cancelling `cancel` stops it at the
/// next suspension point.
pub fn spawn(
    start: GridPos,
    target: GridPos,
    timing: &AnimationTiming,
    cancel: CancelToken,
) -> AnimationHandle {
    let path = interpolate(start, target, timing.steps);
    let (tx, rx) = mpsc::channel(path.len());
    let delay = timing.step_delay();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let mut last = start;
        for pos in path {
            if token.is_cancelled() {
                return AnimationOutcome::Cancelled(last);
            }
            if tx.send(pos).await.is_err() {
                // Nobody is watching any more
                return AnimationOutcome::Cancelled(last);
            }
            last = pos;
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = token.cancelled() => return AnimationOutcome::Cancelled(last),
            }
        }
        AnimationOutcome::Completed(last)
    });

    AnimationHandle {
        positions: rx,
        cancel,
        task,
        last: start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_endpoints_and_length() {
        let path = interpolate(GridPos::new(0, 0), GridPos::new(6, 8), 20);
        assert_eq!(path.len(), 21);
        assert_eq!(path[0], GridPos::new(0, 0));
        assert_eq!(path[20], GridPos::new(6, 8));
    }

    #[test]
    fn test_interpolate_same_cell() {
        let path = interpolate(GridPos::new(3, 3), GridPos::new(3, 3), 4);
        assert!(path.iter().all(|p| *p == GridPos::new(3, 3)));
    }

    #[test]
    fn test_interpolate_zero_steps_treated_as_one() {
        let path = interpolate(GridPos::new(0, 0), GridPos::new(2, 2), 0);
        assert_eq!(path, vec![GridPos::new(0, 0), GridPos::new(2, 2)]);
    }

    #[test]
    fn test_step_delay() {
        let timing = AnimationTiming::default();
        assert_eq!(timing.step_delay(), Duration::from_millis(100));
        assert_eq!(timing.pickup_pause, Duration::from_millis(1000));
    }

    #[test]
    fn test_cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_spawn_publishes_every_step() {
        let mut handle = spawn(
            GridPos::new(0, 0),
            GridPos::new(2, 4),
            &AnimationTiming::instant(4),
            CancelToken::new(),
        );

        let mut seen = Vec::new();
        while let Some(pos) = handle.next_position().await {
            seen.push(pos);
        }

        assert_eq!(seen, interpolate(GridPos::new(0, 0), GridPos::new(2, 4), 4));
        assert_eq!(
            handle.finish().await,
            AnimationOutcome::Completed(GridPos::new(2, 4))
        );
    }

    #[tokio::test]
    async fn test_cancel_stops_leg() {
        let timing = AnimationTiming {
            leg_duration: Duration::from_secs(60),
            steps: 10,
            pickup_pause: Duration::ZERO,
        };
        let mut handle = spawn(
            GridPos::new(0, 0),
            GridPos::new(9, 9),
            &timing,
            CancelToken::new(),
        );

        let first = handle.next_position().await;
        assert_eq!(first, Some(GridPos::new(0, 0)));

        handle.cancel();
        while handle.next_position().await.is_some() {}

        let outcome = handle.finish().await;
        assert!(outcome.is_cancelled());
        assert_ne!(outcome.position(), GridPos::new(9, 9));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let mut handle = spawn(
            GridPos::new(1, 1),
            GridPos::new(5, 5),
            &AnimationTiming::instant(5),
            token,
        );
        assert_eq!(handle.next_position().await, None);
        assert_eq!(
            handle.finish().await,
            AnimationOutcome::Cancelled(GridPos::new(1, 1))
        );
    }
}
