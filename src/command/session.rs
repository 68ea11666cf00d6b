//! Command submission: parse the input, then execute the result

use crate::command::animator::CancelToken;
use crate::command::executor::{CommandExecutor, ExecutionOutcome};
use crate::llm::command::ParsedCommand;
use crate::llm::parser::CommandParser;
use crate::ui::state::{Action, PanelState, PanelStore};

/// What happened to one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input empty or a submission already in flight
    Ignored,
    /// The parser failed; the fallback result was recorded, nothing moved
    ParserUnavailable { reason: String },
    /// The parser answered and the executor ran
    Executed {
        parsed: ParsedCommand,
        outcome: ExecutionOutcome,
    },
}

/// Pairs a parser with an executor
pub struct Session<P> {
    parser: P,
    executor: CommandExecutor,
}

impl<P: CommandParser> Session<P> {
    pub fn new(parser: P, executor: CommandExecutor) -> Self {
        Self { parser, executor }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Submit the current input
    ///
    /// Does nothing unless [`PanelState::can_submit`]. Whatever happens the
    /// store is back to idle when this returns.
    pub async fn submit<F>(
        &self,
        store: &mut PanelStore,
        cancel: &CancelToken,
        on_change: &mut F,
    ) -> SubmitOutcome
    where
        F: FnMut(&PanelState),
    {
        if !store.state().can_submit() {
            return SubmitOutcome::Ignored;
        }

        let command = store.state().input.trim().to_string();
        tracing::info!(%command, "submitting command");
        store.dispatch(Action::SubmitStarted);
        on_change(store.state());

        let parsed = self.parser.parse(&command).await;
        let outcome = match parsed {
            Ok(parsed) => {
                tracing::info!(summary = %parsed.summary(), valid = parsed.valid_command, "command parsed");
                store.dispatch(Action::CommandParsed {
                    command,
                    result: parsed.clone(),
                });
                on_change(store.state());

                let outcome = self
                    .executor
                    .execute(store, &parsed, cancel, on_change)
                    .await;
                tracing::info!(?outcome, "command finished");
                SubmitOutcome::Executed { parsed, outcome }
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(error = %reason, "command parser unavailable, using fallback");
                store.dispatch(Action::ParseFailed {
                    command,
                    reason: reason.clone(),
                });
                SubmitOutcome::ParserUnavailable { reason }
            }
        };

        store.dispatch(Action::SubmitFinished);
        on_change(store.state());
        outcome
    }
}
