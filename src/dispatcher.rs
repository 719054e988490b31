//! Smart-action dispatch: analyze → render → resolve → execute.
//!
//! - open: select a file, ask the analyzer, render the action grid
//! - execute: resolve the chosen action, POST the file, save the result
//!
//! Every failure is recovered here: it becomes a toast and a log line and
//! is returned to the caller, but the session stays usable.

use crate::actions::{ActionDescriptor, ActionRegistry, FieldInputs, ResolvedAction};
use crate::client::Payload;
use crate::context::Context;
use crate::download;
use crate::error::{FormatrError, Result};
use crate::feedback::error_hint;
use crate::session::{ActionGrid, Card, DroppedFile, Session, Ticket};
use std::path::PathBuf;
use std::sync::Arc;

/// What selecting a card led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Downloaded(PathBuf),
    Reset,
}

pub struct SmartActionDispatcher {
    ctx: Context,
    registry: ActionRegistry,
    session: Arc<Session>,
}

impl SmartActionDispatcher {
    pub fn new(ctx: Context, registry: ActionRegistry, session: Arc<Session>) -> Self {
        Self {
            ctx,
            registry,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Select `file`, analyze it and render the grid.
    ///
    /// If analysis fails the grid still gets its Reset card so the user can
    /// start over; the error is returned after being logged.
    pub async fn open(&self, file: DroppedFile) -> Result<ActionGrid> {
        let name = file.name.clone();
        let generation = self.session.select_file(file);

        match self.analyze(&name).await {
            Ok(actions) => Ok(self.render(generation, &actions)),
            Err(e) => {
                self.render(generation, &[]);
                Err(e)
            }
        }
    }

    /// Ask the analyzer which actions apply to `filename`. No retry.
    pub async fn analyze(&self, filename: &str) -> Result<Vec<ActionDescriptor>> {
        match self.ctx.client.analyze(filename).await {
            Ok(report) => Ok(report.actions),
            Err(e) => {
                log::error!("[ANALYZE] {} failed: {}", filename, e);
                self.ctx.feedback.log("ERROR ANALYZING FILE");
                Err(e)
            }
        }
    }

    /// Replace the grid with one card per action plus Reset. A result for a
    /// file that is no longer active leaves the current grid untouched.
    pub fn render(&self, generation: u64, actions: &[ActionDescriptor]) -> ActionGrid {
        self.session.show_actions(generation, actions);
        self.session.grid()
    }

    /// Look up the endpoint and validate the inputs for `action_id`.
    pub fn resolve(&self, action_id: &str, inputs: &FieldInputs) -> Result<ResolvedAction> {
        self.registry.resolve(action_id, inputs)
    }

    /// Handle a click on a grid card.
    pub async fn select(&self, card: &Card, inputs: &FieldInputs) -> Result<CardOutcome> {
        match card {
            Card::Reset => {
                self.reset();
                Ok(CardOutcome::Reset)
            }
            Card::Action(action) => self.execute(action, inputs).await.map(CardOutcome::Downloaded),
        }
    }

    pub fn reset(&self) {
        self.session.reset();
    }

    /// Run one action against the active file and save the result.
    ///
    /// Nothing is sent when there is no file, the action is not linked, or
    /// an input is invalid. A response that arrives after the file changed
    /// is discarded with `Stale`.
    pub async fn execute(&self, action: &ActionDescriptor, inputs: &FieldInputs) -> Result<PathBuf> {
        if self.session.file().is_none() {
            let e = FormatrError::NoFile;
            self.ctx.feedback.toast(&e.to_string());
            self.ctx.feedback.log(&format!("ERROR: {}", e));
            return Err(e);
        }

        let resolved = match self.resolve(&action.id, inputs) {
            Ok(r) => r,
            Err(e) => {
                self.ctx.feedback.toast(&e.to_string());
                self.ctx.feedback.log(&format!("ERROR: {}", e));
                return Err(e);
            }
        };

        self.ctx.feedback.toast(&format!("EXECUTING: {}", action.name));
        let ticket = self.session.begin_request()?;

        let result = self
            .ctx
            .client
            .post_file(&resolved.endpoint, &ticket.file, &resolved.fields, "Failed")
            .await;

        if !self.session.complete(&ticket) {
            log::info!(
                "[EXECUTE] Discarding {} result for replaced file {}",
                action.id,
                ticket.file.name
            );
            return Err(FormatrError::Stale(ticket.file.name.clone()));
        }

        let saved = match result {
            Ok(payload) => self.store(&ticket, &payload).await,
            Err(e) => Err(e),
        };

        match saved {
            Err(e @ FormatrError::Stale(_)) => Err(e),
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.ctx.feedback.log(&format!("SUCCESS: Downloaded {}", name));
                self.ctx.feedback.toast("SUCCESS");
                self.session.report(&ticket, &format!("SUCCESS: {}", name));
                Ok(path)
            }
            Err(e) => {
                let msg = error_hint(&e.to_string());
                self.ctx.feedback.log(&format!("ERROR: {}", e));
                self.ctx.feedback.toast(&format!("ERROR: {}", msg));
                self.session.report(&ticket, &format!("ERROR: {}", msg));
                Err(e)
            }
        }
    }

    /// Save a download for `ticket`. If the file was replaced or reset
    /// while the save was in progress, the written file is removed again
    /// and `Stale` is returned.
    pub async fn store(&self, ticket: &Ticket, payload: &Payload) -> Result<PathBuf> {
        let path = download::save(
            &self.ctx.output_dir,
            payload.suggested_name.as_deref(),
            download::DEFAULT_NAME,
            &payload.bytes,
        )
        .await?;

        if self.session.is_current(ticket) {
            return Ok(path);
        }

        log::info!(
            "[DOWNLOAD] Removing {} saved for replaced file {}",
            path.display(),
            ticket.file.name
        );
        if let Err(e) = tokio::fs::remove_file(&path).await {
            log::warn!("[DOWNLOAD] Could not remove {}: {}", path.display(), e);
        }
        Err(FormatrError::Stale(ticket.file.name.clone()))
    }
}
