//! Smart-action session state.
//!
//! A `Session` owns the current file, the rendered action grid, the phase
//! and the request bookkeeping. Handlers receive it explicitly.
//!
//! State machine per file:
//! `Empty → Analyzing → ActionsShown → (Executing → ActionsShown)* → Empty`.
//!
//! Every file selection and every reset bumps `generation`. Requests carry
//! the generation they were issued under plus a sequence number, so a slow
//! response for an old file is discarded and an older response never
//! overwrites the status left by a newer one.

use crate::actions::ActionDescriptor;
use crate::error::{FormatrError, Result};
use std::path::Path;
use bytes::Bytes;
use std::sync::{Mutex, MutexGuard};

pub const RESET_LABEL: &str = "RESET / NEW FILE";

/// The file currently selected for smart actions.
#[derive(Debug, Clone)]
pub struct DroppedFile {
    pub name: String,
    pub size: u64,
    /// Shared buffer; clones and uploads reuse it without copying.
    pub content: Bytes,
}

impl DroppedFile {
    pub fn from_bytes(name: &str, content: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            size: content.len() as u64,
            content: content.into(),
        }
    }

    /// Read a file from disk; the file name becomes the upload name.
    pub async fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| FormatrError::usage(format!("not a file: {}", path.display())))?;
        let content = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(&name, content))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Empty,
    Analyzing,
    ActionsShown,
    Executing,
}

/// One clickable element of the action grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Action(ActionDescriptor),
    Reset,
}

impl Card {
    pub fn label(&self) -> &str {
        match self {
            Card::Action(a) => &a.name,
            Card::Reset => RESET_LABEL,
        }
    }
}

/// Rendered view of the suggested actions: one card per action, in server
/// order, then the Reset card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionGrid {
    cards: Vec<Card>,
}

impl ActionGrid {
    pub fn render(actions: &[ActionDescriptor]) -> Self {
        let mut cards: Vec<Card> = actions.iter().cloned().map(Card::Action).collect();
        cards.push(Card::Reset);
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Action cards only (the Reset card excluded).
    pub fn actions(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.cards.iter().filter_map(|c| match c {
            Card::Action(a) => Some(a),
            Card::Reset => None,
        })
    }
}

/// Issued when a request is dispatched; handed back when it completes.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub generation: u64,
    pub seq: u64,
    pub file: DroppedFile,
}

#[derive(Debug, Default)]
struct Inner {
    file: Option<DroppedFile>,
    phase: Phase,
    grid: ActionGrid,
    generation: u64,
    next_seq: u64,
    applied_seq: u64,
    in_flight: usize,
    status: Option<String>,
}

#[derive(Debug, Default)]
pub struct Session {
    inner: Mutex<Inner>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make `file` the active file. Invalidates the previous grid and any
    /// outstanding requests. Returns the new generation.
    pub fn select_file(&self, file: DroppedFile) -> u64 {
        let mut s = self.state();
        s.generation += 1;
        log::info!(
            "[SESSION] Selected {} ({} bytes), generation {}",
            file.name,
            file.size,
            s.generation
        );
        s.file = Some(file);
        s.phase = Phase::Analyzing;
        s.grid = ActionGrid::default();
        s.in_flight = 0;
        s.status = None;
        s.generation
    }

    /// Install the rendered grid for `generation`. Ignored (returns false)
    /// if the file changed while the analyzer was running.
    pub fn show_actions(&self, generation: u64, actions: &[ActionDescriptor]) -> bool {
        let mut s = self.state();
        if s.generation != generation || s.file.is_none() {
            log::debug!("[SESSION] Dropping analysis for generation {}", generation);
            return false;
        }
        s.grid = ActionGrid::render(actions);
        s.phase = Phase::ActionsShown;
        true
    }

    /// Clear the file and return to the initial empty view.
    pub fn reset(&self) {
        let mut s = self.state();
        s.generation += 1;
        s.file = None;
        s.phase = Phase::Empty;
        s.grid = ActionGrid::default();
        s.in_flight = 0;
        s.status = None;
        log::info!("[SESSION] Reset, generation {}", s.generation);
    }

    /// Register an outgoing request for the active file.
    pub fn begin_request(&self) -> Result<Ticket> {
        let mut s = self.state();
        let file = s.file.clone().ok_or(FormatrError::NoFile)?;
        s.next_seq += 1;
        s.in_flight += 1;
        s.phase = Phase::Executing;
        Ok(Ticket {
            generation: s.generation,
            seq: s.next_seq,
            file,
        })
    }

    /// Mark a request as finished. Returns false when the ticket belongs to
    /// a superseded file, in which case its result must be discarded.
    pub fn complete(&self, ticket: &Ticket) -> bool {
        let mut s = self.state();
        if s.generation != ticket.generation {
            return false;
        }
        s.in_flight = s.in_flight.saturating_sub(1);
        if s.in_flight == 0 {
            s.phase = Phase::ActionsShown;
        }
        true
    }

    /// Whether `ticket` still belongs to the active file.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        let s = self.state();
        s.generation == ticket.generation && s.file.is_some()
    }

    /// Record the outcome of a request as the status line, unless a newer
    /// request already reported or the file changed. Returns whether it was
    /// applied.
    pub fn report(&self, ticket: &Ticket, status: &str) -> bool {
        let mut s = self.state();
        if s.generation != ticket.generation || ticket.seq <= s.applied_seq {
            return false;
        }
        s.applied_seq = ticket.seq;
        s.status = Some(status.to_string());
        true
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn file(&self) -> Option<DroppedFile> {
        self.state().file.clone()
    }

    pub fn grid(&self) -> ActionGrid {
        self.state().grid.clone()
    }

    pub fn status(&self) -> Option<String> {
        self.state().status.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    pub fn is_empty(&self) -> bool {
        let s = self.state();
        s.file.is_none() && s.grid.is_empty() && s.phase == Phase::Empty
    }
}
