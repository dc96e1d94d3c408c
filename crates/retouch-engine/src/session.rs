//! Editor session: the orchestration running in one page context.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use retouch_bridge::Bridge;
use retouch_dom::{Document, NodeId};
use retouch_mutate::{apply_replacement, apply_rules, reapply_all};
use retouch_protocols::error::BridgeError;
use retouch_protocols::{Ack, Command, ElementSnapshot, Notice, RequestKind};
use retouch_store::{EditStore, PersistedMutation};

use crate::capture::capture;
use crate::error::EngineError;
use crate::events::PointerEvent;
use crate::notify::show_notice;
use crate::select::{SelectionController, SelectionMode};

/// How one instruction was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Local rules handled it; the mediator was never contacted.
    DirectEdit { rules: Vec<&'static str> },
    /// The mediator's markup was applied and persisted under this
    /// selector.
    AiEdit { selector: String },
}

/// One page's editing session.
///
/// Owns the document, the selection controller, and the pending
/// selection. Within one gesture, capture completes synchronously
/// before any suspension point; across gestures nothing is ordered.
pub struct EditorSession {
    doc: Document,
    origin: String,
    controller: SelectionController,
    store: Arc<dyn EditStore>,
    bridge: Bridge,
    pending: Option<(NodeId, ElementSnapshot)>,
    notices: Vec<Notice>,
}

impl EditorSession {
    /// Create a session over a document.
    pub fn new(doc: Document, store: Arc<dyn EditStore>, bridge: Bridge) -> Self {
        let origin = page_origin(doc.url());
        Self {
            doc,
            origin,
            controller: SelectionController::new(),
            store,
            bridge,
            pending: None,
            notices: Vec::new(),
        }
    }

    /// The live document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable document access for host-side updates (layout, expando
    /// props).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Storage scope of this page.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Current selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.controller.mode()
    }

    /// Snapshot of the pending selection, if a node was chosen.
    pub fn pending_selection(&self) -> Option<&ElementSnapshot> {
        self.pending.as_ref().map(|(_, snapshot)| snapshot)
    }

    /// Notices surfaced so far, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Page-load bootstrap: replay this origin's persisted mutations
    /// and restore the persisted selection mode. Returns how many
    /// mutations applied.
    pub async fn bootstrap(&mut self) -> Result<usize, EngineError> {
        let mutations = self.store.mutations(&self.origin).await?;
        let applied = reapply_all(&mut self.doc, &mutations);
        if applied < mutations.len() {
            debug!(
                skipped = mutations.len() - applied,
                "some persisted mutations did not match this document"
            );
        }
        if self.store.selection_mode(&self.origin).await? && !self.controller.is_enabled() {
            self.controller.toggle(&mut self.doc);
        }
        info!(origin = %self.origin, applied, "session bootstrapped");
        Ok(applied)
    }

    /// Handle an inbound command from the toggle UI. The mode flip is
    /// synchronous; the flag is persisted before the ack returns.
    pub async fn handle_command(&mut self, command: Command) -> Result<Ack, EngineError> {
        match command {
            Command::ToggleSelectionMode => {
                let enabled = self.controller.toggle(&mut self.doc);
                self.store
                    .set_selection_mode(&self.origin, enabled)
                    .await?;
                Ok(Ack::ok(enabled))
            }
        }
    }

    /// Route a pointer-down into the controller.
    pub fn pointer_down(&mut self, event: PointerEvent) {
        self.controller.pointer_down(&mut self.doc, event);
    }

    /// Route a pointer-move into the controller.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        self.controller.pointer_move(&mut self.doc, event);
    }

    /// Route a pointer-up into the controller. When a node is chosen
    /// its snapshot is captured immediately, before control returns to
    /// the event loop. A drag that chose nothing stays silent.
    pub fn pointer_up(&mut self, event: PointerEvent) -> Option<NodeId> {
        let chosen = self.controller.pointer_up(&mut self.doc, event)?;
        match capture(&self.doc, chosen) {
            Some(snapshot) => {
                debug!(%chosen, tag = %snapshot.tag_name, "selection captured");
                self.pending = Some((chosen, snapshot));
                Some(chosen)
            }
            None => None,
        }
    }

    /// Programmatically select a live element, capturing its snapshot
    /// immediately. Embedding hosts use this in place of a pointer
    /// gesture. Returns false when `node` is not a live element.
    pub fn select_node(&mut self, node: NodeId) -> bool {
        match capture(&self.doc, node) {
            Some(snapshot) => {
                debug!(%node, tag = %snapshot.tag_name, "selection captured");
                self.pending = Some((node, snapshot));
                true
            }
            None => false,
        }
    }

    /// Resolve the user's instruction against the pending selection:
    /// direct-edit rules first, the mediator otherwise. Failures
    /// surface a notice and leave the document unmutated.
    pub async fn submit_instruction(
        &mut self,
        instruction: &str,
    ) -> Result<EditOutcome, EngineError> {
        let (node, snapshot) = self.pending.clone().ok_or(EngineError::NoSelection)?;
        let snapshot = snapshot.with_instruction(instruction);

        if self.doc.contains(node) {
            let rules = apply_rules(&mut self.doc, node, instruction);
            if !rules.is_empty() {
                debug!(?rules, "instruction resolved by direct edit");
                self.pending = None;
                self.notify(Notice::success("Element updated"));
                return Ok(EditOutcome::DirectEdit { rules });
            }
        }

        let markup = match self
            .bridge
            .submit(snapshot.clone(), RequestKind::RewriteWithAi)
            .await
        {
            Ok(markup) => markup,
            Err(err) => {
                self.notify(Notice::error(bridge_failure_message(&err)));
                return Err(err.into());
            }
        };

        let applied = match apply_replacement(&mut self.doc, &snapshot, &markup) {
            Ok(applied) => applied,
            Err(err) => {
                self.notify(Notice::error(err.to_string()));
                return Err(err.into());
            }
        };

        if let Err(err) = self
            .store
            .upsert_mutation(
                &self.origin,
                PersistedMutation::new(&applied.selector, &applied.markup),
            )
            .await
        {
            // The live edit already landed; only persistence failed.
            warn!(error = %err, "failed to persist applied mutation");
        }

        self.pending = None;
        self.notify(Notice::success("Element updated"));
        Ok(EditOutcome::AiEdit {
            selector: applied.selector,
        })
    }

    /// Forward the pending selection to the editor endpoint. Never
    /// mutates the document.
    pub async fn forward_selection(&mut self) -> Result<(), EngineError> {
        let (_, snapshot) = self.pending.clone().ok_or(EngineError::NoSelection)?;
        match self
            .bridge
            .submit(snapshot, RequestKind::ForwardToEditor)
            .await
        {
            Ok(_) => {
                self.pending = None;
                self.notify(Notice::success("Element sent to editor"));
                Ok(())
            }
            Err(err) => {
                self.notify(Notice::error(bridge_failure_message(&err)));
                Err(err.into())
            }
        }
    }

    fn notify(&mut self, notice: Notice) {
        show_notice(&mut self.doc, &notice);
        self.notices.push(notice);
    }
}

/// User-facing message per bridge failure kind.
fn bridge_failure_message(err: &BridgeError) -> String {
    match err {
        BridgeError::MissingCredential => {
            "No mediator key is configured. Set one up before requesting AI edits.".to_string()
        }
        BridgeError::Unreachable(detail) => {
            format!("Could not reach the mediator: {detail}")
        }
        BridgeError::Rejected { status, message } => {
            format!("The mediator rejected the request ({status}): {message}")
        }
        BridgeError::MalformedReply(detail) => {
            format!("The mediator reply was unusable: {detail}")
        }
    }
}

/// Storage scope for a page URL: its origin, falling back to the raw
/// URL when it does not parse.
fn page_origin(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.origin().ascii_serialization())
        .unwrap_or_else(|_| url.to_string())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
