use crate::domain::envelope::{ResultBoard, ResultEnvelope};
use crate::domain::log::{LogBus, Severity};
use crate::domain::payment::FormParams;
use crate::domain::ports::{MountSurfacesHandle, PaymentClient};
use crate::domain::widget::{OutcomeCallbacks, SessionPhase, WidgetKind, WidgetOutcome};
use crate::error::{HarnessError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
struct LiveSession {
    id: u64,
    kind: WidgetKind,
    phase: SessionPhase,
}

#[derive(Default)]
struct SessionTable {
    next_id: u64,
    live: HashMap<String, LiveSession>,
}

struct BridgeShared {
    surfaces: MountSurfacesHandle,
    log: LogBus,
    results: ResultBoard,
    sessions: Mutex<SessionTable>,
}

/// Reconciles a widget's mount call with its later, callback-driven outcome.
///
/// Sessions are keyed by target surface. Each mount gets a fresh session id
/// that its callbacks carry; an outcome is only accepted while the surface
/// still holds that exact session in the `Mounted` phase. Clearing the
/// surface, remounting on it, or a failed mount all make older callbacks
/// stale, and stale outcomes are dropped without an envelope or log entry.
/// A session also ends when its callbacks fire before the mount resolves or
/// after its surface has gone away; nothing is reported in either case.
#[derive(Clone)]
pub struct WidgetOutcomeBridge {
    shared: Arc<BridgeShared>,
}

impl WidgetOutcomeBridge {
    pub fn new(surfaces: MountSurfacesHandle, log: LogBus, results: ResultBoard) -> Self {
        Self {
            shared: Arc::new(BridgeShared {
                surfaces,
                log,
                results,
                sessions: Mutex::new(SessionTable::default()),
            }),
        }
    }

    /// Mounts a widget of `kind` on `params.selector`.
    ///
    /// The returned envelope only describes the mount call; the interaction
    /// outcome is published separately once the client fires a callback.
    pub async fn mount(
        &self,
        client: &dyn PaymentClient,
        kind: WidgetKind,
        params: FormParams,
    ) -> Result<ResultEnvelope> {
        let target = params.selector.clone();
        if !self.shared.surfaces.exists(&target) {
            return Err(HarnessError::MountTarget(target));
        }

        let session_id = self.open_session(&target, kind);
        let callbacks = self.callbacks_for(target.clone(), session_id);

        let mounted = match kind {
            WidgetKind::Card => client.mount_card_form(params, callbacks).await,
            WidgetKind::Token => client.mount_token_form(params, callbacks).await,
        };

        match mounted {
            Ok(()) => {
                self.mark_mounted(&target, session_id);
                Ok(ResultEnvelope::ok(format!(
                    "{} mounted successfully on '{target}'",
                    capitalize(kind.form_name())
                )))
            }
            Err(reason) => {
                self.close_session(&target, session_id);
                let err = HarnessError::Mount {
                    widget: kind,
                    reason,
                };
                self.shared.surfaces.show_notice(&target, &err.to_string());
                Err(err)
            }
        }
    }

    /// Clears `target` and drops any pending session on it.
    pub fn clear_surface(&self, target: &str) {
        if let Some(session) = self.shared.sessions.lock().live.remove(target) {
            tracing::debug!(target_surface = target, kind = ?session.kind, "pending session cleared");
        }
        self.shared.surfaces.clear(target);
    }

    /// Clears every surface and pending session.
    pub fn clear_all(&self) {
        self.shared.sessions.lock().live.clear();
        self.shared.surfaces.clear_all();
    }

    pub fn session_phase(&self, target: &str) -> Option<SessionPhase> {
        self.shared
            .sessions
            .lock()
            .live
            .get(target)
            .map(|session| session.phase)
    }

    pub fn pending_sessions(&self) -> usize {
        self.shared.sessions.lock().live.len()
    }

    fn open_session(&self, target: &str, kind: WidgetKind) -> u64 {
        let mut table = self.shared.sessions.lock();
        let id = table.next_id;
        table.next_id += 1;
        let replaced = table.live.insert(
            target.to_string(),
            LiveSession {
                id,
                kind,
                phase: SessionPhase::Requested,
            },
        );
        if replaced.is_some() {
            tracing::debug!(target_surface = target, "previous session replaced");
        }
        id
    }

    fn mark_mounted(&self, target: &str, session_id: u64) {
        let mut table = self.shared.sessions.lock();
        if let Some(session) = table.live.get_mut(target)
            && session.id == session_id
        {
            session.phase = SessionPhase::Mounted;
        }
    }

    fn close_session(&self, target: &str, session_id: u64) {
        let mut table = self.shared.sessions.lock();
        if table.live.get(target).is_some_and(|s| s.id == session_id) {
            table.live.remove(target);
        }
    }

    fn callbacks_for(&self, target: String, session_id: u64) -> OutcomeCallbacks {
        let shared = Arc::clone(&self.shared);
        OutcomeCallbacks::new(move |outcome| shared.deliver(&target, session_id, outcome))
    }
}

impl BridgeShared {
    fn deliver(&self, target: &str, session_id: u64, outcome: WidgetOutcome) {
        let kind = {
            let mut table = self.sessions.lock();
            let session = match table.live.get(target) {
                Some(session) if session.id == session_id => *session,
                _ => {
                    tracing::debug!(target_surface = target, session_id, "ignoring stale widget outcome");
                    return;
                }
            };
            // The callbacks are spent either way, so the session ends here.
            table.live.remove(target);

            if session.phase != SessionPhase::Mounted {
                tracing::debug!(target_surface = target, session_id, "outcome fired before mount resolved");
                return;
            }
            if !self.surfaces.exists(target) {
                tracing::debug!(target_surface = target, session_id, "surface gone, dropping outcome");
                return;
            }
            session.kind
        };

        let (envelope, severity) = match outcome {
            WidgetOutcome::Succeeded(result) => {
                let id = kind.result_id(&result).unwrap_or("unknown");
                let envelope = ResultEnvelope::ok(kind.success_message(id)).with_data(result.clone());
                self.surfaces.render_detail(target, &result);
                (envelope, Severity::Success)
            }
            WidgetOutcome::Failed(reason) => (
                HarnessError::Interaction {
                    widget: kind,
                    reason,
                }
                .into(),
                Severity::Error,
            ),
            WidgetOutcome::Cancelled => (
                HarnessError::InteractionCancelled(kind).into(),
                Severity::Error,
            ),
        };

        self.log.append(envelope.message(), severity);
        self.results.publish(kind.outcome_slot(), envelope);
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
