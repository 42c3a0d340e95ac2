use std::sync::Arc;

use tracing::{debug, warn};

use super::error::NavError;
use super::graph::{Node, NodeGraph};

pub const DEFAULT_SETTLE_DELAY_SECS: f64 = 0.15;

#[derive(Clone, Debug, PartialEq, Eq)]
enum TransitionEffect {
    Advance { target: String },
    Back,
    Restart,
}

/// A transition waiting for its settle deadline. Dropping it cancels it.
#[derive(Clone, Debug, PartialEq)]
struct PendingTransition {
    started_at: f64,
    due_at: f64,
    effect: TransitionEffect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Breadcrumb {
    pub node_id: String,
    pub label: String,
    pub is_current: bool,
}

pub struct Navigator {
    graph: Arc<NodeGraph>,
    settle_delay: f64,
    current: String,
    history: Vec<String>,
    pending: Option<PendingTransition>,
    settled_at: Option<f64>,
}

impl Navigator {
    pub fn new(graph: Arc<NodeGraph>, settle_delay: f64) -> Self {
        let current = graph.entry_id().to_owned();
        Self {
            graph,
            settle_delay: settle_delay.max(0.0),
            current,
            history: Vec::new(),
            pending: None,
            settled_at: None,
        }
    }

    pub fn graph(&self) -> &Arc<NodeGraph> {
        &self.graph
    }

    pub fn current_id(&self) -> &str {
        &self.current
    }

    pub fn current_node(&self) -> Option<&Node> {
        self.graph.get(&self.current)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn step_number(&self) -> usize {
        self.history.len() + 1
    }

    /// Progress bar fill: ten percent per step, capped at full.
    pub fn progress_fraction(&self) -> f32 {
        (self.step_number() as f32 * 0.1).min(1.0)
    }

    /// Progress of the in-flight transition in `0.0..=1.0`, or `None` when idle.
    pub fn transition_progress(&self, now: f64) -> Option<f32> {
        let pending = self.pending.as_ref()?;
        let span = pending.due_at - pending.started_at;
        if span <= f64::EPSILON {
            return Some(1.0);
        }
        Some(((now - pending.started_at) / span).clamp(0.0, 1.0) as f32)
    }

    /// Opacity of the current step's card: falls to zero while a transition
    /// settles, then climbs back to one over the same span once it has applied.
    pub fn visibility(&self, now: f64) -> f32 {
        if let Some(progress) = self.transition_progress(now) {
            return 1.0 - progress;
        }
        match self.settled_at {
            Some(settled_at) if self.settle_delay > f64::EPSILON => {
                ((now - settled_at) / self.settle_delay).clamp(0.0, 1.0) as f32
            }
            _ => 1.0,
        }
    }

    /// Seconds until the pending transition settles.
    pub fn time_until_settle(&self, now: f64) -> Option<f64> {
        self.pending
            .as_ref()
            .map(|pending| (pending.due_at - now).max(0.0))
    }

    /// Schedules a move to `target`.
    ///
    /// History and the current node change together when the transition
    /// settles, so until then "Step N" and the breadcrumbs still describe the
    /// node being left.
    pub fn navigate_to(&mut self, target: &str, now: f64) -> Result<(), NavError> {
        self.ensure_idle()?;
        if !self.graph.contains(target) {
            warn!(node = target, "navigation to unknown node ignored");
            return Err(NavError::UnknownNode(target.to_owned()));
        }

        debug!(from = %self.current, to = target, "navigation scheduled");
        self.schedule(
            TransitionEffect::Advance {
                target: target.to_owned(),
            },
            now,
        );
        Ok(())
    }

    pub fn go_back(&mut self, now: f64) -> Result<(), NavError> {
        self.ensure_idle()?;
        if self.history.is_empty() {
            return Err(NavError::EmptyHistory);
        }

        debug!(from = %self.current, "back navigation scheduled");
        self.schedule(TransitionEffect::Back, now);
        Ok(())
    }

    pub fn restart(&mut self, now: f64) -> Result<(), NavError> {
        self.ensure_idle()?;

        debug!(from = %self.current, "restart scheduled");
        self.schedule(TransitionEffect::Restart, now);
        Ok(())
    }

    /// Jumps straight to the crumb at `index`, truncating history to `[0, index)`.
    ///
    /// Takes effect immediately; like every other request it is refused while a
    /// transition is pending. The trailing crumb (the current node) is a no-op.
    pub fn jump_to_breadcrumb(&mut self, index: usize) -> Result<(), NavError> {
        self.ensure_idle()?;

        let len = self.history.len();
        if index == len {
            return Ok(());
        }
        if index > len {
            return Err(NavError::BreadcrumbOutOfRange { index, len });
        }

        let target = self.history[index].clone();
        self.history.truncate(index);
        debug!(from = %self.current, to = %target, index, "jumped to breadcrumb");
        self.current = target;
        Ok(())
    }

    /// Applies a due transition. Returns `true` when the current node changed.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(pending) = self.pending.take_if(|pending| now >= pending.due_at) else {
            return false;
        };

        match pending.effect {
            TransitionEffect::Advance { target } => {
                let previous = std::mem::replace(&mut self.current, target);
                self.history.push(previous);
            }
            TransitionEffect::Back => {
                if let Some(previous) = self.history.pop() {
                    self.current = previous;
                }
            }
            TransitionEffect::Restart => {
                self.history.clear();
                self.current = self.graph.entry_id().to_owned();
            }
        }

        self.settled_at = Some(now);
        debug!(current = %self.current, depth = self.history.len(), "transition settled");
        true
    }

    /// Drops any pending transition without applying it. Returns whether one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.pending.take().is_some();
        if cancelled {
            debug!(current = %self.current, "pending transition cancelled");
        }
        cancelled
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.history
            .iter()
            .map(|id| (id, false))
            .chain(std::iter::once((&self.current, true)))
            .map(|(id, is_current)| Breadcrumb {
                node_id: id.clone(),
                label: self
                    .graph
                    .get(id)
                    .map(Node::label)
                    .unwrap_or_else(|| id.clone()),
                is_current,
            })
            .collect()
    }

    fn ensure_idle(&self) -> Result<(), NavError> {
        if self.pending.is_some() {
            debug!(current = %self.current, "navigation ignored while transitioning");
            return Err(NavError::Busy);
        }
        Ok(())
    }

    fn schedule(&mut self, effect: TransitionEffect, now: f64) {
        self.pending = Some(PendingTransition {
            started_at: now,
            due_at: now + self.settle_delay,
            effect,
        });
    }
}
