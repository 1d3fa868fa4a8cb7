//! Visual handoff between content panels.
//!
//! Animations are started on the surface immediately; their completions are
//! kept on the wizard's own timeline and run by [`Wizard::advance`] or
//! [`Wizard::settle`]. Every completion addresses its step by key, so it
//! survives index shifts and is dropped if the step was removed meanwhile.

use std::time::Instant;

use super::options::TransitionEffect;
use super::step::StepKey;
use super::Wizard;
use crate::surface::{Animation, RenderSurface};

/// Deferred end of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    /// Outgoing fade/slide finished: hide it and reveal the pending panel.
    RevealPending { hidden: StepKey, reveal: Animation },
    /// Incoming fade/slide finished.
    MarkShown(StepKey),
    /// Outgoing horizontal slide finished.
    Hide(StepKey),
    /// Incoming horizontal slide finished.
    Settle(StepKey),
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Instant,
    seq: u64,
    completion: Completion,
}

/// Completions ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
pub(crate) struct Timeline {
    queue: Vec<Scheduled>,
    seq: u64,
}

impl Timeline {
    pub(crate) fn schedule(&mut self, due: Instant, completion: Completion) {
        self.seq += 1;
        self.queue.push(Scheduled {
            due,
            seq: self.seq,
            completion,
        });
    }

    fn earliest(&self) -> Option<usize> {
        self.queue
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(i, _)| i)
    }

    /// Earliest completion due at or before `now`.
    pub(crate) fn pop_due(&mut self, now: Instant) -> Option<(Instant, Completion)> {
        let i = self.earliest()?;
        if self.queue[i].due > now {
            return None;
        }
        let s = self.queue.remove(i);
        Some((s.due, s.completion))
    }

    /// Earliest completion regardless of time.
    pub(crate) fn pop_next(&mut self) -> Option<(Instant, Completion)> {
        let i = self.earliest()?;
        let s = self.queue.remove(i);
        Some((s.due, s.completion))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<S: RenderSurface> Wizard<S> {
    /// Hide panel `old` and reveal panel `index` with the configured effect.
    pub(super) fn start_transition(&mut self, index: usize, old: usize) {
        let speed = self.options.transition_duration();
        let now = Instant::now();
        let (Some(new_key), Some(old_key)) = (self.steps.key_of(index), self.steps.key_of(old))
        else {
            return;
        };

        tracing::debug!(
            uid = %self.uid.value,
            from = old,
            to = index,
            effect = ?self.options.transition_effect,
            "Starting step transition"
        );

        match self.options.transition_effect {
            TransitionEffect::Fade | TransitionEffect::Slide => {
                let (hide, reveal) = if self.options.transition_effect == TransitionEffect::Fade {
                    (Animation::FadeOut, Animation::FadeIn)
                } else {
                    (Animation::SlideUp, Animation::SlideDown)
                };

                // Last request wins: an older completion reveals this panel instead.
                self.transition_show = Some(new_key);
                self.surface.animate(old, hide, speed);
                self.timeline.schedule(
                    now + speed,
                    Completion::RevealPending {
                        hidden: old_key,
                        reveal,
                    },
                );
            }
            TransitionEffect::SlideLeft => {
                self.transition_show = None;
                let width = self.surface.panel_width(old);
                let (out_to, in_from) = if index > old {
                    (-width, width)
                } else {
                    (width, -width)
                };

                self.surface
                    .animate(old, Animation::Offset { from: 0, to: out_to }, speed);
                self.timeline.schedule(now + speed, Completion::Hide(old_key));

                self.surface.set_panel_offset(index, in_from);
                self.surface.set_panel_hidden(index, false);
                self.surface
                    .animate(index, Animation::Offset { from: in_from, to: 0 }, speed);
                self.timeline
                    .schedule(now + speed, Completion::Settle(new_key));
            }
            TransitionEffect::None => {
                self.transition_show = None;
                self.surface.set_panel_hidden(old, true);
                self.surface.set_panel_hidden(index, false);
            }
        }
    }

    fn complete(&mut self, due: Instant, completion: Completion) {
        match completion {
            Completion::RevealPending { hidden, reveal } => {
                self.hide_unless_current(hidden);
                let Some(key) = self.transition_show.take() else {
                    return;
                };
                if let Some(index) = self.steps.index_of(key) {
                    let speed = self.options.transition_duration();
                    self.surface.animate(index, reveal, speed);
                    self.timeline
                        .schedule(due + speed, Completion::MarkShown(key));
                }
            }
            Completion::MarkShown(key) => {
                if let Some(index) = self.steps.index_of(key) {
                    self.surface.set_panel_hidden(index, false);
                }
            }
            Completion::Hide(key) => {
                if let Some(index) = self.steps.index_of(key) {
                    if index != self.current_index {
                        self.surface.set_panel_offset(index, 0);
                        self.surface.set_panel_hidden(index, true);
                    }
                }
            }
            Completion::Settle(key) => {
                if let Some(index) = self.steps.index_of(key) {
                    self.surface.set_panel_offset(index, 0);
                }
            }
        }
    }

    // A stale completion never hides the panel that became current again.
    fn hide_unless_current(&mut self, key: StepKey) {
        if let Some(index) = self.steps.index_of(key) {
            if index != self.current_index {
                self.surface.set_panel_hidden(index, true);
            }
        }
    }

    /// Run every animation completion due at or before `now`.
    pub fn advance(&mut self, now: Instant) {
        while let Some((due, completion)) = self.timeline.pop_due(now) {
            self.complete(due, completion);
        }
    }

    /// Run all pending animation completions, including those they schedule.
    pub fn settle(&mut self) {
        while let Some((due, completion)) = self.timeline.pop_next() {
            self.complete(due, completion);
        }
    }

    /// Whether any animation completion is still pending.
    pub fn is_transitioning(&self) -> bool {
        !self.timeline.is_empty()
    }

    /// Step scheduled to be revealed by the pending fade/slide, if any.
    pub fn pending_show(&self) -> Option<usize> {
        self.transition_show.and_then(|key| self.steps.index_of(key))
    }
}
