//! Callbacks fired around step changes and finishing.

/// Answer of a cancelable hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookOutcome {
    #[default]
    Proceed,
    Veto,
}

impl HookOutcome {
    pub fn is_veto(self) -> bool {
        self == HookOutcome::Veto
    }
}

impl From<bool> for HookOutcome {
    fn from(proceed: bool) -> Self {
        if proceed {
            HookOutcome::Proceed
        } else {
            HookOutcome::Veto
        }
    }
}

type ChangingFn = Box<dyn FnMut(usize, usize) -> HookOutcome>;
type ChangedFn = Box<dyn FnMut(usize, usize)>;
type FinishingFn = Box<dyn FnMut(usize) -> HookOutcome>;
type FinishedFn = Box<dyn FnMut(usize)>;

/// Hook set of one wizard. Unset hooks proceed.
#[derive(Default)]
pub struct Hooks {
    on_step_changing: Option<ChangingFn>,
    on_step_changed: Option<ChangedFn>,
    on_finishing: Option<FinishingFn>,
    on_finished: Option<FinishedFn>,
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("on_step_changing", &self.on_step_changing.is_some())
            .field("on_step_changed", &self.on_step_changed.is_some())
            .field("on_finishing", &self.on_finishing.is_some())
            .field("on_finished", &self.on_finished.is_some())
            .finish()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with `(current, target)` before a step change; may veto it.
    pub fn on_step_changing(
        mut self,
        f: impl FnMut(usize, usize) -> HookOutcome + 'static,
    ) -> Self {
        self.on_step_changing = Some(Box::new(f));
        self
    }

    /// Called with `(new, old)` after a step change.
    pub fn on_step_changed(mut self, f: impl FnMut(usize, usize) + 'static) -> Self {
        self.on_step_changed = Some(Box::new(f));
        self
    }

    /// Called with the current index before finishing; may veto it.
    pub fn on_finishing(mut self, f: impl FnMut(usize) -> HookOutcome + 'static) -> Self {
        self.on_finishing = Some(Box::new(f));
        self
    }

    pub fn on_finished(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_finished = Some(Box::new(f));
        self
    }

    pub(crate) fn step_changing(&mut self, current: usize, target: usize) -> HookOutcome {
        self.on_step_changing
            .as_mut()
            .map_or(HookOutcome::Proceed, |f| f(current, target))
    }

    pub(crate) fn step_changed(&mut self, current: usize, old: usize) {
        if let Some(f) = self.on_step_changed.as_mut() {
            f(current, old);
        }
    }

    pub(crate) fn finishing(&mut self, current: usize) -> HookOutcome {
        self.on_finishing
            .as_mut()
            .map_or(HookOutcome::Proceed, |f| f(current))
    }

    pub(crate) fn finished(&mut self, current: usize) {
        if let Some(f) = self.on_finished.as_mut() {
            f(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_unset_hooks_proceed() {
        let mut hooks = Hooks::new();
        assert_eq!(hooks.step_changing(0, 1), HookOutcome::Proceed);
        assert_eq!(hooks.finishing(2), HookOutcome::Proceed);
        hooks.step_changed(1, 0);
        hooks.finished(2);
    }

    #[test]
    fn test_outcome_from_bool() {
        assert_eq!(HookOutcome::from(true), HookOutcome::Proceed);
        assert!(HookOutcome::from(false).is_veto());
    }

    #[test]
    fn test_hooks_receive_arguments() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut hooks = Hooks::new()
            .on_step_changing(|_, target| (target != 2).into())
            .on_step_changed(move |new, old| log.borrow_mut().push((new, old)));

        assert_eq!(hooks.step_changing(0, 1), HookOutcome::Proceed);
        assert_eq!(hooks.step_changing(1, 2), HookOutcome::Veto);
        hooks.step_changed(1, 0);
        assert_eq!(*seen.borrow(), vec![(1, 0)]);
    }
}
