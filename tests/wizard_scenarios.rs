//! End-to-end flows through the public wizard API.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use stepwise::surface::{Action, ControlState, MemorySurface, RowClass};
use stepwise::uid::UidCounter;
use stepwise::wizard::NavKey;
use stepwise::{
    HookOutcome, Hooks, Step, StepChange, StepsError, TransitionEffect, Wizard, WizardBuilder,
    WizardEvent, WizardOptions,
};

const MARKUP: &str = r#"
<h1>Account</h1>
<div><p>Choose a user name.</p></div>
<h1>Profile</h1>
<div data-mode="iframe" data-url="/profile"></div>
<h1>Confirm</h1>
<div><p>All done?</p></div>
"#;

fn build(options: WizardOptions, hooks: Hooks) -> Wizard<MemorySurface> {
    WizardBuilder::new(options)
        .uid_from(&UidCounter::new())
        .hooks(hooks)
        .build_from_markup(MARKUP, MemorySurface::new())
        .unwrap()
}

#[test]
fn test_walk_through_to_finish() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let changed = Rc::clone(&log);
    let finished = Rc::clone(&log);
    let hooks = Hooks::new()
        .on_step_changed(move |current, prior| {
            changed.borrow_mut().push(format!("changed {prior}->{current}"));
        })
        .on_finished(move |current| finished.borrow_mut().push(format!("finished {current}")));
    let mut w = build(WizardOptions::default(), hooks);

    assert_eq!(w.step_count(), 3);
    assert_eq!(w.surface().rows_with(RowClass::Disabled), vec![1, 2]);

    assert!(w.dispatch(WizardEvent::ActionClicked(Action::Next)).unwrap());
    assert!(w.dispatch(WizardEvent::Key(NavKey::Right)).unwrap());
    assert_eq!(w.surface().action(Action::Next), Some(ControlState::hidden()));
    assert_eq!(w.surface().action(Action::Finish), Some(ControlState::shown(true)));

    assert!(w.dispatch(WizardEvent::ActionClicked(Action::Finish)).unwrap());
    assert_eq!(w.current_index(), 2);
    assert!(w.row_classes(2).unwrap().contains(&RowClass::Done));
    assert_eq!(
        *log.borrow(),
        ["changed 0->1", "changed 1->2", "finished 2"]
    );
}

#[test]
fn test_guarded_step_and_jump_back() {
    let accepted = Rc::new(RefCell::new(false));
    let gate = Rc::clone(&accepted);
    let hooks = Hooks::new().on_step_changing(move |current, target| {
        HookOutcome::from(target < current || *gate.borrow())
    });
    let mut w = build(WizardOptions::default(), hooks);

    assert_eq!(w.go_to_step(1).unwrap(), StepChange::Vetoed);
    assert!(w.row_classes(0).unwrap().contains(&RowClass::Error));

    *accepted.borrow_mut() = true;
    assert_eq!(w.go_to_step(2).unwrap(), StepChange::Changed);
    assert!(w.row_classes(0).unwrap().contains(&RowClass::Done));
    assert!(!w.row_classes(0).unwrap().contains(&RowClass::Error));

    assert!(w.click_step(0).unwrap());
    assert_eq!(w.current_index(), 0);
    assert_eq!(
        w.go_to_step(7).unwrap_err(),
        StepsError::IndexOutOfRange { index: 7, count: 3 }
    );
}

#[test]
fn test_editing_steps_while_running() {
    let mut w = build(WizardOptions::default(), Hooks::new());
    w.next().unwrap();

    w.insert(0, Step::html("Welcome", "<p>hello</p>")).unwrap();
    w.add(Step::html("Receipt", "<p>thanks</p>")).unwrap();
    assert_eq!(w.current_index(), 2);
    assert_eq!(w.current_step().unwrap().title, "Profile");
    assert!(!w.remove(2).unwrap());

    assert!(w.remove(1).unwrap());
    let titles: Vec<_> = w.steps().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Welcome", "Profile", "Confirm", "Receipt"]);
    assert_eq!(w.surface().rows_with(RowClass::Current), vec![1]);
    assert_eq!(w.surface().rows_with(RowClass::Last), vec![3]);
    assert!(w.surface().rows[3].label.contains("4."));
}

#[test]
fn test_fade_settles_on_clock() {
    let options = WizardOptions {
        transition_effect: TransitionEffect::Fade,
        transition_effect_speed: 100,
        ..WizardOptions::default()
    };
    let mut w = build(options, Hooks::new());
    let start = Instant::now();

    w.next().unwrap();
    assert!(w.is_transitioning());
    assert_eq!(w.pending_show(), Some(1));

    w.advance(start);
    assert!(w.is_transitioning());
    w.advance(start + Duration::from_secs(5));
    w.settle();
    assert!(!w.is_transitioning());
    assert_eq!(w.surface().visible_panels(), vec![1]);
}

#[test]
fn test_destroy_returns_unmounted_surface() {
    let w = build(WizardOptions::default(), Hooks::new());
    let surface = w.destroy();
    assert!(!surface.is_mounted());
    assert!(surface.rows.is_empty());
}
