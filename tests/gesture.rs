use std::rc::Rc;

use pilltoast::prelude::*;

const POINTER: u32 = 7;

fn setup(options: ToastOptions) -> (Rc<Surface>, ToastHandle) {
    let _ = env_logger::builder().is_test(true).try_init();
    let surface = Surface::new(SurfaceConfig::new());
    let toaster = Toaster::new(surface.clone());
    let toast = toaster.create(options);
    surface.advance(100);
    (surface, toast)
}

/// Press on the header at y=200, drag to `200 + delta`, and release after `duration` ms.
fn swipe(surface: &Surface, toast: &ToastHandle, delta: f32, duration: u64) {
    let header = toast.nodes().header;
    surface.pointer_down(POINTER, 10.0, 200.0, header);
    surface.pointer_move(POINTER, 10.0, 200.0 + delta / 2.0, header);
    surface.advance(duration);
    surface.pointer_move(POINTER, 10.0, 200.0 + delta, header);
    surface.pointer_up(POINTER, 10.0, 200.0 + delta, header);
}

#[test]
fn test_drag_feedback_applies_inline() {
    let (surface, toast) = setup(ToastOptions::new().title("Drag me"));
    let node = toast.nodes().toast;
    let header = toast.nodes().header;

    surface.pointer_down(POINTER, 0.0, 300.0, header);
    surface.with_document(|doc| {
        assert!(doc.has_class(node, Classes::SWIPING));
        assert_eq!(doc.pointer_capture(POINTER), Some(node));
    });

    surface.pointer_move(POINTER, 0.0, 225.0, header);
    surface.with_document(|doc| {
        let transform = doc.computed_transform(node);
        assert_eq!(transform.translate_y, -75.0);
        assert!((transform.scale - 0.96).abs() < 1e-6);
        assert!((doc.computed_opacity(node) - 0.7).abs() < 1e-6);
    });

    // Downward drags are damped
    surface.pointer_move(POINTER, 0.0, 350.0, header);
    surface.with_document(|doc| {
        assert_eq!(doc.computed_transform(node).translate_y, 10.0);
        assert_eq!(doc.computed_opacity(node), 1.0);
    });
}

#[test]
fn test_far_swipe_commits_regardless_of_speed() {
    let (surface, toast) = setup(ToastOptions::new().title("Far"));
    let nodes = toast.nodes();

    swipe(&surface, &toast, -61.0, 10_000);
    assert!(!toast.is_dead());
    surface.with_document(|doc| {
        assert!(!doc.style(nodes.toast).unwrap().pointer_events);
        assert!(!doc.has_class(nodes.toast, Classes::SWIPING));
    });

    surface.advance(149);
    assert!(!toast.is_dead());
    surface.advance(1);
    assert_eq!(toast.state(), ToastState::Dismissing);
    surface.with_document(|doc| {
        // A swiped toast has already left; it does not replay the exit animation
        assert!(!doc.has_class(nodes.toast, Classes::EXIT));
        // Flying out past the release point
        let style = doc.style(nodes.toast).unwrap();
        assert_eq!(style.transform.translate_y, -141.0);
        assert_eq!(style.transform.scale, 0.85);
        assert_eq!(style.opacity, 0.0);
    });

    surface.advance(449);
    assert!(surface.with_document(|doc| doc.contains(nodes.wrapper)));
    surface.advance(1);
    assert_eq!(toast.state(), ToastState::Removed);
    assert!(!surface.with_document(|doc| doc.contains(nodes.wrapper)));
}

#[test]
fn test_slow_short_swipe_snaps_back() {
    let (surface, toast) = setup(ToastOptions::new().title("Slow"));
    let node = toast.nodes().toast;

    swipe(&surface, &toast, -59.0, 200);
    assert!(surface.with_document(|doc| doc.has_class(node, Classes::SNAP_BACK)));
    surface.with_document(|doc| {
        assert!(doc.is_transitioning(node, Property::Transform));
        assert_eq!(doc.computed_transform(node).translate_y, -59.0);
    });

    surface.advance(1_000);
    assert_eq!(toast.state(), ToastState::Collapsed);
    surface.with_document(|doc| {
        assert!(!doc.has_class(node, Classes::SNAP_BACK));
        assert!(doc.computed_transform(node).is_identity());
        assert_eq!(doc.computed_opacity(node), 1.0);
        // Only the four pointer listeners remain
        assert_eq!(doc.listener_count(node), 4);
    });
}

#[test]
fn test_snap_back_clears_on_transition_end() {
    let (surface, toast) = setup(ToastOptions::new().title("Snap"));
    let node = toast.nodes().toast;

    swipe(&surface, &toast, -30.0, 500);
    surface.advance(299);
    assert!(surface.with_document(|doc| doc.has_class(node, Classes::SNAP_BACK)));
    surface.advance(1);
    assert!(!surface.with_document(|doc| doc.has_class(node, Classes::SNAP_BACK)));
}

#[test]
fn test_snap_back_falls_back_without_transition() {
    let (surface, toast) = setup(ToastOptions::new().title("Tap"));
    let node = toast.nodes().toast;
    let header = toast.nodes().header;

    // A press without movement has nothing to animate back, so no transitionend arrives
    surface.pointer_down(POINTER, 0.0, 200.0, header);
    surface.pointer_up(POINTER, 0.0, 200.0, header);
    surface.with_document(|doc| {
        assert!(doc.has_class(node, Classes::SNAP_BACK));
        assert!(!doc.is_transitioning(node, Property::Transform));
    });

    surface.advance(499);
    assert!(surface.with_document(|doc| doc.has_class(node, Classes::SNAP_BACK)));
    surface.advance(1);
    surface.with_document(|doc| {
        assert!(!doc.has_class(node, Classes::SNAP_BACK));
        assert_eq!(doc.listener_count(node), 4);
    });
}

#[test]
fn test_flick_commits_only_when_fast() {
    let (surface, toast) = setup(ToastOptions::new().title("Flick"));
    swipe(&surface, &toast, -25.0, 40);
    surface.advance(150);
    assert!(toast.is_dead());

    let (surface, toast) = setup(ToastOptions::new().title("Nudge"));
    swipe(&surface, &toast, -25.0, 60);
    surface.advance(150);
    assert!(!toast.is_dead());
}

#[test]
fn test_downward_swipe_never_commits() {
    let (surface, toast) = setup(ToastOptions::new().title("Down"));
    swipe(&surface, &toast, 400.0, 1);
    surface.advance(1_000);
    assert!(!toast.is_dead());
}

#[test]
fn test_pointer_cancel_snaps_back() {
    let (surface, toast) = setup(ToastOptions::new().title("Cancel"));
    let node = toast.nodes().toast;
    let header = toast.nodes().header;

    surface.pointer_down(POINTER, 0.0, 200.0, header);
    surface.pointer_move(POINTER, 0.0, 100.0, header);
    surface.pointer_cancel(POINTER, 0.0, 100.0, header);
    surface.with_document(|doc| {
        assert!(doc.has_class(node, Classes::SNAP_BACK));
        assert!(!doc.has_class(node, Classes::SWIPING));
        assert!(doc.pointer_capture(POINTER).is_none());
    });

    surface.advance(1_000);
    assert!(!toast.is_dead());
    assert!(surface.with_document(|doc| doc.computed_transform(node).is_identity()));
}

#[test]
fn test_press_on_button_does_not_start_swipe() {
    let (surface, toast) = setup(
        ToastOptions::new()
            .title("Undo?")
            .description("Removed 3 items")
            .action_label("Undo")
            .expand_delay_ms(0),
    );
    surface.advance(1_000);
    let node = toast.nodes().toast;
    let button = toast.button().unwrap();

    surface.pointer_down(POINTER, 0.0, 200.0, button);
    surface.pointer_move(POINTER, 0.0, 0.0, button);
    surface.pointer_up(POINTER, 0.0, 0.0, button);
    surface.advance(1_000);

    assert!(!toast.is_dead());
    surface.with_document(|doc| {
        assert!(!doc.has_class(node, Classes::SWIPING));
        assert!(doc.computed_transform(node).is_identity());
    });
}

#[test]
fn test_swipe_disabled() {
    let (surface, toast) = setup(ToastOptions::new().title("Pinned").swipe_dismiss(false));
    let node = toast.nodes().toast;
    assert_eq!(surface.with_document(|doc| doc.listener_count(node)), 0);

    swipe(&surface, &toast, -200.0, 10);
    surface.advance(1_000);
    assert!(!toast.is_dead());
    assert!(!surface.with_document(|doc| doc.has_class(node, Classes::SWIPE_ENABLED)));
}

#[test]
fn test_swipe_timer_and_explicit_dismiss_remove_once() {
    let (surface, toast) = setup(ToastOptions::new().title("Race").auto_dismiss_after_ms(900));
    // Auto-dismiss is due at 932; the swipe commits at 900 and would dismiss at 1050
    surface.advance_to(900);
    swipe(&surface, &toast, -100.0, 0);
    let removed_before = surface.with_document(|doc| doc.stats().removed);

    surface.advance(32);
    assert_eq!(toast.state(), ToastState::Dismissing);
    toast.dismiss();
    surface.advance(5_000);

    assert_eq!(toast.state(), ToastState::Removed);
    assert_eq!(
        surface.with_document(|doc| doc.stats().removed),
        removed_before + 1
    );
}
