use std::rc::Rc;

use pilltoast::prelude::*;

fn surface() -> Rc<Surface> {
    let _ = env_logger::builder().is_test(true).try_init();
    Surface::new(SurfaceConfig::new().viewport_width(390.0))
}

#[test]
fn test_toasters_share_one_viewport() {
    let surface = surface();
    let viewport = Rc::new(ViewportManager::new());
    let first = Toaster::with_viewport(surface.clone(), viewport.clone());
    let second = Toaster::with_viewport(surface.clone(), viewport.clone());

    let a = first.create(ToastOptions::new().title("A"));
    let b = second.create(ToastOptions::new().title("B"));

    let container = viewport.current().unwrap();
    surface.with_document(|doc| {
        assert_eq!(doc.parent(a.nodes().wrapper), Some(container));
        assert_eq!(doc.parent(b.nodes().wrapper), Some(container));
        assert_eq!(doc.children(doc.body()), &[container]);
    });
}

#[test]
fn test_viewport_is_recreated_when_detached() {
    let surface = surface();
    let toaster = Toaster::new(surface.clone());
    let old = toaster.create(ToastOptions::new().title("Old"));
    let old_viewport = toaster.viewport().current().unwrap();

    // Something else wiped the page
    surface.with_document_mut(|doc| doc.remove(old_viewport));
    assert!(!surface.with_document(|doc| doc.contains(old.nodes().wrapper)));

    let fresh = toaster.create(ToastOptions::new().title("Fresh"));
    let new_viewport = toaster.viewport().current().unwrap();
    assert_ne!(old_viewport, new_viewport);
    surface.with_document(|doc| {
        assert!(doc.is_attached(fresh.nodes().wrapper));
        assert_eq!(doc.parent(fresh.nodes().wrapper), Some(new_viewport));
    });

    // The orphaned toast still runs its lifecycle without a document to touch
    old.dismiss();
    surface.advance(1_000);
    assert_eq!(old.state(), ToastState::Removed);
    assert_eq!(fresh.state(), ToastState::Collapsed);
}

#[test]
fn test_toast_outlives_surface() {
    let surface = surface();
    let toaster = Toaster::new(surface.clone());
    let toast = toaster.create(
        ToastOptions::new()
            .description("Body")
            .auto_dismiss_after_ms(1_000),
    );
    surface.advance(100);
    assert!(surface.scheduler().has_pending());

    let weak_surface = Rc::downgrade(&surface);
    let weak_scheduler = Rc::downgrade(surface.scheduler());
    drop(toaster);
    drop(surface);
    // Pending toast timers must not keep the clock alive
    assert!(weak_surface.upgrade().is_none());
    assert!(weak_scheduler.upgrade().is_none());

    // Mutators on a toast whose surface is gone quietly do nothing
    toast.set_title("Late", None);
    toast.expand();
    toast.dismiss();
    assert!(toast.is_dead());
}
