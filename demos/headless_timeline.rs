//! Walks a few toasts through their lifecycle on a virtual clock and prints what happens.
//!
//! Run with `RUST_LOG=pilltoast=debug cargo run --example headless_timeline` to see the
//! scheduler at work.

use pilltoast::prelude::*;

fn print_states(surface: &Surface, toasts: &[(&str, &ToastHandle)]) {
    let line: Vec<String> = toasts
        .iter()
        .map(|(name, toast)| format!("{name}={:?}", toast.state()))
        .collect();
    println!("{:>5}ms  {}", surface.now(), line.join("  "));
}

fn main() {
    env_logger::init();

    let surface = Surface::new(SurfaceConfig::new().viewport_width(390.0));
    let toaster = Toaster::new(surface.clone());

    let saved = toaster.create(
        ToastOptions::new()
            .category(Category::Success)
            .title("Saved")
            .description("Your changes are live.")
            .auto_dismiss_after_ms(2_000),
    );
    let upload = toaster.create(
        ToastOptions::new()
            .category(Category::Loading)
            .theme(Theme::Dark)
            .title("Uploading...")
            .swipe_dismiss(false),
    );
    let undo = toaster.create(
        ToastOptions::new()
            .category(Category::Info)
            .title("Moved to trash")
            .description("3 items")
            .action("Undo", |toast| toast.dismiss()),
    );
    let toasts = [("saved", &saved), ("upload", &upload), ("undo", &undo)];

    for _ in 0..6 {
        surface.advance(250);
        print_states(&surface, &toasts);
    }

    // Upload finished: turn the spinner into a checkmark
    upload.set_title("Uploaded", None);
    upload.set_icon(Content::markup(pilltoast::assets::ICON_SUCCESS_DARK), true);
    upload.set_body("<p>report.pdf is ready</p>");
    upload.expand();
    print_states(&surface, &toasts);

    if let Some(button) = undo.button() {
        surface.click(button);
    }
    print_states(&surface, &toasts);

    // Flick the upload toast away; swipe is disabled so it stays put
    let header = upload.nodes().header;
    surface.pointer_down(1, 0.0, 200.0, header);
    surface.pointer_move(1, 0.0, 100.0, header);
    surface.pointer_up(1, 0.0, 100.0, header);

    let idle = surface.run_until_idle(10_000);
    print_states(&surface, &toasts);
    println!("idle: {idle}");

    upload.dismiss();
    surface.run_until_idle(10_000);
    print_states(&surface, &toasts);
    surface.with_document(|doc| println!("{:?}", doc.stats()));
}
