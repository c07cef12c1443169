//! Drives a desktop without a window: a recorded input script, a manual clock
//! and a renderer that only records draw calls.
//!
//! Run with `RUST_LOG=weft=debug cargo run -p weft --example headless` to see
//! the frame spans and focus changes.

use weft::prelude::*;
use winit::event::MouseButton;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let input = InputRecorder::new();
    let clock = ManualClock::new();
    let mut desktop = Desktop::new(Box::new(input.clone()), Box::new(clock.clone()));
    desktop.set_bounds(Rect::new(0.0, 0.0, 640.0, 480.0));

    let tree = desktop.tree_mut();
    let window = tree.create(Window::new("Greeting"));
    {
        let mut handle = tree.widget_mut(window)?;
        handle.set_width(Some(240.0))?;
        handle.set_height(Some(120.0))?;
    }
    let label = tree.create(Label::new("/c[yellow]hello/cd from weft"));
    tree.add_child(window, label)?;

    if let Some(behavior) = desktop.tree().behavior::<Window>(window) {
        behavior.closed.connect(|_| println!("window closed"));
    }
    desktop.show_window(window, false, None)?;

    let mut renderer = RecordingRenderer::new();
    let stats = desktop.render(&mut renderer);
    println!(
        "first frame: {} draws, {} state changes, texts {:?}",
        stats.draw_calls,
        stats.state_changes,
        renderer.texts()
    );

    // Double click in the middle of the window, then close it with Escape.
    let center = Point::new(320.0, 240.0);
    input.set_mouse_position(center);
    for ms in [0, 50, 100, 150] {
        input.set_button(MouseButton::Left, ms % 100 == 0);
        clock.set_ms(ms);
        renderer.clear();
        desktop.render(&mut renderer);
    }

    input.press_key(Key::Escape);
    clock.set_ms(200);
    desktop.render(&mut renderer);
    input.release_key(Key::Escape);
    desktop.render(&mut renderer);

    println!("top-level widgets left: {}", desktop.widgets().len());
    Ok(())
}
