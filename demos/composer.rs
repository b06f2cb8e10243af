//! Composer Example - growing text above a keyboard
//!
//! This example walks a chat composer through a typing session:
//! - The composer grows line by line and stops at four lines
//! - The keyboard slides in and the composer rides on top of it
//! - Everything runs on a Timeline advanced by a fake frame loop
//!
//! Run with: cargo run --example composer

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use spark_grow::{
    GrowingText, GrowingTextProps, GrowthConfig, KeyboardAnimationCallbacks,
    KeyboardAnimationObserver, KeyboardEventSource, KeyboardNotification, NotificationKind,
    Rect, Timeline,
};

const FRAME: Duration = Duration::from_millis(16);

fn run_frames(timeline: &Timeline, frames: u32) {
    for _ in 0..frames {
        timeline.advance(FRAME);
    }
}

fn main() {
    println!("=== spark-grow Composer Example ===\n");

    let screen = Rect::new(0.0, 0.0, 40.0, 24.0);
    let timeline = Rc::new(Timeline::new());
    let source = KeyboardEventSource::new();

    let composer = GrowingText::cells(
        GrowingTextProps {
            width: 20.0,
            config: GrowthConfig::new(1, 4),
            placeholder: Some("Message".to_string()),
            ..Default::default()
        },
        timeline.clone(),
    );
    composer.set_on_height_change(|e| println!("  height {} -> {}", e.old_height, e.new_height));
    composer.set_on_did_change_height(|e| println!("  settled at {}", e.new_height));

    let keyboard_offset = Rc::new(Cell::new(0.0f32));
    let observer = KeyboardAnimationObserver::new(&source, timeline.clone(), screen);
    let offset = keyboard_offset.clone();
    observer.subscribe(
        KeyboardAnimationCallbacks::new()
            .before(|t| println!("  keyboard {:?} over {:?}", t.kind, t.duration))
            .animation(move |t| offset.set(if t.is_showing { t.end_frame.height } else { 0.0 }))
            .on_complete(|finished, shown| {
                println!("  keyboard done: finished={finished} shown={shown}")
            }),
    );

    println!("Placeholder: \"{}\" (height {})", composer.display_text(), composer.height());

    println!("\nKeyboard shows:");
    source.post(
        KeyboardNotification::new(NotificationKind::WillShow, Rect::new(0.0, 14.0, 40.0, 10.0))
            .with_duration(0.25)
            .with_curve(7),
    );
    run_frames(&timeline, 20);
    composer.set_focused(true);

    println!("\nTyping:");
    let mut text = String::new();
    let message = "the quick brown fox jumps over the lazy dog and keeps on running far away";
    for word in message.split(' ') {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(word);
        composer.edit(text.as_str());
        run_frames(&timeline, 2);
    }
    run_frames(&timeline, 30);

    println!(
        "\nComposer: {} lines, height {}, scrolling={}",
        composer.number_of_lines(),
        composer.height(),
        composer.is_scroll_enabled()
    );
    println!(
        "Composer top edge: {}",
        screen.max_y() - keyboard_offset.get() - composer.height()
    );

    println!("\nKeyboard hides:");
    source.post(
        KeyboardNotification::new(NotificationKind::WillHide, Rect::new(0.0, 24.0, 40.0, 10.0))
            .with_duration(0.25),
    );
    run_frames(&timeline, 20);

    observer.unsubscribe();
    println!("\n=== Example Complete ===");
}
