//! Device benchmark: per-iteration input drain into the state tables.
//!
//! Target: < 20µs for a full queue of key events

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pulseloop::input::EVENT_QUEUE_CAPACITY;
use pulseloop::{
    Input, KeyCode, KeyEvent, KeyModifiers, Keyboard, MouseButtons, Point, Pointer, PointerEvent,
};

fn keyboard_read_input_full(c: &mut Criterion) {
    let mut keyboard = Keyboard::new();

    c.bench_function("keyboard_read_input_255", |b| {
        b.iter(|| {
            for i in 0..EVENT_QUEUE_CAPACITY {
                let code = KeyCode((i % 128) as u16);
                let event = if i % 2 == 0 {
                    KeyEvent::down(code, KeyModifiers::SHIFT)
                } else {
                    KeyEvent::released(code, KeyModifiers::empty())
                };
                keyboard.queue_event(event);
            }
            black_box(keyboard.read_input())
        });
    });
}

fn keyboard_read_input_empty(c: &mut Criterion) {
    let mut keyboard = Keyboard::new();

    c.bench_function("keyboard_read_input_empty", |b| {
        b.iter(|| black_box(keyboard.read_input()))
    });
}

fn pointer_read_input_moves(c: &mut Criterion) {
    let mut pointer = Pointer::new();

    c.bench_function("pointer_read_input_255_moves", |b| {
        b.iter(|| {
            for i in 0..EVENT_QUEUE_CAPACITY as i32 {
                pointer.queue_event(PointerEvent::moved(MouseButtons::LEFT, Point::new(i, -i)));
            }
            black_box(pointer.read_input())
        });
    });
}

fn input_query(c: &mut Criterion) {
    let mut input = Input::new();
    input.keyboard.queue_event(KeyEvent::down(KeyCode::SPACE, KeyModifiers::empty()));
    input.read_input();

    c.bench_function("input_is_down", |b| {
        b.iter(|| input.keyboard.is_down(black_box(KeyCode::SPACE)))
    });
}

criterion_group!(
    benches,
    keyboard_read_input_full,
    keyboard_read_input_empty,
    pointer_read_input_moves,
    input_query
);
criterion_main!(benches);
