//! Frame stack benchmarks
//!
//! Benchmarks for the hot paths of the suspended-call frame stack:
//! - Frame push/pop traffic (the per-call overhead of instrumented code)
//! - Typed slot writes and reads (the per-suspension save/restore cost)
//! - Resume walks over deep chains
//!
//! Run with: cargo bench --bench frame_stack

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weft_runtime::coroutine::CoroutineId;
use weft_runtime::stack::FrameStack;

fn new_stack(initial_slots: usize) -> FrameStack {
    FrameStack::new(CoroutineId::fresh(), initial_slots).expect("positive capacity")
}

fn bench_push_pop(c: &mut Criterion) {
    c.bench_function("frame_push_pop_1000", |b| {
        let mut stack = new_stack(64);
        b.iter(|| {
            for _ in 0..1000 {
                stack.push_frame(black_box(1), black_box(4));
                stack.pop_frame();
            }
        });
    });
}

fn bench_nested_push_pop(c: &mut Criterion) {
    c.bench_function("frame_nested_push_pop_depth_32", |b| {
        let mut stack = new_stack(256);
        b.iter(|| {
            for offset in 0..32 {
                stack.push_frame(black_box(offset), 4);
            }
            for _ in 0..32 {
                stack.pop_frame();
            }
        });
    });
}

fn bench_slot_save_restore(c: &mut Criterion) {
    c.bench_function("slot_save_restore_mixed", |b| {
        let mut stack = new_stack(16);
        stack.push_frame(1, 4);
        b.iter(|| {
            stack.set_int(0, black_box(7));
            stack.set_long(1, black_box(-1));
            stack.set_float(2, black_box(1.5));
            stack.set_double(3, black_box(2.25));
            black_box(stack.get_int(0));
            black_box(stack.get_long(1));
            black_box(stack.get_float(2));
            black_box(stack.get_double(3));
        });
    });
}

fn bench_resume_walk(c: &mut Criterion) {
    c.bench_function("resume_walk_depth_32", |b| {
        let mut stack = new_stack(256);
        for offset in 0..32 {
            stack.push_frame(offset, 4);
        }
        b.iter(|| {
            stack.reset_walk();
            for _ in 0..32 {
                black_box(stack.next_resume_step());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_push_pop,
    bench_nested_push_pop,
    bench_slot_save_restore,
    bench_resume_walk
);
criterion_main!(benches);
