use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use glint::animation::{EasingFunction, TimerAction, TimerQueue};
use glint::dom::{ElementId, MemoryDocument};
use glint::{GlintEngine, Options};
use web_time::Instant;

fn easing_benchmark(c: &mut Criterion) {
    let f = EasingFunction::STANDARD;
    c.bench_function("standard_easing", |b| {
        b.iter(|| black_box(f.evaluate(black_box(0.5))))
    });
}

fn timer_queue_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("timer_queue");

    for count in [10_u32, 100, 1000] {
        group.bench_function(format!("{count}_timers"), |b| {
            let t0 = Instant::now();
            b.iter(|| {
                let mut queue = TimerQueue::new();
                for i in 0..count {
                    let _ = queue.schedule(
                        t0 + Duration::from_millis(u64::from(i % 97)),
                        TimerAction::Reveal(ElementId::from_raw(i)),
                    );
                }
                let mut fired = 0;
                while queue.pop_due(t0 + Duration::from_secs(1)).is_some() {
                    fired += 1;
                }
                black_box(fired)
            });
        });
    }
    group.finish();
}

/// A page with `cards` product cards spread over a handful of sections.
fn landing_page(cards: usize) -> MemoryDocument {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let home = doc.append_with_id(body, "div", "Home_Desktop");
    let sections: Vec<_> = (0..4).map(|_| doc.append(home, "div")).collect();
    for i in 0..cards {
        let parent = sections[i % sections.len()];
        let card = doc.append_with_id(parent, "div", &format!("Card_{i}"));
        let _ = doc.append(card, "img");
        let _ = doc.append_with_id(card, "span", &format!("Tagline_{i}"));
        let _ = doc.append_with_id(card, "h2", &format!("Heading_{i}"));
        let _ = doc.append_with_id(card, "p", &format!("Text_{i}"));
        let button = doc.append(card, "button");
        let _ = doc.append_with_id(button, "span", &format!("chevron_{i}"));
    }
    doc
}

fn engine_init_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_init");

    for cards in [6, 48] {
        let page = landing_page(cards);
        group.bench_function(format!("{cards}_cards"), |b| {
            b.iter(|| {
                let Ok(mut engine) =
                    GlintEngine::new(page.clone(), &Options::default())
                else {
                    return;
                };
                engine.init(Instant::now());
                black_box(engine.pending_timers());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    easing_benchmark,
    timer_queue_benchmark,
    engine_init_benchmark
);
criterion_main!(benches);
