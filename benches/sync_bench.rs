//! Benchmarks for the Cueline sync engine
//!
//! Run with: cargo bench

use cueline::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Subtitle-like track: 2.5s lines, 0.5s gaps, every tenth line doubled
/// with a translation starting at the same time.
fn create_test_entries(count: usize) -> Vec<Entry<String>> {
    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let start = i as i64 * 3000;
        entries.push(Entry::new(start, start + 2500, format!("line {}", i)));
        if i % 10 == 0 {
            entries.push(Entry::new(start, start + 2800, format!("translation {}", i)));
        }
    }
    entries
}

fn bench_playback(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback");

    for size in [100, 1000, 10000] {
        let entries = create_test_entries(size);
        let end = size as i64 * 3000;
        let polls = (end / 50) as u64;

        group.throughput(Throughput::Elements(polls));

        group.bench_function(format!("cursor_{}", size), |b| {
            let mut track = CaptionTrack::from_entries(entries.clone());
            b.iter(|| {
                track.seek_to(0);
                let mut t = 0;
                while t < end {
                    black_box(track.advance(black_box(t)));
                    t += 50;
                }
            })
        });

        if size <= 1000 {
            let timeline = Timeline::new(entries.clone());
            group.bench_function(format!("linear_scan_{}", size), |b| {
                b.iter(|| {
                    let mut t = 0;
                    while t < end {
                        black_box(timeline.scan_active(black_box(t)));
                        t += 50;
                    }
                })
            });
        }
    }

    group.finish();
}

fn bench_seek(c: &mut Criterion) {
    let mut group = c.benchmark_group("seek");

    let entries = create_test_entries(10000);
    let end = 10000 * 3000;
    // Deterministic scatter over the whole track
    let targets: Vec<i64> = (0..1000i64).map(|i| (i * 7919 * 1013) % end).collect();

    group.throughput(Throughput::Elements(targets.len() as u64));

    group.bench_function("seek_storm_10000", |b| {
        let mut track = CaptionTrack::from_entries(entries.clone());
        b.iter(|| {
            for &t in &targets {
                black_box(track.seek_to(black_box(t)));
            }
        })
    });

    group.bench_function("set_entries_10000", |b| {
        let mut track = CaptionTrack::new();
        b.iter(|| track.set_entries(black_box(entries.clone())))
    });

    group.finish();
}

fn bench_danmaku(c: &mut Criterion) {
    let mut group = c.benchmark_group("danmaku");

    let occurrences: Vec<WordOccurrences<String>> = (0..2000)
        .map(|w| {
            let ranges = (0..5)
                .map(|k| {
                    let start = (w * 977 + k * 60_013) % 3_600_000;
                    Span::new(start, start + 800)
                })
                .collect();
            WordOccurrences::new(format!("word{}", w), ranges)
        })
        .collect();

    group.throughput(Throughput::Elements(10000));

    group.bench_function("build_map_10000", |b| {
        b.iter(|| build_danmaku_map(black_box(&occurrences)))
    });

    group.bench_function("timeline_playback_10000", |b| {
        let mut timeline = DanmakuTimeline::new(2000);
        timeline.load_occurrences(&occurrences);
        b.iter(|| {
            timeline.reset();
            let mut t = 0;
            while t < 3_600_000 {
                black_box(timeline.update(black_box(t)).len());
                t += 50;
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_playback, bench_seek, bench_danmaku);
criterion_main!(benches);
