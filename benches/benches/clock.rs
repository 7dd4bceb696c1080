use criterion::{Criterion, black_box, criterion_group, criterion_main};
use cyclebase::{
    Calibration, CycleCounter, LocalLevel, LogBurst, MonotonicCounter, poll_clock,
};
use log::LevelFilter;

pub fn counter_benchmarks(c: &mut Criterion) {
    c.bench_function("poll_clock", |b| b.iter(|| black_box(poll_clock())));
    c.bench_function("MonotonicCounter::now", |b| {
        let counter = MonotonicCounter;
        b.iter(|| black_box(counter.now()))
    });
}

pub fn burst_benchmarks(c: &mut Criterion) {
    let cal = Calibration::init();
    c.bench_function("pull, idle", |b| {
        let burst = LogBurst::new(
            &cal,
            cyclebase::HostCounter::default(),
            LocalLevel::new(LevelFilter::Info),
        );
        b.iter(|| black_box(burst.pull()))
    });
    c.bench_function("pull, active", |b| {
        let burst = LogBurst::new(
            &cal,
            cyclebase::HostCounter::default(),
            LocalLevel::new(LevelFilter::Info),
        );
        burst.burst_log(3600);
        b.iter(|| black_box(burst.pull()))
    });
    c.bench_function("ticks_to_us", |b| {
        b.iter(|| black_box(cal.ticks_to_us(black_box(123_456_789))))
    });
}

criterion_group!(benches, counter_benchmarks, burst_benchmarks);
criterion_main!(benches);
