//! Simulation step benchmarks
//!
//! Measures one tick of each control strategy and a full recorded run.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tanksim::prelude::*;

fn state_for(strategy: ControlStrategy, feedforward: FeedforwardStrategy) -> SimulationState {
    SimulationState {
        control_strategy: strategy,
        feedforward_strategy: feedforward,
        feedforward_model: FeedforwardModel::Process,
        enable_noise: true,
        pump_flow: 4.0,
        ..SimulationState::initial().started()
    }
}

/// One tick per strategy
fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Step");

    let cases = [
        ("manual", ControlStrategy::Manual, FeedforwardStrategy::StaticGain),
        ("pi", ControlStrategy::Pi, FeedforwardStrategy::StaticGain),
        ("pid", ControlStrategy::Pid, FeedforwardStrategy::StaticGain),
        ("pid_ff_static", ControlStrategy::PidFeedforward, FeedforwardStrategy::StaticGain),
        ("pid_ff_tf", ControlStrategy::PidFeedforward, FeedforwardStrategy::TransferFunction),
    ];

    for (name, strategy, feedforward) in cases {
        let state = state_for(strategy, feedforward);
        let mut source = RngSource::new(Some(1));

        group.bench_with_input(BenchmarkId::new("strategy", name), &state, |b, state| {
            b.iter(|| step(black_box(state), black_box(SIM_TIMESTEP), &mut source));
        });
    }

    group.finish();
}

/// Ten simulated minutes with recording and CSV export
fn bench_recorded_run(c: &mut Criterion) {
    c.bench_function("PID 6000 ticks + CSV", |b| {
        b.iter(|| {
            let mut state = state_for(ControlStrategy::Pid, FeedforwardStrategy::StaticGain);
            let mut source = RngSource::new(Some(1));
            let mut recorder = DataRecorder::new();

            for _ in 0..6000 {
                state = step(&state, SIM_TIMESTEP, &mut source);
                recorder.add_data_point(&state);
            }

            black_box(recorder.export_to_csv())
        });
    });
}

criterion_group!(benches, bench_step, bench_recorded_run);
criterion_main!(benches);
