use criterion::{criterion_group, criterion_main, Criterion};
use fluc_core::{generate_event, EventContext, FlowConfig, FlowModel, RngHandle};
use fluc_obs::{accumulate_toy, CentralityAxis, FlowAssembler, ProfileAccumulator, RunOpts, ToyRun};

fn bench_event(c: &mut Criterion) {
    let config = FlowConfig::default();
    let assembler = FlowAssembler::new(config.clone()).expect("default config");
    let model = FlowModel::isotropic(800).with_flow(2, 0.08).with_flow(3, 0.03);
    let mut rng = RngHandle::from_seed(5);
    let sample = generate_event(&model, &config.eta_window, &mut rng);
    let context = EventContext::from_config(&config, 10.0, 0.0);

    c.bench_function("assemble_event", |b| {
        let mut sink = ProfileAccumulator::new(CentralityAxis::default());
        b.iter(|| assembler.process_sample(&sample, &context, &mut sink));
    });

    let run = ToyRun {
        events: 64,
        model,
        ..ToyRun::default()
    };
    c.bench_function("toy_run_64_events", |b| {
        b.iter(|| accumulate_toy(&run, &RunOpts { threads: 2 }).expect("toy run"));
    });
}

criterion_group!(benches, bench_event);
criterion_main!(benches);
