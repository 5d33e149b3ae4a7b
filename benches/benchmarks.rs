use criterion::{black_box, criterion_group, criterion_main, Criterion};
use currency_converter::conversion::{convert, ConversionRequest};
use currency_converter::currency::Currency;
use currency_converter::fx::{RateResolver, RateTable};
use currency_converter::state::{reduce, ConversionEvent, ConversionState};

fn benchmark_resolve(c: &mut Criterion) {
    let resolver = RateResolver::new(RateTable::reference());

    c.bench_function("resolve_all_pairs", |b| {
        b.iter(|| {
            for from in Currency::ALL {
                for to in Currency::ALL {
                    let _ = resolver.rate(black_box(from), black_box(to));
                }
            }
        });
    });
}

fn benchmark_convert(c: &mut Criterion) {
    let resolver = RateResolver::new(RateTable::reference());

    c.bench_function("convert_pivot_1000", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let request =
                    ConversionRequest::new(black_box(i as f64), Currency::GBP, Currency::JPY)
                        .unwrap();
                let _ = convert(&resolver, &request);
            }
        });
    });
}

fn benchmark_reduce(c: &mut Criterion) {
    let resolver = RateResolver::new(RateTable::reference());

    c.bench_function("reduce_request_cycle", |b| {
        b.iter(|| {
            let mut state = ConversionState::default();
            for id in 1..=100 {
                state = reduce(state, ConversionEvent::AmountChanged(id.to_string()));
                let result = convert(&resolver, &state.request().unwrap()).unwrap();
                state = reduce(state, ConversionEvent::RequestStarted { id });
                state = reduce(state, ConversionEvent::Completed { id, result });
            }
            black_box(state)
        });
    });
}

criterion_group!(benches, benchmark_resolve, benchmark_convert, benchmark_reduce);
criterion_main!(benches);
