#[macro_use]
extern crate criterion;

use bxml::{Decoder, Event, EventStream, PrimitiveListDecoder};
use criterion::{BatchSize, Criterion, Throughput};

const COORDINATES: usize = 10_000;

fn packed_events() -> Vec<Event> {
    let values: Vec<f64> = (0..COORDINATES).map(|i| i as f64 * 0.5).collect();
    EventStream::builder()
        .start("posList")
        .doubles(values)
        .end("posList")
        .into_events()
}

fn text_events() -> Vec<Event> {
    let text = (0..COORDINATES)
        .map(|i| (i as f64 * 0.5).to_string())
        .collect::<Vec<_>>()
        .join(" ");

    // Split mid-token so the reassembly path is exercised.
    let mut builder = EventStream::builder().start("posList");
    for chunk in text.as_bytes().chunks(1000) {
        builder = builder.string(String::from_utf8_lossy(chunk).into_owned());
    }
    builder.end("posList").into_events()
}

fn bench_decode_arrays(c: &mut Criterion) {
    let decoder = PrimitiveListDecoder::<f64>::new("posList");
    let mut group = c.benchmark_group("decode_pos_list");
    group.throughput(Throughput::Elements(COORDINATES as u64));

    for (label, events) in [("packed", packed_events()), ("text", text_events())] {
        group.bench_function(label, |b| {
            b.iter_batched(
                || EventStream::new(events.clone()).unwrap(),
                |mut stream| decoder.decode(&mut stream).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode_arrays);
criterion_main!(benches);
