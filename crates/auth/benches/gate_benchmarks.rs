use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use rolegate_auth::{GateConfig, evaluate};
use rolegate_flow::{AuthToken, Message};

fn message(role: Option<&str>) -> Message {
    let msg = Message::new(json!({
        "roomId": "A-101",
        "start": "2026-10-19T09:00:00Z",
        "end": "2026-10-19T10:00:00Z",
    }));
    match role {
        Some(r) => msg.with_token(AuthToken::new().with_role(r)),
        None => msg,
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let config = GateConfig::new("admin");
    let mut group = c.benchmark_group("evaluate");

    for (label, role) in [("allowed", Some("ADMIN")), ("mismatch", Some("USER")), ("missing", None)] {
        let input = message(role);
        group.bench_with_input(BenchmarkId::from_parameter(label), &input, |b, input| {
            b.iter(|| evaluate(black_box(input.clone()), black_box(&config)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
