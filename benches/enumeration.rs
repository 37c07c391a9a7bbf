use criterion::measurement::WallTime;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, Criterion};

use rps_verify::config::VerifierConfig;
use rps_verify::gadget::{self, ParsedGadget};
use rps_verify::verify::modes;

const ISW_N2: &str = "SHARES 2\nIN a b\nRANDOMS r\nOUT c\n\
    c0 = a0 * b0 + r\n\
    c1 = a1 * b1 + r + a0 * b1 + a1 * b0\n";

// ISW multiplication at n=3, Shamir's original refresh-free compression.
const ISW_N3: &str = "SHARES 3\nIN a b\nRANDOMS r01 r02 r12\nOUT c\n\
    c0 = a0 * b0 + r01 + r02\n\
    c1 = a1 * b1 + r01 + r12\n\
    c2 = a2 * b2 + r02 + r12\n";

fn config() -> VerifierConfig {
    VerifierConfig::new(1 << 12, 0, 1).unwrap()
}

pub fn all_groups(c: &mut Criterion) {
    enumeration_group(ISW_N2, "isw/n2", c);
    enumeration_group(ISW_N3, "isw/n3", c);
}

fn enumeration_group(src: &str, name: &str, c: &mut Criterion) {
    let gadget = gadget::parse(src).expect("fixture gadget must parse");
    let mut group = c.benchmark_group(format!("enumeration/{name}"));

    bench_t_probing(&gadget, WallTime, &mut group);
    bench_random_probing(&gadget, WallTime, &mut group);

    group.finish();
}

fn bench_t_probing(gadget: &ParsedGadget, _m: WallTime, g: &mut BenchmarkGroup<WallTime>) {
    let cfg = config();
    g.bench_function("t_probing", |b| {
        b.iter(|| modes::t_probing(gadget, 1, &cfg).unwrap())
    });
}

fn bench_random_probing(gadget: &ParsedGadget, _m: WallTime, g: &mut BenchmarkGroup<WallTime>) {
    let cfg = config();
    g.bench_function("random_probing", |b| {
        b.iter(|| modes::random_probing(gadget, gadget.n, &cfg).unwrap())
    });
}

criterion_group!(benches, all_groups);
criterion_main!(benches);
