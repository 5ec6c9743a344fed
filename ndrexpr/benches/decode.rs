use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ndrexpr::magic::{FC_EXPR_CONST32, FC_EXPR_OPER, FC_EXPR_VAR};
use ndrexpr::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const BINARY_OPERATORS: [Operator; 6] = [
    Operator::Plus,
    Operator::Minus,
    Operator::Star,
    Operator::Slash,
    Operator::LeftShift,
    Operator::LogicalAnd,
];

/// Append a random expression of at most `budget` levels in prefix order.
fn write_expr(budget: usize, rng: &mut impl Rng, out: &mut Vec<u8>) {
    if budget == 0 || rng.random_bool(0.3) {
        if rng.random_bool(0.5) {
            out.extend([FC_EXPR_VAR, 0x08]);
            out.extend(rng.random_range(0i16..256).to_le_bytes());
        } else {
            out.extend([FC_EXPR_CONST32, 0x08, 0x00, 0x00]);
            out.extend(rng.random::<i32>().to_le_bytes());
        }
        return;
    }

    let op = BINARY_OPERATORS[rng.random_range(0..BINARY_OPERATORS.len())];
    out.extend([FC_EXPR_OPER, op as u8, 0x08, 0x00]);
    write_expr(budget - 1, rng, out);
    write_expr(budget - 1, rng, out);
}

/// Offset table of `slots` entries followed by the shared expression buffer.
fn build_image(slots: usize) -> (Vec<u8>, u64) {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let mut buffer = Vec::new();
    let mut table = Vec::new();
    for _ in 0..slots {
        if rng.random_bool(0.1) {
            table.extend((-1i16).to_le_bytes());
            continue;
        }
        table.extend((buffer.len() as i16).to_le_bytes());
        write_expr(4, &mut rng, &mut buffer);
    }

    let buffer_base = table.len() as u64;
    table.extend(buffer);
    (table, buffer_base)
}

fn bench_decode(c: &mut Criterion) {
    let (image, buffer_base) = build_image(64);
    let table = ExprTable::new(&image[..], Some(0), Some(buffer_base));
    let config = DecoderConfig::default();

    c.bench_function("resolve 64 slots", |b| {
        b.iter(|| {
            let nodes = resolve_range(&table, 0..64, &config).unwrap();
            black_box(nodes)
        })
    });

    c.bench_function("resolve single slot", |b| {
        b.iter(|| black_box(resolve_expression(&table, black_box(3), &config).unwrap()))
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
