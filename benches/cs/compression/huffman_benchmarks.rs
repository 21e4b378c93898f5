use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hctree::cs::compression::{Compression, FrequencyTable, HuffmanCodec, HuffmanTree, Mode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZES: &[usize] = &[8192, 65536, 1 << 20];

/// English-ish text: a skewed byte distribution with plenty of repeats.
fn test_data(size: usize) -> Vec<u8> {
    let words: &[&[u8]] = &[
        b"the ", b"of ", b"and ", b"huffman ", b"prefix ", b"code ", b"tree ", b"bit ",
        b"stream ", b"symbol ", b"frequency\n",
    ];
    let mut rng = StdRng::seed_from_u64(1);
    let mut data = Vec::with_capacity(size + 16);
    while data.len() < size {
        data.extend_from_slice(words[rng.gen_range(0..words.len())]);
    }
    data.truncate(size);
    data
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_build");
    for &size in SIZES {
        let data = test_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("u8", size), &data, |b, data| {
            b.iter(|| HuffmanTree::build(&FrequencyTable::<u8>::from_symbols(black_box(data))));
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_codec");
    for &size in SIZES {
        let data = test_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        for mode in [Mode::Byte, Mode::Block] {
            let codec = HuffmanCodec::new(mode);
            let label = format!("{:?}", mode);

            group.bench_with_input(
                BenchmarkId::new(format!("compress_{}", label), size),
                &data,
                |b, data| b.iter(|| codec.compress(black_box(data)).unwrap()),
            );

            let packed = codec.compress(&data).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("decompress_{}", label), size),
                &packed,
                |b, packed| b.iter(|| codec.decompress(black_box(packed)).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_codec);
criterion_main!(benches);
