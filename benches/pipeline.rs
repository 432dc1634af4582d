use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fgprep::{
    config, normalize_for_analysis, parse_smiles, pseudo_smiles, to_canonical_smiles, Huckel,
    MoleculeHasher,
};

const CAFFEINE: &str = "Cn1cnc2c1c(=O)n(C)c(=O)n2C";
const ATORVASTATIN: &str =
    "CC(C)c1c(C(=O)Nc2ccccc2)c(-c2ccccc2)c(-c2ccc(F)cc2)n1CC[C@@H](O)C[C@@H](O)CC(=O)O";
const CARBOXYLATE_SALT: &str = "CCCCCCCCCCCCCCCCCC(=O)[O-].[Na+]";
const AROMATIC_GROUP: &str = "*c1ccc(*)n1*";

fn bench_canonical(c: &mut Criterion) {
    let caffeine = parse_smiles(CAFFEINE).unwrap();
    let atorvastatin = parse_smiles(ATORVASTATIN).unwrap();

    let mut group = c.benchmark_group("canonical");
    group.bench_function("caffeine", |b| {
        b.iter(|| black_box(to_canonical_smiles(black_box(&caffeine)).unwrap()))
    });
    group.bench_function("atorvastatin", |b| {
        b.iter(|| black_box(to_canonical_smiles(black_box(&atorvastatin)).unwrap()))
    });
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let salt = parse_smiles(CARBOXYLATE_SALT).unwrap();
    let atorvastatin = parse_smiles(ATORVASTATIN).unwrap();
    let cfg = config::shared();
    let model = Huckel::default();

    let mut group = c.benchmark_group("normalize");
    group.bench_function("carboxylate_salt", |b| {
        b.iter(|| black_box(normalize_for_analysis(black_box(salt.clone()), &model, cfg)))
    });
    group.bench_function("atorvastatin", |b| {
        b.iter(|| black_box(normalize_for_analysis(black_box(atorvastatin.clone()), &model, cfg)))
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut aromatic = parse_smiles(AROMATIC_GROUP).unwrap();
    let mut caffeine = parse_smiles(CAFFEINE).unwrap();
    let hasher = MoleculeHasher::default();

    let mut group = c.benchmark_group("encode");
    group.bench_function("pseudo_smiles_group", |b| {
        b.iter(|| black_box(pseudo_smiles(black_box(&mut aromatic)).unwrap()))
    });
    group.bench_function("pseudo_smiles_caffeine", |b| {
        b.iter(|| black_box(pseudo_smiles(black_box(&mut caffeine)).unwrap()))
    });
    group.bench_function("hash_caffeine", |b| {
        b.iter(|| black_box(hasher.hash(black_box(&caffeine))))
    });
    group.finish();
}

criterion_group!(benches, bench_canonical, bench_normalize, bench_encode);
criterion_main!(benches);
