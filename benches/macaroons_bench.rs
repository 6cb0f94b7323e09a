use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use macaroons::checker::{AcceptAll, ContextChecker};
use macaroons::crypto::seed;
use macaroons::seal::{seal, unseal};
use macaroons::{DischargeSet, Macaroon, RootKey, Verifier};

const SECRET: &[u8] = b"super_secret_key_for_benchmarking";

fn bench_create(c: &mut Criterion) {
    c.bench_function("macaroon_create", |b| {
        b.iter(|| {
            Macaroon::create(
                black_box(SECRET),
                black_box(b"identifier-12345"),
                Some("https://example.com"),
            )
        })
    });
}

fn bench_add_first_party_caveats(c: &mut Criterion) {
    let base = Macaroon::create(SECRET, b"identifier", Some("https://example.com"));
    let mut group = c.benchmark_group("add_first_party_caveats");

    for count in [1, 5, 10, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                (0..count).fold(base.clone(), |m, i| {
                    m.add_first_party_caveat(black_box(format!("caveat_{i} = value")))
                })
            })
        });
    }
    group.finish();
}

fn bench_verify_first_party(c: &mut Criterion) {
    let verifier = Verifier::new().with_checker(AcceptAll);
    let discharges = DischargeSet::new();
    let mut group = c.benchmark_group("verify_first_party");

    for count in [0, 5, 10, 20] {
        let macaroon = (0..count).fold(
            Macaroon::create(SECRET, b"identifier", None::<String>),
            |m, i| m.add_first_party_caveat(format!("caveat_{i} = value")),
        );

        group.bench_with_input(BenchmarkId::from_parameter(count), &macaroon, |b, m| {
            b.iter(|| verifier.verify(black_box(m), SECRET, &discharges).unwrap())
        });
    }
    group.finish();
}

fn bench_seal(c: &mut Criterion) {
    let tag = seed(&RootKey::derive(SECRET), b"identifier");
    let key = RootKey::generate();
    let (verification_id, _) = seal(&tag, &key);

    c.bench_function("seal", |b| b.iter(|| seal(black_box(&tag), &key)));
    c.bench_function("unseal", |b| {
        b.iter(|| unseal(black_box(&tag), black_box(&verification_id)).unwrap())
    });
}

fn bench_verify_with_discharges(c: &mut Criterion) {
    let verifier = Verifier::new().with_checker(
        ContextChecker::empty()
            .with("account", "alice")
            .with("auth_level", "10"),
    );
    let mut group = c.benchmark_group("verify_with_discharges");

    for count in [1, 2, 4] {
        let keys: Vec<RootKey> = (0..count).map(|_| RootKey::generate()).collect();

        let mut primary = Macaroon::create(SECRET, b"primary", None::<String>)
            .add_first_party_caveat("account = alice");
        for (i, key) in keys.iter().enumerate() {
            primary = primary
                .add_third_party_caveat("https://auth.example.com", key, format!("auth_{i}"));
        }

        let discharges = primary.prepare_for_request(keys.iter().enumerate().map(|(i, key)| {
            Macaroon::with_root_key(key, format!("auth_{i}"), None::<String>)
                .add_first_party_caveat("auth_level >= 5")
        }));

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                verifier
                    .verify(black_box(&primary), SECRET, black_box(&discharges))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let macaroon = Macaroon::create(SECRET, b"identifier", Some("https://example.com"))
        .add_first_party_caveat("account = alice")
        .add_first_party_caveat("action = read");
    let encoded = macaroon.to_base64().unwrap();

    c.bench_function("to_base64", |b| b.iter(|| black_box(&macaroon).to_base64().unwrap()));
    c.bench_function("from_base64", |b| {
        b.iter(|| Macaroon::from_base64(black_box(&encoded)).unwrap())
    });
    c.bench_function("to_json", |b| b.iter(|| black_box(&macaroon).to_json().unwrap()));
}

criterion_group!(
    benches,
    bench_create,
    bench_add_first_party_caveats,
    bench_verify_first_party,
    bench_seal,
    bench_verify_with_discharges,
    bench_serialization
);
criterion_main!(benches);
