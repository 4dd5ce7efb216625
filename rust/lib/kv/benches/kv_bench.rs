use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tempfile::TempDir;

use platetrack_kv::{KVStore, MemoryStore, OverlayKV, RedbStore};

/// A persisted plate set is one JSON document; this approximates ten
/// thousand plates.
fn plate_document() -> Vec<u8> {
    let mut doc = String::from("[");
    for n in 0..10_000u32 {
        if n > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            r#"{{"number":{n},"equipmentName":"Chave Fusível de Trafo","status":"IN_STOCK","dateIn":"2024-01-01T00:00:00.000Z"}}"#
        ));
    }
    doc.push(']');
    doc.into_bytes()
}

fn bench_redb_save_state(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();
    let plates = plate_document();

    let entries: [(&str, &[u8]); 2] = [("state:plates", &plates), ("state:logs", b"[]")];

    c.bench_function("redb_save_state", |b| {
        b.iter(|| {
            store.batch_set(black_box(&entries)).unwrap();
        });
    });
}

fn bench_redb_load_state(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();
    store.set("state:plates", &plate_document()).unwrap();

    c.bench_function("redb_load_state", |b| {
        b.iter(|| {
            let _ = store.get(black_box("state:plates")).unwrap();
        });
    });
}

fn bench_overlay_get_file_layer(c: &mut Criterion) {
    let overlay = OverlayKV::new(MemoryStore::new());
    overlay.insert_file_entry("config:catalog".into(), b"- id: seccionalizador".to_vec());

    c.bench_function("overlay_get_file_layer", |b| {
        b.iter(|| {
            let _ = overlay.get(black_box("config:catalog")).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_redb_save_state,
    bench_redb_load_state,
    bench_overlay_get_file_layer,
);
criterion_main!(benches);
