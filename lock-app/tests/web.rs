//! Browser tests, run with `wasm-pack test --headless --chrome lock-app`.

#![cfg(target_arch = "wasm32")]

use lock_app::LocalStorageStore;
use lock_core::{Pattern, PatternStore, StoredPattern};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_keeps_pattern_and_matrix() {
    let mut store = LocalStorageStore::open().expect("localStorage");
    store.clear().expect("clear");
    assert!(store.load().expect("load").is_none());

    let record = StoredPattern::new(4, Pattern::new(vec![1, 6, 11, 16]));
    store.save(&record).expect("save");
    assert_eq!(store.load().expect("load"), Some(record));

    store.clear().expect("clear");
    assert!(store.load().expect("load").is_none());
}
