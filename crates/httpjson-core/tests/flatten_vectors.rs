//! Flatten vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use httpjson_core::{flatten, flatten_to_map};

mod vector_loader;
use vector_loader::load;

#[test]
fn flatten_vectors() {
    let files = [
        "actuator_metrics.json",
        "nested_mixed.json",
        "scalar_root.json",
        "no_numbers.json",
    ];

    for f in files {
        let v = load(f);
        let got = flatten_to_map(&v.document).expect("flatten must not fault");
        assert_eq!(got, v.expect, "vector={}", v.description);

        // one pair per numeric leaf, no duplicates
        assert_eq!(flatten(&v.document).count(), v.expect.len(), "vector={}", v.description);
    }
}

#[test]
fn reparsed_body_flattens_identically() {
    let v = load("nested_mixed.json");
    let body = serde_json::to_vec(&v.document).unwrap();
    let again: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(flatten_to_map(&again).unwrap(), v.expect);
}
