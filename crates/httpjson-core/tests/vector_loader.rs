//! JSON test vector loader shared by flatten tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestVector {
    pub description: String,
    pub document: serde_json::Value,
    pub expect: BTreeMap<String, f64>,
}

pub fn load(name: &str) -> TestVector {
    let s = std::fs::read_to_string(format!("tests/vectors/{name}"))
        .unwrap_or_else(|e| panic!("missing vector {name}: {e}"));
    serde_json::from_str(&s).expect("invalid test vector")
}
