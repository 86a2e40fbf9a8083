//! Minimal metrics registry for the exporter.
//!
//! Provides gauge and counter types with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors and series are emitted in
//! sorted order so the exposition output is deterministic. Gauge values are
//! `f64` stored as raw bits in an `AtomicU64`.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metric name prefix shared by every family.
pub const NAMESPACE: &str = "http_json";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Sample value in exposition syntax.
fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v == f64::INFINITY {
        "+Inf".into()
    } else if v == f64::NEG_INFINITY {
        "-Inf".into()
    } else {
        v.to_string()
    }
}

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn render_series(name: &str, key: &LabelKey, v: f64, out: &mut String) {
    if key.is_empty() {
        let _ = writeln!(out, "{} {}", name, fmt_value(v));
        return;
    }
    let label_str = key
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",");
    let _ = writeln!(out, "{}{{{}}} {}", name, label_str, fmt_value(v));
}

fn render_header(name: &str, help: &str, kind: &str, out: &mut String) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

/// Single unlabeled gauge.
pub struct Gauge {
    bits: AtomicU64,
}

impl Default for Gauge {
    fn default() -> Self {
        Self { bits: AtomicU64::new(0f64.to_bits()) }
    }
}

impl Gauge {
    pub fn set(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        render_header(name, help, "gauge", out);
        render_series(name, &Vec::new(), self.get(), out);
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl GaugeVec {
    /// Set (or create) the series for `labels`.
    pub fn set(&self, labels: &[(&str, &str)], v: f64) {
        let key = label_key(labels);
        let gauge = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        gauge.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.map
            .get(&label_key(labels))
            .map(|r| f64::from_bits(r.value().load(Ordering::Relaxed)))
    }

    /// Number of series ever published.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        render_header(name, help, "gauge", out);
        let mut rows: Vec<(LabelKey, f64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), f64::from_bits(r.value().load(Ordering::Relaxed))))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, v) in &rows {
            render_series(name, key, *v, out);
        }
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|r| r.value().load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        render_header(name, help, "counter", out);
        let mut rows: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, v) in &rows {
            render_series(name, key, *v as f64, out);
        }
    }
}

/// Every family the exporter publishes.
#[derive(Default)]
pub struct ExporterMetrics {
    /// 1 when the last scrape cycle succeeded, 0 otherwise.
    pub up: Gauge,
    /// Flattened JSON leaves, labeled by `path`.
    pub value: GaugeVec,
    pub scrape_errors: CounterVec,
    pub last_scrape_duration: Gauge,
}

impl ExporterMetrics {
    /// Render all families.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.up.render(
            &format!("{NAMESPACE}_up"),
            "Was the last scrape of JSON successful",
            &mut out,
        );
        self.value
            .render(&format!("{NAMESPACE}_value"), "JSON value", &mut out);
        self.scrape_errors.render(
            &format!("{NAMESPACE}_scrape_errors_total"),
            "Failed scrapes of the JSON endpoint by kind",
            &mut out,
        );
        self.last_scrape_duration.render(
            &format!("{NAMESPACE}_last_scrape_duration_seconds"),
            "Duration of the last scrape cycle",
            &mut out,
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_vec_overwrites_in_place() {
        let g = GaugeVec::default();
        g.set(&[("path", "$.a")], 1.0);
        g.set(&[("path", "$.a")], 2.5);
        assert_eq!(g.len(), 1);
        assert_eq!(g.get(&[("path", "$.a")]), Some(2.5));
    }

    #[test]
    fn render_is_sorted_and_escaped() {
        let m = ExporterMetrics::default();
        m.up.set(1.0);
        m.value.set(&[("path", "$.b")], 2.0);
        m.value.set(&[("path", "$.a")], 0.5);
        m.value.set(&[("path", "$['q\"x']")], 7.0);
        let out = m.render();

        assert!(out.contains("# TYPE http_json_up gauge\nhttp_json_up 1\n"));
        let a = out.find(r#"http_json_value{path="$.a"} 0.5"#).unwrap();
        let b = out.find(r#"http_json_value{path="$.b"} 2"#).unwrap();
        assert!(a < b);
        assert!(out.contains(r#"http_json_value{path="$['q\"x']"} 7"#));
    }

    #[test]
    fn special_floats_use_exposition_spelling() {
        assert_eq!(fmt_value(f64::NAN), "NaN");
        assert_eq!(fmt_value(f64::INFINITY), "+Inf");
        assert_eq!(fmt_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(fmt_value(-3.0), "-3");
    }

    #[test]
    fn counter_counts_per_label() {
        let c = CounterVec::default();
        c.inc(&[("kind", "timeout")]);
        c.inc(&[("kind", "timeout")]);
        c.inc(&[("kind", "parse")]);
        assert_eq!(c.get(&[("kind", "timeout")]), 2);
        assert_eq!(c.get(&[("kind", "parse")]), 1);
        assert_eq!(c.get(&[("kind", "read")]), 0);
    }
}
