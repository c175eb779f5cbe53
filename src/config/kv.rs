//! Dynamic key-value accessor
//!
//! `Kv` is the permissive bag behind `custom_config` and per-port options.
//! Values are dynamically typed (`serde_json::Value`) and stay opaque until a
//! typed getter coerces them. The getters are total: a value that cannot be
//! coerced yields the requested type's zero value, never an error. The strict
//! counterpart is [`Kv::load_into`], which projects the whole bag onto a
//! typed schema and fails on shape mismatch.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::Result;

/// Dynamic string-keyed configuration bag with lenient typed getters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kv(Map<String, Value>);

impl Kv {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Raw dynamic value for a key, if present
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Project the whole bag onto a typed schema
    ///
    /// Goes through the canonical JSON interchange form; unlike the per-key
    /// getters this fails on unknown shapes or type conflicts.
    pub fn load_into<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.0.clone()))?)
    }

    pub fn get_string(&self, key: &str) -> String {
        self.get(key).map(to_string).unwrap_or_default()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).map(to_bool).unwrap_or_default()
    }

    /// Duration coercion: strings take `ns`/`us`/`ms`/`s`/`m`/`h` suffixes,
    /// bare numbers are seconds.
    pub fn get_duration(&self, key: &str) -> Duration {
        self.get(key).and_then(to_duration).unwrap_or_default()
    }

    pub fn get_f64(&self, key: &str) -> f64 {
        self.get(key).map(to_f64).unwrap_or_default()
    }

    pub fn get_i32(&self, key: &str) -> i32 {
        self.get_i64(key).try_into().unwrap_or_default()
    }

    pub fn get_i64(&self, key: &str) -> i64 {
        self.get(key).map(to_i64).unwrap_or_default()
    }

    pub fn get_u32(&self, key: &str) -> u32 {
        self.get_u64(key).try_into().unwrap_or_default()
    }

    pub fn get_u64(&self, key: &str) -> u64 {
        self.get(key).map(to_u64).unwrap_or_default()
    }

    /// Nested mapping, empty when the value is not a mapping
    pub fn get_string_map(&self, key: &str) -> Map<String, Value> {
        match self.get(key) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }

    /// Mapping coerced to plain strings, empty when not a mapping
    pub fn get_string_map_string(&self, key: &str) -> BTreeMap<String, String> {
        self.get_string_map(key)
            .into_iter()
            .map(|(k, v)| (k, to_string(&v)))
            .collect()
    }

    /// Mapping coerced to string lists, empty when not a mapping
    pub fn get_string_map_string_vec(&self, key: &str) -> BTreeMap<String, Vec<String>> {
        self.get_string_map(key)
            .into_iter()
            .map(|(k, v)| (k, to_string_vec(&v)))
            .collect()
    }

    pub fn get_string_vec(&self, key: &str) -> Vec<String> {
        self.get(key).map(to_string_vec).unwrap_or_default()
    }

    /// Timestamp coercion: RFC 3339, `%Y-%m-%d %H:%M:%S`, `%Y-%m-%d`, or
    /// epoch seconds. The zero value is the Unix epoch.
    pub fn get_time(&self, key: &str) -> DateTime<Utc> {
        self.get(key)
            .and_then(to_time)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl From<Map<String, Value>> for Kv {
    fn from(map: Map<String, Value>) -> Self {
        Kv(map)
    }
}

fn to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "t" | "true" | "y" | "yes" | "on"
        ),
        _ => false,
    }
}

fn to_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        Value::Bool(b) => *b as i64,
        _ => 0,
    }
}

fn to_u64(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0)
        }
        Value::Bool(b) => *b as u64,
        _ => 0,
    }
}

fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => *b as i64 as f64,
        _ => 0.0,
    }
}

fn to_string_vec(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(to_string).collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn to_duration(value: &Value) -> Option<Duration> {
    match value {
        // try_from keeps the getter total: negative, NaN, and oversized
        // values degrade to None instead of panicking
        Value::Number(n) => Duration::try_from_secs_f64(n.as_f64()?).ok(),
        Value::String(s) => parse_duration(s),
        _ => None,
    }
}

fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Longest suffixes first so "ms" is not read as "m" + garbage.
    let (number, nanos_per_unit) = if let Some(n) = s.strip_suffix("ns") {
        (n, 1.0)
    } else if let Some(n) = s.strip_suffix("us") {
        (n, 1e3)
    } else if let Some(n) = s.strip_suffix("ms") {
        (n, 1e6)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1e9)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60.0 * 1e9)
    } else if let Some(n) = s.strip_suffix('h') {
        (n, 3600.0 * 1e9)
    } else {
        // bare numbers are seconds
        (s, 1e9)
    };

    let amount: f64 = number.trim().parse().ok()?;
    let nanos = amount * nanos_per_unit;
    (nanos.is_finite() && nanos >= 0.0).then(|| Duration::from_nanos(nanos as u64))
}

fn to_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(t) = DateTime::parse_from_rfc3339(s) {
                return Some(t.with_timezone(&Utc));
            }
            if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(t.and_utc());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|t| t.and_utc())
        }
        Value::Number(n) => Utc.timestamp_opt(n.as_i64()?, 0).single(),
        _ => None,
    }
}
