//! Result decoding
//!
//! After a program finishes the host exposes its user variables inside a
//! configuration snapshot. This module finds the variable store in that
//! snapshot, checks the completion flag and turns the accumulator text back
//! into typed records.
//!
//! The three outcomes are kept apart:
//! - [`Retrieval::NotReady`]: the flag is absent or false
//! - [`Retrieval::Malformed`]: the flag is set but the text is not JSON
//! - [`Retrieval::Ready`]: decoded records (possibly none)
//!
//! Only a snapshot with no variable store at all is an error.

use crate::completion::{self, COMPLETE_VARIABLE};
use crate::encoder::unescape;
use crate::program::{ScanKind, TOTAL_POINTS_VARIABLE};
use probekit_core::{HostError, RotarySamplePoint, SamplePoint};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Snapshot path of the per-job variable store
pub const TEMP_VARIABLES_PATH: &str = "opensbp.tempVariables";

/// Outcome of a retrieval attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval<T> {
    /// The completion flag is absent or false
    NotReady,
    /// The flag is set but the accumulator did not decode
    Malformed {
        /// Accumulator text as the host reported it
        raw: String,
        /// Parser diagnostic
        reason: String,
    },
    /// Decoded data
    Ready(T),
}

impl<T> Retrieval<T> {
    /// True when data was decoded
    pub fn is_ready(&self) -> bool {
        matches!(self, Retrieval::Ready(_))
    }

    /// Decoded data, if any
    pub fn ready(self) -> Option<T> {
        match self {
            Retrieval::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Transform the decoded data
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Retrieval<U> {
        match self {
            Retrieval::NotReady => Retrieval::NotReady,
            Retrieval::Malformed { raw, reason } => Retrieval::Malformed { raw, reason },
            Retrieval::Ready(value) => Retrieval::Ready(f(value)),
        }
    }
}

/// Reading produced by the single Z probe program
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZProbeReading {
    /// Z at probe contact, before zeroing
    pub probe_z: f64,
    /// Whether the program reached its closing statement
    pub complete: bool,
}

#[derive(Debug, Deserialize)]
struct WireSurfacePoint {
    x: f64,
    y: f64,
    z: f64,
    i: u32,
}

impl From<WireSurfacePoint> for SamplePoint {
    fn from(raw: WireSurfacePoint) -> Self {
        SamplePoint::new(raw.i, raw.x, raw.y, raw.z)
    }
}

#[derive(Debug, Deserialize)]
struct WireRotaryPoint {
    x: f64,
    y: f64,
    z: f64,
    a: f64,
    b: f64,
    i: u32,
}

impl From<WireRotaryPoint> for RotarySamplePoint {
    fn from(raw: WireRotaryPoint) -> Self {
        RotarySamplePoint::new(raw.i, raw.x, raw.y, raw.z, raw.a, raw.b)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireZProbe {
    probe_z: f64,
    #[serde(default)]
    complete: f64,
}

impl From<WireZProbe> for ZProbeReading {
    fn from(raw: WireZProbe) -> Self {
        ZProbeReading {
            probe_z: raw.probe_z,
            complete: raw.complete == 1.0,
        }
    }
}

fn lookup<'a>(snapshot: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
    path.split('.')
        .try_fold(snapshot, |node, key| node.get(key))
        .and_then(Value::as_object)
}

/// Upper-cased view of the host's user variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    variables: HashMap<String, Value>,
}

impl VariableStore {
    /// Extract the per-job variable store from a host configuration snapshot
    ///
    /// Only `opensbp.tempVariables` is read; persistent variables may hold a
    /// stale flag from an earlier job. A snapshot without it is a
    /// [`HostError::ChannelMissing`].
    pub fn from_snapshot(snapshot: &Value) -> Result<Self, HostError> {
        let temp = lookup(snapshot, TEMP_VARIABLES_PATH).ok_or_else(|| {
            HostError::ChannelMissing {
                path: TEMP_VARIABLES_PATH.to_string(),
            }
        })?;

        let store = Self::from_pairs(temp.iter().map(|(k, v)| (k.clone(), v.clone())));
        debug!("Variable store holds {} variables", store.len());
        Ok(store)
    }

    /// Build a store from name/value pairs; later pairs win
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Value)>) -> Self {
        let variables = pairs
            .into_iter()
            .map(|(name, value)| (name.to_ascii_uppercase(), value))
            .collect();
        Self { variables }
    }

    /// Raw value of a variable, looked up case-insensitively
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(&name.to_ascii_uppercase())
    }

    /// Textual value of a variable, numbers rendered as JSON numbers
    pub fn text(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Numeric value of a variable
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether the completion flag is set
    pub fn is_complete(&self) -> bool {
        self.get(COMPLETE_VARIABLE)
            .map(completion::is_set)
            .unwrap_or(false)
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True when the host reported no variables
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Unescape and parse accumulator text
pub fn decode_text<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(&unescape(raw))
}

fn decode_list<W, T>(store: &VariableStore, kind: ScanKind) -> Retrieval<Vec<T>>
where
    W: DeserializeOwned,
    T: From<W>,
{
    if !store.is_complete() {
        debug!("{} retrieval: completion flag not set", kind);
        return Retrieval::NotReady;
    }

    let variable = kind.accumulator_variable();
    let Some(raw) = store.text(variable) else {
        warn!("Completion flag set but &{} is missing", variable);
        return Retrieval::Ready(Vec::new());
    };

    let records: Vec<W> = match decode_text(&raw) {
        Ok(records) => records,
        Err(e) => {
            error!("Malformed &{} ({} chars): {}", variable, raw.len(), e);
            return Retrieval::Malformed {
                raw,
                reason: e.to_string(),
            };
        }
    };

    let points: Vec<T> = records.into_iter().map(T::from).collect();

    if let Some(expected) = store.number(TOTAL_POINTS_VARIABLE) {
        if expected != points.len() as f64 {
            warn!(
                "&{} reports {} points but {} were decoded",
                TOTAL_POINTS_VARIABLE,
                expected,
                points.len()
            );
        }
    }

    info!("Retrieved {} {} scan points", points.len(), kind);
    Retrieval::Ready(points)
}

/// Decode surface scan results from a store
pub fn decode_surface_store(store: &VariableStore) -> Retrieval<Vec<SamplePoint>> {
    decode_list::<WireSurfacePoint, SamplePoint>(store, ScanKind::Surface)
}

/// Decode rotary scan results from a store
pub fn decode_rotary_store(store: &VariableStore) -> Retrieval<Vec<RotarySamplePoint>> {
    decode_list::<WireRotaryPoint, RotarySamplePoint>(store, ScanKind::Rotary)
}

/// Decode the single Z probe reading from a store
///
/// Unlike the scans there is no empty reading, so a missing accumulator
/// with the flag set is reported as malformed.
pub fn decode_z_probe_store(store: &VariableStore) -> Retrieval<ZProbeReading> {
    if !store.is_complete() {
        return Retrieval::NotReady;
    }

    let variable = ScanKind::ZProbe.accumulator_variable();
    let Some(raw) = store.text(variable) else {
        warn!("Completion flag set but &{} is missing", variable);
        return Retrieval::Malformed {
            raw: String::new(),
            reason: format!("&{} is missing", variable),
        };
    };

    match decode_text::<WireZProbe>(&raw) {
        Ok(wire) => {
            let reading = ZProbeReading::from(wire);
            info!("Retrieved Z probe reading: {:.4}", reading.probe_z);
            Retrieval::Ready(reading)
        }
        Err(e) => {
            error!("Malformed &{}: {}", variable, e);
            Retrieval::Malformed {
                raw,
                reason: e.to_string(),
            }
        }
    }
}

/// Decode surface scan results from a host snapshot
pub fn decode_surface(snapshot: &Value) -> Result<Retrieval<Vec<SamplePoint>>, HostError> {
    Ok(decode_surface_store(&VariableStore::from_snapshot(snapshot)?))
}

/// Decode rotary scan results from a host snapshot
pub fn decode_rotary(snapshot: &Value) -> Result<Retrieval<Vec<RotarySamplePoint>>, HostError> {
    Ok(decode_rotary_store(&VariableStore::from_snapshot(snapshot)?))
}

/// Decode the Z probe reading from a host snapshot
pub fn decode_z_probe(snapshot: &Value) -> Result<Retrieval<ZProbeReading>, HostError> {
    Ok(decode_z_probe_store(&VariableStore::from_snapshot(snapshot)?))
}
