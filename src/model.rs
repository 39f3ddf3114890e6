use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{SessionConfig, DEFAULT_NOTICE_DURATION_MS};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

/// A single resolved device position. Produced only by validating a shell
/// location fix or a route-response node; out-of-range and non-finite values
/// never make it into the model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(ValidationError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Compile-time-known valid values only (configuration defaults).
    pub(crate) const fn from_parts(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lng(self) -> f64 {
        self.lng
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.lat.to_bits() == other.lat.to_bits() && self.lng.to_bits() == other.lng.to_bits()
    }
}

impl Eq for Coordinate {}

/// Coarse area-safety classification, computed remotely. Only the ping
/// response handler replaces it; everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RiskLevel {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
    /// Any label the server sends that we do not recognize. Kept verbatim so
    /// the badge stays total and the raw text remains displayable.
    Other(String),
}

impl RiskLevel {
    /// Total over all input strings; never fails, never panics.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "High" => Self::High,
            "Medium" => Self::Medium,
            "Low" => Self::Low,
            "Unknown" | "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Unknown => "Unknown",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry in the live safety feed. Identity is positional; the whole list
/// is replaced on every successful fetch, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Medical,
    Exit,
    Other,
}

impl MarkerKind {
    /// Total over all wire strings; unrecognized types (stage, entry, food,
    /// future additions) render as plain points of interest.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "medical" => Self::Medical,
            "exit" => Self::Exit,
            _ => Self::Other,
        }
    }
}

/// A fixed point of interest on the venue map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub location: Coordinate,
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKey {
    Wheelchair,
    AvoidCrowds,
    ClosestExit,
}

/// Route-constraint selections. Independent toggles; no combination is
/// rejected on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoutePreferences {
    pub wheelchair: bool,
    pub avoid_crowds: bool,
    pub closest_exit: bool,
}

impl RoutePreferences {
    pub fn toggle(&mut self, key: PreferenceKey) {
        match key {
            PreferenceKey::Wheelchair => self.wheelchair = !self.wheelchair,
            PreferenceKey::AvoidCrowds => self.avoid_crowds = !self.avoid_crowds,
            PreferenceKey::ClosestExit => self.closest_exit = !self.closest_exit,
        }
    }
}

/// Navigation-panel visibility. Route requests are only honored in `Shown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    #[default]
    Hidden,
    Shown,
}

impl PanelState {
    #[must_use]
    pub const fn is_shown(self) -> bool {
        matches!(self, Self::Shown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SosState {
    #[default]
    Idle,
    Active,
}

impl SosState {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Outcome of the one-shot location acquisition at session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationState {
    #[default]
    Pending,
    Available(Coordinate),
    PermissionDenied,
    Unavailable,
}

impl LocationState {
    #[must_use]
    pub const fn fix(&self) -> Option<Coordinate> {
        match self {
            Self::Available(coord) => Some(*coord),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A transient user-facing message (toast). At most one is held; a new
/// notice replaces the old.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub duration_ms: u64,
}

impl Notice {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: NoticeKind) -> Self {
        Self {
            message: message.into(),
            kind,
            duration_ms: DEFAULT_NOTICE_DURATION_MS,
        }
    }
}

/// Versioned slot for an optimistic operation with in-flight network work.
/// Each issued request gets a monotonically increasing sequence number;
/// completion handlers compare against the latest issued number to detect
/// results arriving out of order (SOS discards them, routes log them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestSeq {
    issued: u64,
}

impl RequestSeq {
    /// Allocates the sequence number for a new request.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Bumps the counter without a request attached, so any outstanding
    /// completion becomes stale (used by the SOS override gesture).
    pub fn invalidate(&mut self) {
        self.issued += 1;
    }

    #[must_use]
    pub const fn is_current(self, seq: u64) -> bool {
        self.issued == seq
    }
}

/// All state held by the coordination core. Owned by the single app instance
/// for the lifetime of the session; mutated only inside `update`.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub session: SessionConfig,
    pub location: LocationState,
    pub risk_level: RiskLevel,
    pub alerts: Vec<Alert>,
    pub markers: Vec<Marker>,
    /// Current route polyline; empty means "nothing displayed". Replaced
    /// atomically by a successful non-empty route response.
    pub route_path: Vec<Coordinate>,
    pub preferences: RoutePreferences,
    pub panel: PanelState,
    pub sos: SosState,
    pub route_seq: RequestSeq,
    pub sos_seq: RequestSeq,
    pub notice: Option<Notice>,
}

impl Model {
    pub fn show_notice(&mut self, message: impl Into<String>, kind: NoticeKind) {
        self.notice = Some(Notice::new(message, kind));
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
