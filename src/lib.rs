#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod api;
pub mod app;
pub mod capabilities;
pub mod event;
pub mod model;
pub mod view;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::{
    Alert, Coordinate, LocationState, Marker, MarkerKind, Model, Notice, NoticeKind, PanelState,
    PreferenceKey, RiskLevel, RoutePreferences, SosState, ValidationError,
};
pub use view::ViewModel;

/// How long a transient notice stays on screen before the shell dismisses it.
pub const DEFAULT_NOTICE_DURATION_MS: u64 = 4000;

pub const PING_LOCATION_PATH: &str = "ping-location";
pub const LIVE_ALERTS_PATH: &str = "live-alerts";
pub const MARKERS_PATH: &str = "markers";
pub const SAFE_ROUTE_PATH: &str = "safe-route";
pub const SOS_PATH: &str = "sos";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";
pub const DEFAULT_SOS_MESSAGE: &str = "Emergency! I need help!";

/// Seeded navigation target used until venue-supplied destinations exist.
pub const DEMO_DESTINATION: Coordinate = Coordinate::from_parts(30.2675, -97.769);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub String);

impl DeviceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-session wiring handed to the core at startup. The shell decides the
/// server base URL and identity; the core never invents them after launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub base_url: Url,
    pub device_id: DeviceId,
    pub user_id: UserId,
    pub destination: Coordinate,
    pub sos_message: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let base_url = match Url::parse(DEFAULT_BASE_URL) {
            Ok(url) => url,
            // Constant is a valid URL; this arm is unreachable.
            Err(_) => unreachable!("default base URL is valid"),
        };
        Self {
            base_url,
            device_id: DeviceId::generate(),
            user_id: UserId::generate(),
            destination: DEMO_DESTINATION,
            sos_message: DEFAULT_SOS_MESSAGE.to_string(),
        }
    }
}
