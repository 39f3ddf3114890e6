//! Wire types for the venue safety API and their conversions into domain
//! state. Responses come from a server we do not control end to end, so
//! every conversion here is lossy-tolerant: unknown labels map to catch-all
//! variants and entries with invalid coordinates are dropped rather than
//! failing the whole payload.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::{Alert, Coordinate, Marker, MarkerKind, RiskLevel, RoutePreferences};
use crate::{DeviceId, UserId};

/// Joins an endpoint path onto the session base URL. `None` means the
/// configured base URL cannot carry a path, which we treat as a
/// configuration error at the call site.
#[must_use]
pub fn endpoint(base: &Url, path: &str) -> Option<Url> {
    base.join(path).ok()
}

// --- POST /ping-location ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PingRequestDto {
    pub lat: f64,
    pub lng: f64,
    pub device_id: String,
}

impl PingRequestDto {
    #[must_use]
    pub fn new(position: Coordinate, device_id: &DeviceId) -> Self {
        Self {
            lat: position.lat(),
            lng: position.lng(),
            device_id: device_id.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PingResponseDto {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub current_risk: String,
}

impl PingResponseDto {
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_label(&self.current_risk)
    }
}

// --- GET /live-alerts ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

pub type AlertsDto = Vec<AlertDto>;

impl AlertDto {
    /// Feed items with neither a title nor a snippet carry no information
    /// and are dropped.
    #[must_use]
    pub fn into_alert(self) -> Option<Alert> {
        let title = self.title.unwrap_or_default();
        let snippet = self.snippet.unwrap_or_default();
        if title.is_empty() && snippet.is_empty() {
            return None;
        }
        Some(Alert { title, snippet })
    }
}

#[must_use]
pub fn alerts_from_wire(dtos: AlertsDto) -> Vec<Alert> {
    dtos.into_iter().filter_map(AlertDto::into_alert).collect()
}

// --- GET /markers ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerDto {
    #[serde(default)]
    pub id: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl MarkerDto {
    #[must_use]
    pub fn into_marker(self) -> Option<Marker> {
        let location = Coordinate::new(self.lat, self.lng).ok()?;
        Some(Marker {
            location,
            kind: MarkerKind::from_wire(&self.kind),
        })
    }
}

#[must_use]
pub fn markers_from_wire(dtos: Vec<MarkerDto>) -> Vec<Marker> {
    dtos.into_iter().filter_map(MarkerDto::into_marker).collect()
}

// --- POST /safe-route ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteRequestDto {
    pub start_lat: f64,
    pub start_lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lng: Option<f64>,
    pub prefer_wheelchair: bool,
    pub avoid_crowds: bool,
    pub closest_exit: bool,
}

impl RouteRequestDto {
    /// With `closest_exit` on, the destination is the server's choice and the
    /// end coordinates stay off the wire entirely.
    #[must_use]
    pub fn new(start: Coordinate, destination: Coordinate, prefs: RoutePreferences) -> Self {
        let (end_lat, end_lng) = if prefs.closest_exit {
            (None, None)
        } else {
            (Some(destination.lat()), Some(destination.lng()))
        };
        Self {
            start_lat: start.lat(),
            start_lng: start.lng(),
            end_lat,
            end_lng,
            prefer_wheelchair: prefs.wheelchair,
            avoid_crowds: prefs.avoid_crowds,
            closest_exit: prefs.closest_exit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteNodeDto {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteResponseDto {
    #[serde(default)]
    pub route: Vec<RouteNodeDto>,
}

impl RouteResponseDto {
    #[must_use]
    pub fn into_path(self) -> Vec<Coordinate> {
        self.route
            .into_iter()
            .filter_map(|node| Coordinate::new(node.lat, node.lng).ok())
            .collect()
    }
}

// --- POST /sos ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SosRequestDto {
    pub lat: f64,
    pub lng: f64,
    pub user_id: String,
    pub message: String,
}

impl SosRequestDto {
    #[must_use]
    pub fn new(position: Coordinate, user_id: &UserId, message: &str) -> Self {
        Self {
            lat: position.lat(),
            lng: position.lng(),
            user_id: user_id.as_str().to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SosResponseDto {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn endpoint_joins_paths() {
        let base = Url::parse("http://localhost:8000/").unwrap();
        assert_eq!(
            endpoint(&base, crate::SAFE_ROUTE_PATH).unwrap().as_str(),
            "http://localhost:8000/safe-route"
        );
    }

    #[test]
    fn closest_exit_omits_end_coordinates_on_the_wire() {
        let prefs = RoutePreferences {
            wheelchair: false,
            avoid_crowds: true,
            closest_exit: true,
        };
        let dto = RouteRequestDto::new(coord(30.0, -97.0), coord(30.2675, -97.769), prefs);
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("end_lat").is_none());
        assert!(json.get("end_lng").is_none());
        assert_eq!(json["closest_exit"], true);
    }

    #[test]
    fn destination_routes_carry_end_coordinates() {
        let dto = RouteRequestDto::new(
            coord(30.0, -97.0),
            coord(30.2675, -97.769),
            RoutePreferences::default(),
        );
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["end_lat"], 30.2675);
        assert_eq!(json["end_lng"], -97.769);
    }

    proptest! {
        // End coordinates appear on the wire exactly when closest_exit is off,
        // across the whole preference cube.
        #[test]
        fn end_presence_tracks_closest_exit(
            wheelchair in any::<bool>(),
            avoid_crowds in any::<bool>(),
            closest_exit in any::<bool>(),
        ) {
            let prefs = RoutePreferences { wheelchair, avoid_crowds, closest_exit };
            let dto = RouteRequestDto::new(coord(30.0, -97.0), coord(31.0, -98.0), prefs);
            let json = serde_json::to_value(&dto).unwrap();

            prop_assert_eq!(json.get("end_lat").is_some(), !closest_exit);
            prop_assert_eq!(json.get("end_lng").is_some(), !closest_exit);
            prop_assert_eq!(json["prefer_wheelchair"].as_bool(), Some(wheelchair));
            prop_assert_eq!(json["avoid_crowds"].as_bool(), Some(avoid_crowds));
            prop_assert_eq!(json["closest_exit"].as_bool(), Some(closest_exit));
        }
    }

    #[test]
    fn markers_with_invalid_coordinates_are_dropped() {
        let dtos = vec![
            MarkerDto {
                id: Some("medical_tent".into()),
                lat: 30.268,
                lng: -97.773,
                kind: "medical".into(),
            },
            MarkerDto {
                id: Some("broken".into()),
                lat: 999.0,
                lng: 0.0,
                kind: "exit".into(),
            },
        ];
        let markers = markers_from_wire(dtos);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, MarkerKind::Medical);
    }

    #[test]
    fn marker_wire_type_field_deserializes() {
        let json = r#"{"id": "exit_south", "lat": 30.264, "lng": -97.776, "type": "exit"}"#;
        let dto: MarkerDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.kind, "exit");
        assert_eq!(dto.into_marker().unwrap().kind, MarkerKind::Exit);
    }

    #[test]
    fn empty_alert_items_are_dropped() {
        let dtos = vec![
            AlertDto {
                title: Some("Storm warning".into()),
                snippet: None,
                link: Some("#".into()),
                date: None,
            },
            AlertDto {
                title: None,
                snippet: None,
                link: Some("#".into()),
                date: None,
            },
        ];
        let alerts = alerts_from_wire(dtos);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Storm warning");
        assert_eq!(alerts[0].snippet, "");
    }

    #[test]
    fn route_response_filters_invalid_nodes() {
        let dto = RouteResponseDto {
            route: vec![
                RouteNodeDto { lat: 30.269, lng: -97.771 },
                RouteNodeDto { lat: f64::NAN, lng: -97.77 },
                RouteNodeDto { lat: 30.264, lng: -97.776 },
            ],
        };
        assert_eq!(dto.into_path().len(), 2);
    }

    #[test]
    fn route_response_tolerates_extra_node_fields() {
        let json = r#"{"route": [{"lat": 30.269, "lng": -97.771, "type": "entry"}]}"#;
        let dto: RouteResponseDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.route.len(), 1);
    }

    #[test]
    fn ping_response_maps_to_risk_level() {
        let json = r#"{"status": "received", "current_risk": "High"}"#;
        let dto: PingResponseDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.risk_level(), RiskLevel::High);
    }
}
