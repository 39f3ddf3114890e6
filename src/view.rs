//! Serializable projection of the model for the shell to render. The shell
//! never reads the model directly; everything it can display lives here.

use serde::{Deserialize, Serialize};

use crate::model::{
    Marker, MarkerKind, Model, Notice, PanelState, RiskLevel, RoutePreferences, SosState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeColor {
    Green,
    Yellow,
    Red,
}

/// Total over every risk level, including labels we have never seen:
/// anything that is not clearly Low or clearly High renders as caution.
#[must_use]
pub const fn risk_badge(level: &RiskLevel) -> BadgeColor {
    match level {
        RiskLevel::High => BadgeColor::Red,
        RiskLevel::Low => BadgeColor::Green,
        RiskLevel::Medium | RiskLevel::Unknown | RiskLevel::Other(_) => BadgeColor::Yellow,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinColor {
    Red,
    Green,
    Blue,
}

#[must_use]
pub const fn pin_color(kind: MarkerKind) -> PinColor {
    match kind {
        MarkerKind::Medical => PinColor::Red,
        MarkerKind::Exit => PinColor::Green,
        MarkerKind::Other => PinColor::Blue,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBadge {
    pub label: String,
    pub color: BadgeColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertView {
    pub title: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPin {
    pub lat: f64,
    pub lng: f64,
    pub color: PinColor,
}

impl MarkerPin {
    fn from_marker(marker: &Marker) -> Self {
        Self {
            lat: marker.location.lat(),
            lng: marker.location.lng(),
            color: pin_color(marker.kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub risk: RiskBadge,
    pub alerts: Vec<AlertView>,
    pub markers: Vec<MarkerPin>,
    pub route_path: Vec<PathPoint>,
    pub preferences: RoutePreferences,
    pub panel_shown: bool,
    pub sos_active: bool,
    /// Set while the device position is unknown; user actions that need a
    /// fix are disabled and the banner explains why.
    pub location_degraded: bool,
    pub notice: Option<Notice>,
}

impl ViewModel {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        Self {
            risk: RiskBadge {
                label: model.risk_level.label().to_string(),
                color: risk_badge(&model.risk_level),
            },
            alerts: model
                .alerts
                .iter()
                .map(|a| AlertView {
                    title: a.title.clone(),
                    snippet: a.snippet.clone(),
                })
                .collect(),
            markers: model.markers.iter().map(MarkerPin::from_marker).collect(),
            route_path: model
                .route_path
                .iter()
                .map(|c| PathPoint {
                    lat: c.lat(),
                    lng: c.lng(),
                })
                .collect(),
            preferences: model.preferences,
            panel_shown: matches!(model.panel, PanelState::Shown),
            sos_active: matches!(model.sos, SosState::Active),
            location_degraded: model.location.is_degraded(),
            notice: model.notice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    #[test]
    fn badge_color_is_total_over_risk_levels() {
        assert_eq!(risk_badge(&RiskLevel::High), BadgeColor::Red);
        assert_eq!(risk_badge(&RiskLevel::Low), BadgeColor::Green);
        assert_eq!(risk_badge(&RiskLevel::Medium), BadgeColor::Yellow);
        assert_eq!(risk_badge(&RiskLevel::Unknown), BadgeColor::Yellow);
        assert_eq!(
            risk_badge(&RiskLevel::Other("EXTREME".into())),
            BadgeColor::Yellow
        );
    }

    #[test]
    fn pin_colors_match_marker_kinds() {
        assert_eq!(pin_color(MarkerKind::Medical), PinColor::Red);
        assert_eq!(pin_color(MarkerKind::Exit), PinColor::Green);
        assert_eq!(pin_color(MarkerKind::Other), PinColor::Blue);
    }

    #[test]
    fn view_reflects_degraded_location() {
        let model = Model {
            location: crate::model::LocationState::PermissionDenied,
            ..Model::default()
        };
        let view = ViewModel::from_model(&model);
        assert!(view.location_degraded);
        assert!(!view.sos_active);
        assert_eq!(view.risk.label, "Unknown");
        assert_eq!(view.risk.color, BadgeColor::Yellow);
    }

    #[test]
    fn view_projects_markers_with_colors() {
        let model = Model {
            markers: vec![crate::model::Marker {
                location: Coordinate::new(30.268, -97.773).unwrap(),
                kind: MarkerKind::Medical,
            }],
            ..Model::default()
        };
        let view = ViewModel::from_model(&model);
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.markers[0].color, PinColor::Red);
    }
}
