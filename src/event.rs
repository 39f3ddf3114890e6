use serde::{Deserialize, Serialize};

use crate::api::{AlertsDto, PingResponseDto, RouteResponseDto, SosResponseDto};
use crate::capabilities::location::LocationResponse;
use crate::model::PreferenceKey;
use crate::SessionConfig;

/// Everything that can drive the core: shell-originated user intents plus
/// completions of effects the core previously requested.
#[derive(Debug, Serialize, Deserialize)]
pub enum Event {
    /// Shell finished booting; carries the session wiring.
    Started(Box<SessionConfig>),

    /// One-shot location acquisition completed (either way).
    #[serde(skip)]
    LocationResult(LocationResponse),

    /// Manual pull of the alert feed and markers.
    RefreshRequested,

    /// Completions of the three startup fetches.
    #[serde(skip)]
    RiskResponse(Box<crux_http::Result<crux_http::Response<PingResponseDto>>>),
    #[serde(skip)]
    AlertsResponse(Box<crux_http::Result<crux_http::Response<AlertsDto>>>),
    #[serde(skip)]
    MarkersResponse(Box<crux_http::Result<crux_http::Response<Vec<crate::api::MarkerDto>>>>),

    /// Navigation panel open/close.
    NavigateTapped,
    NavigateCancelled,

    PreferenceToggled(PreferenceKey),
    RouteRequested,
    #[serde(skip)]
    RouteResponse {
        seq: u64,
        result: Box<crux_http::Result<crux_http::Response<RouteResponseDto>>>,
    },

    SosTriggered,
    #[serde(skip)]
    SosResponse {
        seq: u64,
        result: Box<crux_http::Result<crux_http::Response<SosResponseDto>>>,
    },
    /// Long-press gesture clearing the distress state regardless of what is
    /// still in flight.
    SosOverride,

    DismissNotice,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Started(_) => "started",
            Self::LocationResult(_) => "location_result",
            Self::RefreshRequested => "refresh_requested",
            Self::RiskResponse(_) => "risk_response",
            Self::AlertsResponse(_) => "alerts_response",
            Self::MarkersResponse(_) => "markers_response",
            Self::NavigateTapped => "navigate_tapped",
            Self::NavigateCancelled => "navigate_cancelled",
            Self::PreferenceToggled(_) => "preference_toggled",
            Self::RouteRequested => "route_requested",
            Self::RouteResponse { .. } => "route_response",
            Self::SosTriggered => "sos_triggered",
            Self::SosResponse { .. } => "sos_response",
            Self::SosOverride => "sos_override",
            Self::DismissNotice => "dismiss_notice",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::RefreshRequested
                | Self::NavigateTapped
                | Self::NavigateCancelled
                | Self::PreferenceToggled(_)
                | Self::RouteRequested
                | Self::SosTriggered
                | Self::SosOverride
                | Self::DismissNotice
        )
    }
}

// The Effect derive generates its WithContext impl over the event type, so
// Event has to satisfy the App trait. Everything delegates to the real app;
// the Default impl exists only to meet the trait bound.
impl Default for Event {
    fn default() -> Self {
        Self::RefreshRequested
    }
}

impl crux_core::App for Event {
    type Event = Event;
    type Model = crate::model::Model;
    type ViewModel = crate::view::ViewModel;
    type Capabilities = crate::capabilities::Capabilities;

    fn update(
        &self,
        event: Self::Event,
        model: &mut Self::Model,
        caps: &Self::Capabilities,
    ) {
        crux_core::App::update(&crate::app::App, event, model, caps);
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        crux_core::App::view(&crate::app::App, model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_events_are_not_user_initiated() {
        assert!(!Event::Started(Box::default()).is_user_initiated());
        assert!(Event::SosTriggered.is_user_initiated());
        assert!(Event::PreferenceToggled(PreferenceKey::Wheelchair).is_user_initiated());
    }

    #[test]
    fn event_names_are_stable() {
        assert_eq!(Event::RouteRequested.name(), "route_requested");
        assert_eq!(Event::SosOverride.name(), "sos_override");
    }
}
