use tracing::{debug, warn};

use crate::api::{self, PingRequestDto, RouteRequestDto, SosRequestDto};
use crate::capabilities::Capabilities;
use crate::event::Event;
use crate::model::{Model, NoticeKind, PanelState, SosState};
use crate::view::ViewModel;
use crate::{LIVE_ALERTS_PATH, MARKERS_PATH, PING_LOCATION_PATH, SAFE_ROUTE_PATH, SOS_PATH};

#[derive(Default)]
pub struct App;

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Self::Event, model: &mut Self::Model, caps: &Self::Capabilities) {
        debug!(event = event.name(), "handling event");

        match event {
            Event::Started(config) => {
                model.session = *config;
                caps.location.get_position(Event::LocationResult);
                // The feed and markers don't need a fix; they must not wait
                // on the shell's permission dance.
                self.fetch_alerts(model, caps);
                self.fetch_markers(model, caps);
            }

            Event::LocationResult(response) => {
                model.location = response.into_state();
                if model.location.is_degraded() {
                    model.show_notice(
                        "Location unavailable. Some features are limited.",
                        NoticeKind::Warning,
                    );
                }
                self.send_ping(model, caps);
            }

            Event::RefreshRequested => {
                self.send_ping(model, caps);
                self.fetch_alerts(model, caps);
                self.fetch_markers(model, caps);
            }

            Event::RiskResponse(result) => match *result {
                Ok(mut response) if response.status().is_success() => {
                    if let Some(dto) = response.take_body() {
                        model.risk_level = dto.risk_level();
                    }
                }
                Ok(response) => {
                    warn!(status = %response.status(), "risk ping rejected, keeping previous level");
                }
                Err(err) => {
                    warn!(error = %err, "risk ping failed, keeping previous level");
                }
            },

            Event::AlertsResponse(result) => match *result {
                Ok(mut response) if response.status().is_success() => {
                    if let Some(dtos) = response.take_body() {
                        model.alerts = api::alerts_from_wire(dtos);
                    }
                }
                Ok(response) => {
                    warn!(status = %response.status(), "alert feed rejected, keeping previous feed");
                }
                Err(err) => {
                    warn!(error = %err, "alert feed failed, keeping previous feed");
                }
            },

            Event::MarkersResponse(result) => match *result {
                Ok(mut response) if response.status().is_success() => {
                    if let Some(dtos) = response.take_body() {
                        model.markers = api::markers_from_wire(dtos);
                    }
                }
                Ok(response) => {
                    warn!(status = %response.status(), "marker fetch rejected, keeping previous set");
                }
                Err(err) => {
                    warn!(error = %err, "marker fetch failed, keeping previous set");
                }
            },

            Event::NavigateTapped => {
                model.panel = PanelState::Shown;
            }

            Event::NavigateCancelled => {
                model.panel = PanelState::Hidden;
            }

            Event::PreferenceToggled(key) => {
                model.preferences.toggle(key);
            }

            Event::RouteRequested => {
                self.request_route(model, caps);
            }

            Event::RouteResponse { seq, result } => {
                // Last arrival wins. Out-of-order completions are applied
                // anyway, only noted.
                if !model.route_seq.is_current(seq) {
                    warn!(seq, "route response arrived out of order");
                }
                match *result {
                    Ok(mut response) if response.status().is_success() => {
                        let path = response
                            .take_body()
                            .map(api::RouteResponseDto::into_path)
                            .unwrap_or_default();
                        if path.is_empty() {
                            model.show_notice(
                                "No route found. Try different preferences.",
                                NoticeKind::Info,
                            );
                        } else {
                            model.route_path = path;
                            model.panel = PanelState::Hidden;
                        }
                    }
                    Ok(response) => {
                        warn!(status = %response.status(), "route request rejected");
                        model.show_notice(
                            "Could not fetch route. Check your connection.",
                            NoticeKind::Error,
                        );
                    }
                    Err(err) => {
                        warn!(error = %err, "route request failed");
                        model.show_notice(
                            "Could not fetch route. Check your connection.",
                            NoticeKind::Error,
                        );
                    }
                }
            }

            Event::SosTriggered => {
                self.trigger_sos(model, caps);
            }

            Event::SosResponse { seq, result } => {
                if !model.sos_seq.is_current(seq) {
                    debug!(seq, "discarding stale sos response");
                    caps.render.render();
                    return;
                }
                match *result {
                    Ok(response) if response.status().is_success() => {
                        model.show_notice(
                            "Emergency services have been notified.",
                            NoticeKind::Success,
                        );
                    }
                    Ok(response) => {
                        warn!(status = %response.status(), "sos rejected");
                        model.sos = SosState::Idle;
                        model.show_notice(
                            "SOS could not be sent. Please try again.",
                            NoticeKind::Error,
                        );
                    }
                    Err(err) => {
                        warn!(error = %err, "sos failed");
                        model.sos = SosState::Idle;
                        model.show_notice(
                            "SOS could not be sent. Please try again.",
                            NoticeKind::Error,
                        );
                    }
                }
            }

            Event::SosOverride => {
                model.sos = SosState::Idle;
                // Any in-flight completion is now stale.
                model.sos_seq.invalidate();
                model.show_notice("SOS cancelled.", NoticeKind::Info);
            }

            Event::DismissNotice => {
                model.clear_notice();
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        ViewModel::from_model(model)
    }
}

impl App {
    fn send_ping(&self, model: &Model, caps: &Capabilities) {
        let Some(position) = model.location.fix() else {
            return;
        };
        let Some(url) = api::endpoint(&model.session.base_url, PING_LOCATION_PATH) else {
            warn!("base URL cannot address the ping endpoint");
            return;
        };
        let payload = PingRequestDto::new(position, &model.session.device_id);
        match caps.http.post(url.as_str()).body_json(&payload) {
            Ok(builder) => builder
                .expect_json()
                .send(|result| Event::RiskResponse(Box::new(result))),
            Err(err) => warn!(error = %err, "failed to encode ping payload"),
        }
    }

    fn fetch_alerts(&self, model: &Model, caps: &Capabilities) {
        let Some(url) = api::endpoint(&model.session.base_url, LIVE_ALERTS_PATH) else {
            warn!("base URL cannot address the alerts endpoint");
            return;
        };
        caps.http
            .get(url.as_str())
            .expect_json()
            .send(|result| Event::AlertsResponse(Box::new(result)));
    }

    fn fetch_markers(&self, model: &Model, caps: &Capabilities) {
        let Some(url) = api::endpoint(&model.session.base_url, MARKERS_PATH) else {
            warn!("base URL cannot address the markers endpoint");
            return;
        };
        caps.http
            .get(url.as_str())
            .expect_json()
            .send(|result| Event::MarkersResponse(Box::new(result)));
    }

    fn request_route(&self, model: &mut Model, caps: &Capabilities) {
        if !model.panel.is_shown() {
            debug!("ignoring route request with panel hidden");
            return;
        }
        let Some(start) = model.location.fix() else {
            model.show_notice("Waiting for your location.", NoticeKind::Warning);
            return;
        };
        let Some(url) = api::endpoint(&model.session.base_url, SAFE_ROUTE_PATH) else {
            warn!("base URL cannot address the route endpoint");
            return;
        };

        let seq = model.route_seq.issue();
        let payload = RouteRequestDto::new(start, model.session.destination, model.preferences);
        match caps.http.post(url.as_str()).body_json(&payload) {
            Ok(builder) => builder.expect_json().send(move |result| Event::RouteResponse {
                seq,
                result: Box::new(result),
            }),
            Err(err) => warn!(error = %err, "failed to encode route payload"),
        }
    }

    fn trigger_sos(&self, model: &mut Model, caps: &Capabilities) {
        if model.sos.is_active() {
            debug!("sos already active, ignoring trigger");
            return;
        }

        // Distress shows immediately; the network result only ever confirms
        // or reverts it.
        model.sos = SosState::Active;

        let Some(position) = model.location.fix() else {
            // No fix means nothing to send. The distress state still shows
            // so on-site staff can be flagged down manually.
            warn!("sos triggered without a location fix, no alert sent");
            model.show_notice(
                "SOS shown locally. Location unavailable, no alert sent.",
                NoticeKind::Warning,
            );
            return;
        };
        let Some(url) = api::endpoint(&model.session.base_url, SOS_PATH) else {
            warn!("base URL cannot address the sos endpoint");
            return;
        };

        let seq = model.sos_seq.issue();
        let payload =
            SosRequestDto::new(position, &model.session.user_id, &model.session.sos_message);
        match caps.http.post(url.as_str()).body_json(&payload) {
            Ok(builder) => builder.expect_json().send(move |result| Event::SosResponse {
                seq,
                result: Box::new(result),
            }),
            Err(err) => warn!(error = %err, "failed to encode sos payload"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Effect;
    use crate::model::PreferenceKey;
    use crux_core::testing::AppTester;

    #[test]
    fn navigate_toggles_panel() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        app.update(Event::NavigateTapped, &mut model);
        assert_eq!(model.panel, PanelState::Shown);

        app.update(Event::NavigateCancelled, &mut model);
        assert_eq!(model.panel, PanelState::Hidden);
    }

    #[test]
    fn preference_toggle_is_reflected_in_view() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        app.update(
            Event::PreferenceToggled(PreferenceKey::AvoidCrowds),
            &mut model,
        );
        let view = app.view(&model);
        assert!(view.preferences.avoid_crowds);
        assert!(!view.preferences.wheelchair);
    }

    #[test]
    fn route_request_without_panel_sends_nothing() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let update = app.update(Event::RouteRequested, &mut model);
        assert!(update
            .effects
            .iter()
            .all(|e| matches!(e, Effect::Render(_))));
    }

    #[test]
    fn dismiss_clears_notice() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();
        model.show_notice("hello", NoticeKind::Info);

        app.update(Event::DismissNotice, &mut model);
        assert!(model.notice.is_none());
    }

    #[test]
    fn sos_override_invalidates_pending_completion() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model {
            sos: SosState::Active,
            ..Model::default()
        };
        let seq = model.sos_seq.issue();

        app.update(Event::SosOverride, &mut model);
        assert_eq!(model.sos, SosState::Idle);
        assert!(!model.sos_seq.is_current(seq));
    }
}
