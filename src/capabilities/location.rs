use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::model::{Coordinate, LocationState};

/// One-shot device position acquisition. The shell owns the platform
/// permission dance; the core only sees the final outcome.
pub struct Location<E> {
    context: CapabilityContext<LocationOperation, E>,
}

impl<Ev> Capability<Ev> for Location<Ev> {
    type Operation = LocationOperation;
    type MappedSelf<MappedEv> = Location<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Location::new(self.context.map_event(f))
    }
}

impl<E> Location<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<LocationOperation, E>) -> Self {
        Self { context }
    }

    pub fn get_position<F>(&self, make_event: F)
    where
        F: FnOnce(LocationResponse) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let response = context
                .request_from_shell(LocationOperation::GetPosition)
                .await;
            context.update_app(make_event(response));
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationOperation {
    GetPosition,
}

impl Operation for LocationOperation {
    type Output = LocationResponse;
}

/// What the shell reports back for a position request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationResponse {
    Position { lat: f64, lng: f64 },
    PermissionDenied,
    Unavailable,
}

impl LocationResponse {
    /// Collapses the shell report into model state, validating the raw
    /// coordinates. A fix with garbage numbers counts as unavailable.
    #[must_use]
    pub fn into_state(self) -> LocationState {
        match self {
            Self::Position { lat, lng } => match Coordinate::new(lat, lng) {
                Ok(coord) => LocationState::Available(coord),
                Err(_) => LocationState::Unavailable,
            },
            Self::PermissionDenied => LocationState::PermissionDenied,
            Self::Unavailable => LocationState::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_position_becomes_available() {
        let state = LocationResponse::Position {
            lat: 30.2672,
            lng: -97.7431,
        }
        .into_state();
        assert!(matches!(state, LocationState::Available(_)));
    }

    #[test]
    fn invalid_position_becomes_unavailable() {
        let state = LocationResponse::Position {
            lat: 200.0,
            lng: 0.0,
        }
        .into_state();
        assert_eq!(state, LocationState::Unavailable);

        let state = LocationResponse::Position {
            lat: f64::NAN,
            lng: 0.0,
        }
        .into_state();
        assert_eq!(state, LocationState::Unavailable);
    }

    #[test]
    fn denial_is_preserved() {
        assert_eq!(
            LocationResponse::PermissionDenied.into_state(),
            LocationState::PermissionDenied
        );
    }
}
