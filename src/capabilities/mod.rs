pub mod location;

pub use self::location::{LocationOperation, LocationResponse};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::event::Event;

pub type AppHttp = Http<Event>;
pub type AppRender = Render<Event>;
pub type AppLocation = location::Location<Event>;

// The derive keys its generated shell glue to the event type carried by the
// capability fields, which is why Event itself satisfies the App trait (see
// the delegation impl in event.rs).
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
    pub location: location::Location<Event>,
}

// The derive keys its WithContext impl to Event; AppTester needs the same
// construction keyed to the real App. Both signatures are identical, so this
// just forwards.
impl crux_core::WithContext<crate::app::App, Effect> for Capabilities {
    fn new_with_context(
        context: crux_core::capability::ProtoContext<Effect, Event>,
    ) -> Capabilities {
        <Capabilities as crux_core::WithContext<Event, Effect>>::new_with_context(context)
    }
}
