use pulse_common::live::{socket_url, TWEETS_PATH};
use wasm_bindgen::prelude::*;

mod listener;
mod renderer;

pub use listener::{LiveChart, LiveState};
pub use renderer::{CanvasContext, ChartSurface};

/// Id of the `<canvas>` the page provides for the chart.
pub const CANVAS_ID: &str = "myChart";

pub(crate) fn init_logging() {
    console_error_panic_hook::set_once();
    // Already set when a second chart is created on the same page.
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Page entry point: draw the seed chart on `#myChart` and listen on
/// `/ws/tweets` of the page's own host.
#[wasm_bindgen]
pub fn start() -> Result<LiveChart, JsValue> {
    init_logging();
    let location = web_sys::window().ok_or("no window")?.location();
    let url = socket_url(&location.protocol()?, &location.host()?, TWEETS_PATH);
    LiveChart::new(CANVAS_ID, &url)
}
