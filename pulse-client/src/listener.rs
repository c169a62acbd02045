//! Push-channel listener: one WebSocket feeding the chart surface.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, info, warn};
use pulse_common::{ChartConfig, ConnectionState, SampleWindow};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, Event, MessageEvent, WebSocket};

use crate::renderer::ChartSurface;

/// Everything the message callback touches.
pub struct LiveState {
    pub window: SampleWindow,
    pub surface: ChartSurface,
    pub connection: ConnectionState,
}

impl LiveState {
    /// Apply one inbound frame and redraw. A bad frame is logged and leaves
    /// the chart as it was.
    pub fn handle_frame(&mut self, text: &str) {
        debug!("LiveChart: frame {}", text);
        match self.window.apply_frame(text) {
            Ok(_) => {
                if let Err(e) = self.surface.update(&self.window) {
                    error!("LiveChart: redraw failed: {:?}", e);
                }
            }
            Err(e) => error!("LiveChart: dropped frame {:?}: {}", text, e),
        }
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    labels: &'a [String],
    values: &'a [f64],
    connected: bool,
}

/// Line chart kept live by a push channel. The widget only listens; it never
/// sends anything over the socket.
#[wasm_bindgen]
pub struct LiveChart {
    ws: WebSocket,
    state: Rc<RefCell<LiveState>>,

    // prevent GC of closures
    _onopen: Closure<dyn FnMut(Event)>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onclose: Closure<dyn FnMut(CloseEvent)>,
    _onerror: Closure<dyn FnMut(ErrorEvent)>,
}

#[wasm_bindgen]
impl LiveChart {
    /// Draw the seed chart on `canvas_id` and connect to `ws_url`, e.g.
    /// `ws://localhost:3080/ws/tweets`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, ws_url: &str) -> Result<LiveChart, JsValue> {
        Self::connect(canvas_id, ws_url, ChartConfig::default())
    }

    /// Same as the constructor, with a chart configuration object such as
    /// `{ kind: "bar", backgroundColor: ["rgba(73, 198, 230, 0.5)"] }`.
    pub fn with_config(
        canvas_id: &str,
        ws_url: &str,
        config: JsValue,
    ) -> Result<LiveChart, JsValue> {
        let config: ChartConfig = if config.is_undefined() || config.is_null() {
            ChartConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid chart config: {}", e)))?
        };
        Self::connect(canvas_id, ws_url, config)
    }

    /// True only while the socket is open. False before the browser has
    /// established it and after it closed; there is no reconnect.
    pub fn is_connected(&self) -> bool {
        self.state.borrow().connection.is_open() && self.ws.ready_state() == WebSocket::OPEN
    }

    /// Current samples, oldest first.
    pub fn values(&self) -> Vec<f64> {
        self.state.borrow().window.values().to_vec()
    }

    /// Labels, samples and connection flag as a plain JS object.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let state = self.state.borrow();
        let snapshot = Snapshot {
            labels: state.window.labels(),
            values: state.window.values(),
            connected: state.connection.is_open(),
        };
        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize snapshot: {}", e)))
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        let mut state = self.state.borrow_mut();
        let LiveState {
            window, surface, ..
        } = &mut *state;
        surface.resize(width, height, window)
    }

    /// Close the WebSocket connection.
    pub fn close(&self) -> Result<(), JsValue> {
        self.ws.close()
    }
}

impl LiveChart {
    fn connect(canvas_id: &str, ws_url: &str, config: ChartConfig) -> Result<LiveChart, JsValue> {
        crate::init_logging();

        let surface = ChartSurface::new(canvas_id, config)?;
        let window = SampleWindow::default();
        surface.update(&window)?;

        let ws = WebSocket::new(ws_url)?;
        let state = Rc::new(RefCell::new(LiveState {
            window,
            surface,
            connection: ConnectionState::Connecting,
        }));

        let onopen = {
            let state = Rc::clone(&state);
            Closure::wrap(Box::new(move |_e: Event| {
                state.borrow_mut().connection.on_open();
                info!("LiveChart: connected");
            }) as Box<dyn FnMut(Event)>)
        };
        ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

        // onmessage: parse `value`, shift the window, redraw
        let onmessage = {
            let state = Rc::clone(&state);
            Closure::wrap(Box::new(move |e: MessageEvent| match e.data().as_string() {
                Some(text) => state.borrow_mut().handle_frame(&text),
                None => warn!("LiveChart: ignoring non-text frame"),
            }) as Box<dyn FnMut(MessageEvent)>)
        };
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

        let onclose = {
            let state = Rc::clone(&state);
            Closure::wrap(Box::new(move |e: CloseEvent| {
                state.borrow_mut().connection.on_close();
                info!(
                    "LiveChart WS closed: code={}, reason={}",
                    e.code(),
                    e.reason()
                );
            }) as Box<dyn FnMut(CloseEvent)>)
        };
        ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

        let onerror = Closure::wrap(Box::new(move |_e: ErrorEvent| {
            error!("LiveChart WS error");
        }) as Box<dyn FnMut(ErrorEvent)>);
        ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        info!("LiveChart: connecting to {}", ws_url);

        Ok(LiveChart {
            ws,
            state,
            _onopen: onopen,
            _onmessage: onmessage,
            _onclose: onclose,
            _onerror: onerror,
        })
    }
}
