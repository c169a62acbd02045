use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasContext {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub width: u32,
    pub height: u32,
}

impl CanvasContext {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no global `window` exists")?;
        let document = window
            .document()
            .ok_or("should have a document on window")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or(format!("canvas element '{}' not found", canvas_id))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| format!("element '{}' is not a canvas", canvas_id))?;

        let ctx = canvas
            .get_context("2d")?
            .ok_or("2D canvas context not supported")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let width = canvas.width();
        let height = canvas.height();

        Ok(Self {
            canvas,
            ctx,
            width,
            height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn clear(&self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    pub fn polyline(&self, points: &[(f64, f64)], color: &str, width: f64) {
        if points.len() < 2 {
            return;
        }
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(width);
        ctx.begin_path();
        ctx.move_to(points[0].0, points[0].1);
        for p in &points[1..] {
            ctx.line_to(p.0, p.1);
        }
        ctx.stroke();
    }

    pub fn segment(&self, from: (f64, f64), to: (f64, f64), color: &str, width: f64) {
        self.polyline(&[from, to], color, width);
    }

    pub fn circle(
        &self,
        x: f64,
        y: f64,
        radius: f64,
        fill: &str,
        stroke: &str,
        width: f64,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU)?;
        ctx.set_fill_style_str(fill);
        ctx.fill();
        ctx.set_stroke_style_str(stroke);
        ctx.set_line_width(width);
        ctx.stroke();
        Ok(())
    }

    pub fn rect(&self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: &str, width: f64) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(fill);
        ctx.fill_rect(x, y, w, h);
        ctx.set_stroke_style_str(stroke);
        ctx.set_line_width(width);
        ctx.stroke_rect(x, y, w, h);
    }

    pub fn text(
        &self,
        s: &str,
        x: f64,
        y: f64,
        align: &str,
        baseline: &str,
        color: &str,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_font("12px sans-serif");
        ctx.set_text_align(align);
        ctx.set_text_baseline(baseline);
        ctx.set_fill_style_str(color);
        ctx.fill_text(s, x, y)
    }
}
