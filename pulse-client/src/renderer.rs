use pulse_common::{colors, ChartConfig, ChartKind, ChartLayout, Padding, SampleWindow};
use wasm_bindgen::prelude::*;

mod context;
pub use context::CanvasContext;

const POINT_RADIUS: f64 = 3.0;
/// Fraction of a category slot covered by its bar.
const BAR_FILL: f64 = 0.8;

/// Chart display surface bound to one `<canvas>`.
///
/// Drawing only happens in [`ChartSurface::update`]; mutating the window
/// without calling it leaves the old picture on screen.
pub struct ChartSurface {
    pub context: CanvasContext,
    pub config: ChartConfig,
    padding: Padding,
}

impl ChartSurface {
    pub fn new(canvas_id: &str, config: ChartConfig) -> Result<Self, JsValue> {
        let context = CanvasContext::new(canvas_id)?;
        Ok(Self {
            context,
            config,
            padding: Padding::default(),
        })
    }

    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        window: &SampleWindow,
    ) -> Result<(), JsValue> {
        self.context.resize(width, height);
        self.update(window)
    }

    /// Redraw the whole chart from `window`.
    pub fn update(&self, window: &SampleWindow) -> Result<(), JsValue> {
        let ctx = &self.context;
        let layout = ChartLayout::compute(
            ctx.width as f64,
            ctx.height as f64,
            self.padding,
            window.labels(),
            window.values(),
        );

        ctx.clear(&colors::WHITE.to_css());
        self.draw_axes(&layout)?;
        match self.config.kind {
            ChartKind::Line => self.draw_line(&layout)?,
            ChartKind::Bar => self.draw_bars(&layout),
        }
        self.draw_legend()
    }

    fn draw_axes(&self, layout: &ChartLayout) -> Result<(), JsValue> {
        let ctx = &self.context;
        let area = layout.area;
        let grid = colors::LIGHTGRAY.to_css();
        let text = colors::DARKGRAY.to_css();

        for tick in &layout.ticks {
            ctx.segment((area.x, tick.y), (area.right(), tick.y), &grid, 1.0);
            ctx.text(&tick.label, area.x - 6.0, tick.y, "right", "middle", &text)?;
        }
        for point in &layout.points {
            ctx.text(&point.label, point.x, area.bottom() + 6.0, "center", "top", &text)?;
        }
        ctx.segment(
            (area.x, area.y),
            (area.x, area.bottom()),
            &colors::GRAY.to_css(),
            1.0,
        );
        Ok(())
    }

    fn draw_line(&self, layout: &ChartLayout) -> Result<(), JsValue> {
        let ctx = &self.context;
        let border = self.config.border_color.to_css();
        let path: Vec<(f64, f64)> = layout.points.iter().map(|p| (p.x, p.y)).collect();
        ctx.polyline(&path, &border, self.config.border_width);
        for (i, p) in layout.points.iter().enumerate() {
            ctx.circle(
                p.x,
                p.y,
                POINT_RADIUS,
                &self.config.point_color(i).to_css(),
                &border,
                self.config.border_width,
            )?;
        }
        Ok(())
    }

    fn draw_bars(&self, layout: &ChartLayout) {
        let ctx = &self.context;
        let border = self.config.border_color.to_css();
        let bar_width = layout.slot_width * BAR_FILL;
        for (i, p) in layout.points.iter().enumerate() {
            let top = p.y.min(layout.baseline_y);
            let height = (p.y - layout.baseline_y).abs();
            ctx.rect(
                p.x - bar_width / 2.0,
                top,
                bar_width,
                height,
                &self.config.point_color(i).to_css(),
                &border,
                self.config.border_width,
            );
        }
    }

    fn draw_legend(&self) -> Result<(), JsValue> {
        let ctx = &self.context;
        let area_center = self.padding.left
            + (ctx.width as f64 - self.padding.left - self.padding.right).max(0.0) / 2.0;
        ctx.text(
            &self.config.dataset_label,
            area_center,
            2.0,
            "center",
            "top",
            &colors::BLACK.to_css(),
        )
    }
}
