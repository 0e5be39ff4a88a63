use glam::DVec2;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, ImageSmoothingQuality,
};

use crate::board::{Board, BoardLayout, fit_canvas_px, map_client_point};
use crate::consts::{THUMB_QUALITY, THUMB_SIZE};

const FALLBACK_ACCENT: &str = "#94a3b8";

// strokeStyle via property assignment; the typed setters moved between
// web-sys releases.
fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("not a 2d context"))
}

fn image_size(image: &HtmlImageElement) -> DVec2 {
    DVec2::new(image.natural_width() as f64, image.natural_height() as f64)
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    image: HtmlImageElement,
    rows: usize,
    cols: usize,
}

impl CanvasRenderer {
    pub fn new(
        canvas: HtmlCanvasElement,
        image: HtmlImageElement,
        rows: usize,
        cols: usize,
    ) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            image,
            rows,
            cols,
        })
    }

    /// Resize the square backing store to the element's CSS box
    pub fn fit(&self, device_pixel_ratio: f64) {
        let rect = self.canvas.get_bounding_client_rect();
        let px = fit_canvas_px(rect.width(), rect.height(), device_pixel_ratio);
        if self.canvas.width() != px {
            self.canvas.set_width(px);
        }
        if self.canvas.height() != px {
            self.canvas.set_height(px);
        }
    }

    pub fn layout(&self) -> BoardLayout {
        BoardLayout::new(
            DVec2::new(self.canvas.width() as f64, self.canvas.height() as f64),
            self.rows,
            self.cols,
        )
    }

    /// Client (CSS) coordinates of a pointer event -> canvas pixels
    pub fn client_to_canvas(&self, client_x: f64, client_y: f64) -> DVec2 {
        let rect = self.canvas.get_bounding_client_rect();
        map_client_point(
            DVec2::new(client_x, client_y),
            DVec2::new(rect.left(), rect.top()),
            DVec2::new(rect.width(), rect.height()),
            self.layout().canvas,
        )
    }

    pub fn draw(&self, board: &Board, preview: bool) {
        let layout = self.layout();
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, layout.canvas.x, layout.canvas.y);
        ctx.set_image_smoothing_enabled(true);
        ctx.set_image_smoothing_quality(ImageSmoothingQuality::High);

        let img = image_size(&self.image);
        if preview {
            let _ = ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.image, 0.0, 0.0, img.x, img.y, 0.0, 0.0, layout.canvas.x, layout.canvas.y,
            );
            return;
        }

        let tile = layout.tile_size();
        for (cell, &src) in board.tiles().iter().enumerate() {
            let (s_origin, s_size) = layout.source_rect(src, img);
            let dst = layout.cell_origin(cell);
            let _ = ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.image, s_origin.x, s_origin.y, s_size.x, s_size.y, dst.x, dst.y, tile.x,
                tile.y,
            );
        }

        if let Some(sel) = board.selection() {
            ctx.set_line_width(layout.selection_stroke_width());
            set_stroke_style(ctx, &self.accent_color());
            let origin = layout.cell_origin(sel);
            ctx.stroke_rect(origin.x + 1.0, origin.y + 1.0, tile.x - 2.0, tile.y - 2.0);
        }
    }

    /// Theme accent from the `--accent-2` CSS variable
    fn accent_color(&self) -> String {
        web_sys::window()
            .and_then(|w| {
                let root = w.document()?.document_element()?;
                w.get_computed_style(&root).ok().flatten()
            })
            .and_then(|style| style.get_property_value("--accent-2").ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| FALLBACK_ACCENT.to_string())
    }
}

/// Square JPEG data URL of the whole source image
pub fn thumbnail(image: &HtmlImageElement) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
    canvas.set_width(THUMB_SIZE);
    canvas.set_height(THUMB_SIZE);
    let ctx = context_2d(&canvas).ok()?;
    let img = image_size(image);
    let side = THUMB_SIZE as f64;
    ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        image, 0.0, 0.0, img.x, img.y, 0.0, 0.0, side, side,
    )
    .ok()?;
    canvas
        .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(THUMB_QUALITY))
        .ok()
}
