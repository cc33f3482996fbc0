use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};
use anyhow::{anyhow, Result};
use syllo_core::Frame;
use syllo_timing::{FrameStats, HighPrecisionTimer, Timer};
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};
use tracing::debug;

use crate::presentation::Presentation;

pub fn render_text_pixmap<F: Font>(text: &str, font_size: f32, font: &F, color: Color) -> Pixmap {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    // Layout with baseline at ascent
    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    // Union pixel bounds from outlined glyphs
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            min_x = min_x.min(b.min.x);
            min_y = min_y.min(b.min.y);
            max_x = max_x.max(b.max.x);
            max_y = max_y.max(b.max.y);
        }
    }

    let empty = || Pixmap::new(1, 1).expect("1x1 pixmap");
    if min_x == f32::INFINITY {
        return empty();
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let Some(mut pm) = Pixmap::new(w, h) else {
        return empty();
    };
    let stride = w as usize;
    let dst = pm.pixels_mut();

    let cu = color.to_color_u8();
    for g in &glyphs {
        if let Some(out) = font.outline_glyph(g.clone()) {
            let b = out.px_bounds();
            out.draw(|x, y, cov| {
                if cov <= f32::EPSILON {
                    return;
                }
                let ix = (x as f32 + b.min.x - min_x).floor() as i32;
                let iy = (y as f32 + b.min.y - min_y).floor() as i32;
                if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                    return;
                }
                let i = iy as usize * stride + ix as usize;

                // Premultiply source by (coverage * alpha), then source-over
                let a = (cov * cu.alpha() as f32 / 255.0).clamp(0.0, 1.0);
                let src = [
                    cu.red() as f32 * a,
                    cu.green() as f32 * a,
                    cu.blue() as f32 * a,
                    a * 255.0,
                ];
                dst[i] = over(src, dst[i]);
            });
        }
    }

    pm
}

/// Porter-Duff over in premultiplied space: out = src + bg * (1 - src.a)
fn over(src: [f32; 4], bg: PremultipliedColorU8) -> PremultipliedColorU8 {
    let inv = 1.0 - src[3] / 255.0;
    let mix = |s: f32, d: u8| (s + d as f32 * inv).round().clamp(0.0, 255.0) as u8;
    let a = mix(src[3], bg.alpha());
    let r = mix(src[0], bg.red()).min(a);
    let g = mix(src[1], bg.green()).min(a);
    let b = mix(src[2], bg.blue()).min(a);
    PremultipliedColorU8::from_rgba(r, g, b, a).unwrap_or(bg)
}

struct TextCache {
    color: Color,
    map: HashMap<(String, u32), Arc<Pixmap>>,
}

impl TextCache {
    fn new(color: Color) -> Self {
        Self {
            color,
            map: HashMap::new(),
        }
    }

    fn get_or_render<F: Font>(&mut self, font: &F, text: &str, size_px: f32) -> Arc<Pixmap> {
        let key = (text.to_string(), size_px.to_bits());
        let color = self.color;
        Arc::clone(
            self.map
                .entry(key)
                .or_insert_with(|| Arc::new(render_text_pixmap(text, size_px, font, color))),
        )
    }
}

pub struct RenderStats {
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
}

/// Draws session frames onto an offscreen canvas and copies it to the
/// window's frame buffer.
pub struct SkiaRenderer {
    width: u32,
    height: u32,
    presentation: Presentation,
    font: FontVec,
    text_cache: TextCache,
    canvas: Pixmap,
    timer: HighPrecisionTimer,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32, font_bytes: Vec<u8>, presentation: Presentation) -> Result<Self> {
        let font = FontVec::try_from_vec(font_bytes).map_err(|e| anyhow!("invalid font: {e}"))?;
        let canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("cannot create {width}x{height} canvas"))?;
        debug!(width, height, "renderer created");
        Ok(Self {
            width,
            height,
            text_cache: TextCache::new(presentation.text_color()),
            presentation,
            font,
            canvas,
            timer: HighPrecisionTimer::new(),
        })
    }

    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    /// Draw + copy cost of the retained frames.
    pub fn render_stats(&self) -> FrameStats {
        self.timer.frame_stats()
    }

    /// Draws `frame`, plus the id being typed when `entry` is given, into
    /// `frame_buffer` (RGBA8, same size as the canvas).
    pub fn render_frame(
        &mut self,
        frame: &Frame<'_, Pixmap>,
        entry: Option<&str>,
        frame_buffer: &mut [u8],
    ) -> Result<RenderStats> {
        let t_draw = {
            let t = self.timer.now();
            self.draw(frame, entry);
            self.timer.elapsed(t)
        };

        let t_copy = {
            let t = self.timer.now();
            let data = self.canvas.data();
            if frame_buffer.len() != data.len() {
                return Err(anyhow!(
                    "frame buffer holds {} bytes, canvas {}",
                    frame_buffer.len(),
                    data.len()
                ));
            }
            frame_buffer.copy_from_slice(data);
            self.timer.elapsed(t)
        };

        let total = t_draw + t_copy;
        self.timer.record_frame(total);
        Ok(RenderStats {
            draw: t_draw,
            copy: t_copy,
            total,
        })
    }

    fn draw(&mut self, frame: &Frame<'_, Pixmap>, entry: Option<&str>) {
        self.canvas.fill(self.presentation.background_color());

        if let Some(backdrop) = frame.backdrop {
            self.blit(backdrop, 0, 0);
        }
        if let Some(stimulus) = frame.stimulus {
            let (x, y) = self.presentation.image_origin;
            self.blit(stimulus, x, y);
        }
        for line in &frame.lines {
            let y = self.presentation.slot_y(line.slot);
            let px = self.presentation.font_px(line.large);
            self.draw_text_centered(&line.text, px, y);
        }
        if let Some(text) = entry.filter(|t| !t.is_empty()) {
            let px = self.presentation.small_px;
            self.draw_text_centered(text, px, self.presentation.entry_y);
        }
    }

    fn draw_text_centered(&mut self, text: &str, size_px: f32, y_fraction: f32) {
        let pm = self.text_cache.get_or_render(&self.font, text, size_px);
        let x = (self.width as f32 - pm.width() as f32) * 0.5;
        let y = self.height as f32 * y_fraction - pm.height() as f32 * 0.5;
        self.blit(&pm, x as i32, y as i32);
    }

    /// Source-over blit of a premultiplied pixmap with its top-left at (x, y).
    fn blit(&mut self, src: &Pixmap, x: i32, y: i32) {
        let (cw, ch) = (self.width as i32, self.height as i32);
        let (w, h) = (src.width() as i32, src.height() as i32);

        // Cull fully off-screen
        if x + w <= 0 || y + h <= 0 || x >= cw || y >= ch {
            return;
        }

        let dst_x = x.max(0);
        let dst_y = y.max(0);
        let src_x = dst_x - x;
        let src_y = dst_y - y;
        let copy_w = (w - src_x).min(cw - dst_x) as usize;
        let copy_h = (h - src_y).min(ch - dst_y) as usize;

        let src_px = src.pixels();
        let dst_px = self.canvas.pixels_mut();
        for row in 0..copy_h {
            let s0 = (src_y as usize + row) * w as usize + src_x as usize;
            let d0 = (dst_y as usize + row) * cw as usize + dst_x as usize;
            let s_row = &src_px[s0..s0 + copy_w];
            let d_row = &mut dst_px[d0..d0 + copy_w];

            if s_row.iter().all(|p| p.alpha() == 255) {
                d_row.copy_from_slice(s_row);
                continue;
            }
            for (d, s) in d_row.iter_mut().zip(s_row) {
                match s.alpha() {
                    0 => {}
                    255 => *d = *s,
                    _ => {
                        let src = [
                            s.red() as f32,
                            s.green() as f32,
                            s.blue() as f32,
                            s.alpha() as f32,
                        ];
                        *d = over(src, *d);
                    }
                }
            }
        }
    }
}
