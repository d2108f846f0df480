use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};

pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
    FontVec::try_from_vec(bytes).with_context(|| format!("Invalid font file {}", path.display()))
}

/// Rasterized labels keyed by text, pixel size and color
pub struct LabelCache {
    font: FontVec,
    map: HashMap<(String, u32, [u8; 4]), Pixmap>,
}

impl LabelCache {
    pub fn new(font: FontVec) -> Self {
        Self {
            font,
            map: HashMap::new(),
        }
    }

    pub fn get_or_render(&mut self, text: &str, size_px: f32, rgba: [u8; 4]) -> Option<&Pixmap> {
        let key = (text.to_string(), size_px.to_bits(), rgba);
        if !self.map.contains_key(&key) {
            let color = Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
            let pm = render_text_pixmap(text, size_px, &self.font, color)?;
            self.map.insert(key.clone(), pm);
        }
        self.map.get(&key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Renders `text` tightly cropped into a transparent premultiplied pixmap.
///
/// Returns `None` when no glyph has an outline (e.g. only spaces).
pub fn render_text_pixmap<F: Font>(
    text: &str,
    font_size: f32,
    font: &F,
    color: Color,
) -> Option<Pixmap> {
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

    let outlines: Vec<_> = glyphs
        .into_iter()
        .filter_map(|g| font.outline_glyph(g))
        .collect();
    if outlines.is_empty() {
        return None;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for out in &outlines {
        let b = out.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;

    let stride = w as usize;
    let dst = pm.pixels_mut();
    let cu = color.to_color_u8();

    for out in &outlines {
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

            // Source premultiplied by coverage, then Porter-Duff over
            let a_lin = (cov * cu.alpha() as f32 / 255.0).clamp(0.0, 1.0);
            let sr = (cu.red() as f32 * a_lin) as u8;
            let sg = (cu.green() as f32 * a_lin) as u8;
            let sb = (cu.blue() as f32 * a_lin) as u8;
            let sa = (a_lin * 255.0) as u8;

            let bg = dst[i];
            let inv = 1.0 - (sa as f32 / 255.0);
            let r = sr.saturating_add((bg.red() as f32 * inv) as u8);
            let g = sg.saturating_add((bg.green() as f32 * inv) as u8);
            let bl = sb.saturating_add((bg.blue() as f32 * inv) as u8);
            let a = sa.saturating_add((bg.alpha() as f32 * inv) as u8);

            if let Some(px) = PremultipliedColorU8::from_rgba(r, g, bl, a) {
                dst[i] = px;
            }
        });
    }

    Some(pm)
}
