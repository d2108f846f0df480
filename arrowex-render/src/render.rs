use crate::text::LabelCache;
use ab_glyph::FontVec;
use anyhow::{anyhow, Result};
use arrowex_core::{Rect as Area, StimulusElement};
use arrowex_experiment::Scene;
use arrowex_timing::Timer;
use std::time::Duration;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform};

const BACKGROUND: [u8; 4] = [240, 240, 240, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 220, 255];
const GREEN: [u8; 4] = [0, 180, 0, 255];
const RED: [u8; 4] = [220, 0, 0, 255];
const GRAY: [u8; 4] = [150, 150, 150, 255];

/// Arrow head stroke length and its angle off the shaft, degrees
const HEAD_LENGTH: f64 = 10.0;
const HEAD_ANGLE: f64 = 150.0;

const SMALL_TEXT: f32 = 22.0;
const LARGE_TEXT: f32 = 36.0;

pub struct FrameStats {
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
    pub arrows: usize,
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut p = Paint::default();
    p.set_color(Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]));
    p.anti_alias = true;
    p
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        ..Stroke::default()
    }
}

pub struct SkiaRenderer {
    width: u32,
    height: u32,
    canvas: Pixmap,
    labels: Option<LabelCache>,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("Failed to create {width}x{height} canvas"))?;
        Ok(Self {
            width,
            height,
            canvas,
            labels: None,
        })
    }

    /// Enables button and message labels; without a font they are skipped.
    pub fn with_font(mut self, font: FontVec) -> Self {
        self.labels = Some(LabelCache::new(font));
        self
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("Failed to create {width}x{height} canvas"))?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    /// Draws `scene` and copies it into an RGBA8 frame of the same size.
    pub fn render_frame<T: Timer>(
        &mut self,
        scene: &Scene<'_>,
        frame_buffer: &mut [u8],
        timer: &mut T,
    ) -> Result<FrameStats> {
        let t = timer.now();
        let arrows = self.draw_scene(scene);
        let draw = timer.elapsed(t);

        let t = timer.now();
        let data = self.canvas.data();
        if frame_buffer.len() != data.len() {
            return Err(anyhow!(
                "frame buffer is {} bytes, canvas is {}",
                frame_buffer.len(),
                data.len()
            ));
        }
        // canvas is opaque, so premultiplied and straight RGBA agree
        frame_buffer.copy_from_slice(data);
        let copy = timer.elapsed(t);

        let total = draw + copy;
        timer.record_frame(total);
        Ok(FrameStats {
            draw,
            copy,
            total,
            arrows,
        })
    }

    /// Draws onto the offscreen canvas and returns the number of arrows drawn.
    pub fn draw_scene(&mut self, scene: &Scene<'_>) -> usize {
        self.canvas.fill(Color::from_rgba8(
            BACKGROUND[0],
            BACKGROUND[1],
            BACKGROUND[2],
            BACKGROUND[3],
        ));

        let line_y = scene.reference_line_y as f32;
        self.draw_line((0.0, line_y), (self.width as f32, line_y), GRAY, 3.0);

        let mut arrows = 0;
        if let Some(field) = scene.field {
            for element in field.iter() {
                self.draw_arrow(element, scene.active_ticks, scene.arrow_length);
                arrows += 1;
            }
        }

        let state = scene.state;
        if state.accepts_start() {
            self.draw_button(scene.regions.start, "START", BLUE, true);
        }
        if state.shows_choice_regions() {
            self.draw_button(scene.regions.left_choice, "LEFT", GREEN, false);
            self.draw_button(scene.regions.right_choice, "RIGHT", GREEN, false);
        }
        if state.shows_feedback() {
            let center = (self.width as f32 / 2.0, self.height as f32 / 2.0);
            self.draw_label_centered("Click faster!", center, RED, true);
        }
        if state.is_complete() {
            self.draw_button(scene.regions.results, "RESULTS", BLUE, true);
        }

        let (round, total) = scene.round_display;
        let counter = format!("Round {round}/{total}");
        self.draw_label_at(&counter, (self.width as f32 - 140.0, 10.0), BLACK);

        arrows
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), rgba: [u8; 4], width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        if let Some(path) = pb.finish() {
            self.canvas.stroke_path(
                &path,
                &paint(rgba),
                &stroke(width),
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_arrow(&mut self, element: &StimulusElement, ticks: u32, length: f64) {
        let origin = element.position_after(ticks);
        let angle = element.orientation_deg();
        let rad = angle.to_radians();
        let tip = origin.offset(length * rad.cos(), length * rad.sin());

        let tail = (origin.x as f32, origin.y as f32);
        let head = (tip.x as f32, tip.y as f32);
        self.draw_line(tail, head, BLACK, 3.0);
        for side in [angle + HEAD_ANGLE, angle - HEAD_ANGLE] {
            let r = side.to_radians();
            let barb = tip.offset(HEAD_LENGTH * r.cos(), HEAD_LENGTH * r.sin());
            self.draw_line(head, (barb.x as f32, barb.y as f32), BLACK, 2.0);
        }
    }

    fn draw_button(&mut self, area: Area, label: &str, rgba: [u8; 4], large: bool) {
        if let Some(rect) = tiny_skia::Rect::from_xywh(
            area.x as f32,
            area.y as f32,
            area.width as f32,
            area.height as f32,
        ) {
            let path = PathBuilder::from_rect(rect);
            self.canvas.stroke_path(
                &path,
                &paint(rgba),
                &stroke(2.0),
                Transform::identity(),
                None,
            );
        }
        let c = area.center();
        self.draw_label_centered(label, (c.x as f32, c.y as f32), BLACK, large);
    }

    fn draw_label_centered(&mut self, text: &str, center: (f32, f32), rgba: [u8; 4], large: bool) {
        let size = if large { LARGE_TEXT } else { SMALL_TEXT };
        let Some(pm) = self
            .labels
            .as_mut()
            .and_then(|c| c.get_or_render(text, size, rgba))
        else {
            return;
        };
        let x = (center.0 - pm.width() as f32 / 2.0).round() as i32;
        let y = (center.1 - pm.height() as f32 / 2.0).round() as i32;
        self.canvas.draw_pixmap(
            x,
            y,
            pm.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn draw_label_at(&mut self, text: &str, top_left: (f32, f32), rgba: [u8; 4]) {
        let Some(pm) = self
            .labels
            .as_mut()
            .and_then(|c| c.get_or_render(text, SMALL_TEXT, rgba))
        else {
            return;
        };
        self.canvas.draw_pixmap(
            top_left.0 as i32,
            top_left.1 as i32,
            pm.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}
