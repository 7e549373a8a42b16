//! Offscreen RGBA bitmap holding one player's head-screen text.
//!
//! Rendering is pure: no scene or GPU state is touched here. The owning
//! display copies `bitmap()` into the projected texture whenever `dirty` is set.
use font8x8::{UnicodeFonts, BASIC_FONTS};

use super::style::{FontSpec, Rgba, ScreenStyle};

const GLYPH_SIZE: u32 = 8;
const FALLBACK_GLYPH: char = '?';

/// Largest bitmap side accepted by the surface and by settings, in pixels.
pub const MAX_SURFACE_SIDE: u32 = 4096;

/// Where one line of text lands on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSlot {
    pub text: String,
    /// Left edge of the first glyph.
    pub x: i32,
    /// Top edge of the glyph row.
    pub top: i32,
    /// Vertical centre of the line box.
    pub center_y: i32,
    pub width: u32,
}

/// Integer scale applied to the 8×8 glyphs for a given font size.
pub fn glyph_scale(font: &FontSpec) -> u32 {
    (font.size_px / GLYPH_SIZE).max(1)
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Splits `text` on line breaks, centres the block vertically using the font's
/// line height and centres each line horizontally.
pub fn layout_lines(text: &str, width: u32, height: u32, font: &FontSpec) -> Vec<LineSlot> {
    let glyph_px = i64::from(GLYPH_SIZE) * i64::from(glyph_scale(font));
    let line_height = i64::from(font.line_height());

    let lines: Vec<&str> = text.split('\n').map(|line| line.trim_end_matches('\r')).collect();
    let block_height = line_height.saturating_mul(lines.len() as i64);
    let start_y = (i64::from(height) - block_height) / 2;

    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let line_width = (line.chars().count() as i64).saturating_mul(glyph_px);
            let center_y = start_y
                .saturating_add((index as i64).saturating_mul(line_height))
                .saturating_add(line_height / 2);
            LineSlot {
                text: line.to_string(),
                x: saturate_i32((i64::from(width) - line_width) / 2),
                top: saturate_i32(center_y - glyph_px / 2),
                center_y: saturate_i32(center_y),
                width: line_width.min(i64::from(u32::MAX)) as u32,
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ScreenSurface {
    width: u32,
    height: u32,
    bitmap: Vec<u8>,
    text: String,
    dirty: bool,
}

impl ScreenSurface {
    /// Allocates a transparent `width`×`height` RGBA8 buffer. Each side is
    /// clamped to `1..=MAX_SURFACE_SIDE`.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.clamp(1, MAX_SURFACE_SIDE);
        let height = height.clamp(1, MAX_SURFACE_SIDE);
        Self {
            width,
            height,
            bitmap: vec![0; width as usize * height as usize * 4],
            text: String::new(),
            dirty: true,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it (called after the texture upload).
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x as usize, y as usize);
        let px = &self.bitmap[offset..offset + 4];
        Some(Rgba::new(px[0], px[1], px[2], px[3]))
    }

    /// Redraws the whole surface. Identical input yields identical pixels.
    pub fn render(&mut self, text: &str, style: &ScreenStyle) {
        self.fill(Rgba::TRANSPARENT);
        self.fill(style.background.over(Rgba::TRANSPARENT));

        let scale = i64::from(glyph_scale(&style.font));
        let advance = i64::from(GLYPH_SIZE) * scale;
        for slot in layout_lines(text, self.width, self.height, &style.font) {
            let mut cursor = i64::from(slot.x);
            for ch in slot.text.chars() {
                if cursor >= i64::from(self.width) {
                    break;
                }
                if cursor + advance > 0 {
                    self.draw_glyph(ch, cursor, i64::from(slot.top), scale, style.text_color);
                }
                cursor += advance;
            }
        }

        self.text = text.to_string();
        self.dirty = true;
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width as usize + x) * 4
    }

    fn fill(&mut self, color: Rgba) {
        let rgba = color.to_array();
        for pixel in self.bitmap.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    fn draw_glyph(&mut self, ch: char, x: i64, y: i64, scale: i64, color: Rgba) {
        let rows = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get(FALLBACK_GLYPH))
            .unwrap_or([0; 8]);
        let (width, height) = (i64::from(self.width), i64::from(self.height));

        for (row, bits) in rows.iter().enumerate() {
            let cell_top = y + row as i64 * scale;
            let (y0, y1) = (cell_top.max(0), (cell_top + scale).min(height));
            if y0 >= y1 {
                continue;
            }
            for col in 0..i64::from(GLYPH_SIZE) {
                // font8x8 stores the leftmost pixel in bit 0.
                if bits & (1 << col) == 0 {
                    continue;
                }
                let cell_left = x + col * scale;
                let (x0, x1) = (cell_left.max(0), (cell_left + scale).min(width));
                for py in y0..y1 {
                    for px in x0..x1 {
                        self.blend_pixel(px as usize, py as usize, color);
                    }
                }
            }
        }
    }

    /// Blends `color` over an in-bounds pixel.
    fn blend_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        let offset = self.offset(x, y);
        let px = &mut self.bitmap[offset..offset + 4];
        let dst = Rgba::new(px[0], px[1], px[2], px[3]);
        px.copy_from_slice(&color.over(dst).to_array());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: u32 = 512;
    const HEIGHT: u32 = 156;

    fn lit_rows(surface: &ScreenSurface, style: &ScreenStyle) -> Vec<u32> {
        (0..HEIGHT)
            .filter(|&y| (0..WIDTH).any(|x| surface.pixel(x, y) == Some(style.text_color)))
            .collect()
    }

    #[test]
    fn two_lines_centre_on_the_vertical_midpoint() {
        let style = ScreenStyle::default();
        let slots = layout_lines("A\nB", WIDTH, HEIGHT, &style.font);

        assert_eq!(slots.len(), 2);
        let line_height = style.font.line_height() as i32;
        assert_eq!(slots[1].center_y - slots[0].center_y, line_height);
        assert_eq!((slots[0].center_y + slots[1].center_y) / 2, HEIGHT as i32 / 2);

        // Each one-character line is horizontally centred.
        for slot in &slots {
            assert_eq!(slot.width, 32);
            assert_eq!(slot.x, (WIDTH as i32 - 32) / 2);
        }
    }

    #[test]
    fn rendered_ink_stays_inside_the_line_boxes() {
        let style = ScreenStyle::default();
        let mut surface = ScreenSurface::new(WIDTH, HEIGHT);
        surface.render("A\nB", &style);

        let rows = lit_rows(&surface, &style);
        assert!(!rows.is_empty());
        let block_top = (HEIGHT - 2 * style.font.line_height()) / 2;
        let block_bottom = block_top + 2 * style.font.line_height();
        assert!(rows.iter().all(|y| (block_top..block_bottom).contains(y)));

        // Glyph ink lands on both halves of the surface.
        assert!(rows.iter().any(|&y| y < HEIGHT / 2));
        assert!(rows.iter().any(|&y| y >= HEIGHT / 2));
    }

    #[test]
    fn rendering_is_idempotent() {
        let style = ScreenStyle::default();
        let mut surface = ScreenSurface::new(WIDTH, HEIGHT);

        surface.render("A\nB", &style);
        let first = surface.bitmap().to_vec();
        surface.render("A\nB", &style);
        assert_eq!(surface.bitmap(), first.as_slice());

        surface.render("something else", &style);
        assert_ne!(surface.bitmap(), first.as_slice());
        surface.render("A\nB", &style);
        assert_eq!(surface.bitmap(), first.as_slice());
    }

    #[test]
    fn empty_text_paints_only_background() {
        let style = ScreenStyle::default();
        let mut surface = ScreenSurface::new(64, 16);
        surface.render("", &style);

        assert!(surface
            .bitmap()
            .chunks_exact(4)
            .all(|px| px == style.background.to_array()));
        assert_eq!(surface.text(), "");
    }

    #[test]
    fn render_marks_dirty_until_taken() {
        let style = ScreenStyle::default();
        let mut surface = ScreenSurface::new(32, 32);
        assert!(surface.take_dirty());
        assert!(!surface.is_dirty());

        surface.render("hi", &style);
        assert!(surface.is_dirty());
        assert!(surface.take_dirty());
        assert!(!surface.take_dirty());
    }

    #[test]
    fn overlong_lines_are_clipped_not_wrapped() {
        let style = ScreenStyle::default();
        let mut surface = ScreenSurface::new(64, 40);
        surface.render("WWWWWWWWWWWWWWWWWWWW", &style);

        let slot = &layout_lines("WWWWWWWWWWWWWWWWWWWW", 64, 40, &style.font)[0];
        assert!(slot.x < 0);
        assert_eq!(surface.bitmap().len(), 64 * 40 * 4);
    }

    #[test]
    fn oversized_surfaces_are_clamped() {
        let surface = ScreenSurface::new(40_000, 30_000);
        assert_eq!(surface.dimensions(), (MAX_SURFACE_SIDE, MAX_SURFACE_SIDE));
        assert_eq!(
            surface.bitmap().len(),
            MAX_SURFACE_SIDE as usize * MAX_SURFACE_SIDE as usize * 4
        );
        assert_eq!(ScreenSurface::new(0, 0).dimensions(), (1, 1));
    }

    #[test]
    fn huge_font_layout_saturates() {
        let font: FontSpec = "4000000000px mono".parse().expect("valid font");
        let slots = layout_lines("hello\nworld", WIDTH, HEIGHT, &font);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].width, u32::MAX);
        assert!(slots[0].x < 0);
        assert!(slots[0].top < 0);
        assert!(slots[1].center_y > slots[0].center_y);
    }

    #[test]
    fn fonts_larger_than_the_surface_only_touch_visible_pixels() {
        let mut style = ScreenStyle {
            font: "40000px mono".parse().expect("valid font"),
            ..ScreenStyle::default()
        };
        let mut surface = ScreenSurface::new(WIDTH, HEIGHT);
        surface.render("Hi", &style);
        assert_eq!(surface.bitmap().len(), (WIDTH * HEIGHT * 4) as usize);

        // A single glyph scaled past the surface floods it with ink.
        style.font = "1600px mono".parse().expect("valid font");
        surface.render("#", &style);
        assert!(!lit_rows(&surface, &style).is_empty());
    }

    #[test]
    fn small_fonts_use_unit_scale() {
        let font: FontSpec = "6px mono".parse().expect("valid font");
        assert_eq!(glyph_scale(&font), 1);
        let font: FontSpec = "24px mono".parse().expect("valid font");
        assert_eq!(glyph_scale(&font), 3);
    }
}
