use std::io::Cursor;
use std::sync::Arc;

use crate::{
    catalog::FlagEntry,
    error::{FlagdeckError, FlagdeckResult},
    render::text::{TextBrushRgba8, TextLayoutEngine},
};

#[derive(Clone, Debug)]
/// Visual parameters for one card.
///
/// The defaults reproduce the reference card: a 945px square canvas, a white
/// rounded card inset by the margin, the flag stretched to a fixed 5:3 box,
/// and two centered labels underneath.
pub struct CardStyle {
    /// Square canvas side length in pixels.
    pub canvas_size: u32,
    /// Outer margin between canvas edge and card, in pixels.
    pub margin: f64,
    /// Card corner radius in pixels.
    pub corner_radius: f64,
    /// Canvas background color, straight RGBA.
    pub background_rgba: [u8; 4],
    /// Card fill color, straight RGBA.
    pub card_rgba: [u8; 4],
    /// Country name color, straight RGBA.
    pub title_rgba: [u8; 4],
    /// Capital name color, straight RGBA.
    pub subtitle_rgba: [u8; 4],
    /// Country name font size in pixels.
    pub title_size_px: f32,
    /// Capital name font size in pixels.
    pub subtitle_size_px: f32,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            canvas_size: 945,
            margin: 50.0,
            corner_radius: 20.0,
            background_rgba: [0xf3, 0xf4, 0xf6, 0xff],
            card_rgba: [0xff, 0xff, 0xff, 0xff],
            title_rgba: [0x1f, 0x29, 0x37, 0xff],
            subtitle_rgba: [0x6b, 0x72, 0x80, 0xff],
            title_size_px: 50.0,
            subtitle_size_px: 36.0,
        }
    }
}

#[derive(Clone, Debug)]
/// One composited card produced from a single catalog entry.
pub struct RenderedCard {
    /// The catalog entry this card was rendered from.
    pub entry: FlagEntry,
    /// Encoded PNG bytes, straight alpha.
    pub png_bytes: Vec<u8>,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl RenderedCard {
    /// Archive file name for this card.
    pub fn file_name(&self) -> String {
        card_file_name(&self.entry.display_name)
    }
}

/// Sanitize a display name into an archive-safe PNG file name.
///
/// The name is lowercased and every character outside ASCII `[a-z0-9]` is
/// replaced with `_`, so `Côte d'Ivoire` becomes `c_te_d_ivoire.png`.
pub fn card_file_name(display_name: &str) -> String {
    let stem: String = display_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}.png")
}

/// Build the closed card outline: a rectangle whose four corners are replaced
/// by quadratic quarter-curves of `radius`.
///
/// The path starts on the top edge, runs clockwise, and ends exactly on its
/// start point before closing.
pub fn rounded_rect_path(rect: kurbo::Rect, radius: f64) -> kurbo::BezPath {
    let (x0, y0, x1, y1) = (rect.x0, rect.y0, rect.x1, rect.y1);
    let r = radius
        .max(0.0)
        .min(rect.width() / 2.0)
        .min(rect.height() / 2.0);

    let mut path = kurbo::BezPath::new();
    path.move_to((x0 + r, y0));
    path.line_to((x1 - r, y0));
    path.quad_to((x1, y0), (x1, y0 + r));
    path.line_to((x1, y1 - r));
    path.quad_to((x1, y1), (x1 - r, y1));
    path.line_to((x0 + r, y1));
    path.quad_to((x0, y1), (x0, y1 - r));
    path.line_to((x0, y0 + r));
    path.quad_to((x0, y0), (x0 + r, y0));
    path.close_path();
    path
}

/// Renders flag images into fixed-size branded cards.
///
/// The renderer owns one reusable drawing surface that is cleared between
/// cards; it must not be shared across concurrent renders. Rendering is a
/// pure function of the inputs, modulo the font environment.
pub struct CardRenderer {
    style: CardStyle,
    text: TextLayoutEngine,
    font: Option<vello_cpu::peniko::FontData>,
    pixmap: vello_cpu::Pixmap,
}

impl CardRenderer {
    /// Construct a renderer for the given style.
    pub fn new(style: CardStyle) -> FlagdeckResult<Self> {
        let side = side_u16(style.canvas_size)?;
        if style.margin < 0.0 || style.margin * 4.0 >= f64::from(style.canvas_size) {
            return Err(FlagdeckError::validation(
                "margin leaves no room for card content",
            ));
        }
        Ok(Self {
            style,
            text: TextLayoutEngine::new(),
            font: None,
            pixmap: vello_cpu::Pixmap::new(side, side),
        })
    }

    /// Register explicit font bytes for the card labels.
    pub fn with_font_bytes(mut self, font_bytes: &[u8]) -> FlagdeckResult<Self> {
        self.text.register_font(font_bytes)?;
        self.font = Some(vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
            0,
        ));
        Ok(self)
    }

    /// Style this renderer was built with.
    pub fn style(&self) -> &CardStyle {
        &self.style
    }

    /// Composite one flag plus its labels into an encoded PNG card.
    ///
    /// Fails with [`FlagdeckError::Decode`] when `flag_bytes` is not a
    /// decodable raster and [`FlagdeckError::Encode`] when PNG serialization
    /// fails; both are per-entry conditions the batch driver records.
    pub fn render_card(
        &mut self,
        entry: &FlagEntry,
        flag_bytes: &[u8],
    ) -> FlagdeckResult<RenderedCard> {
        let flag = decode_flag(flag_bytes)?;
        let side = side_u16(self.style.canvas_size)?;
        let s = f64::from(self.style.canvas_size);
        let p = self.style.margin;

        clear_pixmap(&mut self.pixmap);

        let mut ctx = vello_cpu::RenderContext::new(side, side);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        // Canvas background.
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color(self.style.background_rgba));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, s, s));

        // Card body, inset by the margin on all sides.
        let card = rounded_rect_path(
            kurbo::Rect::new(p, p, s - p, s - p),
            self.style.corner_radius,
        );
        ctx.set_paint(color(self.style.card_rgba));
        ctx.fill_path(&bezpath_to_cpu(&card));

        // Flag stretched to a fixed 5:3 box at (2P, 2P), ignoring the source
        // aspect ratio.
        let inner = s - 2.0 * p;
        let flag_w = inner - 2.0 * p;
        let flag_h = flag_w * 0.6;
        let paint = flag_paint(&flag)?;
        ctx.set_transform(
            vello_cpu::kurbo::Affine::translate((2.0 * p, 2.0 * p))
                * vello_cpu::kurbo::Affine::scale_non_uniform(
                    flag_w / f64::from(flag.width),
                    flag_h / f64::from(flag.height),
                ),
        );
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(flag.width),
            f64::from(flag.height),
        ));

        // Labels, centered on the canvas midline below the flag.
        let title = self.text.layout_line(
            &entry.display_name,
            self.style.title_size_px,
            true,
            self.style.title_rgba.into(),
        )?;
        draw_centered_line(
            &mut ctx,
            &title,
            self.font.as_ref(),
            s / 2.0,
            2.0 * p + flag_h + 50.0,
        );
        let subtitle = self.text.layout_line(
            &entry.capital_name,
            self.style.subtitle_size_px,
            false,
            self.style.subtitle_rgba.into(),
        )?;
        draw_centered_line(
            &mut ctx,
            &subtitle,
            self.font.as_ref(),
            s / 2.0,
            2.0 * p + flag_h + 100.0,
        );

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);

        let png_bytes = encode_png(&self.pixmap, self.style.canvas_size)?;
        Ok(RenderedCard {
            entry: entry.clone(),
            png_bytes,
            width: self.style.canvas_size,
            height: self.style.canvas_size,
        })
    }
}

struct DecodedFlag {
    width: u32,
    height: u32,
    rgba8_premul: Vec<u8>,
}

fn decode_flag(bytes: &[u8]) -> FlagdeckResult<DecodedFlag> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| FlagdeckError::decode(format!("decode flag image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(FlagdeckError::decode("flag image has zero area"));
    }
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Ok(DecodedFlag {
        width,
        height,
        rgba8_premul,
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

fn flag_paint(flag: &DecodedFlag) -> FlagdeckResult<vello_cpu::Image> {
    let w: u16 = flag
        .width
        .try_into()
        .map_err(|_| FlagdeckError::decode("flag width exceeds u16"))?;
    let h: u16 = flag
        .height
        .try_into()
        .map_err(|_| FlagdeckError::decode("flag height exceeds u16"))?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(flag.width as usize * flag.height as usize);
    for px in flag.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn draw_centered_line(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    font: Option<&vello_cpu::peniko::FontData>,
    center_x: f64,
    baseline_y: f64,
) {
    let Some(first_line) = layout.lines().next() else {
        return;
    };
    let origin_x = center_x - f64::from(layout.width()) / 2.0;
    let origin_y = baseline_y - f64::from(first_line.metrics().baseline);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin_x, origin_y)));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            // With a registered font the raster font data is rebuilt from the
            // same bytes; otherwise it is lifted from the shaped run.
            let font_data = match font {
                Some(font) => font.clone(),
                None => {
                    let resolved = run.run().font();
                    vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(resolved.data.as_ref().to_vec()),
                        resolved.index,
                    )
                }
            };
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font_data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn encode_png(pixmap: &vello_cpu::Pixmap, side: u32) -> FlagdeckResult<Vec<u8>> {
    let mut straight = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(side, side, straight)
        .ok_or_else(|| FlagdeckError::encode("canvas byte length mismatch"))?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| FlagdeckError::encode(format!("encode card png: {e}")))?;
    Ok(bytes)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&[0, 0, 0, 0]);
    }
}

fn color([r, g, b, a]: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn side_u16(size: u32) -> FlagdeckResult<u16> {
    if size == 0 {
        return Err(FlagdeckError::validation("canvas size must be > 0"));
    }
    size.try_into()
        .map_err(|_| FlagdeckError::validation("canvas size exceeds u16"))
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let point = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point(p)),
            PathEl::LineTo(p) => out.line_to(point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point(p1), point(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(point(p1), point(p2), point(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/card.rs"]
mod tests;
