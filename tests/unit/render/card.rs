use std::io::Cursor;

use super::*;

fn sample_entry() -> FlagEntry {
    FlagEntry {
        country_id: "ng".to_string(),
        display_name: "Nigeria".to_string(),
        capital_name: "Abuja".to_string(),
    }
}

fn sample_flag_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 135, 81, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn output_is_square_regardless_of_input_aspect() {
    let mut renderer = CardRenderer::new(CardStyle::default()).unwrap();
    for (w, h) in [(320, 213), (64, 64), (10, 100)] {
        let card = renderer
            .render_card(&sample_entry(), &sample_flag_png(w, h))
            .unwrap();
        assert_eq!((card.width, card.height), (945, 945));
        let decoded = image::load_from_memory(&card.png_bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (945, 945));
    }
}

#[test]
fn rendering_is_idempotent_for_identical_inputs() {
    let flag = sample_flag_png(320, 213);
    let mut a = CardRenderer::new(CardStyle::default()).unwrap();
    let mut b = CardRenderer::new(CardStyle::default()).unwrap();
    let first = a.render_card(&sample_entry(), &flag).unwrap();
    let second = b.render_card(&sample_entry(), &flag).unwrap();
    assert_eq!(first.png_bytes, second.png_bytes);
}

#[test]
fn surface_is_reset_between_cards() {
    let flag = sample_flag_png(320, 213);
    let mut renderer = CardRenderer::new(CardStyle::default()).unwrap();
    let first = renderer.render_card(&sample_entry(), &flag).unwrap();
    let _other = renderer
        .render_card(&sample_entry(), &sample_flag_png(100, 40))
        .unwrap();
    let again = renderer.render_card(&sample_entry(), &flag).unwrap();
    assert_eq!(first.png_bytes, again.png_bytes);
}

#[test]
fn undecodable_bytes_fail_with_decode_error() {
    let mut renderer = CardRenderer::new(CardStyle::default()).unwrap();
    let err = renderer
        .render_card(&sample_entry(), b"not an image")
        .unwrap_err();
    assert!(matches!(err, FlagdeckError::Decode(_)));
}

#[test]
fn degenerate_styles_are_rejected() {
    let style = CardStyle {
        canvas_size: 0,
        ..CardStyle::default()
    };
    assert!(CardRenderer::new(style).is_err());

    let style = CardStyle {
        margin: 500.0,
        ..CardStyle::default()
    };
    assert!(CardRenderer::new(style).is_err());
}

#[test]
fn rounded_rect_path_is_closed_with_uniform_corners() {
    let rect = kurbo::Rect::new(50.0, 50.0, 895.0, 895.0);
    let path = rounded_rect_path(rect, 20.0);
    let els = path.elements();

    assert!(matches!(els.last(), Some(kurbo::PathEl::ClosePath)));
    let kurbo::PathEl::MoveTo(start) = els[0] else {
        panic!("path must start with MoveTo");
    };

    // The final quarter-curve must land back on the start point.
    let mut last_point = None;
    for el in els {
        match el {
            kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => last_point = Some(*p),
            kurbo::PathEl::QuadTo(_, p) => last_point = Some(*p),
            _ => {}
        }
    }
    assert_eq!(last_point, Some(start));

    // Four corner curves, each controlled by the matching rect corner.
    let controls: Vec<_> = els
        .iter()
        .filter_map(|el| match el {
            kurbo::PathEl::QuadTo(c, _) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(
        controls,
        vec![
            kurbo::Point::new(rect.x1, rect.y0),
            kurbo::Point::new(rect.x1, rect.y1),
            kurbo::Point::new(rect.x0, rect.y1),
            kurbo::Point::new(rect.x0, rect.y0),
        ]
    );
}

#[test]
fn oversized_radius_is_clamped() {
    let rect = kurbo::Rect::new(0.0, 0.0, 10.0, 10.0);
    let path = rounded_rect_path(rect, 1000.0);
    // Clamped to half the short side: curve endpoints sit at edge midpoints.
    let kurbo::PathEl::MoveTo(start) = path.elements()[0] else {
        panic!("path must start with MoveTo");
    };
    assert_eq!(start, kurbo::Point::new(5.0, 0.0));
}

#[test]
fn file_names_are_sanitized_ascii() {
    assert_eq!(card_file_name("Côte d'Ivoire"), "c_te_d_ivoire.png");
    assert_eq!(card_file_name("Washington, D.C."), "washington__d_c_.png");
    let name = card_file_name("São Tomé & Príncipe");
    assert!(
        name.trim_end_matches(".png")
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    );
}

#[test]
fn rendered_card_file_name_uses_display_name() {
    let flag = sample_flag_png(8, 5);
    let mut renderer = CardRenderer::new(CardStyle::default()).unwrap();
    let entry = FlagEntry {
        country_id: "ci".to_string(),
        display_name: "Côte d'Ivoire".to_string(),
        capital_name: "Yamoussoukro".to_string(),
    };
    let card = renderer.render_card(&entry, &flag).unwrap();
    assert_eq!(card.file_name(), "c_te_d_ivoire.png");
}
