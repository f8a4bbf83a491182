use super::*;

#[test]
fn rejects_nonpositive_sizes() {
    let mut engine = TextLayoutEngine::new();
    let brush = TextBrushRgba8::default();
    assert!(engine.layout_line("x", 0.0, false, brush).is_err());
    assert!(engine.layout_line("x", -4.0, false, brush).is_err());
    assert!(engine.layout_line("x", f32::NAN, true, brush).is_err());
}

#[test]
fn lays_out_a_single_line() {
    let mut engine = TextLayoutEngine::new();
    let brush = TextBrushRgba8::from([0x1f, 0x29, 0x37, 0xff]);
    let layout = engine.layout_line("Nigeria", 50.0, true, brush).unwrap();
    assert!(layout.lines().count() <= 1);
}

#[test]
fn register_font_rejects_garbage_bytes() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.register_font(&[0u8; 16]).is_err());
}

#[test]
fn brush_converts_from_rgba_array() {
    let brush = TextBrushRgba8::from([1, 2, 3, 4]);
    assert_eq!(
        brush,
        TextBrushRgba8 {
            r: 1,
            g: 2,
            b: 3,
            a: 4
        }
    );
}
