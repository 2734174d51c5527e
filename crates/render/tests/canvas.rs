use render::canvas::{BLACK, WHITE};
use render::{Canvas, RenderError, RenderMode};

#[test]
fn rgb_array_frames_are_stored_top_down() {
    let mut canvas = Canvas::new(10, 6);
    // Bottom-left square in canvas coordinates.
    canvas.fill_rect((0.0, 0.0), (2.0, 2.0), BLACK);
    let frame = RenderMode::RgbArray.present(canvas).unwrap();
    assert_eq!(frame.dimensions(), (10, 6));
    assert_eq!(frame.get_pixel(0, 5).0, BLACK);
    assert_eq!(frame.get_pixel(1, 4).0, BLACK);
    assert_eq!(frame.get_pixel(0, 0).0, WHITE);
    assert_eq!(frame.get_pixel(2, 5).0, WHITE);
}

#[test]
fn shapes_outside_the_canvas_are_clipped() {
    let mut canvas = Canvas::new(8, 8);
    canvas.fill_circle((-100.0, -100.0), 5.0, BLACK);
    canvas.draw_line((-10.0, 4.0), (20.0, 4.0), 2.0, BLACK);
    canvas.fill_polygon(&[(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)], BLACK);
    let frame = canvas.into_frame();
    let black_rows: Vec<u32> = (0..8).filter(|&y| frame.get_pixel(4, y).0 == BLACK).collect();
    assert_eq!(black_rows, vec![3, 4]);
}

#[test]
fn human_mode_has_no_backend() {
    let err = RenderMode::Human.present(Canvas::new(4, 4)).unwrap_err();
    assert!(matches!(err, RenderError::BackendUnavailable(RenderMode::Human)));
}

#[test]
fn triangle_covers_interior_pixel_centers_only() {
    let mut canvas = Canvas::new(10, 10);
    canvas.fill_polygon(&[(1.0, 1.0), (9.0, 1.0), (5.0, 9.0)], BLACK);
    assert_eq!(canvas.pixel(5, 1), Some(BLACK));
    assert_eq!(canvas.pixel(4, 5), Some(BLACK));
    assert_eq!(canvas.pixel(4, 6), Some(BLACK));
    assert_eq!(canvas.pixel(0, 0), Some(WHITE));
    assert_eq!(canvas.pixel(1, 8), Some(WHITE));
    assert_eq!(canvas.pixel(9, 5), Some(WHITE));
    assert_eq!(canvas.pixel(5, 9), Some(WHITE));
}

#[test]
fn degenerate_shapes_do_not_panic() {
    let mut canvas = Canvas::new(6, 6);
    canvas.fill_polygon(&[(2.0, 2.0), (2.0, 2.0), (2.0, 2.0)], BLACK);
    canvas.fill_polygon(&[(1.2, 3.1), (4.8, 3.2), (4.9, 3.4)], BLACK);
    canvas.draw_line((0.0, 0.0), (1e9, -1e9), 0.5, BLACK);
    canvas.fill_rect((3.0, 3.0), (3.0, 5.0), BLACK);
    canvas.fill_circle((3.0, 3.0), 0.0, BLACK);
    assert_eq!(canvas.into_frame().dimensions(), (6, 6));
}
