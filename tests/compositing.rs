use cairo::ImageSurface;
use markshot::config::UndoStrategy;
use markshot::draw::{BaseImage, BLUE, GREEN, WHITE};
use markshot::input::PointerResponse;
use markshot::{Config, Session, Tool};

fn checkerboard(width: i32, height: i32) -> BaseImage {
    let mut rgba = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let shade: u8 = if (x / 3 + y / 3) % 2 == 0 { 20 } else { 230 };
            rgba.extend_from_slice(&[shade, shade, shade, 255]);
        }
    }
    BaseImage::from_rgba(width, height, &rgba).unwrap()
}

fn session(base: BaseImage, strategy: UndoStrategy) -> Session {
    let mut config = Config::default();
    config.history.undo_strategy = strategy;
    Session::new(base, &config).unwrap()
}

fn drag(session: &mut Session, tool: Tool, from: (f64, f64), to: (f64, f64)) -> bool {
    session.set_active_tool(tool);
    assert_eq!(session.pointer_down(from.0, from.1), PointerResponse::DragStarted);
    session.pointer_move(to.0, to.1);
    session.pointer_up(to.0, to.1)
}

#[test]
fn exported_png_decodes_with_cairo() {
    let mut session = session(BaseImage::solid(64, 48, WHITE).unwrap(), UndoStrategy::Restore);
    session.set_color(GREEN);
    assert!(drag(&mut session, Tool::Highlight, (0.0, 0.0), (64.0, 24.0)));

    let mut png = Vec::new();
    session.write_png(&mut png).unwrap();
    let mut decoded = ImageSurface::create_from_png(&mut png.as_slice()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));

    let stride = decoded.stride() as usize;
    let data = decoded.data().unwrap();
    let word = |x: usize, y: usize| {
        let offset = y * stride + x * 4;
        u32::from_ne_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
            & 0x00ff_ffff
    };
    // Highlighted top half is tinted, bottom half is untouched
    assert_ne!(word(10, 10), 0x00ff_ffff);
    assert_eq!(word(10, 40), 0x00ff_ffff);
}

#[test]
fn annotating_around_blurs_undoes_back_to_the_base_image() {
    for strategy in [UndoStrategy::Restore, UndoStrategy::Replay] {
        let mut session = session(checkerboard(90, 90), strategy);
        let base = session.export_rgba().unwrap();
        let mut states = vec![base.clone()];

        session.set_stroke_width(5);
        assert!(drag(&mut session, Tool::Blur, (5.0, 5.0), (60.0, 60.0)));
        states.push(session.export_rgba().unwrap());

        session.set_color(BLUE);
        assert!(drag(&mut session, Tool::Arrow, (0.0, 80.0), (70.0, 20.0)));
        states.push(session.export_rgba().unwrap());

        session.set_stroke_width(3);
        assert!(drag(&mut session, Tool::Blur, (40.0, 30.0), (95.0, 95.0)));
        states.push(session.export_rgba().unwrap());

        assert!(drag(&mut session, Tool::Ellipse, (45.0, 45.0), (60.0, 60.0)));
        states.push(session.export_rgba().unwrap());

        // Walk back through every intermediate state
        while session.can_undo() {
            states.pop();
            assert!(session.undo());
            assert_eq!(
                Some(&session.export_rgba().unwrap()),
                states.last(),
                "{strategy:?} after undo down to {} annotations",
                session.annotation_count()
            );
        }
        assert_eq!(session.export_rgba().unwrap(), base);
    }
}

#[test]
fn redo_rebuilds_the_same_image() {
    let mut session = session(checkerboard(60, 60), UndoStrategy::Restore);
    assert!(drag(&mut session, Tool::Blur, (0.0, 0.0), (40.0, 40.0)));
    assert!(drag(&mut session, Tool::Rectangle, (10.0, 10.0), (50.0, 50.0)));
    let annotated = session.export_rgba().unwrap();

    assert!(session.undo());
    assert!(session.undo());
    assert!(session.redo());
    assert!(session.redo());
    assert_eq!(session.export_rgba().unwrap(), annotated);
}
