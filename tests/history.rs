use std::cell::Cell;
use std::rc::Rc;

use paint_engine::{DrawingEngine, EngineSettings, Rgba, Tool};

// Helper: paint a short black brush stroke
fn scribble(engine: &mut DrawingEngine, y: i32) {
    engine.set_tool(Tool::Brush);
    engine.set_thickness(1.0).unwrap();
    engine.set_color(0, 0, 0, 255);
    engine.start_stroke();
    for x in 1..6 {
        engine.apply_stroke(x, y).unwrap();
    }
}

#[test]
fn test_undo_redo_round_trip_is_byte_identical() {
    let mut engine = DrawingEngine::new(8, 8).unwrap();
    scribble(&mut engine, 2);

    let before = engine.buffer().as_raw().to_vec();
    engine.snapshot();
    scribble(&mut engine, 5);
    let after = engine.buffer().as_raw().to_vec();
    assert_ne!(before, after);

    assert!(engine.undo());
    assert_eq!(engine.buffer().as_raw(), before.as_slice());
    assert!(engine.can_redo());

    assert!(engine.redo());
    assert_eq!(engine.buffer().as_raw(), after.as_slice());
    assert!(engine.can_undo());
    assert!(!engine.can_redo());
}

#[test]
fn test_new_snapshot_discards_redo_branch() {
    let mut engine = DrawingEngine::new(8, 8).unwrap();
    engine.snapshot();
    scribble(&mut engine, 3);
    assert!(engine.undo());
    engine.snapshot();
    assert!(!engine.redo());
    assert!(!engine.can_redo());
    assert_eq!(engine.history().undo_count(), 1);
}

#[test]
fn test_empty_history_is_a_no_op() {
    let mut engine = DrawingEngine::new(4, 4).unwrap();
    scribble(&mut engine, 1);
    let before = engine.buffer().clone();

    assert!(!engine.can_undo());
    assert!(!engine.undo());
    assert!(!engine.redo());
    assert_eq!(engine.buffer(), &before);
    assert_eq!(engine.history().memory_usage(), 0);
}

#[test]
fn test_multiple_levels_unwind_in_order() {
    let mut engine = DrawingEngine::new(6, 6).unwrap();
    let mut states = Vec::new();
    for y in [1, 3, 5] {
        states.push(engine.buffer().clone());
        engine.snapshot();
        scribble(&mut engine, y);
    }
    let last = engine.buffer().clone();

    for expected in states.iter().rev() {
        assert!(engine.undo());
        assert_eq!(engine.buffer(), expected);
    }
    assert!(!engine.undo());

    for _ in 0..3 {
        assert!(engine.redo());
    }
    assert_eq!(engine.buffer(), &last);
}

#[test]
fn test_snapshot_is_not_affected_by_later_edits() {
    let mut engine = DrawingEngine::new(4, 4).unwrap();
    engine.snapshot();
    engine.fill(0, 0, Rgba([1, 2, 3, 4]), 0.0).unwrap();
    engine.fill(0, 0, Rgba([9, 9, 9, 9]), 0.0).unwrap();
    assert!(engine.undo());
    assert!(engine.buffer().as_raw().iter().all(|b| *b == 255));
}

#[test]
fn test_undo_across_resize_restores_dimensions() {
    let resizes = Rc::new(Cell::new(0));
    let mut engine = DrawingEngine::new(4, 4).unwrap();
    let counter = Rc::clone(&resizes);
    engine.on_resize(move |_, _| counter.set(counter.get() + 1));

    engine.snapshot();
    engine.resize(2, 3, None).unwrap();
    assert_eq!(engine.stroke_mask().len(), 6);

    assert!(engine.undo());
    assert_eq!((engine.width(), engine.height()), (4, 4));
    assert_eq!(engine.stroke_mask().len(), 16);

    // Painting after the restore uses the reallocated mask
    scribble(&mut engine, 3);

    assert!(engine.redo());
    assert_eq!((engine.width(), engine.height()), (2, 3));
    assert_eq!(resizes.get(), 3);
}

#[test]
fn test_history_limit_from_settings() {
    let settings = EngineSettings {
        history_limit: Some(2),
        ..EngineSettings::default()
    };
    let mut engine = DrawingEngine::with_settings(4, 4, &settings).unwrap();
    for _ in 0..5 {
        engine.snapshot();
    }
    assert_eq!(engine.history().undo_count(), 2);
    assert_eq!(engine.history().memory_usage(), 2 * 4 * 4 * 4);
    assert!(engine.undo());
    assert!(engine.undo());
    assert!(!engine.undo());
}
