//! Integration tests for the interactive manipulation flow
//!
//! Drives the editor the way a pointer source would: resolve a target,
//! update the selection, run a transform session, and check the geometry
//! and notifications that come out.

use approx::assert_abs_diff_eq;
use easel_core::canvas::Editor;
use easel_core::events::{CanvasEvent, RecordingSink};
use easel_core::hit_test::TargetRef;
use easel_core::options::CanvasOptions;
use easel_core::pointer::PointerEvent;
use easel_core::shape::Shape;
use kurbo::Point;
use uuid::Uuid;

fn editor_with(shapes: Vec<Shape>) -> (Editor, Vec<Uuid>) {
    let mut editor = Editor::new(512, 512, CanvasOptions::default());
    let ids = shapes
        .into_iter()
        .map(|s| editor.scene.add_shape(s))
        .collect();
    editor.refresh_cache();
    (editor, ids)
}

#[test]
fn locate_returns_shape_under_pointer() {
    let (editor, ids) = editor_with(vec![
        Shape::new(40.0, 40.0).with_position(20.0, 20.0),
        Shape::new(40.0, 40.0).with_position(200.0, 200.0),
    ]);

    assert_eq!(
        editor.find_target(Point::new(40.0, 40.0), false),
        Some(TargetRef::Shape(ids[0]))
    );
    assert_eq!(
        editor.find_target(Point::new(220.0, 220.0), false),
        Some(TargetRef::Shape(ids[1]))
    );
}

#[test]
fn locate_misses_empty_surface() {
    let (editor, _) = editor_with(vec![Shape::new(40.0, 40.0).with_position(20.0, 20.0)]);
    assert_eq!(editor.find_target(Point::new(400.0, 400.0), false), None);
    assert_eq!(editor.find_target(Point::new(100.0, 100.0), false), None);
}

#[test]
fn locate_prefers_topmost_on_overlap() {
    let (editor, ids) = editor_with(vec![
        Shape::new(60.0, 60.0).with_position(20.0, 20.0),
        Shape::new(60.0, 60.0).with_position(50.0, 50.0),
    ]);

    // Inside both footprints: the later (topmost) shape owns the pixel
    assert_eq!(
        editor.find_target(Point::new(60.0, 60.0), false),
        Some(TargetRef::Shape(ids[1]))
    );
    // Inside only the lower shape
    assert_eq!(
        editor.find_target(Point::new(25.0, 25.0), false),
        Some(TargetRef::Shape(ids[0]))
    );
}

#[test]
fn translate_without_motion_is_identity() {
    let (mut editor, ids) = editor_with(vec![Shape::new(40.0, 40.0).with_position(20.0, 20.0)]);

    editor.begin_transform(&PointerEvent::at(30.0, 30.0), TargetRef::Shape(ids[0]));
    editor.transform_update(&PointerEvent::at(30.0, 30.0));

    let shape = editor.scene.shape(ids[0]).unwrap();
    assert_abs_diff_eq!(shape.placement.left, 20.0);
    assert_abs_diff_eq!(shape.placement.top, 20.0);
}

#[test]
fn translate_preserves_grab_offset_across_moves() {
    let (mut editor, ids) = editor_with(vec![Shape::new(40.0, 40.0).with_position(20.0, 20.0)]);

    editor.begin_transform(&PointerEvent::at(30.0, 30.0), TargetRef::Shape(ids[0]));
    editor.transform_update(&PointerEvent::at(130.0, 80.0));
    editor.transform_update(&PointerEvent::at(75.0, 300.0));
    editor.end_transform();

    let shape = editor.scene.shape(ids[0]).unwrap();
    assert_abs_diff_eq!(shape.placement.left, 65.0);
    assert_abs_diff_eq!(shape.placement.top, 290.0);
}

#[test]
fn horizontal_lock_pins_left_coordinate() {
    let mut shape = Shape::new(40.0, 40.0).with_position(20.0, 20.0);
    shape.locks.movement_x = true;
    let (mut editor, ids) = editor_with(vec![shape]);

    editor.begin_transform(&PointerEvent::at(30.0, 30.0), TargetRef::Shape(ids[0]));
    for (x, y) in [(500.0, 30.0), (-200.0, 90.0), (30.0, 500.0)] {
        editor.transform_update(&PointerEvent::at(x, y));
    }

    let shape = editor.scene.shape(ids[0]).unwrap();
    assert_abs_diff_eq!(shape.placement.left, 20.0);
    assert_abs_diff_eq!(shape.placement.top, 490.0);
}

#[test]
fn corner_drag_doubles_scale_and_pins_anchor() {
    // A 100x50 shape at the origin, bottom-right handle grabbed a little
    // outside the corner: the anchor becomes the top-left. Dragging to the
    // doubling pointer yields exactly 2x on both axes (uniform corner-drag
    // default), and the top-left corner never moves.
    let mut shape = Shape::new(100.0, 50.0);
    shape.corner_size = 24.0;
    shape.active = true;
    let (mut editor, ids) = editor_with(vec![shape]);

    editor.begin_transform(&PointerEvent::at(110.0, 55.0), TargetRef::Shape(ids[0]));
    editor.transform_update(&PointerEvent::at(200.0, 100.0));

    let shape = editor.scene.shape(ids[0]).unwrap();
    assert_abs_diff_eq!(shape.placement.scale_x, 2.0);
    assert_abs_diff_eq!(shape.placement.scale_y, 2.0);
    assert_abs_diff_eq!(shape.placement.left, 0.0);
    assert_abs_diff_eq!(shape.placement.top, 0.0);
}

#[test]
fn scale_then_cancel_restores_snapshot() {
    let mut shape = Shape::new(100.0, 50.0).with_position(40.0, 30.0);
    shape.active = true;
    let (mut editor, ids) = editor_with(vec![shape]);

    editor.begin_transform(&PointerEvent::at(140.0, 80.0), TargetRef::Shape(ids[0]));
    editor.transform_update(&PointerEvent::at(300.0, 200.0));
    editor.transform_update(&PointerEvent::at(-60.0, 10.0));
    editor.transform_update(&PointerEvent::at(90.0, 55.0));
    editor.cancel_transform();

    let shape = editor.scene.shape(ids[0]).unwrap();
    assert_abs_diff_eq!(shape.placement.left, 40.0);
    assert_abs_diff_eq!(shape.placement.top, 30.0);
    assert_abs_diff_eq!(shape.placement.scale_x, 1.0);
    assert_abs_diff_eq!(shape.placement.scale_y, 1.0);
    assert!(editor.transform_in_progress().is_none());
}

#[test]
fn rotate_is_continuous_and_returns_after_full_sweep() {
    let mut shape = Shape::new(100.0, 50.0).with_position(100.0, 100.0);
    shape.active = true;
    let (mut editor, ids) = editor_with(vec![shape]);

    // Grab the rotation handle above the top edge
    let grab = PointerEvent::at(150.0, 60.0);
    editor.begin_transform(&grab, TargetRef::Shape(ids[0]));

    // Updating with the drag-start pointer leaves the angle untouched
    editor.transform_update(&grab);
    assert_abs_diff_eq!(
        editor.scene.shape(ids[0]).unwrap().placement.angle,
        0.0,
        epsilon = 1e-9
    );

    // A full sweep around the anchor comes back to the starting angle
    for (x, y) in [
        (200.0, 100.0),
        (100.0, 200.0),
        (0.0, 100.0),
        (100.0, 0.0),
        (150.0, 60.0),
    ] {
        editor.transform_update(&PointerEvent::at(x, y));
    }
    assert_abs_diff_eq!(
        editor.scene.shape(ids[0]).unwrap().placement.angle,
        0.0,
        epsilon = 1e-9
    );
}

#[test]
fn marquee_over_two_of_three_builds_group_in_z_order() {
    let (mut editor, ids) = editor_with(vec![
        Shape::new(20.0, 20.0).with_position(10.0, 10.0),
        Shape::new(20.0, 20.0).with_position(60.0, 10.0),
        Shape::new(20.0, 20.0).with_position(300.0, 300.0),
    ]);

    editor.marquee_select(Point::new(0.0, 0.0), Point::new(90.0, 40.0), None);

    let group = editor.active_group().expect("two captures form a group");
    assert_eq!(group.members(), &[ids[0], ids[1]]);
    assert!(!group.contains(ids[2]));
    assert_eq!(editor.active_object(), None);
}

#[test]
fn marquee_over_one_shape_selects_it_alone() {
    let (mut editor, ids) = editor_with(vec![
        Shape::new(20.0, 20.0).with_position(10.0, 10.0),
        Shape::new(20.0, 20.0).with_position(300.0, 300.0),
    ]);

    editor.marquee_select(Point::new(0.0, 0.0), Point::new(40.0, 40.0), None);

    assert!(editor.active_group().is_none());
    assert_eq!(editor.active_object(), Some(ids[0]));
}

#[test]
fn marquee_over_nothing_is_a_no_op() {
    let (mut editor, ids) = editor_with(vec![Shape::new(20.0, 20.0).with_position(10.0, 10.0)]);
    editor.marquee_select(Point::new(200.0, 200.0), Point::new(250.0, 250.0), None);
    assert!(editor.active_group().is_none());
    assert_eq!(editor.active_object(), None);
    assert!(!editor.scene.shape(ids[0]).unwrap().active);
}

#[test]
fn removing_from_two_member_group_never_leaves_singleton() {
    let (mut editor, ids) = editor_with(vec![
        Shape::new(20.0, 20.0).with_position(10.0, 10.0),
        Shape::new(20.0, 20.0).with_position(60.0, 10.0),
    ]);
    editor.set_active_object(ids[0], None);

    let shift_click = PointerEvent::at(70.0, 20.0).with_shift();
    editor.handle_group_click(&shift_click, TargetRef::Shape(ids[1]));
    assert_eq!(editor.active_group().map(|g| g.len()), Some(2));

    editor.handle_group_click(&shift_click, TargetRef::Shape(ids[1]));
    assert!(editor.active_group().is_none());
    assert_eq!(editor.active_object(), Some(ids[0]));
}

#[test]
fn dragging_a_group_moves_its_members_on_release() {
    let (mut editor, ids) = editor_with(vec![
        Shape::new(20.0, 20.0).with_position(10.0, 10.0),
        Shape::new(20.0, 20.0).with_position(60.0, 10.0),
    ]);
    editor.marquee_select(Point::new(0.0, 0.0), Point::new(90.0, 40.0), None);

    // Grab inside the group's bounds and drag it 100 to the right
    let group_hit = editor.find_target(Point::new(45.0, 20.0), false);
    assert_eq!(group_hit, Some(TargetRef::Group));
    editor.begin_transform(&PointerEvent::at(45.0, 20.0), TargetRef::Group);
    editor.transform_update(&PointerEvent::at(145.0, 20.0));
    editor.end_transform();

    // Tearing the group down releases the members at their new positions
    editor.deactivate_all_with_dispatch();
    assert_abs_diff_eq!(editor.scene.shape(ids[0]).unwrap().placement.left, 110.0);
    assert_abs_diff_eq!(editor.scene.shape(ids[1]).unwrap().placement.left, 160.0);
    assert_abs_diff_eq!(editor.scene.shape(ids[0]).unwrap().placement.top, 10.0);
}

#[test]
fn selection_notifications_arrive_in_order() {
    let sink = RecordingSink::new();
    let mut editor =
        Editor::new(512, 512, CanvasOptions::default()).with_sink(Box::new(sink.clone()));
    let a = editor.scene.add_shape(Shape::new(20.0, 20.0).with_position(10.0, 10.0));
    let b = editor.scene.add_shape(Shape::new(20.0, 20.0).with_position(60.0, 10.0));
    editor.refresh_cache();

    editor.set_active_object(a, None);
    let shift_click = PointerEvent::at(70.0, 20.0).with_shift();
    editor.handle_group_click(&shift_click, TargetRef::Shape(b));
    editor.deactivate_all_with_dispatch();

    let events = sink.events();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], CanvasEvent::ObjectSelected { id, .. } if id == a));
    assert!(matches!(
        events[1],
        CanvasEvent::SelectionCreated {
            target: TargetRef::Group,
            ..
        }
    ));
    assert!(matches!(
        events[2],
        CanvasEvent::BeforeSelectionCleared {
            target: TargetRef::Group
        }
    ));
    assert!(matches!(events[3], CanvasEvent::SelectionCleared));
}

#[test]
fn unselectable_shape_forces_selection_clear() {
    let (mut editor, ids) = editor_with(vec![
        Shape::new(20.0, 20.0).with_position(10.0, 10.0),
        Shape::new(20.0, 20.0)
            .with_position(60.0, 10.0)
            .with_selectable(false),
    ]);
    editor.set_active_object(ids[0], None);

    let click = PointerEvent::at(70.0, 20.0);
    assert!(editor.should_clear_selection(&click, Some(TargetRef::Shape(ids[1]))));
    assert!(editor.should_clear_selection(&click, None));
    assert!(!editor.should_clear_selection(&click, Some(TargetRef::Shape(ids[0]))));
}
