use gpui::{Point, Size, px};
use gpui_chart_canvas::draw_element::{DrawElement, Shape};
use gpui_chart_canvas::interaction::{InteractionEvent, InteractionState, interaction_channel};

fn square() -> DrawElement {
    DrawElement::new(
        Shape::Rect {
            top_left: Point::new(px(0.0), px(0.0)),
            size: Size::new(px(10.0), px(10.0)),
        },
        gpui::blue(),
    )
}

#[test]
fn test_hover_lifecycle() {
    let mut state = InteractionState::new();
    let element = square();
    let inside = Point::new(px(5.0), px(5.0));

    state.apply(InteractionEvent::HoverEnter(inside));
    assert!(state.is_hovered(&element));
    assert!(state.has_pointer());

    state.apply(InteractionEvent::HoverMove(Point::new(px(50.0), px(5.0))));
    assert!(!state.is_hovered(&element));
    assert!(state.hover.active);

    state.apply(InteractionEvent::HoverExit(inside));
    assert!(!state.is_hovered(&element));
    assert!(!state.has_pointer());
}

#[test]
fn test_press_release_and_cancel() {
    let mut state = InteractionState::new();
    let element = square();
    let inside = Point::new(px(1.0), px(1.0));

    state.apply(InteractionEvent::Press(inside));
    assert!(state.is_pressed(&element));
    assert!(state.is_hovered_or_pressed(&element));
    state.apply(InteractionEvent::PressRelease);
    assert!(!state.is_pressed(&element));

    state.apply(InteractionEvent::Press(inside));
    state.apply(InteractionEvent::PressCancel);
    assert!(!state.is_pressed(&element));
}

#[test]
fn test_one_shots_clear_by_exit_or_settle() {
    let mut state = InteractionState::new();
    let element = square();
    let inside = Point::new(px(2.0), px(2.0));

    state.apply(InteractionEvent::Tap(inside));
    state.apply(InteractionEvent::DoubleTap(inside));
    state.apply(InteractionEvent::LongPress(inside));
    assert!(state.is_tap(&element));
    assert!(state.is_double_tap(&element));
    assert!(state.is_long_press(&element));
    assert!(state.has_gesture());

    state.apply(InteractionEvent::ExitDoubleTap);
    assert!(!state.is_double_tap(&element));
    assert!(state.is_tap(&element));

    state.settle_one_shots();
    assert!(!state.has_gesture());
    assert!(!state.is_tap(&element));
    assert!(!state.is_long_press(&element));
}

#[test]
fn test_scroll_flag() {
    let mut state = InteractionState::new();
    state.apply(InteractionEvent::ScrollStarted);
    assert!(state.scroll_in_progress);
    state.apply(InteractionEvent::ScrollStopped);
    assert!(!state.scroll_in_progress);
}

#[test]
fn test_full_queue_parks_release_instead_of_dropping() {
    let (sender, receiver) = interaction_channel(2);
    let p = Point::new(px(1.0), px(1.0));
    assert!(sender.try_emit(InteractionEvent::HoverEnter(p)));
    assert!(sender.try_emit(InteractionEvent::Press(p)));
    for i in 0..63 {
        assert!(sender.try_emit(InteractionEvent::HoverMove(Point::new(px(i as f32), px(1.0)))));
    }
    assert!(sender.try_emit(InteractionEvent::PressRelease));

    let mut state = InteractionState::new();
    // Enter, press, one collapsed move, release.
    assert_eq!(receiver.drain_into(&mut state), 4);
    assert!(!state.press.active);
    assert!(state.hover.active);
    assert_eq!(state.hover.location, Point::new(px(62.0), px(1.0)));

    assert!(sender.try_emit(InteractionEvent::HoverExit(p)));
    assert_eq!(receiver.drain_into(&mut state), 1);
    assert!(!state.has_pointer());
}

#[test]
fn test_parked_events_keep_arrival_order() {
    let (sender, receiver) = interaction_channel(1);
    let p = Point::new(px(4.0), px(4.0));
    sender.try_emit(InteractionEvent::HoverEnter(p));
    sender.try_emit(InteractionEvent::HoverMove(Point::new(px(5.0), px(5.0))));
    sender.try_emit(InteractionEvent::HoverExit(p));
    sender.try_emit(InteractionEvent::HoverMove(Point::new(px(6.0), px(6.0))));

    let mut state = InteractionState::new();
    assert_eq!(receiver.drain_into(&mut state), 4);
    // The exit is not collapsed away; the move after it re-activates hover.
    assert!(state.hover.active);
    assert_eq!(state.hover.location, Point::new(px(6.0), px(6.0)));
}

#[test]
fn test_events_apply_in_order() {
    let (sender, receiver) = interaction_channel(8);
    sender.try_emit(InteractionEvent::HoverEnter(Point::new(px(1.0), px(1.0))));
    sender.try_emit(InteractionEvent::HoverMove(Point::new(px(2.0), px(2.0))));
    sender.try_emit(InteractionEvent::HoverMove(Point::new(px(3.0), px(3.0))));

    let mut state = InteractionState::new();
    receiver.drain_into(&mut state);
    assert_eq!(state.hover.location, Point::new(px(3.0), px(3.0)));
}

#[test]
fn test_emit_after_consumer_dropped() {
    let (sender, receiver) = interaction_channel(4);
    drop(receiver);
    assert!(!sender.try_emit(InteractionEvent::ScrollStarted));
}
