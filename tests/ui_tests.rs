use gpui::{Bounds, Pixels, Point, Size, TestAppContext, px};
use gpui_chart_canvas::canvas::RecordingCanvas;
use gpui_chart_canvas::config::CanvasConfig;
use gpui_chart_canvas::draw_scope::{CanvasState, FrameDrawScope};
use gpui_chart_canvas::interaction::InteractionEvent;
use gpui_chart_canvas::{InteractiveChartView, InteractivePlot};
use std::time::{Duration, Instant};

#[derive(Debug, Default, PartialEq)]
struct Gestures {
    hovered: bool,
    pressed: bool,
    tapped: bool,
    double_tapped: bool,
    long_pressed: bool,
}

/// Draws one 10x10 square at the origin and reports what the layout pass saw on it.
fn observe(state: &mut CanvasState) -> Gestures {
    let mut seen = Gestures::default();
    state.draw_frame(&mut RecordingCanvas::new(), |scope| {
        let gestures = Gestures {
            hovered: scope.is_hovered(),
            pressed: scope.is_pressed(),
            tapped: scope.is_tapped(),
            double_tapped: scope.is_double_tapped(),
            long_pressed: scope.is_long_pressed(),
        };
        if !scope.is_pre_layout() {
            seen = gestures;
        }
        scope.draw_rect(
            Point::new(px(0.0), px(0.0)),
            Size::new(px(10.0), px(10.0)),
            gpui::blue(),
        );
    });
    seen
}

#[gpui::test]
fn test_chart_view_translates_clicks(cx: &mut TestAppContext) {
    let window = cx.add_window(|_window, cx| {
        let mut view = InteractiveChartView::new(CanvasConfig::default(), cx);
        view.add_plot(
            |scope: &mut FrameDrawScope<'_>, bounds: Bounds<Pixels>| {
                let color = scope.value_if_hovered(gpui::blue(), gpui::red());
                scope.draw_rect(bounds.origin, bounds.size, color);
            },
            cx,
        );
        view
    });

    window
        .update(cx, |view, _window, _cx| {
            let state = view.state();
            let p = Point::new(px(5.0), px(5.0));
            let now = Instant::now();

            view.press_at(p, now);
            assert_eq!(
                observe(&mut state.borrow_mut()),
                Gestures {
                    pressed: true,
                    ..Default::default()
                }
            );

            view.release_at(p, 1, now + Duration::from_millis(50));
            assert_eq!(
                observe(&mut state.borrow_mut()),
                Gestures {
                    tapped: true,
                    ..Default::default()
                }
            );

            // The tap was settled by the frame that saw it.
            assert_eq!(observe(&mut state.borrow_mut()), Gestures::default());
        })
        .unwrap();
}

#[gpui::test]
fn test_chart_view_long_press_and_double_tap(cx: &mut TestAppContext) {
    let window = cx.add_window(|_window, cx| InteractiveChartView::new(CanvasConfig::default(), cx));

    window
        .update(cx, |view, _window, _cx| {
            let state = view.state();
            let p = Point::new(px(3.0), px(3.0));
            let now = Instant::now();

            view.press_at(p, now);
            view.release_at(p, 1, now + Duration::from_millis(600));
            assert_eq!(
                observe(&mut state.borrow_mut()),
                Gestures {
                    long_pressed: true,
                    ..Default::default()
                }
            );

            view.press_at(p, now);
            view.release_at(p, 2, now + Duration::from_millis(10));
            assert_eq!(
                observe(&mut state.borrow_mut()),
                Gestures {
                    double_tapped: true,
                    ..Default::default()
                }
            );
        })
        .unwrap();
}

#[gpui::test]
fn test_release_without_press_is_ignored(cx: &mut TestAppContext) {
    let window = cx.add_window(|_window, cx| InteractiveChartView::new(CanvasConfig::default(), cx));

    window
        .update(cx, |view, _window, _cx| {
            view.release_at(Point::new(px(1.0), px(1.0)), 1, Instant::now());
            assert_eq!(observe(&mut view.state().borrow_mut()), Gestures::default());
        })
        .unwrap();
}

#[gpui::test]
fn test_leaving_the_chart_ends_hover_and_press(cx: &mut TestAppContext) {
    let window = cx.add_window(|_window, cx| InteractiveChartView::new(CanvasConfig::default(), cx));

    window
        .update(cx, |view, _window, _cx| {
            let state = view.state();
            let p = Point::new(px(4.0), px(4.0));

            state.borrow().emit(InteractionEvent::HoverEnter(p));
            view.press_at(p, Instant::now());
            assert_eq!(
                observe(&mut state.borrow_mut()),
                Gestures {
                    hovered: true,
                    pressed: true,
                    ..Default::default()
                }
            );

            view.leave();
            assert_eq!(observe(&mut state.borrow_mut()), Gestures::default());
            assert!(state.borrow().activated().is_none());

            // The press was cancelled, so a later release completes no gesture.
            view.release_at(p, 1, Instant::now());
            assert_eq!(observe(&mut state.borrow_mut()), Gestures::default());
        })
        .unwrap();
}

#[gpui::test]
fn test_release_outside_cancels_press(cx: &mut TestAppContext) {
    let window = cx.add_window(|_window, cx| InteractiveChartView::new(CanvasConfig::default(), cx));

    window
        .update(cx, |view, _window, _cx| {
            let state = view.state();
            let p = Point::new(px(6.0), px(6.0));
            let now = Instant::now();

            view.press_at(p, now);
            assert!(observe(&mut state.borrow_mut()).pressed);

            view.release_outside();
            assert_eq!(observe(&mut state.borrow_mut()), Gestures::default());

            view.release_at(p, 1, now + Duration::from_millis(20));
            assert_eq!(observe(&mut state.borrow_mut()), Gestures::default());
        })
        .unwrap();
}

#[test]
fn test_closures_are_plots() {
    let plot = |scope: &mut FrameDrawScope<'_>, bounds: Bounds<Pixels>| {
        scope.draw_circle(bounds.center(), px(4.0), gpui::green());
    };
    let bounds = Bounds::new(Point::new(px(0.0), px(0.0)), Size::new(px(20.0), px(20.0)));

    let mut state = CanvasState::default();
    let mut canvas = RecordingCanvas::new();
    state.draw_frame(&mut canvas, |scope| plot.draw(scope, bounds));
    assert_eq!(state.elements().len(), 1);
    assert_eq!(canvas.commands().len(), 1);
}
