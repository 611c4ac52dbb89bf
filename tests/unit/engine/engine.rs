use std::{cell::Cell, rc::Rc};

use super::*;
use crate::{
    foundation::core::Length,
    sim::{PageLayout, PageSpec},
    stack::transform::Visibility,
};

/// Card tops 0 / 500 / 1000, sentinel at 1500, 800px viewport: pin window is [800, 1100].
fn config() -> StackConfig {
    StackConfig {
        item_distance: 0.0,
        item_stack_distance: 100.0,
        base_scale: 0.9,
        item_scale: 0.02,
        stack_position: Length::Px(0.0),
        scale_end_position: Length::Px(0.0),
        rotation_amount: 0.0,
        blur_amount: 0.0,
        ..StackConfig::default()
    }
}

fn page() -> PageSpec {
    PageSpec {
        stack_top: 0.0,
        card_heights: vec![500.0; 3],
        viewport_height: 800.0,
        content_after: 2000.0,
        container: true,
        end_sentinel: true,
    }
}

fn jump(stack: &mut ScrollStack, host: &mut PageLayout, offset: f64, t: f64) -> FrameReport {
    stack.scroll_to(offset, true);
    stack.frame(host, t).unwrap()
}

#[test]
fn mount_styles_cards_and_writes_everything_once() {
    let mut host = PageLayout::new(page()).unwrap();
    let cfg = StackConfig {
        item_distance: 40.0,
        ..config()
    };
    let stack = ScrollStack::mount(cfg, &mut host).unwrap();
    assert!(stack.is_active());
    assert_eq!(stack.card_count(), 3);
    assert_eq!(host.writes().len(), 3);
    assert_eq!(host.setup(0).unwrap().margin_bottom, Some(40.0));
    assert_eq!(host.setup(2).unwrap().margin_bottom, None);
    // Margins shift later cards.
    assert_eq!(host.card_top(2), Some(1080.0));
    assert_eq!(host.applied(0).unwrap().visibility, Visibility::Visible);
    assert_eq!(host.applied(1).unwrap().visibility, Visibility::Hidden);
}

#[test]
fn repeated_identical_frames_write_nothing() {
    let mut host = PageLayout::new(page()).unwrap();
    let mut stack = ScrollStack::mount(config(), &mut host).unwrap();
    jump(&mut stack, &mut host, 650.0, 0.0);
    host.take_writes();

    let r1 = stack.frame(&mut host, 16.0).unwrap();
    let r2 = stack.frame(&mut host, 32.0).unwrap();
    assert_eq!(r1.writes, 0);
    assert_eq!(r2.writes, 0);
    assert!(host.writes().is_empty());
}

#[test]
fn container_mode_without_container_is_inert() {
    let mut host = PageLayout::new(PageSpec {
        container: false,
        ..page()
    })
    .unwrap();
    let cfg = StackConfig {
        use_window_scroll: false,
        ..config()
    };
    let mut stack = ScrollStack::mount(cfg, &mut host).unwrap();
    assert!(!stack.is_active());
    assert!(stack.scroll_source().is_none());
    assert!(stack.frame(&mut host, 16.0).unwrap().skipped);
    assert!(host.writes().is_empty());
    assert!(host.setup(0).is_none());
}

#[test]
fn no_cards_is_inert() {
    let mut host = PageLayout::new(PageSpec {
        card_heights: vec![],
        ..page()
    })
    .unwrap();
    let mut stack = ScrollStack::mount(config(), &mut host).unwrap();
    assert!(!stack.is_active());
    assert!(stack.frame(&mut host, 0.0).unwrap().skipped);
}

#[test]
fn invalid_config_fails_mount() {
    let mut host = PageLayout::new(page()).unwrap();
    let cfg = StackConfig {
        item_scale: f64::NAN,
        ..config()
    };
    assert!(matches!(
        ScrollStack::mount(cfg, &mut host),
        Err(StackError::Validation(_))
    ));
}

#[test]
fn completion_fires_once_per_entry() {
    let fired = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&fired);
    let mut host = PageLayout::new(page()).unwrap();
    let mut stack = ScrollStack::builder(config())
        .on_stack_complete(move || {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .mount(&mut host)
        .unwrap();
    assert_eq!(stack.completion_state(), CompletionState::Pending);

    assert!(jump(&mut stack, &mut host, 900.0, 0.0).completed);
    assert!(!jump(&mut stack, &mut host, 1000.0, 16.0).completed);
    assert_eq!(fired.get(), 1);
    assert_eq!(stack.completion_state(), CompletionState::Completed);

    jump(&mut stack, &mut host, 1200.0, 32.0);
    assert_eq!(stack.completion_state(), CompletionState::Pending);
    assert!(jump(&mut stack, &mut host, 850.0, 48.0).completed);
    assert_eq!(fired.get(), 2);
}

#[test]
fn callback_error_propagates_without_wedging_the_engine() {
    let mut host = PageLayout::new(page()).unwrap();
    let mut stack = ScrollStack::builder(config())
        .on_stack_complete(|| Err(anyhow::anyhow!("listener failed")))
        .mount(&mut host)
        .unwrap();

    stack.scroll_to(900.0, true);
    let err = stack.frame(&mut host, 0.0).unwrap_err();
    assert!(matches!(err, StackError::Callback(_)));

    // The guard was released; later passes keep running.
    stack.scroll_to(100.0, true);
    let r = stack.frame(&mut host, 16.0).unwrap();
    assert!(!r.skipped);
}

#[test]
fn scroll_events_schedule_one_pass_in_container_mode() {
    let mut host = PageLayout::new(page()).unwrap();
    let cfg = StackConfig {
        use_window_scroll: false,
        ..config()
    };
    let mut stack = ScrollStack::mount(cfg, &mut host).unwrap();

    assert!(stack.request_pass());
    assert!(!stack.request_pass());
    assert!(stack.has_pending_pass());
    assert!(!stack.run_scheduled(&mut host).unwrap().skipped);
    assert!(!stack.has_pending_pass());
    assert!(stack.run_scheduled(&mut host).unwrap().skipped);

    // A frame serves the pending request.
    stack.request_pass();
    stack.frame(&mut host, 16.0).unwrap();
    assert!(!stack.has_pending_pass());
}

#[test]
fn window_mode_ignores_scroll_event_requests() {
    let mut host = PageLayout::new(page()).unwrap();
    let mut stack = ScrollStack::mount(config(), &mut host).unwrap();
    assert!(!stack.request_pass());
}

#[test]
fn smooth_scroller_drives_the_host() {
    let mut host = PageLayout::new(page()).unwrap();
    let mut stack = ScrollStack::mount(config(), &mut host).unwrap();
    stack.wheel(1000.0); // window preset: x0.3

    let mut last = 0.0;
    let mut t = 0.0;
    while t <= 2100.0 {
        stack.frame(&mut host, t).unwrap();
        assert!(host.scroll_top() >= last);
        last = host.scroll_top();
        t += 1000.0 / 60.0;
    }
    assert!((host.scroll_top() - 300.0).abs() < 1e-9);
    assert_eq!(stack.scroll_offset(), Some(host.scroll_top()));
}

#[test]
fn native_scroll_is_picked_up_when_idle() {
    let mut host = PageLayout::new(page()).unwrap();
    let mut stack = ScrollStack::mount(config(), &mut host).unwrap();
    host.native_scroll(700.0);
    stack.frame(&mut host, 0.0).unwrap();
    assert_eq!(stack.scroll_offset(), Some(700.0));
    assert_eq!(host.applied(1).unwrap().visibility, Visibility::Visible);
}

#[test]
fn unmount_tears_everything_down_once() {
    let mut host = PageLayout::new(page()).unwrap();
    let mut stack = ScrollStack::mount(config(), &mut host).unwrap();
    jump(&mut stack, &mut host, 900.0, 0.0);
    assert!(!stack.cache().is_empty());

    stack.unmount();
    stack.unmount();
    assert!(!stack.is_active());
    assert!(stack.cache().is_empty());
    assert_eq!(stack.completion_state(), CompletionState::Pending);
    assert!(stack.scroll_source().unwrap().is_destroyed());

    host.take_writes();
    stack.wheel(500.0);
    assert!(stack.frame(&mut host, 16.0).unwrap().skipped);
    assert!(!stack.request_pass());
    assert!(host.writes().is_empty());
}

#[test]
fn scheduled_pass_sees_native_scroll() {
    let mut host = PageLayout::new(page()).unwrap();
    let cfg = StackConfig {
        use_window_scroll: false,
        ..config()
    };
    let mut stack = ScrollStack::mount(cfg, &mut host).unwrap();
    host.take_writes();

    // Scrollbar drag past card 1's trigger start (400).
    host.native_scroll(700.0);
    assert!(stack.request_pass());
    let r = stack.run_scheduled(&mut host).unwrap();
    assert!(r.writes > 0);
    assert_eq!(host.applied(1).unwrap().visibility, Visibility::Visible);
    assert_eq!(stack.scroll_offset(), Some(700.0));

    // The next frame keeps the adopted offset instead of snapping back.
    stack.frame(&mut host, 16.0).unwrap();
    assert_eq!(host.scroll_top(), 700.0);
}

#[test]
fn desired_states_ignore_the_hysteresis_band() {
    let mut host = PageLayout::new(page()).unwrap();
    let cfg = StackConfig {
        scale_end_position: Length::Px(-1000.0),
        ..config()
    };
    let mut stack = ScrollStack::mount(cfg, &mut host).unwrap();

    // Card 0 window is [0, 1000]; 40px in is a 0.004 scale change, under the 0.01 band.
    jump(&mut stack, &mut host, 40.0, 0.0);
    assert_eq!(host.applied(0).unwrap().scale, 1.0);

    let states = stack.desired_states(&host).unwrap();
    assert_eq!(states.len(), 3);
    assert_eq!(states[0].scale, 0.996);

    stack.unmount();
    assert!(stack.desired_states(&host).unwrap().is_empty());
}
