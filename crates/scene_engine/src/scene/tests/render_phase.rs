//! Render phase: transform grouping, camera placement, hook order

use approx::assert_relative_eq;

use super::support::*;
use crate::body::Layer;
use crate::foundation::math::Vec2;
use crate::render::{DriverCall, RecordingDriver};
use crate::scene::{RenderStats, SceneCompositor};

fn scene_and_driver(log: &EventLog) -> (SceneCompositor, RecordingDriver) {
    let scene = SceneCompositor::new("test", TestScene { log: std::rc::Rc::clone(log) });
    (scene, RecordingDriver::new())
}

fn prepare_count(driver: &RecordingDriver) -> usize {
    driver
        .calls()
        .iter()
        .filter(|call| matches!(call, DriverCall::PrepareScene { .. }))
        .count()
}

#[test]
fn test_runs_of_scroll_factor_share_matrix_scopes() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);

    for (id, factor) in [1.0, 1.0, 1.0, 0.5, 0.5, 1.0].into_iter().enumerate() {
        let z = i32::try_from(id).unwrap();
        let layer = Layer::new(z).with_scroll_factor(factor, factor);
        scene.add(TestBody::new(z.unsigned_abs(), layer, &log).boxed()).unwrap();
    }

    scene.internal_update(1.0 / 60.0);
    let stats = scene.internal_render(&mut driver);

    assert_eq!(stats, RenderStats { groups: 3, bodies: 6 });
    let driver_stats = driver.stats();
    assert_eq!(driver_stats.pushes, 3);
    assert_eq!(driver_stats.pops, 3);
    assert_eq!(driver_stats.max_depth, 1);
    assert_eq!(driver.depth(), 0);
    assert_eq!(rendered(&log), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_signed_zero_scroll_factors_share_a_scope() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);
    scene
        .add(TestBody::new(1, Layer::new(0).with_scroll_factor(0.0, 0.0), &log).boxed())
        .unwrap();
    scene
        .add(TestBody::new(2, Layer::new(0).with_scroll_factor(-0.0, 0.0), &log).boxed())
        .unwrap();

    scene.internal_update(1.0 / 60.0);
    let stats = scene.internal_render(&mut driver);

    assert_eq!(stats, RenderStats { groups: 1, bodies: 2 });
    assert_eq!(driver.stats().pushes, 1);
    assert_eq!(driver.stats().pops, 1);
    assert_eq!(rendered(&log), vec![1, 2]);
}

#[test]
fn test_empty_container_renders_camera_only() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);

    scene.internal_update(1.0 / 60.0);
    let stats = scene.internal_render(&mut driver);

    assert_eq!(stats, RenderStats::default());
    assert_eq!(prepare_count(&driver), 1);
    assert_eq!(driver.stats().pushes, 0);
    assert_eq!(driver.stats().pops, 0);
}

#[test]
fn test_same_z_splits_by_scroll_factor() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);
    scene.camera_mut().position = Vec2::new(100.0, 50.0);

    scene
        .add(TestBody::new(1, Layer::new(0), &log).observed_by(&driver).boxed())
        .unwrap();
    let slow = Layer::new(0).with_scroll_factor(0.5, 0.5);
    scene
        .add(TestBody::new(2, slow, &log).observed_by(&driver).boxed())
        .unwrap();

    scene.internal_update(1.0 / 60.0);
    let stats = scene.internal_render(&mut driver);

    assert_eq!(stats.groups, 2);
    assert_eq!(rendered(&log), vec![2, 1]);

    let (slow, _) = render_event(&log, 2).unwrap();
    assert_relative_eq!(slow, Vec2::new(-50.0, -25.0));
    let (fast, _) = render_event(&log, 1).unwrap();
    assert_relative_eq!(fast, Vec2::zeros());
}

#[test]
fn test_hud_body_renders_in_screen_space() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);
    scene.camera_mut().position = Vec2::new(300.0, 200.0);

    let distant = Layer::new(0).with_scroll_factor(0.2, 0.2);
    scene
        .add(TestBody::new(1, distant, &log).observed_by(&driver).boxed())
        .unwrap();
    scene
        .add(TestBody::new(2, Layer::new(-50).with_hud(true), &log).observed_by(&driver).boxed())
        .unwrap();

    scene.internal_update(1.0 / 60.0);
    scene.internal_render(&mut driver);

    assert_eq!(rendered(&log), vec![1, 2]);
    let (translation, screen_space) = render_event(&log, 2).unwrap();
    assert!(screen_space);
    assert_relative_eq!(translation, Vec2::zeros());

    let (world, in_screen) = render_event(&log, 1).unwrap();
    assert!(!in_screen);
    assert_relative_eq!(world, Vec2::new(-240.0, -160.0));
}

#[test]
fn test_first_body_hud_loads_identity() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);
    scene.camera_mut().position = Vec2::new(10.0, 10.0);
    scene.add(TestBody::new(1, Layer::new(0).with_hud(true), &log).boxed()).unwrap();

    scene.internal_update(1.0 / 60.0);
    scene.internal_render(&mut driver);

    let calls = driver.calls();
    assert_eq!(
        &calls[1..],
        &[DriverCall::PushMatrix, DriverCall::LoadIdentity, DriverCall::PopMatrix]
    );
}

#[test]
fn test_hidden_camera_renders_after_bodies() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);
    scene.camera_mut().set_visible(false);
    scene.add(TestBody::new(1, Layer::new(0), &log).boxed()).unwrap();

    scene.internal_update(1.0 / 60.0);
    scene.internal_render(&mut driver);

    let calls = driver.calls();
    assert_eq!(prepare_count(&driver), 1);
    assert!(matches!(calls.last(), Some(DriverCall::PrepareScene { .. })));
    assert_eq!(calls[0], DriverCall::PushMatrix);
}

#[test]
fn test_hidden_bodies_open_no_scope() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);
    scene.add(TestBody::new(1, Layer::new(0), &log).hidden().boxed()).unwrap();
    scene
        .add(TestBody::new(2, Layer::new(1).with_hud(true), &log).hidden().boxed())
        .unwrap();

    scene.internal_update(1.0 / 60.0);
    let stats = scene.internal_render(&mut driver);

    assert_eq!(stats, RenderStats::default());
    assert_eq!(driver.stats().pushes, 0);
    assert!(rendered(&log).is_empty());
}

#[test]
fn test_hidden_body_does_not_split_a_run() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);
    scene.add(TestBody::new(1, Layer::new(0), &log).boxed()).unwrap();
    scene
        .add(TestBody::new(2, Layer::new(1).with_scroll_factor(0.5, 0.5), &log).hidden().boxed())
        .unwrap();
    scene.add(TestBody::new(3, Layer::new(2), &log).boxed()).unwrap();

    scene.internal_update(1.0 / 60.0);
    let stats = scene.internal_render(&mut driver);

    assert_eq!(stats, RenderStats { groups: 1, bodies: 2 });
}

#[test]
fn test_phase_hooks_run_last() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);
    scene.add(TestBody::new(1, Layer::new(0), &log).boxed()).unwrap();

    scene.internal_update(1.0 / 60.0);
    scene.internal_render(&mut driver);

    let events = log.borrow().clone();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], Event::Updated(1));
    assert_eq!(events[1], Event::SceneUpdated);
    assert!(matches!(events[2], Event::Rendered { id: 1, .. }));
    assert_eq!(events[3], Event::SceneRendered);
}

#[test]
fn test_rekeyed_body_moves_to_new_group() {
    let log = event_log();
    let (mut scene, mut driver) = scene_and_driver(&log);
    scene.add(TestBody::new(1, Layer::new(0), &log).boxed()).unwrap();
    scene
        .add(
            TestBody::new(2, Layer::new(1), &log)
                .on_update(|state, _| state.set_hud(true))
                .boxed(),
        )
        .unwrap();

    scene.internal_update(1.0 / 60.0);
    let stats = scene.internal_render(&mut driver);

    assert_eq!(stats.groups, 2);
    assert!(driver.calls().contains(&DriverCall::LoadIdentity));
    assert_eq!(scene.last_render_stats(), stats);
}
