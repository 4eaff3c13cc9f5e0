//! Scene lifecycle tests: deferred destruction, observers, keyframe
//! interpolation driven by rendering, and the reentrant scene lock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use approx::assert_relative_eq;
use nectar_engine::foundation::logging;
use nectar_engine::prelude::*;
use nectar_engine::scene::{ElementState, InterpolatorState};

#[derive(Default)]
struct Counter {
    calls: AtomicUsize,
    seen: Mutex<Vec<NodeId>>,
}

impl SceneObserver for Counter {
    fn update(&self, node: NodeId) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(node);
        }
    }
}

impl Counter {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[test]
fn destroyed_subtree_is_collected_with_one_notification_per_observer() {
    logging::init_for_tests();
    let mut graph = SceneGraph::new();
    let root = graph.insert(NodeKind::Group);
    let group = graph.insert_child(root, TransformGroup::new()).unwrap();
    let leaf = graph.insert_child(group, Geometry::cuboid(10.0, 10.0, 10.0)).unwrap();

    let first = Arc::new(Counter::default());
    let second = Arc::new(Counter::default());
    graph.attach_observer(group, &first).unwrap();
    graph.attach_observer(group, &second).unwrap();

    graph.destroy(group).unwrap();
    graph.destroy(group).unwrap();
    assert_eq!(graph.state(group), Some(ElementState::Destroyed));
    assert_eq!(graph.pending_destruction(), &[group]);
    // still attached until collection
    assert_eq!(graph.children(root), &[group]);
    assert_eq!(first.calls(), 0);

    graph.collect_garbage();
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 1);
    assert_eq!(first.seen.lock().unwrap().as_slice(), &[group]);
    assert!(graph.children(root).is_empty());
    assert!(!graph.contains(group));
    assert!(!graph.contains(leaf));
    assert!(graph.contains(root));

    assert_eq!(graph.collect_garbage(), 0);
    assert_eq!(first.calls(), 1);
}

#[test]
fn destroyed_nodes_are_skipped_by_rendering() {
    let mut graph = SceneGraph::new();
    let layer = graph.insert(Layer::new("main", true, false, false));
    let doomed = graph.insert_child(layer, Geometry::cuboid(20.0, 20.0, 20.0)).unwrap();

    let mut renderer = Renderer::new(RendererParams::default());
    let mut surface = RecordingSurface::new();
    renderer.render(&mut graph, layer, &mut surface);
    assert_eq!(surface.polygon_count(), 1);

    graph.destroy(doomed).unwrap();
    let mut surface = RecordingSurface::new();
    renderer.render(&mut graph, layer, &mut surface);
    assert_eq!(surface.polygon_count(), 0);
}

#[test]
fn keyframes_must_be_well_formed() {
    assert_eq!(
        Interpolator::new(Attribute::RotY, vec![100, 100], vec![0.0, 1.0]).unwrap_err(),
        SceneError::NonIncreasingInstants { index: 0, next: 1 }
    );
    assert_eq!(
        Interpolator::new(Attribute::RotY, vec![0, 10, 20], vec![0.0, 1.0]).unwrap_err(),
        SceneError::KeyframeCountMismatch { instants: 3, values: 2 }
    );
    assert_eq!(
        Interpolator::new(Attribute::RotY, vec![0], vec![0.0]).unwrap_err(),
        SceneError::TooFewKeyframes(1)
    );
}

#[test]
fn interpolator_runs_relative_to_activation_and_removes_itself() {
    let mut graph = SceneGraph::new();
    let group = graph.insert(TransformGroup::new());
    let animation = Interpolator::new(Attribute::TranslateX, vec![0, 1000], vec![0.0, 10.0]).unwrap();
    let animation = graph.insert_child(group, animation).unwrap();
    let observer = Arc::new(Counter::default());
    graph.attach_observer(animation, &observer).unwrap();

    let start = 20_000;
    assert_eq!(graph.update_interpolator(animation, start).unwrap(), InterpolatorState::Interpolating);
    assert_relative_eq!(graph.attribute(group, Attribute::TranslateX).unwrap(), 0.0);

    graph.update_interpolator(animation, start + 500).unwrap();
    assert_relative_eq!(graph.attribute(group, Attribute::TranslateX).unwrap(), 5.0);

    let state = graph.update_interpolator(animation, start + 1001).unwrap();
    assert_eq!(state, InterpolatorState::Finished);
    assert_relative_eq!(graph.attribute(group, Attribute::TranslateX).unwrap(), 10.0);
    assert_eq!(graph.state(animation), Some(ElementState::Destroyed));
    assert_eq!(observer.calls(), 1);

    // later updates leave the parent alone
    graph.set_attribute(group, Attribute::TranslateX, 3.0).unwrap();
    graph.update_interpolator(animation, start + 5000).unwrap();
    assert_relative_eq!(graph.attribute(group, Attribute::TranslateX).unwrap(), 3.0);

    graph.collect_garbage();
    assert_eq!(observer.calls(), 1);
    assert!(!graph.contains(animation));
    assert!(graph.children(group).is_empty());
}

#[test]
fn scene_view_animates_and_collects_finished_interpolators() {
    let mut graph = SceneGraph::new();
    let layer = graph.insert(Layer::new("main", true, false, false));
    let group = graph
        .insert_child(layer, TransformGroup::new().with_transform(TransformKind::RotY).unwrap())
        .unwrap();
    graph.insert_child(group, Geometry::cuboid(20.0, 20.0, 20.0)).unwrap();
    let spin = Interpolator::new(Attribute::RotY, vec![0, 1000], vec![0.0, 90.0]).unwrap();
    let spin = graph.insert_child(group, spin).unwrap();

    let mut view = SceneView::new(RendererParams::default());
    view.set_scene(layer, 1000);

    let mut surface = RecordingSurface::new();
    view.paint(&mut graph, &mut surface, 1000);
    view.paint(&mut graph, &mut surface, 1500);
    assert_relative_eq!(graph.attribute(group, Attribute::RotY).unwrap(), 45.0);
    assert!(graph.contains(spin));

    view.paint(&mut graph, &mut surface, 2500);
    assert_relative_eq!(graph.attribute(group, Attribute::RotY).unwrap(), 90.0);
    assert!(!graph.contains(spin));
    assert_eq!(graph.children(group).len(), 1);
}

#[test]
fn scene_lock_is_reentrant_and_exclusive_across_threads() {
    let graph = SceneGraph::new();
    let mutex = graph.mutex();

    let outer = mutex.lock();
    let inner = mutex.lock();
    assert_eq!(mutex.hold_count(), 2);
    assert_eq!(mutex.owner(), Some(thread::current().id()));

    let (tried_tx, tried_rx) = mpsc::channel();
    let (acquired_tx, acquired_rx) = mpsc::channel();
    let contender = {
        let mutex = Arc::clone(&mutex);
        thread::spawn(move || {
            tried_tx.send(mutex.try_lock().is_none()).unwrap();
            let _guard = mutex.lock();
            acquired_tx.send(thread::current().id()).unwrap();
        })
    };

    // both guards are still held while the other thread tries
    assert!(tried_rx.recv().unwrap(), "try_lock succeeded while another thread held the lock");
    drop(inner);
    assert_eq!(mutex.hold_count(), 1);
    assert!(acquired_rx.recv_timeout(Duration::from_millis(100)).is_err());

    drop(outer);
    let winner = acquired_rx.recv().unwrap();
    assert_eq!(winner, contender.thread().id());
    contender.join().unwrap();

    assert_eq!(mutex.hold_count(), 0);
    assert!(mutex.try_lock().is_some());
}
