//! Interactive scene view
//!
//! [`SceneView`] drives a [`Renderer`] the way a host widget would: it
//! remembers the scene root and when it was set, repaints on request and
//! turns pointer input into pick events. It is a small state machine:
//!
//! - `Stopped`: no scene, painting draws nothing
//! - `Rendering`: every paint traverses the scene with the time elapsed since
//!   the scene was set, then collects garbage
//! - `Highlighting`: paints redraw the retained display list with highlights
//!
//! Errors reported while rendering come back out as
//! [`SceneViewEvent::Error`] events.

use std::sync::mpsc::{self, Receiver};

use log::trace;

use super::params::RendererParams;
use super::primitive::PickInfo;
use super::renderer::Renderer;
use super::surface::Surface;
use crate::foundation::math::Point2;
use crate::scene::{NodeId, SceneGraph, Selector};

/// Paint mode of a [`SceneView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Nothing to draw
    #[default]
    Stopped,
    /// Re-traversing the scene on every paint
    Rendering,
    /// Redrawing the retained display list with highlights
    Highlighting,
}

/// Notifications delivered to a [`SceneViewListener`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneViewEvent {
    /// Pointer pressed at a window position
    Pressed(Point2),
    /// Pointer released at a window position
    Released(Point2),
    /// Pointer moved without a button held
    Moved(Point2),
    /// Pointer moved with a button held
    Dragged(Point2),
    /// Pointer moved over a pickable primitive
    Over(PickInfo),
    /// Press and release landed on the same selector
    Picked(PickInfo),
    /// A scene error found while rendering
    Error(String),
}

/// Receiver of [`SceneViewEvent`]s
pub trait SceneViewListener {
    /// Handle one event
    fn handle_event(&mut self, event: &SceneViewEvent);
}

impl<F: FnMut(&SceneViewEvent)> SceneViewListener for F {
    fn handle_event(&mut self, event: &SceneViewEvent) {
        self(event);
    }
}

/// Renderer wrapped in the paint and pointer protocol of a view widget
pub struct SceneView {
    renderer: Renderer,
    state: ViewState,
    scene: Option<NodeId>,
    refreshed_at: u64,
    pressed: Option<Selector>,
    listener: Option<Box<dyn SceneViewListener>>,
    errors: Receiver<String>,
}

impl SceneView {
    /// Create a stopped view
    pub fn new(params: RendererParams) -> Self {
        let (sender, errors) = mpsc::channel();
        let mut renderer = Renderer::new(params);
        renderer.set_error_handler(move |message: &str| {
            // fails only once the view, and with it the receiver, is gone
            let _ = sender.send(message.to_string());
        });
        Self {
            renderer,
            state: ViewState::Stopped,
            scene: None,
            refreshed_at: 0,
            pressed: None,
            listener: None,
            errors,
        }
    }

    /// Install the event listener
    pub fn set_listener(&mut self, listener: impl SceneViewListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Current paint mode
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Scene root being shown
    pub fn scene(&self) -> Option<NodeId> {
        self.scene
    }

    /// Underlying renderer
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Show a scene; scene time counts from `now_ms`
    pub fn set_scene(&mut self, root: NodeId, now_ms: u64) {
        self.scene = Some(root);
        self.refreshed_at = now_ms;
        self.state = ViewState::Rendering;
    }

    /// Stop showing the scene
    pub fn stop(&mut self) {
        self.scene = None;
        self.renderer.clear();
        self.state = ViewState::Stopped;
    }

    /// Replace the renderer parameters; highlighting falls back to rendering
    pub fn set_params(&mut self, params: RendererParams) {
        self.renderer.set_params(params);
        if self.state == ViewState::Highlighting {
            self.renderer.unhighlight();
            self.state = ViewState::Rendering;
        }
    }

    /// Highlight selectors; ignored while stopped
    pub fn highlight(&mut self, selectors: &[Selector]) {
        if self.state == ViewState::Stopped {
            return;
        }
        self.renderer.highlight(selectors);
        self.state = ViewState::Highlighting;
    }

    /// Leave highlighting and resume rendering
    pub fn unhighlight(&mut self) {
        if self.state != ViewState::Highlighting {
            return;
        }
        self.renderer.unhighlight();
        self.state = ViewState::Rendering;
    }

    /// Paint onto `surface` at wall-clock time `now_ms`
    pub fn paint(&mut self, graph: &mut SceneGraph, surface: &mut dyn Surface, now_ms: u64) {
        match (self.state, self.scene) {
            (ViewState::Highlighting, _) => {
                surface.clear(self.renderer.params().background);
                self.renderer.re_render(surface);
            }
            (ViewState::Rendering, Some(root)) => {
                surface.clear(self.renderer.params().background);
                let elapsed = now_ms.saturating_sub(self.refreshed_at);
                self.renderer.render_at(graph, root, surface, elapsed);
                let collected = graph.collect_garbage();
                if collected > 0 {
                    trace!("Collected {collected} scene nodes after paint");
                }
            }
            _ => {}
        }
        let errors: Vec<String> = self.errors.try_iter().collect();
        for message in errors {
            self.fire(&SceneViewEvent::Error(message));
        }
    }

    /// Pointer button pressed
    pub fn pointer_pressed(&mut self, point: Point2) {
        self.pressed = self.renderer.pick(point).and_then(|info| info.selector);
        self.fire(&SceneViewEvent::Pressed(point));
    }

    /// Pointer button released; fires `Picked` if it lands on the pressed selector
    pub fn pointer_released(&mut self, point: Point2) {
        if let Some(info) = self.renderer.pick(point) {
            let same = matches!((&info.selector, &self.pressed), (Some(a), Some(b)) if a == b);
            if same {
                self.fire(&SceneViewEvent::Picked(info));
            }
        }
        self.pressed = None;
        self.fire(&SceneViewEvent::Released(point));
    }

    /// Pointer moved with no button held
    pub fn pointer_moved(&mut self, point: Point2) {
        if let Some(info) = self.renderer.pick(point) {
            self.fire(&SceneViewEvent::Over(info));
        }
        self.fire(&SceneViewEvent::Moved(point));
    }

    /// Pointer moved with a button held
    pub fn pointer_dragged(&mut self, point: Point2) {
        self.fire(&SceneViewEvent::Dragged(point));
    }

    fn fire(&mut self, event: &SceneViewEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener.handle_event(event);
        }
    }
}

impl std::fmt::Debug for SceneView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneView")
            .field("state", &self.state)
            .field("scene", &self.scene)
            .field("refreshed_at", &self.refreshed_at)
            .field("pressed", &self.pressed)
            .finish_non_exhaustive()
    }
}
