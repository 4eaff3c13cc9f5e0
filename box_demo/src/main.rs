//! Spinning box demo
//!
//! Builds a small scene (a lit, fogged box under a caption) whose Y rotation
//! is driven by an interpolator, paints a few seconds of it through a
//! [`SceneView`] and writes each frame as a PNG.
//!
//! ```text
//! box_demo [params.toml|params.ron] [output-dir]
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use nectar_engine::foundation::logging;
use nectar_engine::prelude::*;
use nectar_engine::scene::Font;

/// Length of the animation in milliseconds
const SPIN_MS: u64 = 4000;
/// Time between painted frames
const FRAME_MS: u64 = 500;

/// Logs when the spin interpolator has finished and removed itself
struct SpinFinished;

impl SceneObserver for SpinFinished {
    fn update(&self, node: NodeId) {
        log::info!("Spin animation {node:?} finished");
    }
}

struct BoxDemoApp {
    graph: SceneGraph,
    root: NodeId,
    view: SceneView,
    output: PathBuf,
    _spin_observer: Arc<SpinFinished>,
}

impl BoxDemoApp {
    fn new(params: RendererParams, output: PathBuf) -> Result<Self, SceneError> {
        let mut graph = SceneGraph::new();
        let root = graph.insert(NodeKind::Group);

        let lights = graph.insert_child(
            root,
            Environment::new()
                .with_light(LightSource::new(Vec3::new(0.3, 0.5, 1.0), Color::new(90, 90, 90)))
                .with_light(LightSource::new(Vec3::new(-1.0, 0.0, 0.2), Color::new(40, 20, 0))),
        )?;

        let boxes = graph.insert_child(lights, Layer::new("boxes", true, true, true))?;
        graph.insert_child(
            boxes,
            Appearance::new(Color::new(60, 110, 200), Color::new(20, 30, 60))
                .with_highlight(Color::new(250, 200, 40), Color::BLACK),
        )?;
        let name = graph.insert_child(boxes, Selector::name("box"))?;
        let spin_group = TransformGroup::new()
            .with_transform(TransformKind::RotY)?
            .with_transform(TransformKind::RotX)?
            .with_attribute(Attribute::RotX, 25.0);
        let spin_group = graph.insert_child(name, spin_group)?;
        graph.insert_child(spin_group, Geometry::cuboid(60.0, 60.0, 60.0))?;
        let spin = Interpolator::new(
            Attribute::RotY,
            vec![0, SPIN_MS / 2, SPIN_MS],
            vec![0.0, 180.0, 360.0],
        )?;
        let spin = graph.insert_child(spin_group, spin)?;
        let spin_observer = Arc::new(SpinFinished);
        graph.attach_observer(spin, &spin_observer)?;

        let labels = graph.insert_child(root, Layer::new("labels", false, false, false))?;
        let caption = graph.insert_child(labels, Selector::name("caption"))?;
        graph.insert_child(
            caption,
            Label::new("nectar3d")
                .with_offset(Vec3::new(-40.0, -90.0, 0.0))
                .with_font(Font { size: 18, ..Font::default() }),
        )?;

        let mut view = SceneView::new(params);
        view.set_listener(|event: &SceneViewEvent| match event {
            SceneViewEvent::Error(message) => log::warn!("Scene error: {message}"),
            SceneViewEvent::Picked(info) => log::info!("Picked {info:?}"),
            other => log::debug!("View event {other:?}"),
        });

        Ok(Self {
            graph,
            root,
            view,
            output,
            _spin_observer: spin_observer,
        })
    }

    fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&self.output)?;
        let window = self.view.renderer().params().window;
        let background = self.view.renderer().params().background;
        let (width, height) = (u32::try_from(window.width())?, u32::try_from(window.height())?);

        self.view.set_scene(self.root, 0);
        let mut frame_count = 0;
        for now in (0..=SPIN_MS + FRAME_MS).step_by(usize::try_from(FRAME_MS)?) {
            let mut frame = Framebuffer::new(width, height, background);
            self.view.paint(&mut self.graph, &mut frame, now);
            self.save(&frame, &format!("frame_{frame_count:02}.png"))?;
            frame_count += 1;
        }

        // click the middle of the window; the box sits there
        let center = Point2::new(
            window.xmin + window.width() / 2,
            window.ymin + window.height() / 2,
        );
        self.view.pointer_pressed(center);
        self.view.pointer_released(center);

        self.view.highlight(&[Selector::name("box"), Selector::name("caption")]);
        log::info!("View is now {:?}", self.view.state());
        let mut frame = Framebuffer::new(width, height, background);
        self.view.paint(&mut self.graph, &mut frame, SPIN_MS + 2 * FRAME_MS);
        self.save(&frame, "highlighted.png")?;
        self.view.stop();

        log::info!(
            "Wrote {} frames to {} ({} scene nodes left)",
            frame_count + 1,
            self.output.display(),
            self.graph.len()
        );
        Ok(())
    }

    fn save(&self, frame: &Framebuffer, file: &str) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.output.join(file);
        frame.save_png(&path)?;
        log::debug!("Saved {}", path.display());
        Ok(())
    }
}

fn load_params(path: Option<&Path>) -> Result<RendererParams, ConfigError> {
    match path {
        Some(path) => {
            log::info!("Loading renderer parameters from {}", path.display());
            RendererParams::load(path)
        }
        None => Ok(RendererParams::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    log::info!("Starting box demo");

    let mut args = std::env::args().skip(1);
    let params_path = args.next().map(PathBuf::from);
    let output = args.next().map_or_else(|| PathBuf::from("frames"), PathBuf::from);

    let params = load_params(params_path.as_deref())?;
    let mut app = BoxDemoApp::new(params, output)?;

    match app.run() {
        Ok(()) => {
            log::info!("Box demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Box demo failed: {e}");
            Err(e)
        }
    }
}
