//! Software render pipeline
//!
//! Scene graphs are rendered in two steps. A [`DisplayListBuilder`] walks
//! the scene and fills a [`DisplayList`] with projected, shaded primitives;
//! the display list then draws itself onto a [`Surface`] and answers pick
//! queries. [`Renderer`] ties the two together and [`SceneView`] adds the
//! paint and pointer protocol of an interactive view.
//!
//! ## Pipeline
//!
//! ```text
//! model ─► matrix stack ─► look-at ─► perspective (w' = w + z/d)
//!       ─► window mapping ─► backface cull ─► shade ─► fog ─► display list
//! ```

mod builder;
mod display_list;
mod error;
mod layer;
mod matrix_stack;
mod params;
mod primitive;
mod renderer;
mod surface;
mod view;

pub use builder::{DisplayListBuilder, MAX_VERTICES};
pub use display_list::DisplayList;
pub use error::{DisplayError, ErrorHandler, LogErrorHandler, RenderError};
pub use layer::DisplayListLayer;
pub use matrix_stack::MatrixStack;
pub use params::RendererParams;
pub use primitive::{DisplayElement, PickInfo, Polygon, Primitive, Text};
pub use renderer::Renderer;
pub use surface::{DrawCommand, Framebuffer, RecordingSurface, Surface};
pub use view::{SceneView, SceneViewEvent, SceneViewListener, ViewState};
