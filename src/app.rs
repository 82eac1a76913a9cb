use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use log::{debug, error, info};

use std::ffi::CString;
use std::num::NonZeroU32;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, StartCause, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{PBError, Program, ProgramBuilder};
use gl_wrapper::renderer::{GlRenderer, PolygonMode, Viewport};
use gl_wrapper::{QUAD_INDICES, QUAD_VERTICES};

use crate::config::{Config as AppConfig, ConfigError, RenderConfig};
use crate::input::{CloseFlag, KeyState};
use crate::shaders::{ShaderFileError, ShaderSources};

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    gl_renderer: GlRenderer,
    quad: Option<QuadPass>,
    render: RenderConfig,
}

/// Everything the single draw call needs.
struct QuadPass {
    geometry: Geometry,
    program: Program,
}

impl App {
    pub fn new(config: &AppConfig, sources: &ShaderSources) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                config.window.width,
                config.window.height,
            )))
            .with_resizable(true)
            .with_title(&config.window.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                // find_configs errors out instead of yielding an empty list
                pick_config(configs, |c| c.num_samples())
                    .expect("display reported success without any config")
            })
            .map_err(AppError::Window)?;

        let window = window.ok_or(AppError::NoWindow)?;

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr) }
            .map_err(AppError::Context)?
            .make_current(&gl_window.surface)
            .map_err(AppError::Context)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        if !(gl::Viewport::is_loaded()
            && gl::DrawElements::is_loaded()
            && gl::CreateShader::is_loaded())
        {
            return Err(AppError::FunctionLoading);
        }

        if let Some(version) = gl_wrapper::version_string() {
            info!("OpenGL {version}");
        }

        let gl_renderer = GlRenderer::new();

        let size = gl_window.window.inner_size();
        if let Some(viewport) = Viewport::new(size.width, size.height) {
            gl_renderer.set_viewport(viewport);
        }

        let program = ProgramBuilder::new(&sources.vertex, &sources.fragment).build()?;

        let geometry = GeometryBuilder::new(&QUAD_VERTICES)
            .with_attribute(VertexAttribute::Vec3)
            .with_indices(&QUAD_INDICES)
            .build()?;

        debug!(
            "uploaded {} vertices, {} indices",
            geometry.vertices(),
            geometry.indices()
        );

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            gl_renderer,
            quad: Some(QuadPass { geometry, program }),
            render: config.render.clone(),
        })
    }

    pub fn run(self) -> ! {
        let App {
            event_loop,
            gl_context,
            gl_window,
            mut gl_renderer,
            mut quad,
            render,
        } = self;

        let mut keys = KeyState::default();
        let mut close = CloseFlag::default();

        let mode = if render.wireframe {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        };
        let [r, g, b, a] = render.clear_color;

        event_loop.run(move |event, _window_target, control_flow| match event {
            Event::NewEvents(StartCause::Init) => control_flow.set_poll(),
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) => {
                    if let (Some(width), Some(height), Some(viewport)) = (
                        NonZeroU32::new(size.width),
                        NonZeroU32::new(size.height),
                        Viewport::new(size.width, size.height),
                    ) {
                        gl_window.surface.resize(&gl_context, width, height);
                        gl_renderer.set_viewport(viewport);
                        debug!("viewport resized to {}x{}", width, height);
                    }
                }
                WindowEvent::KeyboardInput { input, .. } => {
                    keys.handle_key(input.virtual_keycode, input.state)
                }
                WindowEvent::CloseRequested => {
                    info!("close requested by window system");
                    close.request_close();
                }
                _ => (),
            },
            Event::MainEventsCleared => {
                close.process_input(&keys);

                gl_renderer.clear_color(r, g, b, a);
                gl_renderer.polygon_mode(mode);

                if let Some(quad) = &quad {
                    gl_renderer.draw(&quad.geometry, &quad.program);
                }

                if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                    error!("Could not swap buffers: {e}");
                    control_flow.set_exit_with_code(-1);
                    return;
                }

                if close.is_set() {
                    control_flow.set_exit();
                }
            }
            Event::LoopDestroyed => {
                // context is still current, release GL objects before it goes away
                quad.take();
                info!("shutting down");
            }
            _ => (),
        })
    }
}

/// Most multisample samples wins, the first offered config breaks ties.
fn pick_config<C>(configs: impl Iterator<Item = C>, samples: impl Fn(&C) -> u8) -> Option<C> {
    configs.reduce(|best, next| {
        if samples(&next) > samples(&best) {
            next
        } else {
            best
        }
    })
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(AppError::ZeroSizedWindow)?,
            NonZeroU32::new(height).ok_or(AppError::ZeroSizedWindow)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs) }
            .map_err(AppError::Surface)?;

        Ok(Self { surface, window })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to create window: {0}")]
    Window(Box<dyn std::error::Error>),
    #[error("Failed to create window: display builder returned no window")]
    NoWindow,
    #[error("Failed to create window: window has zero size")]
    ZeroSizedWindow,
    #[error("Failed to create window surface: {0}")]
    Surface(#[source] glutin::error::Error),
    #[error("Failed to create OpenGL 3.3 core context: {0}")]
    Context(#[source] glutin::error::Error),
    #[error("Failed to load OpenGL functions")]
    FunctionLoading,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    ShaderFile(#[from] ShaderFileError),
    #[error("Failed to build shader program: {0}")]
    Program(#[from] PBError),
    #[error("Failed to upload quad: {0}")]
    Geometry(#[from] GBError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use gl_wrapper::program::ShaderStage;

    #[test]
    fn shader_errors_keep_driver_log() {
        let err = AppError::from(PBError::Compilation {
            stage: ShaderStage::Vertex,
            log: "0:2(1): error: syntax error, unexpected IDENTIFIER".to_string(),
        });

        let msg = err.to_string();
        assert!(msg.starts_with("Failed to build shader program: vertex shader compilation failed"));
        assert!(msg.contains("unexpected IDENTIFIER"));
    }

    #[test]
    fn picks_most_samples() {
        let configs = [(0, 0_u8), (1, 4), (2, 2), (3, 4)];

        let picked = pick_config(configs.into_iter(), |c| c.1);

        assert_eq!(picked, Some((1, 4)));
    }

    #[test]
    fn picks_first_without_multisampling() {
        let picked = pick_config([(7, 0_u8), (8, 0)].into_iter(), |c| c.1);

        assert_eq!(picked, Some((7, 0)));
    }

    #[test]
    fn empty_config_list() {
        let picked = pick_config(std::iter::empty::<(u32, u8)>(), |c| c.1);

        assert_eq!(picked, None);
    }

    #[test]
    fn config_errors_pass_through() {
        let err = AppError::from(ConfigError::ZeroSize {
            width: 0,
            height: 600,
        });

        assert_eq!(err.to_string(), "Window size 0x600 must not be zero");
    }
}
