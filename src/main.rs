use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use pbs_viewer::{GlowDevice, InputTranslator, Viewer, ViewerConfig, ViewerEvent};

/// Everything that only exists while the window and its context do.
struct GlState {
    viewer: Viewer<GlowDevice>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

struct App {
    config: ViewerConfig,
    translator: InputTranslator,
    state: Option<GlState>,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self { config, translator: InputTranslator::new(), state: None, failure: None }
    }

    fn create_gl_state(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<GlState> {
        let window_config = &self.config.window;
        let window = event_loop.create_window(
            Window::default_attributes()
                .with_title(window_config.title.clone())
                .with_inner_size(LogicalSize::new(window_config.width, window_config.height)),
        )?;

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (_, gl_config) = DisplayBuilder::new()
            .build(event_loop, template, |configs| {
                // glutin only calls the picker with a non-empty iterator.
                configs.max_by_key(|config| config.depth_size()).expect("no GL config offered")
            })
            .map_err(|e| anyhow!("no usable GL display: {}", e))?;

        let display = gl_config.display();
        let raw_handle = window.window_handle()?.as_raw();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_handle));
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes)? };

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            NonZeroU32::new(size.width.max(1)).context("zero width")?,
            NonZeroU32::new(size.height.max(1)).context("zero height")?,
        );
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes)? };
        let context = not_current.make_current(&surface)?;

        let gl = GlowDevice::from_loader_function(|symbol| match std::ffi::CString::new(symbol) {
            Ok(symbol) => display.get_proc_address(&symbol) as *const _,
            Err(_) => std::ptr::null(),
        });

        let mut viewer = Viewer::new(gl, self.config.clone());
        viewer.resize(size.width as i32, size.height as i32);
        viewer.initialize().context("viewer initialization failed")?;

        Ok(GlState { viewer, surface, context, window })
    }

    fn after_event(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };
        for event in state.viewer.drain_events() {
            match event {
                ViewerEvent::ModelLoaded { faces, vertices } => {
                    log::info!("model loaded: {} faces, {} vertices", faces, vertices);
                    state.window.set_title(&format!(
                        "{} ({} faces, {} vertices)",
                        self.config.window.title, faces, vertices
                    ));
                }
            }
        }
        if state.viewer.take_repaint_request() {
            state.window.request_redraw();
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.failure = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.create_gl_state(event_loop) {
            Ok(state) => {
                self.state = Some(state);
                self.after_event();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        let action = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                None
            }
            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                    state.surface.resize(&state.context, width, height);
                }
                state.viewer.resize(size.width as i32, size.height as i32);
                None
            }
            WindowEvent::RedrawRequested => {
                state.viewer.paint();
                if let Err(e) = state.surface.swap_buffers(&state.context) {
                    self.fail(event_loop, e.into());
                    return;
                }
                None
            }
            WindowEvent::MouseInput { state: button_state, button, .. } => {
                self.translator.process_mouse_button(button, button_state)
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.translator.process_cursor_moved(position.x, position.y)
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state == ElementState::Pressed
                {
                    event_loop.exit();
                }
                self.translator.process_key(event.physical_key, event.state)
            }
            _ => None,
        };

        if let (Some(action), Some(state)) = (action, &mut self.state) {
            state.viewer.handle_action(action);
        }
        self.after_event();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut state) = self.state.take() {
            state.viewer.cleanup();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ViewerConfig::load_or_default(config_path.as_deref()).context("cannot load config")?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
