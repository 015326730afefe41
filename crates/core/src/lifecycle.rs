//! Guarded-once context initialization per surface.
//!
//! Each surface moves through `Uninitialized -> Ready` on success or
//! `Uninitialized -> Failed` on error. `Failed` is terminal: the recorded
//! error is returned again without touching the host. Initializing a
//! `Ready` surface a second time is refused with
//! `InitError::AlreadyInitialized`.

use crate::backend::SurfaceHost;
use crate::config::ViewerConfig;
use crate::context::Context;
use crate::error::InitError;
use crate::shader::ShaderSources;
use std::collections::HashMap;

/// Lifecycle state of one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceState {
    Uninitialized,
    Ready,
    Failed(InitError),
}

impl SurfaceState {
    /// Lowercase name of the state, for logs and host bindings.
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceState::Uninitialized => "uninitialized",
            SurfaceState::Ready => "ready",
            SurfaceState::Failed(_) => "failed",
        }
    }
}

/// Creates contexts for the surfaces of a host, at most once per surface.
pub struct Initializer<H: SurfaceHost> {
    host: H,
    config: ViewerConfig,
    shaders: ShaderSources,
    states: HashMap<String, SurfaceState>,
}

impl<H: SurfaceHost> Initializer<H> {
    /// Creates an initializer with the default config and the fixed shaders.
    pub fn new(host: H) -> Self {
        Self::with_config(host, ViewerConfig::default())
    }

    /// Creates an initializer whose contexts use `config`.
    pub fn with_config(host: H, config: ViewerConfig) -> Self {
        Self {
            host,
            config,
            shaders: ShaderSources::default(),
            states: HashMap::new(),
        }
    }

    /// Replaces the shader pair contexts are built from.
    pub fn with_shaders(mut self, shaders: ShaderSources) -> Self {
        self.shaders = shaders;
        self
    }

    /// The host surfaces are resolved against.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The config applied by [`Initializer::initialize`].
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Current state of `surface_id`.
    pub fn state(&self, surface_id: &str) -> SurfaceState {
        self.states
            .get(surface_id)
            .cloned()
            .unwrap_or(SurfaceState::Uninitialized)
    }

    /// Initializes `surface_id` with the initializer's config.
    pub fn initialize(&mut self, surface_id: &str) -> Result<Context<H::Backend>, InitError> {
        self.initialize_with_config(surface_id, self.config)
    }

    /// Initializes `surface_id` with an explicit config.
    ///
    /// # Errors
    ///
    /// - `InitError::AlreadyInitialized` if the surface is `Ready`.
    /// - The recorded error if the surface is `Failed`.
    /// - `InitError::SurfaceNotFound` for an empty or unknown identifier.
    /// - Any shader or context creation error from the backend.
    pub fn initialize_with_config(
        &mut self,
        surface_id: &str,
        config: ViewerConfig,
    ) -> Result<Context<H::Backend>, InitError> {
        match self.state(surface_id) {
            SurfaceState::Ready => {
                return Err(InitError::AlreadyInitialized(surface_id.to_owned()));
            }
            SurfaceState::Failed(e) => return Err(e),
            SurfaceState::Uninitialized => {}
        }

        let result = if surface_id.is_empty() {
            Err(InitError::SurfaceNotFound(surface_id.to_owned()))
        } else {
            self.host
                .create_backend(surface_id)
                .and_then(|backend| Context::create(surface_id, backend, &self.shaders, config))
        };

        let state = match &result {
            Ok(_) => {
                log::info!("initialized surface '{surface_id}'");
                SurfaceState::Ready
            }
            Err(e) => {
                log::warn!("failed to initialize surface '{surface_id}': {e}");
                SurfaceState::Failed(e.clone())
            }
        };
        self.states.insert(surface_id.to_owned(), state);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, DrawCall};
    use crate::color::{Rgba, GREEN, RED};
    use crate::context::draw_triangle;
    use crate::error::RenderError;
    use crate::shader::{ShaderError, ShaderStage};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Shared bookkeeping so tests can inspect a backend after the
    /// context that owns it is gone.
    #[derive(Default)]
    struct Ledger {
        backends: Cell<usize>,
        live_objects: Cell<isize>,
        draws: RefCell<Vec<Rgba>>,
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Fault {
        None,
        Compile,
        NoUniform,
        Upload,
        Draw,
    }

    struct MockBackend {
        ledger: Rc<Ledger>,
        fault: Fault,
    }

    impl MockBackend {
        fn alloc(&self) {
            self.ledger.live_objects.set(self.ledger.live_objects.get() + 1);
        }

        fn free(&self) {
            self.ledger.live_objects.set(self.ledger.live_objects.get() - 1);
        }
    }

    impl Backend for MockBackend {
        type Program = u32;
        type Geometry = u32;
        type ColorSlot = ();

        fn surface_size(&self) -> (u32, u32) {
            (4, 4)
        }

        fn compile_program(&self, _sources: &ShaderSources) -> Result<u32, ShaderError> {
            if self.fault == Fault::Compile {
                return Err(ShaderError::CompileError {
                    stage: ShaderStage::Fragment,
                    log: "syntax error".into(),
                });
            }
            self.alloc();
            Ok(1)
        }

        fn delete_program(&self, _program: u32) {
            self.free();
        }

        fn upload_geometry(&self, _program: u32, vertices: &[f32]) -> Result<u32, String> {
            if self.fault == Fault::Upload {
                return Err("out of memory".into());
            }
            assert_eq!(vertices.len(), 9);
            self.alloc();
            Ok(2)
        }

        fn delete_geometry(&self, _geometry: u32) {
            self.free();
        }

        fn color_slot(&self, _program: u32) -> Option<()> {
            (self.fault != Fault::NoUniform).then_some(())
        }

        fn draw(&self, call: DrawCall<'_, Self>) -> Result<(), RenderError> {
            if self.fault == Fault::Draw {
                return Err(RenderError::ContextLost);
            }
            assert_eq!(call.vertex_count, 3);
            self.ledger.draws.borrow_mut().push(call.color);
            Ok(())
        }
    }

    struct MockHost {
        surfaces: Vec<&'static str>,
        fault: Fault,
        ledger: Rc<Ledger>,
    }

    impl MockHost {
        fn new(surfaces: &[&'static str], fault: Fault) -> Self {
            Self {
                surfaces: surfaces.to_vec(),
                fault,
                ledger: Rc::default(),
            }
        }
    }

    impl SurfaceHost for MockHost {
        type Backend = MockBackend;

        fn create_backend(&self, surface_id: &str) -> Result<MockBackend, InitError> {
            if !self.surfaces.iter().any(|s| *s == surface_id) {
                return Err(InitError::SurfaceNotFound(surface_id.to_owned()));
            }
            self.ledger.backends.set(self.ledger.backends.get() + 1);
            Ok(MockBackend {
                ledger: Rc::clone(&self.ledger),
                fault: self.fault,
            })
        }
    }

    #[test]
    fn surfaces_start_uninitialized() {
        let init = Initializer::new(MockHost::new(&["triangle"], Fault::None));
        assert_eq!(init.state("triangle"), SurfaceState::Uninitialized);
        assert_eq!(init.state("triangle").name(), "uninitialized");
    }

    #[test]
    fn state_names_are_lowercase() {
        assert_eq!(SurfaceState::Ready.name(), "ready");
        let failed = SurfaceState::Failed(InitError::SurfaceNotFound("x".into()));
        assert_eq!(failed.name(), "failed");
    }

    #[test]
    fn initialize_succeeds_once_and_marks_ready() {
        let mut init = Initializer::new(MockHost::new(&["triangle"], Fault::None));
        let ctx = init.initialize("triangle").unwrap();
        assert_eq!(ctx.surface_id(), "triangle");
        assert_eq!(init.state("triangle"), SurfaceState::Ready);

        let again = init.initialize("triangle");
        assert!(matches!(again, Err(InitError::AlreadyInitialized(ref id)) if id == "triangle"));
        assert_eq!(init.host().ledger.backends.get(), 1);
    }

    #[test]
    fn unknown_surface_is_not_found_and_allocates_nothing() {
        let mut init = Initializer::new(MockHost::new(&["triangle"], Fault::None));
        let result = init.initialize("missing-canvas");
        assert!(matches!(result, Err(InitError::SurfaceNotFound(ref id)) if id == "missing-canvas"));
        assert_eq!(init.host().ledger.backends.get(), 0);
        assert_eq!(init.host().ledger.live_objects.get(), 0);
    }

    #[test]
    fn empty_identifier_is_not_found_without_asking_host() {
        let mut init = Initializer::new(MockHost::new(&[""], Fault::None));
        assert!(matches!(
            init.initialize(""),
            Err(InitError::SurfaceNotFound(_))
        ));
        assert_eq!(init.host().ledger.backends.get(), 0);
    }

    #[test]
    fn failed_state_is_terminal_and_does_not_retry() {
        let mut init = Initializer::new(MockHost::new(&["triangle"], Fault::Compile));
        let first = init.initialize("triangle").err().unwrap();
        assert!(matches!(first, InitError::ShaderCompileError { .. }));
        assert_eq!(init.state("triangle"), SurfaceState::Failed(first.clone()));

        let second = init.initialize("triangle").err().unwrap();
        assert_eq!(first, second);
        assert_eq!(init.host().ledger.backends.get(), 1);
    }

    #[test]
    fn missing_uniform_releases_program() {
        let mut init = Initializer::new(MockHost::new(&["triangle"], Fault::NoUniform));
        let err = init.initialize("triangle").err().unwrap();
        assert!(matches!(err, InitError::ContextCreationError(ref msg) if msg.contains("u_color")));
        assert_eq!(init.host().ledger.live_objects.get(), 0);
    }

    #[test]
    fn failed_upload_releases_program() {
        let mut init = Initializer::new(MockHost::new(&["triangle"], Fault::Upload));
        let err = init.initialize("triangle").err().unwrap();
        assert!(matches!(err, InitError::ContextCreationError(ref msg) if msg.contains("out of memory")));
        assert_eq!(init.host().ledger.live_objects.get(), 0);
    }

    #[test]
    fn surfaces_are_tracked_independently() {
        let mut init = Initializer::new(MockHost::new(&["left", "right"], Fault::None));
        let _left = init.initialize("left").unwrap();
        assert_eq!(init.state("right"), SurfaceState::Uninitialized);
        let _right = init.initialize("right").unwrap();
        assert_eq!(init.state("right"), SurfaceState::Ready);
    }

    #[test]
    fn draws_pass_colors_through_unclamped() {
        let mut init = Initializer::new(MockHost::new(&["triangle"], Fault::None));
        let ctx = init.initialize("triangle").unwrap();
        draw_triangle(&ctx, RED).unwrap();
        draw_triangle(&ctx, [1.5, -0.25, 0.0, 2.0]).unwrap();
        draw_triangle(&ctx, GREEN).unwrap();

        let draws = init.host().ledger.draws.borrow();
        assert_eq!(*draws, vec![RED, [1.5, -0.25, 0.0, 2.0], GREEN]);
    }

    #[test]
    fn draw_errors_surface_and_context_stays_usable() {
        let mut init = Initializer::new(MockHost::new(&["triangle"], Fault::Draw));
        let ctx = init.initialize("triangle").unwrap();
        assert_eq!(draw_triangle(&ctx, RED), Err(RenderError::ContextLost));
        assert_eq!(draw_triangle(&ctx, RED), Err(RenderError::ContextLost));
        assert_eq!(init.state("triangle"), SurfaceState::Ready);
    }

    #[test]
    fn into_backend_releases_context_objects() {
        let mut init = Initializer::new(MockHost::new(&["triangle"], Fault::None));
        let ctx = init.initialize("triangle").unwrap();
        assert_eq!(init.host().ledger.live_objects.get(), 2);
        let _backend = ctx.into_backend();
        assert_eq!(init.host().ledger.live_objects.get(), 0);
    }

    #[test]
    fn explicit_config_reaches_the_context() {
        let mut init = Initializer::new(MockHost::new(&["triangle"], Fault::None));
        let config = ViewerConfig {
            initial_color: GREEN,
            ..ViewerConfig::default()
        };
        let ctx = init.initialize_with_config("triangle", config).unwrap();
        assert_eq!(ctx.default_color(), GREEN);
        assert_eq!(init.config().initial_color, RED);
    }
}
