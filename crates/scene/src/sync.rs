use glam::Vec4;
use reveal_common::{Viewport, ViewportError};
use reveal_scroll::{SmoothScroll, ScrollStats};
use reveal_timeline::{Channel, Timeline};

use crate::binding::{Decoration, ImageBinding};
use crate::camera::PixelCamera;
use crate::config::{ConfigError, RevealConfig, SceneConfig};
use crate::frame::{CameraView, FrameView, PlaneDraw};
use crate::layout::ElementSource;
use crate::uniforms::SharedUniforms;

/// Errors from building or resizing the scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Viewport(#[from] ViewportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no elements to track")]
    EmptyGallery,
    #[error("element {0} could not be measured")]
    MissingElement(usize),
}

/// Build the four overlapping corner tweens.
pub fn reveal_timeline(config: &RevealConfig) -> Timeline {
    let mut timeline = Timeline::new(Vec4::ZERO).with_ease(config.ease);
    for (i, channel) in Channel::ALL.into_iter().enumerate() {
        let position = if i == 0 {
            None
        } else {
            Some(config.stagger * i as f32)
        };
        timeline = timeline.to(channel, 1.0, config.duration, position);
    }
    timeline
}

/// Owns the bindings, camera, scroll model and reveal timeline, and keeps
/// them consistent frame to frame.
///
/// Build with [`SceneSync::new`], drive with [`SceneSync::tick`] (usually
/// through a [`crate::FrameLoop`]), call [`SceneSync::resize`] when the
/// viewport changes and [`SceneSync::shutdown`] when done.
#[derive(Debug)]
pub struct SceneSync<S: ElementSource> {
    config: SceneConfig,
    source: S,
    viewport: Viewport,
    camera: PixelCamera,
    scroll: SmoothScroll,
    timeline: Timeline,
    progress: f32,
    time: f32,
    frame: u64,
    shared: SharedUniforms,
    bindings: Vec<ImageBinding>,
    decoration: Option<Decoration>,
}

impl<S: ElementSource> SceneSync<S> {
    /// Measure every element of `source` and bind a plane to it.
    pub fn new(config: SceneConfig, source: S, viewport: Viewport) -> Result<Self, SceneError> {
        let _span = tracing::info_span!("scene_init").entered();
        config.validate()?;
        let viewport = Viewport::new(viewport.width, viewport.height)?;
        if source.is_empty() {
            return Err(SceneError::EmptyGallery);
        }

        let bindings = (0..source.len())
            .map(|i| {
                source
                    .client_rect(i, viewport, 0.0)
                    .map(|rect| ImageBinding::new(i, rect, 0.0))
                    .ok_or(SceneError::MissingElement(i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let decoration = config
            .decoration
            .enabled
            .then(|| Decoration::new(&config.decoration));

        let mut scene = Self {
            camera: PixelCamera::new(&config.camera),
            scroll: SmoothScroll::new(config.scroll),
            timeline: reveal_timeline(&config.reveal),
            config,
            source,
            viewport,
            progress: 0.0,
            time: 0.0,
            frame: 0,
            shared: SharedUniforms::default(),
            bindings,
            decoration,
        };
        scene.resize(viewport)?;

        tracing::info!(
            bindings = scene.bindings.len(),
            width = viewport.width,
            height = viewport.height,
            "scene initialized"
        );
        Ok(scene)
    }

    /// Advance one frame: time, scroll, plane positions, reveal, decoration.
    pub fn tick(&mut self) {
        let _span = tracing::trace_span!("scene_tick", frame = self.frame).entered();

        self.frame += 1;
        self.time += self.config.time_step;
        self.shared.time = self.time;

        self.scroll.update();
        self.place_planes();

        self.shared.corners = self.timeline.seek_progress(self.progress);
        self.shared.progress = self.progress;

        if let Some(decoration) = &mut self.decoration {
            decoration.spin(self.time);
        }
    }

    /// Refit camera and uniforms to a new viewport and re-measure every element.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SceneError> {
        let _span = tracing::debug_span!("scene_resize").entered();
        let viewport = Viewport::new(viewport.width, viewport.height)?;

        // Measure everything before committing, so a failure leaves the scene as it was.
        let scroll = self.scroll.current();
        let clients = self
            .bindings
            .iter()
            .map(|binding| {
                let element = binding.element();
                self.source
                    .client_rect(element, viewport, scroll)
                    .ok_or(SceneError::MissingElement(element))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.viewport = viewport;
        self.scroll.set_limit(self.source.scroll_extent(viewport));
        self.camera.fit(viewport);
        self.shared.resolution = viewport.size();

        for (binding, client) in self.bindings.iter_mut().zip(clients) {
            binding.remeasure(client, scroll);
        }
        self.place_planes();

        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            fov = self.camera.fov_degrees(),
            scroll_limit = self.scroll.limit(),
            "scene resized"
        );
        Ok(())
    }

    fn place_planes(&mut self) {
        let scroll = self.scroll.current();
        let viewport = self.viewport;
        for binding in &mut self.bindings {
            binding.place(scroll, viewport);
        }
    }

    /// Set the reveal progress. Clamped to `[0, 1]`; applied on the next tick.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Move the scroll target by an input delta.
    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll.scroll_by(delta);
    }

    /// Ease toward an absolute scroll offset.
    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll.scroll_to(offset);
    }

    /// Set the scroll offset immediately and re-place the planes.
    pub fn jump_to(&mut self, offset: f32) {
        self.scroll.jump_to(offset);
        self.place_planes();
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.current()
    }

    pub fn scroll_target(&self) -> f32 {
        self.scroll.target()
    }

    pub fn scroll_limit(&self) -> f32 {
        self.scroll.limit()
    }

    pub fn scroll_stats(&self) -> &ScrollStats {
        self.scroll.stats()
    }

    pub fn bindings(&self) -> &[ImageBinding] {
        &self.bindings
    }

    pub fn decoration(&self) -> Option<&Decoration> {
        self.decoration.as_ref()
    }

    pub fn camera(&self) -> &PixelCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn shared(&self) -> &SharedUniforms {
        &self.shared
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Accumulated time.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of ticks so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Snapshot for the renderer: camera, shared uniforms and one draw per plane.
    pub fn frame_view(&self) -> FrameView {
        let mut planes: Vec<PlaneDraw> = self
            .bindings
            .iter()
            .map(|b| PlaneDraw {
                element: Some(b.element()),
                model: b.transform().matrix(),
                uniforms: *b.uniforms(),
            })
            .collect();
        if let Some(decoration) = &self.decoration {
            planes.push(PlaneDraw {
                element: None,
                model: decoration.transform().matrix(),
                uniforms: *decoration.uniforms(),
            });
        }

        FrameView {
            frame: self.frame,
            camera: CameraView {
                view_proj: self.camera.view_projection(),
                position: self.camera.position(),
                fov_degrees: self.camera.fov_degrees(),
                aspect: self.camera.aspect(),
            },
            shared: self.shared,
            planes,
        }
    }

    /// Tear the scene down. Returns the number of frames ticked.
    pub fn shutdown(self) -> u64 {
        tracing::info!(
            frames = self.frame,
            bindings = self.bindings.len(),
            "scene shut down"
        );
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FixedElements, GalleryLayout};
    use glam::{Vec2, Vec3};
    use reveal_common::Rect;

    fn viewport(w: f32, h: f32) -> Viewport {
        Viewport::new(w, h).unwrap()
    }

    fn example_scene() -> SceneSync<FixedElements> {
        let source = FixedElements::new(vec![
            Rect::new(100.0, 50.0, 200.0, 80.0),
            Rect::new(20.0, 600.0, 300.0, 200.0),
            Rect::new(300.0, 1200.0, 400.0, 250.0),
        ]);
        SceneSync::new(SceneConfig::default(), source, viewport(800.0, 600.0)).unwrap()
    }

    #[test]
    fn plane_overlays_its_element() {
        let mut scene = example_scene();
        scene.tick();
        let t = scene.bindings()[0].transform();
        assert_eq!(t.position.x, -250.0);
        assert_eq!(t.position.y, 160.0);
        assert_eq!(t.scale, Vec3::new(200.0, 80.0, 1.0));
    }

    #[test]
    fn scroll_shifts_x_only() {
        let mut scene = example_scene();
        scene.tick();
        let before: Vec<Vec3> = scene
            .bindings()
            .iter()
            .map(|b| b.transform().position)
            .collect();

        scene.jump_to(120.0);
        scene.tick();
        for (binding, old) in scene.bindings().iter().zip(&before) {
            let new = binding.transform().position;
            assert_eq!(new.x, old.x - 120.0);
            assert_eq!(new.y, old.y);
        }
    }

    #[test]
    fn scroll_eases_between_ticks() {
        let mut scene = example_scene();
        scene.scroll_by(200.0);
        assert_eq!(scene.scroll_target(), 200.0);
        scene.tick();
        assert!(scene.scroll_offset() > 0.0 && scene.scroll_offset() < 200.0);
    }

    #[test]
    fn nan_scroll_keeps_planes_finite() {
        let mut scene = example_scene();
        scene.scroll_by(f32::NAN);
        scene.tick();
        scene.scroll_by(100.0);
        for _ in 0..200 {
            scene.tick();
        }
        assert!(scene.scroll_offset().is_finite());
        assert!((scene.scroll_offset() - 100.0).abs() < 1e-3);
        assert!(scene.bindings()[0].transform().position.x.is_finite());
    }

    #[test]
    fn resize_is_idempotent() {
        let mut scene = example_scene();
        scene.jump_to(50.0);
        scene.tick();

        scene.resize(viewport(1024.0, 768.0)).unwrap();
        let camera = *scene.camera();
        let shared = *scene.shared();
        let bindings = scene.bindings().to_vec();

        scene.resize(viewport(1024.0, 768.0)).unwrap();
        assert_eq!(*scene.camera(), camera);
        assert_eq!(*scene.shared(), shared);
        assert_eq!(scene.bindings(), bindings.as_slice());
    }

    #[test]
    fn resize_keeps_document_left_while_scrolled() {
        let mut scene = example_scene();
        scene.jump_to(100.0);
        scene.resize(viewport(800.0, 600.0)).unwrap();
        assert_eq!(scene.bindings()[1].bounds().left, 600.0);
    }

    #[test]
    fn resize_updates_camera_and_resolution() {
        let mut scene = example_scene();
        scene.resize(viewport(1600.0, 1200.0)).unwrap();
        assert!((scene.camera().fov_degrees() - 90.0).abs() < 1e-4);
        assert_eq!(scene.shared().resolution, Vec2::new(1600.0, 1200.0));
    }

    #[test]
    fn resize_rejects_zero_viewport() {
        let mut scene = example_scene();
        let bad = Viewport {
            width: 800.0,
            height: 0.0,
        };
        assert!(matches!(scene.resize(bad), Err(SceneError::Viewport(_))));
        assert_eq!(scene.viewport(), viewport(800.0, 600.0));
    }

    /// Loses its second element once the viewport is wider than 1000px.
    struct FlakySource;

    impl ElementSource for FlakySource {
        fn len(&self) -> usize {
            2
        }

        fn client_rect(&self, index: usize, viewport: Viewport, scroll: f32) -> Option<Rect> {
            if index == 1 && viewport.width > 1000.0 {
                return None;
            }
            let left = index as f32 * 400.0 - scroll;
            Some(Rect::new(100.0, left, 200.0, 80.0))
        }

        fn scroll_extent(&self, viewport: Viewport) -> f32 {
            (1200.0 - viewport.width).max(0.0)
        }
    }

    #[test]
    fn failed_resize_leaves_scene_untouched() {
        let mut scene =
            SceneSync::new(SceneConfig::default(), FlakySource, viewport(800.0, 600.0)).unwrap();
        scene.tick();
        let camera = *scene.camera();
        let shared = *scene.shared();
        let bindings = scene.bindings().to_vec();
        let limit = scene.scroll_limit();

        assert!(matches!(
            scene.resize(viewport(1600.0, 900.0)),
            Err(SceneError::MissingElement(1))
        ));
        assert_eq!(scene.viewport(), viewport(800.0, 600.0));
        assert_eq!(*scene.camera(), camera);
        assert_eq!(*scene.shared(), shared);
        assert_eq!(scene.bindings(), bindings.as_slice());
        assert_eq!(scene.scroll_limit(), limit);
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = SceneSync::new(
            SceneConfig::default(),
            FixedElements::default(),
            viewport(800.0, 600.0),
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::EmptyGallery));
    }

    #[test]
    fn time_accumulates_by_fixed_step() {
        let mut scene = example_scene();
        for _ in 0..10 {
            scene.tick();
        }
        assert_eq!(scene.frame(), 10);
        assert!((scene.time() - 0.5).abs() < 1e-5);
        assert_eq!(scene.shared().time, scene.time());
    }

    #[test]
    fn progress_drives_corners() {
        let mut scene = example_scene();
        scene.tick();
        assert_eq!(scene.shared().corners, Vec4::ZERO);

        scene.set_progress(1.0);
        scene.tick();
        assert!((scene.shared().corners - Vec4::ONE).abs().max_element() < 1e-5);

        scene.set_progress(0.5);
        scene.tick();
        let c = scene.shared().corners;
        assert!((c - Vec4::new(0.65, 0.55, 0.45, 0.35)).abs().max_element() < 1e-5);
        assert_eq!(scene.shared().progress, 0.5);
    }

    #[test]
    fn progress_is_clamped() {
        let mut scene = example_scene();
        scene.set_progress(3.0);
        assert_eq!(scene.progress(), 1.0);
        scene.set_progress(-1.0);
        assert_eq!(scene.progress(), 0.0);
    }

    #[test]
    fn decoration_is_optional() {
        let scene = example_scene();
        assert!(scene.decoration().is_none());
        assert_eq!(scene.frame_view().planes.len(), 3);

        let mut config = SceneConfig::default();
        config.decoration.enabled = true;
        let source = GalleryLayout::new(config.gallery, vec![1.0, 1.5]);
        let mut scene = SceneSync::new(config, source, viewport(800.0, 600.0)).unwrap();
        scene.tick();
        let view = scene.frame_view();
        assert_eq!(view.planes.len(), 3);
        assert_eq!(view.bound_planes().count(), 2);
        assert!(view.planes[2].element.is_none());
    }

    #[test]
    fn frame_view_mirrors_bindings() {
        let mut scene = example_scene();
        scene.tick();
        let view = scene.frame_view();
        assert_eq!(view.frame, 1);
        for (plane, binding) in view.planes.iter().zip(scene.bindings()) {
            assert_eq!(plane.element, Some(binding.element()));
            assert_eq!(plane.model, binding.transform().matrix());
            assert_eq!(plane.uniforms, *binding.uniforms());
        }
    }

    #[test]
    fn scroll_limit_follows_source() {
        let scene = example_scene();
        // rightmost edge 1600, viewport 800
        assert_eq!(scene.scroll_limit(), 800.0);
    }

    #[test]
    fn shutdown_reports_frames() {
        let mut scene = example_scene();
        scene.tick();
        scene.tick();
        assert_eq!(scene.shutdown(), 2);
    }
}
