use reveal_common::Rect;
use reveal_scene::{ElementSource, SceneSync};

/// Read-only queries against a running scene.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary<S: ElementSource>(scene: &SceneSync<S>) -> SceneSummary {
        let viewport = scene.viewport();
        SceneSummary {
            frame: scene.frame(),
            time: scene.time(),
            bindings: scene.bindings().len(),
            decoration: scene.decoration().is_some(),
            viewport: [viewport.width, viewport.height],
            fov_degrees: scene.camera().fov_degrees(),
            scroll: scene.scroll_offset(),
            scroll_target: scene.scroll_target(),
            scroll_limit: scene.scroll_limit(),
            progress: scene.progress(),
            corners: scene.shared().corners.to_array(),
        }
    }

    /// Details of binding `index`, if it exists.
    pub fn inspect_binding<S: ElementSource>(
        scene: &SceneSync<S>,
        index: usize,
    ) -> Option<BindingInfo> {
        scene.bindings().get(index).map(|binding| {
            let t = binding.transform();
            let u = binding.uniforms();
            BindingInfo {
                element: binding.element(),
                bounds: binding.bounds(),
                position: t.position.to_array(),
                scale: t.scale.to_array(),
                quad_size: u.quad_size.to_array(),
                texture_size: u.texture_size.to_array(),
            }
        })
    }

    /// Indices of the bindings whose plane currently intersects the viewport.
    pub fn visible_bindings<S: ElementSource>(scene: &SceneSync<S>) -> Vec<usize> {
        let half_w = scene.viewport().width / 2.0;
        scene
            .bindings()
            .iter()
            .enumerate()
            .filter(|(_, b)| {
                let x = b.transform().position.x;
                let w = b.transform().scale.x / 2.0;
                x + w > -half_w && x - w < half_w
            })
            .map(|(i, _)| i)
            .collect()
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub frame: u64,
    pub time: f32,
    pub bindings: usize,
    pub decoration: bool,
    pub viewport: [f32; 2],
    pub fov_degrees: f32,
    pub scroll: f32,
    pub scroll_target: f32,
    pub scroll_limit: f32,
    pub progress: f32,
    pub corners: [f32; 4],
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: frame={} time={:.2} bindings={} viewport={}x{} fov={:.2} scroll={:.1}/{:.1} progress={:.3}",
            self.frame,
            self.time,
            self.bindings,
            self.viewport[0],
            self.viewport[1],
            self.fov_degrees,
            self.scroll,
            self.scroll_limit,
            self.progress,
        )
    }
}

/// Detailed info about a single image binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingInfo {
    pub element: usize,
    pub bounds: Rect,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub quad_size: [f32; 2],
    pub texture_size: [f32; 2],
}

impl std::fmt::Display for BindingInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Binding [{}] pos=({:.1}, {:.1}) size={}x{} bounds=(top {}, left {})",
            self.element,
            self.position[0],
            self.position[1],
            self.scale[0],
            self.scale[1],
            self.bounds.top,
            self.bounds.left,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_common::Viewport;
    use reveal_scene::{FixedElements, SceneConfig};

    fn scene() -> SceneSync<FixedElements> {
        let source = FixedElements::new(vec![
            Rect::new(100.0, 50.0, 200.0, 80.0),
            Rect::new(100.0, 2000.0, 200.0, 80.0),
        ]);
        SceneSync::new(
            SceneConfig::default(),
            source,
            Viewport::new(800.0, 600.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn summary_fresh_scene() {
        let s = scene();
        let summary = SceneInspector::summary(&s);
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.bindings, 2);
        assert!(!summary.decoration);
        assert_eq!(summary.viewport, [800.0, 600.0]);
        assert_eq!(summary.scroll_limit, 1400.0);
    }

    #[test]
    fn summary_tracks_ticks() {
        let mut s = scene();
        s.set_progress(1.0);
        s.tick();
        let summary = SceneInspector::summary(&s);
        assert_eq!(summary.frame, 1);
        assert_eq!(summary.progress, 1.0);
        assert!(summary.corners.iter().all(|c| (c - 1.0).abs() < 1e-5));
    }

    #[test]
    fn inspect_binding_found() {
        let mut s = scene();
        s.tick();
        let info = SceneInspector::inspect_binding(&s, 0).unwrap();
        assert_eq!(info.position[0], -250.0);
        assert_eq!(info.position[1], 160.0);
        assert_eq!(info.quad_size, [200.0, 80.0]);
    }

    #[test]
    fn inspect_binding_not_found() {
        let s = scene();
        assert!(SceneInspector::inspect_binding(&s, 7).is_none());
    }

    #[test]
    fn visible_follows_scroll() {
        let mut s = scene();
        s.tick();
        assert_eq!(SceneInspector::visible_bindings(&s), vec![0]);
        s.jump_to(1400.0);
        assert_eq!(SceneInspector::visible_bindings(&s), vec![1]);
    }

    #[test]
    fn summary_display() {
        let s = scene();
        let text = format!("{}", SceneInspector::summary(&s));
        assert!(text.contains("frame=0"));
        assert!(text.contains("bindings=2"));
    }
}
