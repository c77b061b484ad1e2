//! Tests for the widget system.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use hudkit_core::HudError;
    use hudkit_render::{
        Color, DrawCommand, Insets, Point, Rect, RecordingSurfaceFactory, ScreenConverter, Size,
    };
    use parking_lot::Mutex;

    use crate::config::UiConfig;
    use crate::widget::{
        Border, ControllerEvent, Hud, Key, KeyEvent, KeyboardModifiers, LayoutItem,
        LayoutManager, MouseButton, MouseEvent, PaintContext, PickReason, Positioned, Sizable,
        VecListModel, WidgetBuilder, WidgetContent, WidgetId,
    };

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records every hook it receives.
    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: log.clone(),
            }
        }

        fn push(&self, what: &str) {
            self.log.lock().push(format!("{}:{}", self.name, what));
        }
    }

    impl WidgetContent for Recorder {
        fn init_size(&mut self, _hud: &mut Hud, _id: WidgetId) -> crate::HudResult<()> {
            self.push("init_size");
            Ok(())
        }

        fn create_shape(&mut self, _hud: &mut Hud, _id: WidgetId) -> crate::HudResult<()> {
            self.push("create_shape");
            Ok(())
        }

        fn init(&mut self, _hud: &mut Hud, _id: WidgetId) -> crate::HudResult<()> {
            self.push("init");
            Ok(())
        }

        fn mouse_event(&mut self, _hud: &mut Hud, _id: WidgetId, event: &MouseEvent) -> crate::HudResult<()> {
            self.push(&format!("mouse {:?}", event.reason));
            Ok(())
        }

        fn key_event(&mut self, _hud: &mut Hud, _id: WidgetId, event: &KeyEvent) -> crate::HudResult<()> {
            match event {
                KeyEvent::Pressed { key, .. } => self.push(&format!("pressed {key:?}")),
                KeyEvent::Released { key, .. } => self.push(&format!("released {key:?}")),
                KeyEvent::Typed { character, .. } => self.push(&format!("typed {character}")),
            }
            Ok(())
        }

        fn controller_event(
            &mut self,
            _hud: &mut Hud,
            _id: WidgetId,
            event: &ControllerEvent,
        ) -> crate::HudResult<()> {
            if let ControllerEvent::ButtonPressed { button, .. } = event {
                self.push(&format!("button {button}"));
            }
            Ok(())
        }
    }

    /// Fills its whole rectangle.
    struct Swatch(Color);

    impl WidgetContent for Swatch {
        fn paint(&self, _hud: &Hud, _id: WidgetId, ctx: &mut PaintContext<'_>) {
            ctx.fill_rect(ctx.rect(), self.0);
        }
    }

    /// Stacks visible children top to bottom at full width.
    struct ColumnLayout;

    impl LayoutManager for ColumnLayout {
        fn layout(&mut self, content_size: Size, items: &[LayoutItem]) -> Vec<Rect> {
            let mut y = 0.0;
            items
                .iter()
                .map(|item| {
                    let rect = Rect::new(0.0, y, content_size.width, item.size.height);
                    if item.visible {
                        y += item.size.height;
                    }
                    rect
                })
                .collect()
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// A HUD whose surfaces redraw on every frame unless a test sets a cooldown.
    fn setup() -> (Hud, RecordingSurfaceFactory) {
        let surfaces = RecordingSurfaceFactory::new();
        let config = UiConfig {
            min_redraw_interval_ms: 0,
            ..UiConfig::default()
        };
        let hud = Hud::new(ScreenConverter::new(Size::new(800.0, 600.0)), surfaces.clone(), config);
        (hud, surfaces)
    }

    /// Frame times between `from` and `to` inclusive at which `host` redrew.
    fn redraw_times(hud: &mut Hud, host: WidgetId, from: u64, to: u64, step: u64) -> Vec<u64> {
        let mut times = Vec::new();
        let mut last = hud.redraw_scheduler(host).unwrap().last_redraw();
        for t in (from..=to).step_by(step as usize) {
            hud.render_frame(ms(t)).unwrap();
            let drawn = hud.redraw_scheduler(host).unwrap().last_redraw();
            if drawn != last {
                times.push(t);
                last = drawn;
            }
        }
        times
    }

    fn new_log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().clone()
    }

    /// An attached heavyweight container at the root.
    fn panel(hud: &mut Hud, name: &str, x: f32, y: f32, w: f32, h: f32) -> WidgetId {
        let id = hud.create_widget(
            WidgetBuilder::new(name)
                .heavyweight()
                .container()
                .location(x, y)
                .size(w, h),
        );
        hud.add_widget(hud.root(), id).unwrap();
        id
    }

    fn leaf(hud: &mut Hud, name: &str, x: f32, y: f32, w: f32, h: f32) -> WidgetId {
        hud.create_widget(WidgetBuilder::new(name).location(x, y).size(w, h))
    }

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    fn fill_colors(commands: &[DrawCommand]) -> Vec<Color> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    #[test]
    fn test_root_only_accepts_heavyweights() {
        let (mut hud, _) = setup();
        let light = leaf(&mut hud, "light", 0.0, 0.0, 10.0, 10.0);
        let err = hud.add_widget(hud.root(), light).unwrap_err();
        assert!(matches!(err, HudError::NoHeavyweightAncestor { .. }));
        assert!(!hud.is_attached(light));
        assert_eq!(hud.widget(light).unwrap().container(), None);
    }

    #[test]
    fn test_heavyweight_cannot_be_assembled() {
        let (mut hud, _) = setup();
        let owner = panel(&mut hud, "owner", 0.0, 0.0, 100.0, 100.0);
        let heavy = hud.create_widget(WidgetBuilder::new("heavy").heavyweight());
        let err = hud.assemble_widget(owner, heavy, Point::ZERO).unwrap_err();
        assert!(matches!(err, HudError::HeavyweightInAssembler { .. }));
    }

    #[test]
    fn test_child_cannot_have_two_parents() {
        let (mut hud, _) = setup();
        let a = panel(&mut hud, "a", 0.0, 0.0, 100.0, 100.0);
        let b = panel(&mut hud, "b", 200.0, 0.0, 100.0, 100.0);
        let child = leaf(&mut hud, "child", 0.0, 0.0, 10.0, 10.0);
        hud.add_widget(a, child).unwrap();

        let err = hud.add_widget(b, child).unwrap_err();
        assert!(matches!(err, HudError::AlreadyOwned { .. }));
        assert_eq!(hud.children(a).unwrap(), &[child]);
        assert!(hud.children(b).unwrap().is_empty());
    }

    #[test]
    fn test_cycles_are_rejected() {
        let (mut hud, _) = setup();
        let outer = hud.create_widget(WidgetBuilder::new("outer").container());
        let inner = hud.create_widget(WidgetBuilder::new("inner").container());
        hud.add_widget(outer, inner).unwrap();

        let err = hud.add_widget(inner, outer).unwrap_err();
        assert!(matches!(err, HudError::CircularHierarchy { .. }));
    }

    #[test]
    fn test_remove_requires_ownership() {
        let (mut hud, _) = setup();
        let a = panel(&mut hud, "a", 0.0, 0.0, 100.0, 100.0);
        let b = panel(&mut hud, "b", 0.0, 0.0, 100.0, 100.0);
        let child = leaf(&mut hud, "child", 0.0, 0.0, 10.0, 10.0);
        hud.add_widget(a, child).unwrap();

        let err = hud.remove_widget(b, child).unwrap_err();
        assert!(matches!(err, HudError::NotOwned { .. }));
        assert!(hud.is_attached(child));
    }

    #[test]
    fn test_non_container_operations_fail() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        let plain = leaf(&mut hud, "plain", 0.0, 0.0, 10.0, 10.0);
        hud.add_widget(host, plain).unwrap();

        let other = leaf(&mut hud, "other", 0.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            hud.add_widget(plain, other).unwrap_err(),
            HudError::NotAContainer { .. }
        ));
        assert!(matches!(
            hud.window(host).unwrap_err(),
            HudError::UnexpectedContent { expected: "window", .. }
        ));
        assert!(matches!(
            hud.list_selected(host).unwrap_err(),
            HudError::UnexpectedContent { expected: "list", .. }
        ));
    }

    #[test]
    fn test_root_cannot_be_destroyed() {
        let (mut hud, _) = setup();
        let root = hud.root();
        assert!(matches!(hud.destroy_widget(root), Err(HudError::InvalidWidgetId)));
    }

    #[test]
    fn test_destroy_removes_subtree() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        let child = leaf(&mut hud, "child", 0.0, 0.0, 10.0, 10.0);
        let part = leaf(&mut hud, "part", 0.0, 0.0, 5.0, 5.0);
        hud.add_widget(host, child).unwrap();
        hud.assemble_widget(child, part, Point::ZERO).unwrap();
        let before = hud.widget_count();

        hud.destroy_widget(host).unwrap();
        assert_eq!(hud.widget_count(), before - 3);
        assert!(!hud.contains(child));
        assert!(!hud.contains(part));
        assert!(matches!(hud.widget(child), Err(HudError::InvalidWidgetId)));
    }

    #[test]
    fn test_lifecycle_hooks_run_once() {
        let (mut hud, _) = setup();
        let log = new_log();
        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        let recorder = hud.create_widget(WidgetBuilder::new("recorder").content(Recorder::new("recorder", &log)));

        hud.add_widget(host, recorder).unwrap();
        hud.remove_widget(host, recorder).unwrap();
        hud.add_widget(host, recorder).unwrap();

        assert_eq!(
            entries(&log),
            vec!["recorder:init_size", "recorder:create_shape", "recorder:init"]
        );
        assert!(hud.widget(recorder).unwrap().is_initialized());
    }

    #[test]
    fn test_hooks_wait_for_attach() {
        let (mut hud, _) = setup();
        let log = new_log();
        let group = hud.create_widget(WidgetBuilder::new("group").container());
        let recorder = hud.create_widget(WidgetBuilder::new("recorder").content(Recorder::new("recorder", &log)));
        hud.add_widget(group, recorder).unwrap();
        assert!(entries(&log).is_empty());

        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        hud.add_widget(host, group).unwrap();
        assert_eq!(entries(&log).len(), 3);
        assert!(hud.is_attached(recorder));
    }

    #[test]
    fn test_managed_assembled_widgets_follow_owner() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 400.0, 400.0);
        let owner = leaf(&mut hud, "owner", 10.0, 10.0, 50.0, 50.0);
        let managed = leaf(&mut hud, "managed", 0.0, 0.0, 5.0, 5.0);
        let loose = leaf(&mut hud, "loose", 3.0, 3.0, 5.0, 5.0);
        hud.add_widget(host, owner).unwrap();
        hud.assemble_widget(owner, managed, Point::new(5.0, 5.0)).unwrap();
        hud.assemble_unmanaged_widget(owner, loose).unwrap();

        hud.set_location(owner, Point::new(50.0, 60.0)).unwrap();
        assert_eq!(hud.widget(managed).unwrap().location(), Point::new(55.0, 65.0));
        assert_eq!(hud.widget(loose).unwrap().location(), Point::new(3.0, 3.0));
        assert_eq!(hud.relative_location(owner, managed).unwrap(), Point::new(5.0, 5.0));

        assert!(matches!(
            hud.relative_location(owner, loose).unwrap_err(),
            HudError::NotOwned { .. }
        ));
        assert!(matches!(
            hud.disassemble_widget(host, managed).unwrap_err(),
            HudError::NotOwned { .. }
        ));
    }

    #[test]
    fn test_layout_manager_runs_on_update() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 120.0, 200.0);
        hud.set_layout(host, ColumnLayout).unwrap();
        let a = leaf(&mut hud, "a", 7.0, 7.0, 10.0, 30.0);
        let b = leaf(&mut hud, "b", 7.0, 7.0, 10.0, 20.0);
        hud.add_widget(host, a).unwrap();
        hud.add_widget(host, b).unwrap();

        hud.update(Duration::ZERO).unwrap();
        assert_eq!(hud.widget(a).unwrap().bounds(), Rect::new(0.0, 0.0, 120.0, 30.0));
        assert_eq!(hud.widget(b).unwrap().bounds(), Rect::new(0.0, 30.0, 120.0, 20.0));
    }

    #[test]
    fn test_overlap_cache_tracks_moves() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 200.0, 200.0);
        let a = leaf(&mut hud, "a", 0.0, 0.0, 50.0, 50.0);
        let b = leaf(&mut hud, "b", 100.0, 0.0, 50.0, 50.0);
        hud.add_widget(host, a).unwrap();
        hud.add_widget(host, b).unwrap();
        assert!(!hud.has_overlapping_widgets(host).unwrap());

        hud.set_location(b, Point::new(25.0, 25.0)).unwrap();
        assert!(hud.has_overlapping_widgets(host).unwrap());
    }

    #[test]
    fn test_overlap_follows_pick_areas() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 200.0, 200.0);
        let a = hud.create_widget(WidgetBuilder::new("a").size(50.0, 50.0).z_index(1));
        let b = leaf(&mut hud, "b", 60.0, 0.0, 50.0, 50.0);
        hud.add_widget(host, a).unwrap();
        hud.add_widget(host, b).unwrap();
        assert!(!hud.has_overlapping_widgets(host).unwrap());

        // Widening the pick area of `a` reaches into `b` without resizing `a`.
        hud.set_pick_size(a, Some(Size::new(80.0, 50.0))).unwrap();
        assert!(hud.has_overlapping_widgets(host).unwrap());
        assert_eq!(hud.widget(a).unwrap().size(), Size::new(50.0, 50.0));
        let hit = hud.pick(Point::new(70.0, 10.0), PickReason::Moved, None, ms(0)).unwrap().unwrap();
        assert_eq!(hit.widget, a);

        hud.set_pick_size(a, None).unwrap();
        assert!(!hud.has_overlapping_widgets(host).unwrap());
        let hit = hud.pick(Point::new(70.0, 10.0), PickReason::Moved, None, ms(1)).unwrap().unwrap();
        assert_eq!(hit.widget, b);
    }

    #[test]
    fn test_debug_tree_names_widgets() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "inventory", 0.0, 0.0, 100.0, 100.0);
        let slot = leaf(&mut hud, "slot", 0.0, 0.0, 10.0, 10.0);
        hud.add_widget(host, slot).unwrap();

        let dump = hud.debug_tree();
        assert!(dump.contains("inventory"));
        assert!(dump.contains("slot"));
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    #[test]
    fn test_conversions_require_attach() {
        let (mut hud, _) = setup();
        let loose = leaf(&mut hud, "loose", 0.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            hud.local_to_pixels(loose, Point::ZERO).unwrap_err(),
            HudError::NotAttached { .. }
        ));
        assert!(matches!(
            hud.units_per_pixel(loose).unwrap_err(),
            HudError::NotAttached { .. }
        ));
    }

    #[test]
    fn test_resolution_scales_children() {
        let (mut hud, _) = setup();
        let host = hud.create_widget(
            WidgetBuilder::new("host")
                .heavyweight()
                .location(100.0, 50.0)
                .size(200.0, 100.0)
                .border(Border::uniform(2.0, Color::WHITE))
                .padding(Insets::uniform(3.0))
                .resolution(380.0, 180.0),
        );
        hud.add_widget(hud.root(), host).unwrap();
        let child = leaf(&mut hud, "child", 20.0, 40.0, 10.0, 10.0);
        hud.add_widget(host, child).unwrap();

        // Content area is 190x90 at (105, 55); two internal units per pixel.
        let origin = hud.local_to_pixels(child, Point::ZERO).unwrap();
        assert!(approx(origin, Point::new(115.0, 75.0)));
        assert!(approx(hud.pixels_to_local(child, Point::new(116.0, 76.0)).unwrap(), Point::new(2.0, 2.0)));
        assert_eq!(hud.units_per_pixel(child).unwrap(), (2.0, 2.0));
        assert_eq!(hud.hud_size_to_pixels(child, Size::new(10.0, 10.0)).unwrap(), Size::new(5.0, 5.0));
        assert_eq!(hud.internal_size(host).unwrap(), Size::new(380.0, 180.0));
    }

    #[test]
    fn test_pixel_round_trip_through_nesting() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 40.0, 30.0, 300.0, 300.0);
        hud.set_resolution(host, Some(Size::new(600.0, 150.0))).unwrap();
        let group = hud.create_widget(
            WidgetBuilder::new("group")
                .location(100.0, 20.0)
                .size(200.0, 100.0)
                .padding(Insets::new(4.0, 6.0, 0.0, 0.0)),
        );
        hud.add_widget(host, group).unwrap();
        let child = leaf(&mut hud, "child", 12.0, 8.0, 20.0, 20.0);
        hud.add_widget(group, child).unwrap();

        for local in [Point::ZERO, Point::new(3.5, 9.25), Point::new(19.0, 1.0)] {
            let pixels = hud.local_to_pixels(child, local).unwrap();
            assert!(approx(hud.pixels_to_local(child, pixels).unwrap(), local));
        }
    }

    #[test]
    fn test_root_hud_resolution_differs_from_pixels() {
        let surfaces = RecordingSurfaceFactory::new();
        let mut hud = Hud::new(
            ScreenConverter::with_hud_resolution(Size::new(800.0, 600.0), Size::new(400.0, 300.0)),
            surfaces,
            UiConfig::default(),
        );
        let host = panel(&mut hud, "host", 10.0, 10.0, 100.0, 50.0);
        assert!(approx(hud.local_to_pixels(host, Point::ZERO).unwrap(), Point::new(20.0, 20.0)));
        assert_eq!(hud.units_per_pixel(host).unwrap(), (0.5, 0.5));
        assert_eq!(hud.hud_size_to_pixels(host, Size::new(100.0, 50.0)).unwrap(), Size::new(200.0, 100.0));
    }

    #[test]
    fn test_assembled_widget_shares_owner_space() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 100.0, 100.0, 200.0, 200.0);
        let owner = leaf(&mut hud, "owner", 10.0, 10.0, 50.0, 50.0);
        let part = leaf(&mut hud, "part", 0.0, 0.0, 5.0, 5.0);
        hud.add_widget(host, owner).unwrap();
        hud.assemble_widget(owner, part, Point::new(4.0, 6.0)).unwrap();

        assert!(approx(hud.local_to_pixels(part, Point::ZERO).unwrap(), Point::new(114.0, 116.0)));
        assert_eq!(hud.units_per_pixel(part).unwrap(), hud.units_per_pixel(owner).unwrap());
    }

    #[test]
    fn test_scenegraph_round_trip() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 400.0, 300.0, 100.0, 100.0);
        let centre = hud.local_to_scenegraph(host, Point::ZERO).unwrap();
        assert!(centre.length() < 1e-5);
        let back = hud.scenegraph_to_local(host, glam::Vec2::new(0.5, -0.5)).unwrap();
        assert!(approx(back, Point::new(150.0, 150.0)));
    }

    // =========================================================================
    // Z-order
    // =========================================================================

    #[test]
    fn test_children_sorted_stably_by_z() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        let ids: Vec<WidgetId> = [1, 0, 1, 0]
            .into_iter()
            .map(|z| {
                let id = hud.create_widget(WidgetBuilder::new("w").z_index(z));
                hud.add_widget(host, id).unwrap();
                id
            })
            .collect();

        assert_eq!(hud.children_by_z(host).unwrap(), vec![ids[1], ids[3], ids[0], ids[2]]);

        hud.set_z_index(ids[3], -1).unwrap();
        assert_eq!(hud.children_by_z(host).unwrap(), vec![ids[3], ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_scene_order_follows_z_paths() {
        let (mut hud, _) = setup();
        let a = panel(&mut hud, "a", 0.0, 0.0, 100.0, 100.0);
        let b = panel(&mut hud, "b", 0.0, 0.0, 100.0, 100.0);
        let c = panel(&mut hud, "c", 0.0, 0.0, 100.0, 100.0);
        hud.set_z_index(b, 1).unwrap();
        hud.set_z_index(c, 2).unwrap();
        let nested = hud.create_widget(WidgetBuilder::new("nested").heavyweight().size(10.0, 10.0));
        hud.add_widget(b, nested).unwrap();

        assert_eq!(hud.z_index_path(nested).unwrap().as_slice(), &[1, 0]);
        assert_eq!(hud.scene_order(), vec![a, b, nested, c]);

        hud.set_z_index(a, 5).unwrap();
        assert_eq!(hud.scene_order(), vec![b, nested, c, a]);
    }

    #[test]
    fn test_scene_placement_orders_surfaces() {
        let (mut hud, surfaces) = setup();
        let low = panel(&mut hud, "low", 0.0, 0.0, 100.0, 100.0);
        let high = panel(&mut hud, "high", 0.0, 0.0, 100.0, 100.0);
        hud.set_z_index(low, 3).unwrap();
        hud.set_z_index(high, 7).unwrap();
        hud.render_frame(Duration::ZERO).unwrap();

        let handles = surfaces.surfaces();
        let low_order = handles[0].placement().unwrap().order;
        let high_order = handles[1].placement().unwrap().order;
        assert!(low_order < high_order);
    }

    // =========================================================================
    // Dirty propagation and redraw
    // =========================================================================

    #[test]
    fn test_dirty_mark_reaches_host_at_any_depth() {
        for depth in 0..=3 {
            let (mut hud, surfaces) = setup();
            let host = panel(&mut hud, "host", 0.0, 0.0, 200.0, 200.0);
            let mut parent = host;
            let mut chain = Vec::new();
            for _ in 0..depth {
                let group = hud.create_widget(WidgetBuilder::new("group").container().size(100.0, 100.0));
                hud.add_widget(parent, group).unwrap();
                chain.push(group);
                parent = group;
            }
            let target = leaf(&mut hud, "target", 0.0, 0.0, 10.0, 10.0);
            hud.add_widget(parent, target).unwrap();

            assert_eq!(hud.render_frame(ms(0)).unwrap().redrawn, 1);
            assert!(!hud.redraw_scheduler(host).unwrap().is_pending());

            hud.set_texture_dirty(target).unwrap();
            assert!(hud.redraw_scheduler(host).unwrap().is_pending(), "depth {depth}");
            for &group in &chain {
                assert!(hud.widget(group).unwrap().is_hosted_dirty());
            }

            let stats = hud.render_frame(ms(100)).unwrap();
            assert_eq!(stats.redrawn, 1);
            assert_eq!(surfaces.surfaces()[0].present_count(), 2);
            assert!(!hud.widget(target).unwrap().is_texture_dirty());
            for &group in &chain {
                assert!(!hud.widget(group).unwrap().is_hosted_dirty());
            }
        }
    }

    #[test]
    fn test_clean_surface_is_not_redrawn() {
        let (mut hud, surfaces) = setup();
        panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        hud.render_frame(ms(0)).unwrap();
        let stats = hud.render_frame(ms(500)).unwrap();

        assert_eq!(stats.redrawn, 0);
        assert_eq!(stats.skipped, 1);
        assert_eq!(surfaces.surfaces()[0].present_count(), 1);
    }

    #[test]
    fn test_minimum_redraw_interval() {
        let (mut hud, surfaces) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        hud.redraw_scheduler_mut(host).unwrap().set_min_redraw_interval(ms(20));

        // The first frame opens the cooldown of the fresh surface.
        assert_eq!(hud.render_frame(ms(0)).unwrap().redrawn, 0);
        assert_eq!(hud.render_frame(ms(20)).unwrap().redrawn, 1);

        hud.set_background(host, Some(crate::widget::Background::Color(Color::RED))).unwrap();
        assert_eq!(hud.render_frame(ms(30)).unwrap().redrawn, 0);
        assert_eq!(hud.render_frame(ms(45)).unwrap().redrawn, 0);
        assert_eq!(hud.render_frame(ms(50)).unwrap().redrawn, 1);
        assert_eq!(surfaces.surfaces()[0].present_count(), 2);
    }

    #[test]
    fn test_two_marks_in_one_cooldown_redraw_once() {
        let (mut hud, surfaces) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        hud.redraw_scheduler_mut(host).unwrap().set_min_redraw_interval(ms(50));

        hud.set_texture_dirty(host).unwrap();
        assert_eq!(redraw_times(&mut hud, host, 0, 5, 5), Vec::<u64>::new());
        hud.set_texture_dirty(host).unwrap();
        assert_eq!(redraw_times(&mut hud, host, 10, 100, 5), vec![50]);
        assert_eq!(surfaces.surfaces()[0].present_count(), 1);

        // The same burst long after the last redraw.
        hud.set_texture_dirty(host).unwrap();
        let first = redraw_times(&mut hud, host, 1000, 1005, 5);
        hud.set_texture_dirty(host).unwrap();
        let rest = redraw_times(&mut hud, host, 1010, 1100, 5);
        assert!(first.is_empty());
        assert_eq!(rest, vec![1050]);
        assert_eq!(surfaces.surfaces()[0].present_count(), 2);
    }

    #[test]
    fn test_dirty_marks_stop_at_nearest_heavyweight() {
        let (mut hud, _) = setup();
        let outer = panel(&mut hud, "outer", 0.0, 0.0, 300.0, 300.0);
        let inner = hud.create_widget(
            WidgetBuilder::new("inner").heavyweight().container().size(100.0, 100.0),
        );
        hud.add_widget(outer, inner).unwrap();
        let target = leaf(&mut hud, "target", 0.0, 0.0, 10.0, 10.0);
        hud.add_widget(inner, target).unwrap();
        hud.render_frame(ms(0)).unwrap();

        hud.set_texture_dirty(target).unwrap();
        assert!(hud.redraw_scheduler(inner).unwrap().is_pending());
        assert!(!hud.redraw_scheduler(outer).unwrap().is_pending());
    }

    #[test]
    fn test_draw_phases_in_order() {
        let (mut hud, surfaces) = setup();
        let host = hud.create_widget(
            WidgetBuilder::new("host")
                .heavyweight()
                .container()
                .size(100.0, 100.0)
                .background(crate::widget::Background::Color(Color::BLUE))
                .border(Border::uniform(2.0, Color::WHITE))
                .content(Swatch(Color::RED)),
        );
        hud.add_widget(hud.root(), host).unwrap();
        let child = hud.create_widget(
            WidgetBuilder::new("child")
                .location(10.0, 10.0)
                .size(20.0, 20.0)
                .background(crate::widget::Background::Color(Color::GREEN)),
        );
        hud.add_widget(host, child).unwrap();
        hud.render_frame(ms(0)).unwrap();

        let commands = surfaces.surfaces()[0].commands();
        assert_eq!(commands.first(), Some(&DrawCommand::Clear(Color::TRANSPARENT)));
        assert_eq!(
            fill_colors(&commands),
            vec![Color::BLUE, Color::RED, Color::GREEN, Color::WHITE, Color::WHITE, Color::WHITE, Color::WHITE]
        );
    }

    #[test]
    fn test_children_clipped_to_content_area() {
        let (mut hud, surfaces) = setup();
        let host = panel(&mut hud, "host", 100.0, 100.0, 100.0, 100.0);
        let child = hud.create_widget(
            WidgetBuilder::new("child")
                .location(50.0, 50.0)
                .size(100.0, 100.0)
                .background(crate::widget::Background::Color(Color::GREEN)),
        );
        hud.add_widget(host, child).unwrap();
        hud.render_frame(ms(0)).unwrap();

        let commands = surfaces.surfaces()[0].commands();
        let green = commands
            .iter()
            .find(|c| matches!(c, DrawCommand::FillRect { color, .. } if *color == Color::GREEN))
            .unwrap();
        assert_eq!(green.visible_area(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
    }

    #[test]
    fn test_hidden_heavyweight_is_not_drawn() {
        let (mut hud, surfaces) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        hud.render_frame(ms(0)).unwrap();
        assert!(surfaces.surfaces()[0].snapshot().visible);

        hud.set_visible(host, false).unwrap();
        let stats = hud.render_frame(ms(100)).unwrap();
        assert_eq!(stats.redrawn, 0);
        assert!(!surfaces.surfaces()[0].snapshot().visible);
    }

    #[test]
    fn test_reattached_heavyweight_gets_new_surface() {
        let (mut hud, surfaces) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        hud.render_frame(ms(0)).unwrap();
        hud.remove_widget(hud.root(), host).unwrap();
        hud.add_widget(hud.root(), host).unwrap();

        assert_eq!(hud.render_frame(ms(1)).unwrap().redrawn, 1);
        assert_eq!(surfaces.surface_count(), 2);
        assert_eq!(surfaces.surfaces()[1].present_count(), 1);
    }

    #[test]
    fn test_canvas_resize_resizes_surfaces() {
        let (mut hud, surfaces) = setup();
        panel(&mut hud, "host", 0.0, 0.0, 100.0, 50.0);
        hud.render_frame(ms(0)).unwrap();
        assert_eq!(surfaces.surfaces()[0].size(), (100, 50));

        hud.set_converter(ScreenConverter::with_hud_resolution(
            Size::new(1600.0, 1200.0),
            Size::new(800.0, 600.0),
        ))
        .unwrap();
        hud.render_frame(ms(100)).unwrap();
        assert_eq!(surfaces.surfaces()[0].size(), (200, 100));
    }

    // =========================================================================
    // Picking and hover
    // =========================================================================

    #[test]
    fn test_pick_finds_topmost_widget() {
        let (mut hud, _) = setup();
        let log = new_log();
        let below = hud.create_widget(
            WidgetBuilder::new("below").heavyweight().size(100.0, 100.0).content(Recorder::new("below", &log)),
        );
        let above = hud.create_widget(
            WidgetBuilder::new("above")
                .heavyweight()
                .location(50.0, 50.0)
                .size(100.0, 100.0)
                .z_index(1)
                .content(Recorder::new("above", &log)),
        );
        hud.add_widget(hud.root(), below).unwrap();
        hud.add_widget(hud.root(), above).unwrap();
        log.lock().clear();

        let hit = hud.pick(Point::new(75.0, 75.0), PickReason::Moved, None, ms(0)).unwrap().unwrap();
        assert_eq!(hit.widget, above);
        assert!(approx(hit.local_pos, Point::new(25.0, 25.0)));

        let hit = hud.pick(Point::new(10.0, 10.0), PickReason::Moved, None, ms(1)).unwrap().unwrap();
        assert_eq!(hit.widget, below);
        assert_eq!(entries(&log), vec!["above:mouse Moved", "below:mouse Moved"]);

        assert!(hud.pick(Point::new(700.0, 500.0), PickReason::Moved, None, ms(2)).unwrap().is_none());
    }

    #[test]
    fn test_hover_exits_before_enters() {
        let (mut hud, _) = setup();
        let log = new_log();
        let left = panel(&mut hud, "left", 0.0, 0.0, 100.0, 100.0);
        let right = panel(&mut hud, "right", 200.0, 0.0, 100.0, 100.0);
        for (id, name) in [(left, "left"), (right, "right")] {
            let entered = log.clone();
            hud.widget(id).unwrap().mouse_entered.connect(move |_| entered.lock().push(format!("enter {name}")));
            let exited = log.clone();
            hud.widget(id).unwrap().mouse_exited.connect(move |_| exited.lock().push(format!("exit {name}")));
        }

        hud.pick(Point::new(10.0, 10.0), PickReason::Moved, None, ms(0)).unwrap();
        hud.pick(Point::new(20.0, 10.0), PickReason::Moved, None, ms(1)).unwrap();
        hud.pick(Point::new(210.0, 10.0), PickReason::Moved, None, ms(2)).unwrap();
        hud.pick(Point::new(500.0, 500.0), PickReason::Moved, None, ms(3)).unwrap();

        assert_eq!(entries(&log), vec!["enter left", "exit left", "enter right", "exit right"]);
        assert!(!hud.widget(right).unwrap().is_hovered());
    }

    #[test]
    fn test_pick_in_scaled_container_prefers_higher_z() {
        let (mut hud, _) = setup();
        let canvas = hud.create_widget(
            WidgetBuilder::new("canvas")
                .heavyweight()
                .size(400.0, 300.0)
                .resolution(800.0, 600.0),
        );
        hud.add_widget(hud.root(), canvas).unwrap();
        let upper = hud.create_widget(
            WidgetBuilder::new("upper").location(120.0, 120.0).size(50.0, 50.0).z_index(1),
        );
        let lower = leaf(&mut hud, "lower", 100.0, 100.0, 50.0, 50.0);
        hud.add_widget(canvas, upper).unwrap();
        hud.add_widget(canvas, lower).unwrap();

        // Two canvas units per pixel: pixel (65, 65) is (130, 130) inside the canvas.
        let pixel = Point::new(65.0, 65.0);
        let inside = hud.pixels_to_parent_space(upper, pixel).unwrap();
        assert!(approx(inside, Point::new(130.0, 130.0)));
        assert!(approx(hud.parent_space_to_pixels(lower, inside).unwrap(), pixel));

        let hit = hud.pick(pixel, PickReason::Moved, None, ms(0)).unwrap().unwrap();
        assert_eq!(hit.widget, upper);
        assert!(approx(hit.local_pos, Point::new(10.0, 10.0)));
        assert!(approx(hud.local_to_pixels(upper, hit.local_pos).unwrap(), pixel));
        assert!(hud.widget(upper).unwrap().is_hovered());
        assert!(!hud.widget(lower).unwrap().is_hovered());
    }

    #[test]
    fn test_hover_moves_between_overlapping_siblings() {
        let (mut hud, _) = setup();
        let log = new_log();
        let host = panel(&mut hud, "host", 0.0, 0.0, 200.0, 200.0);
        let a = leaf(&mut hud, "a", 0.0, 0.0, 60.0, 60.0);
        let b = hud.create_widget(WidgetBuilder::new("b").location(40.0, 0.0).size(60.0, 60.0).z_index(1));
        for (id, name) in [(a, "a"), (b, "b")] {
            hud.add_widget(host, id).unwrap();
            let entered = log.clone();
            hud.widget(id).unwrap().mouse_entered.connect(move |_| entered.lock().push(format!("enter {name}")));
            let exited = log.clone();
            hud.widget(id).unwrap().mouse_exited.connect(move |_| exited.lock().push(format!("exit {name}")));
        }
        assert!(hud.has_overlapping_widgets(host).unwrap());

        // Only a, the shared strip where b is on top, only b, then only a again.
        for (t, x) in [(0, 10.0), (1, 50.0), (2, 90.0), (3, 10.0)] {
            hud.pick(Point::new(x, 10.0), PickReason::Moved, None, ms(t)).unwrap();
        }

        assert_eq!(entries(&log), vec!["enter a", "exit a", "enter b", "exit b", "enter a"]);
        assert!(hud.widget(a).unwrap().is_hovered());
        assert!(!hud.widget(b).unwrap().is_hovered());
        assert_eq!(hud.container(host).unwrap().hovered, Some(a));
    }

    #[test]
    fn test_hover_follows_nested_path() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 200.0, 200.0);
        let a = leaf(&mut hud, "a", 0.0, 0.0, 50.0, 50.0);
        let b = leaf(&mut hud, "b", 100.0, 0.0, 50.0, 50.0);
        hud.add_widget(host, a).unwrap();
        hud.add_widget(host, b).unwrap();

        hud.pick(Point::new(10.0, 10.0), PickReason::Moved, None, ms(0)).unwrap();
        assert!(hud.widget(host).unwrap().is_hovered());
        assert!(hud.widget(a).unwrap().is_hovered());

        hud.pick(Point::new(110.0, 10.0), PickReason::Moved, None, ms(1)).unwrap();
        assert!(hud.widget(host).unwrap().is_hovered());
        assert!(!hud.widget(a).unwrap().is_hovered());
        assert!(hud.widget(b).unwrap().is_hovered());
    }

    #[test]
    fn test_unclickable_widgets_ignore_buttons() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 200.0, 200.0);
        let label = hud.create_widget(WidgetBuilder::new("label").size(50.0, 50.0).clickable(false));
        hud.add_widget(host, label).unwrap();

        let moved = hud.pick(Point::new(10.0, 10.0), PickReason::Moved, None, ms(0)).unwrap().unwrap();
        assert_eq!(moved.widget, label);
        let pressed = hud
            .pick(Point::new(10.0, 10.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(1))
            .unwrap()
            .unwrap();
        assert_eq!(pressed.widget, host);
    }

    #[test]
    fn test_hidden_widget_drops_hover() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 200.0, 200.0);
        let a = leaf(&mut hud, "a", 0.0, 0.0, 50.0, 50.0);
        hud.add_widget(host, a).unwrap();
        hud.pick(Point::new(10.0, 10.0), PickReason::Moved, None, ms(0)).unwrap();

        hud.set_visible(a, false).unwrap();
        assert!(!hud.widget(a).unwrap().is_hovered());
        assert_eq!(hud.container(host).unwrap().hovered, None);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    fn focus_fixture(hud: &mut Hud, log: &Log) -> (WidgetId, [WidgetId; 3]) {
        let host = panel(hud, "host", 0.0, 0.0, 300.0, 100.0);
        let names = ["one", "two", "three"];
        let ids = names.map(|name| {
            let id = hud.create_widget(
                WidgetBuilder::new(name)
                    .size(50.0, 50.0)
                    .focusable(true)
                    .content(Recorder::new(name, log)),
            );
            hud.add_widget(host, id).unwrap();
            let gained = log.clone();
            hud.widget(id).unwrap().focus_gained.connect(move |_| gained.lock().push(format!("{name}:gained")));
            let lost = log.clone();
            hud.widget(id).unwrap().focus_lost.connect(move |_| lost.lock().push(format!("{name}:lost")));
            id
        });
        log.lock().clear();
        hud.set_location(ids[1], Point::new(100.0, 0.0)).unwrap();
        hud.set_location(ids[2], Point::new(200.0, 0.0)).unwrap();
        (host, ids)
    }

    #[test]
    fn test_only_one_widget_has_focus() {
        let (mut hud, _) = setup();
        let log = new_log();
        let (host, [one, two, three]) = focus_fixture(&mut hud, &log);

        hud.request_focus(one).unwrap();
        hud.request_focus(two).unwrap();

        assert_eq!(hud.focused_widget(), Some(two));
        assert_eq!(hud.focus_chain(), vec![host, two]);
        assert!(!hud.widget(one).unwrap().has_focus());
        assert!(!hud.widget(three).unwrap().has_focus());
        assert_eq!(entries(&log), vec!["one:gained", "one:lost", "two:gained"]);
    }

    #[test]
    fn test_key_events_reach_focus_end_only() {
        let (mut hud, _) = setup();
        let log = new_log();
        let (_, [one, _, _]) = focus_fixture(&mut hud, &log);
        hud.request_focus(one).unwrap();
        log.lock().clear();

        hud.key_pressed(Key::A, KeyboardModifiers::NONE, ms(1)).unwrap();
        hud.key_typed('a', KeyboardModifiers::NONE, ms(1)).unwrap();
        hud.key_released(Key::A, KeyboardModifiers::NONE, ms(2)).unwrap();
        hud.controller_button_pressed(3, ms(3)).unwrap();

        assert_eq!(
            entries(&log),
            vec!["one:pressed A", "one:typed a", "one:released A", "one:button 3"]
        );
    }

    #[test]
    fn test_tab_cycles_focus_and_is_consumed() {
        let (mut hud, _) = setup();
        let log = new_log();
        let (_, [one, two, three]) = focus_fixture(&mut hud, &log);
        hud.request_focus(one).unwrap();

        hud.key_pressed(Key::Tab, KeyboardModifiers::NONE, ms(0)).unwrap();
        assert_eq!(hud.focused_widget(), Some(two));
        hud.key_pressed(Key::Tab, KeyboardModifiers::NONE, ms(1)).unwrap();
        assert_eq!(hud.focused_widget(), Some(three));
        hud.key_pressed(Key::Tab, KeyboardModifiers::NONE, ms(2)).unwrap();
        assert_eq!(hud.focused_widget(), Some(one));
        hud.key_pressed(Key::Tab, KeyboardModifiers::SHIFT, ms(3)).unwrap();
        assert_eq!(hud.focused_widget(), Some(three));

        assert!(entries(&log).iter().all(|e| !e.contains("pressed")));
    }

    #[test]
    fn test_focus_request_waits_for_attach() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 100.0, 100.0);
        let field = hud.create_widget(WidgetBuilder::new("field").size(10.0, 10.0).focusable(true));

        hud.request_focus(field).unwrap();
        assert_eq!(hud.focused_widget(), None);
        hud.add_widget(host, field).unwrap();
        assert_eq!(hud.focused_widget(), Some(field));
    }

    #[test]
    fn test_unfocusable_widget_keeps_existing_focus() {
        let (mut hud, _) = setup();
        let log = new_log();
        let (host, [one, _, _]) = focus_fixture(&mut hud, &log);
        hud.request_focus(one).unwrap();

        let plain = leaf(&mut hud, "plain", 0.0, 60.0, 10.0, 10.0);
        hud.add_widget(host, plain).unwrap();
        hud.request_focus(plain).unwrap();
        assert_eq!(hud.focused_widget(), Some(one));
    }

    #[test]
    fn test_removing_focused_branch_clears_focus() {
        let (mut hud, _) = setup();
        let log = new_log();
        let (host, [one, _, _]) = focus_fixture(&mut hud, &log);
        hud.request_focus(one).unwrap();

        hud.remove_widget(host, one).unwrap();
        assert_eq!(hud.focused_widget(), None);
        assert!(hud.focus_chain().is_empty());
        assert!(entries(&log).contains(&"one:lost".to_string()));
    }

    #[test]
    fn test_press_moves_focus() {
        let (mut hud, _) = setup();
        let log = new_log();
        let (_, [_, two, _]) = focus_fixture(&mut hud, &log);

        hud.pick(Point::new(110.0, 10.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(0))
            .unwrap();
        assert_eq!(hud.focused_widget(), Some(two));
        assert_eq!(
            entries(&log),
            vec!["two:gained", "two:mouse ButtonPressed"]
        );
    }

    // =========================================================================
    // Dragging
    // =========================================================================

    fn draggable_panel(hud: &mut Hud) -> WidgetId {
        let id = hud.create_widget(
            WidgetBuilder::new("dragged")
                .heavyweight()
                .location(100.0, 100.0)
                .size(200.0, 100.0)
                .draggable(true),
        );
        hud.add_widget(hud.root(), id).unwrap();
        id
    }

    #[test]
    fn test_drag_follows_pointer() {
        let (mut hud, _) = setup();
        let id = draggable_panel(&mut hud);

        hud.pick(Point::new(110.0, 110.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(0))
            .unwrap();
        assert_eq!(hud.dragged_widget(), Some(id));
        hud.pick(Point::new(160.0, 130.0), PickReason::Moved, None, ms(1)).unwrap();
        assert_eq!(hud.widget(id).unwrap().location(), Point::new(150.0, 120.0));

        hud.pick(Point::new(160.0, 130.0), PickReason::ButtonReleased, Some(MouseButton::Left), ms(2))
            .unwrap();
        assert!(!hud.is_dragging());
    }

    #[test]
    fn test_drag_clamps_at_both_extremes() {
        let (mut hud, _) = setup();
        let id = draggable_panel(&mut hud);
        hud.pick(Point::new(110.0, 110.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(0))
            .unwrap();

        hud.pick(Point::new(-1000.0, -1000.0), PickReason::Moved, None, ms(1)).unwrap();
        assert_eq!(hud.widget(id).unwrap().location(), Point::new(-192.0, -92.0));

        hud.pick(Point::new(5000.0, 5000.0), PickReason::Moved, None, ms(2)).unwrap();
        assert_eq!(hud.widget(id).unwrap().location(), Point::new(792.0, 592.0));
    }

    #[test]
    fn test_drag_signals_and_cancel_on_removal() {
        let (mut hud, _) = setup();
        let log = new_log();
        let id = draggable_panel(&mut hud);
        let started = log.clone();
        hud.widget(id).unwrap().drag_started.connect(move |_| started.lock().push("started".into()));
        let stopped = log.clone();
        hud.widget(id).unwrap().drag_stopped.connect(move |_| stopped.lock().push("stopped".into()));

        hud.pick(Point::new(110.0, 110.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(0))
            .unwrap();
        hud.remove_widget(hud.root(), id).unwrap();

        assert!(!hud.is_dragging());
        assert_eq!(entries(&log), vec!["started", "stopped"]);
        // A stray move after the removal must not touch the widget.
        hud.pick(Point::new(300.0, 300.0), PickReason::Moved, None, ms(1)).unwrap();
        assert_eq!(hud.widget(id).unwrap().location(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_assembled_drag_stays_inside_owner() {
        let (mut hud, _) = setup();
        let host = panel(&mut hud, "host", 0.0, 0.0, 400.0, 400.0);
        let owner = leaf(&mut hud, "owner", 100.0, 100.0, 100.0, 100.0);
        hud.add_widget(host, owner).unwrap();
        let knob = hud.create_widget(WidgetBuilder::new("knob").size(20.0, 20.0).draggable(true));
        hud.assemble_unmanaged_widget(owner, knob).unwrap();
        hud.set_location(knob, Point::new(110.0, 110.0)).unwrap();

        assert_eq!(hud.drag_bounds(knob).unwrap(), Rect::new(100.0, 100.0, 100.0, 100.0));
    }

    // =========================================================================
    // Windows
    // =========================================================================

    fn open_window(hud: &mut Hud) -> WidgetId {
        let window = hud
            .create_window("Inventory", Point::new(100.0, 100.0), Size::new(300.0, 200.0), true)
            .unwrap();
        hud.add_widget(hud.root(), window).unwrap();
        window
    }

    #[test]
    fn test_window_parts_are_laid_out() {
        let (mut hud, _) = setup();
        let window = open_window(&mut hud);
        let data = hud.window(window).unwrap();
        let (header, close, pane) = (data.header().unwrap(), data.close_button().unwrap(), data.content_pane());

        assert_eq!(hud.widget(header).unwrap().bounds(), Rect::new(100.0, 100.0, 300.0, 24.0));
        assert_eq!(hud.widget(close).unwrap().bounds(), Rect::new(376.0, 100.0, 24.0, 24.0));
        assert_eq!(hud.widget(pane).unwrap().bounds(), Rect::new(100.0, 124.0, 300.0, 176.0));
        assert_eq!(hud.title(window).unwrap(), Some("Inventory"));

        hud.set_size(window, Size::new(200.0, 100.0)).unwrap();
        assert_eq!(hud.widget(pane).unwrap().bounds(), Rect::new(100.0, 124.0, 200.0, 76.0));
        assert_eq!(hud.widget(close).unwrap().location(), Point::new(276.0, 100.0));
    }

    #[test]
    fn test_window_drags_by_header_only() {
        let (mut hud, _) = setup();
        let window = open_window(&mut hud);

        hud.pick(Point::new(150.0, 200.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(0))
            .unwrap();
        assert!(!hud.is_dragging());
        hud.pick(Point::new(150.0, 200.0), PickReason::ButtonReleased, Some(MouseButton::Left), ms(1))
            .unwrap();

        hud.pick(Point::new(150.0, 110.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(2))
            .unwrap();
        assert_eq!(hud.dragged_widget(), Some(window));
        hud.pick(Point::new(160.0, 120.0), PickReason::Moved, None, ms(3)).unwrap();
        assert_eq!(hud.widget(window).unwrap().location(), Point::new(110.0, 110.0));
        let pane = hud.content_pane(window).unwrap();
        assert_eq!(hud.widget(pane).unwrap().location(), Point::new(110.0, 134.0));
    }

    #[test]
    fn test_pane_dragging_enabled() {
        let (mut hud, _) = setup();
        let window = open_window(&mut hud);
        hud.set_pane_dragging_enabled(window, true).unwrap();

        hud.pick(Point::new(150.0, 200.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(0))
            .unwrap();
        assert_eq!(hud.dragged_widget(), Some(window));
    }

    #[test]
    fn test_close_button_closes_window() {
        let (mut hud, surfaces) = setup();
        let log = new_log();
        let window = open_window(&mut hud);
        let pane = hud.content_pane(window).unwrap();
        let field = hud.create_widget(WidgetBuilder::new("field").size(20.0, 20.0).focusable(true));
        hud.add_widget(pane, field).unwrap();
        hud.request_focus(field).unwrap();
        let closed = log.clone();
        hud.window(window).unwrap().closed.connect(move |_| closed.lock().push("closed".into()));
        hud.render_frame(ms(0)).unwrap();

        hud.pick(Point::new(385.0, 110.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(1))
            .unwrap();

        assert!(!hud.is_dragging());
        assert!(!hud.is_attached(window));
        assert!(!hud.is_attached(field));
        assert_eq!(hud.focused_widget(), None);
        assert_eq!(entries(&log), vec!["closed"]);
        assert!(!surfaces.surfaces()[0].snapshot().visible);

        // A closed window can be shown again.
        hud.add_widget(hud.root(), window).unwrap();
        assert!(hud.is_attached(field));
    }

    /// A window with a focused field in its pane, logging focus loss and `closed`.
    fn window_with_field(hud: &mut Hud, log: &Log) -> (WidgetId, WidgetId) {
        let window = open_window(hud);
        let pane = hud.content_pane(window).unwrap();
        let field = hud.create_widget(WidgetBuilder::new("field").size(20.0, 20.0).focusable(true));
        hud.add_widget(pane, field).unwrap();
        hud.request_focus(field).unwrap();
        let lost = log.clone();
        hud.widget(field).unwrap().focus_lost.connect(move |_| lost.lock().push("field lost focus".into()));
        let closed = log.clone();
        hud.window(window).unwrap().closed.connect(move |_| closed.lock().push("closed".into()));
        (window, field)
    }

    #[test]
    fn test_removing_window_closes_it() {
        let (mut hud, _) = setup();
        let log = new_log();
        let (window, field) = window_with_field(&mut hud, &log);

        hud.remove_widget(hud.root(), window).unwrap();

        assert!(!hud.is_attached(field));
        assert_eq!(hud.focused_widget(), None);
        assert_eq!(entries(&log), vec!["field lost focus", "closed"]);

        // Removing a detached window again is an ownership error and stays silent.
        assert!(hud.remove_widget(hud.root(), window).is_err());
        hud.close_window(window).unwrap();
        assert_eq!(entries(&log), vec!["field lost focus", "closed"]);
    }

    #[test]
    fn test_destroying_window_closes_it() {
        let (mut hud, _) = setup();
        let log = new_log();
        let (window, field) = window_with_field(&mut hud, &log);

        hud.destroy_widget(window).unwrap();

        assert!(!hud.contains(window));
        assert!(!hud.contains(field));
        assert_eq!(entries(&log), vec!["field lost focus", "closed"]);
    }

    #[test]
    fn test_window_without_header() {
        let (mut hud, _) = setup();
        let window = hud
            .create_window("bare", Point::ZERO, Size::new(100.0, 100.0), false)
            .unwrap();
        hud.add_widget(hud.root(), window).unwrap();

        assert_eq!(hud.window(window).unwrap().header(), None);
        assert_eq!(hud.title(window).unwrap(), None);
        let pane = hud.content_pane(window).unwrap();
        assert_eq!(hud.widget(pane).unwrap().size(), Size::new(100.0, 100.0));
        hud.pick(Point::new(10.0, 10.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(0))
            .unwrap();
        assert!(!hud.is_dragging());
    }

    // =========================================================================
    // Lists
    // =========================================================================

    fn list_fixture(hud: &mut Hud, items: &[&str]) -> WidgetId {
        let host = panel(hud, "host", 100.0, 100.0, 200.0, 200.0);
        let list = hud.create_list("list", Point::ZERO, Size::new(100.0, 60.0));
        hud.add_widget(host, list).unwrap();
        hud.set_list_model(list, Some(Box::new(VecListModel::from(items.to_vec()))))
            .unwrap();
        list
    }

    #[test]
    fn test_list_shows_visible_rows() {
        let (mut hud, _) = setup();
        let list = list_fixture(&mut hud, &["a", "b", "c", "d", "e"]);

        assert_eq!(hud.list(list).unwrap().rows().len(), 3);
        assert_eq!(hud.list_row_rects(list).unwrap().len(), 3);
        assert_eq!(hud.list_selected(list).unwrap(), None);
    }

    #[test]
    fn test_short_list_hides_spare_rows() {
        let (mut hud, _) = setup();
        let list = list_fixture(&mut hud, &["a", "b"]);
        assert_eq!(hud.list_row_rects(list).unwrap(), vec![
            Rect::new(0.0, 0.0, 100.0, 20.0),
            Rect::new(0.0, 20.0, 100.0, 20.0),
        ]);
    }

    #[test]
    fn test_list_selection_scrolls_into_view() {
        let (mut hud, _) = setup();
        let log = new_log();
        let list = list_fixture(&mut hud, &["a", "b", "c", "d", "e"]);
        let changed = log.clone();
        hud.list(list)
            .unwrap()
            .selection_changed
            .connect(move |index| changed.lock().push(format!("{index:?}")));

        hud.select_list_item(list, Some(4)).unwrap();
        assert_eq!(hud.list_selected(list).unwrap(), Some(4));
        assert_eq!(hud.list(list).unwrap().first_visible(), 2);

        hud.select_list_item(list, Some(4)).unwrap();
        hud.select_list_item(list, Some(9)).unwrap();
        assert_eq!(hud.list_selected(list).unwrap(), None);
        assert_eq!(entries(&log), vec!["Some(4)", "None"]);
    }

    #[test]
    fn test_list_scroll_is_bounded() {
        let (mut hud, _) = setup();
        let list = list_fixture(&mut hud, &["a", "b", "c", "d", "e"]);

        hud.scroll_list(list, 10).unwrap();
        assert_eq!(hud.list(list).unwrap().first_visible(), 2);
        hud.scroll_list(list, -10).unwrap();
        assert_eq!(hud.list(list).unwrap().first_visible(), 0);
    }

    #[test]
    fn test_list_model_is_required() {
        let (mut hud, _) = setup();
        let list = list_fixture(&mut hud, &["a"]);
        assert!(matches!(
            hud.set_list_model(list, None).unwrap_err(),
            HudError::MissingArgument("model")
        ));

        hud.set_list_model(list, Some(Box::new(VecListModel::new()))).unwrap();
        hud.select_list_item(list, Some(0)).unwrap();
        assert_eq!(hud.list_selected(list).unwrap(), None);
    }

    #[test]
    fn test_clicking_a_row_selects_it() {
        let (mut hud, _) = setup();
        let list = list_fixture(&mut hud, &["a", "b", "c", "d", "e"]);

        let hit = hud
            .pick(Point::new(110.0, 125.0), PickReason::ButtonPressed, Some(MouseButton::Left), ms(0))
            .unwrap()
            .unwrap();
        assert_eq!(hit.widget, hud.list(list).unwrap().rows()[1]);
        assert_eq!(hud.list_selected(list).unwrap(), Some(1));

        hud.pick(Point::new(110.0, 125.0), PickReason::WheelDown { page_move: false }, None, ms(1))
            .unwrap();
        assert_eq!(hud.list(list).unwrap().first_visible(), 1);
    }

    #[test]
    fn test_list_rows_follow_moved_list() {
        let (mut hud, _) = setup();
        let list = list_fixture(&mut hud, &["a", "b", "c"]);
        hud.set_location(list, Point::new(30.0, 40.0)).unwrap();
        hud.update(ms(0)).unwrap();

        let second = hud.list(list).unwrap().rows()[1];
        assert_eq!(hud.widget(second).unwrap().location(), Point::new(30.0, 60.0));
    }

    #[test]
    fn test_list_rows_paint_model_text() {
        let (mut hud, surfaces) = setup();
        let list = list_fixture(&mut hud, &["sword", "shield"]);
        hud.select_list_item(list, Some(1)).unwrap();
        hud.render_frame(ms(0)).unwrap();

        let texts: Vec<String> = surfaces.surfaces()[0]
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::DrawText { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["sword", "shield"]);
    }
}
