//! Interactive canvas context
//!
//! `Editor` owns the scene, the selection state, the single live transform
//! session, and the scratch cache surface, and exposes the interactive
//! surface an external renderer and pointer source drive. There is no
//! ambient "current canvas" anywhere; every operation goes through an
//! explicit context.

use crate::events::{CanvasEvent, EventSink, NullSink};
use crate::group::{in_z_order, Group};
use crate::hit_test::{self, TargetRef};
use crate::options::CanvasOptions;
use crate::pointer::PointerEvent;
use crate::scene::Scene;
use crate::selection;
use crate::surface::{CacheSurface, PixmapCache};
use crate::transform::{self, ScaleBy, TransformAction, TransformSession};
use kurbo::Point;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Fatal misconfiguration of the canvas
///
/// User gestures never produce these; they indicate a programming error in
/// the caller and are reported synchronously instead of being absorbed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    /// A layer was created under a name already in use
    #[error("layer \"{0}\" already exists")]
    LayerExists(String),
}

#[derive(Clone, Copy, Debug, Default)]
struct LayerState {
    primary: bool,
    hidden: bool,
}

/// The interactive manipulation context for one drawing surface
pub struct Editor {
    /// Behavior flags
    pub options: CanvasOptions,

    /// The shapes being edited
    pub scene: Scene,

    cache: Box<dyn CacheSurface>,
    sink: Box<dyn EventSink>,
    active_object: Option<Uuid>,
    active_group: Option<Group>,
    current_transform: Option<TransformSession>,
    last_controls_target: Option<Uuid>,
    layers: HashMap<String, LayerState>,
}

impl Editor {
    /// Create an editor over an empty scene with an in-memory cache surface
    pub fn new(width: u32, height: u32, options: CanvasOptions) -> Self {
        Self {
            options,
            scene: Scene::new(),
            cache: Box::new(PixmapCache::new(width, height)),
            sink: Box::new(NullSink),
            active_object: None,
            active_group: None,
            current_transform: None,
            last_controls_target: None,
            layers: HashMap::new(),
        }
    }

    /// Replace the notification sink
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the cache surface
    pub fn with_cache(mut self, cache: Box<dyn CacheSurface>) -> Self {
        self.cache = cache;
        self
    }

    fn fire(&mut self, event: CanvasEvent) {
        self.sink.notify(event);
    }

    // ------------------------------------------------------------------
    // Target finding

    /// Re-render the scene into the cache surface
    ///
    /// Must run after any scene change before the next `find_target`; the
    /// pixel scan answers from this rendering. Members of an active group
    /// hold group-relative placements, so pointer hits over the group's
    /// area are answered by the group check in `find_target`, not by the
    /// pixel scan.
    pub fn refresh_cache(&mut self) {
        self.cache.render_scene(&self.scene);
    }

    /// Resolve the object under the pointer
    pub fn find_target(&self, pointer: Point, skip_group: bool) -> Option<TargetRef> {
        let last_controls = self
            .last_controls_target
            .and_then(|id| self.scene.shape(id));
        hit_test::find_target(
            &self.scene,
            self.cache.as_ref(),
            &self.options,
            self.active_group.as_ref(),
            last_controls,
            pointer,
            skip_group,
        )
    }

    /// Whether the pointer falls inside a shape's area or on its handles
    pub fn contains_point(&self, pointer: Point, id: Uuid) -> bool {
        match self.scene.shape(id) {
            Some(shape) => hit_test::contains_point(pointer, shape, self.active_group.as_ref()),
            None => false,
        }
    }

    /// Whether a shape is fully transparent around the given position
    pub fn is_target_transparent(&mut self, id: Uuid, x: f64, y: f64) -> bool {
        let Some(shape) = self.scene.shape(id) else {
            return true;
        };
        hit_test::is_target_transparent(
            self.cache.as_mut(),
            shape,
            x,
            y,
            self.options.target_find_tolerance,
        )
    }

    /// Record which object the renderer last decorated with handles
    ///
    /// Feeds the fast path of `find_target` when controls are drawn above
    /// the overlay.
    pub fn note_controls_drawn(&mut self, id: Option<Uuid>) {
        self.last_controls_target = id;
    }

    // ------------------------------------------------------------------
    // Selection

    /// Whether a pointer-down on `target` must clear the selection first
    pub fn should_clear_selection(&self, event: &PointerEvent, target: Option<TargetRef>) -> bool {
        let target_is_group = matches!(target, Some(TargetRef::Group));
        let shape = selection::as_shape(&self.scene, target);
        selection::should_clear_selection(event, shape, target_is_group, self.active_group.as_ref())
    }

    /// Whether a pointer-down on `target` is a group-editing gesture
    pub fn should_handle_group_click(
        &self,
        event: &PointerEvent,
        target: Option<TargetRef>,
    ) -> bool {
        if !event.shift_key || !self.options.selection {
            return false;
        }
        if self.active_group.is_some() {
            return true;
        }
        match (self.active_object, target) {
            (Some(active), Some(TargetRef::Shape(id))) => active != id,
            (Some(_), _) => true,
            _ => false,
        }
    }

    /// Shift-click group semantics
    ///
    /// Clicking the active group's area re-resolves the shape underneath
    /// it. A member click removes the member (collapsing a two-member
    /// group to a plain active object); an outside click adds the shape.
    /// With no group yet, clicking a second shape synthesizes a group over
    /// both, ordered by z.
    pub fn handle_group_click(&mut self, event: &PointerEvent, target: TargetRef) {
        let id = match target {
            TargetRef::Shape(id) => id,
            TargetRef::Group => {
                // Find the shape under the group's area, skipping the group
                match self.find_target(event.point(), true) {
                    Some(TargetRef::Shape(id)) => id,
                    _ => return,
                }
            }
        };
        if self.scene.shape(id).is_none() {
            return;
        }

        if let Some(mut group) = self.active_group.take() {
            if group.contains(id) {
                group.remove_with_update(id, &mut self.scene);
                if let Some(shape) = self.scene.shape_mut(id) {
                    shape.active = false;
                }
                if group.len() == 1 {
                    // A one-member group collapses to a plain active object
                    let remaining = group.members()[0];
                    group.destroy(&mut self.scene);
                    self.set_active_object(remaining, Some(event));
                    return;
                }
            } else {
                group.add_with_update(id, &mut self.scene);
                if let Some(shape) = self.scene.shape_mut(id) {
                    shape.active = true;
                }
            }
            group.active = true;
            self.active_group = Some(group);
            self.fire(CanvasEvent::SelectionCreated {
                target: TargetRef::Group,
                event: Some(*event),
            });
        } else {
            if let Some(active) = self.active_object {
                if active != id {
                    let members = in_z_order(&self.scene, &[active, id]);
                    for member in &members {
                        if let Some(shape) = self.scene.shape_mut(*member) {
                            shape.active = true;
                        }
                    }
                    let mut group = Group::new(members, &mut self.scene);
                    group.active = true;
                    self.active_object = None;
                    self.active_group = Some(group);
                    self.fire(CanvasEvent::SelectionCreated {
                        target: TargetRef::Group,
                        event: Some(*event),
                    });
                    return;
                }
            }
            if let Some(shape) = self.scene.shape_mut(id) {
                shape.active = true;
            }
        }
    }

    /// Make one shape the only active object
    pub fn set_active_object(&mut self, id: Uuid, event: Option<&PointerEvent>) {
        if let Some(previous) = self.active_object.take() {
            if previous != id {
                if let Some(shape) = self.scene.shape_mut(previous) {
                    shape.active = false;
                }
            }
        }
        let Some(shape) = self.scene.shape_mut(id) else {
            return;
        };
        shape.active = true;
        self.active_object = Some(id);
        log::debug!("object {id} selected");
        self.fire(CanvasEvent::ObjectSelected {
            id,
            event: event.copied(),
        });
    }

    /// The currently active object, if a single one is selected
    pub fn active_object(&self) -> Option<Uuid> {
        self.active_object
    }

    /// Drop the active object, if any
    pub fn discard_active_object(&mut self) {
        if let Some(id) = self.active_object.take() {
            if let Some(shape) = self.scene.shape_mut(id) {
                shape.active = false;
            }
        }
    }

    /// Install a group as the active selection
    ///
    /// Any previous group is torn down first, and the lone-active-object
    /// slot is cleared: at most one of the two is ever in effect.
    pub fn set_active_group(&mut self, mut group: Group) {
        self.discard_active_object();
        if let Some(previous) = self.active_group.take() {
            previous.destroy(&mut self.scene);
        }
        group.active = true;
        self.active_group = Some(group);
    }

    /// The currently active group
    pub fn active_group(&self) -> Option<&Group> {
        self.active_group.as_ref()
    }

    /// Tear down the active group, releasing its members
    pub fn discard_active_group(&mut self) {
        if let Some(group) = self.active_group.take() {
            group.destroy(&mut self.scene);
        }
    }

    /// Deactivate every shape and drop both selection slots
    pub fn deactivate_all(&mut self) {
        self.scene.deactivate_all();
        self.discard_active_group();
        self.active_object = None;
    }

    /// Deactivate everything, announcing the clear to listeners
    pub fn deactivate_all_with_dispatch(&mut self) {
        let cleared = if self.active_group.is_some() {
            Some(TargetRef::Group)
        } else {
            self.active_object.map(TargetRef::Shape)
        };
        if let Some(target) = cleared {
            self.fire(CanvasEvent::BeforeSelectionCleared { target });
        }
        self.deactivate_all();
        if cleared.is_some() {
            self.fire(CanvasEvent::SelectionCleared);
        }
    }

    /// Select by drag rectangle
    ///
    /// No captured shape is a no-op; one becomes the lone active object;
    /// several become a new active group in z-order. Callers clear any
    /// previous selection before the marquee drag starts.
    pub fn marquee_select(
        &mut self,
        corner_a: Point,
        corner_b: Point,
        event: Option<&PointerEvent>,
    ) {
        if !self.options.selection {
            return;
        }
        let captured = selection::find_enclosed(&self.scene, corner_a, corner_b);
        log::debug!("marquee captured {} shape(s)", captured.len());
        match captured.len() {
            0 => {}
            1 => self.set_active_object(captured[0], event),
            _ => {
                self.discard_active_object();
                for id in &captured {
                    if let Some(shape) = self.scene.shape_mut(*id) {
                        shape.active = true;
                    }
                }
                let mut group = Group::new(captured, &mut self.scene);
                group.active = true;
                self.active_group = Some(group);
                self.fire(CanvasEvent::SelectionCreated {
                    target: TargetRef::Group,
                    event: event.copied(),
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Transform sessions

    /// Begin a drag against a target, implicitly ending any live session
    ///
    /// A missing target is a no-op: clicking empty surface is an ordinary
    /// gesture, not an error.
    pub fn begin_transform(&mut self, event: &PointerEvent, target: TargetRef) {
        let session = match target {
            TargetRef::Shape(id) => {
                let Some(shape) = self.scene.shape(id) else {
                    return;
                };
                transform::setup(shape, target, event, self.options.center_transform)
            }
            TargetRef::Group => {
                let Some(group) = self.active_group.as_ref() else {
                    return;
                };
                transform::setup(group, target, event, self.options.center_transform)
            }
        };
        log::debug!("transform begin: {:?}", session.action);
        self.current_transform = Some(session);
    }

    /// The action of the live session, if one is in progress
    pub fn transform_in_progress(&self) -> Option<TransformAction> {
        self.current_transform.as_ref().map(|t| t.action)
    }

    /// The live session state
    pub fn transform_session(&self) -> Option<&TransformSession> {
        self.current_transform.as_ref()
    }

    /// Apply a pointer move to the live session, dispatching on its action
    ///
    /// Corner scaling is proportional by default; the multi-select
    /// modifier or the canvas-wide flag switches it to independent axes.
    pub fn transform_update(&mut self, event: &PointerEvent) {
        let Some(action) = self.transform_in_progress() else {
            return;
        };
        match action {
            TransformAction::Drag => self.transform_move(event.x, event.y),
            TransformAction::ScaleX => self.transform_scale(event.x, event.y, ScaleBy::X),
            TransformAction::ScaleY => self.transform_scale(event.x, event.y, ScaleBy::Y),
            TransformAction::Scale => {
                let by = if event.shift_key || self.options.uni_scale_transform {
                    ScaleBy::Both
                } else {
                    ScaleBy::Equally
                };
                self.transform_scale(event.x, event.y, by)
            }
            TransformAction::Rotate => self.transform_rotate(event.x, event.y),
        }
    }

    /// Translate the session target to the pointer
    pub fn transform_move(&mut self, x: f64, y: f64) {
        let Some(session) = self.current_transform.as_ref() else {
            return;
        };
        match session.target {
            TargetRef::Shape(id) => {
                if let Some(shape) = self.scene.shape_mut(id) {
                    transform::translate(shape, session, x, y);
                }
            }
            TargetRef::Group => {
                if let Some(group) = self.active_group.as_mut() {
                    transform::translate(group, session, x, y);
                }
            }
        }
    }

    /// Scale the session target toward the pointer
    pub fn transform_scale(&mut self, x: f64, y: f64, by: ScaleBy) {
        let Some(session) = self.current_transform.as_mut() else {
            return;
        };
        match session.target {
            TargetRef::Shape(id) => {
                if let Some(shape) = self.scene.shape_mut(id) {
                    transform::scale(shape, session, x, y, by);
                }
            }
            TargetRef::Group => {
                if let Some(group) = self.active_group.as_mut() {
                    transform::scale(group, session, x, y, by);
                }
            }
        }
    }

    /// Rotate the session target toward the pointer
    pub fn transform_rotate(&mut self, x: f64, y: f64) {
        let Some(session) = self.current_transform.as_ref() else {
            return;
        };
        match session.target {
            TargetRef::Shape(id) => {
                if let Some(shape) = self.scene.shape_mut(id) {
                    transform::rotate(shape, session, x, y);
                }
            }
            TargetRef::Group => {
                if let Some(group) = self.active_group.as_mut() {
                    transform::rotate(group, session, x, y);
                }
            }
        }
    }

    /// End the live session, keeping the target as it is
    pub fn end_transform(&mut self) {
        if self.current_transform.take().is_some() {
            log::debug!("transform ended");
        }
    }

    /// End the live session, restoring the drag-start snapshot
    pub fn cancel_transform(&mut self) {
        let Some(session) = self.current_transform.take() else {
            return;
        };
        match session.target {
            TargetRef::Shape(id) => {
                if let Some(shape) = self.scene.shape_mut(id) {
                    transform::restore(shape, &session);
                }
            }
            TargetRef::Group => {
                if let Some(group) = self.active_group.as_mut() {
                    transform::restore(group, &session);
                }
            }
        }
        log::debug!("transform cancelled");
    }

    // ------------------------------------------------------------------
    // Layer registry

    /// Register a named surface layer
    ///
    /// Duplicate names are a hard error: this is caller misconfiguration,
    /// never a user gesture.
    pub fn create_layer(&mut self, name: &str, primary: bool) -> Result<(), EditorError> {
        if self.layers.contains_key(name) {
            return Err(EditorError::LayerExists(name.to_string()));
        }
        self.layers.insert(
            name.to_string(),
            LayerState {
                primary,
                hidden: false,
            },
        );
        log::debug!("layer {name:?} created");
        Ok(())
    }

    /// Hide a layer, if it exists
    pub fn hide_layer(&mut self, name: &str) {
        if let Some(layer) = self.layers.get_mut(name) {
            layer.hidden = true;
        }
    }

    /// Show a layer, if it exists
    pub fn show_layer(&mut self, name: &str) {
        if let Some(layer) = self.layers.get_mut(name) {
            layer.hidden = false;
        }
    }

    /// Show every registered layer
    pub fn show_all_layers(&mut self) {
        for layer in self.layers.values_mut() {
            layer.hidden = false;
        }
    }

    /// Whether the named layer exists and is hidden
    pub fn layer_hidden(&self, name: &str) -> Option<bool> {
        self.layers.get(name).map(|l| l.hidden)
    }

    /// Whether the named layer is the primary one
    pub fn layer_primary(&self, name: &str) -> Option<bool> {
        self.layers.get(name).map(|l| l.primary)
    }
}
