//! Scene ownership
//!
//! The scene owns every shape in z-order (index 0 is the bottom of the
//! stack) and hands out the serial color identities the hit-test cache
//! encodes into its pixels.

use crate::shape::Shape;
use crate::surface::decode_serial;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Z-ordered collection of shapes on one drawing surface
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scene {
    shapes: Vec<Shape>,
    next_serial: u32,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            next_serial: 1,
        }
    }

    /// Add a shape on top of the stack, assigning its serial identity
    pub fn add_shape(&mut self, mut shape: Shape) -> Uuid {
        if self.next_serial == 0 {
            self.next_serial = 1;
        }
        shape.serial = self.next_serial;
        self.next_serial += 1;
        let id = shape.id;
        self.shapes.push(shape);
        id
    }

    /// Remove a shape, preserving the order of the rest
    pub fn remove_shape(&mut self, id: Uuid) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    /// All shapes, bottom to top
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// All shapes, mutable
    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    /// Look up a shape by id
    pub fn shape(&self, id: Uuid) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Look up a shape by id, mutable
    pub fn shape_mut(&mut self, id: Uuid) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Z index of a shape (0 = bottom)
    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    /// Resolve a cache-surface pixel back to the shape it encodes
    pub fn shape_by_serial_color(&self, r: u8, g: u8, b: u8, a: u8) -> Option<&Shape> {
        let serial = decode_serial(r, g, b, a)?;
        self.shapes.iter().find(|s| s.serial == serial)
    }

    /// Number of shapes in the scene
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the scene holds no shapes
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Drop selection decorations from every shape
    pub fn deactivate_all(&mut self) {
        for shape in &mut self.shapes {
            shape.active = false;
        }
    }
}
