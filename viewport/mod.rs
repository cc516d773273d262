/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Pan/zoom transform between screen space and model space.
//!
//! The viewport owns a screen-space offset, a uniform scale clamped to
//! zoom bounds, and the visible extent. Zooming is anchored: the model
//! point under the anchor stays under it after the scale change.

use euclid::default::{Point2D, Vector2D};

/// Minimum zoom factor.
pub const MIN_ZOOM: f32 = 0.1;

/// Maximum zoom factor.
pub const MAX_ZOOM: f32 = 3.0;

/// Screen↔model coordinate mapper with pan offset and clamped scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Screen-space translation applied after scaling.
    pub offset: Vector2D<f32>,

    /// Uniform zoom factor, always within [`MIN_ZOOM`, `MAX_ZOOM`].
    scale: f32,

    /// Visible extent in screen pixels. Anchored top-left; resizing never
    /// moves the transform.
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Identity transform over the given extent.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            offset: Vector2D::zero(),
            scale: 1.0,
            width,
            height,
        }
    }

    /// Current zoom factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Clamp a zoom value to the allowed range.
    pub fn clamp_scale(scale: f32) -> f32 {
        scale.clamp(MIN_ZOOM, MAX_ZOOM)
    }

    /// Map a screen point into model space.
    pub fn screen_to_model(&self, screen: Point2D<f32>) -> Point2D<f32> {
        Point2D::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Map a model point into screen space.
    pub fn model_to_screen(&self, model: Point2D<f32>) -> Point2D<f32> {
        Point2D::new(
            model.x * self.scale + self.offset.x,
            model.y * self.scale + self.offset.y,
        )
    }

    /// Scale by `factor` while keeping the model point under the screen
    /// anchor fixed.
    pub fn zoom_at(&mut self, anchor_x: f32, anchor_y: f32, factor: f32) {
        let new_scale = Self::clamp_scale(self.scale * factor);
        let ratio = new_scale / self.scale;
        self.offset.x = anchor_x - (anchor_x - self.offset.x) * ratio;
        self.offset.y = anchor_y - (anchor_y - self.offset.y) * ratio;
        self.scale = new_scale;
    }

    /// Translate by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// Update the visible extent. Offset and scale are untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Reset to the identity transform, keeping the extent.
    pub fn reset(&mut self) {
        self.offset = Vector2D::zero();
        self.scale = 1.0;
    }

    /// Center of the visible extent in screen space.
    pub fn center(&self) -> Point2D<f32> {
        Point2D::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
