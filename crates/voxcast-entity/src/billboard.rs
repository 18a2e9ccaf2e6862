//! Billboard frames and view-angle selection.
//!
//! An entity is drawn as a camera-facing rectangle whose image depends on
//! where the viewer stands around it. Frame 0 is seen from the front and the
//! rest split the remaining directions into equal sectors.

use std::f64::consts::TAU;

use glam::{DVec2, DVec3};
use voxcast_core::constants::EPSILON;

/// Size of one billboard image in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillboardFrame {
    pub width: f64,
    pub height: f64,
}

impl BillboardFrame {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The frame an entity shows to a particular viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservedBillboard {
    pub frame_index: usize,
    pub width: f64,
    pub height: f64,
}

/// Frames for every view angle of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct BillboardAnimation {
    frames: Vec<BillboardFrame>,
}

impl BillboardAnimation {
    /// Animation with one frame per view sector.
    ///
    /// Returns `None` for an empty frame list.
    pub fn new(frames: Vec<BillboardFrame>) -> Option<Self> {
        (!frames.is_empty()).then_some(Self { frames })
    }

    /// Same image from every side.
    pub fn single(frame: BillboardFrame) -> Self {
        Self {
            frames: vec![frame],
        }
    }

    pub fn frames(&self) -> &[BillboardFrame] {
        &self.frames
    }

    /// Frame index seen by `viewer` for an entity at `position` facing `facing`.
    pub fn frame_index(&self, position: DVec3, facing: DVec2, viewer: DVec3) -> usize {
        let count = self.frames.len();
        if count <= 1 {
            return 0;
        }

        let to_viewer = DVec2::new(viewer.x - position.x, viewer.z - position.z);
        if to_viewer.length_squared() < EPSILON || facing.length_squared() < EPSILON {
            return 0;
        }

        let angle = facing
            .perp_dot(to_viewer)
            .atan2(facing.dot(to_viewer))
            .rem_euclid(TAU);
        let sector = TAU / count as f64;
        ((angle + sector * 0.5) / sector).floor() as usize % count
    }

    /// Frame seen by `viewer`.
    pub fn observe(&self, position: DVec3, facing: DVec2, viewer: DVec3) -> ObservedBillboard {
        let frame_index = self.frame_index(position, facing, viewer);
        let frame = self.frames[frame_index];
        ObservedBillboard {
            frame_index,
            width: frame.width,
            height: frame.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_sided() -> BillboardAnimation {
        BillboardAnimation::new(vec![
            BillboardFrame::new(1.0, 2.0),
            BillboardFrame::new(0.5, 2.0),
            BillboardFrame::new(0.8, 2.0),
            BillboardFrame::new(0.5, 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn empty_animation_is_rejected() {
        assert!(BillboardAnimation::new(Vec::new()).is_none());
    }

    #[test]
    fn front_and_back() {
        let anim = four_sided();
        let facing = DVec2::Y;
        assert_eq!(anim.frame_index(DVec3::ZERO, facing, DVec3::new(0.0, 1.0, 5.0)), 0);
        assert_eq!(anim.frame_index(DVec3::ZERO, facing, DVec3::new(0.0, 1.0, -5.0)), 2);
    }

    #[test]
    fn sides_are_distinct() {
        let anim = four_sided();
        let facing = DVec2::Y;
        let left = anim.frame_index(DVec3::ZERO, facing, DVec3::new(5.0, 0.0, 0.0));
        let right = anim.frame_index(DVec3::ZERO, facing, DVec3::new(-5.0, 0.0, 0.0));
        assert_ne!(left, right);
        assert!(left == 1 || left == 3);
        assert!(right == 1 || right == 3);
    }

    #[test]
    fn sector_boundaries_round_to_nearest() {
        let anim = four_sided();
        // 30 degrees off the front is still the front frame.
        let viewer = DVec3::new(30f64.to_radians().sin(), 0.0, 30f64.to_radians().cos());
        assert_eq!(anim.frame_index(DVec3::ZERO, DVec2::Y, viewer), 0);
    }

    #[test]
    fn viewer_on_top_sees_front() {
        let anim = four_sided();
        let observed = anim.observe(DVec3::ONE, DVec2::Y, DVec3::new(1.0, 9.0, 1.0));
        assert_eq!(observed.frame_index, 0);
        assert_eq!(observed.width, 1.0);
        assert_eq!(observed.height, 2.0);
    }
}
