//! Tracked-user snapshot types
//!
//! These are the values the tracker exposes once per tick. Positions are in
//! millimetres in the sensor's coordinate frame (x right, y up, z away from
//! the sensor).

use serde::{Deserialize, Serialize};

/// A point or offset in sensor space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise sum
    pub fn offset(self, other: Vector3) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

/// Skeleton joints reported for a tracked user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointKind {
    Head,
    Neck,
    Torso,
    LeftShoulder,
    LeftElbow,
    LeftHand,
    RightShoulder,
    RightElbow,
    RightHand,
    LeftHip,
    LeftKnee,
    LeftFoot,
    RightHip,
    RightKnee,
    RightFoot,
}

impl JointKind {
    /// Every joint, in skeleton order
    pub const ALL: [JointKind; 15] = [
        JointKind::Head,
        JointKind::Neck,
        JointKind::Torso,
        JointKind::LeftShoulder,
        JointKind::LeftElbow,
        JointKind::LeftHand,
        JointKind::RightShoulder,
        JointKind::RightElbow,
        JointKind::RightHand,
        JointKind::LeftHip,
        JointKind::LeftKnee,
        JointKind::LeftFoot,
        JointKind::RightHip,
        JointKind::RightKnee,
        JointKind::RightFoot,
    ];
}

/// One joint of a skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub kind: JointKind,
    pub position: Vector3,
    /// Tracking confidence in `[0, 1]`
    pub confidence: f32,
}

/// A user currently visible to the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedUser {
    pub id: u32,
    pub center_of_mass: Vector3,
    /// False while the user is detected but the skeleton is not yet calibrated
    pub skeleton_tracked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joints: Vec<Joint>,
}

impl TrackedUser {
    /// Look up a joint by kind
    pub fn joint(&self, kind: JointKind) -> Option<&Joint> {
        self.joints.iter().find(|j| j.kind == kind)
    }
}

/// Immutable view of the tracker state at one tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    pub tick: u64,
    /// Unix timestamp in milliseconds when the snapshot was taken
    pub captured_at_ms: i64,
    #[serde(default)]
    pub users: Vec<TrackedUser>,
}

impl TrackerSnapshot {
    /// Get the number of users in view
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
