//! Simulated skeleton tracker
//!
//! Produces a small population of users that walk in and out of view and
//! move their limbs. Motion is a pure function of the tick counter, so runs
//! are reproducible.

use tracing::{debug, info};

use super::{SourceError, StateSource};
use crate::types::{Joint, JointKind, TrackedUser, TrackerSnapshot, Vector3};
use crate::utils::now_millis;

/// Distance from the sensor users hover around, in millimetres
const BASE_DEPTH_MM: f32 = 2200.0;

/// Tuning for [`SimulatedTracker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Number of user slots; each slot is in view most of the time
    pub max_users: usize,
    /// Ticks for one enter/leave cycle of a user slot
    pub presence_cycle_ticks: u64,
    /// Ticks a user is in view before its skeleton is reported
    pub calibration_ticks: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_users: 2,
            presence_cycle_ticks: 400,
            calibration_ticks: 20,
        }
    }
}

/// Deterministic stand-in for a depth-camera user tracker
#[derive(Debug)]
pub struct SimulatedTracker {
    config: TrackerConfig,
    initialized: bool,
    tick: u64,
    users: Vec<TrackedUser>,
}

impl SimulatedTracker {
    /// Create a tracker with the given tuning
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            initialized: false,
            tick: 0,
            users: Vec::new(),
        }
    }

    /// Create a tracker with `max_users` slots and default timing
    pub fn with_users(max_users: usize) -> Self {
        Self::new(TrackerConfig {
            max_users,
            ..TrackerConfig::default()
        })
    }

    /// Check if `initialize` has run and `shutdown` has not
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of ticks taken since initialization
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    fn user_for_slot(&self, slot: usize) -> Option<TrackedUser> {
        let cycle = self.config.presence_cycle_ticks.max(1);
        // Stagger slots so users do not all enter at once
        let stagger = cycle / (self.config.max_users as u64).saturating_add(1);
        let phase = self
            .tick
            .wrapping_add((slot as u64).wrapping_mul(stagger))
            % cycle;

        // In view for three quarters of the cycle
        if phase >= cycle * 3 / 4 {
            return None;
        }

        let t = self.tick as f32 * 0.05 + slot as f32 * 1.7;
        let center_of_mass = Vector3::new(
            t.sin() * 800.0,
            -50.0,
            BASE_DEPTH_MM + (t * 0.5).cos() * 400.0,
        );

        let skeleton_tracked = phase >= self.config.calibration_ticks;
        let joints = if skeleton_tracked {
            skeleton(center_of_mass, t)
        } else {
            Vec::new()
        };

        Some(TrackedUser {
            id: u32::try_from(slot).map_or(u32::MAX, |s| s.saturating_add(1)),
            center_of_mass,
            skeleton_tracked,
            joints,
        })
    }
}

impl Default for SimulatedTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl StateSource for SimulatedTracker {
    type Snapshot = TrackerSnapshot;

    fn initialize(&mut self) -> Result<(), SourceError> {
        self.initialized = true;
        self.tick = 0;
        self.users.clear();
        info!(max_users = self.config.max_users, "tracker initialized");
        Ok(())
    }

    fn tick(&mut self) -> Result<(), SourceError> {
        if !self.initialized {
            return Err(SourceError::NotInitialized);
        }
        self.tick += 1;

        let previous = self.users.len();
        self.users = (0..self.config.max_users)
            .filter_map(|slot| self.user_for_slot(slot))
            .collect();
        if self.users.len() != previous {
            debug!(tick = self.tick, users = self.users.len(), "users in view changed");
        }
        Ok(())
    }

    fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            tick: self.tick,
            captured_at_ms: now_millis(),
            users: self.users.clone(),
        }
    }

    fn shutdown(&mut self) {
        self.initialized = false;
        self.users.clear();
        info!(ticks = self.tick, "tracker shut down");
    }
}

/// Joint positions for a standing user waving both arms
fn skeleton(com: Vector3, t: f32) -> Vec<Joint> {
    let wave = (t * 3.0).sin() * 250.0;
    JointKind::ALL
        .iter()
        .map(|&kind| {
            let offset = match kind {
                JointKind::Head => Vector3::new(0.0, 600.0, 0.0),
                JointKind::Neck => Vector3::new(0.0, 450.0, 0.0),
                JointKind::Torso => Vector3::new(0.0, 200.0, 0.0),
                JointKind::LeftShoulder => Vector3::new(-180.0, 420.0, 0.0),
                JointKind::LeftElbow => Vector3::new(-330.0, 250.0 + wave * 0.5, 0.0),
                JointKind::LeftHand => Vector3::new(-420.0, 100.0 + wave, -80.0),
                JointKind::RightShoulder => Vector3::new(180.0, 420.0, 0.0),
                JointKind::RightElbow => Vector3::new(330.0, 250.0 - wave * 0.5, 0.0),
                JointKind::RightHand => Vector3::new(420.0, 100.0 - wave, -80.0),
                JointKind::LeftHip => Vector3::new(-110.0, 0.0, 0.0),
                JointKind::LeftKnee => Vector3::new(-120.0, -420.0, 20.0),
                JointKind::LeftFoot => Vector3::new(-130.0, -820.0, 40.0),
                JointKind::RightHip => Vector3::new(110.0, 0.0, 0.0),
                JointKind::RightKnee => Vector3::new(120.0, -420.0, 20.0),
                JointKind::RightFoot => Vector3::new(130.0, -820.0, 40.0),
            };
            let confidence = match kind {
                JointKind::LeftHand | JointKind::RightHand => 0.5,
                _ => 1.0,
            };
            Joint {
                kind,
                position: com.offset(offset),
                confidence,
            }
        })
        .collect()
}
