use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::frame::Frame;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame {index} ({name}): duration must be positive, got {duration}")]
    NonPositiveDuration {
        index: usize,
        name: String,
        duration: f64,
    },
    #[error("frame {index} ({name}): {field} is not a finite number")]
    NonFinite {
        index: usize,
        name: String,
        field: &'static str,
    },
}

/// An espresso brewing profile: an ordered list of frames plus metadata.
///
/// Frame order is brewing order; it is the only sequencing mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl Default for Profile {
    /// The profile a fresh editor starts with.
    fn default() -> Self {
        Self {
            name: "New Profile".into(),
            description: Some("A simple profile that sends water out the portafilter bit.".into()),
            author: Some("Nobody of Note".into()),
            frames: vec![Frame::with_defaults("Infuse")],
        }
    }
}

impl Profile {
    /// A profile with a name and no frames.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            author: None,
            frames: Vec::new(),
        }
    }

    /// Total shot duration in seconds.
    pub fn total_duration(&self) -> f64 {
        self.frames.iter().map(|f| f.duration).sum()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Seconds elapsed before the frame at `index` starts.
    pub fn frame_start(&self, index: usize) -> Option<f64> {
        if index >= self.frames.len() {
            return None;
        }
        Some(self.frames[..index].iter().map(|f| f.duration).sum())
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        self.frames
            .iter()
            .enumerate()
            .try_for_each(|(i, f)| f.validate(i))
    }
}

/// Parse a profile from JSON and check every frame's invariants.
pub fn parse_profile(data: &[u8]) -> Result<Profile, ProfileError> {
    let profile: Profile = serde_json::from_slice(data)?;
    profile.validate()?;
    Ok(profile)
}
