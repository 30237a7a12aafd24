//! Host-facing seams.
//!
//! The learning platform owns the course data, the permission system and the
//! completion subsystem. The renderer only ever talks to them through the
//! narrow traits in this module, so every builder can be exercised against an
//! in-memory course instead of a live platform. `CourseSnapshot` is that
//! in-memory implementation, loadable from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::types::{
    Activity, ActivityId, CompletionState, Course, Section, SectionId, Viewer,
};

/// Course format name; rename requests for sections of any other format are
/// refused.
pub const FORMAT_NAME: &str = "sommario";

/// Faults surfaced by the host stand-in. Everything locally absent
/// (no tracked activities, no next section) is `Option`, never an error.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("section {0} not found")]
    SectionNotFound(u64),

    #[error("section {0} does not belong to a {FORMAT_NAME}-format course")]
    ForeignFormat(u64),

    #[error("unknown inplace-editable item type: {0}")]
    UnknownItemType(String),
}

/// Permission checks the render pass needs.
pub trait CapabilityCheck {
    /// Elevated permission to see hidden sections.
    fn can_view_hidden(&self) -> bool;

    /// Permission to add, edit, move and delete sections.
    fn can_manage_sections(&self) -> bool;
}

impl CapabilityCheck for Viewer {
    fn can_view_hidden(&self) -> bool {
        self.can_view_hidden
    }

    fn can_manage_sections(&self) -> bool {
        self.can_manage_sections
    }
}

/// Per-activity completion lookup for the current viewer.
pub trait CompletionLookup {
    /// Whether completion tracking is enabled for this activity.
    fn is_enabled(&self, activity: &Activity) -> bool;

    /// The viewer's completion state for this activity.
    fn state(&self, activity: &Activity) -> CompletionState;
}

/// Read access to a course's sections and activities, plus the one write the
/// host delegates back to us: renaming a section in place.
pub trait SectionRepository {
    fn course(&self) -> &Course;

    /// All sections in stored order (ascending section number).
    fn sections(&self) -> &[Section];

    fn section_by_id(&self, id: SectionId) -> Option<&Section>;

    fn section_by_number(&self, number: u32) -> Option<&Section>;

    /// Activities belonging to the given section, in stored order.
    fn activities_in(&self, section_number: u32) -> Vec<&Activity>;

    /// Rename a section, returning the updated row. The row must belong to a
    /// course using our format.
    fn rename_section(&mut self, id: SectionId, new_name: &str) -> Result<Section, HostError>;
}

/// One course as loaded for the current request: the course row, its
/// sections, its activities and the viewer's completion states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseSnapshot {
    pub course: Course,
    pub sections: Vec<Section>,

    #[serde(default)]
    pub activities: Vec<Activity>,

    /// Completion state per activity id. Absent entries are incomplete.
    #[serde(default)]
    pub completion: BTreeMap<u64, CompletionState>,
}

impl CourseSnapshot {
    pub fn new(course: Course, sections: Vec<Section>, activities: Vec<Activity>) -> Self {
        let mut snapshot = Self {
            course,
            sections,
            activities,
            completion: BTreeMap::new(),
        };
        snapshot.sections.sort_by_key(|s| s.number);
        snapshot
    }

    /// Load a snapshot from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read course snapshot: {}", path.display()))?;
        let mut snapshot: CourseSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse course snapshot: {}", path.display()))?;
        snapshot.sections.sort_by_key(|s| s.number);
        debug!(
            course = %snapshot.course.shortname,
            sections = snapshot.sections.len(),
            activities = snapshot.activities.len(),
            "Loaded course snapshot"
        );
        Ok(snapshot)
    }

    /// Record the viewer's completion state for an activity.
    pub fn set_completion(&mut self, id: ActivityId, state: CompletionState) {
        self.completion.insert(id.0, state);
    }
}

impl CompletionLookup for CourseSnapshot {
    fn is_enabled(&self, activity: &Activity) -> bool {
        activity.completion_enabled()
    }

    fn state(&self, activity: &Activity) -> CompletionState {
        self.completion
            .get(&activity.id.0)
            .copied()
            .unwrap_or_default()
    }
}

impl SectionRepository for CourseSnapshot {
    fn course(&self) -> &Course {
        &self.course
    }

    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn section_by_id(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn section_by_number(&self, number: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.number == number)
    }

    fn activities_in(&self, section_number: u32) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|a| a.section == section_number)
            .collect()
    }

    fn rename_section(&mut self, id: SectionId, new_name: &str) -> Result<Section, HostError> {
        if self.course.format != FORMAT_NAME {
            return Err(HostError::ForeignFormat(id.0));
        }
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(HostError::SectionNotFound(id.0))?;
        section.name = if new_name.is_empty() {
            None
        } else {
            Some(new_name.to_string())
        };
        Ok(section.clone())
    }
}
