use serde::{Deserialize, Serialize};

/// Course row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub u64);

/// Section row id. Distinct from the section *number*: the number is the
/// position within the course (0..N, 0 is the landing area), the id is the
/// host's database key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u64);

/// Activity (course module) row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub u64);

/// A course as the host hands it to the renderer. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,

    /// Short display name.
    pub shortname: String,

    /// Course format name; renames are only accepted for our own format.
    pub format: String,

    /// Highlighted section number, 0 when no section is highlighted.
    #[serde(default)]
    pub marker: u32,

    /// Whether completion tracking is enabled for the course.
    #[serde(default)]
    pub enable_completion: bool,
}

/// An ordered, named container of activities within a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub course: CourseId,

    /// Position within the course. 0 is the course landing area.
    pub number: u32,

    /// Explicit name override; `None` or empty means the default naming
    /// scheme applies.
    #[serde(default)]
    pub name: Option<String>,

    pub visible: bool,

    #[serde(default)]
    pub summary: String,
}

impl Section {
    /// The explicit name, if one is set and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// How completion is tracked for an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompletionTracking {
    #[default]
    None,
    Manual,
    Automatic,
}

/// Per-activity per-viewer completion state, supplied by the host's
/// completion subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    #[default]
    Incomplete,
    Complete,
    CompletePass,
    CompleteFail,
}

impl CompletionState {
    /// Whether this state counts towards section progress. A failed
    /// completion is tracked but not complete.
    pub fn counts_complete(self) -> bool {
        matches!(self, CompletionState::Complete | CompletionState::CompletePass)
    }
}

/// A gradable/trackable unit placed within a section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub id: ActivityId,

    /// Number of the owning section.
    pub section: u32,

    pub name: String,

    /// Whether the current viewer can see this activity at all.
    pub user_visible: bool,

    #[serde(default)]
    pub completion: CompletionTracking,
}

impl Activity {
    pub fn completion_enabled(&self) -> bool {
        self.completion != CompletionTracking::None
    }
}

/// The current viewer's capabilities and mode, resolved by the host before
/// the render pass starts. Replaces the ambient global user state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// Elevated permission to see hidden sections.
    pub can_view_hidden: bool,

    /// Permission to manage sections (add/edit/move/delete).
    pub can_manage_sections: bool,

    /// Whether the page is being viewed in edit mode.
    pub editing: bool,
}

impl Viewer {
    /// A plain student: no elevated permissions, not editing.
    pub fn student() -> Self {
        Self {
            can_view_hidden: false,
            can_manage_sections: false,
            editing: false,
        }
    }

    /// A course editor in edit mode.
    pub fn editor() -> Self {
        Self {
            can_view_hidden: true,
            can_manage_sections: true,
            editing: true,
        }
    }
}

/// Query parameters consumed from the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Target section id, set on the dedicated section page.
    pub active_section: Option<SectionId>,

    /// Section number when a single section is being displayed.
    pub single_section: Option<u32>,

    /// Legacy numeric alias for `single_section`; redirected to the
    /// canonical parameter.
    pub legacy_topic: Option<u32>,

    /// Section number to expand; redirected to that section's page.
    pub expand_section: Option<u32>,

    /// Set right after a new section was created; triggers a client-side
    /// redirect to the section edit page.
    pub new_section_redirect: bool,
}
