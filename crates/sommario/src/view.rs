//! Typed view-model records, one per template region.
//!
//! Every optional field is explicit: a field is `Option`/`bool` here exactly
//! when the template has a conditional branch for it. The whole tree is
//! rebuilt on every render and discarded after producing output.

/// Per-section completion summary. Built only when the section has at least
/// one tracked, user-visible activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionProgress {
    /// Tracked, user-visible activities in the section.
    pub total: u32,

    /// Of those, how many the viewer has completed.
    pub complete: u32,

    /// round(100 * complete / total).
    pub percentage: u8,

    /// Set iff the percentage rounds to 100.
    pub done: bool,
}

/// One row in the table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub name: String,
    pub url: String,

    /// False for sections hidden from students (only editors see these rows).
    pub visible: bool,

    /// Matches the current request's target section.
    pub active: bool,

    /// Matches the course marker.
    pub highlighted: bool,

    /// Section 0 links to the course root and gets its own style class.
    pub course_home: bool,

    /// Absent when completion is off, the viewer is editing, or the section
    /// has no tracked activities.
    pub progress: Option<SectionProgress>,
}

/// The "add new section" affordance, present for section managers only.
#[derive(Debug, Clone, PartialEq)]
pub struct AddSection {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Toc {
    pub entries: Vec<TocEntry>,
    pub add_section: Option<AddSection>,
}

/// Link to the first visible section after the landing area.
#[derive(Debug, Clone, PartialEq)]
pub struct NextSection {
    pub name: String,
    pub url: String,

    /// The section is hidden from students but shown to this viewer.
    pub hidden_from_students: bool,
}

/// The edit-action menu for one section. Show/hide and
/// highlight/unhighlight are mutually exclusive pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionActions {
    pub edit_url: String,
    pub move_url: String,
    pub show_url: Option<String>,
    pub hide_url: Option<String>,
    pub highlight_url: Option<String>,
    pub unhighlight_url: Option<String>,
    pub duplicate_url: String,
    pub delete_url: String,
}

/// One activity row inside a section body.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityView {
    pub name: String,

    /// `None` when the activity is not completion-tracked.
    pub completed: Option<bool>,
}

/// A rendered section body.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub name: String,
    pub number: u32,
    pub hidden: bool,
    pub highlighted: bool,
    pub summary: String,
    pub activities: Vec<ActivityView>,

    /// Edit affordance, present when the viewer is editing.
    pub edit_url: Option<String>,
}

/// Everything one page render hands to the template layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub course_name: String,

    /// Page heading: the displayed section's name.
    pub section_name: String,

    pub can_edit: bool,
    pub toc: Toc,

    /// Section 0 promoted to its own slot, shown on the landing view.
    pub first_section: Option<SectionView>,

    /// Next-section affordance for the landing view.
    pub next_section: Option<NextSection>,

    /// Body of the single section being displayed, when there is one and it
    /// is not section 0.
    pub single_section: Option<SectionView>,

    /// Action menu for the single section, when editing.
    pub section_actions: Option<SectionActions>,
}

/// Outcome of one render pass: either the page, or a redirect the caller
/// must perform.
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    /// Server-side HTTP redirect.
    Redirect(String),

    /// Client-side redirect: render a stub that hides the page and jumps via
    /// script. Used after section creation, where only the browser is in a
    /// position to follow through.
    ClientRedirect(String),

    Render(Box<PageView>),
}
