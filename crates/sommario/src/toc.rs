//! Table of contents assembly and next-section lookup.

use crate::host::{CapabilityCheck, CompletionLookup, SectionRepository};
use crate::progress;
use crate::types::{Section, SectionId, Viewer};
use crate::urls;
use crate::view::{AddSection, NextSection, Toc, TocEntry};

/// Display name for a section: the explicit override when set, otherwise the
/// default naming scheme.
pub fn section_name(section: &Section) -> String {
    match section.display_name() {
        Some(name) => name.to_string(),
        None if section.number == 0 => "Course home".to_string(),
        // The default for every later section is the same, the number is
        // deliberately not interpolated.
        None => "New section".to_string(),
    }
}

/// Build the table of contents for the course.
///
/// Hidden sections are listed only for viewers with the view-hidden
/// permission. Section 0 always links to the course root and carries the
/// course-home style class, whatever its name or visibility.
pub fn build_toc<H>(host: &H, viewer: &Viewer, active: Option<SectionId>, sesskey: &str) -> Toc
where
    H: SectionRepository + CompletionLookup + ?Sized,
{
    let course = host.course();
    let mut entries = Vec::new();

    for section in host.sections() {
        if !section.visible && !viewer.can_view_hidden() {
            continue;
        }

        let course_home = section.number == 0;
        let url = if course_home {
            urls::course_view(course.id)
        } else {
            urls::section_view(section.id)
        };

        // Progress is a student-facing affordance; edit mode swaps it out
        // for the edit controls.
        let progress = if course.enable_completion && !viewer.editing {
            progress::section_progress(section, host, host)
        } else {
            None
        };

        entries.push(TocEntry {
            name: section_name(section),
            url,
            visible: section.visible,
            active: active == Some(section.id),
            highlighted: course.marker != 0 && section.number == course.marker,
            course_home,
            progress,
        });
    }

    let add_section = viewer.can_manage_sections().then(|| AddSection {
        url: urls::add_section(course.id, host.sections().len(), sesskey),
        title: "Add section".to_string(),
    });

    Toc { entries, add_section }
}

/// First section after the landing area that this viewer can open.
///
/// Scans numbers 1.. upward; hidden sections match only for privileged
/// viewers and are flagged. `None` for e.g. a single-section course.
pub fn next_visible_section<H>(host: &H, viewer: &Viewer) -> Option<NextSection>
where
    H: SectionRepository + ?Sized,
{
    host.sections()
        .iter()
        .filter(|s| s.number >= 1)
        .find(|s| s.visible || viewer.can_view_hidden())
        .map(|s| NextSection {
            name: section_name(s),
            url: urls::section_view(s.id),
            hidden_from_students: !s.visible,
        })
}
