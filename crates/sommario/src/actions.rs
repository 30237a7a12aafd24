//! Section action-menu URLs.

use crate::types::{Course, Section};
use crate::urls;
use crate::view::SectionActions;

/// Build the edit-action menu for one section.
///
/// Show/hide and highlight/unhighlight each resolve to exactly one URL,
/// picked from the section's current state. No permission checks happen
/// here; the host endpoint behind each URL is the authority.
pub fn section_actions(course: &Course, section: &Section, sesskey: &str) -> SectionActions {
    let hidden = !section.visible;
    let is_marker = course.marker != 0 && section.number == course.marker;

    SectionActions {
        edit_url: urls::edit_section(section.id, section.number, sesskey),
        move_url: urls::move_section(course.id, section.number, sesskey),
        show_url: hidden
            .then(|| urls::show_section(course.id, section.id, section.number, sesskey)),
        hide_url: (!hidden)
            .then(|| urls::hide_section(course.id, section.id, section.number, sesskey)),
        highlight_url: (!is_marker)
            .then(|| urls::set_marker(course.id, section.id, section.number, sesskey)),
        unhighlight_url: is_marker.then(|| urls::set_marker(course.id, section.id, 0, sesskey)),
        duplicate_url: urls::duplicate_section(course.id, section.number, sesskey),
        delete_url: urls::delete_section(section.id, section.number, sesskey),
    }
}
