//! Host endpoint URLs.
//!
//! Every mutation (create/move/hide/delete/highlight section) is delegated to
//! the host via one of these URLs; the parameter names and paths are the
//! host's contract and must not drift. URLs are emitted relative so rendered
//! links resolve against whichever origin serves the page.

use url::form_urlencoded;

use crate::types::{CourseId, SectionId};

pub const COURSE_VIEW: &str = "/course/view.php";
pub const SECTION_VIEW: &str = "/course/section.php";
pub const EDIT_SECTION: &str = "/course/editsection.php";
pub const CHANGE_NUM_SECTIONS: &str = "/course/changenumsections.php";

fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        query.append_pair(key, value);
    }
    format!("{}?{}", path, query.finish())
}

/// Course root page.
pub fn course_view(course: CourseId) -> String {
    with_query(COURSE_VIEW, &[("id", &course.0.to_string())])
}

/// Course page displaying a single section by number.
pub fn course_view_section(course: CourseId, number: u32) -> String {
    with_query(
        COURSE_VIEW,
        &[("id", &course.0.to_string()), ("section", &number.to_string())],
    )
}

/// Dedicated page for one section.
pub fn section_view(section: SectionId) -> String {
    with_query(SECTION_VIEW, &[("id", &section.0.to_string())])
}

/// Section edit form.
pub fn edit_section(section: SectionId, number: u32, sesskey: &str) -> String {
    with_query(
        EDIT_SECTION,
        &[
            ("id", &section.0.to_string()),
            ("section", &number.to_string()),
            ("sectionid", &section.0.to_string()),
            ("sesskey", sesskey),
        ],
    )
}

/// Section edit form with a return-section hint, the target of the
/// post-creation client-side redirect.
pub fn edit_section_return(section: SectionId, number: u32) -> String {
    with_query(
        EDIT_SECTION,
        &[("id", &section.0.to_string()), ("sr", &number.to_string())],
    )
}

/// Start moving a section.
pub fn move_section(course: CourseId, number: u32, sesskey: &str) -> String {
    with_query(
        COURSE_VIEW,
        &[
            ("movesection", "1"),
            ("id", &course.0.to_string()),
            ("section", &number.to_string()),
            ("sesskey", sesskey),
        ],
    )
}

/// Reveal a hidden section.
pub fn show_section(course: CourseId, section: SectionId, number: u32, sesskey: &str) -> String {
    with_query(
        COURSE_VIEW,
        &[
            ("id", &course.0.to_string()),
            ("sectionid", &section.0.to_string()),
            ("sesskey", sesskey),
            ("show", &number.to_string()),
        ],
    )
}

/// Hide a visible section.
pub fn hide_section(course: CourseId, section: SectionId, number: u32, sesskey: &str) -> String {
    with_query(
        COURSE_VIEW,
        &[
            ("id", &course.0.to_string()),
            ("sectionid", &section.0.to_string()),
            ("sesskey", sesskey),
            ("hide", &number.to_string()),
        ],
    )
}

/// Set the course marker to `number`; 0 clears the highlight.
pub fn set_marker(course: CourseId, section: SectionId, number: u32, sesskey: &str) -> String {
    with_query(
        COURSE_VIEW,
        &[
            ("id", &course.0.to_string()),
            ("sectionid", &section.0.to_string()),
            ("sesskey", sesskey),
            ("marker", &number.to_string()),
        ],
    )
}

/// Duplicate a section.
pub fn duplicate_section(course: CourseId, number: u32, sesskey: &str) -> String {
    with_query(
        COURSE_VIEW,
        &[
            ("id", &course.0.to_string()),
            ("duplicatesection", &number.to_string()),
            ("section", &number.to_string()),
            ("sesskey", sesskey),
        ],
    )
}

/// Delete a section, pre-confirmed.
pub fn delete_section(section: SectionId, number: u32, sesskey: &str) -> String {
    with_query(
        EDIT_SECTION,
        &[
            ("delete", "1"),
            ("id", &section.0.to_string()),
            ("sr", &number.saturating_sub(1).to_string()),
            ("confirm", "true"),
            ("sesskey", sesskey),
        ],
    )
}

/// Append a new section at the end of the course.
///
/// The return URL points at where the new section is expected to land: the
/// current section count, since numbers are contiguous and the host appends.
/// Concurrent edits can invalidate the guess; the host does not report the
/// new section's id synchronously.
pub fn add_section(course: CourseId, section_count: usize, sesskey: &str) -> String {
    let returnurl = with_query(
        COURSE_VIEW,
        &[
            ("id", &course.0.to_string()),
            ("section", &section_count.to_string()),
            ("newsectionredirect", "true"),
        ],
    );
    with_query(
        CHANGE_NUM_SECTIONS,
        &[
            ("courseid", &course.0.to_string()),
            ("insertsection", "0"),
            ("sesskey", sesskey),
            ("returnurl", &returnurl),
        ],
    )
}
