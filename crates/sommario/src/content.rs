//! Render orchestration: one request in, one page view-model (or a redirect
//! decision) out. Owns no state across renders.

use crate::host::{CapabilityCheck, CompletionLookup, SectionRepository};
use crate::toc;
use crate::types::{PageRequest, Section, Viewer};
use crate::urls;
use crate::view::{ActivityView, PageAction, PageView, SectionView};
use crate::{actions, progress};

/// Assemble the view-model for one page render.
///
/// Consumed request parameters are resolved in order: the legacy `topic`
/// alias and `expandsection` become server-side redirects, a fresh
/// `newsectionredirect` becomes a client-side redirect to the new section's
/// edit page, and everything else renders normally.
pub fn build_page<H>(host: &H, viewer: &Viewer, request: &PageRequest, sesskey: &str) -> PageAction
where
    H: SectionRepository + CompletionLookup + ?Sized,
{
    let course = host.course();

    // Outdated topic parameter, redirect to the canonical form.
    if let Some(number) = request.legacy_topic {
        return PageAction::Redirect(urls::course_view_section(course.id, number));
    }

    // Expand requests carry a section number but the dedicated section page
    // is keyed by row id; resolve and redirect. Unknown numbers fall through
    // to a normal render.
    if let Some(number) = request.expand_section {
        if let Some(section) = host.section_by_number(number) {
            return PageAction::Redirect(urls::section_view(section.id));
        }
    }

    let single = request
        .single_section
        .and_then(|n| host.section_by_number(n))
        .or_else(|| request.active_section.and_then(|id| host.section_by_id(id)));

    // A section was just created; the host's own redirect lands on the
    // course page, so send the browser on to the edit form.
    if request.new_section_redirect {
        if let Some(section) = single {
            return PageAction::ClientRedirect(urls::edit_section_return(
                section.id,
                section.number,
            ));
        }
    }

    // Section 0 is never shown as a plain single section; it is promoted to
    // the first-section slot of the landing view.
    let landing = single.map(|s| s.number == 0).unwrap_or(true);
    let first = host.section_by_number(0);

    let active = request
        .active_section
        .or_else(|| single.map(|s| s.id))
        .or_else(|| {
            if landing {
                first.map(|s| s.id)
            } else {
                None
            }
        });

    let toc_view = toc::build_toc(host, viewer, active, sesskey);

    let first_section = if landing {
        first.map(|s| section_view_model(host, viewer, s, sesskey))
    } else {
        None
    };
    let next_section = if landing {
        toc::next_visible_section(host, viewer)
    } else {
        None
    };

    let single_section = if landing {
        None
    } else {
        single.map(|s| section_view_model(host, viewer, s, sesskey))
    };

    let section_actions = match (viewer.editing && viewer.can_manage_sections(), &single_section) {
        (true, Some(_)) => {
            // single_section is Some only when `single` resolved.
            single.map(|s| actions::section_actions(course, s, sesskey))
        }
        _ => None,
    };

    let section_name = single_section
        .as_ref()
        .or(first_section.as_ref())
        .map(|s| s.name.clone())
        .unwrap_or_else(|| course.shortname.clone());

    PageAction::Render(Box::new(PageView {
        course_name: course.shortname.clone(),
        section_name,
        can_edit: viewer.can_manage_sections(),
        toc: toc_view,
        first_section,
        next_section,
        single_section,
        section_actions,
    }))
}

fn section_view_model<H>(host: &H, viewer: &Viewer, section: &Section, sesskey: &str) -> SectionView
where
    H: SectionRepository + CompletionLookup + ?Sized,
{
    let course = host.course();
    let activities = host
        .activities_in(section.number)
        .into_iter()
        .filter(|a| a.user_visible)
        .map(|a| ActivityView {
            name: a.name.clone(),
            completed: (course.enable_completion && host.is_enabled(a))
                .then(|| host.state(a).counts_complete()),
        })
        .collect();

    SectionView {
        name: toc::section_name(section),
        number: section.number,
        hidden: !section.visible,
        highlighted: course.marker != 0 && section.number == course.marker,
        summary: section.summary.clone(),
        activities,
        edit_url: (viewer.editing && viewer.can_manage_sections())
            .then(|| urls::edit_section(section.id, section.number, sesskey)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{CourseSnapshot, FORMAT_NAME};
    use crate::types::{
        Activity, ActivityId, CompletionState, CompletionTracking, Course, CourseId, SectionId,
    };

    fn make_snapshot() -> CourseSnapshot {
        let course = Course {
            id: CourseId(6),
            shortname: "ARCH101".to_string(),
            format: FORMAT_NAME.to_string(),
            marker: 0,
            enable_completion: true,
        };
        let make_section = |number: u32, visible: bool| Section {
            id: SectionId(number as u64 + 100),
            course: CourseId(6),
            number,
            name: None,
            visible,
            summary: format!("Summary {number}"),
        };
        let mut snapshot = CourseSnapshot::new(
            course,
            vec![
                make_section(0, true),
                make_section(1, false),
                make_section(2, true),
            ],
            vec![
                Activity {
                    id: ActivityId(1),
                    section: 2,
                    name: "Reading".to_string(),
                    user_visible: true,
                    completion: CompletionTracking::Manual,
                },
                Activity {
                    id: ActivityId(2),
                    section: 2,
                    name: "Quiz".to_string(),
                    user_visible: true,
                    completion: CompletionTracking::None,
                },
            ],
        );
        snapshot.set_completion(ActivityId(1), CompletionState::Complete);
        snapshot
    }

    fn render(action: PageAction) -> PageView {
        match action {
            PageAction::Render(page) => *page,
            other => panic!("expected a rendered page, got {other:?}"),
        }
    }

    // ========== redirect tests ==========

    #[test]
    fn test_legacy_topic_redirects_to_canonical_param() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            legacy_topic: Some(2),
            ..Default::default()
        };
        let action = build_page(&snapshot, &Viewer::student(), &request, "k");
        assert_eq!(
            action,
            PageAction::Redirect("/course/view.php?id=6&section=2".to_string())
        );
    }

    #[test]
    fn test_expand_section_redirects_to_section_page() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            expand_section: Some(2),
            ..Default::default()
        };
        let action = build_page(&snapshot, &Viewer::student(), &request, "k");
        assert_eq!(
            action,
            PageAction::Redirect("/course/section.php?id=102".to_string())
        );
    }

    #[test]
    fn test_expand_unknown_section_falls_through_to_render() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            expand_section: Some(9),
            ..Default::default()
        };
        let page = render(build_page(&snapshot, &Viewer::student(), &request, "k"));
        assert!(page.first_section.is_some());
    }

    #[test]
    fn test_new_section_redirect_goes_to_edit_page() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            single_section: Some(2),
            new_section_redirect: true,
            ..Default::default()
        };
        let action = build_page(&snapshot, &Viewer::editor(), &request, "k");
        assert_eq!(
            action,
            PageAction::ClientRedirect("/course/editsection.php?id=102&sr=2".to_string())
        );
    }

    #[test]
    fn test_new_section_redirect_without_target_renders() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            new_section_redirect: true,
            ..Default::default()
        };
        let page = render(build_page(&snapshot, &Viewer::editor(), &request, "k"));
        assert!(page.first_section.is_some());
    }

    // ========== landing view tests ==========

    #[test]
    fn test_landing_view_promotes_section_zero() {
        let snapshot = make_snapshot();
        let page = render(build_page(
            &snapshot,
            &Viewer::student(),
            &PageRequest::default(),
            "k",
        ));

        let first = page.first_section.unwrap();
        assert_eq!(first.number, 0);
        assert_eq!(first.name, "Course home");
        assert_eq!(page.section_name, "Course home");
        assert!(page.single_section.is_none());
        assert!(page.section_actions.is_none());
        assert!(!page.can_edit);
    }

    #[test]
    fn test_landing_view_next_section_skips_hidden() {
        let snapshot = make_snapshot();
        let page = render(build_page(
            &snapshot,
            &Viewer::student(),
            &PageRequest::default(),
            "k",
        ));
        // Section 1 is hidden, so section 2 is next.
        let next = page.next_section.unwrap();
        assert_eq!(next.url, "/course/section.php?id=102");
    }

    #[test]
    fn test_landing_view_marks_course_home_active() {
        let snapshot = make_snapshot();
        let page = render(build_page(
            &snapshot,
            &Viewer::student(),
            &PageRequest::default(),
            "k",
        ));
        assert!(page.toc.entries[0].active);
    }

    #[test]
    fn test_section_zero_as_single_section_is_still_landing() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            single_section: Some(0),
            ..Default::default()
        };
        let page = render(build_page(&snapshot, &Viewer::student(), &request, "k"));
        assert!(page.single_section.is_none());
        assert!(page.first_section.is_some());
        assert!(page.next_section.is_some());
    }

    // ========== single-section view tests ==========

    #[test]
    fn test_single_section_view() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            active_section: Some(SectionId(102)),
            single_section: Some(2),
            ..Default::default()
        };
        let page = render(build_page(&snapshot, &Viewer::student(), &request, "k"));

        let section = page.single_section.unwrap();
        assert_eq!(section.number, 2);
        assert_eq!(section.summary, "Summary 2");
        assert_eq!(section.activities.len(), 2);
        assert_eq!(section.activities[0].completed, Some(true));
        // Untracked activity renders without a completion mark.
        assert_eq!(section.activities[1].completed, None);

        assert!(page.first_section.is_none());
        assert!(page.next_section.is_none());
        // Toc entry for the displayed section is active.
        assert!(page.toc.entries.iter().any(|e| e.active));
    }

    #[test]
    fn test_single_section_resolved_from_active_id() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            active_section: Some(SectionId(102)),
            ..Default::default()
        };
        let page = render(build_page(&snapshot, &Viewer::student(), &request, "k"));
        assert_eq!(page.single_section.unwrap().number, 2);
    }

    #[test]
    fn test_action_menu_only_when_editing() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            single_section: Some(2),
            ..Default::default()
        };

        let page = render(build_page(&snapshot, &Viewer::student(), &request, "k"));
        assert!(page.section_actions.is_none());

        let page = render(build_page(&snapshot, &Viewer::editor(), &request, "k"));
        let actions = page.section_actions.unwrap();
        assert!(actions.hide_url.is_some());
        assert!(page.can_edit);
        assert!(page.single_section.unwrap().edit_url.is_some());
    }

    #[test]
    fn test_unknown_single_section_renders_landing() {
        let snapshot = make_snapshot();
        let request = PageRequest {
            single_section: Some(9),
            ..Default::default()
        };
        let page = render(build_page(&snapshot, &Viewer::student(), &request, "k"));
        assert!(page.single_section.is_none());
        assert!(page.first_section.is_some());
    }
}
