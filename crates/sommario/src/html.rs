use anyhow::Result;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::view::{NextSection, PageView, SectionActions, SectionProgress, SectionView, Toc};

/// Render a page view-model and write it to disk.
pub fn generate_html(page: &PageView, path: &Path) -> Result<()> {
    let html = render_page(page);
    fs::write(path, html.into_string())?;
    Ok(())
}

/// Render the full course page.
pub fn render_page(page: &PageView) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page.section_name) " - " (page.course_name) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.container {
                    h1 { (page.course_name) }
                    div.layout {
                        (render_toc(&page.toc))
                        main.content {
                            @if let Some(first) = &page.first_section {
                                (render_section(first, "first-section"))
                                @if let Some(next) = &page.next_section {
                                    (render_next(next))
                                }
                            }
                            @if let Some(section) = &page.single_section {
                                @if let Some(actions) = &page.section_actions {
                                    (render_actions(actions))
                                }
                                (render_section(section, "single-section"))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Render the post-creation redirect stub: hide the page and jump via
/// script, since the host's own redirect does not land anywhere useful.
pub fn render_redirect(target: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "Redirecting" }
                // Hide the page to avoid redirect flicker.
                style { "body { display: none !important; }" }
            }
            body {
                script { (PreEscaped(format!("window.location.replace('{target}');"))) }
            }
        }
    }
}

fn render_toc(toc: &Toc) -> Markup {
    html! {
        nav.toc {
            ul {
                @for entry in &toc.entries {
                    li.course-home[entry.course_home]
                        .active[entry.active]
                        .highlighted[entry.highlighted]
                        .hidden-section[!entry.visible] {
                        a href=(entry.url) { (entry.name) }
                        @if !entry.visible {
                            span.badge { "Hidden from students" }
                        }
                        @if entry.highlighted {
                            span.badge.badge-highlight { "Highlighted" }
                        }
                        @if let Some(progress) = &entry.progress {
                            (render_progress(progress))
                        }
                    }
                }
            }
            @if let Some(add) = &toc.add_section {
                a.add-section href=(add.url) { "+ " (add.title) }
            }
        }
    }
}

fn render_progress(progress: &SectionProgress) -> Markup {
    html! {
        div.progress.done[progress.done] {
            div.progress-track {
                div.progress-bar style={ "width:" (progress.percentage) "%" } {}
            }
            span.progress-label {
                (progress.complete) " of " (progress.total) " done"
            }
        }
    }
}

fn render_section(section: &SectionView, css_class: &str) -> Markup {
    html! {
        section class=(css_class) {
            header.section-header {
                h2 { (section.name) }
                @if section.hidden {
                    span.badge { "Hidden from students" }
                }
                @if let Some(edit_url) = &section.edit_url {
                    a.edit-link href=(edit_url) { "Edit" }
                }
            }
            @if !section.summary.is_empty() {
                div.summary { (section.summary) }
            }
            ul.activities {
                @for activity in &section.activities {
                    li {
                        (activity.name)
                        @if let Some(completed) = activity.completed {
                            @if completed {
                                span.completion.complete { "Done" }
                            } @else {
                                span.completion { "To do" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_next(next: &NextSection) -> Markup {
    html! {
        div.section-selector {
            a.next-section href=(next.url) {
                "Next: " (next.name)
            }
            @if next.hidden_from_students {
                span.badge { "Hidden from students" }
            }
        }
    }
}

fn render_actions(actions: &SectionActions) -> Markup {
    html! {
        div.section-actions {
            a href=(actions.edit_url) { "Edit" }
            a href=(actions.move_url) { "Move" }
            @if let Some(url) = &actions.show_url {
                a href=(url) { "Show" }
            }
            @if let Some(url) = &actions.hide_url {
                a href=(url) { "Hide" }
            }
            @if let Some(url) = &actions.highlight_url {
                a href=(url) { "Highlight" }
            }
            @if let Some(url) = &actions.unhighlight_url {
                a href=(url) { "Unhighlight" }
            }
            a href=(actions.duplicate_url) { "Duplicate" }
            a.danger href=(actions.delete_url) { "Delete" }
        }
    }
}

const CSS: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
    background: #f7f7f5;
    color: #1b1b1b;
    line-height: 1.5;
}

.container {
    max-width: 1100px;
    margin: 0 auto;
    padding: 32px 24px;
}

h1 {
    font-size: 1.8em;
    margin-bottom: 24px;
}

.layout {
    display: grid;
    grid-template-columns: 280px 1fr;
    gap: 32px;
}

.toc ul {
    list-style: none;
}

.toc li {
    padding: 8px 12px;
    border-left: 3px solid transparent;
}

.toc li.active {
    border-left-color: #2b6cb0;
    background: #ebf2fa;
}

.toc li.highlighted {
    background: #fdf6e3;
}

.toc li.hidden-section a {
    color: #888;
}

.toc li.course-home {
    font-weight: 600;
}

.toc a {
    color: #1b1b1b;
    text-decoration: none;
}

.toc a:hover {
    text-decoration: underline;
}

.add-section {
    display: inline-block;
    margin-top: 16px;
    color: #2b6cb0;
    text-decoration: none;
}

.badge {
    display: inline-block;
    margin-left: 8px;
    padding: 1px 8px;
    font-size: 0.7em;
    border-radius: 8px;
    background: #e2e2de;
    color: #555;
}

.badge-highlight {
    background: #f6d876;
    color: #5b4a00;
}

.progress {
    margin-top: 6px;
}

.progress-track {
    height: 6px;
    background: #e2e2de;
    border-radius: 3px;
    overflow: hidden;
}

.progress-bar {
    height: 100%;
    background: #2f855a;
}

.progress-label {
    font-size: 0.75em;
    color: #555;
}

.section-header {
    display: flex;
    align-items: baseline;
    gap: 12px;
    margin-bottom: 12px;
}

.summary {
    margin-bottom: 16px;
    color: #444;
}

.activities {
    list-style: none;
}

.activities li {
    padding: 10px 12px;
    margin-bottom: 8px;
    background: #fff;
    border: 1px solid #e2e2de;
    border-radius: 4px;
}

.completion {
    float: right;
    font-size: 0.8em;
    color: #888;
}

.completion.complete {
    color: #2f855a;
    font-weight: 600;
}

.section-selector {
    margin-top: 24px;
}

.next-section {
    color: #2b6cb0;
    text-decoration: none;
    font-weight: 600;
}

.section-actions {
    margin-bottom: 16px;
}

.section-actions a {
    margin-right: 12px;
    color: #2b6cb0;
    text-decoration: none;
    font-size: 0.9em;
}

.section-actions a.danger {
    color: #c53030;
}

.edit-link {
    font-size: 0.85em;
    color: #2b6cb0;
    text-decoration: none;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ActivityView, AddSection, PageView, Toc, TocEntry};

    fn make_entry(name: &str) -> TocEntry {
        TocEntry {
            name: name.to_string(),
            url: "/course/section.php?id=101".to_string(),
            visible: true,
            active: false,
            highlighted: false,
            course_home: false,
            progress: None,
        }
    }

    fn make_page() -> PageView {
        PageView {
            course_name: "ARCH101".to_string(),
            section_name: "Course home".to_string(),
            can_edit: false,
            toc: Toc {
                entries: vec![make_entry("Course home"), make_entry("Week 1")],
                add_section: None,
            },
            first_section: Some(SectionView {
                name: "Course home".to_string(),
                number: 0,
                hidden: false,
                highlighted: false,
                summary: "Welcome".to_string(),
                activities: vec![ActivityView {
                    name: "Announcements".to_string(),
                    completed: None,
                }],
                edit_url: None,
            }),
            next_section: Some(NextSection {
                name: "Week 1".to_string(),
                url: "/course/section.php?id=101".to_string(),
                hidden_from_students: false,
            }),
            single_section: None,
            section_actions: None,
        }
    }

    // ========== page rendering tests ==========

    #[test]
    fn test_render_page_contains_toc_and_first_section() {
        let html = render_page(&make_page()).into_string();
        assert!(html.contains("<nav class=\"toc\">"));
        assert!(html.contains("Week 1"));
        assert!(html.contains("first-section"));
        assert!(html.contains("Next: Week 1"));
        assert!(html.contains("Announcements"));
    }

    #[test]
    fn test_render_page_escapes_names() {
        let mut page = make_page();
        page.toc.entries[1].name = "Maths <advanced>".to_string();
        let html = render_page(&page).into_string();
        assert!(html.contains("Maths &lt;advanced&gt;"));
        assert!(!html.contains("Maths <advanced>"));
    }

    #[test]
    fn test_course_home_class_on_entry() {
        let mut page = make_page();
        page.toc.entries[0].course_home = true;
        let html = render_page(&page).into_string();
        assert!(html.contains("course-home"));
    }

    #[test]
    fn test_hidden_entry_badge() {
        let mut page = make_page();
        page.toc.entries[1].visible = false;
        let html = render_page(&page).into_string();
        assert!(html.contains("Hidden from students"));
    }

    #[test]
    fn test_progress_bar_width() {
        let mut page = make_page();
        page.toc.entries[1].progress = Some(SectionProgress {
            total: 3,
            complete: 2,
            percentage: 67,
            done: false,
        });
        let html = render_page(&page).into_string();
        assert!(html.contains("width:67%"));
        assert!(html.contains("2 of 3 done"));
    }

    #[test]
    fn test_add_section_link() {
        let mut page = make_page();
        page.toc.add_section = Some(AddSection {
            url: "/course/changenumsections.php?courseid=6".to_string(),
            title: "Add section".to_string(),
        });
        let html = render_page(&page).into_string();
        assert!(html.contains("changenumsections.php"));
        assert!(html.contains("+ Add section"));
    }

    #[test]
    fn test_action_menu_renders_exclusive_pair() {
        let mut page = make_page();
        page.first_section = None;
        page.next_section = None;
        page.single_section = Some(SectionView {
            name: "Week 1".to_string(),
            number: 1,
            hidden: false,
            highlighted: false,
            summary: String::new(),
            activities: vec![],
            edit_url: None,
        });
        page.section_actions = Some(SectionActions {
            edit_url: "/e".to_string(),
            move_url: "/m".to_string(),
            show_url: None,
            hide_url: Some("/h".to_string()),
            highlight_url: Some("/hl".to_string()),
            unhighlight_url: None,
            duplicate_url: "/d".to_string(),
            delete_url: "/del".to_string(),
        });
        let html = render_page(&page).into_string();
        assert!(html.contains(">Hide</a>"));
        assert!(!html.contains(">Show</a>"));
        assert!(html.contains(">Highlight</a>"));
        assert!(!html.contains(">Unhighlight</a>"));
    }

    // ========== redirect stub tests ==========

    #[test]
    fn test_render_redirect_hides_page_and_jumps() {
        let html = render_redirect("/course/editsection.php?id=102&sr=2").into_string();
        assert!(html.contains("display: none"));
        assert!(html.contains("window.location.replace('/course/editsection.php?id=102&sr=2');"));
    }

    // ========== file output tests ==========

    #[test]
    fn test_generate_html_writes_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("index.html");
        generate_html(&make_page(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
