//! Section progress aggregation.

use crate::host::{CompletionLookup, SectionRepository};
use crate::types::Section;
use crate::view::SectionProgress;

/// Count completable activities against completed ones for a section.
///
/// An activity lands in the denominator iff it is visible to the viewer and
/// completion tracking is enabled for it; in the numerator iff its state is
/// complete or complete-with-pass. Sections with no tracked activities have
/// no progress at all, not a zero.
pub fn section_progress<R, C>(section: &Section, repo: &R, completion: &C) -> Option<SectionProgress>
where
    R: SectionRepository + ?Sized,
    C: CompletionLookup + ?Sized,
{
    let mut total = 0u32;
    let mut complete = 0u32;

    for activity in repo.activities_in(section.number) {
        if !activity.user_visible || !completion.is_enabled(activity) {
            continue;
        }
        total += 1;
        if completion.state(activity).counts_complete() {
            complete += 1;
        }
    }

    if total == 0 {
        return None;
    }

    let percentage = ((complete as f64 / total as f64) * 100.0).round() as u8;
    Some(SectionProgress {
        total,
        complete,
        percentage,
        done: percentage == 100,
    })
}
