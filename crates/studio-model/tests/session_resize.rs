use proptest::prelude::*;

use vantage_studio_model::{
    default_record, resize_records, EditorSession, ScreenshotPatch, MAX_SCREENS, MIN_SCREENS,
};

fn edited_session(count: usize) -> EditorSession {
    let mut session = EditorSession::new();
    session.set_screen_count(count);
    for i in 0..session.screen_count() {
        session
            .update_screenshot(i, ScreenshotPatch::title(format!("edited {i}")))
            .expect("index is in range");
    }
    session
}

proptest! {
    #[test]
    fn screen_count_always_within_bounds(requested in 0usize..64) {
        let mut session = EditorSession::new();
        let applied = session.set_screen_count(requested);
        prop_assert!((MIN_SCREENS..=MAX_SCREENS).contains(&applied));
        prop_assert_eq!(session.screen_count(), applied);
    }

    #[test]
    fn resize_is_keyed_by_slot(start in 1usize..=10, target in 1usize..=10) {
        let session = edited_session(start);
        let resized = resize_records(session.records(), target);

        prop_assert_eq!(resized.len(), target);
        for (i, record) in resized.iter().enumerate() {
            if i < start {
                prop_assert_eq!(&record.title, &format!("edited {i}"));
            } else {
                prop_assert_eq!(record, &default_record(i));
            }
        }
    }

    #[test]
    fn record_ids_stay_unique(start in 1usize..=10, target in 1usize..=10) {
        let mut session = edited_session(start);
        session.set_screen_count(target);
        let mut ids: Vec<_> = session.records().iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), session.screen_count());
    }
}

#[test]
fn shrinking_discards_edits_beyond_the_new_count() {
    let mut session = edited_session(5);
    session.set_screen_count(2);
    session.set_screen_count(5);

    assert_eq!(session.records()[1].title, "edited 1");
    assert_eq!(session.records()[2], default_record(2));
    assert_eq!(session.records()[4], default_record(4));
}
