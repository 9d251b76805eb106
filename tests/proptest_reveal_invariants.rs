//! Property-based invariant tests for incremental reveal and auto-scroll.
//!
//! 1. After n ticks exactly min(n, len) units are showing.
//! 2. Every committed prefix extends the previous one.
//! 3. The full reply is committed exactly once, by the last tick.
//! 4. Any number of scroll requests drain as at most one per frame.
//! 5. Auto-scroll follows the last observed distance.

use flywheel_chat::actor::{ChatEvent, Tick};
use flywheel_chat::reveal::{RevealState, RevealUnit, TickSource, Viewport};
use flywheel_chat::session::{ChatSession, SessionConfig};
use flywheel_chat::transport::Reply;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn unit_strategy() -> impl Strategy<Value = RevealUnit> {
    prop_oneof![Just(RevealUnit::CodePoint), Just(RevealUnit::Grapheme)]
}

fn manual_session() -> ChatSession {
    ChatSession::new(SessionConfig {
        tick_source: TickSource::Manual,
        ..SessionConfig::default()
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Revealed length after n ticks
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn revealed_length_is_min_of_ticks_and_len(
        text in "\\PC{0,40}",
        unit in unit_strategy(),
        ticks in 0usize..60,
    ) {
        let mut state = RevealState::new(text.clone(), unit);
        for _ in 0..ticks {
            state.advance();
        }

        let len = unit.count(&text);
        prop_assert_eq!(state.revealed_length(), ticks.min(len));
        prop_assert_eq!(unit.count(state.revealed()), ticks.min(len));
        prop_assert_eq!(state.is_active(), ticks < len);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2-3. Commits through the session
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn session_commits_grow_by_prefix(text in "\\PC{1,30}") {
        let mut session = manual_session();
        session.set_query("q");
        session.submit().unwrap();
        session.handle_event(ChatEvent::ReplyArrived(Reply::text(text.clone())));
        let id = session.revealing().unwrap();

        let mut previous = String::new();
        let mut full_commits = 0;
        let mut frame = 0;
        while session.revealing().is_some() {
            prop_assert!(session.handle_tick(Tick::manual(id, frame)).unwrap());
            let content = session.transcript().get(id).unwrap().content.clone();
            prop_assert!(content.starts_with(previous.as_str()));
            prop_assert!(content.len() > previous.len());
            if content == text {
                full_commits += 1;
            }
            previous = content;
            frame += 1;
        }

        prop_assert_eq!(full_commits, 1);
        prop_assert_eq!(previous, text);
        prop_assert!(!session.handle_tick(Tick::manual(id, frame)).unwrap());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Viewport
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_requests_coalesce(requests in 0usize..20) {
        let mut viewport = Viewport::default();
        for _ in 0..requests {
            viewport.request_scroll_to_bottom();
        }
        prop_assert_eq!(viewport.take_scroll_request(), requests > 0);
        prop_assert!(!viewport.take_scroll_request());
    }

    #[test]
    fn auto_scroll_tracks_last_observation(distances in prop::collection::vec(0.0f64..1000.0, 1..20)) {
        let mut viewport = Viewport::default();
        for &distance in &distances {
            viewport.observe_distance(distance);
        }
        let last = distances[distances.len() - 1];
        prop_assert_eq!(viewport.auto_scroll(), last < 100.0);
    }
}
