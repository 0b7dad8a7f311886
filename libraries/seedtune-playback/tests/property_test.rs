//! Property-based tests for the playback manager
//!
//! Random command sequences against a scripted engine. Each property checks
//! an invariant after every step, not just at the end.

mod common;

use common::{track, track_without_preview, ScriptedEngine};
use proptest::prelude::*;
use seedtune_core::Track;
use seedtune_playback::{PlaybackConfig, PlaybackManager, PlaybackState, SessionSnapshot};

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    PlayTrack(Track),
    PlayList(Vec<Track>),
    Next,
    Previous,
    Toggle,
    Seek(u64),
    Clear,
}

fn arbitrary_track() -> impl Strategy<Value = Track> {
    ("[a-z0-9]{1,8}", prop::bool::weighted(0.9)).prop_map(|(id, playable)| {
        if playable {
            track(&id)
        } else {
            track_without_preview(&id)
        }
    })
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arbitrary_track().prop_map(Op::PlayTrack),
        prop::collection::vec(arbitrary_track(), 0..8).prop_map(Op::PlayList),
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Toggle),
        (0u64..120_000).prop_map(Op::Seek),
        Just(Op::Clear),
    ]
}

async fn apply(manager: &mut PlaybackManager, op: Op) {
    // Refused commands are fine here; invariants must hold either way
    let _ = match op {
        Op::PlayTrack(track) => manager.play_track(track).await,
        Op::PlayList(tracks) => manager.play_track_list(tracks).await,
        Op::Next => manager.play_next_track().await,
        Op::Previous => manager.play_previous_track().await,
        Op::Toggle => manager.toggle_play_pause().await,
        Op::Seek(ms) => manager.seek_to_position(ms).await,
        Op::Clear => manager.clear_playback().await,
    };
}

fn cursor_in_bounds(snapshot: &SessionSnapshot) -> bool {
    match snapshot.cursor {
        Some(i) => i < snapshot.queue.len(),
        None => snapshot.queue.is_empty(),
    }
}

fn run<F: std::future::Future<Output = ()>>(future: F) {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future);
}

// ===== Property Tests =====

proptest! {
    /// Property: cursor is in bounds when the queue has tracks, absent otherwise
    #[test]
    fn cursor_stays_in_bounds(ops in prop::collection::vec(arbitrary_op(), 1..40)) {
        run(async move {
            let engine = ScriptedEngine::new();
            let (mut manager, _feed) = PlaybackManager::new(engine.shared(), PlaybackConfig::default());

            for op in ops {
                apply(&mut manager, op).await;
                let snapshot = manager.snapshot();
                assert!(cursor_in_bounds(&snapshot), "cursor {:?} for {} tracks", snapshot.cursor, snapshot.queue.len());
            }
        });
    }

    /// Property: never more than one sound loaded, and a playing session has a track
    #[test]
    fn single_sound_and_playing_has_track(ops in prop::collection::vec(arbitrary_op(), 1..40)) {
        run(async move {
            let engine = ScriptedEngine::new();
            let (mut manager, _feed) = PlaybackManager::new(engine.shared(), PlaybackConfig::default());

            for op in ops {
                apply(&mut manager, op).await;
                let snapshot = manager.snapshot();

                assert!(engine.live_sounds() <= 1);
                if snapshot.is_playing() {
                    assert!(snapshot.current_track.is_some());
                }
                // Loaded sound exactly when a track is attached
                let attached = snapshot.state != PlaybackState::Empty;
                assert_eq!(engine.live_sounds() == 1, attached);
            }

            assert!(engine.max_live_sounds() <= 1);
        });
    }

    /// Property: every loaded URL came from a track with a preview
    #[test]
    fn only_previews_reach_the_engine(ops in prop::collection::vec(arbitrary_op(), 1..40)) {
        run(async move {
            let engine = ScriptedEngine::new();
            let (mut manager, _feed) = PlaybackManager::new(engine.shared(), PlaybackConfig::default());

            for op in ops {
                apply(&mut manager, op).await;
            }

            assert!(engine.loads().iter().all(|url| url.starts_with("https://")));
        });
    }
}
