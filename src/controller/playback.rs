//! Playback transitions and queue mutations

use crate::model::{PlaybackStatus, PlayerDirective};

use super::AppController;

impl AppController {
    pub fn play_item_by_id(&mut self, id: &str) {
        let Some(item) = self.model.find_item(id).cloned() else {
            tracing::debug!(id, "Ignoring play request for unknown item");
            return;
        };

        tracing::info!(id = %item.id, title = %item.title, "Playing item");
        self.model.set_loading(&item);
        self.send_player(PlayerDirective::PlayItem(item));
        self.broadcast_playback();
    }

    pub fn play_next(&mut self) {
        if self.model.queue().is_empty() {
            self.stop_playback();
            return;
        }

        let Some(current_id) = self.model.current_id().map(str::to_string) else {
            let first = self.model.queue()[0].id.clone();
            self.play_item_by_id(&first);
            return;
        };

        // A current id missing from the queue restarts from the top
        let next_index = self
            .model
            .position_of(&current_id)
            .map_or(0, |index| index + 1);

        match self.model.item_at(next_index).map(|item| item.id.clone()) {
            Some(next_id) => self.play_item_by_id(&next_id),
            None => {
                tracing::info!("Reached end of queue");
                self.stop_playback();
            }
        }
    }

    pub fn toggle_playback(&mut self) {
        let status = self.model.playback().status;
        if status == PlaybackStatus::Playing {
            self.model.set_status(PlaybackStatus::Paused);
            self.send_player(PlayerDirective::Pause);
        } else if self.model.current_id().is_some() {
            self.model.set_status(PlaybackStatus::Playing);
            self.send_player(PlayerDirective::Resume);
        } else if let Some(first) = self.model.queue().first().map(|item| item.id.clone()) {
            self.play_item_by_id(&first);
        }

        tracing::debug!(from = status.as_str(), to = self.model.playback().status.as_str(), "Toggled playback");
        self.broadcast_playback();
    }

    pub fn stop_playback(&mut self) {
        tracing::info!("Stopping playback");
        self.model.set_stopped();
        self.send_player(PlayerDirective::Stop);
        self.broadcast_playback();
    }

    pub fn remove_item(&mut self, id: &str) {
        let was_current = self.model.current_id() == Some(id);
        let Some(index) = self.model.remove_item(id) else {
            return;
        };
        tracing::info!(id, index, "Removed queue item");

        if was_current {
            let replacement = self
                .model
                .item_at(index)
                .or_else(|| self.model.queue().first())
                .map(|item| item.id.clone());

            match replacement {
                Some(next_id) => self.play_item_by_id(&next_id),
                None => self.stop_playback(),
            }
        }

        self.broadcast_queue();
    }

    pub fn reorder(&mut self, from: usize, to: usize) {
        if !self.model.move_item(from, to) {
            tracing::debug!(from, to, "Ignoring out-of-range reorder");
            return;
        }
        self.broadcast_queue();
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::test_support::Harness;
    use crate::model::{PlaybackStatus, PlayerDirective, PlayerReport, SurfaceUpdate};

    #[test]
    fn play_next_walks_queue_then_stops_once() {
        let mut h = Harness::with_queue(&["a", "b", "c"]);
        let mut visited = Vec::new();
        let mut stops = 0;

        for _ in 0..4 {
            h.controller.play_next();
            match h.current() {
                Some(id) => visited.push(id.to_string()),
                None => stops += 1,
            }
        }

        assert_eq!(visited, vec!["a", "b", "c"]);
        assert_eq!(stops, 1);
        assert_eq!(h.playback().status, PlaybackStatus::Stopped);
    }

    #[test]
    fn play_next_on_empty_queue_stops() {
        let mut h = Harness::new();
        h.controller.play_next();

        assert_eq!(h.drain_player(), vec![PlayerDirective::Stop]);
        assert_eq!(h.playback().status, PlaybackStatus::Stopped);
    }

    #[test]
    fn play_next_from_last_item_stops() {
        let mut h = Harness::with_queue(&["a"]);
        h.controller.play_item_by_id("a");
        h.controller.model.set_status(PlaybackStatus::Playing);
        h.drain_player();

        h.controller.play_next();

        assert_eq!(h.queue_ids(), vec!["a"]);
        assert_eq!(h.playback().status, PlaybackStatus::Stopped);
        assert_eq!(h.current(), None);
        assert_eq!(h.drain_player(), vec![PlayerDirective::Stop]);
    }

    #[test]
    fn play_next_with_vanished_current_restarts_at_first() {
        let mut h = Harness::with_queue(&["a", "b"]);
        h.controller.play_item_by_id("b");
        h.controller.model.replace_queue(vec![
            crate::controller::test_support::item("x"),
            crate::controller::test_support::item("y"),
        ]);

        h.controller.play_next();

        assert_eq!(h.current(), Some("x"));
    }

    #[test]
    fn play_unknown_id_changes_nothing() {
        let mut h = Harness::with_queue(&["a"]);
        let before = h.playback().clone();

        h.controller.play_item_by_id("missing");

        assert_eq!(h.playback(), &before);
        assert!(h.drain_player().is_empty());
        assert!(h.drain_surface().is_empty());
    }

    #[test]
    fn play_item_sets_loading_and_directs_player() {
        let mut h = Harness::with_queue(&["a", "b"]);
        h.controller.play_item_by_id("b");

        assert_eq!(h.playback().status, PlaybackStatus::Loading);
        assert_eq!(h.playback().title, "Title b");
        assert!(matches!(
            h.drain_player().as_slice(),
            [PlayerDirective::PlayItem(item)] if item.id == "b"
        ));
        let updates = h.drain_surface();
        assert!(matches!(&updates[0], SurfaceUpdate::Playback(p) if p.current_id.as_deref() == Some("b")));
        assert!(matches!(&updates[1], SurfaceUpdate::Tooltip(_)));
    }

    #[test]
    fn toggle_on_empty_stopped_queue_is_noop_twice() {
        let mut h = Harness::new();
        let before = h.playback().clone();

        for _ in 0..2 {
            h.controller.toggle_playback();
            assert_eq!(h.playback(), &before);

            // State is unchanged but still re-broadcast
            let updates = h.drain_surface();
            assert!(matches!(
                updates.as_slice(),
                [SurfaceUpdate::Playback(p), SurfaceUpdate::Tooltip(_)] if *p == before
            ));
        }
        assert!(h.drain_player().is_empty());
    }

    #[test]
    fn toggle_pauses_resumes_and_starts() {
        let mut h = Harness::with_queue(&["a", "b"]);

        h.controller.toggle_playback();
        assert_eq!(h.current(), Some("a"));
        assert_eq!(h.playback().status, PlaybackStatus::Loading);
        assert!(matches!(
            h.drain_surface().as_slice(),
            [.., SurfaceUpdate::Playback(p), SurfaceUpdate::Tooltip(_)]
                if p.status == PlaybackStatus::Loading
        ));

        h.controller.model.set_status(PlaybackStatus::Playing);
        h.drain_player();

        h.controller.toggle_playback();
        assert_eq!(h.playback().status, PlaybackStatus::Paused);
        assert_eq!(h.drain_player(), vec![PlayerDirective::Pause]);

        h.controller.toggle_playback();
        assert_eq!(h.playback().status, PlaybackStatus::Playing);
        assert_eq!(h.drain_player(), vec![PlayerDirective::Resume]);
    }

    #[test]
    fn stop_clears_current() {
        let mut h = Harness::with_queue(&["a"]);
        h.controller.play_item_by_id("a");
        h.controller.stop_playback();

        let playback = h.playback();
        assert_eq!(playback.status, PlaybackStatus::Stopped);
        assert_eq!(playback.current_id, None);
        assert!(playback.title.is_empty());
    }

    #[test]
    fn reorder_out_of_range_leaves_queue() {
        let mut h = Harness::with_queue(&["a", "b", "c"]);

        for (from, to) in [(1, 1), (3, 0), (0, 3)] {
            h.controller.reorder(from, to);
        }
        assert_eq!(h.queue_ids(), vec!["a", "b", "c"]);
        assert!(h.drain_surface().is_empty());

        h.controller.reorder(2, 0);
        assert_eq!(h.queue_ids(), vec!["c", "a", "b"]);
        assert!(matches!(h.drain_surface().as_slice(), [SurfaceUpdate::Queue { .. }]));
    }

    #[test]
    fn removing_current_advances_to_same_index() {
        let mut h = Harness::with_queue(&["a", "b", "c"]);
        h.controller.play_item_by_id("b");

        h.controller.remove_item("b");

        assert_eq!(h.queue_ids(), vec!["a", "c"]);
        assert_eq!(h.current(), Some("c"));
        assert_eq!(h.playback().status, PlaybackStatus::Loading);
    }

    #[test]
    fn removing_current_last_item_wraps_to_first() {
        let mut h = Harness::with_queue(&["a", "b"]);
        h.controller.play_item_by_id("b");

        h.controller.remove_item("b");

        assert_eq!(h.current(), Some("a"));
    }

    #[test]
    fn removing_only_item_stops() {
        let mut h = Harness::with_queue(&["a"]);
        h.controller.play_item_by_id("a");
        h.drain_player();

        h.controller.remove_item("a");

        assert!(h.queue_ids().is_empty());
        assert_eq!(h.playback().status, PlaybackStatus::Stopped);
        assert_eq!(h.drain_player(), vec![PlayerDirective::Stop]);
    }

    #[test]
    fn removing_other_item_keeps_playback() {
        let mut h = Harness::with_queue(&["a", "b"]);
        h.controller.play_item_by_id("a");
        h.drain_player();

        h.controller.remove_item("b");
        h.controller.remove_item("missing");

        assert_eq!(h.current(), Some("a"));
        assert!(h.drain_player().is_empty());
    }

    #[test]
    fn queue_scenario_with_player_reports() {
        let mut h = Harness::with_queue(&["a", "b", "c"]);

        h.controller.play_next();
        assert_eq!(h.current(), Some("a"));
        assert_eq!(h.playback().status, PlaybackStatus::Loading);

        h.controller.apply_player_report(PlayerReport::status(PlaybackStatus::Playing));
        assert_eq!(h.playback().status, PlaybackStatus::Playing);

        h.controller.apply_player_report(PlayerReport::ended());
        assert_eq!(h.current(), Some("b"));
        assert_eq!(h.playback().status, PlaybackStatus::Loading);
    }
}
