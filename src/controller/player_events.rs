//! Status reports arriving from the playback surface

use crate::model::PlayerReport;

use super::AppController;

impl AppController {
    pub fn apply_player_report(&mut self, report: PlayerReport) {
        tracing::trace!(?report, "Player report");
        self.model.merge_report(&report);

        if report.ended {
            tracing::debug!(current = ?self.model.current_id(), "Item ended, advancing");
            self.play_next();
            return;
        }

        self.broadcast_playback();
    }
}
