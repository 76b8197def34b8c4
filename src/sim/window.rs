//! Sliding buffer of generated lanes, sorted by row

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::generate::generate_lane;
use super::lane::Lane;
use super::state::EntityIds;
use crate::consts::*;
use crate::settings::DifficultyTier;

/// Lanes currently alive, contiguous and ascending by row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaneWindow {
    pub lanes: Vec<Lane>,
}

impl LaneWindow {
    /// Generate rows `0..count`
    pub fn initial<R: Rng + ?Sized>(
        count: i32,
        tier: DifficultyTier,
        rng: &mut R,
        ids: &mut EntityIds,
    ) -> Self {
        Self {
            lanes: (0..count).map(|row| generate_lane(row, tier, rng, ids)).collect(),
        }
    }

    pub fn first_row(&self) -> Option<i32> {
        self.lanes.first().map(|l| l.row)
    }

    pub fn last_row(&self) -> Option<i32> {
        self.lanes.last().map(|l| l.row)
    }

    fn index_of(&self, row: i32) -> Option<usize> {
        let first = self.first_row()?;
        let index = usize::try_from(row - first).ok()?;
        (index < self.lanes.len()).then_some(index)
    }

    /// Lane at `row`, if it is still in the buffer
    pub fn get(&self, row: i32) -> Option<&Lane> {
        self.index_of(row).map(|i| &self.lanes[i])
    }

    pub fn get_mut(&mut self, row: i32) -> Option<&mut Lane> {
        self.index_of(row).map(|i| &mut self.lanes[i])
    }

    /// Append lanes until the buffer reaches `lead + LANE_LOOKAHEAD - 1`.
    /// Returns how many lanes were generated.
    pub fn ensure_ahead<R: Rng + ?Sized>(
        &mut self,
        lead: i32,
        tier: DifficultyTier,
        rng: &mut R,
        ids: &mut EntityIds,
    ) -> usize {
        let mut added = 0;
        loop {
            let next = match self.last_row() {
                Some(last) if last >= lead + LANE_LOOKAHEAD - 1 => break,
                Some(last) => last + 1,
                None => 0,
            };
            self.lanes.push(generate_lane(next, tier, rng, ids));
            added += 1;
        }
        added
    }

    /// Drop the oldest lanes beyond `max`
    pub fn trim(&mut self, max: usize) {
        if self.lanes.len() > max {
            let excess = self.lanes.len() - max;
            self.lanes.drain(..excess);
        }
    }

    /// Lanes with rows in `min..=max`
    pub fn rows(&self, min: i32, max: i32) -> &[Lane] {
        let (start, end) = self.bounds(min, max);
        &self.lanes[start..end]
    }

    pub fn rows_mut(&mut self, min: i32, max: i32) -> &mut [Lane] {
        let (start, end) = self.bounds(min, max);
        &mut self.lanes[start..end]
    }

    fn bounds(&self, min: i32, max: i32) -> (usize, usize) {
        let start = self.lanes.partition_point(|l| l.row < min);
        let end = self.lanes.partition_point(|l| l.row <= max).max(start);
        (start, end)
    }

    /// Nearest grass lane at or behind `row`
    pub fn nearest_grass_at_or_behind(&self, row: i32) -> Option<&Lane> {
        self.lanes
            .iter()
            .rev()
            .filter(|l| l.row <= row)
            .find(|l| l.is_grass())
    }

    /// Idle preview: keep lanes generated up to `max_visible` and cap the buffer
    pub fn preview_scroll<R: Rng + ?Sized>(
        &mut self,
        max_visible: i32,
        tier: DifficultyTier,
        rng: &mut R,
        ids: &mut EntityIds,
    ) {
        let next = self.last_row().map_or(0, |r| r + 1);
        if next <= max_visible {
            self.lanes.push(generate_lane(next, tier, rng, ids));
        }
        self.trim(MAX_PREVIEW_LANES);
    }

    /// Advance every lane's environment. Returns rows whose train just departed.
    pub fn advance_all<R: Rng + ?Sized>(&mut self, rng: &mut R, ids: &mut EntityIds) -> Vec<i32> {
        let mut trains = Vec::new();
        for lane in &mut self.lanes {
            if lane.advance(rng, ids) {
                trains.push(lane.row);
            }
        }
        trains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn window(count: i32) -> (LaneWindow, Pcg32, EntityIds) {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ids = EntityIds::default();
        let window = LaneWindow::initial(count, DifficultyTier::Normal, &mut rng, &mut ids);
        (window, rng, ids)
    }

    #[test]
    fn test_lookup_by_row() {
        let (window, _, _) = window(20);
        assert_eq!(window.get(0).map(|l| l.row), Some(0));
        assert_eq!(window.get(19).map(|l| l.row), Some(19));
        assert!(window.get(20).is_none());
        assert!(window.get(-1).is_none());
    }

    #[test]
    fn test_one_new_lane_per_forward_row() {
        let (mut window, mut rng, mut ids) = window(20);
        assert_eq!(window.ensure_ahead(0, DifficultyTier::Normal, &mut rng, &mut ids), 0);
        assert_eq!(window.ensure_ahead(1, DifficultyTier::Normal, &mut rng, &mut ids), 1);
        assert_eq!(window.last_row(), Some(20));
    }

    #[test]
    fn test_trim_keeps_newest_contiguous() {
        let (mut window, mut rng, mut ids) = window(20);
        window.ensure_ahead(60, DifficultyTier::Normal, &mut rng, &mut ids);
        window.trim(MAX_LANES);
        assert_eq!(window.lanes.len(), MAX_LANES);
        assert_eq!(window.last_row(), Some(79));
        for pair in window.lanes.windows(2) {
            assert_eq!(pair[1].row, pair[0].row + 1);
        }
        assert!(window.get(79).is_some());
        assert!(window.get(29).is_none());
    }

    #[test]
    fn test_row_slices() {
        let (window, _, _) = window(20);
        let rows = window.rows(-3, 4);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].row, 0);
        assert!(window.rows(30, 40).is_empty());
    }

    #[test]
    fn test_safe_start_is_grass_fallback() {
        let (window, _, _) = window(20);
        let lane = window.nearest_grass_at_or_behind(15);
        assert!(lane.is_some_and(|l| l.row <= 15 && l.is_grass()));
    }

    #[test]
    fn test_preview_scroll_caps_buffer() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ids = EntityIds::default();
        let mut window = LaneWindow::default();
        for max_visible in 0..100 {
            window.preview_scroll(max_visible, DifficultyTier::Normal, &mut rng, &mut ids);
        }
        assert_eq!(window.lanes.len(), MAX_PREVIEW_LANES);
        assert_eq!(window.last_row(), Some(99));
    }
}
