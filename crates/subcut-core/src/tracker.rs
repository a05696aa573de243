// crates/subcut-core/src/tracker.rs
//
// Maps the playback clock onto the segment under it.
//
// Linear scan on every tick — at tens to low hundreds of segments this is
// cheaper than keeping any index structure consistent with free-form edits,
// and it always reads the latest committed bounds rather than a snapshot.

use crate::state::Segment;

/// The segment containing `time`, or None in a gap.
///
/// First match wins — segments are normally non-overlapping, but nothing
/// enforces that after arbitrary user retiming, so first-match is the
/// defined tie-break. Bounds are read leniently; a segment whose display
/// value is mid-edit (unparseable) simply never matches.
pub fn segment_at(segments: &[Segment], time: f64) -> Option<usize> {
    segments.iter().position(|s| {
        match (s.start.seconds(), s.end.seconds()) {
            (Some(start), Some(end)) => time >= start && time < end,
            _                        => false,
        }
    })
}

/// Change-deduplicating wrapper for observers outside the session (subtitle
/// overlays, scroll-into-view). Feed it every clock tick; it answers only
/// when the active index actually moved.
#[derive(Debug, Default)]
pub struct ActiveSegmentTracker {
    last: Option<usize>,
}

impl ActiveSegmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute for `time`. Returns `Some(new_active)` when the index
    /// differs from the previous tick (including transitions into a gap),
    /// `None` when nothing changed. Backward jumps (seeks) need no special
    /// handling — they're just another tick.
    pub fn advance(&mut self, segments: &[Segment], time: f64) -> Option<Option<usize>> {
        let idx = segment_at(segments, time);
        if idx == self.last {
            return None;
        }
        self.last = idx;
        Some(idx)
    }

    pub fn current(&self) -> Option<usize> {
        self.last
    }

    /// Forget the last index — used when the segment list is replaced.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Segment;

    /// Non-overlapping segments covering [1,2) and [3,4).
    fn segments() -> Vec<Segment> {
        vec![
            Segment::from_backend(1.0, 2.0, "a"),
            Segment::from_backend(3.0, 4.0, "b"),
        ]
    }

    #[test]
    fn gap_and_out_of_range_times_have_no_active_segment() {
        let segs = segments();
        assert_eq!(segment_at(&segs, 0.5), None); // before the first start
        assert_eq!(segment_at(&segs, 2.5), None); // between the spans
        assert_eq!(segment_at(&segs, 4.0), None); // at/after the last end
    }

    #[test]
    fn bounds_are_start_inclusive_end_exclusive() {
        let segs = segments();
        assert_eq!(segment_at(&segs, 1.0), Some(0));
        assert_eq!(segment_at(&segs, 1.999), Some(0));
        assert_eq!(segment_at(&segs, 2.0), None);
        assert_eq!(segment_at(&segs, 3.0), Some(1));
    }

    #[test]
    fn first_match_wins_on_overlap() {
        let segs = vec![
            Segment::from_backend(0.0, 5.0, "wide"),
            Segment::from_backend(1.0, 2.0, "nested"),
        ];
        assert_eq!(segment_at(&segs, 1.5), Some(0));
    }

    #[test]
    fn mid_edit_segment_never_matches() {
        let mut segs = segments();
        segs[0].start.set_raw("00:0"); // half-typed
        assert_eq!(segment_at(&segs, 1.5), None);
    }

    #[test]
    fn tracker_reports_each_transition_exactly_once() {
        let segs = segments();
        let mut t = ActiveSegmentTracker::new();

        assert_eq!(t.advance(&segs, 1.1), Some(Some(0)));
        assert_eq!(t.advance(&segs, 1.5), None); // still segment 0
        assert_eq!(t.advance(&segs, 2.5), Some(None)); // into the gap
        assert_eq!(t.advance(&segs, 2.7), None);
        assert_eq!(t.advance(&segs, 3.1), Some(Some(1)));
        // Backward seek.
        assert_eq!(t.advance(&segs, 1.2), Some(Some(0)));
        assert_eq!(t.current(), Some(0));
    }
}
