pub const SECTION_IDS: [&str; 7] = [
    "hero", "about", "pipeline", "aws", "tooling", "deploy", "contact",
];

pub const BACK_TO_TOP_THRESHOLD_PX: f64 = 400.0;

pub fn known_section_id(candidate: &str) -> Option<&'static str> {
    SECTION_IDS.iter().copied().find(|id| *id == candidate)
}

pub fn progress_percent(offset_px: f64, scrollable_height_px: f64) -> f64 {
    if scrollable_height_px <= 0.0 {
        return 0.0;
    }

    (offset_px / scrollable_height_px * 100.0).clamp(0.0, 100.0)
}

#[derive(Clone, PartialEq, Debug)]
pub struct ViewState {
    pub active_section_id: &'static str,
    pub scroll_progress_percent: f64,
    pub show_back_to_top: bool,
}

impl ViewState {
    pub fn initial() -> Self {
        Self {
            active_section_id: SECTION_IDS[0],
            scroll_progress_percent: 0.0,
            show_back_to_top: false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RevealPhase {
    Unobserved,
    Observing,
    Revealed,
}

#[derive(Default)]
pub struct RevealSet {
    phases: Vec<RevealPhase>,
}

impl RevealSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self) -> usize {
        self.phases.push(RevealPhase::Observing);
        self.phases.len() - 1
    }

    // Observing -> Revealed is the only transition; a revealed target never
    // goes back.
    pub fn mark_revealed(&mut self, index: usize) -> bool {
        match self.phases.get_mut(index) {
            Some(phase) if *phase == RevealPhase::Observing => {
                *phase = RevealPhase::Revealed;
                true
            }
            _ => false,
        }
    }

    pub fn phase(&self, index: usize) -> RevealPhase {
        self.phases
            .get(index)
            .copied()
            .unwrap_or(RevealPhase::Unobserved)
    }
}

pub struct ScrollEngine {
    view: ViewState,
    reveals: RevealSet,
    disposed: bool,
}

impl ScrollEngine {
    pub fn new() -> Self {
        Self {
            view: ViewState::initial(),
            reveals: RevealSet::new(),
            disposed: false,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn sample_scroll(&mut self, offset_px: f64, scrollable_height_px: f64) -> bool {
        if self.disposed {
            return false;
        }

        let next_progress = progress_percent(offset_px, scrollable_height_px);
        let next_back_to_top = offset_px > BACK_TO_TOP_THRESHOLD_PX;
        let changed = self.view.scroll_progress_percent != next_progress
            || self.view.show_back_to_top != next_back_to_top;

        self.view.scroll_progress_percent = next_progress;
        self.view.show_back_to_top = next_back_to_top;
        changed
    }

    // Entries are applied in batch order, so when several sections intersect
    // in one callback the last one processed wins. Unknown ids are skipped:
    // an anchor missing from the document is never observed and never active.
    pub fn apply_section_batch<'a, I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        if self.disposed {
            return false;
        }

        let before = self.view.active_section_id;

        for (id, intersecting) in entries {
            if !intersecting {
                continue;
            }

            if let Some(known) = known_section_id(id) {
                self.view.active_section_id = known;
            }
        }

        self.view.active_section_id != before
    }

    pub fn track_reveal_target(&mut self) -> usize {
        self.reveals.track()
    }

    pub fn mark_revealed(&mut self, index: usize) -> bool {
        if self.disposed {
            return false;
        }

        self.reveals.mark_revealed(index)
    }

    pub fn reveal_phase(&self, index: usize) -> RevealPhase {
        self.reveals.phase(index)
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_matches_clamped_ratio() {
        assert_eq!(progress_percent(0.0, 600.0), 0.0);
        assert_eq!(progress_percent(150.0, 600.0), 25.0);
        assert_eq!(progress_percent(600.0, 600.0), 100.0);
        assert_eq!(progress_percent(900.0, 600.0), 100.0);
        assert_eq!(progress_percent(-50.0, 600.0), 0.0);
    }

    #[test]
    fn zero_scrollable_height_resolves_to_zero() {
        assert_eq!(progress_percent(0.0, 0.0), 0.0);
        assert_eq!(progress_percent(250.0, 0.0), 0.0);
        assert_eq!(progress_percent(250.0, -10.0), 0.0);
    }

    #[test]
    fn back_to_top_requires_offset_strictly_past_threshold() {
        let mut engine = ScrollEngine::new();

        engine.sample_scroll(0.0, 1000.0);
        assert!(!engine.view().show_back_to_top);

        engine.sample_scroll(400.0, 1000.0);
        assert!(!engine.view().show_back_to_top);

        engine.sample_scroll(400.5, 1000.0);
        assert!(engine.view().show_back_to_top);

        engine.sample_scroll(0.0, 1000.0);
        assert!(!engine.view().show_back_to_top);
    }

    #[test]
    fn sample_scroll_reports_whether_view_changed() {
        let mut engine = ScrollEngine::new();

        assert!(engine.sample_scroll(300.0, 600.0));
        assert!(!engine.sample_scroll(300.0, 600.0));
        assert!(engine.sample_scroll(450.0, 600.0));
    }

    #[test]
    fn later_batch_entries_overwrite_earlier_ones() {
        let mut engine = ScrollEngine::new();

        let changed = engine.apply_section_batch([("pipeline", true), ("about", true)]);
        assert!(changed);
        assert_eq!(engine.view().active_section_id, "about");
    }

    #[test]
    fn non_intersecting_and_unknown_entries_are_skipped() {
        let mut engine = ScrollEngine::new();

        engine.apply_section_batch([("aws", true)]);
        let changed = engine.apply_section_batch([("contact", false), ("sidebar", true)]);

        assert!(!changed);
        assert_eq!(engine.view().active_section_id, "aws");
    }

    #[test]
    fn batch_returning_to_current_section_reports_no_change() {
        let mut engine = ScrollEngine::new();

        let changed = engine.apply_section_batch([("about", true), ("hero", true)]);
        assert!(!changed);
        assert_eq!(engine.view().active_section_id, "hero");
    }

    #[test]
    fn active_section_is_always_a_known_id() {
        let mut engine = ScrollEngine::new();
        engine.apply_section_batch([("deploy", true)]);

        assert!(known_section_id(engine.view().active_section_id).is_some());
    }

    #[test]
    fn reveal_target_transitions_once_and_stays_revealed() {
        let mut engine = ScrollEngine::new();
        let index = engine.track_reveal_target();
        assert_eq!(engine.reveal_phase(index), RevealPhase::Observing);

        assert!(engine.mark_revealed(index));
        assert_eq!(engine.reveal_phase(index), RevealPhase::Revealed);

        assert!(!engine.mark_revealed(index));
        assert_eq!(engine.reveal_phase(index), RevealPhase::Revealed);
    }

    #[test]
    fn untracked_reveal_target_is_unobserved() {
        let reveals = RevealSet::new();
        assert_eq!(reveals.phase(3), RevealPhase::Unobserved);
    }

    #[test]
    fn disposed_engine_ignores_every_event() {
        let mut engine = ScrollEngine::new();
        let index = engine.track_reveal_target();
        engine.sample_scroll(450.0, 600.0);
        engine.dispose();
        let frozen = engine.view().clone();

        assert!(!engine.sample_scroll(0.0, 600.0));
        assert!(!engine.apply_section_batch([("contact", true)]));
        assert!(!engine.mark_revealed(index));
        assert_eq!(engine.view(), &frozen);
        assert!(engine.is_disposed());
    }

    #[test]
    fn seven_section_scroll_scenario() {
        let mut engine = ScrollEngine::new();
        assert_eq!(SECTION_IDS.len(), 7);
        assert_eq!(engine.view().active_section_id, "hero");

        engine.sample_scroll(300.0, 600.0);
        assert_eq!(engine.view().scroll_progress_percent, 50.0);
        assert!(!engine.view().show_back_to_top);

        engine.sample_scroll(450.0, 600.0);
        assert_eq!(engine.view().scroll_progress_percent, 75.0);
        assert!(engine.view().show_back_to_top);
    }
}
