use crate::locator;
use crate::model::{Day, ScheduleEntry, Slot, DAY_COUNT, SLOT_COUNT};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub course: String,
    pub instructor: String,
    pub time: String,
}

impl Session {
    pub fn summary(&self) -> String {
        format!("{} / {} / {}", self.course, self.instructor, self.time)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Placeholder,
    Session(Session),
}

impl Cell {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Cell::Session(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No entry belongs to the identifier; every cell is a placeholder.
    NoSchedule,
    /// `skipped` counts matching entries whose (day, slot) is not on the grid.
    Rendered { rendered: usize, skipped: usize },
}

/// The weekly display grid: one row per lecture slot, one column per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: [[Cell; DAY_COUNT]; SLOT_COUNT],
    visible: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            rows: Default::default(),
            visible: false,
        }
    }

    /// Back to the startup state: all placeholders, container hidden.
    pub fn initialize(&mut self) {
        self.clear();
        self.visible = false;
    }

    fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            for cell in row.iter_mut() {
                *cell = Cell::Placeholder;
            }
        }
    }

    pub fn cell(&self, day: Day, slot: Slot) -> &Cell {
        &self.rows[slot.index()][day.index()]
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Every addressable cell in row-major order (slot, then canonical day).
    pub fn cells(&self) -> impl Iterator<Item = (Slot, Day, &Cell)> + '_ {
        Slot::all().flat_map(move |slot| {
            Day::ALL
                .into_iter()
                .map(move |day| (slot, day, self.cell(day, slot)))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells().filter(|(_, _, c)| c.is_occupied()).count()
    }

    /// Rebuild the grid for one student's entries.
    ///
    /// Entries are written in table order, so a later entry for the same cell
    /// replaces an earlier one. The container only becomes visible once a
    /// schedule has actually been written.
    pub fn render_schedule(&mut self, identifier: &str, entries: &[ScheduleEntry]) -> RenderOutcome {
        self.clear();

        let mut matched = 0usize;
        let mut rendered = 0usize;
        for entry in locator::entries_for(identifier, entries) {
            matched += 1;
            let Some((day, slot)) = entry.position() else {
                debug!(
                    day = %entry.day,
                    slot = %entry.slot,
                    "skipping entry outside the weekly grid"
                );
                continue;
            };
            self.rows[slot.index()][day.index()] = Cell::Session(Session {
                course: entry.course.to_string(),
                instructor: entry.instructor.to_string(),
                time: entry.time.to_string(),
            });
            rendered += 1;
        }

        if matched == 0 {
            return RenderOutcome::NoSchedule;
        }
        self.visible = true;
        RenderOutcome::Rendered {
            rendered,
            skipped: matched - rendered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scalar;
    use proptest::prelude::*;

    fn entry(id: &str, day: &str, slot: i64, course: &str) -> ScheduleEntry {
        ScheduleEntry {
            id: Scalar::from(id),
            day: Scalar::from(day),
            slot: Scalar::from(slot),
            course: Scalar::from(course),
            instructor: Scalar::from("Dr. X"),
            time: Scalar::from("10-11"),
        }
    }

    fn slot(n: u8) -> Slot {
        Slot::new(n).expect("slot")
    }

    #[test]
    fn new_grid_has_42_placeholders_and_is_hidden() {
        let mut grid = Grid::new();
        for _ in 0..3 {
            grid.initialize();
            assert_eq!(grid.cells().count(), 42);
            assert!(grid.cells().all(|(_, _, c)| *c == Cell::Placeholder));
            assert!(!grid.is_visible());
        }
    }

    #[test]
    fn cells_follow_slot_then_day_order() {
        let grid = Grid::new();
        let order: Vec<(u8, Day)> = grid.cells().map(|(s, d, _)| (s.get(), d)).take(7).collect();
        assert_eq!(order[0], (1, Day::Saturday));
        assert_eq!(order[5], (1, Day::Thursday));
        assert_eq!(order[6], (2, Day::Saturday));
    }

    #[test]
    fn renders_single_entry_into_its_cell() {
        let mut grid = Grid::new();
        let entries = vec![entry("123", "الأحد", 3, "Math")];
        let outcome = grid.render_schedule("123", &entries);
        assert_eq!(outcome, RenderOutcome::Rendered { rendered: 1, skipped: 0 });
        assert!(grid.is_visible());

        let Cell::Session(session) = grid.cell(Day::Sunday, slot(3)) else {
            panic!("expected a session at (Sunday, 3)");
        };
        assert_eq!(session.summary(), "Math / Dr. X / 10-11");
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn no_matching_entries_leaves_grid_blank_and_hidden() {
        let mut grid = Grid::new();
        let entries = vec![entry("999", "الأحد", 3, "Math")];
        assert_eq!(grid.render_schedule("123", &entries), RenderOutcome::NoSchedule);
        assert_eq!(grid.occupied_count(), 0);
        assert!(!grid.is_visible());
    }

    #[test]
    fn rerender_clears_previous_student() {
        let mut grid = Grid::new();
        let entries = vec![
            entry("1", "السبت", 1, "Art"),
            entry("2", "الخميس", 7, "Law"),
        ];
        grid.render_schedule("1", &entries);
        grid.render_schedule("2", &entries);
        assert_eq!(*grid.cell(Day::Saturday, slot(1)), Cell::Placeholder);
        assert!(grid.cell(Day::Thursday, slot(7)).is_occupied());
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let mut grid = Grid::new();
        let entries = vec![
            entry("1", "الإثنين", 2, "First"),
            entry("1", "الإثنين", 2, "Second"),
        ];
        let outcome = grid.render_schedule("1", &entries);
        assert_eq!(outcome, RenderOutcome::Rendered { rendered: 2, skipped: 0 });
        let Cell::Session(session) = grid.cell(Day::Monday, slot(2)) else {
            panic!("expected a session");
        };
        assert_eq!(session.course, "Second");
    }

    #[test]
    fn off_grid_entries_are_skipped_silently() {
        let mut grid = Grid::new();
        let entries = vec![
            entry("1", "الجمعة", 2, "Friday"),
            entry("1", "الأحد", 0, "Zero"),
            entry("1", "الأحد", 8, "Eight"),
            entry("1", "الأربعاء", 4, "Kept"),
        ];
        let outcome = grid.render_schedule("1", &entries);
        assert_eq!(outcome, RenderOutcome::Rendered { rendered: 1, skipped: 3 });
        assert_eq!(grid.occupied_count(), 1);
        assert!(grid.cell(Day::Wednesday, slot(4)).is_occupied());
    }

    #[test]
    fn structured_slot_is_skipped_and_others_render() {
        let entries: Vec<ScheduleEntry> = serde_json::from_value(serde_json::json!([
            { "id": "1", "d": "الأحد", "l": { "n": 3 }, "c": "Broken", "p": "-", "t": "-" },
            { "id": "1", "d": "الثلاثاء", "l": 5, "c": "Circuits", "p": "Dr. K", "t": "1-2" }
        ]))
        .expect("entries");
        let mut grid = Grid::new();
        let outcome = grid.render_schedule("1", &entries);
        assert_eq!(outcome, RenderOutcome::Rendered { rendered: 1, skipped: 1 });
        assert!(grid.cell(Day::Tuesday, slot(5)).is_occupied());
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn initialize_hides_a_rendered_grid() {
        let mut grid = Grid::new();
        grid.render_schedule("1", &[entry("1", "السبت", 1, "Art")]);
        grid.initialize();
        assert!(!grid.is_visible());
        assert_eq!(grid.occupied_count(), 0);
    }

    proptest! {
        #[test]
        fn rendering_is_idempotent(
            raw in proptest::collection::vec((0usize..3, 0usize..8, -1i64..9), 0..30)
        ) {
            let days = ["السبت", "الخميس", "الجمعة"];
            let entries: Vec<ScheduleEntry> = raw
                .iter()
                .enumerate()
                .map(|(i, (id, d, l))| {
                    entry(&id.to_string(), days[*d % days.len()], *l, &format!("C{}", i))
                })
                .collect();
            let mut a = Grid::new();
            let first = a.render_schedule("1", &entries);
            let snapshot = a.clone();
            let second = a.render_schedule("1", &entries);
            prop_assert_eq!(first, second);
            prop_assert_eq!(&a, &snapshot);
            prop_assert_eq!(a.cells().count(), 42);
        }
    }
}
