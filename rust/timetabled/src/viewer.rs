//! The student timetable viewer: one snapshot, one grid, one banner.
//!
//! Every search is a full rerun. The snapshot is re-read from storage, the
//! student is located, and the grid is rebuilt from scratch. Nothing derived
//! from an earlier search is consulted.

use crate::grid::{Grid, RenderOutcome};
use crate::locator;
use crate::model::Student;
use crate::setup::ViewerSettings;
use crate::status::{SearchError, Status, StatusBanner};
use crate::store::{self, LoadError, LoadedSnapshot};
use rusqlite::Connection;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Button,
    Enter,
}

impl Trigger {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "button" => Some(Trigger::Button),
            "enter" => Some(Trigger::Enter),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Button => "button",
            Trigger::Enter => "enter",
        }
    }
}

#[derive(Debug)]
pub struct Viewer {
    settings: ViewerSettings,
    grid: Grid,
    student: Option<Student>,
    loaded: Option<LoadedSnapshot>,
    banner: StatusBanner,
}

impl Viewer {
    pub fn new(settings: ViewerSettings) -> Self {
        Viewer {
            settings,
            grid: Grid::new(),
            student: None,
            loaded: None,
            banner: StatusBanner::default(),
        }
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ViewerSettings) {
        self.settings = settings;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn student(&self) -> Option<&Student> {
        self.student.as_ref()
    }

    pub fn loaded(&self) -> Option<&LoadedSnapshot> {
        self.loaded.as_ref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.banner.current()
    }

    /// Blank grid, first load, readiness banner.
    pub fn startup(&mut self, conn: &Connection) -> &Status {
        self.grid.initialize();
        self.student = None;

        let status = match self.reload(conn) {
            Ok(loaded) => {
                let students = loaded.snapshot.students.len();
                let entries = loaded.snapshot.schedule.len();
                self.loaded = Some(loaded);
                if students > 0 {
                    Status::ready(students, entries)
                } else {
                    Status::store_empty()
                }
            }
            Err(_) => Status::from(&SearchError::NoStoreData),
        };
        self.banner.report(status)
    }

    pub fn search(&mut self, conn: &Connection, input: &str, trigger: Trigger) -> &Status {
        debug!(trigger = trigger.as_str(), input, "search requested");
        let status = match self.run_search(conn, input) {
            Ok(status) => status,
            Err(e) => Status::from(&e),
        };
        self.banner.report(status)
    }

    pub fn help(&mut self) -> &Status {
        self.banner.report(Status::help())
    }

    fn run_search(&mut self, conn: &Connection, input: &str) -> Result<Status, SearchError> {
        let identifier = input.trim();
        if identifier.is_empty() {
            return Err(SearchError::EmptyInput);
        }

        let loaded = self.reload(conn).map_err(|_| SearchError::NoStoreData)?;
        let snapshot = &self.loaded.insert(loaded).snapshot;
        if snapshot.students.is_empty() {
            return Err(SearchError::NoStudents);
        }

        let student = locator::find_student(identifier, &snapshot.students)
            .ok_or_else(|| SearchError::StudentNotFound(identifier.to_string()))?;
        self.student = Some(student.clone());

        match self.grid.render_schedule(identifier, &snapshot.schedule) {
            RenderOutcome::NoSchedule => Ok(Status::no_schedule(identifier)),
            RenderOutcome::Rendered { rendered, skipped } => {
                info!(rendered, skipped, "schedule rendered");
                Ok(Status::schedule_loaded(&student.name.to_string()))
            }
        }
    }

    fn reload(&self, conn: &Connection) -> Result<LoadedSnapshot, LoadError> {
        let loaded = store::load(conn, &self.settings.storage_key)?;
        if let Some(previous) = &self.loaded {
            if previous.digest == loaded.digest {
                debug!(digest = %loaded.digest, "snapshot unchanged since last load");
            } else {
                info!(digest = %loaded.digest, "snapshot changed since last load");
            }
        }
        Ok(loaded)
    }
}
