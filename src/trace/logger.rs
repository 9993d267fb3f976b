use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::TraceEvent;

pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
    events: Mutex<Vec<TraceEvent>>,
    capture: bool,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
                events: Mutex::new(Vec::new()),
                capture: false,
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self::disabled()
            }
        }
    }

    /// Logger that drops every event.
    pub fn disabled() -> Self {
        Self {
            file: None,
            events: Mutex::new(Vec::new()),
            capture: false,
        }
    }

    /// Logger that keeps events in memory instead of writing them out.
    pub fn in_memory() -> Self {
        Self {
            file: None,
            events: Mutex::new(Vec::new()),
            capture: true,
        }
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(_) => vec![],
        }
    }

    pub fn log(&self, event: &TraceEvent) {
        if self.capture {
            if let Ok(mut events) = self.events.lock() {
                events.push(event.clone());
            }
            return;
        }

        let file_mutex = match &self.file {
            Some(f) => f,
            None => return, // tracing disabled
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Warning: failed to serialize trace event: {}", e);
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Warning: trace logger lock poisoned: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            eprintln!("Warning: failed to write trace event: {}", e);
        }
    }
}

impl Default for TraceLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
