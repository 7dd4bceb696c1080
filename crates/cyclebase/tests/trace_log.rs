// Runs in its own test binary since it installs a global logger.
use cyclebase::trace::{EVENT_TARGET, TRACE_DEPTH};
use cyclebase::{error_event, notice_event, trace_scope};
use log::{LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;

struct Capture(Mutex<Vec<(String, String)>>);

impl Log for Capture {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.0
            .lock()
            .unwrap()
            .push((record.target().to_owned(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

fn outer(n: u32) -> u32 {
    let _t = trace_scope!("outer", "n={}", n);
    inner() + n
}

fn inner() -> u32 {
    let _t = trace_scope!("inner");
    1
}

#[test]
fn trace_lines_and_events() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Trace);

    assert_eq!(outer(2), 3);
    assert_eq!(TRACE_DEPTH.get(), 0);

    notice_event!("disk {} online", 3);
    error_event!("disk {} failed", 4);

    let lines = CAPTURE.0.lock().unwrap().clone();
    let messages: Vec<&str> = lines.iter().map(|(_, m)| m.as_str()).collect();
    assert_eq!(
        &messages[..4],
        &["outer (n=2) {", "  inner () {", "  } // inner", "} // outer"]
    );

    let events: Vec<&str> = lines
        .iter()
        .filter(|(t, _)| t == EVENT_TARGET)
        .map(|(_, m)| m.as_str())
        .collect();
    assert_eq!(events, ["disk 3 online", "disk 4 failed"]);
    // and each event also went to the regular log
    assert_eq!(
        messages.iter().filter(|m| **m == "disk 3 online").count(),
        2
    );
}
