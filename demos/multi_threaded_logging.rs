use std::sync::Arc;

use sevlog::{Destination, Severity, logger_config};

struct Worker {
    id: usize,
}

impl Worker {
    fn run(&self, sink: &sevlog::LogSink) {
        sevlog::info!(sink: sink, "worker", self.id, "started");
        for step in 0..3 {
            sevlog::debug!(sink: sink, "step", step);
        }
        if self.id == 2 {
            sevlog::warning!(sink: sink, "worker 2 is slow");
        }
    }
}

fn main() {
    let path = "/tmp/sevlog_demo.log";
    std::fs::remove_file(path).ok();

    let sink = Arc::new(
        logger_config()
            .with_log_file(path)
            .expect("Unable to open log file")
            .with_level(Severity::Info)
            .with_destination(Destination::File)
            .build(),
    );
    sevlog::always!(sink: sink, "demo starting");

    let handles: Vec<_> = (0..4)
        .map(|id| {
            let sink = Arc::clone(&sink);
            std::thread::spawn(move || Worker { id }.run(&sink))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    sink.set_destination(Destination::Console);
    sevlog::always!(sink: sink, "demo done, log file follows");
    sevlog::buffer!(sink: sink, "(buffer lines are hidden below the Buffer level)");
    sink.set_level(Severity::Buffer);
    for line in std::fs::read_to_string(path).unwrap().lines() {
        sevlog::buffer!(sink: sink, line);
    }
}
