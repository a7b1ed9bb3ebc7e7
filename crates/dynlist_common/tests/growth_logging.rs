#![cfg(feature = "growth_logging")]

use std::{
    io::{self, Write},
    sync::Arc,
};

use dynlist_common::prelude::*;
use dynlist_logging::{set_logger, LogLevel, Logger};
use parking_lot::Mutex;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

static LOGGER: Logger = Logger::new();

#[test]
fn reallocations_are_logged() {
    LOGGER.set_log_to_console(false);
    LOGGER.set_always_flush(true);
    LOGGER.set_max_level(LogLevel::Verbose);

    let capture = Capture::default();
    assert!(LOGGER.add_writer(Box::new(capture.clone())).is_ok());
    set_logger(&LOGGER);

    let mut list = DynList::<u16>::new();
    for i in 0..5 {
        list.append(i);
    }
    list.trim_to_length();

    let output = String::from_utf8_lossy(&capture.0.lock()).into_owned();
    assert!(output.contains("[Collections(DynList)]"));
    assert!(output.contains("from 0 to 4 slots"));
    assert!(output.contains("from 4 to 8 slots"));
    assert!(output.contains("from 8 to 5 slots"));
}
