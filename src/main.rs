use dynlist_common::prelude::*;
use dynlist_logging::{log_error, log_info, set_logger, LogCategory, LogLevel, Logger};

pub const LOG_CAT : LogCategory = LogCategory::new("Main");

static LOGGER: Logger = Logger::new();

fn setup_logging() {
    LOGGER.set_max_level(if cfg!(debug_assertions) { LogLevel::Verbose } else { LogLevel::Info });
    set_logger(&LOGGER);
}

fn main() {
    setup_logging();
    log_info!(LOG_CAT, "Starting dynlist demo ({})", dynlist_base::func_name!());

    let mut list = DynList::<i32>::new();
    for i in 1..=5 {
        list.append(i);
    }
    log_info!(LOG_CAT, "appended 5 values: {list:?} (len {}, capacity {})", list.len(), list.capacity());

    list.insert_at(0, 0);
    list.insert_at(100, 6);
    list.append_range(&[9, 8, 7]);
    log_info!(LOG_CAT, "after inserts and a range: {list:?} (capacity {})", list.capacity());

    list.reverse();
    list.sort_in_place();
    match list.binary_search(&7) {
        Ok(index) => log_info!(LOG_CAT, "found 7 at index {index}"),
        Err(index) => log_info!(LOG_CAT, "7 would be inserted at {index}"),
    }

    if let Err(err) = list.remove_at(42) {
        log_error!(LOG_CAT, "could not remove: {err}");
    }
    let removed = list.remove_value(&3);
    log_info!(LOG_CAT, "removed {removed:?}, contains 3: {}", list.contains(&3));

    let snapshot = list.to_snapshot();
    list.trim_to_length();
    log_info!(LOG_CAT, "trimmed to capacity {}, snapshot {snapshot:?}", list.capacity());

    let other = DynList::<i32>::from_slice(&snapshot);
    log_info!(LOG_CAT, "rebuilt list equals trimmed list: {} (capacities {} and {})", list.equals(&other), list.capacity(), other.capacity());

    let joined = DynList::concat(&list, &other);
    log_info!(LOG_CAT, "concatenated {} elements with capacity {}", joined.len(), joined.capacity());

    LOGGER.flush();
}
