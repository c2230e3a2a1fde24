//! Some utility functions

use chrono::{Local, NaiveDate};

use crate::state::AppState;
use crate::task::Task;
use crate::week::WeekRange;

/// Today's date, in the local time zone
pub fn today() -> NaiveDate {
    Local::now().naive_local().date()
}

/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let completed_week = match task.completed_week_key() {
        Some(key) => format!(" (done in {})", key),
        None => String::new(),
    };
    println!("    {} [{:<6}] {}\t#{}{}", completion, task.priority(), task.name(), task.id(), completed_week);
    if let Some(notes) = task.notes() {
        println!("          {}", notes);
    }
}

/// A debug utility that pretty-prints the displayed week and its tasks
pub fn print_week(state: &AppState) {
    println!("{} ({})", state.current_week().label(), state.current_week_key());
    if state.tasks().is_empty() {
        println!("    No tasks for this week.");
    }
    for task in state.tasks() {
        print_task(task);
    }
}

/// A debug utility that pretty-prints weeks, e.g. the ones of a month
pub fn print_weeks<I: IntoIterator<Item = WeekRange>>(weeks: I) {
    for (i, week) in weeks.into_iter().enumerate() {
        println!("    Week {}\t{}\t{}", i + 1, week.label(), week.key());
    }
}
