//! A year → month → week picker, to jump to any week

use chrono::{Datelike, NaiveDate};

use crate::config::{PICKER_YEAR_COUNT, PICKER_YEARS_BEFORE};
use crate::error::{Error, Result};
use crate::week::{weeks_intersecting, week_range, WeekRange};

/// What the picker currently displays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerView {
    Years,
    Months,
    Weeks,
}

/// One row of the weeks view
#[derive(Clone, Debug, PartialEq)]
pub struct WeekChoice {
    pub range: WeekRange,
    /// Whether this is the week currently displayed by the app
    pub is_selected: bool,
}

/// The state of an open picker
#[derive(Clone, Debug, PartialEq)]
pub struct WeekPicker {
    view: PickerView,
    year: i32,
    /// 1 = January
    month: u32,
    /// The date the app displayed when the picker was opened
    anchor: NaiveDate,
}

impl WeekPicker {
    /// Open a picker on the weeks of the month of `displayed_date`
    pub fn open(displayed_date: NaiveDate) -> Self {
        Self {
            view: PickerView::Weeks,
            year: displayed_date.year(),
            month: displayed_date.month(),
            anchor: displayed_date,
        }
    }

    pub fn view(&self) -> PickerView { self.view }
    pub fn year(&self) -> i32 { self.year }
    pub fn month(&self) -> u32 { self.month }

    /// Go back to the list of years (from the header)
    pub fn show_years(&mut self) {
        self.view = PickerView::Years;
    }

    /// Go back to the list of months (from the header)
    pub fn show_months(&mut self) {
        self.view = PickerView::Months;
    }

    /// Select a year, within the years chrono can represent
    pub fn select_year(&mut self, year: i32) {
        let supported = NaiveDate::MIN.year()..=NaiveDate::MAX.year();
        if supported.contains(&year) == false {
            log::warn!("Year {} is out of range", year);
        }
        self.year = year.max(*supported.start()).min(*supported.end());
        self.view = PickerView::Months;
    }

    pub fn select_month(&mut self, month: u32) -> Result<()> {
        if month == 0 || month > 12 {
            return Err(Error::InvalidMonth(month));
        }
        self.month = month;
        self.view = PickerView::Weeks;
        Ok(())
    }

    /// The years the years view offers
    pub fn years(&self) -> Vec<i32> {
        let first = self.year.saturating_sub(PICKER_YEARS_BEFORE);
        (first..first.saturating_add(PICKER_YEAR_COUNT)).collect()
    }

    /// The weeks the weeks view offers, for the current year and month
    pub fn weeks(&self) -> Vec<WeekChoice> {
        let displayed_monday = week_range(self.anchor).monday();
        weeks_intersecting(self.year, self.month)
            .map(|range| WeekChoice { is_selected: range.monday() == displayed_monday, range })
            .collect()
    }

    /// Pick a week. Returns its Monday, the new date to display, if this week is offered by the weeks view
    pub fn select_week(&self, range: &WeekRange) -> Option<NaiveDate> {
        if self.view != PickerView::Weeks {
            log::warn!("Selecting a week while the picker shows {:?}", self.view);
            return None;
        }
        weeks_intersecting(self.year, self.month)
            .find(|week| week == range)
            .map(|week| week.monday())
    }
}
