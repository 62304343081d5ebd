//! Availability engine: which dates and time slots are actually bookable.
//!
//! Works from three inputs: the practitioner's working weekdays (catalog),
//! the non-cancelled appointments already in history, and the clock. A
//! 30-minute appointment occupies its start slot and the following
//! 15-minute slot, both when blocking others and when searching for a
//! start of its own.

use std::collections::HashSet;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::catalog::Catalog;
use crate::db::{Database, DbResult};

/// How far ahead `next_available_date` searches.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Slot granularity in minutes.
pub const SLOT_MINUTES: i64 = 15;

/// The fixed daily slot grid: 08:00-11:45 and 14:00-16:45 at 15-minute
/// steps. The 12:00-13:45 gap is the lunch closure.
pub fn master_slots() -> Vec<NaiveTime> {
    let mut slots = Vec::with_capacity(28);
    for (from_hour, to_hour) in [(8, 12), (14, 17)] {
        for hour in from_hour..to_hour {
            for minute in [0, 15, 30, 45] {
                if let Some(slot) = NaiveTime::from_hms_opt(hour, minute, 0) {
                    slots.push(slot);
                }
            }
        }
    }
    slots
}

/// Availability queries over the history store and catalog.
pub struct Availability<'a> {
    db: &'a Database,
    catalog: &'a Catalog,
    now: NaiveDateTime,
}

impl<'a> Availability<'a> {
    /// Query against the wall clock.
    pub fn new(db: &'a Database, catalog: &'a Catalog) -> Self {
        Self::at(db, catalog, Local::now().naive_local())
    }

    /// Query against a pinned clock (deterministic tests, replays).
    pub fn at(db: &'a Database, catalog: &'a Catalog, now: NaiveDateTime) -> Self {
        Self { db, catalog, now }
    }

    /// Enumerate `num_days` consecutive dates from `start`, keeping those
    /// on the practitioner's working weekdays that are not before today.
    /// Unknown practitioner yields an empty sequence.
    pub fn available_dates(
        &self,
        practitioner_id: &str,
        start: NaiveDate,
        num_days: u32,
    ) -> Vec<NaiveDate> {
        let Some(practitioner) = self.catalog.practitioner(practitioner_id) else {
            return Vec::new();
        };

        let today = self.now.date();
        (0..num_days)
            .map(|offset| start + Duration::days(i64::from(offset)))
            .filter(|date| practitioner.works_on(date.weekday()) && *date >= today)
            .collect()
    }

    /// Open start slots for a practitioner on a date, in grid order.
    ///
    /// A 30-minute request also needs the successor slot: free, and
    /// present in the grid (the last slot of each block can never start a
    /// 30-minute appointment). On today's date, only strictly-future
    /// times are offered. Unknown practitioner yields an empty sequence.
    pub fn available_slots(
        &self,
        practitioner_id: &str,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> DbResult<Vec<NaiveTime>> {
        if self.catalog.practitioner(practitioner_id).is_none() {
            return Ok(Vec::new());
        }

        let blocked = self.blocked_slots(practitioner_id, date)?;
        let grid = master_slots();

        let mut open: Vec<NaiveTime> = grid
            .iter()
            .copied()
            .filter(|slot| !blocked.contains(slot))
            .collect();

        if duration_minutes == 30 {
            open.retain(|slot| {
                let successor = *slot + Duration::minutes(SLOT_MINUTES);
                grid.contains(&successor) && !blocked.contains(&successor)
            });
        }

        if date == self.now.date() {
            let time_now = self.now.time();
            open.retain(|slot| *slot > time_now);
        }

        Ok(open)
    }

    /// First date in the next [`DEFAULT_WINDOW_DAYS`] days with at least
    /// one open 15-minute slot.
    ///
    /// Best effort: when every date in the window is fully booked this
    /// falls back to the first available date even though it has no open
    /// slots, so callers must treat the result as possibly slot-less.
    /// `None` only when the practitioner has no available dates at all.
    pub fn next_available_date(&self, practitioner_id: &str) -> DbResult<Option<NaiveDate>> {
        let dates = self.available_dates(practitioner_id, self.now.date(), DEFAULT_WINDOW_DAYS);
        if dates.is_empty() {
            return Ok(None);
        }

        for date in &dates {
            if !self.available_slots(practitioner_id, *date, 15)?.is_empty() {
                return Ok(Some(*date));
            }
        }

        Ok(Some(dates[0]))
    }

    /// Like [`next_available_date`](Self::next_available_date) but without
    /// the fallback: `None` unless a date actually has open slots.
    pub fn next_date_with_slots(&self, practitioner_id: &str) -> DbResult<Option<NaiveDate>> {
        let dates = self.available_dates(practitioner_id, self.now.date(), DEFAULT_WINDOW_DAYS);

        for date in &dates {
            if !self.available_slots(practitioner_id, *date, 15)?.is_empty() {
                return Ok(Some(*date));
            }
        }

        Ok(None)
    }

    /// Whether a proposed start would collide with existing non-cancelled
    /// bookings, counting the successor slot for 30-minute appointments.
    /// Used by the commit flow to reject stale drafts.
    pub fn slot_conflicts(
        &self,
        practitioner_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        duration_minutes: u32,
    ) -> DbResult<bool> {
        let blocked = self.blocked_slots(practitioner_id, date)?;
        if blocked.contains(&time) {
            return Ok(true);
        }
        if duration_minutes == 30 && blocked.contains(&(time + Duration::minutes(SLOT_MINUTES))) {
            return Ok(true);
        }
        Ok(false)
    }

    /// Slot cells occupied by non-cancelled appointments on a date: each
    /// appointment's start, plus the next cell for 30-minute bookings.
    fn blocked_slots(
        &self,
        practitioner_id: &str,
        date: NaiveDate,
    ) -> DbResult<HashSet<NaiveTime>> {
        let existing = self
            .db
            .appointments_for_practitioner_on(practitioner_id, date)?;

        let mut blocked = HashSet::new();
        for apt in &existing {
            let start = apt.date_time.time();
            blocked.insert(start);
            if apt.duration_minutes == 30 {
                blocked.insert(start + Duration::minutes(SLOT_MINUTES));
            }
        }
        Ok(blocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Appointment;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn time(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    fn book(db: &Database, catalog: &Catalog, practitioner: &str, when: NaiveDateTime, type_id: &str) {
        let apt = Appointment::new(
            when,
            catalog.appointment_type(type_id).unwrap(),
            catalog.practitioner(practitioner).unwrap(),
            "",
            catalog.practice().clone(),
        );
        db.insert_appointment(&apt).unwrap();
    }

    #[test]
    fn test_master_slots_grid() {
        let grid = master_slots();

        assert_eq!(grid.len(), 28);
        assert_eq!(grid[0], time(8, 0));
        assert_eq!(*grid.last().unwrap(), time(16, 45));

        // Ascending, and nothing over the lunch closure.
        assert!(grid.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(!grid.iter().any(|s| *s >= time(12, 0) && *s < time(14, 0)));
    }

    #[test]
    fn test_available_dates_unknown_practitioner_is_empty() {
        let db = Database::open_in_memory().unwrap();
        let catalog = Catalog::demo();
        let availability = Availability::at(&db, &catalog, dt(2026, 3, 2, 8, 0));

        assert!(availability
            .available_dates("house", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), 30)
            .is_empty());
        assert!(availability
            .available_slots("house", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), 15)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_available_dates_skip_past_days() {
        let db = Database::open_in_memory().unwrap();
        let catalog = Catalog::demo();
        // Wednesday; window starts the Monday before.
        let availability = Availability::at(&db, &catalog, dt(2026, 3, 4, 8, 0));

        let dates =
            availability.available_dates("wilson", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), 5);

        // Mon 2nd and Tue 3rd are gone; today stays.
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
            ]
        );
    }

    #[test]
    fn test_long_appointment_blocks_two_cells() {
        let db = Database::open_in_memory().unwrap();
        let catalog = Catalog::demo();
        book(&db, &catalog, "wilson", dt(2026, 3, 3, 10, 0), "long");

        let availability = Availability::at(&db, &catalog, dt(2026, 3, 2, 8, 0));
        let slots = availability
            .available_slots("wilson", NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(), 15)
            .unwrap();

        assert!(!slots.contains(&time(10, 0)));
        assert!(!slots.contains(&time(10, 15)));
        assert!(slots.contains(&time(9, 45)));
        assert!(slots.contains(&time(10, 30)));
    }

    #[test]
    fn test_thirty_minute_request_needs_free_successor() {
        let db = Database::open_in_memory().unwrap();
        let catalog = Catalog::demo();
        book(&db, &catalog, "wilson", dt(2026, 3, 3, 10, 0), "standard");

        let availability = Availability::at(&db, &catalog, dt(2026, 3, 2, 8, 0));
        let slots = availability
            .available_slots("wilson", NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(), 30)
            .unwrap();

        // 09:45 would run into the 10:00 booking.
        assert!(!slots.contains(&time(9, 45)));
        assert!(!slots.contains(&time(10, 0)));
        assert!(slots.contains(&time(10, 15)));

        // Block ends can never start a 30-minute appointment.
        assert!(!slots.contains(&time(11, 45)));
        assert!(!slots.contains(&time(16, 45)));
    }

    #[test]
    fn test_today_drops_past_and_current_times() {
        let db = Database::open_in_memory().unwrap();
        let catalog = Catalog::demo();
        let availability = Availability::at(&db, &catalog, dt(2026, 3, 2, 9, 0));

        let slots = availability
            .available_slots("wilson", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), 15)
            .unwrap();

        assert!(!slots.contains(&time(8, 45)));
        assert!(!slots.contains(&time(9, 0))); // not strictly future
        assert!(slots.contains(&time(9, 15)));
    }

    #[test]
    fn test_slot_conflicts_counts_adjacency() {
        let db = Database::open_in_memory().unwrap();
        let catalog = Catalog::demo();
        book(&db, &catalog, "wilson", dt(2026, 3, 3, 10, 0), "long");

        let availability = Availability::at(&db, &catalog, dt(2026, 3, 2, 8, 0));
        let date = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();

        assert!(availability.slot_conflicts("wilson", date, time(10, 0), 15).unwrap());
        assert!(availability.slot_conflicts("wilson", date, time(10, 15), 15).unwrap());
        // A 30-minute start at 09:45 reaches into the blocked 10:00 cell.
        assert!(availability.slot_conflicts("wilson", date, time(9, 45), 30).unwrap());
        assert!(!availability.slot_conflicts("wilson", date, time(9, 45), 15).unwrap());
        assert!(!availability.slot_conflicts("wilson", date, time(10, 45), 30).unwrap());
    }

    #[test]
    fn test_next_available_date_skips_full_days() {
        let db = Database::open_in_memory().unwrap();
        let catalog = Catalog::demo();

        // Park works Tue/Thu. Fill all of Tuesday the 3rd.
        for slot in master_slots() {
            let when = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap().and_time(slot);
            book(&db, &catalog, "park", when, "standard");
        }

        let availability = Availability::at(&db, &catalog, dt(2026, 3, 2, 8, 0));
        assert_eq!(
            availability.next_available_date("park").unwrap(),
            Some(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap())
        );
    }

    #[test]
    fn test_next_available_date_falls_back_when_window_is_full() {
        let db = Database::open_in_memory().unwrap();
        let catalog = Catalog::demo();
        let availability = Availability::at(&db, &catalog, dt(2026, 3, 2, 8, 0));

        // Fill every working day in the whole search window.
        for date in availability.available_dates(
            "park",
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            DEFAULT_WINDOW_DAYS,
        ) {
            for slot in master_slots() {
                book(&db, &catalog, "park", date.and_time(slot), "standard");
            }
        }

        // Best-effort fallback: the first date comes back even though it
        // has no open slots.
        let fallback = availability.next_available_date("park").unwrap();
        assert_eq!(fallback, Some(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()));
        assert!(availability
            .available_slots("park", fallback.unwrap(), 15)
            .unwrap()
            .is_empty());

        // The guaranteed variant refuses instead.
        assert_eq!(availability.next_date_with_slots("park").unwrap(), None);

        // And with no available dates at all, both return None.
        assert_eq!(availability.next_available_date("house").unwrap(), None);
    }
}
