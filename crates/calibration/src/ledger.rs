//! Outcome Ledger
//!
//! Two date-keyed maps: snapshots, appended once per date by the daily run,
//! and outcomes, attached once the realized horizon has elapsed. They are
//! separate so resolving past dates never blocks recording today. The map
//! entry guard is the per-date exclusive writer; the journal line is written
//! while it is held, before the value becomes visible.
//!
//! Streaks for the clocks are derived from here (trailing entries only).

use crate::error::{LedgerError, LedgerResult};
use crate::events::EventRule;
use crate::journal::{Journal, JournalRecord};
use chainwalk_core::{Date, OutcomeRecord, RealizedStats, Regime, StateVector};
use chainwalk_engine::{DayMark, day_mark};
use chainwalk_ports::Clock;
use chrono::Days;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use log::{debug, info, warn};
use std::sync::Arc;

/// Trailing window of whole days ending on `end` (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub days: u32,
    pub end: Date,
}

impl Window {
    pub fn trailing(days: u32, end: Date) -> Self {
        Self { days, end }
    }

    /// First date in the window, saturating at the earliest representable date
    pub fn start(&self) -> Date {
        self.end
            .checked_sub_days(Days::new(self.days.saturating_sub(1) as u64))
            .unwrap_or(Date::MIN)
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.start() && date <= self.end
    }
}

/// A snapshot joined to its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDay {
    pub state: StateVector,
    pub outcome: OutcomeRecord,
}

pub struct OutcomeLedger {
    snapshots: DashMap<Date, StateVector>,
    outcomes: DashMap<Date, OutcomeRecord>,
    events: EventRule,
    clock: Arc<dyn Clock>,
    journal: Option<Journal>,
}

impl OutcomeLedger {
    pub fn new(events: EventRule, clock: Arc<dyn Clock>) -> Self {
        Self {
            snapshots: DashMap::new(),
            outcomes: DashMap::new(),
            events,
            clock,
            journal: None,
        }
    }

    /// Mirror every write to a journal
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Rebuild from journal records without re-journaling them.
    ///
    /// Outcomes were checked when first written and are restored as is.
    pub fn replay(&self, records: Vec<JournalRecord>) -> LedgerResult<usize> {
        let count = records.len();
        for record in records {
            match record {
                JournalRecord::Snapshot { state } => match self.snapshots.entry(state.date) {
                    Entry::Occupied(_) => return Err(LedgerError::DuplicateDate(state.date)),
                    Entry::Vacant(slot) => {
                        slot.insert(state);
                    }
                },
                JournalRecord::Outcome { outcome } => {
                    if !self.snapshots.contains_key(&outcome.date) {
                        return Err(LedgerError::UnknownDate(outcome.date));
                    }
                    match self.outcomes.entry(outcome.date) {
                        Entry::Occupied(_) => {
                            return Err(LedgerError::AlreadyResolved(outcome.date));
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(outcome);
                        }
                    }
                }
            }
        }
        info!(
            "[LEDGER] Replayed {} records: {} snapshots, {} outcomes",
            count,
            self.snapshots.len(),
            self.outcomes.len()
        );
        Ok(count)
    }

    /// Append a snapshot; the original is kept if the date is taken
    pub fn record(&self, state: StateVector) -> LedgerResult<()> {
        let date = state.date;
        match self.snapshots.entry(date) {
            Entry::Occupied(_) => {
                warn!("[LEDGER] Snapshot for {} already recorded, keeping original", date);
                Err(LedgerError::DuplicateDate(date))
            }
            Entry::Vacant(slot) => {
                if let Some(journal) = &self.journal {
                    journal.append(&JournalRecord::Snapshot {
                        state: state.clone(),
                    })?;
                }
                info!(
                    "[LEDGER] Recorded {} {} IRQ={} ({:.2})",
                    date, state.regime, state.irq.band, state.irq.value
                );
                slot.insert(state);
                Ok(())
            }
        }
    }

    /// Attach realized statistics to a recorded date and label it
    pub fn resolve(&self, date: Date, stats: RealizedStats) -> LedgerResult<OutcomeRecord> {
        if stats.date != date {
            return Err(LedgerError::DateMismatch {
                expected: date,
                found: stats.date,
            });
        }
        if !self.snapshots.contains_key(&date) {
            return Err(LedgerError::UnknownDate(date));
        }

        let today = self.clock.today();
        let resolvable_on = stats.horizon_end().ok_or(LedgerError::InvalidHorizon {
            date,
            horizon_days: stats.horizon_days,
        })?;
        if resolvable_on > today {
            return Err(LedgerError::HorizonNotElapsed {
                date,
                resolvable_on,
                today,
            });
        }
        if self.outcomes.contains_key(&date) {
            return Err(LedgerError::AlreadyResolved(date));
        }

        // Collected before taking the entry guard: iterating a map while
        // holding one of its shard locks deadlocks.
        let prior_vols: Vec<f64> = self
            .outcomes
            .iter()
            .filter(|o| *o.key() < date)
            .map(|o| o.stats.realized_vol)
            .collect();
        let vol_threshold = self.events.vol_threshold(&prior_vols);

        let outcome = OutcomeRecord {
            date,
            resolved_on: today,
            direction: self.events.direction(&stats),
            event: self.events.is_event(&stats, vol_threshold),
            vol_threshold,
            stats,
        };

        match self.outcomes.entry(date) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyResolved(date)),
            Entry::Vacant(slot) => {
                if let Some(journal) = &self.journal {
                    journal.append(&JournalRecord::Outcome {
                        outcome: outcome.clone(),
                    })?;
                }
                info!(
                    "[LEDGER] Resolved {} E={} vol={:.4} (threshold {:.4}) {}",
                    date,
                    outcome.event as u8,
                    outcome.stats.realized_vol,
                    vol_threshold,
                    outcome.direction
                );
                slot.insert(outcome.clone());
                Ok(outcome)
            }
        }
    }

    pub fn snapshot(&self, date: Date) -> Option<StateVector> {
        self.snapshots.get(&date).map(|s| s.value().clone())
    }

    pub fn outcome(&self, date: Date) -> Option<OutcomeRecord> {
        self.outcomes.get(&date).map(|o| o.value().clone())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn latest_date(&self) -> Option<Date> {
        self.snapshots.iter().map(|s| *s.key()).max()
    }

    /// Clock marks for every snapshot before `before`, ascending
    pub fn history(&self, before: Date) -> Vec<DayMark> {
        let mut marks: Vec<DayMark> = self
            .snapshots
            .iter()
            .filter(|s| *s.key() < before)
            .map(|s| day_mark(s.value()))
            .collect();
        marks.sort_by_key(|m| m.date);
        marks
    }

    /// Regimes of all snapshots in date order
    pub fn regime_sequence(&self) -> Vec<Regime> {
        let mut days: Vec<(Date, Regime)> = self
            .snapshots
            .iter()
            .map(|s| (*s.key(), s.regime))
            .collect();
        days.sort_by_key(|(date, _)| *date);
        days.into_iter().map(|(_, regime)| regime).collect()
    }

    /// Recorded dates without an outcome, ascending
    pub fn unresolved(&self) -> Vec<Date> {
        let mut dates: Vec<Date> = self
            .snapshots
            .iter()
            .map(|s| *s.key())
            .filter(|d| !self.outcomes.contains_key(d))
            .collect();
        dates.sort();
        dates
    }

    /// Resolved days inside the window, ascending
    pub fn resolved_in(&self, window: Window) -> Vec<ResolvedDay> {
        let mut days: Vec<ResolvedDay> = self
            .outcomes
            .iter()
            .filter(|o| window.contains(*o.key()))
            .filter_map(|o| {
                self.snapshots.get(o.key()).map(|s| ResolvedDay {
                    state: s.value().clone(),
                    outcome: o.value().clone(),
                })
            })
            .collect();
        days.sort_by_key(|d| d.state.date);
        debug!(
            "[LEDGER] {} resolved days in {}..={}",
            days.len(),
            window.start(),
            window.end
        );
        days
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl std::fmt::Debug for OutcomeLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutcomeLedger")
            .field("snapshots", &self.snapshots.len())
            .field("outcomes", &self.outcomes.len())
            .field("clock", &self.clock.name())
            .field("journal", &self.journal)
            .finish()
    }
}
