//! Registrant list controller: owns the roster and the accreditation flow.
//!
//! The controller never touches the network. Actions that need the gateway
//! return a [`GatewayCommand`]; whoever runs it feeds the outcome back through
//! [`RegistrantController::apply`]. While a command is outstanding the
//! controller stays fully usable, so search and sort keep working.

use std::collections::{HashSet, VecDeque};

use shared::{
    domain::{Registrant, RowNumber, SortField, SortSpec},
    stats::RosterStats,
};
use tracing::{debug, warn};

use crate::{
    error::ActionRejected,
    view::{view_refs, EmptyState},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCommand {
    ListRegistrants,
    MarkAccredited { row_number: RowNumber },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    RegistrantsLoaded(Vec<Registrant>),
    LoadFailed { reason: String },
    AccreditSucceeded { row_number: RowNumber },
    AccreditFailed { row_number: RowNumber, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccreditFlow {
    Idle,
    ConfirmPending(RowNumber),
    Mutating(RowNumber),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn success(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Success!".to_string(),
            description: description.into(),
        }
    }

    fn error(description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            description: description.into(),
        }
    }
}

/// What the confirmation dialog shows for the pending registrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPrompt<'a> {
    pub row_number: RowNumber,
    pub full_name: &'a str,
    pub email: &'a str,
    pub status: &'a str,
    /// Confirm and cancel are disabled while the mark request is in flight.
    pub busy: bool,
}

#[derive(Debug)]
pub struct RegistrantController {
    phase: LoadPhase,
    records: Vec<Registrant>,
    query: String,
    sort: SortSpec,
    flow: AccreditFlow,
    in_flight: HashSet<RowNumber>,
    notifications: VecDeque<Notification>,
}

impl Default for RegistrantController {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrantController {
    pub fn new() -> Self {
        Self {
            phase: LoadPhase::Loading,
            records: Vec::new(),
            query: String::new(),
            sort: SortSpec::default(),
            flow: AccreditFlow::Idle,
            in_flight: HashSet::new(),
            notifications: VecDeque::new(),
        }
    }

    /// Enters `Loading` and returns the command that fetches the roster.
    pub fn start(&mut self) -> GatewayCommand {
        self.phase = LoadPhase::Loading;
        GatewayCommand::ListRegistrants
    }

    pub fn apply(&mut self, event: GatewayEvent) {
        match event {
            GatewayEvent::RegistrantsLoaded(records) => {
                debug!(count = records.len(), "controller: roster replaced");
                self.records = records;
                self.phase = LoadPhase::Ready;
                self.drop_stale_selection();
            }
            GatewayEvent::LoadFailed { reason } => {
                warn!(%reason, "controller: roster load failed");
                self.phase = LoadPhase::Ready;
                self.notifications.push_back(Notification::error(
                    "Failed to fetch registrants. Please try again.",
                ));
            }
            GatewayEvent::AccreditSucceeded { row_number } => {
                self.in_flight.remove(&row_number);
                let accredited = self.record_mut(row_number).map(|record| {
                    record.mark_accredited();
                    record.full_name.clone()
                });
                match accredited {
                    Some(full_name) => {
                        self.notifications.push_back(Notification::success(format!(
                            "{full_name} has been successfully accredited."
                        )));
                    }
                    None => {
                        warn!(row = row_number.0, "controller: accredited row no longer in roster");
                    }
                }
                if self.flow == AccreditFlow::Mutating(row_number) {
                    self.flow = AccreditFlow::Idle;
                }
            }
            GatewayEvent::AccreditFailed { row_number, reason } => {
                warn!(row = row_number.0, %reason, "controller: accreditation failed");
                self.in_flight.remove(&row_number);
                self.notifications.push_back(Notification::error(
                    "Failed to accredit registrant. Please try again.",
                ));
                if self.flow == AccreditFlow::Mutating(row_number) {
                    self.flow = AccreditFlow::ConfirmPending(row_number);
                }
            }
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn records(&self) -> &[Registrant] {
        &self.records
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    /// Column-header selection; see [`SortSpec::select`].
    pub fn select_sort_field(&mut self, field: SortField) {
        self.sort.select(field);
    }

    pub fn visible(&self) -> Vec<&Registrant> {
        view_refs(&self.records, &self.query, self.sort)
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.is_loading() {
            return None;
        }
        EmptyState::classify(self.visible().len(), &self.query)
    }

    pub fn stats(&self) -> RosterStats {
        RosterStats::from_records(&self.records)
    }

    pub fn flow(&self) -> AccreditFlow {
        self.flow
    }

    /// True while the pending registrant's mark request is outstanding.
    pub fn is_mutating(&self) -> bool {
        matches!(self.flow, AccreditFlow::Mutating(_))
    }

    pub fn is_in_flight(&self, row_number: RowNumber) -> bool {
        self.in_flight.contains(&row_number)
    }

    pub fn pending(&self) -> Option<&Registrant> {
        match self.flow {
            AccreditFlow::Idle => None,
            AccreditFlow::ConfirmPending(row) | AccreditFlow::Mutating(row) => self.record(row),
        }
    }

    pub fn confirmation(&self) -> Option<ConfirmationPrompt<'_>> {
        let record = self.pending()?;
        Some(ConfirmationPrompt {
            row_number: record.row_number,
            full_name: &record.full_name,
            email: &record.email,
            status: &record.status,
            busy: self.is_mutating(),
        })
    }

    pub fn request_accredit(&mut self, row_number: RowNumber) -> Result<(), ActionRejected> {
        let record = self
            .record(row_number)
            .ok_or(ActionRejected::UnknownRow(row_number))?;
        if record.is_accredited() {
            return Err(ActionRejected::AlreadyAccredited(row_number));
        }
        if self.in_flight.contains(&row_number) {
            return Err(ActionRejected::InFlight(row_number));
        }
        self.flow = AccreditFlow::ConfirmPending(row_number);
        Ok(())
    }

    pub fn cancel_accredit(&mut self) -> Result<(), ActionRejected> {
        match self.flow {
            AccreditFlow::ConfirmPending(_) => {
                self.flow = AccreditFlow::Idle;
                Ok(())
            }
            AccreditFlow::Mutating(row) => Err(ActionRejected::InFlight(row)),
            AccreditFlow::Idle => Err(ActionRejected::NothingPending),
        }
    }

    /// Moves the pending registrant to `Mutating` and hands back the mark
    /// command. The record itself is only patched once the success event
    /// arrives.
    pub fn confirm_accredit(&mut self) -> Result<GatewayCommand, ActionRejected> {
        let row_number = match self.flow {
            AccreditFlow::ConfirmPending(row) => row,
            AccreditFlow::Mutating(row) => return Err(ActionRejected::InFlight(row)),
            AccreditFlow::Idle => return Err(ActionRejected::NothingPending),
        };
        match self.record(row_number) {
            None => return Err(ActionRejected::UnknownRow(row_number)),
            Some(record) if record.is_accredited() => {
                return Err(ActionRejected::AlreadyAccredited(row_number));
            }
            Some(_) => {}
        }

        self.in_flight.insert(row_number);
        self.flow = AccreditFlow::Mutating(row_number);
        debug!(row = row_number.0, "controller: accreditation confirmed");
        Ok(GatewayCommand::MarkAccredited { row_number })
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn record(&self, row_number: RowNumber) -> Option<&Registrant> {
        self.records.iter().find(|r| r.row_number == row_number)
    }

    fn record_mut(&mut self, row_number: RowNumber) -> Option<&mut Registrant> {
        self.records.iter_mut().find(|r| r.row_number == row_number)
    }

    fn drop_stale_selection(&mut self) {
        if let AccreditFlow::ConfirmPending(row) = self.flow {
            let still_eligible = self
                .record(row)
                .map(|r| !r.is_accredited())
                .unwrap_or(false);
            if !still_eligible {
                self.flow = AccreditFlow::Idle;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
