use serde::{Deserialize, Serialize};

use crate::domain::Registrant;

/// Headline counters for a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterStats {
    pub total: usize,
    pub accredited: usize,
    pub pending: usize,
    /// Whole percentage, rounded half up. Zero for an empty roster.
    pub completion_rate: u8,
}

impl RosterStats {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Registrant>,
    {
        let (total, accredited) = records
            .into_iter()
            .fold((0usize, 0usize), |(total, accredited), r| {
                (total + 1, accredited + usize::from(r.is_accredited()))
            });
        let completion_rate = if total == 0 {
            0
        } else {
            ((accredited * 100 + total / 2) / total) as u8
        };
        Self {
            total,
            accredited,
            pending: total - accredited,
            completion_rate,
        }
    }
}
