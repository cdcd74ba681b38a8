use chrono::NaiveDate;

use super::domain::{inclusive_days, Trip};
use super::policy::DateWindow;

/// Days of presence as sorted, disjoint, inclusive spans.
///
/// Overlapping or back-to-back trips collapse into one span so a day is never
/// counted twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PresenceCalendar {
    spans: Vec<(NaiveDate, NaiveDate)>,
}

impl PresenceCalendar {
    pub(crate) fn from_trips<'a, I>(trips: I) -> Self
    where
        I: IntoIterator<Item = &'a Trip>,
    {
        let ranges = trips
            .into_iter()
            .filter(|trip| trip.counts_toward_allowance)
            .map(|trip| (trip.entry, trip.exit))
            .collect();
        Self::from_ranges(ranges)
    }

    fn from_ranges(mut ranges: Vec<(NaiveDate, NaiveDate)>) -> Self {
        ranges.sort_unstable();
        let mut spans: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(ranges.len());

        for (start, end) in ranges {
            if let Some(last) = spans.last_mut() {
                let touches = last.1.succ_opt().map_or(true, |next| start <= next);
                if touches {
                    last.1 = last.1.max(end);
                    continue;
                }
            }
            spans.push((start, end));
        }

        Self { spans }
    }

    /// Calendar with an additional stay merged in.
    pub(crate) fn with_stay(&self, entry: NaiveDate, exit: NaiveDate) -> Self {
        let mut ranges = self.spans.clone();
        ranges.push((entry, exit));
        Self::from_ranges(ranges)
    }

    pub(crate) fn first_day(&self) -> Option<NaiveDate> {
        self.spans.first().map(|span| span.0)
    }

    pub(crate) fn last_day(&self) -> Option<NaiveDate> {
        self.spans.last().map(|span| span.1)
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.span_containing(date).is_some()
    }

    /// The merged span of presence that includes `date`.
    pub(crate) fn span_containing(&self, date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        self.spans
            .iter()
            .copied()
            .find(|(start, end)| *start <= date && date <= *end)
    }

    /// Number of presence days inside `window`.
    pub(crate) fn days_within(&self, window: DateWindow) -> u32 {
        self.spans
            .iter()
            .filter(|(start, end)| *start <= window.end && window.start <= *end)
            .map(|(start, end)| inclusive_days((*start).max(window.start), (*end).min(window.end)))
            .sum()
    }

    /// Presence days within `[from, to]`, in order.
    pub(crate) fn presence_days_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> + '_ {
        self.spans
            .iter()
            .filter(move |(start, end)| *start <= to && from <= *end)
            .flat_map(move |(start, end)| {
                let first = (*start).max(from);
                let last = (*end).min(to);
                first.iter_days().take_while(move |day| *day <= last)
            })
    }
}
