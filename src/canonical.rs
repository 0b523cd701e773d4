use {
    crate::{
        Calendar, Result,
        types::{Insurance, Location, ProbeResponse, RawProbeResult, VaccinationType},
    },
    chrono::{DateTime, NaiveDate, Utc},
};

/// A successful, fully resolved probe. The next availability is kept as a
/// calendar date so wait times can be anchored to any reference instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    pub sampled_at: DateTime<Utc>,
    pub location: Location,
    pub vaccination_type: VaccinationType,
    pub insurance: Insurance,
    pub next_available: Option<NaiveDate>,
}

impl CanonicalRecord {
    pub fn days_until_next(&self, calendar: Calendar, reference: DateTime<Utc>) -> Option<i64> {
        self.next_available
            .map(|day| calendar.days_until(reference, day))
    }
}

#[derive(Debug, Clone)]
pub struct Canonicalizer {
    calendar: Calendar,
    public_only: bool,
}

impl Canonicalizer {
    pub const fn new(calendar: Calendar, public_only: bool) -> Self {
        Self {
            calendar,
            public_only,
        }
    }

    /// `Ok(None)` for records filtered out or failed probes; unresolvable
    /// identifiers and unparsable dates abort with an error.
    pub fn canonicalize(
        &self,
        result: &RawProbeResult,
        sampled_at: DateTime<Utc>,
    ) -> Result<Option<CanonicalRecord>> {
        let booking = &result.source.booking_source;

        if self.public_only && booking.insurance != Insurance::Public {
            return Ok(None);
        }

        let Some(response) = &result.response else {
            return Ok(None);
        };

        let location = Location::from_practice_id(&booking.site.doctolib.practice_id)?;
        let vaccination_type = VaccinationType::from_code(&booking.vaccination)?;

        let next_available = next_date(response)
            .map(|date| self.calendar.parse_day(date))
            .transpose()?;

        Ok(Some(CanonicalRecord {
            sampled_at,
            location,
            vaccination_type,
            insurance: booking.insurance.clone(),
            next_available,
        }))
    }

    pub fn canonicalize_all<'a>(
        &self,
        results: impl IntoIterator<Item = &'a RawProbeResult>,
        sampled_at: DateTime<Utc>,
    ) -> Result<Vec<CanonicalRecord>> {
        let mut records = Vec::new();
        for result in results {
            if let Some(record) = self.canonicalize(result, sampled_at)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

// Upstream `next` sometimes names a day without any bookable slot, so the first
// availability that actually has slots wins when it carries a date
fn next_date(response: &ProbeResponse) -> Option<&str> {
    response
        .data
        .availabilities
        .iter()
        .find(|availability| !availability.slots.is_empty())
        .and_then(|availability| availability.date.as_deref())
        .or(response.next.as_deref())
}
