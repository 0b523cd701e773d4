use {
    crate::{
        Calendar, Result,
        bucketing::{DayBuckets, recent_window},
        canonical::{CanonicalRecord, Canonicalizer},
        statistics::{AggregateRecord, aggregate},
        types::ProbeBatch,
    },
    chrono::{DateTime, SecondsFormat, Utc},
    serde::{Serialize, Serializer},
    std::time::Duration,
    tracing::{debug, info},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSource {
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: DateTime<Utc>,
    pub current: Vec<AggregateRecord>,
    pub overall: Vec<DaySummary>,
}

#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub vaccinations: Vec<AggregateRecord>,
}

// Millisecond precision with a `Z` suffix, independent of chrono's default
fn serialize_timestamp<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Debug, Clone, Copy)]
pub struct Processor {
    calendar: Calendar,
    recent_window: Duration,
    public_only: bool,
}

impl Processor {
    pub const fn new(calendar: Calendar, recent_window: Duration, public_only: bool) -> Self {
        Self {
            calendar,
            recent_window,
            public_only,
        }
    }

    /// Canonicalizes every batch before any grouping happens; the first
    /// unresolvable record aborts the whole run.
    pub fn process(&self, batches: &[ProbeBatch], now: DateTime<Utc>) -> Result<ChartSource> {
        let canonicalizer = Canonicalizer::new(self.calendar, self.public_only);

        let mut records = Vec::new();
        for batch in batches {
            records.extend(canonicalizer.canonicalize_all(&batch.results, batch.date)?);
        }

        info!(
            "Canonicalized {} records from {} batches",
            records.len(),
            batches.len()
        );

        self.assemble(&records, now)
    }

    pub fn assemble(&self, records: &[CanonicalRecord], now: DateTime<Utc>) -> Result<ChartSource> {
        let recent = recent_window(records, now, self.recent_window);
        info!(
            "{} records within {:?} of {}",
            recent.len(),
            self.recent_window,
            now
        );
        let current = aggregate(self.calendar, recent, now);

        let buckets = DayBuckets::build(self.calendar, records);
        let mut overall = Vec::with_capacity(buckets.len());
        for (date, bucket) in buckets.iter() {
            let reference = self.calendar.start_of_day(date)?;
            let vaccinations = aggregate(self.calendar, bucket.iter().copied(), reference);
            debug!(
                "{}: {} records in {} groups",
                date,
                bucket.len(),
                vaccinations.len()
            );
            overall.push(DaySummary {
                date: date.to_string(),
                vaccinations,
            });
        }

        Ok(ChartSource {
            updated_at: now,
            current,
            overall,
        })
    }
}
