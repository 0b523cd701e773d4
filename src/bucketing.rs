use {
    crate::{Calendar, canonical::CanonicalRecord},
    chrono::{DateTime, Utc},
    std::{collections::HashMap, time::Duration},
};

/// Records grouped by calendar day, keys kept in first-seen order.
#[derive(Debug, Default)]
pub struct DayBuckets<'a> {
    buckets: Vec<(String, Vec<&'a CanonicalRecord>)>,
    index: HashMap<String, usize>,
}

impl<'a> DayBuckets<'a> {
    pub fn build(
        calendar: Calendar,
        records: impl IntoIterator<Item = &'a CanonicalRecord>,
    ) -> Self {
        let mut buckets = Self::default();
        for record in records {
            buckets.insert(calendar.date_key(record.sampled_at), record);
        }
        buckets
    }

    fn insert(&mut self, key: String, record: &'a CanonicalRecord) {
        match self.index.get(&key) {
            Some(&idx) => self.buckets[idx].1.push(record),
            None => {
                self.index.insert(key.clone(), self.buckets.len());
                self.buckets.push((key, vec![record]));
            }
        }
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&[&'a CanonicalRecord]> {
        self.index
            .get(key)
            .map(|&idx| self.buckets[idx].1.as_slice())
    }

    #[cfg(test)]
    fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a CanonicalRecord])> {
        self.buckets
            .iter()
            .map(|(key, records)| (key.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }
}

/// Records sampled within `[now - window, now]`, both ends inclusive.
pub fn recent_window<'a>(
    records: impl IntoIterator<Item = &'a CanonicalRecord>,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<&'a CanonicalRecord> {
    // An unrepresentable window reaches back to the earliest instant
    let start = chrono::Duration::from_std(window)
        .ok()
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    records
        .into_iter()
        .filter(|record| record.sampled_at >= start && record.sampled_at <= now)
        .collect()
}
