use {
    crate::{
        Calendar,
        canonical::CanonicalRecord,
        types::{Insurance, Location, VaccinationType},
    },
    chrono::{DateTime, Utc},
    serde::{Serialize, Serializer},
    std::collections::HashMap,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRecord {
    #[serde(rename = "type")]
    pub vaccination_type: VaccinationType,
    pub location: Location,
    pub insurance: Insurance,
    #[serde(serialize_with = "serialize_days")]
    pub days: Option<f64>, // median wait, None when no probe saw availability
}

// Whole medians are written as integers, matching older chart files
fn serialize_days<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match *value {
        Some(days) if days.fract() == 0.0 && days.abs() < i64::MAX as f64 => {
            serializer.serialize_i64(days as i64)
        }
        Some(days) => serializer.serialize_f64(days),
        None => serializer.serialize_none(),
    }
}

type GroupKey = (VaccinationType, Location, Insurance);

fn group_key(record: &CanonicalRecord) -> GroupKey {
    (
        record.vaccination_type,
        record.location,
        record.insurance.clone(),
    )
}

/// Groups records by (type, location, insurance) and reduces each group to the
/// median of its known wait times, anchored at `reference`. Output follows the
/// first-seen order of the groups.
pub fn aggregate<'a>(
    calendar: Calendar,
    records: impl IntoIterator<Item = &'a CanonicalRecord>,
    reference: DateTime<Utc>,
) -> Vec<AggregateRecord> {
    let mut groups: Vec<(GroupKey, Vec<Option<i64>>)> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for record in records {
        let key = group_key(record);
        let days = record.days_until_next(calendar, reference);
        match index.get(&key) {
            Some(&idx) => groups[idx].1.push(days),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![days]));
            }
        }
    }

    groups
        .into_iter()
        .map(|((vaccination_type, location, insurance), days)| {
            let mut known: Vec<f64> = days.into_iter().flatten().map(|d| d as f64).collect();
            AggregateRecord {
                vaccination_type,
                location,
                insurance,
                days: median(&mut known),
            }
        })
        .collect()
}

/// Mean of the two central values for even counts, the central value for odd
/// counts, `None` for an empty slice.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
