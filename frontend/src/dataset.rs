use std::collections::HashMap;

use chrono::{DateTime, Duration, DurationRound, Utc};
use common::req::{Measurement, MeasurementType};

/// Measurements sent by one device for one patient within the same minute belong together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub patient: u64,
    pub device: u64,
    pub minute: DateTime<Utc>,
}

impl GroupKey {
    pub fn of(measurement: &Measurement) -> Self {
        Self {
            patient: measurement.patient,
            device: measurement.device,
            minute: minute_of(measurement.timestamp),
        }
    }
}

// one slot per entry of MeasurementType::KNOWN
const SLOTS: usize = 4;

fn minute_of(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(Duration::minutes(1)).unwrap_or(ts)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotValue {
    pub id: u64,
    pub value: f64,
}

/// One reading of a device: at most one value per known measurement type.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub patient: u64,
    pub device: u64,
    pub timestamp: DateTime<Utc>, // first seen, not rounded
    pub minute: DateTime<Utc>,
    slots: [Option<SlotValue>; SLOTS],
}

impl Snapshot {
    fn new(first: &Measurement, key: GroupKey) -> Self {
        Self {
            patient: key.patient,
            device: key.device,
            timestamp: first.timestamp,
            minute: key.minute,
            slots: [None; SLOTS],
        }
    }

    pub fn key(&self) -> GroupKey {
        GroupKey {
            patient: self.patient,
            device: self.device,
            minute: self.minute,
        }
    }

    pub fn slot(&self, kind: &MeasurementType) -> Option<SlotValue> {
        kind.slot().and_then(|i| self.slots[i])
    }

    /// One entry per known type, in display order, empty when the value is still missing.
    pub fn cards(&self) -> impl Iterator<Item = (MeasurementType, Option<SlotValue>)> + '_ {
        MeasurementType::KNOWN
            .into_iter()
            .zip(self.slots.iter().copied())
    }
}

/// Groups a flat list of measurements into snapshots, most recent first.
///
/// Every measurement lands in exactly one snapshot. A type seen twice in the same snapshot
/// keeps the value that came last in `measurements`. Unknown types join their snapshot
/// without filling a slot. Snapshots with the same first-seen time keep encounter order.
pub fn group_measurements(measurements: &[Measurement]) -> Vec<Snapshot> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut snapshots: Vec<Snapshot> = Vec::new();

    for measurement in measurements {
        let key = GroupKey::of(measurement);
        let pos = *index.entry(key).or_insert_with(|| {
            snapshots.push(Snapshot::new(measurement, key));
            snapshots.len() - 1
        });

        if let Some(slot) = measurement.type_donne.slot() {
            snapshots[pos].slots[slot] = Some(SlotValue {
                id: measurement.id,
                value: measurement.valeur,
            });
        }
    }

    snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    snapshots
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub data: Vec<(DateTime<Utc>, f64)>,
    pub kind: MeasurementType,
    pub unit: String,
    pub name: String,
}

/// The last `last_n` points of one measurement type, in the order they were received.
pub fn series(measurements: &[Measurement], kind: MeasurementType, last_n: usize) -> Series {
    let data: Vec<_> = measurements
        .iter()
        .filter(|m| m.type_donne == kind)
        .map(|m| (m.timestamp, m.valeur))
        .collect();
    let skip = data.len().saturating_sub(last_n);

    Series {
        data: data.into_iter().skip(skip).collect(),
        unit: kind.unit().to_owned(),
        name: kind.name().to_owned(),
        kind,
    }
}
