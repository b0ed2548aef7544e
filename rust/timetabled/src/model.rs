use serde::{Deserialize, Serialize};
use std::fmt;

pub const DAY_COUNT: usize = 6;
pub const SLOT_COUNT: usize = 7;

/// A loosely-typed record field.
///
/// The admin tool that writes the snapshot does not normalise its values, so
/// identifiers and labels show up as strings, numbers, or occasionally
/// booleans and nulls. Everything is kept as written and only turned into
/// text at the edges. Arrays and objects land in `Other`, which never matches
/// an identifier, day, or slot and displays as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null | Scalar::Other(_) => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => {
                // 3.0 displays as "3", matching how the admin tool prints it.
                match n.as_f64() {
                    Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                        write!(f, "{}", v as i64)
                    }
                    _ => write!(f, "{}", n),
                }
            }
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
}

impl Day {
    /// Canonical column order.
    pub const ALL: [Day; DAY_COUNT] = [
        Day::Saturday,
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Saturday => "السبت",
            Day::Sunday => "الأحد",
            Day::Monday => "الإثنين",
            Day::Tuesday => "الثلاثاء",
            Day::Wednesday => "الأربعاء",
            Day::Thursday => "الخميس",
        }
    }

    /// Exact match on the stored day name; no trimming or alternate spellings.
    pub fn parse(s: &str) -> Option<Self> {
        Day::ALL.into_iter().find(|d| d.name() == s)
    }

    pub fn from_scalar(v: &Scalar) -> Option<Self> {
        match v {
            Scalar::Text(s) => Day::parse(s),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Day {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Lecture period, 1..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slot(u8);

impl Slot {
    pub fn new(n: u8) -> Option<Self> {
        if (1..=SLOT_COUNT as u8).contains(&n) {
            Some(Slot(n))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        (1..=SLOT_COUNT as u8).map(Slot)
    }

    /// Accepts a whole number, or the exact decimal text of one ("3", not "03").
    pub fn from_scalar(v: &Scalar) -> Option<Self> {
        match v {
            Scalar::Number(n) => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || !(1.0..=SLOT_COUNT as f64).contains(&f) {
                    return None;
                }
                Slot::new(f as u8)
            }
            Scalar::Text(s) => {
                let n: u8 = s.parse().ok()?;
                if n.to_string() != *s {
                    return None;
                }
                Slot::new(n)
            }
            _ => None,
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub id: Scalar,
    #[serde(default)]
    pub name: Scalar,
    #[serde(default)]
    pub spec: Scalar,
    #[serde(default)]
    pub section: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub id: Scalar,
    #[serde(rename = "d", default)]
    pub day: Scalar,
    #[serde(rename = "l", default)]
    pub slot: Scalar,
    #[serde(rename = "c", default)]
    pub course: Scalar,
    #[serde(rename = "p", default)]
    pub instructor: Scalar,
    #[serde(rename = "t", default)]
    pub time: Scalar,
}

impl ScheduleEntry {
    /// The grid position this entry targets, if it names a real cell.
    pub fn position(&self) -> Option<(Day, Slot)> {
        Some((Day::from_scalar(&self.day)?, Slot::from_scalar(&self.slot)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_rows")]
    pub students: Vec<Student>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub schedule: Vec<ScheduleEntry>,
}

/// A table that is `null` reads as empty, and rows that are not objects are
/// dropped so one bad row cannot hide the rest.
fn lenient_rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let rows: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect())
}
