use crate::model::{Scalar, ScheduleEntry, Student};

pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a stored identifier refers to the searched one.
///
/// Text compares after `normalize` on both sides. A numeric identifier also
/// matches any input that parses to the same number, so `"007"` finds
/// student `7`.
pub fn id_matches(stored: &Scalar, input: &str) -> bool {
    let needle = normalize(input);
    match stored {
        Scalar::Null | Scalar::Other(_) => false,
        Scalar::Number(_) => {
            if normalize(&stored.to_string()) == needle {
                return true;
            }
            match (stored.as_f64(), needle.parse::<f64>()) {
                (Some(a), Ok(b)) => a == b,
                _ => false,
            }
        }
        Scalar::Text(s) => normalize(s) == needle,
        Scalar::Bool(b) => b.to_string() == needle,
    }
}

/// First student in table order whose identifier matches.
pub fn find_student<'a>(identifier: &str, students: &'a [Student]) -> Option<&'a Student> {
    students.iter().find(|s| id_matches(&s.id, identifier))
}

pub fn entries_for<'a>(
    identifier: &'a str,
    entries: &'a [ScheduleEntry],
) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
    entries.iter().filter(move |e| id_matches(&e.id, identifier))
}
