use crate::config::MatchOptions;
use crate::model::EventRecord;

/// Find the candidate representing the same real-world event as `record`.
///
/// Two alternative equality keys, tried per candidate in order, first hit
/// wins: (time, description), then (player, description). A key only applies
/// when both fields are present on both records; comparison is byte-exact
/// unless `options.normalize` is set.
pub fn find_match<'a>(
    record: &EventRecord,
    candidates: &'a [EventRecord],
    options: &MatchOptions,
) -> Option<&'a EventRecord> {
    for candidate in candidates {
        if field_eq(&record.time, &candidate.time, options)
            && field_eq(&record.description, &candidate.description, options)
        {
            return Some(candidate);
        }
        if field_eq(&record.player, &candidate.player, options)
            && field_eq(&record.description, &candidate.description, options)
        {
            return Some(candidate);
        }
    }
    None
}

fn field_eq(a: &Option<String>, b: &Option<String>, options: &MatchOptions) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            if options.normalize {
                a.trim().eq_ignore_ascii_case(b.trim())
            } else {
                a == b
            }
        }
        _ => false,
    }
}
