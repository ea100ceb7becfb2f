use std::collections::HashSet;

use super::Identifier;

pub const WANT: &str = "want";
pub const WANT_ERR: &str = "wantErr";

/// The only type text treated as an error result.
pub const ERROR_TYPE: &str = "error";

/// An identifier needs a generated name when it has none or is the blank `_`.
pub fn is_anonymous(name: &str) -> bool {
    name.is_empty() || name == "_"
}

#[derive(Default)]
struct Bucket {
    anonymous: usize,
    next: usize,
}

/// Give every anonymous identifier a readable name.
///
/// Error-typed identifiers become `wantErr`, everything else `want`. A
/// prefix is used bare when its bucket has exactly one anonymous member and
/// numbered from 1 otherwise. User-chosen names are kept and never reused:
/// a taken candidate moves on to the next free number.
pub fn assign_friendly_names(ids: &mut [Identifier]) {
    let mut plain = Bucket::default();
    let mut errors = Bucket::default();
    for id in ids.iter().filter(|id| is_anonymous(&id.name)) {
        if id.ty == ERROR_TYPE {
            errors.anonymous += 1;
        } else {
            plain.anonymous += 1;
        }
    }
    if plain.anonymous == 0 && errors.anonymous == 0 {
        return;
    }

    let mut taken: HashSet<String> = ids
        .iter()
        .filter(|id| !is_anonymous(&id.name))
        .map(|id| id.name.clone())
        .collect();

    for id in ids.iter_mut().filter(|id| is_anonymous(&id.name)) {
        let (bucket, prefix) = if id.ty == ERROR_TYPE {
            (&mut errors, WANT_ERR)
        } else {
            (&mut plain, WANT)
        };
        let name = next_name(bucket, prefix, &taken);
        taken.insert(name.clone());
        id.name = name;
    }
}

fn next_name(bucket: &mut Bucket, prefix: &str, taken: &HashSet<String>) -> String {
    if bucket.anonymous == 1 && bucket.next == 0 && !taken.contains(prefix) {
        bucket.next = 1;
        return prefix.to_string();
    }
    loop {
        bucket.next += 1;
        let candidate = format!("{prefix}{}", bucket.next);
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}
