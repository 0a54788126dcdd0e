//! Diff declared group membership and names against what the remote service has

use std::{collections::BTreeSet, fmt::Display};

use colored::Colorize;

/// The membership changes needed to move a group from one member set to another
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MembershipChanges {
    /// users in the desired set, but not the previous one
    pub add: BTreeSet<String>,
    /// users in the previous set, but not the desired one
    pub remove: BTreeSet<String>,
}

impl MembershipChanges {
    /// True when there is nothing to send to the remote service
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

impl Display for MembershipChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut text = "".to_owned();
        if !self.is_empty() {
            text += "  users:\n";
        }
        for user in &self.add {
            text += format!("{}", format!("    + {user}\n").green()).as_str();
        }
        for user in &self.remove {
            text += format!("{}", format!("    - {user}\n").red()).as_str();
        }
        write!(f, "{text}")
    }
}

/// Compute which users must be added to and removed from a group.
///
/// This does no I/O. Applying `add` and then `remove` to a group whose members
/// are `previous` leaves it with exactly `desired`.
pub fn reconcile(previous: &BTreeSet<String>, desired: &BTreeSet<String>) -> MembershipChanges {
    match (previous.is_empty(), desired.is_empty()) {
        // nothing before, nothing now: no calls at all
        (true, true) => MembershipChanges::default(),
        (true, false) => MembershipChanges {
            add: desired.to_owned(),
            remove: BTreeSet::new(),
        },
        (false, true) => MembershipChanges {
            add: BTreeSet::new(),
            remove: previous.to_owned(),
        },
        (false, false) => MembershipChanges {
            add: desired.difference(previous).cloned().collect(),
            remove: previous.difference(desired).cloned().collect(),
        },
    }
}

/// The new display name to send, if it changed.
///
/// Callers validate `desired` (non-empty) before getting here.
pub fn reconcile_name<'a>(previous: &str, desired: &'a str) -> Option<&'a str> {
    (previous != desired).then_some(desired)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(vals: &[&str]) -> BTreeSet<String> {
        vals.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn both_empty_is_a_no_op() {
        let changes = reconcile(&set(&[]), &set(&[]));
        assert!(changes.is_empty());
    }

    #[test]
    fn empty_previous_adds_everything() {
        let changes = reconcile(&set(&[]), &set(&["a", "b"]));
        assert_eq!(changes.add, set(&["a", "b"]));
        assert!(changes.remove.is_empty());
    }

    #[test]
    fn empty_desired_removes_everything() {
        let changes = reconcile(&set(&["a", "b"]), &set(&[]));
        assert!(changes.add.is_empty());
        assert_eq!(changes.remove, set(&["a", "b"]));
    }

    #[test]
    fn overlapping_sets_only_touch_the_difference() {
        let changes = reconcile(&set(&["a", "b"]), &set(&["b", "c"]));
        assert_eq!(changes.add, set(&["c"]));
        assert_eq!(changes.remove, set(&["a"]));
    }

    #[test]
    fn add_and_remove_are_disjoint_set_differences() {
        let cases = [
            (set(&["1", "2", "3"]), set(&["3", "4"])),
            (set(&["x"]), set(&["x"])),
            (set(&["p", "q"]), set(&["r", "s", "t"])),
        ];
        for (previous, desired) in cases {
            let changes = reconcile(&previous, &desired);
            assert_eq!(
                changes.add,
                desired.difference(&previous).cloned().collect::<BTreeSet<_>>()
            );
            assert_eq!(
                changes.remove,
                previous.difference(&desired).cloned().collect::<BTreeSet<_>>()
            );
            assert!(changes.add.is_disjoint(&changes.remove));
        }
    }

    #[test]
    fn applying_changes_converges() {
        let previous = set(&["a", "b", "d"]);
        let desired = set(&["b", "c"]);
        let changes = reconcile(&previous, &desired);

        let mut applied = previous.clone();
        applied.extend(changes.add.iter().cloned());
        applied.retain(|u| !changes.remove.contains(u));
        assert_eq!(applied, desired);

        // and a second pass finds nothing left to do
        assert!(reconcile(&applied, &desired).is_empty());
        // same inputs, same answer
        assert_eq!(reconcile(&previous, &desired), changes);
    }

    #[test]
    fn name_changes_detected_by_inequality() {
        assert_eq!(reconcile_name("Ops", "Operations"), Some("Operations"));
        assert_eq!(reconcile_name("Ops", "Ops"), None);
    }
}
