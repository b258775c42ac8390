//! Access resolution for one course card
//!
//! Combines ownership, enrollment and active-flag facts into one
//! affordance state. The precedence is total: owner beats already-enrolled
//! beats active, so edge cases like an owner who is nominally enrolled or
//! an inactive course the user already paid for are never ambiguous.

use crate::types::AccessState;

/// Resolves the affordance state for one course
///
/// Returns [`AccessState::Pending`] while either address is unresolved, so
/// the UI never flashes a false negative before identity data loads.
/// Address comparison ignores hex checksum casing.
pub fn resolve(
    connected: Option<&str>,
    owner: Option<&str>,
    already_enrolled: bool,
    is_active: bool,
) -> AccessState {
    let (connected, owner) = match (connected, owner) {
        (Some(c), Some(o)) => (c, o),
        _ => return AccessState::Pending,
    };

    if connected.eq_ignore_ascii_case(owner) {
        AccessState::Owner
    } else if already_enrolled {
        AccessState::AlreadyEnrolled
    } else if is_active {
        AccessState::Available
    } else {
        AccessState::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "0xAbC0000000000000000000000000000000000001";
    const USER: &str = "0xDef0000000000000000000000000000000000002";

    #[test]
    fn owner_beats_already_enrolled() {
        assert_eq!(
            resolve(Some(OWNER), Some(OWNER), true, true),
            AccessState::Owner
        );
    }

    #[test]
    fn already_enrolled_beats_inactive() {
        assert_eq!(
            resolve(Some(USER), Some(OWNER), true, false),
            AccessState::AlreadyEnrolled
        );
    }

    #[test]
    fn active_course_is_available() {
        assert_eq!(
            resolve(Some(USER), Some(OWNER), false, true),
            AccessState::Available
        );
    }

    #[test]
    fn inactive_course_is_unavailable() {
        assert_eq!(
            resolve(Some(USER), Some(OWNER), false, false),
            AccessState::Unavailable
        );
    }

    #[test]
    fn unresolved_identity_is_pending_not_unavailable() {
        assert_eq!(resolve(None, Some(OWNER), false, false), AccessState::Pending);
        assert_eq!(resolve(Some(USER), None, true, true), AccessState::Pending);
        assert_eq!(resolve(None, None, false, true), AccessState::Pending);
    }

    #[test]
    fn checksum_casing_does_not_change_identity() {
        assert_eq!(
            resolve(Some(&OWNER.to_lowercase()), Some(OWNER), false, true),
            AccessState::Owner
        );
    }
}
