//! Consent state machine
//!
//! Analysis is gated per userId on the latest consent record projected onto
//! the profile. Only `Active` permits analysis; a revocation opens a 7-day
//! data-retention hold, and once that hold lapses the user is back to
//! needing fresh consent (the lapse alone never re-enables analysis).

use chrono::{DateTime, Duration, Utc};

use rstw_common::models::Profile;

/// Days a revoked user's data is retained before deletion may proceed
pub const RETENTION_DAYS: i64 = 7;

/// Consent gate for the analyze operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentGate {
    /// No profile or no consent record on file
    NoProfile,
    /// Consent granted; analysis permitted
    Active,
    /// Consent revoked, retention window still in force
    RevokedHold,
    /// Consent revoked and the retention window has lapsed; treated like
    /// `NoProfile` — fresh consent is required
    HoldExpired,
}

impl ConsentGate {
    /// Whether the analyze operation may proceed
    pub fn permits_analysis(self) -> bool {
        self == ConsentGate::Active
    }
}

/// Evaluate the consent gate for a profile at the given instant
pub fn evaluate(profile: Option<&Profile>, now: DateTime<Utc>) -> ConsentGate {
    let Some(profile) = profile else {
        return ConsentGate::NoProfile;
    };
    let Some(consent) = &profile.consent else {
        return ConsentGate::NoProfile;
    };

    if consent.consent_given {
        return ConsentGate::Active;
    }

    match profile.retention_until {
        Some(until) if until > now => ConsentGate::RevokedHold,
        _ => ConsentGate::HoldExpired,
    }
}

/// Retention horizon opened by a consent revocation
pub fn retention_until(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(RETENTION_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstw_common::models::ConsentStatus;
    use rstw_common::time;

    fn profile_with_consent(consent_given: bool, retention: Option<DateTime<Utc>>) -> Profile {
        let mut profile = Profile::placeholder("user-1");
        profile.consent = Some(ConsentStatus {
            consent_given,
            timestamp: time::now(),
        });
        profile.retention_until = retention;
        profile
    }

    #[test]
    fn test_missing_profile_blocks() {
        assert_eq!(evaluate(None, time::now()), ConsentGate::NoProfile);
    }

    #[test]
    fn test_profile_without_consent_blocks() {
        let profile = Profile::placeholder("user-1");
        assert_eq!(evaluate(Some(&profile), time::now()), ConsentGate::NoProfile);
    }

    #[test]
    fn test_granted_consent_is_active() {
        let profile = profile_with_consent(true, None);
        let gate = evaluate(Some(&profile), time::now());
        assert_eq!(gate, ConsentGate::Active);
        assert!(gate.permits_analysis());
    }

    #[test]
    fn test_revocation_holds_within_retention_window() {
        let now = time::now();
        let profile = profile_with_consent(false, Some(retention_until(now)));
        let gate = evaluate(Some(&profile), now);
        assert_eq!(gate, ConsentGate::RevokedHold);
        assert!(!gate.permits_analysis());
    }

    #[test]
    fn test_lapsed_hold_still_requires_fresh_consent() {
        let now = time::now();
        let expired = now - Duration::days(1);
        let profile = profile_with_consent(false, Some(expired));
        assert_eq!(evaluate(Some(&profile), now), ConsentGate::HoldExpired);

        // A revocation that never recorded a horizon behaves the same way
        let profile = profile_with_consent(false, None);
        assert_eq!(evaluate(Some(&profile), now), ConsentGate::HoldExpired);
    }

    #[test]
    fn test_retention_horizon_is_seven_days_out() {
        let now = time::now();
        assert_eq!(retention_until(now) - now, Duration::days(7));
    }
}
