use time::OffsetDateTime;

pub trait Expiring {
    fn expires_at(&self) -> OffsetDateTime;

    fn expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at() <= now
    }

    fn expired(&self) -> bool {
        self.expired_at(OffsetDateTime::now_utc())
    }
}

/// Returns the session when it exists and has not expired yet.
pub fn validate_session<T: Expiring>(session: Option<T>) -> Result<T, &'static str> {
    let session = session.ok_or("Session not found")?;

    if session.expired() {
        return Err("Session expired");
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    struct Stub(OffsetDateTime);

    impl Expiring for Stub {
        fn expires_at(&self) -> OffsetDateTime {
            self.0
        }
    }

    #[test]
    fn live_session_passes() {
        let session = Stub(OffsetDateTime::now_utc() + Duration::hours(1));
        assert!(validate_session(Some(session)).is_ok());
    }

    #[test]
    fn expired_and_missing_sessions_fail() {
        let session = Stub(OffsetDateTime::now_utc() - Duration::seconds(1));
        assert_eq!(validate_session(Some(session)).err(), Some("Session expired"));
        assert_eq!(validate_session::<Stub>(None).err(), Some("Session not found"));
    }
}
