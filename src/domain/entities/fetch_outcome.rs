//! Tagged result of fetching one avatar sub-resource.

use crate::domain::errors::AvatarError;

/// Outcome of a single remote fetch.
///
/// `Absent` is the well-formed "not found" answer and is never an error.
/// Anything else that goes wrong is `Failed`.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// The resource exists.
    Found(T),
    /// The source answered "not found".
    Absent,
    /// The source could not be asked, or answered with something else.
    Failed(AvatarError),
}

impl<T> FetchOutcome<T> {
    /// Returns true for `Found`.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns true for `Absent`.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Maps the found value.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FetchOutcome<U> {
        match self {
            Self::Found(value) => FetchOutcome::Found(f(value)),
            Self::Absent => FetchOutcome::Absent,
            Self::Failed(e) => FetchOutcome::Failed(e),
        }
    }

    /// Converts into `Ok(Some)`, `Ok(None)` or `Err`.
    ///
    /// # Errors
    /// Returns the carried error for `Failed`.
    pub fn into_result(self) -> Result<Option<T>, AvatarError> {
        match self {
            Self::Found(value) => Ok(Some(value)),
            Self::Absent => Ok(None),
            Self::Failed(e) => Err(e),
        }
    }
}

impl<T> From<Result<Option<T>, AvatarError>> for FetchOutcome<T> {
    fn from(result: Result<Option<T>, AvatarError>) -> Self {
        match result {
            Ok(Some(value)) => Self::Found(value),
            Ok(None) => Self::Absent,
            Err(e) => Self::Failed(e),
        }
    }
}

/// Combines the binary and content-type outcomes of one joint fetch.
///
/// A failure on either side wins over absence; the binary failure is
/// reported when both sides failed. Only `Found` on both sides yields a
/// pair.
///
/// # Errors
/// Returns the first `Failed` error, binary side first.
pub fn combine<A, B>(
    binary: FetchOutcome<A>,
    content_type: FetchOutcome<B>,
) -> Result<Option<(A, B)>, AvatarError> {
    match (binary, content_type) {
        (FetchOutcome::Failed(e), _) | (_, FetchOutcome::Failed(e)) => Err(e),
        (FetchOutcome::Found(a), FetchOutcome::Found(b)) => Ok(Some((a, b))),
        (FetchOutcome::Absent, _) | (_, FetchOutcome::Absent) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::AvatarResource;

    fn failed<T>(resource: AvatarResource) -> FetchOutcome<T> {
        FetchOutcome::Failed(AvatarError::transport(resource, "boom"))
    }

    #[test]
    fn test_both_found_yields_pair() {
        let joint = combine(FetchOutcome::Found(vec![1u8]), FetchOutcome::Found("png"));
        assert_eq!(joint.unwrap(), Some((vec![1u8], "png")));
    }

    #[test]
    fn test_any_absent_yields_none() {
        let a = combine::<u8, &str>(FetchOutcome::Absent, FetchOutcome::Found("png"));
        let b = combine::<u8, &str>(FetchOutcome::Found(1), FetchOutcome::Absent);
        let c = combine::<u8, &str>(FetchOutcome::Absent, FetchOutcome::Absent);
        assert!(a.unwrap().is_none());
        assert!(b.unwrap().is_none());
        assert!(c.unwrap().is_none());
    }

    #[test]
    fn test_failure_beats_absence() {
        let joint = combine::<u8, &str>(FetchOutcome::Absent, failed(AvatarResource::ContentType));
        let err = joint.unwrap_err();
        assert_eq!(err.resource(), Some(AvatarResource::ContentType));
    }

    #[test]
    fn test_binary_failure_reported_first() {
        let joint = combine::<u8, &str>(
            failed(AvatarResource::Binary),
            failed(AvatarResource::ContentType),
        );
        assert_eq!(joint.unwrap_err().resource(), Some(AvatarResource::Binary));
    }

    #[test]
    fn test_outcome_result_conversion() {
        let found: FetchOutcome<u8> = Ok(Some(3)).into();
        assert!(found.is_found());
        let absent: FetchOutcome<u8> = Ok(None).into();
        assert!(absent.is_absent());
        assert_eq!(found.map(|v| v * 2).into_result().unwrap(), Some(6));
    }
}
