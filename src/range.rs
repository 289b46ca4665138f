//! Date range planning: explicit bounds, resume, and redownload.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::archive::LocalInvoiceState;
use crate::error::{Error, Result};
use crate::invoice::DATE_FORMAT;

static DATE_FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Issue date bounds for a catalog query. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Inclusive lower bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// A range with no bounds at all.
    #[must_use]
    pub const fn open() -> Self {
        Self { from: None, to: None }
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns true if both bounds are set and no date satisfies them.
    ///
    /// This only happens after resuming past an explicit `to`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

/// Operator input that shapes the effective range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeRequest {
    /// Explicit `--from`.
    pub from: Option<NaiveDate>,
    /// Explicit `--to`.
    pub to: Option<NaiveDate>,
    /// `--resume`: continue after the newest archived invoice without asking.
    pub resume: bool,
    /// `--redownload`: ignore local history and explicit bounds.
    pub redownload: bool,
}

impl RangeRequest {
    /// Checks the request on its own, before any local state is consulted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConflictingFlags`] if both `resume` and `redownload`
    /// are set, and [`Error::InvalidRange`] if `from` is after `to`.
    pub fn validate(&self) -> Result<()> {
        if self.resume && self.redownload {
            return Err(Error::ConflictingFlags);
        }
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(Error::InvalidRange { from, to });
        }
        Ok(())
    }
}

/// Computes the effective range for this run.
///
/// `confirm` is asked whether to resume after the newest archived date. It is
/// called at most once, and only when `resume` is unset and the archive is
/// not empty.
///
/// # Errors
///
/// Returns the errors of [`RangeRequest::validate`], or whatever `confirm`
/// returns.
pub fn plan<F>(request: RangeRequest, local: &LocalInvoiceState, confirm: F) -> Result<DateRange>
where
    F: FnOnce(NaiveDate) -> Result<bool>,
{
    request.validate()?;

    if request.redownload {
        log::info!("Redownload requested, ignoring local history and date bounds");
        return Ok(DateRange::open());
    }

    let explicit = DateRange {
        from: request.from,
        to: request.to,
    };

    let Some(latest) = local.latest_date else {
        return Ok(explicit);
    };

    let resume = request.resume || confirm(latest)?;
    if !resume {
        log::debug!("Not resuming, keeping explicit range {explicit:?}");
        return Ok(explicit);
    }

    let from = resume_from(latest);
    log::info!("Resuming from {}", from.format(DATE_FORMAT));
    Ok(DateRange {
        from: Some(from),
        to: request.to,
    })
}

/// The day after `latest`, saturating at the maximum representable date.
#[must_use]
pub fn resume_from(latest: NaiveDate) -> NaiveDate {
    latest.checked_add_days(Days::new(1)).unwrap_or(latest)
}

/// Interprets an answer to the resume prompt. Empty, `y`, and `yes` confirm.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.is_empty() || answer == "y" || answer == "yes"
}

/// Parses a `YYYY-MM-DD` flag value. An empty value is an open bound.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the value is not a valid date.
pub fn parse_date_flag(flag: &str, value: &str) -> Result<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }
    let invalid = || Error::InvalidDate {
        flag: flag.to_string(),
        value: value.to_string(),
    };
    // chrono accepts unpadded fields, signs and leading spaces.
    if !DATE_FLAG_RE.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn archived(latest: NaiveDate) -> LocalInvoiceState {
        LocalInvoiceState {
            latest_date: Some(latest),
        }
    }

    fn never_asked(_: NaiveDate) -> Result<bool> {
        panic!("confirm must not be called");
    }

    // ==================== Validation ====================

    #[test]
    fn resume_and_redownload_conflict() {
        let request = RangeRequest {
            resume: true,
            redownload: true,
            ..RangeRequest::default()
        };
        let err = plan(request, &LocalInvoiceState::default(), never_asked).unwrap_err();
        assert!(matches!(err, Error::ConflictingFlags));
    }

    #[test]
    fn from_after_to_is_invalid() {
        let request = RangeRequest {
            from: Some(date(2024, 5, 1)),
            to: Some(date(2024, 4, 30)),
            ..RangeRequest::default()
        };
        let err = plan(request, &LocalInvoiceState::default(), never_asked).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn same_day_range_is_valid() {
        let day = date(2024, 5, 1);
        let request = RangeRequest {
            from: Some(day),
            to: Some(day),
            ..RangeRequest::default()
        };
        let range = plan(request, &LocalInvoiceState::default(), never_asked).unwrap();
        assert_eq!(range.from, Some(day));
        assert_eq!(range.to, Some(day));
        assert!(!range.is_empty());
    }

    // ==================== Redownload ====================

    #[test]
    fn redownload_clears_everything() {
        let request = RangeRequest {
            from: Some(date(2024, 1, 1)),
            to: Some(date(2024, 6, 1)),
            redownload: true,
            ..RangeRequest::default()
        };
        let range = plan(request, &archived(date(2024, 3, 3)), never_asked).unwrap();
        assert!(range.is_open());
    }

    // ==================== Resume ====================

    #[test]
    fn explicit_resume_skips_prompt_and_overrides_from() {
        let request = RangeRequest {
            from: Some(date(2020, 1, 1)),
            to: Some(date(2024, 12, 31)),
            resume: true,
            ..RangeRequest::default()
        };
        let range = plan(request, &archived(date(2024, 2, 10)), never_asked).unwrap();
        assert_eq!(range.from, Some(date(2024, 2, 11)));
        assert_eq!(range.to, Some(date(2024, 12, 31)));
    }

    #[test]
    fn resume_with_empty_archive_keeps_explicit_bounds() {
        let request = RangeRequest {
            from: Some(date(2024, 1, 1)),
            resume: true,
            ..RangeRequest::default()
        };
        let range = plan(request, &LocalInvoiceState::default(), never_asked).unwrap();
        assert_eq!(range.from, Some(date(2024, 1, 1)));
        assert_eq!(range.to, None);
    }

    #[test]
    fn empty_archive_never_prompts() {
        let range = plan(
            RangeRequest::default(),
            &LocalInvoiceState::default(),
            never_asked,
        )
        .unwrap();
        assert!(range.is_open());
    }

    #[test]
    fn confirmed_prompt_resumes() {
        let asked = Cell::new(None);
        let range = plan(RangeRequest::default(), &archived(date(2024, 2, 29)), |d| {
            asked.set(Some(d));
            Ok(true)
        })
        .unwrap();
        assert_eq!(asked.get(), Some(date(2024, 2, 29)));
        assert_eq!(range.from, Some(date(2024, 3, 1)));
        assert_eq!(range.to, None);
    }

    #[test]
    fn declined_prompt_keeps_explicit_from() {
        let request = RangeRequest {
            from: Some(date(2024, 1, 1)),
            ..RangeRequest::default()
        };
        let range = plan(request, &archived(date(2024, 2, 10)), |_| Ok(false)).unwrap();
        assert_eq!(range.from, Some(date(2024, 1, 1)));
        assert_eq!(range.to, None);
    }

    #[test]
    fn prompt_error_propagates() {
        let err = plan(RangeRequest::default(), &archived(date(2024, 2, 10)), |_| {
            Err(Error::Io(std::io::Error::from(
                std::io::ErrorKind::UnexpectedEof,
            )))
        })
        .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn resuming_past_to_yields_empty_range() {
        let request = RangeRequest {
            to: Some(date(2024, 1, 31)),
            resume: true,
            ..RangeRequest::default()
        };
        let range = plan(request, &archived(date(2024, 2, 10)), never_asked).unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn resume_from_crosses_year_boundary() {
        assert_eq!(resume_from(date(2023, 12, 31)), date(2024, 1, 1));
        assert_eq!(resume_from(NaiveDate::MAX), NaiveDate::MAX);
    }

    // ==================== Prompt Answers ====================

    #[test]
    fn affirmative_answers() {
        for answer in ["", "\n", "y", "Y", "yes", "YES", " Yes \r\n"] {
            assert!(is_affirmative(answer), "{answer:?} should confirm");
        }
    }

    #[test]
    fn negative_answers() {
        for answer in ["n", "no", "nope", "yess", "q"] {
            assert!(!is_affirmative(answer), "{answer:?} should decline");
        }
    }

    // ==================== Date Flags ====================

    #[test]
    fn parse_date_flag_values() {
        assert_eq!(parse_date_flag("from", "").unwrap(), None);
        assert_eq!(
            parse_date_flag("from", "2024-03-05").unwrap(),
            Some(date(2024, 3, 5))
        );
        let err = parse_date_flag("to", "2024.03.05").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid --to date \"2024.03.05\", expected YYYY-MM-DD"
        );
        assert!(parse_date_flag("to", "2023-02-29").is_err());
    }

    #[test]
    fn parse_date_flag_requires_exact_shape() {
        for value in ["2024-3-5", "+2024-03-05", " 2024-03-05", "2024-03-05 ", "02024-03-05"] {
            assert!(
                matches!(parse_date_flag("from", value), Err(Error::InvalidDate { .. })),
                "{value:?} should be rejected"
            );
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_date() -> impl Strategy<Value = NaiveDate> {
            (1990i32..2040, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| date(y, m, d))
        }

        proptest! {
            #[test]
            fn reversed_bounds_always_invalid(a in arb_date(), b in arb_date(), resume in any::<bool>()) {
                prop_assume!(a != b);
                let (from, to) = if a > b { (a, b) } else { (b, a) };
                let request = RangeRequest { from: Some(from), to: Some(to), resume, redownload: false };
                let result = plan(request, &archived(from), |_| Ok(true));
                prop_assert!(
                    matches!(result, Err(Error::InvalidRange { .. })),
                    "expected InvalidRange, got {:?}",
                    result
                );
            }

            #[test]
            fn conflicting_flags_regardless_of_bounds(
                from in proptest::option::of(arb_date()),
                to in proptest::option::of(arb_date()),
                latest in proptest::option::of(arb_date()),
            ) {
                let request = RangeRequest { from, to, resume: true, redownload: true };
                let local = LocalInvoiceState { latest_date: latest };
                let result = plan(request, &local, |_| Ok(true));
                prop_assert!(
                    matches!(result, Err(Error::ConflictingFlags)),
                    "expected ConflictingFlags, got {:?}",
                    result
                );
            }

            #[test]
            fn redownload_is_always_open(
                a in arb_date(),
                b in arb_date(),
                latest in proptest::option::of(arb_date()),
            ) {
                let request = RangeRequest {
                    from: Some(a.min(b)),
                    to: Some(a.max(b)),
                    resume: false,
                    redownload: true,
                };
                let local = LocalInvoiceState { latest_date: latest };
                let range = plan(request, &local, |_| Ok(true)).unwrap();
                prop_assert!(range.is_open());
            }
        }
    }
}
