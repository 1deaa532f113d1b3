use chrono::{DateTime, NaiveDate, Utc};

pub(crate) fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

pub(crate) fn date(ymd: &str) -> NaiveDate {
    NaiveDate::parse_from_str(ymd, "%Y-%m-%d").unwrap()
}

pub(crate) trait TestHelper {
    fn assert_approx_eq(&self, expected: Self);
}

impl TestHelper for f64 {
    fn assert_approx_eq(&self, expected: Self) {
        assert!(
            (self - expected).abs() < 1e-6,
            "expected {expected}, got {self}"
        );
    }
}

impl<const N: usize> TestHelper for [f64; N] {
    fn assert_approx_eq(&self, expected: Self) {
        for (actual, expected) in self.iter().zip(expected) {
            actual.assert_approx_eq(expected);
        }
    }
}
