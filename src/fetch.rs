use crate::errors::Result;

/// What to do when a read fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Show sample data instead, so screens are never empty
    #[default]
    Mock,
    /// Report the failure to the page
    Surface,
}

impl FallbackPolicy {
    pub fn from_config(mock_fallback: bool) -> Self {
        if mock_fallback {
            FallbackPolicy::Mock
        } else {
            FallbackPolicy::Surface
        }
    }
}

/// Where the data a page shows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub source: Source,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Fetched {
            data,
            source: Source::Live,
        }
    }

    pub fn fallback(data: T) -> Self {
        Fetched {
            data,
            source: Source::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }
}

/// Settle the outcome of a read.
///
/// Under `FallbackPolicy::Mock` this never fails: any error is logged and
/// replaced by `fallback()`.
pub fn resolve<T, F>(
    policy: FallbackPolicy,
    label: &str,
    result: Result<T>,
    fallback: F,
) -> Result<Fetched<T>>
where
    F: FnOnce() -> T,
{
    match (result, policy) {
        (Ok(data), _) => Ok(Fetched::live(data)),
        (Err(err), FallbackPolicy::Mock) => {
            tracing::warn!(what = label, error = %err, "request failed, showing sample data");
            Ok(Fetched::fallback(fallback()))
        }
        (Err(err), FallbackPolicy::Surface) => {
            tracing::warn!(what = label, error = %err, "request failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn test_live_data_wins() {
        let fetched = resolve(FallbackPolicy::Mock, "numbers", Ok(vec![1]), || vec![2]).unwrap();
        assert_eq!(fetched, Fetched::live(vec![1]));
    }

    #[test]
    fn test_mock_fallback() {
        let fetched = resolve(FallbackPolicy::Mock, "numbers", Err(Error::NoResponse), || vec![2])
            .unwrap();
        assert!(fetched.is_fallback());
        assert_eq!(fetched.data, vec![2]);
    }

    #[test]
    fn test_surface_policy() {
        let result = resolve::<Vec<u32>, _>(
            FallbackPolicy::Surface,
            "numbers",
            Err(Error::Http {
                status: 500,
                message: None,
            }),
            || panic!("fallback must not be built"),
        );
        assert_eq!(result.unwrap_err().status(), Some(500));
        assert_eq!(FallbackPolicy::from_config(false), FallbackPolicy::Surface);
        assert_eq!(FallbackPolicy::from_config(true), FallbackPolicy::Mock);
    }
}
