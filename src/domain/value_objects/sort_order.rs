use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Sort direction, encoded as 1 / -1 in query documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_signum(value: i64) -> Result<Self, DomainError> {
        match value {
            1 => Ok(SortOrder::Ascending),
            -1 => Ok(SortOrder::Descending),
            other => Err(DomainError::InvalidSortOrder(format!(
                "Expected 1 or -1, got {}",
                other
            ))),
        }
    }

    pub fn as_signum(&self) -> i64 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Apply the direction to an ascending comparison result.
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "ascending"),
            SortOrder::Descending => write!(f, "descending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_sort_order_from_signum() {
        assert_eq!(SortOrder::from_signum(1).unwrap(), SortOrder::Ascending);
        assert_eq!(SortOrder::from_signum(-1).unwrap(), SortOrder::Descending);
    }

    #[test]
    fn test_sort_order_from_signum_invalid() {
        assert!(SortOrder::from_signum(0).is_err());
        assert!(SortOrder::from_signum(2).is_err());
    }

    #[test]
    fn test_sort_order_round_trip() {
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            assert_eq!(SortOrder::from_signum(order.as_signum()).unwrap(), order);
        }
    }

    #[test]
    fn test_sort_order_apply() {
        assert_eq!(SortOrder::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Descending.apply(Ordering::Equal), Ordering::Equal);
    }
}
