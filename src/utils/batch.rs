//! URL length budgeting for multi-market requests
//!
//! Endpoints that take several market ids in one path segment are capped by the
//! maximum URL length the exchange accepts. These helpers either fit a list of
//! ids into one request or split it greedily into as few requests as possible.

use crate::core::errors::ExchangeError;
use std::collections::HashMap;
use std::hash::Hash;

pub const DEFAULT_MAX_URL_LENGTH: usize = 2048;
/// Allowance for the base URL and path prefix in front of the joined ids
pub const DEFAULT_RESERVED_URL_LENGTH: usize = 40;
pub const ID_DELIMITER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlBudget {
    pub max_length: usize,
    pub reserved: usize,
}

impl UrlBudget {
    pub fn new(max_length: usize, reserved: usize) -> Self {
        Self {
            max_length,
            reserved,
        }
    }

    /// Characters left for the joined ids
    pub fn available(&self) -> usize {
        self.max_length.saturating_sub(self.reserved)
    }

    /// Whether a joined id string of `joined_len` characters fits
    pub fn fits(&self, joined_len: usize) -> bool {
        joined_len + self.reserved <= self.max_length
    }
}

impl Default for UrlBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_URL_LENGTH, DEFAULT_RESERVED_URL_LENGTH)
    }
}

/// Split `ids` into consecutive groups whose joined length fits `budget`
///
/// Order is preserved within and across groups and every id lands in exactly
/// one group. A single id longer than the budget still gets a group of its own.
pub fn partition_ids<'a, S: AsRef<str>>(
    ids: &'a [S],
    delimiter: &str,
    budget: UrlBudget,
) -> Vec<Vec<&'a str>> {
    let available = budget.available();
    let mut partitions = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for id in ids {
        let id = id.as_ref();
        if current.is_empty() {
            current.push(id);
            current_len = id.len();
            continue;
        }

        let next_len = current_len + delimiter.len() + id.len();
        if next_len > available {
            partitions.push(std::mem::take(&mut current));
            current.push(id);
            current_len = id.len();
        } else {
            current.push(id);
            current_len = next_len;
        }
    }

    if !current.is_empty() {
        partitions.push(current);
    }
    partitions
}

/// Join `ids` for a single request, rejecting lists that exceed `budget`
///
/// `operation` names the caller in the error message.
pub fn join_within_budget<S: AsRef<str>>(
    ids: &[S],
    delimiter: &str,
    budget: UrlBudget,
    operation: &str,
) -> Result<String, ExchangeError> {
    let joined = join(ids, delimiter);
    if budget.fits(joined.len()) {
        return Ok(joined);
    }
    Err(ExchangeError::ArgumentsRequired(format!(
        "yobit {}() is being requested for {} markets (which has an URL length of {} characters), \
         but it exceeds max URL length ({}), please pass a limited symbols array to fit in one request",
        operation,
        ids.len(),
        joined.len() + budget.reserved,
        budget.max_length
    )))
}

/// Join every market id for one implicit all-markets request
///
/// Only the joined ids are measured against `budget.max_length`. An overflow is
/// a generic exchange error.
pub fn join_all_markets<S: AsRef<str>>(
    ids: &[S],
    delimiter: &str,
    budget: UrlBudget,
    operation: &str,
) -> Result<String, ExchangeError> {
    let joined = join(ids, delimiter);
    if joined.len() > budget.max_length {
        return Err(ExchangeError::Exchange(format!(
            "yobit {}() has {} symbols exceeding max URL length, you are required to specify a list of symbols",
            operation,
            ids.len()
        )));
    }
    Ok(joined)
}

/// Joined id strings, one per HTTP request
///
/// With `split` the ids are partitioned to fit `budget`; otherwise they must fit
/// in one request.
pub fn plan_requests<S: AsRef<str>>(
    ids: &[S],
    delimiter: &str,
    budget: UrlBudget,
    split: bool,
    operation: &str,
) -> Result<Vec<String>, ExchangeError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    if split {
        Ok(partition_ids(ids, delimiter, budget)
            .into_iter()
            .map(|group| group.join(delimiter))
            .collect())
    } else {
        join_within_budget(ids, delimiter, budget, operation).map(|joined| vec![joined])
    }
}

/// Union of per-request results; later partitions win on duplicate keys
pub fn merge_partitions<K: Eq + Hash, V>(parts: Vec<HashMap<K, V>>) -> HashMap<K, V> {
    let capacity = parts.iter().map(HashMap::len).sum();
    parts
        .into_iter()
        .fold(HashMap::with_capacity(capacity), |mut merged, part| {
            merged.extend(part);
            merged
        })
}

fn join<S: AsRef<str>>(ids: &[S], delimiter: &str) -> String {
    ids.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("coin{:04}_btc", i)).collect()
    }

    #[test]
    fn test_short_list_is_one_partition() {
        let ids = vec!["ltc_btc", "eth_btc"];
        let parts = partition_ids(&ids, ID_DELIMITER, UrlBudget::default());
        assert_eq!(parts, vec![vec!["ltc_btc", "eth_btc"]]);
    }

    #[test]
    fn test_empty_input_has_no_partitions() {
        let ids: Vec<String> = Vec::new();
        assert!(partition_ids(&ids, ID_DELIMITER, UrlBudget::default()).is_empty());
        assert!(plan_requests(&ids, ID_DELIMITER, UrlBudget::default(), false, "fetchTickers")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_partitions_respect_budget_and_cover_input() {
        let ids = ids(500);
        let budget = UrlBudget::default();
        let parts = partition_ids(&ids, ID_DELIMITER, budget);

        assert!(parts.len() > 1);
        for part in &parts {
            assert!(!part.is_empty());
            assert!(budget.fits(part.join(ID_DELIMITER).len()));
        }

        let flattened: Vec<&str> = parts.into_iter().flatten().collect();
        let expected: Vec<&str> = ids.iter().map(String::as_str).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_greedy_packing_is_minimal() {
        // each id is 12 chars, so 13 per id after the first
        let ids = ids(10);
        let budget = UrlBudget::new(12 + 13 * 2 + 10, 10);
        let parts = partition_ids(&ids, ID_DELIMITER, budget);
        assert_eq!(parts.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_exact_fit_stays_in_one_partition() {
        let ids = vec!["aaaa_bbb", "cccc_ddd"];
        let joined_len = "aaaa_bbb-cccc_ddd".len();
        let budget = UrlBudget::new(joined_len + 40, 40);
        assert_eq!(partition_ids(&ids, ID_DELIMITER, budget).len(), 1);
        assert!(join_within_budget(&ids, ID_DELIMITER, budget, "fetchTickers").is_ok());

        let tight = UrlBudget::new(joined_len + 39, 40);
        assert_eq!(partition_ids(&ids, ID_DELIMITER, tight).len(), 2);
    }

    #[test]
    fn test_oversized_single_id_gets_own_partition() {
        let ids = vec!["ab", "a_very_long_market_identifier", "cd"];
        let budget = UrlBudget::new(15, 5);
        let parts = partition_ids(&ids, ID_DELIMITER, budget);
        assert_eq!(
            parts,
            vec![vec!["ab"], vec!["a_very_long_market_identifier"], vec!["cd"]]
        );
    }

    #[test]
    fn test_explicit_list_over_budget_is_rejected() {
        let ids = ids(500);
        let err = join_within_budget(&ids, ID_DELIMITER, UrlBudget::default(), "fetchTickers")
            .unwrap_err();
        match err {
            ExchangeError::ArgumentsRequired(message) => {
                assert!(message.contains("fetchTickers"));
                assert!(message.contains("500 markets"));
                assert!(message.contains("2048"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_all_markets_in_one_request() {
        let few = vec!["ltc_btc", "eth_btc"];
        assert_eq!(
            join_all_markets(&few, ID_DELIMITER, UrlBudget::default(), "fetchOrderBooks").unwrap(),
            "ltc_btc-eth_btc"
        );

        // 12 chars each, 13 with the delimiter: 157 ids join to 2040, 158 to 2053
        let fits = ids(157);
        assert!(join_all_markets(&fits, ID_DELIMITER, UrlBudget::default(), "fetchOrderBooks").is_ok());

        let too_many = ids(158);
        match join_all_markets(&too_many, ID_DELIMITER, UrlBudget::default(), "fetchOrderBooks") {
            Err(ExchangeError::Exchange(message)) => {
                assert!(message.contains("fetchOrderBooks"));
                assert!(message.contains("158 symbols"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_plan_requests_split_and_single() {
        let ids = ids(500);
        let split = plan_requests(&ids, ID_DELIMITER, UrlBudget::default(), true, "fetchTickers")
            .unwrap();
        assert!(split.len() > 1);
        assert!(split.iter().all(|joined| joined.len() + 40 <= 2048));

        let few = vec!["ltc_btc", "eth_btc"];
        let single =
            plan_requests(&few, ID_DELIMITER, UrlBudget::default(), false, "fetchTickers").unwrap();
        assert_eq!(single, vec!["ltc_btc-eth_btc".to_string()]);
    }

    #[test]
    fn test_merge_partitions_is_union() {
        let first: HashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let second: HashMap<&str, i32> = [("c", 3)].into_iter().collect();
        let merged = merge_partitions(vec![first, second]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged["c"], 3);
    }
}
