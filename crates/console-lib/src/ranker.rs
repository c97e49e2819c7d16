//! Placement ranking
//!
//! Pure, synchronous annotation of a pricing snapshot. The backend returns
//! pools pre-ranked price-ascending; the ranker validates that ordering and
//! surfaces a violation as a data-quality fault instead of re-sorting.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Pool, PricingSnapshot};

/// Data-quality fault in a pricing snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    /// The backend-provided pool order and prices disagree.
    #[error("pool sequence is not price-ascending at index {index} ({prev} followed by {next})")]
    UnsortedPools { index: usize, prev: f64, next: f64 },
}

/// A pool annotated for rendering: best-price flag and absolute savings
/// against the on-demand fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPool {
    pub pool: Pool,
    pub best_price: bool,
    /// Absolute savings in $/hr: on-demand price minus pool price.
    pub savings_delta: f64,
    /// Savings percent as reported by the backend.
    pub savings_percent: f64,
}

/// Annotate a pricing snapshot's pools for rendering.
///
/// Output order follows the validated backend order, except that runs of
/// equal-priced pools are normalized to pool-id ascending. The tie-break is
/// deterministic and never moves a pool across a price boundary.
pub fn rank(pricing: &PricingSnapshot) -> Result<Vec<RankedPool>, RankError> {
    for (index, window) in pricing.pools.windows(2).enumerate() {
        if window[1].price < window[0].price {
            return Err(RankError::UnsortedPools {
                index: index + 1,
                prev: window[0].price,
                next: window[1].price,
            });
        }
    }

    let mut pools = pricing.pools.clone();
    // Prices are validated non-decreasing above, so this only reorders ties.
    pools.sort_by(|a, b| a.price.total_cmp(&b.price).then_with(|| a.id.cmp(&b.id)));

    let on_demand = pricing.on_demand.price;
    Ok(pools
        .into_iter()
        .enumerate()
        .map(|(index, pool)| RankedPool {
            best_price: index == 0,
            savings_delta: on_demand - pool.price,
            savings_percent: pool.savings,
            pool,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OnDemandPricing;

    fn snapshot(on_demand: f64, pools: &[(&str, f64, f64)]) -> PricingSnapshot {
        PricingSnapshot {
            on_demand: OnDemandPricing { price: on_demand },
            pools: pools
                .iter()
                .map(|(id, price, savings)| Pool {
                    id: id.to_string(),
                    price: *price,
                    savings: *savings,
                })
                .collect(),
        }
    }

    #[test]
    fn test_best_price_flag_and_deltas() {
        let pricing = snapshot(1.00, &[("p1", 0.30, 70.0), ("p2", 0.45, 55.0)]);
        let ranked = rank(&pricing).unwrap();

        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].best_price);
        assert_eq!(ranked[0].pool.id, "p1");
        assert!((ranked[0].savings_delta - 0.70).abs() < 1e-9);
        assert!((ranked[0].savings_percent - 70.0).abs() < 1e-9);
        assert!(!ranked[1].best_price);
        assert!((ranked[1].savings_delta - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_output_preserves_length_and_order() {
        let pricing = snapshot(
            2.00,
            &[("a", 0.50, 75.0), ("b", 0.80, 60.0), ("c", 1.10, 45.0)],
        );
        let ranked = rank(&pricing).unwrap();

        assert_eq!(ranked.len(), pricing.pools.len());
        for entry in &ranked[1..] {
            assert!(ranked[0].pool.price <= entry.pool.price);
        }
        let ids: Vec<&str> = ranked.iter().map(|r| r.pool.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_unsorted_pools_are_a_surfaced_fault() {
        let pricing = snapshot(1.00, &[("p1", 0.45, 55.0), ("p2", 0.30, 70.0)]);
        let err = rank(&pricing).unwrap_err();
        assert_eq!(
            err,
            RankError::UnsortedPools {
                index: 1,
                prev: 0.45,
                next: 0.30,
            }
        );
    }

    #[test]
    fn test_equal_prices_normalize_to_id_ascending() {
        let pricing = snapshot(1.00, &[("zeta", 0.30, 70.0), ("alpha", 0.30, 70.0)]);
        let ranked = rank(&pricing).unwrap();

        let ids: Vec<&str> = ranked.iter().map(|r| r.pool.id.as_str()).collect();
        assert_eq!(ids, ["alpha", "zeta"]);
        assert!(ranked[0].best_price);
        assert!(!ranked[1].best_price);
    }

    #[test]
    fn test_empty_pool_sequence() {
        let pricing = snapshot(1.00, &[]);
        let ranked = rank(&pricing).unwrap();
        assert!(ranked.is_empty());
    }
}
