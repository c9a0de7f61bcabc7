// wayfare_core/src/pricing.rs

//! Pure fee computation for order submission.
//!
//! Fees are fixed percentages of the item price, expressed in basis points so
//! all arithmetic stays in integer cents. The same function backs the
//! submission path and any later recomputation, keeping the two consistent.

use serde::{Deserialize, Serialize};

/// Platform commission: 5%.
pub const PLATFORM_FEE_BPS: i64 = 500;
/// Payment processing surcharge: 2.9%.
pub const PROCESSING_FEE_BPS: i64 = 290;
/// VAT estimate applied to the item price: 15%.
pub const VAT_BPS: i64 = 1500;

const BPS_DENOMINATOR: i64 = 10_000;

/// Client-side fee estimate for one order, all in integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
  pub platform_fee_cents: i64,
  pub processing_fee_cents: i64,
  pub vat_estimate_cents: i64,
}

fn bps_of(price_cents: i64, bps: i64) -> i64 {
  price_cents * bps / BPS_DENOMINATOR
}

/// Computes the fee breakdown for an item price. Fractions of a cent are
/// truncated toward zero.
pub fn quote_fees(price_cents: i64) -> FeeBreakdown {
  FeeBreakdown {
    platform_fee_cents: bps_of(price_cents, PLATFORM_FEE_BPS),
    processing_fee_cents: bps_of(price_cents, PROCESSING_FEE_BPS),
    vat_estimate_cents: bps_of(price_cents, VAT_BPS),
  }
}

/// Total the shopper is expected to pay: price, tax, both fees, and the
/// traveler's negotiated reward.
pub fn estimated_total(
  price_cents: i64,
  tax_estimate_cents: i64,
  fees: &FeeBreakdown,
  traveler_reward_cents: i64,
) -> i64 {
  price_cents
    + tax_estimate_cents
    + fees.platform_fee_cents
    + fees.processing_fee_cents
    + traveler_reward_cents
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quote_is_fixed_percentages_of_price() {
    let fees = quote_fees(10_000); // $100.00
    assert_eq!(fees.platform_fee_cents, 500);
    assert_eq!(fees.processing_fee_cents, 290);
    assert_eq!(fees.vat_estimate_cents, 1_500);
  }

  #[test]
  fn quote_truncates_sub_cent_fractions() {
    let fees = quote_fees(99);
    assert_eq!(fees.platform_fee_cents, 4); // 4.95 -> 4
    assert_eq!(fees.processing_fee_cents, 2); // 2.871 -> 2
    assert_eq!(fees.vat_estimate_cents, 14); // 14.85 -> 14
  }

  #[test]
  fn quote_of_zero_price_is_zero() {
    let fees = quote_fees(0);
    assert_eq!(fees.platform_fee_cents, 0);
    assert_eq!(fees.processing_fee_cents, 0);
    assert_eq!(fees.vat_estimate_cents, 0);
  }

  #[test]
  fn estimated_total_sums_all_parts() {
    let fees = quote_fees(10_000);
    let total = estimated_total(10_000, 1_500, &fees, 2_000);
    assert_eq!(total, 10_000 + 1_500 + 500 + 290 + 2_000);
  }
}
