use num_bigint::BigInt;
use num_traits::Signed;
use serde::Serialize;

use crate::model::GasCost;
use crate::utils::{bigint_string, format_amount};

/// Display-only gas figures. Never fed back into balance logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GasSummary {
    pub computation_cost: u64,
    pub storage_cost: u64,
    pub storage_rebate: u64,
    #[serde(with = "bigint_string")]
    pub total: BigInt,
    pub display: String,
    /// The rebate exceeded the charges, so the total is negative.
    pub net_rebate: bool,
}

impl GasSummary {
    pub fn from_cost(gas: &GasCost) -> Self {
        let total = gas.total();
        let net_rebate = total.is_negative();
        if net_rebate {
            tracing::debug!(%total, "gas total is negative, storage rebate exceeds charges");
        }

        let display = if net_rebate {
            format!("-{}", format_amount(&total))
        } else {
            format_amount(&total)
        };

        GasSummary {
            computation_cost: gas.computation_cost,
            storage_cost: gas.storage_cost,
            storage_rebate: gas.storage_rebate,
            total,
            display,
            net_rebate,
        }
    }
}
