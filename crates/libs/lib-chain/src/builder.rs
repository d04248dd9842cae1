//! # Transaction Builder
//!
//! Builds asset-transfer transactions from sale terms and customer intent,
//! pulling base parameters from the chain and grouping the purchase legs so
//! the ledger settles them as one atomic unit.

use std::sync::Arc;

use lib_core::AppError;
use lib_utils::validation::validate_not_empty;
use shared::dto::sale::{ChainId, SaleTerms};
use shared::utils::truncate_address;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::client::{ChainError, ChainQueries};
use crate::transaction::{assign_group_id, GroupId, UnsignedTxn};

/// Flat fee charged to the customer leg of a purchase, micro-units.
pub const CUSTOMER_LEG_FEE: u64 = 2_000;

/// Flat fee on the vendor leg; the vendor subsidizes its own transfer.
pub const VENDOR_LEG_FEE: u64 = 0;

/// Transaction building errors
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid purchase intent: {0}")]
    InvalidIntent(String),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::InvalidIntent(msg) => AppError::InvalidIntent(msg),
            BuildError::Chain(inner) => inner.into(),
        }
    }
}

/// What the customer asked to buy.
///
/// `sale_amount` is always derived from `accept_amount` and the sale's unit
/// ratio and cannot drift independently, so the only constructor computes
/// it and the fields stay private.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PurchaseIntent {
    accept_amount: f64,
    sale_amount: f64,
}

impl PurchaseIntent {
    /// Derive the intent from the accept-token amount the customer entered.
    pub fn from_accept_amount(accept_amount: f64, accept_unit_ratio: f64) -> Self {
        Self {
            accept_amount,
            sale_amount: accept_amount / accept_unit_ratio,
        }
    }

    /// Accept-token units the customer pays.
    pub fn accept_amount(&self) -> f64 {
        self.accept_amount
    }

    /// Sale-token units the customer receives.
    pub fn sale_amount(&self) -> f64 {
        self.sale_amount
    }
}

/// Two transfers bound under one group id: neither leg is valid on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPair {
    /// Customer pays the accept token (customer-paid fee)
    pub customer_to_vendor: UnsignedTxn,
    /// Vendor delivers the sale token (vendor-subsidized, fee 0)
    pub vendor_to_customer: UnsignedTxn,
    pub group_id: GroupId,
}

/// Builds transfers and purchase pairs on top of [`ChainQueries`].
pub struct TransactionBuilder {
    chain: Arc<dyn ChainQueries>,
}

impl TransactionBuilder {
    pub fn new(chain: Arc<dyn ChainQueries>) -> Self {
        Self { chain }
    }

    /// Build a single asset-transfer transaction.
    ///
    /// Base parameters come from the chain's suggested params. When
    /// `fee_override` is supplied the fee is stamped flat instead of using
    /// the network suggestion.
    #[instrument(skip(self), fields(chain = %chain, asset = asset_index))]
    pub async fn transfer_txn(
        &self,
        chain: ChainId,
        from: &str,
        to: &str,
        asset_index: u64,
        amount: u64,
        fee_override: Option<u64>,
    ) -> Result<UnsignedTxn, BuildError> {
        validate_not_empty(from, "sender").map_err(BuildError::InvalidIntent)?;
        validate_not_empty(to, "receiver").map_err(BuildError::InvalidIntent)?;

        let params = self.chain.suggested_params(chain).await?;

        let (fee, flat_fee) = match fee_override {
            Some(fee) => (fee, true),
            None => (params.fee.max(params.min_fee), false),
        };

        Ok(UnsignedTxn {
            sender: from.to_string(),
            receiver: to.to_string(),
            asset_index,
            amount,
            fee,
            flat_fee,
            first_valid: params.first_valid,
            last_valid: params.last_valid,
            genesis_id: params.genesis_id,
            group: None,
        })
    }

    /// Build the zero-amount self-transfer that opts an account into an
    /// asset, a prerequisite before the account can receive it.
    pub async fn opt_in_txn(
        &self,
        chain: ChainId,
        address: &str,
        asset_index: u64,
    ) -> Result<UnsignedTxn, BuildError> {
        self.transfer_txn(chain, address, address, asset_index, 0, None)
            .await
    }

    /// Build the grouped transaction pair for a purchase.
    ///
    /// Leg 0: customer sends the accept token to the vendor, paying a flat
    /// fee. Leg 1: vendor sends the sale token back, fee 0. Both legs are
    /// stamped with one fresh group id so the ledger settles them together.
    #[instrument(skip_all, fields(customer = %truncate_address(customer_address)))]
    pub async fn purchase_pair(
        &self,
        intent: &PurchaseIntent,
        terms: &SaleTerms,
        customer_address: &str,
    ) -> Result<TransactionPair, BuildError> {
        let accept_amount = base_units(intent.accept_amount(), "accept amount")?;
        let sale_amount = base_units(intent.sale_amount(), "sale amount")?;

        let customer_to_vendor = self
            .transfer_txn(
                terms.chain,
                customer_address,
                &terms.vendor_address,
                terms.accept_token.asset_index,
                accept_amount,
                Some(CUSTOMER_LEG_FEE),
            )
            .await?;

        let vendor_to_customer = self
            .transfer_txn(
                terms.chain,
                &terms.vendor_address,
                customer_address,
                terms.sale_token.asset_index,
                sale_amount,
                Some(VENDOR_LEG_FEE),
            )
            .await?;

        let mut legs = [customer_to_vendor, vendor_to_customer];
        let group_id = assign_group_id(&mut legs);
        let [customer_to_vendor, vendor_to_customer] = legs;

        debug!("purchase pair grouped under {}", group_id);

        Ok(TransactionPair {
            customer_to_vendor,
            vendor_to_customer,
            group_id,
        })
    }
}

/// Convert a user-entered amount to whole base units.
///
/// The ledger counts integral base units, so zero, negative, non-finite and
/// fractional values are all rejected before any transaction exists.
fn base_units(value: f64, what: &str) -> Result<u64, BuildError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(BuildError::InvalidIntent(format!(
            "{} must be a positive finite number",
            what
        )));
    }
    if value.fract() != 0.0 {
        return Err(BuildError::InvalidIntent(format!(
            "{} must be a whole number of base units",
            what
        )));
    }
    if value > u64::MAX as f64 {
        return Err(BuildError::InvalidIntent(format!("{} is out of range", what)));
    }
    Ok(value as u64)
}
