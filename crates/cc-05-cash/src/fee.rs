use std::sync::Arc;

use cc_01_kv_store::KvStore;
use cc_02_orm::MigrationRegistry;
use cc_03_pipeline::{Authenticator, CheckResult, Context, Decorator, DeliverResult, Handler, Tx};
use shared_types::{Address, ChainError, ChainResult, Validate};
use tracing::debug;

use crate::controller::Controller;
use crate::domain::CashConfig;

/// Collects the transaction fee before the rest of the chain runs.
///
/// The payer is the fee info's explicit payer or else the first
/// authenticated signer, and must itself be authenticated.
pub struct FeeDecorator {
    auth: Arc<dyn Authenticator>,
    controller: Controller,
    migrations: Arc<MigrationRegistry>,
}

impl FeeDecorator {
    pub fn new(
        auth: Arc<dyn Authenticator>,
        controller: Controller,
        migrations: Arc<MigrationRegistry>,
    ) -> Self {
        Self {
            auth,
            controller,
            migrations,
        }
    }

    /// Charge the fee and return the amount taken (zero if none was due).
    fn collect(&self, ctx: &Context, store: &mut dyn KvStore, tx: &dyn Tx) -> ChainResult<u64> {
        let config = CashConfig::load(store, &self.migrations)?;
        let info = tx.fees().cloned().unwrap_or_default();
        info.validate()?;

        let fee = info.fees.clone().unwrap_or_default();
        if !config.minimal_fee.is_zero()
            && !(fee.same_currency(&config.minimal_fee) && fee.is_gte(&config.minimal_fee))
        {
            return Err(ChainError::insufficient_amount(format!(
                "fee {} below minimum {}",
                fee, config.minimal_fee
            )));
        }
        if fee.is_zero() {
            return Ok(0);
        }

        let payer = self.payer(ctx, &*store, info.payer)?;
        self.controller
            .move_coins(store, &payer, &config.collector, &fee)?;
        debug!(%payer, fee = %fee, "fee collected");
        Ok(fee.amount)
    }

    fn payer(
        &self,
        ctx: &Context,
        store: &dyn KvStore,
        explicit: Option<Address>,
    ) -> ChainResult<Address> {
        let payer = match explicit {
            Some(payer) => payer,
            None => self
                .auth
                .conditions(ctx, store)
                .first()
                .map(|c| c.address())
                .ok_or_else(|| ChainError::unauthorized("fee requires a signer"))?,
        };
        if !self.auth.has_address(ctx, store, &payer) {
            return Err(ChainError::unauthorized(format!("fee payer {payer} did not sign")));
        }
        Ok(payer)
    }
}

impl Decorator for FeeDecorator {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<CheckResult> {
        let paid = self.collect(ctx, store, tx)?;
        let mut res = next.check(ctx, store, tx)?;
        res.gas_payment = res.gas_payment.saturating_add(paid);
        Ok(res)
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<DeliverResult> {
        self.collect(ctx, store, tx)?;
        next.deliver(ctx, store, tx)
    }
}
