//! Routes and queries for the cash package.

use std::sync::Arc;

use cc_01_kv_store::KvStore;
use cc_02_orm::{MigrationRegistry, QueryRouter};
use cc_03_pipeline::{
    load_msg, Authenticator, CheckResult, Context, DeliverResult, Handler, Router, Tx,
};
use shared_types::{ChainError, ChainResult};

use crate::controller::Controller;
use crate::domain::{SendMsg, PACKAGE, SEND_PATH};

const SEND_COST: u64 = 100;

pub struct SendHandler {
    auth: Arc<dyn Authenticator>,
    controller: Controller,
    migrations: Arc<MigrationRegistry>,
}

impl SendHandler {
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

    fn validate(&self, ctx: &Context, store: &dyn KvStore, tx: &dyn Tx) -> ChainResult<SendMsg> {
        let msg = self.migrations.prepare(PACKAGE, load_msg::<SendMsg>(tx)?)?;
        if !self.auth.has_address(ctx, store, &msg.source) {
            return Err(ChainError::unauthorized(format!(
                "source {} did not authorize the transfer",
                msg.source
            )));
        }
        Ok(msg)
    }
}

impl Handler for SendHandler {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<CheckResult> {
        self.validate(ctx, store, tx)?;
        Ok(CheckResult::with_gas(SEND_COST))
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<DeliverResult> {
        let msg = self.validate(ctx, store, tx)?;
        self.controller
            .move_coins(store, &msg.source, &msg.destination, &msg.amount)?;
        Ok(DeliverResult::default())
    }
}

pub fn register_routes(
    router: &mut Router,
    auth: Arc<dyn Authenticator>,
    controller: Controller,
    migrations: Arc<MigrationRegistry>,
) -> ChainResult<()> {
    router.handle(
        SEND_PATH,
        Arc::new(SendHandler::new(auth, controller, migrations)),
    )
}

pub fn register_query(queries: &mut QueryRouter, controller: &Controller) -> ChainResult<()> {
    queries.register("/wallets", Arc::new(controller.wallets().clone()))
}
