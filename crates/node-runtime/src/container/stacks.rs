//! # Handler Stacks
//!
//! Builds the two pipelines the application runs:
//!
//! ```text
//!   user tx ─→ Logging → Recovery → KeyTagger → Savepoint(check) → SigCheck
//!              → Fee → Savepoint(deliver) → Batch → user router
//!
//!   cron task ─→ Logging → Recovery → KeyTagger → ActionTagger → cron router
//! ```
//!
//! Fees are charged outside the deliver savepoint, so a message that fails
//! in deliver still pays. The cron router is the only place
//! `custom/delete_timed_state` is reachable.

use std::sync::Arc;

use cc_02_orm::{MigrationRegistry, ModelBucket, QueryRouter};
use cc_03_pipeline::{
    ActionTagger, Chain, ChainedHandler, Handler, KeyTagger, Logging, Recovery, Router, Savepoint,
};
use cc_04_sigs::{user_bucket, SigCheckDecorator, UserData};
use cc_05_cash::{Controller, FeeDecorator};
use cc_06_batch::BatchDecorator;
use cc_07_cron::{results_bucket, TaskScheduler, Ticker, TickerConfig};
use shared_types::ChainResult;
use tracing::info;

use crate::tx::{CronTaskMarshaler, ExecuteBatchMsg};

/// Every migration the application knows, verified.
pub fn build_registry() -> ChainResult<Arc<MigrationRegistry>> {
    let mut registry = MigrationRegistry::new();
    cc_04_sigs::register_migrations(&mut registry)?;
    cc_05_cash::register_migrations(&mut registry)?;
    cc_07_cron::register_migrations(&mut registry)?;
    cc_08_custom::register_migrations(&mut registry)?;
    registry.verify()?;
    Ok(Arc::new(registry))
}

/// Wired pipelines, scheduler and read paths.
pub struct Stacks {
    pub migrations: Arc<MigrationRegistry>,
    pub user: ChainedHandler,
    pub ticker: Ticker,
    pub scheduler: Arc<TaskScheduler>,
    pub queries: QueryRouter,
    pub cash: Controller,
    pub users: ModelBucket<UserData>,
}

impl Stacks {
    pub fn build(ticker_config: TickerConfig) -> ChainResult<Self> {
        let migrations = build_registry()?;
        let sigs = Arc::new(cc_04_sigs::authenticator());
        let cash = Controller::new(Arc::clone(&migrations))?;
        let users = user_bucket(Arc::clone(&migrations))?;
        let scheduler = Arc::new(TaskScheduler::new(Arc::new(CronTaskMarshaler)));

        let mut user_router = Router::new();
        cc_05_cash::register_routes(
            &mut user_router,
            sigs.clone(),
            cash.clone(),
            Arc::clone(&migrations),
        )?;
        cc_08_custom::register_routes(
            &mut user_router,
            Arc::clone(&migrations),
            scheduler.clone(),
        )?;

        let mut cron_router = Router::new();
        cc_08_custom::register_cron_routes(
            &mut cron_router,
            Arc::new(cc_07_cron::authenticator()),
            Arc::clone(&migrations),
        )?;

        let user = Chain::new()
            .with(Logging)
            .with(Recovery)
            .with(KeyTagger)
            .with(Savepoint::new().on_check())
            .with(SigCheckDecorator::new(users.clone()))
            .with(FeeDecorator::new(sigs, cash.clone(), Arc::clone(&migrations)))
            .with(Savepoint::new().on_deliver())
            .with(BatchDecorator::<ExecuteBatchMsg>::new())
            .wrap(Arc::new(user_router));

        let cron: Arc<dyn Handler> = Arc::new(
            Chain::new()
                .with(Logging)
                .with(Recovery)
                .with(KeyTagger)
                .with(ActionTagger)
                .wrap(Arc::new(cron_router)),
        );

        let results = results_bucket(Arc::clone(&migrations))?;
        let mut queries = QueryRouter::new();
        cc_05_cash::register_query(&mut queries, &cash)?;
        queries.register("/auth", Arc::new(users.clone()))?;
        cc_07_cron::register_query(&mut queries, &results)?;
        cc_08_custom::register_query(&mut queries, Arc::clone(&migrations))?;

        let ticker = Ticker::new(Arc::clone(&scheduler), cron, results, ticker_config);
        info!(
            query_paths = ?queries.paths().collect::<Vec<_>>(),
            max_tasks_per_tick = ticker_config.max_tasks_per_tick,
            "handler stacks built"
        );

        Ok(Self {
            migrations,
            user,
            ticker,
            scheduler,
            queries,
            cash,
            users,
        })
    }
}
