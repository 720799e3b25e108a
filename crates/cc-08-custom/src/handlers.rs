//! Check/Deliver handlers for the custom module.
//!
//! Every handler re-runs its full validation in deliver; check never
//! writes.

use std::sync::Arc;

use cc_01_kv_store::KvStore;
use cc_02_orm::{MigrationRegistry, ModelBucket, QueryRouter};
use cc_03_pipeline::{
    load_msg, Authenticator, CheckResult, Context, DeliverResult, Handler, Router, Tx,
};
use cc_07_cron::Scheduler;
use shared_types::{ChainError, ChainResult, Metadata};
use tracing::debug;

use crate::domain::{
    state_bucket, timed_state_bucket, timed_state_condition, CreateStateMsg, CreateTimedStateMsg,
    DeleteTimedStateMsg, State, TimedState, CREATE_STATE_PATH, CREATE_TIMED_STATE_PATH,
    DELETE_TIMED_STATE_PATH, PACKAGE,
};

const HANDLER_COST: u64 = 100;

fn delivered(id: Vec<u8>) -> DeliverResult {
    DeliverResult {
        data: id,
        gas_used: HANDLER_COST,
        ..DeliverResult::default()
    }
}

// =============================================================================
// STATE
// =============================================================================

pub struct CreateStateHandler {
    states: ModelBucket<State>,
    migrations: Arc<MigrationRegistry>,
}

impl CreateStateHandler {
    pub fn new(states: ModelBucket<State>, migrations: Arc<MigrationRegistry>) -> Self {
        Self { states, migrations }
    }

    fn validate(&self, tx: &dyn Tx) -> ChainResult<CreateStateMsg> {
        self.migrations.prepare(PACKAGE, load_msg::<CreateStateMsg>(tx)?)
    }
}

impl Handler for CreateStateHandler {
    fn check(
        &self,
        _ctx: &Context,
        _store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<CheckResult> {
        self.validate(tx)?;
        Ok(CheckResult::with_gas(HANDLER_COST))
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<DeliverResult> {
        let msg = self.validate(tx)?;
        let state = State {
            metadata: Metadata::new(self.states.schema()?),
            inner_state: msg.inner_state,
            address: msg.address,
            created_at: ctx.block_time()?,
        };
        let id = self.states.put(store, &[], &state)?;
        debug!(id = %hex::encode(&id), "state created");
        Ok(delivered(id))
    }
}

// =============================================================================
// TIMED STATE
// =============================================================================

pub struct CreateTimedStateHandler {
    timed_states: ModelBucket<TimedState>,
    scheduler: Arc<dyn Scheduler>,
    migrations: Arc<MigrationRegistry>,
}

impl CreateTimedStateHandler {
    pub fn new(
        timed_states: ModelBucket<TimedState>,
        scheduler: Arc<dyn Scheduler>,
        migrations: Arc<MigrationRegistry>,
    ) -> Self {
        Self {
            timed_states,
            scheduler,
            migrations,
        }
    }

    /// Block-time rules are aggregated with the stateless field checks.
    fn validate(&self, ctx: &Context, tx: &dyn Tx) -> ChainResult<CreateTimedStateMsg> {
        let msg = load_msg::<CreateTimedStateMsg>(tx)?;
        let now = ctx.block_time()?;
        if msg.metadata.schema == 0 {
            msg.validate_at(now)?;
            return Err(ChainError::metadata("schema version missing").field("Metadata"));
        }
        let msg = self.migrations.migrated(PACKAGE, msg)?;
        msg.validate_at(now)?;
        Ok(msg)
    }
}

impl Handler for CreateTimedStateHandler {
    fn check(
        &self,
        ctx: &Context,
        _store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<CheckResult> {
        self.validate(ctx, tx)?;
        Ok(CheckResult::with_gas(HANDLER_COST))
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<DeliverResult> {
        let msg = self.validate(ctx, tx)?;
        let mut record = TimedState {
            metadata: Metadata::new(self.timed_states.schema()?),
            inner_state_enum: msg.inner_state_enum,
            str: msg.str,
            byte: msg.byte,
            delete_at: msg.delete_at,
            delete_task_id: Vec::new(),
        };
        let id = self.timed_states.put(store, &[], &record)?;

        if !record.delete_at.is_zero() {
            let delete = DeleteTimedStateMsg {
                metadata: Metadata::new(
                    self.migrations
                        .latest_version::<DeleteTimedStateMsg>(PACKAGE)?,
                ),
                timed_state_id: id.clone(),
            };
            let auth = [timed_state_condition(&id)];
            record.delete_task_id = self
                .scheduler
                .schedule(store, record.delete_at, &auth, &delete)?;
            self.timed_states.put(store, &id, &record)?;
            debug!(
                id = %hex::encode(&id),
                task_id = %hex::encode(&record.delete_task_id),
                delete_at = %record.delete_at,
                "timed state deletion scheduled"
            );
        }
        Ok(delivered(id))
    }
}

/// Removes a timed record. Routed on the cron router only, and only for
/// the record named by the task's stored condition.
pub struct DeleteTimedStateHandler {
    auth: Arc<dyn Authenticator>,
    timed_states: ModelBucket<TimedState>,
    migrations: Arc<MigrationRegistry>,
}

impl DeleteTimedStateHandler {
    pub fn new(
        auth: Arc<dyn Authenticator>,
        timed_states: ModelBucket<TimedState>,
        migrations: Arc<MigrationRegistry>,
    ) -> Self {
        Self {
            auth,
            timed_states,
            migrations,
        }
    }

    fn validate(
        &self,
        ctx: &Context,
        store: &dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<DeleteTimedStateMsg> {
        let msg = self
            .migrations
            .prepare(PACKAGE, load_msg::<DeleteTimedStateMsg>(tx)?)?;
        let owner = timed_state_condition(&msg.timed_state_id).address();
        if !self.auth.has_address(ctx, store, &owner) {
            return Err(ChainError::unauthorized(format!(
                "deletion of timed state {} not authorized",
                hex::encode(&msg.timed_state_id)
            )));
        }
        Ok(msg)
    }
}

impl Handler for DeleteTimedStateHandler {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<CheckResult> {
        self.validate(ctx, store, tx)?;
        Ok(CheckResult::with_gas(HANDLER_COST))
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<DeliverResult> {
        let msg = self.validate(ctx, store, tx)?;
        self.timed_states.delete(store, &msg.timed_state_id)?;
        debug!(id = %hex::encode(&msg.timed_state_id), "timed state deleted");
        Ok(delivered(Vec::new()))
    }
}

// =============================================================================
// REGISTRATION
// =============================================================================

/// User-facing routes.
pub fn register_routes(
    router: &mut Router,
    migrations: Arc<MigrationRegistry>,
    scheduler: Arc<dyn Scheduler>,
) -> ChainResult<()> {
    router.handle(
        CREATE_STATE_PATH,
        Arc::new(CreateStateHandler::new(
            state_bucket(Arc::clone(&migrations))?,
            Arc::clone(&migrations),
        )),
    )?;
    router.handle(
        CREATE_TIMED_STATE_PATH,
        Arc::new(CreateTimedStateHandler::new(
            timed_state_bucket(Arc::clone(&migrations))?,
            scheduler,
            migrations,
        )),
    )
}

/// Routes reachable only from scheduled tasks.
pub fn register_cron_routes(
    router: &mut Router,
    auth: Arc<dyn Authenticator>,
    migrations: Arc<MigrationRegistry>,
) -> ChainResult<()> {
    router.handle(
        DELETE_TIMED_STATE_PATH,
        Arc::new(DeleteTimedStateHandler::new(
            auth,
            timed_state_bucket(Arc::clone(&migrations))?,
            migrations,
        )),
    )
}

pub fn register_query(
    queries: &mut QueryRouter,
    migrations: Arc<MigrationRegistry>,
) -> ChainResult<()> {
    queries.register("/states", Arc::new(state_bucket(Arc::clone(&migrations))?))?;
    queries.register("/timedstates", Arc::new(timed_state_bucket(migrations)?))
}
