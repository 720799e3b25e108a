use cc_01_kv_store::KvStore;
use cc_02_orm::ModelBucket;
use cc_03_pipeline::{
    CheckResult, Context, ContextAuthenticator, Decorator, DeliverResult, Handler, Tx,
};
use shared_types::{ChainError, ChainResult, Condition, StdSignature, Validate};
use tracing::debug;

use crate::domain::{build_sign_bytes, PublicKey, UserData};

/// Context source under which verified signers are published.
pub const SIGS_SOURCE: &str = "sigs";

/// Authenticator over the conditions [`SigCheckDecorator`] established.
pub const fn authenticator() -> ContextAuthenticator {
    ContextAuthenticator::new(SIGS_SOURCE)
}

/// Verifies envelope signatures and publishes the signers.
#[derive(Debug, Clone)]
pub struct SigCheckDecorator {
    users: ModelBucket<UserData>,
}

impl SigCheckDecorator {
    pub fn new(users: ModelBucket<UserData>) -> Self {
        Self { users }
    }

    /// Verify all signatures and bump their sequences. Returns the signer
    /// conditions in signature order.
    fn verify_all(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<Vec<Condition>> {
        let sigs = tx.signatures();
        if sigs.is_empty() {
            return Ok(Vec::new());
        }
        let tx_bytes = tx.sign_bytes()?;
        sigs.iter()
            .map(|sig| self.verify_one(ctx, store, &tx_bytes, sig))
            .collect()
    }

    fn verify_one(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx_bytes: &[u8],
        sig: &StdSignature,
    ) -> ChainResult<Condition> {
        sig.validate()?;
        let pubkey = PublicKey::from_bytes(&sig.pubkey)?;
        let address = pubkey.address();

        let mut user = match self.users.get(store, address.as_bytes())? {
            Some(user) => user,
            None => {
                let mut user = UserData::new(sig.pubkey.clone());
                user.metadata.schema = self.users.schema()?;
                user
            }
        };
        if sig.sequence != user.sequence {
            return Err(ChainError::unauthorized(format!(
                "invalid sequence for {}: expected {}, got {}",
                address, user.sequence, sig.sequence
            )));
        }

        let sign_bytes = build_sign_bytes(tx_bytes, ctx.chain_id(), sig.sequence);
        pubkey.verify(&sign_bytes, &sig.signature)?;

        user.sequence += 1;
        self.users.put(store, address.as_bytes(), &user)?;
        debug!(signer = %address, sequence = user.sequence, "signature verified");
        Ok(pubkey.condition())
    }
}

impl Decorator for SigCheckDecorator {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<CheckResult> {
        let signers = self.verify_all(ctx, store, tx)?;
        next.check(&ctx.with_conditions(SIGS_SOURCE, signers), store, tx)
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<DeliverResult> {
        let signers = self.verify_all(ctx, store, tx)?;
        next.deliver(&ctx.with_conditions(SIGS_SOURCE, signers), store, tx)
    }
}
