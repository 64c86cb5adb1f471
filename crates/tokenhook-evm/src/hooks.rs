//! Write hooks.
//!
//! A [`WriteOp`] pairs a fire-and-forget trigger with the observable result
//! of the calls it issued. Triggering spawns the contract call on the
//! current tokio runtime and returns immediately; when the call settles its
//! outcome replaces whatever the result cell held before.
//!
//! Calls are never cancelled. If several calls of one operation are in
//! flight, the cell ends up holding the outcome of whichever settled last,
//! regardless of the order they were triggered in. Until a call settles the
//! previous outcome stays visible, and no separate pending flag is exposed.

use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash, U256};
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info};

use tokenhook_core::audit::{AuditLogger, AuditObserver};
use tokenhook_core::normalize::{normalize, normalize_any};
use tokenhook_core::result::CallResult;
use tokenhook_core::state::{Observer, ResultCell, ResultReader};

use crate::binder::{bind, BoundToken, ConnectionParams};
use crate::token::TokenError;

/// Outcome of a write call.
pub type TxResult = CallResult<TxHash>;

/// A state-mutating token call that a [`WriteOp`] can issue.
pub trait WriteCall: Send + 'static {
    /// Operation name used in logs and audit events.
    const NAME: &'static str;

    fn submit(self, token: BoundToken) -> BoxFuture<'static, Result<TxHash, TokenError>>;
}

/// Arguments of `approve(spender, amount)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approve {
    pub spender: Address,
    pub amount: U256,
}

/// Arguments of `transfer(to, amount)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub to: Address,
    pub amount: U256,
}

/// Arguments of `transferFrom(from, to, amount)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFrom {
    pub from: Address,
    pub to: Address,
    pub amount: U256,
}

impl WriteCall for Approve {
    const NAME: &'static str = "approve";

    fn submit(self, token: BoundToken) -> BoxFuture<'static, Result<TxHash, TokenError>> {
        async move { token.submit_approve(self.spender, self.amount).await }.boxed()
    }
}

impl WriteCall for Transfer {
    const NAME: &'static str = "transfer";

    fn submit(self, token: BoundToken) -> BoxFuture<'static, Result<TxHash, TokenError>> {
        async move { token.submit_transfer(self.to, self.amount).await }.boxed()
    }
}

impl WriteCall for TransferFrom {
    const NAME: &'static str = "transfer_from";

    fn submit(self, token: BoundToken) -> BoxFuture<'static, Result<TxHash, TokenError>> {
        async move {
            token
                .submit_transfer_from(self.from, self.to, self.amount)
                .await
        }
        .boxed()
    }
}

/// The callable half of a write hook.
pub struct Trigger<A> {
    token: BoundToken,
    cell: Arc<ResultCell<TxHash>>,
    _call: PhantomData<fn(A)>,
}

impl<A> Clone for Trigger<A> {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
            cell: Arc::clone(&self.cell),
            _call: PhantomData,
        }
    }
}

impl<A> std::fmt::Debug for Trigger<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("token", &self.token.address())
            .field("operation", &self.cell.label())
            .finish()
    }
}

impl<A: WriteCall> Trigger<A> {
    /// Issues the call and returns immediately. The outcome lands in the
    /// result cell once the call settles.
    ///
    /// Never panics: without a tokio runtime the cell settles with an error.
    pub fn call(&self, args: A) {
        let cell = Arc::clone(&self.cell);
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                cell.settle(CallResult::Error(normalize(e)));
                return;
            }
        };

        debug!(operation = A::NAME, token = %self.token.address(), "issuing write call");
        let submission = AssertUnwindSafe(args.submit(self.token.clone())).catch_unwind();
        handle.spawn(async move {
            let outcome = match submission.await {
                Ok(Ok(tx_hash)) => {
                    info!(operation = A::NAME, %tx_hash, "write call accepted");
                    CallResult::Transaction(tx_hash)
                }
                Ok(Err(e)) => CallResult::Error(e.into_normalized()),
                Err(panic) => CallResult::Error(normalize_any(panic)),
            };
            cell.settle(outcome);
        });
    }
}

/// A write hook: trigger plus observable result.
#[derive(Debug)]
pub struct WriteOp<A> {
    trigger: Trigger<A>,
    reader: ResultReader<TxHash>,
}

impl<A: WriteCall> WriteOp<A> {
    pub fn new(token: BoundToken) -> Self {
        let cell = Arc::new(ResultCell::new(A::NAME));
        Self {
            reader: ResultReader::new(Arc::clone(&cell)),
            trigger: Trigger {
                token,
                cell,
                _call: PhantomData,
            },
        }
    }

    /// See [`Trigger::call`].
    pub fn trigger(&self, args: A) {
        self.trigger.call(args);
    }

    /// Latest settled outcome, `None` until the first call settles.
    pub fn result(&self) -> Option<TxResult> {
        self.reader.current()
    }

    /// Receiver notified on every later settlement.
    pub fn subscribe(&self) -> watch::Receiver<Option<TxResult>> {
        self.reader.subscribe()
    }

    pub fn observe(&self, observer: impl Observer<TxHash> + 'static) {
        self.reader.observe(observer);
    }

    pub fn reader(&self) -> &ResultReader<TxHash> {
        &self.reader
    }

    /// Splits into the `(trigger, result)` pair.
    pub fn split(self) -> (Trigger<A>, ResultReader<TxHash>) {
        (self.trigger, self.reader)
    }
}

pub fn use_approve(token: &BoundToken) -> WriteOp<Approve> {
    WriteOp::new(token.clone())
}

pub fn use_transfer(token: &BoundToken) -> WriteOp<Transfer> {
    WriteOp::new(token.clone())
}

pub fn use_transfer_from(token: &BoundToken) -> WriteOp<TransferFrom> {
    WriteOp::new(token.clone())
}

/// A bound token with one write hook per mutating operation. Reads go
/// through [`TokenHooks::token`].
#[derive(Debug)]
pub struct TokenHooks {
    pub token: BoundToken,
    pub approve: WriteOp<Approve>,
    pub transfer: WriteOp<Transfer>,
    pub transfer_from: WriteOp<TransferFrom>,
}

impl TokenHooks {
    pub fn new(token: BoundToken) -> Self {
        Self {
            approve: use_approve(&token),
            transfer: use_transfer(&token),
            transfer_from: use_transfer_from(&token),
            token,
        }
    }

    /// Records every settlement of every write hook to `logger`.
    pub fn attach_audit(&self, logger: Arc<Mutex<AuditLogger>>) {
        self.approve
            .observe(AuditObserver::new(Approve::NAME, Arc::clone(&logger)));
        self.transfer
            .observe(AuditObserver::new(Transfer::NAME, Arc::clone(&logger)));
        self.transfer_from
            .observe(AuditObserver::new(TransferFrom::NAME, logger));
    }
}

/// Binds the token and builds all write hooks.
///
/// Fails only when the contract address is malformed; every later failure is
/// captured in the hooks' results.
pub fn use_token(params: ConnectionParams) -> Result<TokenHooks, TokenError> {
    Ok(TokenHooks::new(bind(params)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CapabilityError, Connection, QueryCapability};
    use alloy::primitives::Bytes;
    use alloy::rpc::types::TransactionRequest;
    use async_trait::async_trait;

    struct ReadOnly;

    #[async_trait]
    impl QueryCapability for ReadOnly {
        async fn call(&self, _tx: TransactionRequest) -> Result<Bytes, CapabilityError> {
            Ok(Bytes::new())
        }
    }

    fn read_only_token() -> BoundToken {
        BoundToken::new(Connection::read_only(ReadOnly), Address::with_last_byte(1))
    }

    #[test]
    fn trigger_outside_runtime_settles_error() {
        let op = use_approve(&read_only_token());
        op.trigger(Approve {
            spender: Address::ZERO,
            amount: U256::from(1u64),
        });
        let result = op.result().unwrap();
        assert!(result.error().is_some());
        assert!(result.transaction().is_none());
    }

    #[tokio::test]
    async fn read_only_connection_settles_missing_signer() {
        let op = use_transfer(&read_only_token());
        let mut rx = op.subscribe();
        op.trigger(Transfer {
            to: Address::ZERO,
            amount: U256::from(1u64),
        });
        rx.changed().await.unwrap();
        let result = op.result().unwrap();
        assert_eq!(
            result.error().unwrap().message(),
            "connection cannot sign transactions"
        );
    }

    #[test]
    fn use_token_rejects_malformed_address() {
        let params = ConnectionParams::new(Connection::read_only(ReadOnly), "0xnot-an-address");
        assert!(matches!(
            use_token(params),
            Err(TokenError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn hooks_start_idle() {
        let hooks = TokenHooks::new(read_only_token());
        assert!(hooks.approve.result().is_none());
        assert!(hooks.transfer.result().is_none());
        assert!(hooks.transfer_from.result().is_none());
    }
}
