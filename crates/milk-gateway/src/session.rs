use milk_wallet::SigningContext;
use tracing::debug;

use crate::connection::{LedgerFault, LedgerNetwork, LedgerSession};

/// Owns one open session and closes it exactly once.
///
/// Closing happens either through [`SessionGuard::close`] or, when the
/// owning future is dropped mid-call, through `Drop`. A guard is never
/// shared, so a session can never serve a second identity.
pub struct SessionGuard {
    session: Option<Box<dyn LedgerSession>>,
    identity: String,
}

impl SessionGuard {
    pub async fn open(
        network: &dyn LedgerNetwork,
        identity: &SigningContext,
    ) -> Result<Self, LedgerFault> {
        let session = network.connect(identity).await?;
        debug!(identity = %identity.name, "ledger session opened");
        Ok(Self {
            session: Some(session),
            identity: identity.name.clone(),
        })
    }

    /// The open session.
    ///
    /// # Panics
    ///
    /// Never in practice: the session is only taken by `close`, which
    /// consumes the guard.
    pub fn session(&self) -> &dyn LedgerSession {
        self.session
            .as_deref()
            .expect("session accessed after close")
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
            debug!(identity = %self.identity, "ledger session closed");
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::connection::ChannelHandle;

    #[derive(Default)]
    struct Counters {
        opened: AtomicUsize,
        closed: AtomicUsize,
    }

    struct CountingNetwork(Arc<Counters>);

    struct CountingSession {
        counters: Arc<Counters>,
        identity: String,
    }

    #[async_trait]
    impl LedgerNetwork for CountingNetwork {
        async fn connect(
            &self,
            identity: &SigningContext,
        ) -> Result<Box<dyn LedgerSession>, LedgerFault> {
            self.0.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingSession {
                counters: Arc::clone(&self.0),
                identity: identity.name.clone(),
            }))
        }
    }

    #[async_trait]
    impl LedgerSession for CountingSession {
        fn identity(&self) -> &str {
            &self.identity
        }

        async fn channel(&self, name: &str) -> Result<Box<dyn ChannelHandle>, LedgerFault> {
            Err(LedgerFault::Connection(format!("no channel {name}")))
        }

        fn close(&mut self) {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ctx() -> SigningContext {
        SigningContext::new("appUser", "Org1MSP", "cert", "key")
    }

    #[tokio::test]
    async fn explicit_close_closes_once() {
        let counters = Arc::new(Counters::default());
        let network = CountingNetwork(Arc::clone(&counters));

        let guard = SessionGuard::open(&network, &ctx()).await.unwrap();
        assert_eq!(guard.identity(), "appUser");
        assert_eq!(guard.session().identity(), "appUser");
        guard.close();

        assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drop_closes_abandoned_session() {
        let counters = Arc::new(Counters::default());
        let network = CountingNetwork(Arc::clone(&counters));

        {
            let guard = SessionGuard::open(&network, &ctx()).await.unwrap();
            assert!(guard.session().channel("mychannel").await.is_err());
        }

        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }
}
