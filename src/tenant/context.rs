// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped tenant context.
//!
//! The tenant gate inserts a [`RequestContext`] into the request extensions
//! and runs the downstream future inside [`RequestContext::scope`]. The
//! task-local value exists only while that future is being polled by the
//! task that owns it; concurrent requests each get their own.

use std::future::Future;

use super::TenantId;

tokio::task_local! {
    static CURRENT: RequestContext;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    tenant: TenantId,
}

impl RequestContext {
    pub fn new(tenant: TenantId) -> Self {
        Self { tenant }
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// Run `fut` with this context installed.
    ///
    /// The context is removed when `fut` completes or is dropped.
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self, fut).await
    }

    /// Tenant of the request being handled on this task, if any.
    pub fn current_tenant() -> Option<TenantId> {
        CURRENT.try_with(|ctx| ctx.tenant.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(name: &str) -> RequestContext {
        RequestContext::new(TenantId::new(name))
    }

    #[tokio::test]
    async fn visible_inside_scope_only() {
        assert!(RequestContext::current_tenant().is_none());

        let seen = ctx("acme")
            .scope(async { RequestContext::current_tenant() })
            .await;
        assert_eq!(seen.unwrap().as_str(), "acme");

        assert!(RequestContext::current_tenant().is_none());
    }

    #[tokio::test]
    async fn cleared_after_failing_future() {
        let result: Result<(), &str> = ctx("acme").scope(async { Err("handler failed") }).await;
        assert!(result.is_err());
        assert!(RequestContext::current_tenant().is_none());
    }

    #[tokio::test]
    async fn cleared_when_scoped_future_is_dropped() {
        let fut = ctx("acme").scope(std::future::pending::<()>());
        // Poll once through a timeout, then drop the future mid-flight.
        let _ = tokio::time::timeout(std::time::Duration::from_millis(5), fut).await;
        assert!(RequestContext::current_tenant().is_none());
    }

    #[tokio::test]
    async fn sequential_scopes_do_not_leak() {
        let first = ctx("alpha")
            .scope(async { RequestContext::current_tenant() })
            .await;
        let between = RequestContext::current_tenant();
        let second = ctx("beta")
            .scope(async { RequestContext::current_tenant() })
            .await;

        assert_eq!(first.unwrap().as_str(), "alpha");
        assert!(between.is_none());
        assert_eq!(second.unwrap().as_str(), "beta");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_scopes_are_isolated() {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let name = format!("tenant-{i}");
                tokio::spawn(async move {
                    ctx(&name)
                        .scope(async move {
                            tokio::task::yield_now().await;
                            let seen = RequestContext::current_tenant().unwrap();
                            assert_eq!(seen.as_str(), name);
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    }
}
