//! Concurrent dashboard loading with last-requestor-wins cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use futures::future::try_join_all;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use remlic_core::error::AppError;
use remlic_core::result::AppResult;
use remlic_core::types::UserId;
use remlic_database::store::{LicenseStore, ProfileStore};
use remlic_entity::license::LicenseType;
use remlic_entity::user::Profile;

use super::entry::{DashboardView, TypeEntry};
use super::state::DashboardState;
use crate::context::RequestContext;

type InFlightLoads = DashMap<UserId, (u64, CancellationToken)>;

/// A registered load. Deregisters on drop, including when the caller
/// abandons the future.
struct InFlight<'a> {
    loads: &'a InFlightLoads,
    user_id: UserId,
    ticket: u64,
    token: CancellationToken,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let ticket = self.ticket;
        self.loads
            .remove_if(&self.user_id, |_, (current, _)| *current == ticket);
    }
}

/// Loads dashboards. At most one load per user is in flight; starting a
/// new one cancels the previous.
#[derive(Clone)]
pub struct DashboardService {
    licenses: Arc<dyn LicenseStore>,
    profiles: Arc<dyn ProfileStore>,
    in_flight: Arc<InFlightLoads>,
    next_ticket: Arc<AtomicU64>,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(licenses: Arc<dyn LicenseStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            licenses,
            profiles,
            in_flight: Arc::new(DashMap::new()),
            next_ticket: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Load every type concurrently. Fails with `Cancelled` if a newer load
    /// for the same user starts first.
    pub async fn load(&self, ctx: &RequestContext) -> AppResult<DashboardView> {
        let load = self.register(ctx.user_id);

        tokio::select! {
            biased;
            _ = load.token.cancelled() => {
                debug!(user_id = %ctx.user_id, ticket = load.ticket, "Dashboard load superseded");
                Err(AppError::cancelled("Dashboard load superseded by a newer request"))
            }
            view = self.fetch(ctx) => view,
        }
    }

    /// Load and fold into a [`DashboardState`] with the given filters applied.
    pub async fn snapshot(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
        section: Option<LicenseType>,
    ) -> AppResult<DashboardState> {
        let mut state = DashboardState::default();
        let generation = state.begin_refresh();

        match self.load(ctx).await {
            Ok(view) => {
                state.apply_loaded(generation, view);
            }
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                state.apply_failed(generation, e.message.clone());
                return Err(e);
            }
        }

        if let Some(search) = search {
            state.set_search(search);
        }
        if let Some(section) = section {
            state.select_section(section);
        }
        Ok(state)
    }

    /// Reload the entry for a single type.
    pub async fn entry(&self, ctx: &RequestContext, kind: LicenseType) -> AppResult<TypeEntry> {
        let profile = self.profile(ctx.user_id).await?;
        let records = self.licenses.list(ctx.user_id, kind).await?;
        Ok(TypeEntry::build(kind, records, profile.tier(), ctx.request_time))
    }

    fn register(&self, user_id: UserId) -> InFlight<'_> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        if let Some((previous, stale)) = self.in_flight.insert(user_id, (ticket, token.clone())) {
            debug!(%user_id, previous, ticket, "Cancelling in-flight dashboard load");
            stale.cancel();
        }
        InFlight {
            loads: &self.in_flight,
            user_id,
            ticket,
            token,
        }
    }

    async fn profile(&self, user_id: UserId) -> AppResult<Profile> {
        Ok(self
            .profiles
            .find(user_id)
            .await?
            .unwrap_or_else(|| Profile::new(user_id)))
    }

    async fn fetch(&self, ctx: &RequestContext) -> AppResult<DashboardView> {
        let profile = self.profile(ctx.user_id).await?;
        let tier = profile.tier();

        let lists = try_join_all(
            LicenseType::ALL
                .iter()
                .map(|kind| self.licenses.list(ctx.user_id, *kind)),
        )
        .await?;

        let entries = LicenseType::ALL
            .into_iter()
            .zip(lists)
            .map(|(kind, records)| TypeEntry::build(kind, records, tier, ctx.request_time))
            .collect();

        Ok(DashboardView {
            tier,
            has_active_subscription: profile.has_active_subscription(ctx.request_time),
            entries,
            loaded_at: ctx.request_time,
        })
    }
}
