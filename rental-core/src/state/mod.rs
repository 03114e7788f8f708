//! Portal state container
//!
//! `PortalState` owns every collection (users, catalog, cart, orders,
//! feed, problem statements) and is the only thing that mutates them.
//! It is a cheap-to-clone handle: construct it once at process start and
//! pass it to whatever needs it.
//!
//! # 模块结构
//!
//! ```text
//! state/
//! ├── session.rs    # login / logout / profile
//! ├── catalog.rs    # hardware CRUD + search
//! ├── cart.rs       # cart operations
//! ├── orders.rs     # place_order, status transitions
//! ├── community.rs  # posts, replies, likes
//! ├── problems.rs   # problem statements
//! └── queries.rs    # order filters, dashboard, user history
//! ```
//!
//! Persisted collections are saved while the collection's write lock is
//! still held, so the stored snapshot always matches memory.

mod cart;
mod catalog;
mod community;
mod orders;
mod problems;
mod queries;
mod session;

pub use orders::PendingOrder;
pub use queries::{DashboardSummary, OrderFilter, UserHistory};

use crate::config::{Config, DEFAULT_ADMIN_PASSWORD, DEFAULT_ORDER_LATENCY_MS};
use crate::seed;
use crate::storage::{KeyValueStore, Namespace, Persistence, RedbStore};
use parking_lot::RwLock;
use shared::models::{HardwareItem, Order, Post, ProblemStatement, User};
use shared::AppResult;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Runtime knobs for the container
#[derive(Debug, Clone)]
pub struct StateOptions {
    /// Delay before a placed order commits
    pub order_latency: Duration,
    /// Password accepted by `admin_login`
    pub admin_password: String,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            order_latency: Duration::from_millis(DEFAULT_ORDER_LATENCY_MS),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl From<&Config> for StateOptions {
    fn from(config: &Config) -> Self {
        Self {
            order_latency: config.order_latency(),
            admin_password: config.admin_password.clone(),
        }
    }
}

pub(crate) struct Inner {
    pub(crate) persistence: Persistence,
    pub(crate) options: StateOptions,
    /// Active session user
    pub(crate) session: RwLock<Option<User>>,
    /// User directory (seeded, not persisted)
    pub(crate) users: RwLock<Vec<User>>,
    pub(crate) hardware: RwLock<Vec<HardwareItem>>,
    pub(crate) cart: RwLock<Vec<HardwareItem>>,
    /// Newest first
    pub(crate) orders: RwLock<Vec<Order>>,
    /// Newest first (not persisted)
    pub(crate) posts: RwLock<Vec<Post>>,
    /// Posts liked in this session
    pub(crate) liked_posts: RwLock<HashSet<String>>,
    pub(crate) problems: RwLock<Vec<ProblemStatement>>,
}

/// Shared portal state handle
#[derive(Clone)]
pub struct PortalState {
    pub(crate) inner: Arc<Inner>,
}

impl fmt::Debug for PortalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalState")
            .field("session", &self.inner.session.read().as_ref().map(|u| u.id.clone()))
            .field("hardware", &self.inner.hardware.read().len())
            .field("cart", &self.inner.cart.read().len())
            .field("orders", &self.inner.orders.read().len())
            .finish_non_exhaustive()
    }
}

impl PortalState {
    /// Open the on-disk store under the configured work dir and rehydrate
    pub fn open(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            shared::AppError::storage(format!("Failed to create work dir: {}", e))
                .with_detail("work_dir", config.work_dir.as_str())
        })?;

        let store = RedbStore::open(config.db_path())?;
        tracing::info!(path = %config.db_path().display(), "Opened portal store");
        Ok(Self::new(Arc::new(store), StateOptions::from(config)))
    }

    /// Fresh state over an in-memory store
    pub fn in_memory(options: StateOptions) -> AppResult<Self> {
        let store = RedbStore::open_in_memory()?;
        Ok(Self::new(Arc::new(store), options))
    }

    /// Rehydrate from `store`, falling back to seed data per collection
    pub fn new(store: Arc<dyn KeyValueStore>, options: StateOptions) -> Self {
        let persistence = Persistence::new(store);

        let session: Option<User> = persistence.load(Namespace::User);
        let hardware = persistence
            .load(Namespace::Hardware)
            .unwrap_or_else(seed::hardware);
        let cart = persistence.load(Namespace::Cart).unwrap_or_default();
        let orders = persistence.load(Namespace::Orders).unwrap_or_default();
        let problems = persistence
            .load(Namespace::ProblemStatements)
            .unwrap_or_else(seed::problem_statements);

        let mut users = seed::users();
        // A restored session user must stay resolvable by email
        if let Some(active) = &session
            && !users.iter().any(|u| u.id == active.id)
        {
            users.push(active.clone());
        }

        let inner = Inner {
            persistence,
            options,
            session: RwLock::new(session),
            users: RwLock::new(users),
            hardware: RwLock::new(hardware),
            cart: RwLock::new(cart),
            orders: RwLock::new(orders),
            posts: RwLock::new(seed::posts()),
            liked_posts: RwLock::new(HashSet::new()),
            problems: RwLock::new(problems),
        };

        let state = Self {
            inner: Arc::new(inner),
        };
        tracing::debug!(state = ?state, "Portal state initialized");
        state
    }

    pub fn options(&self) -> &StateOptions {
        &self.inner.options
    }

    /// Whether saves to `ns` have been suspended after a write failure
    pub fn is_degraded(&self, ns: Namespace) -> bool {
        self.inner.persistence.is_degraded(ns)
    }
}
