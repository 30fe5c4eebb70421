//! User Service
//!
//! Sequences every user operation across the sharded store (system of
//! record) and the TTL response cache:
//!
//! - writes go to the store first and touch the cache only on success
//! - single-user reads try the cache, fall through to the store on a miss
//!   and repopulate the cache with what they found
//! - listing always reads the store

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::domain::{Email, Password, User, UserType, DEFAULT_HASH_COST};
use crate::error::{ApiError, Result};
use crate::models::{CreateUserRequest, StatsResponse, UpdateUserRequest, UserResponse};
use crate::store::{Context, ShardedStore};

/// Per-process counters of successful writes.
#[derive(Debug, Default)]
struct WriteCounters {
    created: AtomicU64,
    updated: AtomicU64,
    deleted: AtomicU64,
}

// == User Service ==
/// Store + cache orchestration for user records.
#[derive(Debug)]
pub struct UserService {
    store: Arc<ShardedStore<User>>,
    cache: Arc<TtlCache<UserResponse>>,
    cache_ttl: Duration,
    request_timeout: Duration,
    password_cost: u32,
    shutdown: CancellationToken,
    counters: WriteCounters,
}

impl UserService {
    pub fn new(
        store: Arc<ShardedStore<User>>,
        cache: Arc<TtlCache<UserResponse>>,
        cache_ttl: Duration,
        request_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            cache_ttl,
            request_timeout,
            password_cost: DEFAULT_HASH_COST,
            shutdown: CancellationToken::new(),
            counters: WriteCounters::default(),
        }
    }

    /// Builds a fresh store and cache sized from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(ShardedStore::new(config.shard_count)),
            Arc::new(TtlCache::new()),
            config.cache_ttl(),
            config.request_timeout(),
        )
        .with_password_cost(config.password_cost)
    }

    /// bcrypt cost used for new and changed passwords.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    /// Ties every request context to `token`, so cancelling it (on shutdown)
    /// makes new store calls fail fast.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn store(&self) -> &Arc<ShardedStore<User>> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<TtlCache<UserResponse>> {
        &self.cache
    }

    /// A context for one request: cancelled on shutdown, deadline after the
    /// configured request timeout.
    pub fn request_context(&self) -> Context {
        Context::with_token(&self.shutdown).timeout(self.request_timeout)
    }

    // == Create ==
    pub fn create_user(&self, ctx: &Context, req: CreateUserRequest) -> Result<UserResponse> {
        if let Some(error_msg) = req.validate() {
            return Err(ApiError::InvalidRequest(error_msg));
        }

        let user_type: UserType = req.user_type.parse()?;
        let email = Email::parse(&req.email)?;
        let password = Password::hash_with_cost(&req.password, self.password_cost)?;
        let user = User::new(
            &req.name,
            email,
            password,
            req.active.unwrap_or(true),
            user_type,
        )?;

        self.store.create(ctx, &user)?;
        self.counters.created.fetch_add(1, Ordering::Relaxed);

        let response = UserResponse::from(&user);
        self.cache
            .set(user.email.as_str(), response.clone(), self.cache_ttl);

        info!(email = %user.email, "user created");
        Ok(response)
    }

    // == Get ==
    pub fn get_user(&self, ctx: &Context, email: &str) -> Result<UserResponse> {
        let email = parse_email_param(email)?;

        if let Some(cached) = self.cache.get(email.as_str()) {
            debug!(email = %email, "user served from cache");
            return Ok(cached);
        }

        let user = self
            .store
            .get_by_key(ctx, email.as_str())?
            .ok_or(ApiError::NotFound)?;

        let response = UserResponse::from(&user);
        self.cache.set(email.as_str(), response.clone(), self.cache_ttl);
        Ok(response)
    }

    // == List ==
    pub fn list_users(&self, ctx: &Context) -> Result<Vec<UserResponse>> {
        let users = self.store.list(ctx)?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    // == Update ==
    /// Applies a partial update. Absent or blank fields keep their current
    /// value; a new password is re-hashed.
    pub fn update_user(
        &self,
        ctx: &Context,
        email: &str,
        req: UpdateUserRequest,
    ) -> Result<UserResponse> {
        let email = parse_email_param(email)?;
        if let Some(error_msg) = req.validate() {
            return Err(ApiError::InvalidRequest(error_msg));
        }

        let current = self
            .store
            .get_by_key(ctx, email.as_str())?
            .ok_or(ApiError::NotFound)?;

        let name = non_blank(req.name.as_deref()).unwrap_or(current.name.as_str());
        let user_type: UserType = match non_blank(req.user_type.as_deref()) {
            Some(user_type) => user_type.parse()?,
            None => current.user_type,
        };
        let password = match req.password.as_deref().filter(|raw| !raw.is_empty()) {
            Some(raw) => Password::hash_with_cost(raw, self.password_cost)?,
            None => current.password.clone(),
        };
        let active = req.active.unwrap_or(current.active);

        let updated = User::new(name, email, password, active, user_type)?;

        self.store.update(ctx, &updated)?;
        self.counters.updated.fetch_add(1, Ordering::Relaxed);

        let response = UserResponse::from(&updated);
        self.cache
            .set(updated.email.as_str(), response.clone(), self.cache_ttl);

        info!(email = %updated.email, "user updated");
        Ok(response)
    }

    // == Delete ==
    pub fn delete_user(&self, ctx: &Context, email: &str) -> Result<()> {
        let email = parse_email_param(email)?;

        self.store.delete(ctx, email.as_str())?;
        self.counters.deleted.fetch_add(1, Ordering::Relaxed);
        self.cache.invalidate(email.as_str());

        info!(email = %email, "user deleted");
        Ok(())
    }

    // == Stats ==
    pub fn stats(&self) -> StatsResponse {
        let cache = self.cache.stats();
        StatsResponse {
            users_created: self.counters.created.load(Ordering::Relaxed),
            users_updated: self.counters.updated.load(Ordering::Relaxed),
            users_deleted: self.counters.deleted.load(Ordering::Relaxed),
            total_users: self.store.len(),
            shard_count: self.store.shard_count(),
            cache_hit_rate: cache.hit_rate(),
            cache,
        }
    }
}

/// Parses an email taken from the request path.
fn parse_email_param(raw: &str) -> Result<Email> {
    if raw.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "email parameter is required".to_string(),
        ));
    }
    Email::parse(raw).map_err(|_| ApiError::InvalidRequest("invalid email format".to_string()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
