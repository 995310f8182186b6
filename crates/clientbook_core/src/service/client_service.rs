//! Client use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for client store callers.
//! - Delegate persistence and lookup semantics to the repository.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Only `require_by_name` turns an absent result into an error; every
//!   other lookup reports "no match" as `None` or an empty vec.

use crate::model::client::{Client, ClientId, NewClient};
use crate::repo::client_repo::{ClientRepository, RepoError, RepoResult};

/// Use-case service wrapper for client store operations.
pub struct ClientService<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new client and returns its store-assigned id.
    pub fn register_client(&self, client: &NewClient) -> RepoResult<ClientId> {
        self.repo.insert(client)
    }

    /// Updates an existing client by stable id.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_client(&self, client: &Client) -> RepoResult<()> {
        self.repo.update(client)
    }

    /// Gets one client by id.
    pub fn get_client(&self, id: ClientId) -> RepoResult<Option<Client>> {
        self.repo.get(id)
    }

    /// Returns every client in store order.
    pub fn list_clients(&self) -> RepoResult<Vec<Client>> {
        self.repo.list_all()
    }

    /// Returns whether a client with this id exists.
    pub fn exists(&self, id: ClientId) -> RepoResult<bool> {
        self.repo.exists(id)
    }

    /// Returns the total client count.
    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count()
    }

    /// Case-insensitive exact name lookup; absent is `Ok(None)`.
    pub fn find_by_name_exact(&self, name: &str) -> RepoResult<Option<Client>> {
        self.repo.find_by_name_exact(name)
    }

    /// Exact name lookup that the caller insists must succeed.
    ///
    /// # Errors
    /// - `RepoError::NameNotFound` when no record matches.
    pub fn require_by_name(&self, name: &str) -> RepoResult<Client> {
        self.repo
            .find_by_name_exact(name)?
            .ok_or_else(|| RepoError::NameNotFound(name.to_string()))
    }

    /// Case-insensitive substring lookup over names.
    pub fn find_by_name_contains(&self, fragment: &str) -> RepoResult<Vec<Client>> {
        self.repo.find_by_name_contains(fragment)
    }

    /// Strict `income > threshold`.
    pub fn find_by_income_greater_than(&self, threshold: f64) -> RepoResult<Vec<Client>> {
        self.repo.find_by_income_greater_than(threshold)
    }

    /// Strict `income < threshold`.
    pub fn find_by_income_less_than(&self, threshold: f64) -> RepoResult<Vec<Client>> {
        self.repo.find_by_income_less_than(threshold)
    }

    /// Inclusive income range; inverted bounds yield an empty result.
    pub fn find_by_income_between(&self, low: f64, high: f64) -> RepoResult<Vec<Client>> {
        self.repo.find_by_income_between(low, high)
    }

    /// Exact income equality, no tolerance.
    pub fn find_by_income_equal(&self, value: f64) -> RepoResult<Vec<Client>> {
        self.repo.find_by_income_equal(value)
    }

    /// Inclusive birth-date window on epoch-ms instants.
    pub fn find_by_birth_date_between(&self, start: i64, end: i64) -> RepoResult<Vec<Client>> {
        self.repo.find_by_birth_date_between(start, end)
    }

    /// Deletes one client by id; deleting a missing id is a no-op.
    pub fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        self.repo.delete_by_id(id)?;
        Ok(())
    }
}
