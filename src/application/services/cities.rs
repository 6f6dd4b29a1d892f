//! City lookups

use std::sync::Arc;

use crate::domain::{DomainResult, RepositoryProvider};

pub struct CityService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn list_names(&self) -> DomainResult<Vec<String>> {
        self.repos.cities().list_names().await
    }
}
