/// Remote place-search providers
///
/// Each provider maps its own response shape into [`NormalizedRestaurant`].
/// Providers are best-effort: [`fetch_remote`] runs them concurrently and turns
/// every failure into an empty contribution.
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{GeoPoint, NormalizedRestaurant},
};

pub mod foursquare;
pub mod opentripmap;

pub use foursquare::FoursquareProvider;
pub use opentripmap::OpenTripMapProvider;

/// What a provider is asked for
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub origin: GeoPoint,
    /// City of the request, used for dedupe keys and map links
    pub city: String,
    /// Free-text search hint, usually the requested cuisines
    pub cuisine_hint: Option<String>,
    pub limit: usize,
}

impl NearbyQuery {
    pub fn new(origin: GeoPoint, city: impl Into<String>, cuisines: &[String]) -> Self {
        let hint = cuisines
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            origin,
            city: city.into(),
            cuisine_hint: (!hint.is_empty()).then_some(hint),
            limit: 10,
        }
    }
}

/// Trait for remote restaurant search providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Search for restaurants around the query origin
    async fn search_nearby(&self, query: &NearbyQuery) -> AppResult<Vec<NormalizedRestaurant>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Queries every provider in parallel and concatenates what succeeds.
///
/// Never fails: provider errors and panicked tasks are logged and dropped.
pub async fn fetch_remote(
    providers: &[Arc<dyn PlaceProvider>],
    query: &NearbyQuery,
) -> Vec<NormalizedRestaurant> {
    let mut tasks = Vec::with_capacity(providers.len());

    for provider in providers {
        let provider = Arc::clone(provider);
        let query = query.clone();
        let task = tokio::spawn(async move {
            let name = provider.name();
            (name, provider.search_nearby(&query).await)
        });
        tasks.push(task);
    }

    let mut results = Vec::new();
    let mut error_count = 0;

    for task in tasks {
        match task.await {
            Ok((name, Ok(places))) => {
                tracing::debug!(provider = name, count = places.len(), "Remote search succeeded");
                results.extend(places);
            }
            Ok((name, Err(e))) => {
                tracing::warn!(provider = name, error = %e, "Remote search failed");
                error_count += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                error_count += 1;
            }
        }
    }

    if error_count > 0 {
        tracing::warn!(
            success_count = results.len(),
            error_count,
            "Partial remote search failure"
        );
    }

    results
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;

    /// Serves `router` on an ephemeral local port and returns its base URL
    pub async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
