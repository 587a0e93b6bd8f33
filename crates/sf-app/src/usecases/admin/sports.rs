use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, Instrument};

use sf_core::api::endpoints;
use sf_core::catalog::{NewSport, SportCategoryRecord, SportRecord};
use sf_core::ids::SportId;
use sf_core::ports::{ApiTransportExt, ApiTransportPort};

use super::list_body;

/// Sports catalog maintenance from the admin dashboard.
pub struct ManageSportsCatalog {
    api: Arc<dyn ApiTransportPort>,
}

impl ManageSportsCatalog {
    pub fn new(api: Arc<dyn ApiTransportPort>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<SportRecord>> {
        let response = self
            .api
            .get(endpoints::ADMIN_SPORTS)
            .await
            .context("Failed to list sports")?;
        list_body(response).context("Failed to parse sports")
    }

    pub async fn create(&self, sport: NewSport) -> Result<SportRecord> {
        let span = info_span!("usecase.admin.create_sport", slug = %sport.slug);

        async {
            let created: SportRecord = self
                .api
                .post(endpoints::ADMIN_SPORTS, &sport)
                .await
                .with_context(|| format!("Failed to create sport {}", sport.name))?
                .into_json()
                .context("Failed to parse created sport")?;
            info!(sport_id = %created.id, "Sport created");
            Ok(created)
        }
        .instrument(span)
        .await
    }

    pub async fn delete(&self, sport_id: &SportId) -> Result<()> {
        let span = info_span!("usecase.admin.delete_sport", sport_id = %sport_id);

        async {
            self.api
                .delete(&endpoints::admin_sport(sport_id.as_ref()))
                .await
                .with_context(|| format!("Failed to delete sport {sport_id}"))?;
            info!("Sport deleted");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

pub struct ListSportCategories {
    api: Arc<dyn ApiTransportPort>,
}

impl ListSportCategories {
    pub fn new(api: Arc<dyn ApiTransportPort>) -> Self {
        Self { api }
    }

    pub async fn execute(&self, sport_id: &SportId) -> Result<Vec<SportCategoryRecord>> {
        let response = self
            .api
            .get(&endpoints::sport_categories(sport_id.as_ref()))
            .await
            .with_context(|| format!("Failed to list categories for sport {sport_id}"))?;
        list_body(response).context("Failed to parse sport categories")
    }
}
