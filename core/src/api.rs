//! Endpoint helpers for the SmartDelivery API.
//!
//! Each method maps a domain noun onto a fixed endpoint of [`HttpClient`] and
//! carries no logic beyond building the path. Failures are reported by the
//! client exactly as for a direct `request`.

use serde::Serialize;
use serde_json::Value;

use crate::client::HttpClient;
use crate::error::RequestError;
use crate::request::Request;
use crate::transport::Transport;
use crate::types::{
    ApiStatus, Commande, CommandeFilters, Livreur, ServerNotification, Trajet,
};

#[derive(Debug, Clone)]
pub struct DeliveryApi<T> {
    client: HttpClient<T>,
}

impl<T: Transport> DeliveryApi<T> {
    pub fn new(client: HttpClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient<T> {
        &self.client
    }

    pub async fn status(&self) -> Result<ApiStatus, RequestError> {
        self.client.request_as(&Request::get("/status")).await
    }

    pub async fn statistiques(&self) -> Result<Value, RequestError> {
        self.client.request(&Request::get("/statistiques")).await
    }

    pub async fn livreurs(&self) -> Result<Vec<Livreur>, RequestError> {
        self.client.request_as(&Request::get("/livreurs")).await
    }

    pub async fn livreur(&self, id: &str) -> Result<Livreur, RequestError> {
        self.client
            .request_as(&Request::get(format!("/livreurs/{id}")))
            .await
    }

    pub async fn commandes(&self, filters: &CommandeFilters) -> Result<Vec<Commande>, RequestError> {
        let path = with_query("/commandes", filters)?;
        self.client.request_as(&Request::get(path)).await
    }

    pub async fn commande(&self, id: &str) -> Result<Commande, RequestError> {
        self.client
            .request_as(&Request::get(format!("/commandes/{id}")))
            .await
    }

    pub async fn trajets(&self) -> Result<Vec<Trajet>, RequestError> {
        self.client.request_as(&Request::get("/trajets")).await
    }

    pub async fn trajet_livreur(&self, livreur_id: &str) -> Result<Trajet, RequestError> {
        self.client
            .request_as(&Request::get(format!("/trajets/{livreur_id}")))
            .await
    }

    /// Run an optimisation. The result's shape is defined by the server.
    pub async fn optimiser<P: Serialize + ?Sized>(&self, params: &P) -> Result<Value, RequestError> {
        let request = Request::post("/optimiser").json(params)?;
        self.client.request(&request).await
    }

    pub async fn notifications(
        &self,
        utilisateur_id: &str,
    ) -> Result<Vec<ServerNotification>, RequestError> {
        let path = with_query("/notifications", [("utilisateur_id", utilisateur_id)])?;
        self.client.request_as(&Request::get(path)).await
    }
}

/// Append `query` to `path`, omitting the `?` when there is nothing to add.
fn with_query<Q: Serialize>(path: &str, query: Q) -> Result<String, RequestError> {
    let query =
        serde_urlencoded::to_string(query).map_err(|e| RequestError::Serialization(e.to_string()))?;
    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{path}?{query}"))
    }
}
