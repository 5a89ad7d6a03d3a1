//! Domain DTOs for the SmartDelivery API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently of
//! the mock-server crate; integration tests catch schema drift between the
//! two. Responses whose shape is computed server-side (`/statistiques`,
//! `/optimiser`) are left as `serde_json::Value`.

use serde::{Deserialize, Serialize};

/// Response of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub status: String,
    pub service: String,
}

/// A delivery driver and their capacities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Livreur {
    pub id: String,
    pub nom: String,
    pub latitude_depart: f64,
    pub longitude_depart: f64,
    /// kg
    pub capacite_poids: f64,
    /// m³
    pub capacite_volume: f64,
    /// `HH:MM`
    pub heure_debut: String,
    pub heure_fin: String,
    /// km/h
    pub vitesse_moyenne: f64,
    /// €/km
    pub cout_km: f64,
    #[serde(default = "default_true")]
    pub disponible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatutCommande {
    #[default]
    EnAttente,
    Assignee,
    EnCours,
    Livree,
}

impl StatutCommande {
    pub fn as_str(self) -> &'static str {
        match self {
            StatutCommande::EnAttente => "en_attente",
            StatutCommande::Assignee => "assignee",
            StatutCommande::EnCours => "en_cours",
            StatutCommande::Livree => "livree",
        }
    }
}

/// An order to deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commande {
    pub id: String,
    pub adresse: String,
    pub latitude: f64,
    pub longitude: f64,
    pub poids: f64,
    pub volume: f64,
    pub fenetre_debut: String,
    pub fenetre_fin: String,
    /// 1 = urgent, 2 = normal, 3 = flexible.
    pub priorite: u8,
    /// Minutes spent unloading.
    pub temps_service: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_tel: Option<String>,
    #[serde(default)]
    pub statut: StatutCommande,
}

/// The optimized route of one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajet {
    pub livreur_id: String,
    pub commandes: Vec<String>,
    pub ordre_livraison: Vec<usize>,
    /// km
    pub distance_totale: f64,
    /// minutes
    pub temps_total: u32,
    pub cout_total: f64,
    pub heure_depart: String,
    pub heure_retour_estimee: String,
    #[serde(default)]
    pub points_gps: Vec<(f64, f64)>,
    #[serde(default = "default_statut_trajet")]
    pub statut: String,
}

fn default_statut_trajet() -> String {
    "planifie".to_string()
}

/// A notification stored server-side for a user, as listed by
/// `GET /notifications`. Unrelated to the client-side toasts of
/// [`Notifier`](crate::notifier::Notifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerNotification {
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub destinataire_id: String,
    #[serde(default)]
    pub lu: bool,
}

/// Query filters for `GET /commandes`. Unset fields are left out of the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandeFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statut: Option<StatutCommande>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorite: Option<u8>,
}

/// Parameters for `POST /optimiser`: either a generated `scenario` or
/// explicit `livreurs` and `commandes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimisationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_livreurs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_commandes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub livreurs: Option<Vec<Livreur>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commandes: Option<Vec<Commande>>,
}

impl OptimisationParams {
    pub fn scenario(name: impl Into<String>, nb_livreurs: u32, nb_commandes: u32) -> Self {
        Self {
            scenario: Some(name.into()),
            nb_livreurs: Some(nb_livreurs),
            nb_commandes: Some(nb_commandes),
            ..Self::default()
        }
    }

    pub fn explicit(livreurs: Vec<Livreur>, commandes: Vec<Commande>) -> Self {
        Self {
            livreurs: Some(livreurs),
            commandes: Some(commandes),
            ..Self::default()
        }
    }
}
