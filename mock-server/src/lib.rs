//! In-memory stand-in for the SmartDelivery backend.
//!
//! Serves the `/api` surface the client consumes, backed by a small seeded
//! dataset. `POST /optimiser` replaces the stored routes with a deterministic
//! round-robin assignment, so `GET /trajets` reflects the last optimisation.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Port the standalone binary binds when `PORT` is unset. Matches the client's
/// default origin.
pub const DEFAULT_PORT: u16 = 5000;

mod seed;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Livreur {
    pub id: String,
    pub nom: String,
    pub latitude_depart: f64,
    pub longitude_depart: f64,
    pub capacite_poids: f64,
    pub capacite_volume: f64,
    pub heure_debut: String,
    pub heure_fin: String,
    pub vitesse_moyenne: f64,
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

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Commande {
    pub id: String,
    pub adresse: String,
    pub latitude: f64,
    pub longitude: f64,
    pub poids: f64,
    pub volume: f64,
    pub fenetre_debut: String,
    pub fenetre_fin: String,
    pub priorite: u8,
    pub temps_service: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_tel: Option<String>,
    #[serde(default = "default_statut")]
    pub statut: String,
}

fn default_statut() -> String {
    "en_attente".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Trajet {
    pub livreur_id: String,
    pub commandes: Vec<String>,
    pub ordre_livraison: Vec<usize>,
    pub distance_totale: f64,
    pub temps_total: u32,
    pub cout_total: f64,
    pub heure_depart: String,
    pub heure_retour_estimee: String,
    pub points_gps: Vec<(f64, f64)>,
    pub statut: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub destinataire_id: String,
    pub lu: bool,
}

#[derive(Debug, Default)]
pub struct Data {
    pub livreurs: Vec<Livreur>,
    pub commandes: Vec<Commande>,
    pub trajets: Vec<Trajet>,
    pub notifications: Vec<Notification>,
}

pub type Db = Arc<RwLock<Data>>;

#[derive(Deserialize)]
pub struct CommandeQuery {
    pub statut: Option<String>,
    pub priorite: Option<u8>,
}

#[derive(Deserialize)]
pub struct NotificationQuery {
    pub utilisateur_id: String,
}

#[derive(Deserialize)]
pub struct OptimisationRequest {
    pub scenario: Option<String>,
    pub nb_livreurs: Option<usize>,
    pub nb_commandes: Option<usize>,
    pub livreurs: Option<Vec<Livreur>>,
    pub commandes: Option<Vec<Commande>>,
}

/// Router seeded with the sample dataset.
pub fn app() -> Router {
    app_with(seed::data())
}

pub fn app_with(mut data: Data) -> Router {
    if data.trajets.is_empty() {
        let active: Vec<Commande> = data
            .commandes
            .iter()
            .filter(|c| c.statut != "livree")
            .cloned()
            .collect();
        data.trajets = assign(&data.livreurs, &active).trajets;
    }
    let db: Db = Arc::new(RwLock::new(data));

    let api = Router::new()
        .route("/status", get(status))
        .route("/statistiques", get(statistiques))
        .route("/livreurs", get(list_livreurs))
        .route("/livreurs/{id}", get(get_livreur))
        .route("/commandes", get(list_commandes))
        .route("/commandes/{id}", get(get_commande))
        .route("/trajets", get(list_trajets))
        .route("/trajets/{livreur_id}", get(get_trajet))
        .route("/optimiser", post(optimiser))
        .route("/notifications", get(list_notifications))
        .with_state(db);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!("mock SmartDelivery API listening on {addr}");
    }
    axum::serve(listener, app()).await
}

async fn status() -> Json<Value> {
    Json(json!({"status": "OK", "service": "SmartDelivery API"}))
}

async fn statistiques(State(db): State<Db>) -> Json<Value> {
    let data = db.read().await;

    let mut par_statut: BTreeMap<&str, usize> = BTreeMap::new();
    for commande in &data.commandes {
        *par_statut.entry(commande.statut.as_str()).or_default() += 1;
    }
    let distance: f64 = data.trajets.iter().map(|t| t.distance_totale).sum();
    let cout: f64 = data.trajets.iter().map(|t| t.cout_total).sum();

    Json(json!({
        "nb_livreurs": data.livreurs.len(),
        "nb_livreurs_disponibles": data.livreurs.iter().filter(|l| l.disponible).count(),
        "nb_commandes": data.commandes.len(),
        "commandes_par_statut": par_statut,
        "nb_trajets": data.trajets.len(),
        "distance_totale": round2(distance),
        "cout_total": round2(cout),
    }))
}

async fn list_livreurs(State(db): State<Db>) -> Json<Vec<Livreur>> {
    Json(db.read().await.livreurs.clone())
}

async fn get_livreur(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Livreur>, StatusCode> {
    let data = db.read().await;
    data.livreurs
        .iter()
        .find(|l| l.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_commandes(
    State(db): State<Db>,
    Query(query): Query<CommandeQuery>,
) -> Json<Vec<Commande>> {
    let data = db.read().await;
    let commandes = data
        .commandes
        .iter()
        .filter(|c| query.statut.as_ref().map_or(true, |s| &c.statut == s))
        .filter(|c| query.priorite.map_or(true, |p| c.priorite == p))
        .cloned()
        .collect();
    Json(commandes)
}

async fn get_commande(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Commande>, StatusCode> {
    let data = db.read().await;
    data.commandes
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_trajets(State(db): State<Db>) -> Json<Vec<Trajet>> {
    Json(db.read().await.trajets.clone())
}

async fn get_trajet(
    State(db): State<Db>,
    Path(livreur_id): Path<String>,
) -> Result<Json<Trajet>, StatusCode> {
    let data = db.read().await;
    data.trajets
        .iter()
        .find(|t| t.livreur_id == livreur_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_notifications(
    State(db): State<Db>,
    Query(query): Query<NotificationQuery>,
) -> Json<Vec<Notification>> {
    let data = db.read().await;
    let mut notifications: Vec<Notification> = data
        .notifications
        .iter()
        .filter(|n| n.destinataire_id == query.utilisateur_id)
        .cloned()
        .collect();
    // Newest first.
    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Json(notifications)
}

async fn optimiser(
    State(db): State<Db>,
    Json(input): Json<OptimisationRequest>,
) -> (StatusCode, Json<Value>) {
    let (livreurs, commandes) = if input.scenario.is_some() {
        let data = db.read().await;
        let nb_livreurs = input.nb_livreurs.unwrap_or(5);
        let nb_commandes = input.nb_commandes.unwrap_or(20);
        (
            data.livreurs.iter().take(nb_livreurs).cloned().collect(),
            data.commandes.iter().take(nb_commandes).cloned().collect(),
        )
    } else {
        match (input.livreurs, input.commandes) {
            (Some(livreurs), Some(commandes)) if !livreurs.is_empty() && !commandes.is_empty() => {
                (livreurs, commandes)
            }
            _ => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"success": false, "error": "livreurs & commandes manquants"})),
                )
            }
        }
    };

    let result = assign(&livreurs, &commandes);
    let affectations: BTreeMap<&str, Vec<&Commande>> = result
        .affectations
        .iter()
        .map(|(id, cmds)| (id.as_str(), cmds.iter().collect()))
        .collect();
    let body = json!({
        "success": true,
        "message": "Optimisation réussie",
        "nb_trajets": result.trajets.len(),
        "score": round2(result.trajets.iter().map(|t| t.cout_total).sum()),
        "affectations": affectations,
        "trajets_optimises": result.trajets,
        "non_affectees": result.non_affectees,
    });

    db.write().await.trajets = result.trajets;
    (StatusCode::OK, Json(body))
}

struct Assignment {
    affectations: BTreeMap<String, Vec<Commande>>,
    trajets: Vec<Trajet>,
    non_affectees: Vec<Commande>,
}

/// Deal orders round-robin over available drivers, urgent ones first,
/// skipping any driver whose weight capacity would be exceeded.
fn assign(livreurs: &[Livreur], commandes: &[Commande]) -> Assignment {
    let disponibles: Vec<&Livreur> = livreurs.iter().filter(|l| l.disponible).collect();
    let mut sorted: Vec<&Commande> = commandes.iter().collect();
    sorted.sort_by_key(|c| c.priorite);

    let mut affectations: BTreeMap<String, Vec<Commande>> = BTreeMap::new();
    let mut charges = vec![0.0_f64; disponibles.len()];
    let mut non_affectees = Vec::new();
    let mut next = 0;

    for commande in sorted {
        let slot = (0..disponibles.len())
            .map(|offset| (next + offset) % disponibles.len())
            .find(|&i| charges[i] + commande.poids <= disponibles[i].capacite_poids);
        match slot {
            Some(i) => {
                charges[i] += commande.poids;
                affectations
                    .entry(disponibles[i].id.clone())
                    .or_default()
                    .push(commande.clone());
                next = (i + 1) % disponibles.len();
            }
            None => non_affectees.push(commande.clone()),
        }
    }

    let trajets = disponibles
        .iter()
        .filter_map(|l| affectations.get(&l.id).map(|cmds| route(l, cmds)))
        .collect();

    Assignment {
        affectations,
        trajets,
        non_affectees,
    }
}

fn route(livreur: &Livreur, commandes: &[Commande]) -> Trajet {
    let depot = (livreur.latitude_depart, livreur.longitude_depart);
    let mut points = vec![depot];
    points.extend(commandes.iter().map(|c| (c.latitude, c.longitude)));
    points.push(depot);

    let distance: f64 = points.windows(2).map(|w| haversine_km(w[0], w[1])).sum();
    let service: u32 = commandes.iter().map(|c| c.temps_service).sum();
    let driving = if livreur.vitesse_moyenne > 0.0 {
        (distance / livreur.vitesse_moyenne * 60.0).round() as u32
    } else {
        0
    };
    let temps_total = driving + service;

    Trajet {
        livreur_id: livreur.id.clone(),
        commandes: commandes.iter().map(|c| c.id.clone()).collect(),
        ordre_livraison: (0..commandes.len()).collect(),
        distance_totale: round2(distance),
        temps_total,
        cout_total: round2(distance * livreur.cout_km),
        heure_depart: livreur.heure_debut.clone(),
        heure_retour_estimee: add_minutes(&livreur.heure_debut, temps_total),
        points_gps: points,
        statut: "planifie".to_string(),
    }
}

fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

fn add_minutes(hhmm: &str, minutes: u32) -> String {
    let (h, m) = hhmm.split_once(':').unwrap_or(("8", "0"));
    let start = h.parse::<u32>().unwrap_or(8) * 60 + m.parse::<u32>().unwrap_or(0);
    let end = (start + minutes) % (24 * 60);
    format!("{:02}:{:02}", end / 60, end % 60)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
