//! Sample dataset served by [`app`](crate::app).

use crate::{Commande, Data, Livreur, Notification};

pub fn data() -> Data {
    Data {
        livreurs: livreurs(),
        commandes: commandes(),
        trajets: Vec::new(),
        notifications: notifications(),
    }
}

fn livreur(id: &str, nom: &str, depart: (f64, f64), capacite_poids: f64, disponible: bool) -> Livreur {
    Livreur {
        id: id.to_string(),
        nom: nom.to_string(),
        latitude_depart: depart.0,
        longitude_depart: depart.1,
        capacite_poids,
        capacite_volume: 12.0,
        heure_debut: "08:00".to_string(),
        heure_fin: "18:00".to_string(),
        vitesse_moyenne: 30.0,
        cout_km: 0.45,
        disponible,
        telephone: None,
        email: Some(format!("{}@smartdelivery.example", id.to_lowercase())),
    }
}

fn livreurs() -> Vec<Livreur> {
    vec![
        livreur("L001", "Alice Martin", (48.8566, 2.3522), 500.0, true),
        livreur("L002", "Bruno Petit", (48.8738, 2.2950), 350.0, true),
        livreur("L003", "Chloé Durand", (48.8412, 2.3876), 800.0, true),
        livreur("L004", "David Moreau", (48.8606, 2.3376), 400.0, false),
    ]
}

#[allow(clippy::too_many_arguments)]
fn commande(
    id: &str,
    adresse: &str,
    position: (f64, f64),
    poids: f64,
    fenetre: (&str, &str),
    priorite: u8,
    client_nom: &str,
    statut: &str,
) -> Commande {
    Commande {
        id: id.to_string(),
        adresse: adresse.to_string(),
        latitude: position.0,
        longitude: position.1,
        poids,
        volume: poids / 100.0,
        fenetre_debut: fenetre.0.to_string(),
        fenetre_fin: fenetre.1.to_string(),
        priorite,
        temps_service: 5,
        client_nom: Some(client_nom.to_string()),
        client_tel: None,
        statut: statut.to_string(),
    }
}

fn commandes() -> Vec<Commande> {
    vec![
        commande("C001", "12 rue de Rivoli, Paris", (48.8556, 2.3601), 12.5, ("09:00", "11:00"), 1, "Emma Leroy", "en_attente"),
        commande("C002", "3 avenue de l'Opéra, Paris", (48.8663, 2.3335), 4.0, ("10:00", "12:00"), 2, "Hugo Roux", "en_attente"),
        commande("C003", "48 boulevard Voltaire, Paris", (48.8610, 2.3740), 25.0, ("08:30", "10:30"), 1, "Léa Fournier", "assignee"),
        commande("C004", "7 rue Oberkampf, Paris", (48.8648, 2.3760), 8.2, ("13:00", "15:00"), 3, "Nathan Girard", "en_attente"),
        commande("C005", "90 rue de Vaugirard, Paris", (48.8462, 2.3210), 15.0, ("14:00", "16:00"), 2, "Manon Bonnet", "en_cours"),
        commande("C006", "21 quai de la Tournelle, Paris", (48.8505, 2.3548), 2.3, ("09:30", "10:30"), 1, "Louis Lambert", "en_attente"),
        commande("C007", "5 place de la Bastille, Paris", (48.8532, 2.3692), 30.0, ("15:00", "17:00"), 3, "Jade Fontaine", "livree"),
        commande("C008", "64 rue du Faubourg Saint-Antoine, Paris", (48.8513, 2.3763), 6.7, ("11:00", "13:00"), 2, "Gabriel Chevalier", "en_attente"),
    ]
}

fn notification(id: &str, timestamp: &str, kind: &str, message: &str, destinataire_id: &str, lu: bool) -> Notification {
    Notification {
        id: id.to_string(),
        timestamp: timestamp.to_string(),
        kind: kind.to_string(),
        message: message.to_string(),
        destinataire_id: destinataire_id.to_string(),
        lu,
    }
}

fn notifications() -> Vec<Notification> {
    vec![
        notification("NOTIF000001", "2024-05-02T07:45:00", "affectation", "Vous avez 3 commande(s) assignée(s): C001, C006, C002", "L001", true),
        notification("NOTIF000002", "2024-05-02T08:00:00", "depart", "Départ prévu à 08:00", "L001", false),
        notification("NOTIF000003", "2024-05-02T09:12:00", "retard", "Retard de 15 min pour commande C003", "L002", false),
        notification("NOTIF000004", "2024-05-02T10:05:00", "livraison", "Livraison C006 effectuée à 10:05", "L001", false),
    ]
}
