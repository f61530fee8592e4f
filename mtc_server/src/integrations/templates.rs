//! Handlebars templates for the "MAX seat available" email.
//!
//! Values inserted with `{{...}}` are HTML-escaped by the registry. The subject is plain text, so it uses the
//! triple-stash form.
use std::sync::Arc;

use handlebars::{Handlebars, RenderError, TemplateError};
use mtc_engine::ticket_types::Ticket;
use serde::Serialize;

pub const SUBJECT_TEMPLATE: &str = "max-seat-subject";
pub const BODY_TEMPLATE: &str = "max-seat-body";

pub fn register_templates(registry: &mut Handlebars<'_>) -> Result<(), TemplateError> {
    registry.register_template_string(
        SUBJECT_TEMPLATE,
        "Place MAX pour le train n°{{{train_no}}} de {{{origin}}} à {{{destination}}} le {{{date}}} à {{{departure}}}",
    )?;
    registry.register_template_string(
        BODY_TEMPLATE,
        r#"<html>
<body>
    <h1>Nouvelle place MAX pour un train SNCF</h1>
    <p>Voici les détails du train :</p>
    <ul>
        <li><strong>Origine :</strong> {{origin}} ({{origin_iata}})</li>
        <li><strong>Destination :</strong> {{destination}} ({{destination_iata}})</li>
        <li><strong>Numéro du train :</strong> {{train_no}}</li>
        <li><strong>Heure de départ :</strong> {{departure}}</li>
        <li><strong>Heure d'arrivée :</strong> {{arrival}}</li>
        <li><strong>Date :</strong> {{date}}</li>
    </ul>
    <p>Réservez dès maintenant votre billet en cliquant sur le lien suivant :</p>
    <a href="https://www.sncf-connect.com/app/redirect?redirection_type=TRIP_IMPORT" target="_blank">Réservez sur SNCF Connect</a>
    <br><br>
    <p>Si vous n'avez pas encore l'application SNCF Connect, vous pouvez la télécharger ici :</p>
    <ul>
        <li><a href="https://apps.apple.com/fr/app/sncf-connect-trains-trajets/id343889987" target="_blank">Télécharger sur l'App Store</a></li>
        <li><a href="https://play.google.com/store/apps/details?id=com.vsct.vsc.mobile.horaireetresa.android" target="_blank">Télécharger sur Google Play</a></li>
    </ul>
    <p>Merci d'utiliser ce service d'alerte.</p>
    <p>À bientôt !</p>
    <br>
    <pre>Ceci est un email automatique, merci de ne pas y répondre.</pre>
    <hr>
    <p>Vous recevez cet email car vous avez souscrit à une alerte SNCF.</p>
    <p>Vous pouvez vous désinscrire à tout moment en supprimant votre alerte.</p>
</body>
</html>
"#,
    )?;
    Ok(())
}

/// The values the templates can refer to.
#[derive(Debug, Serialize)]
struct TicketContext<'a> {
    origin: &'a str,
    origin_iata: &'a str,
    destination: &'a str,
    destination_iata: &'a str,
    train_no: &'a str,
    departure: String,
    arrival: String,
    date: String,
}

impl<'a> From<&'a Ticket> for TicketContext<'a> {
    fn from(ticket: &'a Ticket) -> Self {
        Self {
            origin: ticket.origin(),
            origin_iata: ticket.origin_iata.as_str(),
            destination: ticket.destination(),
            destination_iata: ticket.destination_iata.as_str(),
            train_no: ticket.train_no.as_str(),
            departure: ticket.departure_time.format("%H:%M").to_string(),
            arrival: ticket.arrival_time.format("%H:%M").to_string(),
            date: ticket.travel_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A registry holding the notification templates, compiled once and shared between clones.
#[derive(Clone)]
pub struct NotificationTemplates {
    registry: Arc<Handlebars<'static>>,
}

impl NotificationTemplates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        register_templates(&mut registry)?;
        Ok(Self { registry: Arc::new(registry) })
    }

    pub fn subject(&self, ticket: &Ticket) -> Result<String, RenderError> {
        self.registry.render(SUBJECT_TEMPLATE, &TicketContext::from(ticket))
    }

    pub fn html_body(&self, ticket: &Ticket) -> Result<String, RenderError> {
        self.registry.render(BODY_TEMPLATE, &TicketContext::from(ticket))
    }
}

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    fn ticket() -> Ticket {
        Ticket {
            origin_iata: "FRPLY".into(),
            destination_iata: "FRLYS".into(),
            origin_name: Some("PARIS (intramuros)".into()),
            destination_name: Some("LYON (intramuros)".into()),
            train_no: "6601".into(),
            travel_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            departure_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(7, 56, 0).unwrap(),
            max_available: true,
        }
    }

    #[test]
    fn subject_line() {
        let templates = NotificationTemplates::new().unwrap();
        assert_eq!(
            templates.subject(&ticket()).unwrap(),
            "Place MAX pour le train n°6601 de PARIS (intramuros) à LYON (intramuros) le 2024-06-01 à 06:00"
        );
        let mut t = ticket();
        t.origin_name = None;
        t.destination_name = Some("L'ISLE-SUR-LA-SORGUE".into());
        // The subject is not HTML, so nothing is escaped
        assert!(templates.subject(&t).unwrap().contains("de FRPLY à L'ISLE-SUR-LA-SORGUE le"));
    }

    #[test]
    fn body_lists_the_trip() {
        let body = NotificationTemplates::new().unwrap().html_body(&ticket()).unwrap();
        assert!(body.contains("<li><strong>Origine :</strong> PARIS (intramuros) (FRPLY)</li>"));
        assert!(body.contains("<li><strong>Numéro du train :</strong> 6601</li>"));
        assert!(body.contains("<li><strong>Heure de départ :</strong> 06:00</li>"));
        assert!(body.contains("<li><strong>Heure d'arrivée :</strong> 07:56</li>"));
        assert!(body.contains("<li><strong>Date :</strong> 2024-06-01</li>"));
        assert!(body.contains("https://www.sncf-connect.com/app/redirect?redirection_type=TRIP_IMPORT"));
    }

    #[test]
    fn body_carries_app_links_and_footer() {
        let body = NotificationTemplates::new().unwrap().html_body(&ticket()).unwrap();
        assert!(body.contains("Télécharger sur l'App Store"));
        assert!(body.contains("https://play.google.com/store/apps/details?id=com.vsct.vsc.mobile.horaireetresa.android"));
        assert!(body.contains("<pre>Ceci est un email automatique, merci de ne pas y répondre.</pre>"));
        assert!(body.contains("en supprimant votre alerte"));
    }

    #[test]
    fn station_names_are_escaped() {
        let mut t = ticket();
        t.destination_name = Some("<b>LYON</b>".into());
        let body = NotificationTemplates::new().unwrap().html_body(&t).unwrap();
        assert!(body.contains("&lt;b&gt;LYON"));
        assert!(!body.contains("<b>LYON"));
    }
}
