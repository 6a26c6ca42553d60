//! Fixed report text and brand styling.

use crate::types::TrafficLight;

// Brand colours (hex RGB, no '#')
pub const BRAND_BLUE: &str = "0C2AAD";
pub const BRAND_LIGHT_BLUE: &str = "4272AB";
pub const BRAND_BLUE_SOFT: &str = "708DB8";
pub const COLOR_GREEN: &str = "16A34A";
pub const COLOR_ORANGE: &str = "EA580C";
pub const COLOR_RED: &str = "DC2626";
pub const COLOR_GRAY: &str = "64748B";
pub const COLOR_DARK: &str = "1A1A2E";
pub const COLOR_RULE: &str = "CBD6E5";

pub const CONTACT_EMAIL: &str = "data.team@samhoud.com";

pub fn status_color(status: TrafficLight) -> &'static str {
    match status {
        TrafficLight::Green => COLOR_GREEN,
        TrafficLight::Orange => COLOR_ORANGE,
        TrafficLight::Red => COLOR_RED,
    }
}

pub fn status_label(status: TrafficLight) -> &'static str {
    match status {
        TrafficLight::Green => "GROEN — Veilig te gebruiken",
        TrafficLight::Orange => "ORANJE — Nader onderzoek nodig",
        TrafficLight::Red => "ROOD — Niet gebruiken zonder waarborgen",
    }
}

/// Single-character status marker
pub fn status_marker(status: TrafficLight) -> &'static str {
    match status {
        TrafficLight::Green => "V",
        TrafficLight::Orange => "!",
        TrafficLight::Red => "X",
    }
}

/// Legend rows: (status, label, meaning)
pub const LEGEND: [(TrafficLight, &str, &str); 3] = [
    (
        TrafficLight::Green,
        "GROEN",
        "De tool voldoet op dit punt aan de AVG-vereisten.",
    ),
    (
        TrafficLight::Orange,
        "ORANJE",
        "Er zijn aandachtspunten of er kon onvoldoende informatie gevonden worden.",
    ),
    (
        TrafficLight::Red,
        "ROOD",
        "Er zijn serieuze risico's gevonden die actie vereisen.",
    ),
];

/// "Why this matters" text for the known categories
pub fn category_education(category: &str) -> Option<&'static str> {
    match category {
        "Dataopslag & Verwerking" => Some(
            "Waar je data staat bepaalt welke wetten van toepassing zijn. \
             Data buiten de EU valt niet automatisch onder de bescherming van de AVG. \
             Dat betekent dat persoonsgegevens mogelijk minder goed beschermd zijn. \
             Ook sub-verwerkers (bedrijven die namens de tool data verwerken) spelen een rol: \
             als een sub-verwerker data in de VS verwerkt, is dat een risicofactor.",
        ),
        "Datarechten (AVG)" => Some(
            "De AVG geeft iedereen rechten over hun eigen data: het recht op inzage, \
             correctie, verwijdering (recht op vergetelheid), en dataportabiliteit. \
             Als een tool deze rechten niet ondersteunt, is het juridisch risicovol \
             om er persoonsgegevens in te verwerken. Let ook op of data gebruikt \
             wordt voor het trainen van AI-modellen, dit vereist expliciete toestemming.",
        ),
        "Beveiliging" => Some(
            "Goede beveiliging is de basis van privacy. Zonder encryptie, certificeringen \
             en een plan voor datalekken zijn persoonsgegevens kwetsbaar. Een datalek kan \
             leiden tot boetes tot 4% van de jaaromzet. Zoek naar ISO 27001 en SOC 2 \
             certificeringen: dit zijn internationale standaarden die aantonen dat een \
             organisatie beveiliging serieus neemt.",
        ),
        _ => None,
    }
}

const GREEN_RECOMMENDATIONS: &[&str] = &[
    "Lees de verwerkersovereenkomst (DPA) door voordat je de tool inzet voor persoonsgegevens.",
    "Documenteer in je verwerkingsregister welke persoonsgegevens je met deze tool verwerkt.",
    "Herhaal deze check periodiek, omdat tools hun beleid kunnen wijzigen.",
];

const ORANGE_RECOMMENDATIONS: &[&str] = &[
    "Neem contact op met de leverancier om de openstaande vragen te beantwoorden.",
    "Schakel je Functionaris Gegevensbescherming (FG) in voor een definitieve beoordeling.",
    "Overweeg een Data Protection Impact Assessment (DPIA) uit te voeren.",
    "Gebruik de tool voorlopig niet voor gevoelige persoonsgegevens tot de onduidelijkheden zijn opgelost.",
    "Documenteer de risico's en genomen maatregelen in je verwerkingsregister.",
];

const RED_RECOMMENDATIONS: &[&str] = &[
    "Gebruik deze tool NIET voor het verwerken van persoonsgegevens zonder aanvullende maatregelen.",
    "Schakel juridisch advies in en overleg met je Functionaris Gegevensbescherming (FG).",
    "Voer een Data Protection Impact Assessment (DPIA) uit.",
    "Onderzoek alternatieven die beter aan de AVG-vereisten voldoen.",
    "Als de tool onmisbaar is, bespreek met de leverancier welke aanpassingen mogelijk zijn.",
];

pub fn recommendations(status: TrafficLight) -> &'static [&'static str] {
    match status {
        TrafficLight::Green => GREEN_RECOMMENDATIONS,
        TrafficLight::Orange => ORANGE_RECOMMENDATIONS,
        TrafficLight::Red => RED_RECOMMENDATIONS,
    }
}

pub fn summary_intro(tool_name: &str) -> String {
    format!(
        "Dit rapport bevat de resultaten van een geautomatiseerde AVG/GDPR compliance \
         check van {tool_name}. De analyse is gebaseerd op publiek beschikbare \
         informatie zoals de privacy policy, security documentatie en sub-verwerkerlijsten. \
         Per categorie is een stoplicht-oordeel gegeven."
    )
}

pub fn sub_processor_intro(tool_name: &str) -> String {
    format!(
        "{tool_name} maakt gebruik van andere bedrijven (sub-verwerkers) \
         om data te verwerken of op te slaan. De veiligheid van je data is zo sterk \
         als de zwakste schakel in deze keten. Als een sub-verwerker data buiten de EU \
         verwerkt, heeft dit gevolgen voor de AVG-compliance."
    )
}

pub const CALL_TO_ACTION: &str = "Hulp nodig bij het implementeren van deze aanbevelingen? \
    Het Data & AI team van &samhoud helpt je graag. \
    Neem contact op via data.team@samhoud.com";

pub const SOURCES_INTRO: &str = "De volgende bronnen zijn geraadpleegd tijdens deze analyse:";

pub const EXTRA_DISCLAIMER: &str = "Deze analyse is gebaseerd op publiek beschikbare informatie \
    op het moment van de check. Tools kunnen hun beleid, documentatie en technische \
    implementatie wijzigen. Het is aan te raden om deze check periodiek te herhalen en de \
    uitkomsten te bespreken met een Functionaris Gegevensbescherming (FG) of juridisch adviseur.";

pub const TAGLINE: &str = "Together we build a brighter future";

const MONTHS: [&str; 12] = [
    "januari", "februari", "maart", "april", "mei", "juni", "juli", "augustus", "september",
    "oktober", "november", "december",
];

/// `19 oktober 2026 om 14:05`
pub fn format_generated_at(at: chrono::NaiveDateTime) -> String {
    use chrono::{Datelike, Timelike};
    format!(
        "{} {} {} om {:02}:{:02}",
        at.day(),
        MONTHS[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute()
    )
}
