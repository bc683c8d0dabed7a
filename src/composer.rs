// src/composer.rs
//! Fills a language-specific outreach template with the listing's company,
//! title, and relevance score. Pure, no failure mode.

use crate::types::{Language, Listing};

/// Compose the outreach message for a listing. Unrecognized language tags
/// fall back to Spanish at parse time (see `Language::from_tag`).
pub fn compose(listing: &Listing, score: u8, lang: Language) -> String {
    match lang {
        Language::En => compose_en(listing, score),
        Language::Es => compose_es(listing, score),
    }
}

fn compose_en(listing: &Listing, score: u8) -> String {
    format!(
        "Dear {company} Hiring Team,\n\n\
         My name is Juan Manuel Ramírez, and I am writing to express my strong interest in the **{title}** position.\n\n\
         With a **{score}% match** to my profile, I am confident my background as a Strategic Program Manager with over 10 years of experience in cloud initiatives (AWS/GCP) and Agile transformations aligns perfectly with your requirements.\n\n\
         I am eager to discuss how I can contribute to your goals. Thank you for your consideration.\n\n\
         Best regards,\nJuan Manuel Ramírez Sosa",
        company = listing.company,
        title = listing.title,
        score = score,
    )
}

fn compose_es(listing: &Listing, score: u8) -> String {
    format!(
        "Hola equipo de reclutamiento de {company},\n\n\
         Mi nombre es Juan Manuel Ramírez y me dirijo a ustedes para expresar mi gran interés en la posición de **{title}**.\n\n\
         Con un **{score}% de compatibilidad** con mi perfil, confío en que mi trayectoria como Program Manager estratégico, con más de 10 años de experiencia en iniciativas cloud (AWS/GCP) y transformaciones ágiles, se alinea con sus requerimientos.\n\n\
         Me encantaría platicar sobre cómo puedo contribuir a sus objetivos. Gracias por su consideración.\n\n\
         Saludos cordiales,\nJuan Manuel Ramírez Sosa",
        company = listing.company,
        title = listing.title,
        score = score,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(lang: Language) -> Listing {
        Listing::new(
            "Cloud Program Manager".to_string(),
            "Acme".to_string(),
            "https://example.com/jobs/1".to_string(),
            lang,
        )
    }

    #[test]
    fn test_english_template_substitution() {
        let message = compose(&listing(Language::En), 87, Language::En);
        assert!(message.starts_with("Dear Acme Hiring Team,"));
        assert!(message.contains("**Cloud Program Manager**"));
        assert!(message.contains("**87% match**"));
    }

    #[test]
    fn test_spanish_template_substitution() {
        let message = compose(&listing(Language::Es), 42, Language::Es);
        assert!(message.starts_with("Hola equipo de reclutamiento de Acme,"));
        assert!(message.contains("**Cloud Program Manager**"));
        assert!(message.contains("**42% de compatibilidad**"));
    }

    #[test]
    fn test_absent_fields_substitute_empty() {
        let mut empty = listing(Language::En);
        empty.title = String::new();
        empty.company = String::new();

        let message = compose(&empty, 0, Language::En);
        assert!(message.starts_with("Dear  Hiring Team,"));
        assert!(message.contains("**0% match**"));
    }
}
