use super::types::{ContextMode, SiteContext};
use crate::config::PersonaConfig;
use std::fmt::Write;

const NOT_FOUND: &str = "(not found)";

/// Persona directive placed ahead of the page data in instruction mode.
pub fn instruction_preamble(persona: &PersonaConfig) -> String {
    format!(
        "You are {name}, the {business} website assistant.\n\
         Only answer using the information in the WEBSITE CONTENT below. \
         If the answer isn't on the site, say:\n\"{fallback}\"",
        name = persona.name,
        business = persona.business,
        fallback = persona.fallback_answer,
    )
}

/// Flatten a snapshot into the fixed section template.
///
/// Order is title, current page, links, named sections, body. The body goes
/// last so a length cap cuts it before anything else.
pub fn render_context(context: &SiteContext, mode: ContextMode, persona: &PersonaConfig) -> String {
    let mut out = String::new();

    if mode == ContextMode::Instruction {
        out.push_str(&instruction_preamble(persona));
        out.push_str("\n\n");
    }

    let _ = write!(out, "WEBSITE TITLE:\n{}\n\n", context.title);

    if let Some(location) = &context.location {
        let _ = write!(out, "CURRENT PAGE:\n{location}\n\n");
    }

    out.push_str("WEBSITE LINKS:\n");
    for link in &context.links {
        let _ = writeln!(out, "- {}: {}", link.label, link.destination);
    }
    out.push('\n');

    for section in &context.sections {
        let _ = write!(
            out,
            "{}:\n{}\n\n",
            section.label.to_uppercase(),
            section.text.as_deref().unwrap_or(NOT_FOUND)
        );
    }

    if context.body_is_snippets {
        out.push_str("WEBSITE CONTENT (snippets):\n");
    } else {
        out.push_str("PAGE TEXT:\n");
    }
    out.push_str(&context.body);

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::types::{PageLink, SectionText};

    fn sample() -> SiteContext {
        SiteContext {
            title: "Secure Tax".into(),
            location: None,
            links: vec![PageLink {
                label: "Contact Us".into(),
                destination: "contact.html".into(),
            }],
            sections: vec![
                SectionText {
                    label: "Call Us".into(),
                    text: Some("407-951-6379".into()),
                },
                SectionText {
                    label: "Locations".into(),
                    text: None,
                },
            ],
            body: "We file taxes.".into(),
            body_is_snippets: false,
        }
    }

    #[test]
    fn plain_template_layout() {
        let out = render_context(&sample(), ContextMode::Plain, &PersonaConfig::default());
        assert_eq!(
            out,
            "WEBSITE TITLE:\nSecure Tax\n\n\
             WEBSITE LINKS:\n- Contact Us: contact.html\n\n\
             CALL US:\n407-951-6379\n\n\
             LOCATIONS:\n(not found)\n\n\
             PAGE TEXT:\nWe file taxes."
        );
    }

    #[test]
    fn instruction_mode_prepends_persona_and_fallback() {
        let persona = PersonaConfig::default();
        let out = render_context(&sample(), ContextMode::Instruction, &persona);
        assert!(out.starts_with("You are Hannah, the Secure Tax website assistant."));
        assert!(out.contains(&persona.fallback_answer));
        assert!(out.find("WEBSITE TITLE:").unwrap() > out.find("You are").unwrap());
    }

    #[test]
    fn snippet_header_and_location() {
        let mut ctx = sample();
        ctx.body_is_snippets = true;
        ctx.location = Some("https://securetax.example/".into());
        let out = render_context(&ctx, ContextMode::Plain, &PersonaConfig::default());
        assert!(out.contains("CURRENT PAGE:\nhttps://securetax.example/\n"));
        assert!(out.contains("WEBSITE CONTENT (snippets):\nWe file taxes."));
        assert!(!out.contains("PAGE TEXT:"));
    }
}
