//! Terminal rendering of the chat log.

use colored::{Color, Colorize};
use lingua_application::summarize_action_label;
use lingua_core::config::LanguagesConfig;
use lingua_core::message::{Message, Translation};

/// Colors for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub user: Color,
    pub system: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                user: Color::BrightGreen,
                system: Color::BrightBlue,
                accent: Color::BrightMagenta,
                muted: Color::BrightBlack,
                error: Color::BrightRed,
            }
        } else {
            Self {
                user: Color::Green,
                system: Color::Blue,
                accent: Color::Magenta,
                muted: Color::Black,
                error: Color::Red,
            }
        }
    }
}

pub fn render_message(
    message: &Message,
    palette: &Palette,
    languages: &LanguagesConfig,
) -> Vec<String> {
    let mut lines = Vec::new();

    let (role, color) = if message.is_user {
        ("you", palette.user)
    } else {
        ("lingua", palette.system)
    };
    let header = format!("[{}] {}", message.id, role).color(palette.muted);
    let body = if message.is_placeholder() {
        message.text.italic().color(palette.muted)
    } else {
        message.text.color(color)
    };
    lines.push(format!("{} {}", header, body));

    for translation in &message.translations {
        lines.push(match translation {
            Translation::Success { language, text } => format!(
                "    {} {}",
                format!("{}:", languages.name_of(language)).color(palette.accent),
                text
            ),
            Translation::Error { text, error_id } => format!(
                "    {} {}",
                format!("Translation failed: {}", text).color(palette.error),
                format!("(/dismiss {} {})", message.id, error_id).color(palette.muted)
            ),
        });
    }

    if let Some(summary) = &message.summary {
        lines.push(format!("    {}", "Summary:".color(palette.accent).bold()));
        for line in summary.lines() {
            lines.push(format!("      {}", line));
        }
    }
    if let Some(error) = &message.summary_error {
        lines.push(format!("    {}", error.color(palette.error)));
    }

    if message.can_summarize() {
        lines.push(format!(
            "    {}",
            format!("/summarize {} ({})", message.id, summarize_action_label(message))
                .color(palette.muted)
        ));
    }
    if message.can_translate() {
        lines.push(format!(
            "    {}",
            format!("/translate {} <language>", message.id).color(palette.muted)
        ));
    }

    lines
}

pub fn render_languages(languages: &LanguagesConfig, palette: &Palette) -> Vec<String> {
    languages
        .targets
        .iter()
        .map(|target| {
            format!(
                "  {} {}",
                format!("{:<6}", target.code).color(palette.accent),
                target.name
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(message: &Message, dark: bool) -> String {
        colored::control::set_override(false);
        render_message(message, &Palette::for_mode(dark), &LanguagesConfig::default()).join("\n")
    }

    #[test]
    fn test_detection_result_with_translations() {
        let mut message = Message::detection_result(5, "I'm very confident you're typing in French!", "fr", "Bonjour");
        message.push_translation(Translation::success("es", "Hola"));
        message.push_translation(Translation::error("Service down", "error-1"));

        let text = render(&message, false);
        assert!(text.contains("[5] lingua I'm very confident you're typing in French!"));
        assert!(text.contains("Spanish: Hola"));
        assert!(text.contains("Translation failed: Service down (/dismiss 5 error-1)"));
        assert!(text.contains("/translate 5 <language>"));
    }

    #[test]
    fn test_long_english_message_offers_summary() {
        let mut message = Message::user(3, "word ".repeat(40));
        message.is_analyzing = false;
        message.detected_language = Some("en".into());

        let text = render(&message, true);
        assert!(text.contains("/summarize 3 (Summarize)"));
    }
}
