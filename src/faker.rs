//! Fake text, template rendering and file naming.

use crate::error::{AppError, AppResult};
use chrono::{Duration, NaiveDate};
use fake::faker::address::en::{BuildingNumber, CityName, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::distributions::{Alphanumeric, Distribution};
use rand::Rng;
use std::path::Path;

/// Prefix used for random file names when the caller gives none.
pub const DEFAULT_PREFIX: &str = "tmp";

/// Tokens understood inside `{{ }}` placeholders.
pub const TEMPLATE_TOKENS: &[&str] = &[
    "name",
    "first_name",
    "last_name",
    "email",
    "address",
    "city",
    "street_name",
    "zipcode",
    "company",
    "phone_number",
    "word",
    "sentence",
    "paragraph",
    "text",
    "date",
    "pyint",
];

/// Fake value for a single template token.
pub fn token_value<R: Rng + ?Sized>(token: &str, rng: &mut R) -> AppResult<String> {
    let value = match token {
        "name" => Name().fake_with_rng::<String, R>(rng),
        "first_name" => FirstName().fake_with_rng::<String, R>(rng),
        "last_name" => LastName().fake_with_rng::<String, R>(rng),
        "email" => SafeEmail().fake_with_rng::<String, R>(rng),
        "address" => address(rng),
        "city" => CityName().fake_with_rng::<String, R>(rng),
        "street_name" => StreetName().fake_with_rng::<String, R>(rng),
        "zipcode" => ZipCode().fake_with_rng::<String, R>(rng),
        "company" => CompanyName().fake_with_rng::<String, R>(rng),
        "phone_number" => PhoneNumber().fake_with_rng::<String, R>(rng),
        "word" => Word().fake_with_rng::<String, R>(rng),
        "sentence" => Sentence(4..10).fake_with_rng::<String, R>(rng),
        "paragraph" => Paragraph(3..6).fake_with_rng::<String, R>(rng),
        "text" => text(rng, 200),
        "date" => date(rng),
        "pyint" => rng.gen_range(0..=9999).to_string(),
        other => return Err(AppError::Template(other.to_string())),
    };
    Ok(value)
}

fn address<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{} {}, {} {}",
        BuildingNumber().fake_with_rng::<String, R>(rng),
        StreetName().fake_with_rng::<String, R>(rng),
        CityName().fake_with_rng::<String, R>(rng),
        ZipCode().fake_with_rng::<String, R>(rng),
    )
}

fn date<R: Rng + ?Sized>(rng: &mut R) -> String {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let day = epoch + Duration::days(rng.gen_range(0..20_000));
    day.format("%Y-%m-%d").to_string()
}

/// Upper bound on the text rendered from templates for one request.
pub const MAX_RENDERED_BYTES: usize = 8 * 1024 * 1024;

/// Replace every `{{ token }}` in `template` with a fake value.
///
/// An opening brace pair without a matching close is kept verbatim.
pub fn render_template<R: Rng + ?Sized>(template: &str, rng: &mut R) -> AppResult<String> {
    render_bounded(template, rng, MAX_RENDERED_BYTES)
}

/// [`render_template`], failing once the output grows past `limit` bytes.
pub fn render_bounded<R: Rng + ?Sized>(
    template: &str,
    rng: &mut R,
    limit: usize,
) -> AppResult<String> {
    let mut out = String::with_capacity(template.len().min(limit));
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&token_value(after[..end].trim(), rng)?);
        if out.len() > limit {
            return Err(too_large());
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);

    if out.len() > limit {
        return Err(too_large());
    }
    Ok(out)
}

pub(crate) fn too_large() -> AppError {
    AppError::validation(format!(
        "Generated content exceeds the limit of {} bytes",
        MAX_RENDERED_BYTES
    ))
}

/// Random text no longer than `max_nb_chars` characters.
///
/// Short budgets produce words, longer ones sentences grouped into
/// newline-separated paragraphs.
pub fn text<R: Rng + ?Sized>(rng: &mut R, max_nb_chars: usize) -> String {
    if max_nb_chars == 0 {
        return String::new();
    }

    if max_nb_chars < 5 {
        let word: String = Word().fake_with_rng(rng);
        return word.chars().take(max_nb_chars).collect();
    }

    let mut out = String::new();
    let mut len = 0;
    let mut in_paragraph = 0;
    let mut paragraph_size = rng.gen_range(3..7);

    loop {
        let sentence: String = Sentence(4..12).fake_with_rng(rng);
        let sentence_len = sentence.chars().count();
        let separator = if out.is_empty() { 0 } else { 1 };

        if len + separator + sentence_len > max_nb_chars {
            if out.is_empty() {
                // Budget smaller than one sentence: trim it and close it.
                let mut trimmed: String =
                    sentence.chars().take(max_nb_chars.saturating_sub(1)).collect();
                trimmed = trimmed.trim_end().to_string();
                trimmed.push('.');
                return trimmed;
            }
            break;
        }

        if separator == 1 {
            if in_paragraph >= paragraph_size {
                out.push('\n');
                in_paragraph = 0;
                paragraph_size = rng.gen_range(3..7);
            } else {
                out.push(' ');
            }
        }
        out.push_str(&sentence);
        len += separator + sentence_len;
        in_paragraph += 1;
    }

    out
}

/// Hard-wrap every line of `text` at `width` characters.
///
/// Words longer than the width are split.
pub fn wrap(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut lines = Vec::new();
    for source_line in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0;

        for word in source_line.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            while chars.len() > width {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                lines.push(chars.drain(..width).collect());
            }
            if chars.is_empty() {
                continue;
            }

            let needed = if line_len == 0 { chars.len() } else { line_len + 1 + chars.len() };
            if needed > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.extend(chars.iter());
            line_len += chars.len();
        }

        lines.push(line);
    }

    lines.join("\n")
}

/// Body text for text-bearing providers: the rendered `content` template
/// when present, random text otherwise, wrapped when asked to.
pub fn body_text<R: Rng + ?Sized>(
    rng: &mut R,
    content: Option<&str>,
    max_nb_chars: usize,
    wrap_chars_after: Option<usize>,
) -> AppResult<String> {
    let raw = match content {
        Some(template) => render_template(template, rng)?,
        None => text(rng, max_nb_chars),
    };

    Ok(match wrap_chars_after {
        Some(width) => wrap(&raw, width),
        None => raw,
    })
}

/// Name of a generated file.
///
/// `basename.extension` when a basename is given, otherwise the prefix
/// followed by eight random alphanumerics. Characters that cannot travel in
/// a `Content-Disposition` header are replaced by `_`.
pub fn file_name<R: Rng + ?Sized>(
    rng: &mut R,
    basename: Option<&str>,
    prefix: Option<&str>,
    extension: &str,
) -> String {
    let stem = match basename {
        Some(basename) => basename.to_string(),
        None => {
            let random: String = (0..8)
                .map(|_| char::from(Alphanumeric.sample(&mut *rng)))
                .collect();
            format!("{}{}", prefix.unwrap_or(DEFAULT_PREFIX), random)
        }
    };

    let name = format!("{}.{}", stem, extension);
    let name = Path::new(&name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&name)
        .to_string();

    name.chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != ';' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_text_respects_budget() {
        let mut rng = rng();
        for budget in [1, 4, 5, 20, 99, 100, 1000, 10_000] {
            let text = text(&mut rng, budget);
            assert!(!text.is_empty(), "budget {}", budget);
            assert!(text.chars().count() <= budget, "budget {}", budget);
        }
    }

    #[test]
    fn test_text_zero_budget() {
        assert_eq!(text(&mut rng(), 0), "");
    }

    #[test]
    fn test_wrap_limits_line_width() {
        let wrapped = wrap("the quick brown fox jumps over the lazy dog", 10);
        for line in wrapped.lines() {
            assert!(line.chars().count() <= 10, "line {:?}", line);
        }
        assert_eq!(wrapped.lines().next(), Some("the quick"));
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij", 4), "abcd\nefgh\nij");
    }

    #[test]
    fn test_wrap_keeps_paragraph_breaks() {
        assert_eq!(wrap("one two\nthree", 20), "one two\nthree");
    }

    #[test]
    fn test_render_template_replaces_tokens() {
        let mut rng = rng();
        let rendered = render_template("Dear {{ name }}, call {{phone_number}}.", &mut rng).unwrap();
        assert!(rendered.starts_with("Dear "));
        assert!(!rendered.contains("{{"));
        assert!(rendered.ends_with('.'));
    }

    #[test]
    fn test_render_template_unknown_token() {
        let err = render_template("{{unicorn}}", &mut rng()).unwrap_err();
        assert_eq!(err.kind(), "TemplateError");
    }

    #[test]
    fn test_render_bounded_stops_at_limit() {
        let template = "{{paragraph}}".repeat(50);
        let err = render_bounded(&template, &mut rng(), 200).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
        assert!(render_bounded("{{word}}", &mut rng(), 200).is_ok());
    }

    #[test]
    fn test_render_bounded_counts_literal_text() {
        assert!(render_bounded(&"x".repeat(300), &mut rng(), 200).is_err());
    }

    #[test]
    fn test_render_template_unclosed_braces_kept() {
        let rendered = render_template("left {{ open", &mut rng()).unwrap();
        assert_eq!(rendered, "left {{ open");
    }

    #[test]
    fn test_every_listed_token_renders() {
        let mut rng = rng();
        for token in TEMPLATE_TOKENS {
            let value = token_value(token, &mut rng).unwrap();
            assert!(!value.is_empty(), "token {}", token);
        }
    }

    #[test]
    fn test_file_name_with_basename() {
        assert_eq!(file_name(&mut rng(), Some("report"), Some("x"), "pdf"), "report.pdf");
    }

    #[test]
    fn test_file_name_random_stem() {
        let name = file_name(&mut rng(), None, None, "txt");
        assert!(name.starts_with(DEFAULT_PREFIX));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), DEFAULT_PREFIX.len() + 8 + 4);

        let prefixed = file_name(&mut rng(), None, Some("invoice_"), "csv");
        assert!(prefixed.starts_with("invoice_"));
    }

    #[test]
    fn test_file_name_sanitizes_header_characters() {
        let name = file_name(&mut rng(), Some("my report;\"x\""), None, "txt");
        assert_eq!(name, "my_report__x_.txt");
    }
}
