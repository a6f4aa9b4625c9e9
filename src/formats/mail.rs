//! RFC 5322 messages with MIME attachments.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};

const LINE: usize = 76;

pub struct Attachment {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub struct Message {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: DateTime<Utc>,
    pub message_id: String,
    pub boundary: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

/// Bytes of UTF-8 per encoded-word; 45 bytes encode to 60 base64
/// characters, keeping each word within 75 characters.
const ENCODED_WORD_BYTES: usize = 45;

/// RFC 2047 encoded-words for non-ASCII header values, folded one word
/// per line.
fn header_value(value: &str) -> String {
    if value.is_ascii() && !value.contains(['\r', '\n']) {
        return value.to_string();
    }

    let mut words = Vec::new();
    let mut start = 0;
    let mut end = 0;
    for (index, c) in value.char_indices() {
        let next = index + c.len_utf8();
        if next - start > ENCODED_WORD_BYTES {
            words.push(&value[start..end]);
            start = end;
        }
        end = next;
    }
    words.push(&value[start..end]);

    words
        .iter()
        .map(|word| format!("=?utf-8?b?{}?=", STANDARD.encode(word.as_bytes())))
        .collect::<Vec<_>>()
        .join("\r\n ")
}

fn push_base64(out: &mut String, bytes: &[u8]) {
    let encoded = STANDARD.encode(bytes);
    for chunk in encoded.as_bytes().chunks(LINE) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push_str("\r\n");
    }
}

/// Serialize a message as `multipart/mixed`; a message without attachments
/// is a single `text/plain` part.
pub fn eml(message: &Message) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&format!("From: {}\r\n", header_value(&message.from)));
    out.push_str(&format!("To: {}\r\n", header_value(&message.to)));
    out.push_str(&format!("Subject: {}\r\n", header_value(&message.subject)));
    out.push_str(&format!("Date: {}\r\n", message.date.to_rfc2822()));
    out.push_str(&format!("Message-ID: <{}>\r\n", message.message_id));
    out.push_str("MIME-Version: 1.0\r\n");

    let text_headers =
        "Content-Type: text/plain; charset=\"utf-8\"\r\nContent-Transfer-Encoding: base64\r\n";

    if message.attachments.is_empty() {
        out.push_str(text_headers);
        out.push_str("\r\n");
        push_base64(&mut out, message.body.as_bytes());
        return out.into_bytes();
    }

    out.push_str(&format!(
        "Content-Type: multipart/mixed; boundary=\"{}\"\r\n\r\n",
        message.boundary
    ));
    out.push_str("This is a multi-part message in MIME format.\r\n");

    out.push_str(&format!("--{}\r\n", message.boundary));
    out.push_str(text_headers);
    out.push_str("\r\n");
    push_base64(&mut out, message.body.as_bytes());

    for attachment in &message.attachments {
        out.push_str(&format!("--{}\r\n", message.boundary));
        out.push_str(&format!(
            "Content-Type: {}; name=\"{}\"\r\n",
            attachment.content_type, attachment.filename
        ));
        out.push_str("Content-Transfer-Encoding: base64\r\n");
        out.push_str(&format!(
            "Content-Disposition: attachment; filename=\"{}\"\r\n\r\n",
            attachment.filename
        ));
        push_base64(&mut out, &attachment.bytes);
    }
    out.push_str(&format!("--{}--\r\n", message.boundary));

    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message(attachments: Vec<Attachment>) -> Message {
        Message {
            from: "alice@example.com".to_string(),
            to: "bob@example.com".to_string(),
            subject: "Grüße".to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            message_id: "abc@faker-file-api".to_string(),
            boundary: "BOUNDARY".to_string(),
            body: "Hello Bob".to_string(),
            attachments,
        }
    }

    #[test]
    fn test_plain_message() {
        let text = String::from_utf8(eml(&message(Vec::new()))).unwrap();
        assert!(text.starts_with("From: alice@example.com\r\n"));
        assert!(text.contains("Subject: =?utf-8?b?R3LDvMOfZQ==?=\r\n"));
        assert!(text.contains("Date: Tue, 2 Jan 2024 03:04:05 +0000\r\n"));
        assert!(text.contains(&STANDARD.encode("Hello Bob")));
        assert!(!text.contains("multipart"));
    }

    #[test]
    fn test_attachments_become_parts() {
        let attachments = vec![
            Attachment {
                filename: "a.txt".to_string(),
                content_type: "text/plain",
                bytes: b"first".to_vec(),
            },
            Attachment {
                filename: "b.csv".to_string(),
                content_type: "text/csv",
                bytes: b"x,y".to_vec(),
            },
        ];
        let text = String::from_utf8(eml(&message(attachments))).unwrap();
        assert!(text.contains("multipart/mixed; boundary=\"BOUNDARY\""));
        assert_eq!(text.matches("--BOUNDARY\r\n").count(), 3);
        assert!(text.ends_with("--BOUNDARY--\r\n"));
        assert!(text.contains("filename=\"b.csv\""));
        assert!(text.contains(&STANDARD.encode("x,y")));
    }

    #[test]
    fn test_base64_lines_are_short() {
        let mut msg = message(Vec::new());
        msg.body = "x".repeat(1000);
        let text = String::from_utf8(eml(&msg)).unwrap();
        assert!(text.split("\r\n").all(|line| line.len() <= 998));
        let body = text.split("\r\n\r\n").nth(1).unwrap();
        assert!(body.split("\r\n").all(|line| line.len() <= LINE));
    }

    #[test]
    fn test_long_subject_is_folded_into_short_words() {
        let subject = "Grüße aus München ".repeat(12);
        let mut msg = message(Vec::new());
        msg.subject = subject.clone();
        let text = String::from_utf8(eml(&msg)).unwrap();

        let start = text.find("Subject: ").unwrap() + "Subject: ".len();
        let end = text.find("\r\nDate: ").unwrap();
        let folded = &text[start..end];

        let mut decoded = Vec::new();
        for line in folded.split("\r\n") {
            let word = line.trim_start();
            assert!(word.len() <= 75, "{}", word);
            let payload = word
                .strip_prefix("=?utf-8?b?")
                .and_then(|w| w.strip_suffix("?="))
                .unwrap();
            decoded.extend(STANDARD.decode(payload).unwrap());
        }
        assert_eq!(String::from_utf8(decoded).unwrap(), subject);
        assert!(folded.split("\r\n").skip(1).all(|line| line.starts_with(' ')));
    }
}
