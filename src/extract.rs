//! Plain-text extraction from uploaded files.
//!
//! Supports: TXT, EML, PDF.

use mail_parser::{MessageParser, MimeHeaders};
use tracing::{info, warn};

use crate::error::ExtractionError;

/// Upload formats we can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Text,
    Eml,
    Pdf,
}

impl FileFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractionError> {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => Ok(Self::Text),
            "eml" => Ok(Self::Eml),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ExtractionError::UnsupportedFormat { extension }),
        }
    }
}

/// Extract readable text from an uploaded file.
pub fn extract_text(file_name: &str, data: &[u8]) -> Result<String, ExtractionError> {
    let format = FileFormat::from_file_name(file_name)?;
    info!(file_name, ?format, bytes = data.len(), "Extracting text from upload");

    let text = match format {
        FileFormat::Text => decode_text(data),
        FileFormat::Eml => extract_eml(file_name, data)?,
        FileFormat::Pdf => extract_pdf(file_name, data)?,
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::Empty {
            file_name: file_name.to_string(),
        });
    }
    Ok(text)
}

/// UTF-8 with Latin-1 fallback. Latin-1 maps every byte, so this never fails.
fn decode_text(data: &[u8]) -> String {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warn!("Upload is not valid UTF-8, decoding as Latin-1");
            data.iter().map(|&b| char::from(b)).collect()
        }
    }
}

fn extract_eml(file_name: &str, data: &[u8]) -> Result<String, ExtractionError> {
    let parsed = MessageParser::default()
        .parse(data)
        .ok_or_else(|| ExtractionError::ExtractionFailed {
            file_name: file_name.to_string(),
            reason: "not a valid RFC 822 message".to_string(),
        })?;

    let subject = parsed.subject().unwrap_or("Sem assunto");
    let from = first_address(parsed.from()).unwrap_or_else(|| "Desconhecido".to_string());
    let to = first_address(parsed.to()).unwrap_or_else(|| "Desconhecido".to_string());
    let body = eml_body(&parsed);

    Ok(format!("Assunto: {subject}\nDe: {from}\nPara: {to}\n\n{body}"))
}

fn first_address(addr: Option<&mail_parser::Address>) -> Option<String> {
    let addr = addr?.first()?;
    match (addr.name(), addr.address()) {
        (Some(name), Some(email)) => Some(format!("{name} <{email}>")),
        (None, Some(email)) => Some(email.to_string()),
        (Some(name), None) => Some(name.to_string()),
        (None, None) => None,
    }
}

/// Plain-text body, else stripped HTML, else the first textual attachment.
fn eml_body(parsed: &mail_parser::Message) -> String {
    if let Some(text) = parsed.body_text(0) {
        return text.to_string();
    }
    if let Some(html) = parsed.body_html(0) {
        return strip_html(html.as_ref());
    }
    for part in parsed.attachments() {
        let part: &mail_parser::MessagePart = part;
        if let Some(ct) = MimeHeaders::content_type(part)
            && ct.ctype() == "text"
            && let Ok(text) = std::str::from_utf8(part.contents())
        {
            return text.to_string();
        }
    }
    String::new()
}

/// Drop tags and collapse whitespace.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                result.push(' ');
            }
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_pdf(file_name: &str, data: &[u8]) -> Result<String, ExtractionError> {
    let failed = |reason: String| ExtractionError::ExtractionFailed {
        file_name: file_name.to_string(),
        reason,
    };

    // pdf-extract panics on some malformed documents.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
        .map_err(|_| failed("malformed PDF".to_string()))?
        .map_err(|e| {
            warn!(file_name, error = %e, "PDF extraction failed");
            failed(e.to_string())
        })?;

    let cleaned = clean_extracted_text(&text);
    info!(file_name, chars = cleaned.chars().count(), "PDF extraction successful");
    Ok(cleaned)
}

/// Trim every line and drop blank ones.
fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection() {
        assert_eq!(FileFormat::from_file_name("a.TXT").unwrap(), FileFormat::Text);
        assert_eq!(FileFormat::from_file_name("mail.eml").unwrap(), FileFormat::Eml);
        assert_eq!(FileFormat::from_file_name("doc.Pdf").unwrap(), FileFormat::Pdf);

        let err = FileFormat::from_file_name("notes.docx").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::UnsupportedFormat { ref extension } if extension == "docx"
        ));
        assert!(FileFormat::from_file_name("no_extension").is_err());
    }

    #[test]
    fn txt_utf8() {
        let text = extract_text("a.txt", "Olá, preciso de suporte.".as_bytes()).unwrap();
        assert_eq!(text, "Olá, preciso de suporte.");
    }

    #[test]
    fn txt_strips_bom() {
        let mut data = b"\xEF\xBB\xBF".to_vec();
        data.extend_from_slice(b"bom dia");
        assert_eq!(extract_text("a.txt", &data).unwrap(), "bom dia");
    }

    #[test]
    fn txt_latin1_fallback() {
        // "reunião" in Latin-1
        let data = b"reuni\xE3o amanh\xE3";
        assert_eq!(extract_text("a.txt", data).unwrap(), "reunião amanhã");
    }

    #[test]
    fn blank_upload_is_rejected() {
        let err = extract_text("a.txt", b"  \n\t ").unwrap_err();
        assert!(matches!(err, ExtractionError::Empty { .. }));
        assert_eq!(err.code(), "ExtractionFailed");
    }

    #[test]
    fn eml_plain_text() {
        let raw = "From: Ana Souza <ana@empresa.com>\r\n\
                   To: suporte@autou.com\r\n\
                   Subject: Erro no login\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   \r\n\
                   O login parou de funcionar hoje.\r\n";
        let text = extract_text("msg.eml", raw.as_bytes()).unwrap();
        assert!(text.starts_with("Assunto: Erro no login\nDe: Ana Souza <ana@empresa.com>\n"));
        assert!(text.contains("Para: suporte@autou.com"));
        assert!(text.contains("O login parou de funcionar hoje."));
    }

    #[test]
    fn eml_html_only() {
        let raw = "From: a@b.com\r\n\
                   Subject: Oi\r\n\
                   Content-Type: text/html; charset=utf-8\r\n\
                   \r\n\
                   <p>Feliz <b>natal</b>!</p>\r\n";
        let text = extract_text("msg.eml", raw.as_bytes()).unwrap();
        assert!(text.contains("Feliz natal"));
    }

    #[test]
    fn garbage_pdf_fails_cleanly() {
        let err = extract_text("broken.pdf", b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionFailed { .. }));
    }

    #[test]
    fn strip_html_nested_tags() {
        assert_eq!(
            strip_html("<div><b>Bold</b> and <i>italic</i></div>"),
            "Bold and italic"
        );
    }

    #[test]
    fn clean_drops_blank_lines() {
        assert_eq!(clean_extracted_text("  a  \n\n   \n b"), "a\nb");
    }
}
