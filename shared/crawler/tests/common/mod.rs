//! Shared helpers for crawler integration tests.

#![allow(dead_code)]

use scout_utils::AppConfig;

/// A single-page PDF that shows each of `lines` in Helvetica.
pub fn minimal_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 12 Tf\n14 TL\n72 720 Td\n");
    for line in lines {
        content.push_str(&format!("({}) Tj\nT*\n", escape_pdf_string(line)));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    pdf.extend_from_slice(xref.as_bytes());

    pdf
}

fn escape_pdf_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Config pointing the search source at a mock server, with fast retries.
pub fn test_config(search_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.sources.search_url_template = format!("{}?q={{query}}", search_url);
    config.fetcher.backoff_base_ms = 1;
    config.fetcher.backoff_max_ms = 5;
    config
}

pub fn search_page(links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!("<div class=\"result\"><a class=\"result__a\" href=\"{}\">result</a></div>\n", href))
        .collect();
    format!("<html><body>\n{}</body></html>", anchors)
}
