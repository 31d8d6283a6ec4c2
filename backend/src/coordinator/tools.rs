//! Agent tool catalog
//!
//! Custom tools are registered on the platform from Python source before the
//! agents that use them are created. The platform names a tool after the
//! function in its source, so a tool registered by an earlier run is found
//! again by name.

use crate::remote::CreateToolRequest;

/// Definition of one custom tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomToolSpec {
    /// Function name, which the platform uses as the tool name
    pub name: &'static str,
    /// Description shown to agents
    pub description: &'static str,
    /// Python source of the function
    pub source_code: &'static str,
}

impl CustomToolSpec {
    /// Request that registers this tool
    pub fn create_request(&self) -> CreateToolRequest {
        CreateToolRequest {
            source_code: self.source_code.to_string(),
            description: Some(self.description.to_string()),
            tags: vec!["marketgap".to_string()],
        }
    }
}

/// Downloads a PDF and returns its text
pub const FETCH_AND_EXTRACT_PDF: CustomToolSpec = CustomToolSpec {
    name: "fetch_and_extract_pdf",
    description: "Download a PDF from a URL and return its extracted text.",
    source_code: r#"def fetch_and_extract_pdf(pdf_url: str) -> str:
    """
    Download a PDF from a URL and return its extracted text.

    Args:
        pdf_url (str): URL of the PDF document

    Returns:
        str: Extracted text, or an error description
    """
    import io
    import requests

    try:
        response = requests.get(pdf_url, timeout=30)
        response.raise_for_status()
    except Exception as e:
        return f"Error downloading PDF: {e}"

    try:
        from pypdf import PdfReader

        reader = PdfReader(io.BytesIO(response.content))
        pages = [page.extract_text() or "" for page in reader.pages]
        return "\n\n".join(pages)[:20000]
    except Exception as e:
        return f"Downloaded {len(response.content)} bytes from {pdf_url} but could not extract text: {e}"
"#,
};

/// Custom tools of the market-research worker
pub const MARKET_RESEARCH_TOOLS: &[CustomToolSpec] = &[FETCH_AND_EXTRACT_PDF];

/// Built-in platform tools of the market-research worker
pub const MARKET_RESEARCH_BUILTIN_TOOLS: &[&str] = &["web_search", "run_code"];

/// Built-in platform tools of the orchestrator
pub const ORCHESTRATOR_BUILTIN_TOOLS: &[&str] = &["send_message_to_agent_and_wait_for_reply"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_match_their_functions() {
        for spec in MARKET_RESEARCH_TOOLS {
            assert!(
                spec.source_code.starts_with(&format!("def {}(", spec.name)),
                "{}",
                spec.name
            );
        }
    }

    #[test]
    fn test_create_request_is_tagged() {
        let request = FETCH_AND_EXTRACT_PDF.create_request();
        assert_eq!(request.tags, vec!["marketgap".to_string()]);
        assert!(request.source_code.contains("PdfReader"));
    }
}
