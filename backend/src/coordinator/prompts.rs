//! Instruction strings sent to remote agents
//!
//! The remote agents do the planning and tool execution; these strings are
//! the whole interface to them.

use crate::coordinator::blocks::{
    AUDIENCE_SIGNALS, CONSULTING_DOCS, CONSULTING_GROUPS, FINAL_IDEAS, GAP_LIST, IDEA_HISTORY,
    USER_FEEDBACK, WORKFLOW_STATE,
};
use serde_json::json;

/// Persona of the orchestrator agent
pub const ORCHESTRATOR_PERSONA: &str = "I am the MarketGap orchestrator. I coordinate market research \
for one industry at a time: consulting white-paper research, gap analysis and solution ideation. \
I keep the shared memory blocks up to date and record progress in workflow_state. \
I retry a failed phase at most 3 times before marking it failed.";

/// Persona of the market-research worker
pub const MARKET_RESEARCH_PERSONA: &str = "I am the MarketGap market-research worker. I only crawl \
and chunk consulting white papers; I never analyse markets or make recommendations. \
I store tagged chunks in consulting_docs.";

/// Ask the worker to list stored chunks verbatim
pub const PDF_CHUNKS_PROMPT: &str = "List all PDF chunks you have stored in consulting_docs. \
Return the raw chunks with their tags, without analysis or interpretation.";

/// Ask the worker for a factual crawl report
pub const CRAWLING_STATUS_PROMPT: &str = "Report your crawling status: how many PDFs you have \
processed, which firms are covered and any issues you ran into. Facts only, no analysis.";

/// Ask the worker for a research summary
pub const RESEARCH_SUMMARY_PROMPT: &str = "Summarise the research done so far: number of PDFs \
processed, consulting firms covered, main topics found and the current state of the crawl.";

/// First workflow message: kick off research for `industry`
pub fn research_instruction(industry: &str, firms: &[&str]) -> String {
    let parameters = json!({
        "consultingFirms": firms,
        "targetMarkets": [industry],
    });
    format!(
        "Start the MarketGap workflow for the {industry} industry.\n\
         \n\
         Phase 1 - research: find recent white papers and reports from the consulting firms \
         listed in {CONSULTING_GROUPS} (fall back to the parameters below if it is empty). \
         Split each document into title, exec-summary, finding and table chunks, redact personal \
         data, tag each chunk with firm and source, and write the chunks to {CONSULTING_DOCS}.\n\
         \n\
         Parameters: {parameters}\n\
         \n\
         Record the current phase in {WORKFLOW_STATE} and reply \"done\" when {CONSULTING_DOCS} is written."
    )
}

/// Second workflow message: gap analysis over the research
pub fn gap_analysis_instruction(industry: &str) -> String {
    format!(
        "Phase 2 - gap analysis for the {industry} industry. Read {CONSULTING_DOCS}, extract \
         pain points and unmet needs, score each gap for severity (critical, high, medium, low), \
         market size and opportunity (0-100), and overwrite {GAP_LIST} with a JSON array of \
         objects with keys id, description, marketSize, opportunityScore, severity and category. \
         Do not create new memory blocks. Reply \"done\" when {GAP_LIST} is written."
    )
}

/// Third workflow message: ideation over the gaps
pub fn ideation_instruction(industry: &str) -> String {
    format!(
        "Phase 3 - ideation for the {industry} industry. Using {GAP_LIST}, {AUDIENCE_SIGNALS} \
         and {USER_FEEDBACK}, brainstorm up to 3 feasible product ideas that address the most \
         severe gaps. Score each idea for impact, confidence and ease (1-5 each). Append the raw \
         JSON array [{{id, title, description, ICE}}] to {IDEA_HISTORY} and overwrite \
         {FINAL_IDEAS} with only the ideas whose average ICE score is at least 7. \
         Reply \"done\" when finished."
    )
}

/// Ask the worker to crawl white papers from `firms`
pub fn crawl_instruction(firms: &[String]) -> String {
    format!(
        "Crawl and chunk PDFs from these consulting firms: {}.\n\
         \n\
         1. Search each firm's site for recent white papers, reports and research PDFs.\n\
         2. Extract the text of each PDF.\n\
         3. Split it into title, exec-summary, finding and table chunks.\n\
         4. Redact personal data.\n\
         5. Tag each chunk with firm name and document source.\n\
         6. Store the chunks in {CONSULTING_DOCS}.\n\
         \n\
         Do not analyse trends, identify opportunities or make recommendations.",
        firms.join(", ")
    )
}
