//! Agent platform wire types
//!
//! Structs that mirror the platform's JSON request and response format.
//! Only the fields this service reads are modelled; everything else is ignored.

use serde::{Deserialize, Serialize};

/// An agent as returned by the platform
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AgentSummary {
    /// Opaque agent id
    pub id: String,
    /// Agent display name
    #[serde(default)]
    pub name: String,
}

/// A memory block as returned by the platform
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Block {
    /// Opaque block id
    pub id: String,
    /// Block label (e.g. `gap_list`)
    #[serde(default)]
    pub label: Option<String>,
    /// Current value; may or may not be JSON
    #[serde(default)]
    pub value: String,
    /// Character limit enforced by the platform
    #[serde(default)]
    pub limit: Option<usize>,
    /// Last modification time, when the platform reports one
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request body for creating a memory block
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateBlockRequest {
    /// Block label
    pub label: String,
    /// Initial value (the block's sentinel)
    pub value: String,
    /// Character limit
    pub limit: usize,
    /// Human-readable description shown to the agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for creating an agent
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateAgentRequest {
    /// Agent name, used later to find the agent again
    pub name: String,
    /// Blocks owned by this agent only (persona etc.)
    pub memory_blocks: Vec<CreateBlockRequest>,
    /// Ids of shared blocks to attach
    pub block_ids: Vec<String>,
    /// Model handle
    pub model: String,
    /// Embedding handle
    pub embedding: String,
    /// Context window limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window_limit: Option<u32>,
    /// Built-in platform tools, by name
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    /// Ids of registered custom tools
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_ids: Vec<String>,
    /// Free-form tags
    pub tags: Vec<String>,
}

/// A tool registered on the platform
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Tool {
    /// Opaque tool id
    pub id: String,
    /// Tool name, taken from the function name in its source
    #[serde(default)]
    pub name: String,
}

/// Request body for registering a custom tool
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateToolRequest {
    /// Python source of a single function; the platform derives the schema
    pub source_code: String,
    /// Description shown to agents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form tags
    pub tags: Vec<String>,
}

/// Request body for modifying a block value
#[derive(Serialize, Debug)]
pub struct ModifyBlockRequest<'a> {
    /// New value
    pub value: &'a str,
}

/// Request body for sending messages to an agent
#[derive(Serialize, Debug)]
pub struct SendMessageRequest {
    /// Messages to append to the agent's conversation
    pub messages: Vec<MessageInput>,
}

/// A single input message
#[derive(Serialize, Debug)]
pub struct MessageInput {
    /// Message role (always `user` here)
    pub role: String,
    /// Message text
    pub content: String,
}

impl SendMessageRequest {
    /// Build a request carrying one user message
    pub fn user(content: &str) -> Self {
        Self {
            messages: vec![MessageInput {
                role: "user".to_string(),
                content: content.to_string(),
            }],
        }
    }
}

/// Response to a send-message call
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AgentReply {
    /// Messages produced by the agent while handling the request
    #[serde(default)]
    pub messages: Vec<AgentMessage>,
}

/// One message produced by the agent
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum AgentMessage {
    /// Text reply addressed to the user
    AssistantMessage {
        /// Reply content
        content: MessageContent,
    },
    /// A tool invocation
    ToolCallMessage {
        /// Invoked tool
        tool_call: ToolCall,
    },
    /// Internal reasoning
    ReasoningMessage {
        /// Reasoning text
        #[serde(default)]
        reasoning: String,
    },
    /// Any message type this service does not interpret
    #[serde(other)]
    Other,
}

/// Assistant content: either plain text or a list of typed parts
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text
    Text(String),
    /// Typed parts; only `text` parts are read
    Parts(Vec<ContentPart>),
}

/// A typed content part
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ContentPart {
    /// Part type (e.g. `text`)
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Text of a `text` part
    #[serde(default)]
    pub text: Option<String>,
}

/// A tool call made by the agent
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Tool name
    pub name: String,
    /// Raw JSON arguments
    #[serde(default)]
    pub arguments: Option<String>,
}

impl MessageContent {
    /// Flatten into a single string; `None` when there is no text
    pub fn text(&self) -> Option<String> {
        match self {
            MessageContent::Text(text) => Some(text.clone()),
            MessageContent::Parts(parts) => {
                let joined = parts
                    .iter()
                    .filter(|part| part.kind == "text")
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join(" ");
                if joined.is_empty() {
                    None
                } else {
                    Some(joined)
                }
            }
        }
    }
}

impl AgentReply {
    /// Text of the first assistant message that carries any
    pub fn assistant_text(&self) -> Option<String> {
        self.messages.iter().find_map(|message| match message {
            AgentMessage::AssistantMessage { content } => content.text(),
            _ => None,
        })
    }

    /// Names of all tools the agent called, in order
    pub fn tool_calls(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter_map(|message| match message {
                AgentMessage::ToolCallMessage { tool_call } => Some(tool_call.name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Log assistant replies, tool calls and reasoning
    pub fn log(&self, agent_id: &str) {
        for message in &self.messages {
            match message {
                AgentMessage::AssistantMessage { content } => {
                    tracing::info!(
                        agent_id = %agent_id,
                        reply = %content.text().unwrap_or_default(),
                        "Agent replied"
                    );
                }
                AgentMessage::ToolCallMessage { tool_call } => {
                    tracing::info!(agent_id = %agent_id, tool = %tool_call.name, "Tool called");
                }
                AgentMessage::ReasoningMessage { reasoning } => {
                    tracing::debug!(agent_id = %agent_id, reasoning = %reasoning, "Agent reasoning");
                }
                AgentMessage::Other => {}
            }
        }
    }
}
