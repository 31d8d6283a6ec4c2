//! In-memory agent platform shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use marketgap_backend::config::RemoteConfig;
use marketgap_backend::coordinator::WorkflowCoordinator;
use marketgap_backend::remote::types::{AgentMessage, MessageContent, ToolCall};
use marketgap_backend::remote::{
    AgentPlatform, AgentReply, AgentSummary, Block, CreateAgentRequest, CreateBlockRequest,
    CreateToolRequest, RemoteError, Tool,
};
use marketgap_backend::state::persistence::AgentIdStore;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeAgent {
    pub name: String,
    pub block_ids: Vec<String>,
    pub tools: Vec<String>,
    pub tool_ids: Vec<String>,
}

#[derive(Default)]
pub struct FakeState {
    pub agents: BTreeMap<String, FakeAgent>,
    pub blocks: BTreeMap<String, Block>,
    pub tools: Vec<Tool>,
    pub agents_created: usize,
    pub blocks_created: usize,
    pub tools_created: usize,
    pub messages: Vec<(String, String)>,
    /// Labels whose reads fail with a network error
    pub failing_reads: HashSet<String>,
    /// When a message contains the needle, the block with the label gets the value
    pub script: Vec<(String, String, String)>,
    pub agent_lookup_down: bool,
    pub message_delay: Option<Duration>,
    next_id: usize,
}

impl FakeState {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn block_by_label_mut(&mut self, label: &str) -> Option<&mut Block> {
        self.blocks
            .values_mut()
            .find(|block| block.label.as_deref() == Some(label))
    }
}

#[derive(Default, Clone)]
pub struct FakePlatform {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn agents_created(&self) -> usize {
        self.with_state(|s| s.agents_created)
    }

    pub fn blocks_created(&self) -> usize {
        self.with_state(|s| s.blocks_created)
    }

    pub fn tools_created(&self) -> usize {
        self.with_state(|s| s.tools_created)
    }

    pub fn agent(&self, agent_id: &str) -> Option<FakeAgent> {
        self.with_state(|s| s.agents.get(agent_id).cloned())
    }

    /// Id of the block with `label` attached to `agent_id`
    pub fn attached_block(&self, agent_id: &str, label: &str) -> Option<String> {
        self.with_state(|s| {
            s.agents.get(agent_id).and_then(|agent| {
                agent
                    .block_ids
                    .iter()
                    .find(|id| {
                        s.blocks
                            .get(*id)
                            .map(|b| b.label.as_deref() == Some(label))
                            .unwrap_or(false)
                    })
                    .cloned()
            })
        })
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.with_state(|s| s.messages.clone())
    }

    pub fn block_value(&self, label: &str) -> Option<String> {
        self.with_state(|s| s.block_by_label_mut(label).map(|b| b.value.clone()))
    }

    /// Remove an agent as if it had been deleted on the platform
    pub fn delete_agent(&self, agent_id: &str) {
        self.with_state(|s| {
            s.agents.remove(agent_id);
        });
    }

    pub fn script(&self, needle: &str, label: &str, value: &str) {
        self.with_state(|s| {
            s.script
                .push((needle.to_string(), label.to_string(), value.to_string()))
        });
    }
}

#[async_trait]
impl AgentPlatform for FakePlatform {
    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<AgentSummary, RemoteError> {
        self.with_state(|s| {
            let id = s.next("agent");
            s.agents_created += 1;
            s.agents.insert(
                id.clone(),
                FakeAgent {
                    name: request.name.clone(),
                    block_ids: request.block_ids.clone(),
                    tools: request.tools.clone(),
                    tool_ids: request.tool_ids.clone(),
                },
            );
            Ok(AgentSummary {
                id,
                name: request.name.clone(),
            })
        })
    }

    async fn retrieve_agent(&self, agent_id: &str) -> Result<AgentSummary, RemoteError> {
        self.with_state(|s| {
            if s.agent_lookup_down {
                return Err(RemoteError::Network("connection reset".to_string()));
            }
            s.agents
                .get(agent_id)
                .map(|agent| AgentSummary {
                    id: agent_id.to_string(),
                    name: agent.name.clone(),
                })
                .ok_or_else(|| RemoteError::NotFound(format!("Agent {} not found", agent_id)))
        })
    }

    async fn list_agents(&self) -> Result<Vec<AgentSummary>, RemoteError> {
        self.with_state(|s| {
            Ok(s.agents
                .iter()
                .map(|(id, agent)| AgentSummary {
                    id: id.clone(),
                    name: agent.name.clone(),
                })
                .collect())
        })
    }

    async fn list_agent_blocks(&self, agent_id: &str) -> Result<Vec<Block>, RemoteError> {
        self.with_state(|s| {
            let agent = s
                .agents
                .get(agent_id)
                .ok_or_else(|| RemoteError::NotFound(agent_id.to_string()))?;
            Ok(agent
                .block_ids
                .iter()
                .filter_map(|id| s.blocks.get(id).cloned())
                .collect())
        })
    }

    async fn attach_block(&self, agent_id: &str, block_id: &str) -> Result<(), RemoteError> {
        self.with_state(|s| {
            let agent = s
                .agents
                .get_mut(agent_id)
                .ok_or_else(|| RemoteError::NotFound(agent_id.to_string()))?;
            agent.block_ids.push(block_id.to_string());
            Ok(())
        })
    }

    async fn create_block(&self, request: &CreateBlockRequest) -> Result<Block, RemoteError> {
        self.with_state(|s| {
            let id = s.next("block");
            s.blocks_created += 1;
            let block = Block {
                id: id.clone(),
                label: Some(request.label.clone()),
                value: request.value.clone(),
                limit: Some(request.limit),
                updated_at: None,
            };
            s.blocks.insert(id, block.clone());
            Ok(block)
        })
    }

    async fn retrieve_block(&self, block_id: &str) -> Result<Block, RemoteError> {
        self.with_state(|s| {
            let block = s
                .blocks
                .get(block_id)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound(block_id.to_string()))?;
            if block
                .label
                .as_ref()
                .map(|label| s.failing_reads.contains(label))
                .unwrap_or(false)
            {
                return Err(RemoteError::Network("block read failed".to_string()));
            }
            Ok(block)
        })
    }

    async fn modify_block(&self, block_id: &str, value: &str) -> Result<Block, RemoteError> {
        self.with_state(|s| {
            let block = s
                .blocks
                .get_mut(block_id)
                .ok_or_else(|| RemoteError::NotFound(block_id.to_string()))?;
            block.value = value.to_string();
            Ok(block.clone())
        })
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, RemoteError> {
        self.with_state(|s| Ok(s.tools.clone()))
    }

    async fn create_tool(&self, request: &CreateToolRequest) -> Result<Tool, RemoteError> {
        self.with_state(|s| {
            let name = request
                .source_code
                .strip_prefix("def ")
                .and_then(|rest| rest.split('(').next())
                .unwrap_or_default()
                .to_string();
            let tool = Tool {
                id: s.next("tool"),
                name,
            };
            s.tools_created += 1;
            s.tools.push(tool.clone());
            Ok(tool)
        })
    }

    async fn send_message(
        &self,
        agent_id: &str,
        content: &str,
        _timeout: Duration,
    ) -> Result<AgentReply, RemoteError> {
        let delay = self.with_state(|s| s.message_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.with_state(|s| {
            s.messages.push((agent_id.to_string(), content.to_string()));
            let writes: Vec<(String, String)> = s
                .script
                .iter()
                .filter(|(needle, _, _)| content.contains(needle.as_str()))
                .map(|(_, label, value)| (label.clone(), value.clone()))
                .collect();
            let mut tools = Vec::new();
            for (label, value) in writes {
                if let Some(block) = s.block_by_label_mut(&label) {
                    block.value = value;
                    tools.push(AgentMessage::ToolCallMessage {
                        tool_call: ToolCall {
                            name: "core_memory_replace".to_string(),
                            arguments: None,
                        },
                    });
                }
            }
            tools.push(AgentMessage::AssistantMessage {
                content: MessageContent::Text("done".to_string()),
            });
            Ok(AgentReply { messages: tools })
        })
    }
}

pub fn remote_config() -> RemoteConfig {
    RemoteConfig {
        api_key: Some("test-key".to_string()),
        ..Default::default()
    }
}

pub fn coordinator(platform: &FakePlatform, dir: &Path) -> WorkflowCoordinator {
    coordinator_with(platform, dir, remote_config())
}

pub fn coordinator_with(
    platform: &FakePlatform,
    dir: &Path,
    remote: RemoteConfig,
) -> WorkflowCoordinator {
    WorkflowCoordinator::new(
        Arc::new(platform.clone()),
        AgentIdStore::new(dir.join("agent-ids.json")),
        remote,
    )
}
