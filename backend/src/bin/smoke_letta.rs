//! Smoke check against a live agent platform
//! This is a utility binary, not part of the main application
//!
//! Verifies the API key, lists agents and reads the shared blocks of the
//! stored orchestrator. Creates nothing.

use marketgap_backend::config::Config;
use marketgap_backend::remote::{AgentPlatform, LettaClient, RemoteError};
use marketgap_backend::state::AgentIdStore;
use marketgap_backend::status::parse_block;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    println!("Checking agent platform at {}...\n", config.remote.base_url);

    // Test 1: API key
    println!("1. Checking for LETTA_API_KEY environment variable...");
    match &config.remote.api_key {
        Some(key) => println!("   ✓ LETTA_API_KEY is set (length: {} chars)", key.len()),
        None => {
            eprintln!("   ✗ LETTA_API_KEY not found in environment");
            eprintln!("   Make sure to export it: export LETTA_API_KEY=\"your-key\"");
            return Err(RemoteError::MissingApiKey.into());
        }
    }

    let client = LettaClient::new(&config.remote);

    // Test 2: List agents
    println!("\n2. Listing agents...");
    match client.list_agents().await {
        Ok(agents) => {
            println!("   ✓ {} agents visible", agents.len());
            for agent in agents.iter().take(10) {
                println!("   - {} ({})", agent.name, agent.id);
            }
        }
        Err(e) => {
            eprintln!("   ✗ Failed to list agents: {}", e);
            if matches!(e, RemoteError::Unauthorized { .. }) {
                eprintln!("   The API key was rejected; check LETTA_API_KEY");
            }
            return Err(e.into());
        }
    }

    // Test 3: Stored orchestrator
    println!(
        "\n3. Reading stored agent ids from {}...",
        config.persistence.agent_ids_file.display()
    );
    let stored = AgentIdStore::new(&config.persistence.agent_ids_file).load()?;
    let Some(orchestrator) = stored.orchestrator else {
        println!("   ⚠ No stored orchestrator; start the backend and initialize agents first");
        return Ok(());
    };

    match client.retrieve_agent(&orchestrator).await {
        Ok(agent) => println!("   ✓ Orchestrator {} exists ({})", agent.id, agent.name),
        Err(e) if e.is_not_found() => {
            println!("   ⚠ Stored orchestrator {} no longer exists", orchestrator);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    // Test 4: Shared blocks
    println!("\n4. Reading shared blocks...");
    for block in client.list_agent_blocks(&orchestrator).await? {
        let content = parse_block(&block.value);
        println!(
            "   - {:<18} {:>6} chars  {}",
            block.label.as_deref().unwrap_or("?"),
            block.value.chars().count(),
            content.preview(60)
        );
    }

    println!("\n✓ Platform check complete");
    Ok(())
}
