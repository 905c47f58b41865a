//! Commit-Reveal Entropy Demo
//!
//! Runs a scripted scenario against a simulated chain and logs each step.
//! An optional JSON config path may be passed as the first argument.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commit_reveal_entropy::{
    commit_hash_word, Address, Call, EntropyConfig, Outcome, SimulatedChain, Word, VERSION,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let default_level = if cfg!(feature = "debug-tracing") { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Commit-Reveal Entropy v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => EntropyConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => EntropyConfig::default(),
    };
    info!(
        "Reveal window: {} blocks, ticket expiry: {} blocks",
        config.reveal_window, config.expiry_offset
    );

    demo(config)
}

/// Demo scenario: one ticket, two committers, one late reveal.
fn demo(config: EntropyConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo ===");

    let mut chain = SimulatedChain::new(config).context("invalid config")?;
    let requester = Address::new([0x11; 20]);
    let participants = [
        (Address::new([0xA1; 20]), Word::from_u64(0x5EC2E7_0001)),
        (Address::new([0xB2; 20]), Word::from_u64(0x5EC2E7_0002)),
    ];

    // Ticket resolves at block 1.
    let ticket_id = match chain.send(requester, config.min_request_fee, Call::RequestEntropy) {
        Outcome::TicketIssued(receipt) => {
            info!(
                "Ticket {} issued, expires at block {}",
                receipt.ticket_id, receipt.expiry_position
            );
            receipt.ticket_id
        }
        other => anyhow::bail!("ticket request rejected: {:?}", other),
    };

    let target = chain.block_number() + 1;
    for (caller, secret) in &participants {
        let hash = commit_hash_word(secret);
        let outcome = chain.send(*caller, config.min_commit_deposit, Call::Commit { target, hash });
        info!("Commit from {} for block {}: {:?}", caller, target, outcome);
    }

    chain.mine(2);
    info!("Block {}", chain.block_number());

    // Only the first participant reveals in time.
    let (caller, secret) = participants[0];
    let outcome = chain.send(caller, 0, Call::Reveal { target, secret });
    info!("Reveal from {}: {:?}", caller, outcome);

    let record = chain.contract().block_record(target);
    info!(
        "Block {} record: entropy={} commits={} reveals={} pending_tickets={}",
        target, record.entropy, record.commit_count, record.reveal_count, record.pending_ticket_count
    );

    match chain.send(requester, 0, Call::FetchEntropy { ticket_id }) {
        Outcome::Entropy(resolution) => {
            info!("Ticket {} -> {:?}, value {}", ticket_id, resolution.status, resolution.value)
        }
        other => warn!("Unexpected outcome {:?}", other),
    }

    chain.mine(config.reveal_window);
    let (caller, secret) = participants[1];
    let outcome = chain.send(caller, 0, Call::Reveal { target, secret });
    info!("Late reveal from {} at block {}: {:?}", caller, chain.block_number(), outcome);

    if let Outcome::Entropy(resolution) = chain.send(requester, 0, Call::FetchEntropy { ticket_id }) {
        info!("Ticket {} at block {} -> {:?}", ticket_id, chain.block_number(), resolution.status);
    }

    info!("=== Event Log ===");
    for event in chain.contract_mut().drain_events() {
        let json = serde_json::to_string(&event).context("serializing event")?;
        info!("{}", json);
    }

    Ok(())
}
