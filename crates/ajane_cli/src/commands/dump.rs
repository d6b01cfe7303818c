//! Dump command implementation.

use crate::demo;
use ajane_core::{MemoryTransport, PanelConfig, SyncOutcome};
use ajane_protocol::names::REVISION_FIELD;
use ajane_protocol::DiffPayload;

/// Runs the dump command.
pub fn run(
    panel_config: PanelConfig,
    since: Option<u16>,
    fields: &[String],
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut panel, ids) = demo::build(panel_config)?;

    let mut transport = MemoryTransport::new();
    if let Some(since) = since {
        transport.set_field(REVISION_FIELD, &since.to_string());
    }
    for field in fields {
        let (id, value) = field
            .split_once('=')
            .ok_or_else(|| format!("Field must be id=value: {field}"))?;
        transport.set_field(id, value);
    }

    let outcome = panel.handle_request(&mut transport, |panel| ids.react(panel))?;
    let body = transport.take_body();

    match format {
        "json" => {
            let value: serde_json::Value = serde_json::from_str(&body)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => {
            print_text_output(outcome, &DiffPayload::decode(&body)?);
        }
    }

    Ok(())
}

fn print_text_output(outcome: SyncOutcome, payload: &DiffPayload) {
    match outcome {
        SyncOutcome::Polled { revision } => println!("Poll, revision {revision}"),
        SyncOutcome::Updated { revision, fields } => {
            println!("Update of {fields} field(s), revision {revision}")
        }
    }
    println!("{} changed widget(s)", payload.records.len());
    println!();

    for (id, properties) in &payload.records {
        println!("{id}");
        for (name, value) in properties {
            println!("  {name:<15} {value:?}");
        }
    }
}
