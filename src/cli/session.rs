//! `vise session`: replay a scripted editing session through the actors.
//!
//! A script is a JSON array of steps:
//!
//! ```json
//! [
//!   { "action": "click", "text": "Welcome to Our Website" },
//!   { "action": "type", "value": "Hello there" },
//!   { "action": "wait", "ms": 400 },
//!   { "action": "edit", "property": "fontWeight", "value": "font-bold" },
//!   { "action": "click-outside" },
//!   { "action": "reload" },
//!   { "action": "save" }
//! ]
//! ```
//!
//! Elements are located by `address` (`[0, 1, 0]`) or by their `text`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use serde::Deserialize;

use super::args::SessionArgs;
use super::common::{LOAD_FAILED_STATUS, load_sources, print_diff, runtime};
use crate::actor::messages::{HostMsg, HostSnapshot, Target};
use crate::actor::{Coordinator, Session};
use crate::config::ViseConfig;
use crate::dom::ElementAddress;
use crate::host::{ClickRegion, View};
use crate::preview::Pointer;
use crate::preview::mutate::Property;
use crate::protocol::{EndpointId, Envelope, FrameLog};
use crate::source::SourceSet;

/// Pause between keystrokes of a `type` step.
const KEYSTROKE_MS: u64 = 50;

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Click an element in the preview
    Click {
        #[serde(default)]
        address: Option<ElementAddress>,
        #[serde(default)]
        text: Option<String>,
    },
    /// Move the pointer onto an element
    Hover {
        #[serde(default)]
        address: Option<ElementAddress>,
        #[serde(default)]
        text: Option<String>,
    },
    /// Set a panel control
    Edit { property: Property, value: String },
    /// Type into the text area, one keystroke at a time
    Type {
        value: String,
        #[serde(default = "default_keystroke")]
        interval_ms: u64,
    },
    ClickOutside,
    ClickPanel,
    View { view: View },
    /// Replace a file from the code view
    Code { path: String, code: String },
    Reload,
    Save,
    Upload,
    Wait { ms: u64 },
}

fn default_keystroke() -> u64 {
    KEYSTROKE_MS
}

impl Step {
    fn target(address: &Option<ElementAddress>, text: &Option<String>) -> Result<Target> {
        match (address, text) {
            (Some(address), _) => Ok(Target::Address(address.clone())),
            (None, Some(text)) => Ok(Target::Text(text.clone())),
            (None, None) => bail!("step needs an `address` or a `text`"),
        }
    }
}

/// Parse a session script.
pub fn parse_script(content: &str) -> Result<Vec<Step>> {
    serde_json::from_str(content).context("invalid session script")
}

fn load_script(path: &Path) -> Result<Vec<Step>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_script(&content).with_context(|| format!("in {}", path.display()))
}

pub fn run_session(args: &SessionArgs, config: &ViseConfig) -> Result<()> {
    let steps = load_script(&args.script)?;
    let (sources, report) = load_sources(config)?;

    let mut coordinator = Coordinator::new(Arc::new(config.clone()), sources.clone());
    if args.write {
        coordinator = coordinator.with_persist(config.sections_dir());
    }
    if report.has_fallbacks() {
        coordinator = coordinator.with_startup_status(LOAD_FAILED_STATUS);
    }

    let outcome = runtime()?.block_on(drive(coordinator, &steps, args.html))?;

    print_frames(&outcome.frames, args.raw);
    print_summary(&sources, &outcome.snapshot);
    if let Some(html) = &outcome.html {
        println!("{}", "preview".bold());
        println!("{html}");
    }
    Ok(())
}

/// What a replayed session leaves behind.
struct Outcome {
    snapshot: HostSnapshot,
    frames: FrameLog,
    /// Final preview markup, when asked for
    html: Option<String>,
}

/// Start the actors, replay `steps`, and capture the final state.
async fn drive(coordinator: Coordinator, steps: &[Step], html: bool) -> Result<Outcome> {
    let session = coordinator.start()?;
    let result = replay(&session, steps).await;
    let snapshot = session.snapshot().await;
    let markup = if html {
        session.html().await.map(Some)
    } else {
        Ok(None)
    };
    let frames = session.frame_log().clone();
    session.shutdown().await;
    result?;
    Ok(Outcome {
        snapshot: snapshot?,
        frames,
        html: markup?,
    })
}

/// Run every step, letting the actors settle in between.
async fn replay(session: &Session, steps: &[Step]) -> Result<()> {
    wait_interactive(session).await?;

    let mut hovered: Option<Target> = None;
    for (i, step) in steps.iter().enumerate() {
        crate::debug!("session"; "step {}: {:?}", i + 1, step);
        run_step(session, step, &mut hovered)
            .await
            .with_context(|| format!("step {} failed", i + 1))?;
        session.settle().await?;
    }
    Ok(())
}

async fn run_step(session: &Session, step: &Step, hovered: &mut Option<Target>) -> Result<()> {
    match step {
        Step::Click { address, text } => {
            let target = Step::target(address, text)?;
            session.send(HostMsg::Click(ClickRegion::Preview))?;
            if !session.pointer(Pointer::Click, target.clone()).await? {
                bail!("no element for {:?}", target);
            }
        }
        Step::Hover { address, text } => {
            let target = Step::target(address, text)?;
            if let Some(previous) = hovered.take() {
                session.pointer(Pointer::Out, previous).await?;
            }
            if !session.pointer(Pointer::Over, target.clone()).await? {
                bail!("no element for {:?}", target);
            }
            *hovered = Some(target);
        }
        Step::Edit { property, value } => session.send(HostMsg::Edit {
            property: property.clone(),
            value: value.clone(),
        })?,
        Step::Type { value, interval_ms } => {
            let mut typed = String::new();
            for ch in value.chars() {
                typed.push(ch);
                session.send(HostMsg::Edit {
                    property: Property::TextContent,
                    value: typed.clone(),
                })?;
                tokio::time::sleep(Duration::from_millis(*interval_ms)).await;
            }
        }
        Step::ClickOutside => session.send(HostMsg::Click(ClickRegion::Outside))?,
        Step::ClickPanel => session.send(HostMsg::Click(ClickRegion::Panel))?,
        Step::View { view } => session.send(HostMsg::View(*view))?,
        Step::Code { path, code } => session.send(HostMsg::FileUpdate {
            path: path.clone(),
            code: code.clone(),
        })?,
        Step::Reload => session.send(HostMsg::Reload)?,
        Step::Save => session.send(HostMsg::Save)?,
        Step::Upload => session.send(HostMsg::Upload)?,
        Step::Wait { ms } => tokio::time::sleep(Duration::from_millis(*ms)).await,
    }
    Ok(())
}

async fn wait_interactive(session: &Session) -> Result<()> {
    for _ in 0..200 {
        if session.snapshot().await?.interaction_ready {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    bail!("preview did not become interactive")
}

// =============================================================================
// Output
// =============================================================================

fn print_frames(log: &FrameLog, raw: bool) {
    println!("{}", "messages".bold());
    for (source, frame) in log.frames() {
        let arrow = match source {
            EndpointId::Host => "host → preview".bright_blue().to_string(),
            EndpointId::Preview => "preview → host".bright_magenta().to_string(),
        };
        if raw {
            println!("  {arrow} {frame}");
            continue;
        }
        match Envelope::from_json(&frame) {
            Some(envelope) => println!("  {arrow} {}", envelope.message),
            None => println!("  {arrow} {frame}"),
        }
    }
}

fn print_summary(before: &SourceSet, snapshot: &HostSnapshot) {
    println!("{}", "changes".bold());
    for change in &snapshot.changes {
        let target = change.patched.as_deref().unwrap_or("preview only");
        println!(
            "  {} {:?} → {:?} ({})",
            change.property, change.old_value, change.new_value, target
        );
    }

    let mut touched = false;
    for path in snapshot.sources.paths() {
        let (Some(old), Some(new)) = (before.get(path), snapshot.sources.get(path)) else {
            continue;
        };
        if old != new {
            if !touched {
                println!("{}", "patched files".bold());
                touched = true;
            }
            print_diff(path, old, new);
        }
    }

    if snapshot.view != View::Preview {
        println!("view {:?}", snapshot.view);
    }
    if let Some(element) = &snapshot.selected {
        println!("selected <{}> at {}", element.tag(), element.address);
        if let Some(panel) = &snapshot.panel
            && let Ok(json) = serde_json::to_string_pretty(panel)
        {
            println!("{json}");
        }
    }

    if let Some(id) = &snapshot.component_id {
        println!("component {id}");
    }
    if let Some(status) = &snapshot.status {
        crate::log!("editor"; "{}", status);
    }
}
