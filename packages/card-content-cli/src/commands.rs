//! Command handlers.
//!
//! Every command loads the document once through an `EditorHandle`, edits the
//! working copy, and (unless `--dry-run`) applies the result as a single write.
use std::sync::Arc;

use anyhow::{bail, Context};
use card_content_core::config::{self, EditorConfig};
use card_content_core::feed::{self, FeedRequest};
use card_content_core::store::http::HttpContentStore;
use card_content_core::tracking::{CardChange, ChangeRecord};
use card_content_core::{ContentStore, Editor, EditorHandle, SectionKind};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use crate::cli::{Cli, Commands};
use crate::output::{change_row, diff_row, print_notices, print_one, print_out};

#[derive(Debug, Serialize)]
pub struct SectionSummary {
    pub kind: SectionKind,
    pub id: String,
    pub cards: usize,
}

#[derive(Debug, Serialize)]
pub struct EditOutcome {
    pub removed: usize,
    pub changes: Vec<ChangeRecord>,
    pub diff: Vec<CardChange>,
    pub applied: bool,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path);
    let server = cli
        .server
        .clone()
        .unwrap_or_else(|| config.server_url.clone());
    log::debug!("Using card content server {}", server);

    let store = Arc::new(HttpContentStore::new(&server));
    let handle = EditorHandle::new(Editor::new(&config), store);
    let result = execute(&handle, &config, cli.command, cli.json, cli.dry_run).await;
    handle.close().await;
    result
}

async fn execute<S: ContentStore + ?Sized>(
    handle: &EditorHandle<S>,
    config: &EditorConfig,
    command: Commands,
    json: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    handle.load().await?;
    handle.lock().await.drain_notices();

    match command {
        Commands::Show => {
            let editor = handle.lock().await;
            let content = editor.working().context("Card content is not loaded")?;
            println!("{}", serde_json::to_string_pretty(content)?);
        }
        Commands::Sections { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind.into()],
                None => SectionKind::ALL.to_vec(),
            };
            let sections = section_summaries(&*handle.lock().await, &kinds);
            print_out(json, &sections, |s| {
                format!("{}\t{}\t{}", s.kind, s.id, s.cards)
            })?;
        }
        Commands::AddProfileCard {
            section,
            id,
            description,
            source,
            role,
            style,
            divisions,
        } => {
            {
                let mut editor = handle.lock().await;
                select(&mut editor, SectionKind::ProfileTypes, &section)?;
                let form = editor.form_mut();
                form.id = id;
                form.description = description;
                form.source = source;
                if let Some(role) = role {
                    form.role = role;
                }
                if let Some(style) = style {
                    form.style = style;
                }
                for division in &divisions {
                    form.add_division(division)?;
                }
                editor.submit_form()?;
            }
            report(json, finish(handle, dry_run, 0).await?)?;
        }
        Commands::AddItem {
            kind,
            section,
            description,
            header,
        } => {
            let kind = SectionKind::from(kind);
            if kind.holds_profile_cards() {
                bail!("add-item works on homeCards and guidelines; use add-profile-card");
            }
            {
                let mut editor = handle.lock().await;
                select(&mut editor, kind, &section)?;
                let form = editor.form_mut();
                form.description = description;
                form.header = header.unwrap_or_default();
                editor.submit_form()?;
            }
            report(json, finish(handle, dry_run, 0).await?)?;
        }
        Commands::DeleteCard {
            kind,
            section,
            identity,
        } => {
            let kind = SectionKind::from(kind);
            let removed = {
                let mut editor = handle.lock().await;
                select(&mut editor, kind, &section)?;
                editor.delete_by_identity(&identity)?
            };
            if removed == 0 {
                bail!("No card {:?} in {} section {}", identity, kind, section);
            }
            report(json, finish(handle, dry_run, removed).await?)?;
        }
        Commands::DeleteItem {
            kind,
            section,
            index,
        } => {
            let kind = SectionKind::from(kind);
            if kind.holds_profile_cards() {
                bail!("delete-item works on homeCards and guidelines; use delete-card");
            }
            {
                let mut editor = handle.lock().await;
                select(&mut editor, kind, &section)?;
                let kid = editor
                    .working()
                    .and_then(|w| w.card_content.item_cards(kind, &section))
                    .and_then(|cards| cards.get(index))
                    .and_then(|card| card.kid.clone())
                    .with_context(|| {
                        format!("No item at position {} in {} section {}", index, kind, section)
                    })?;
                editor.delete_item_by_kid(&kid)?;
            }
            report(json, finish(handle, dry_run, 1).await?)?;
        }
        Commands::Feed {
            profile_type,
            role,
            user_roles,
            count,
            seed,
        } => {
            let profile_type = profile_type.unwrap_or_else(|| config.feed_profile_type.clone());
            let cards = {
                let editor = handle.lock().await;
                let content = editor.working().context("Card content is not loaded")?;
                let request = FeedRequest {
                    profile_type: &profile_type,
                    selected_role: &role,
                    user_roles: &user_roles,
                    visible: count,
                };
                let mut rng: Box<dyn RngCore> = match seed {
                    Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
                    None => Box::new(rand::thread_rng()),
                };
                feed::pick_cards(&content.card_content, &request, rng.as_mut())
            };
            print_out(json, &cards, |c| {
                format!("{}\t{}\t{}\t{}", c.id, c.role, c.source, c.description)
            })?;
        }
    }
    Ok(())
}

fn select(editor: &mut Editor, kind: SectionKind, section: &str) -> anyhow::Result<()> {
    editor.set_kind(kind);
    editor.select_section(section)?;
    Ok(())
}

fn section_summaries(editor: &Editor, kinds: &[SectionKind]) -> Vec<SectionSummary> {
    let Some(content) = editor.working() else {
        return Vec::new();
    };
    let doc = &content.card_content;
    kinds
        .iter()
        .flat_map(|&kind| {
            doc.section_ids(kind).into_iter().map(move |id| SectionSummary {
                kind,
                id: id.to_string(),
                cards: doc.card_count(kind, id).unwrap_or(0),
            })
        })
        .collect()
}

/// Collect what changed, then write it unless this is a dry run.
async fn finish<S: ContentStore + ?Sized>(
    handle: &EditorHandle<S>,
    dry_run: bool,
    removed: usize,
) -> anyhow::Result<EditOutcome> {
    let (changes, diff) = {
        let mut editor = handle.lock().await;
        print_notices(&editor.drain_notices());
        (editor.pending_changes().to_vec(), editor.diff())
    };
    let applied = if dry_run {
        false
    } else {
        handle.apply_changes().await?
    };
    print_notices(&handle.lock().await.drain_notices());
    Ok(EditOutcome {
        removed,
        changes,
        diff,
        applied,
    })
}

fn report(json: bool, outcome: EditOutcome) -> anyhow::Result<()> {
    print_one(json, outcome, |o| {
        let mut lines: Vec<String> = o.changes.iter().map(change_row).collect();
        lines.extend(o.diff.iter().map(diff_row));
        lines.push(if o.applied {
            "applied".to_string()
        } else {
            "dry run: nothing written".to_string()
        });
        lines.join("\n")
    })
}
