use card_content_core::editor::{Notice, NoticeLevel};
use card_content_core::tracking::{CardChange, ChangeRecord};
use serde::Serialize;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

pub fn print_error(json: bool, err: &anyhow::Error) {
    if json {
        let body = serde_json::json!({ "ok": false, "error": format!("{:#}", err) });
        println!("{}", body);
    } else {
        eprintln!("error: {:#}", err);
    }
}

/// Toasts go to stderr so stdout stays parseable.
pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let level = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        match &notice.description {
            Some(description) => eprintln!("[{}] {}: {}", level, notice.title, description),
            None => eprintln!("[{}] {}", level, notice.title),
        }
    }
}

pub fn change_row(record: &ChangeRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        record.time_label(),
        record.title(),
        record.details.profile_type,
        record.details.card_id,
        record.details.description
    )
}

pub fn diff_row(change: &CardChange) -> String {
    match change {
        CardChange::Added {
            kind,
            section,
            card_id,
            description,
        } => format!("+ {}/{}\t{}\t{}", kind, section, card_id, description),
        CardChange::Removed {
            kind,
            section,
            card_id,
            description,
        } => format!("- {}/{}\t{}\t{}", kind, section, card_id, description),
        CardChange::Reordered { kind, section } => format!("~ {}/{}\treordered", kind, section),
    }
}
