use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde_json::Value;

use forge_model::{ContentRecord, RecordId};
use forge_report::{
    DirectorySink, ExportCoordinator, ExportFormat, ExportRequest, RenderOptions, render,
};
use forge_store::{
    ContentStore, HttpLookupSource, JsonDirStore, ListFilter, LookupCache, LookupSource,
};
use forge_validate::{steps_for, validate_step};

use crate::cli::{ExportArgs, IdArgs, ListArgs, LookupArgs, NewArgs, SetArgs, ShowArgs};
use crate::config::Settings;

pub fn open_store(settings: &Settings) -> Result<JsonDirStore> {
    let dir = settings.data_dir();
    JsonDirStore::open(&dir).with_context(|| format!("open record store {}", dir.display()))
}

fn parse_id(id: &str) -> Result<RecordId> {
    RecordId::new(id).with_context(|| format!("invalid record id {id:?}"))
}

fn load(store: &JsonDirStore, id: &str) -> Result<ContentRecord> {
    let id = parse_id(id)?;
    store
        .read(&id)
        .with_context(|| format!("read record {id}"))?
        .ok_or_else(|| anyhow!("no record with id {id}"))
}

fn render_options(full_names: bool) -> RenderOptions {
    if full_names {
        RenderOptions::preview()
    } else {
        RenderOptions::default()
    }
}

pub fn run_new(settings: &Settings, args: &NewArgs, out: &mut dyn Write) -> Result<()> {
    let mut store = open_store(settings)?;
    let record = ContentRecord::new(args.kind.into())
        .with_name(args.name.trim())
        .with_description(args.description.trim());
    let id = store.create(&record).context("save new record")?;
    tracing::info!(id = %id, kind = %record.kind(), "created record");
    writeln!(out, "{id}")?;
    Ok(())
}

pub fn run_show(settings: &Settings, args: &ShowArgs, out: &mut dyn Write) -> Result<()> {
    let store = open_store(settings)?;
    let record = load(&store, &args.id)?;
    let bytes = render(
        ExportFormat::Markup,
        &record,
        &render_options(args.full_names),
    )?;
    out.write_all(&bytes)?;
    Ok(())
}

pub fn run_list(settings: &Settings, args: &ListArgs, out: &mut dyn Write) -> Result<()> {
    let store = open_store(settings)?;
    let filter = ListFilter {
        kind: args.kind.map(Into::into),
        name_contains: args.name.clone(),
    };
    let records = store.list(&filter, args.sort.into())?;
    if records.is_empty() {
        writeln!(out, "No records.")?;
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Kind"),
        header_cell("Name"),
        header_cell("Updated"),
    ]);
    apply_table_style(&mut table);
    for record in &records {
        table.add_row(vec![
            Cell::new(record.id()),
            Cell::new(record.kind()),
            Cell::new(&record.name),
            Cell::new(record.updated_at().format("%Y-%m-%d %H:%M UTC")),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Check every step. Returns whether all of them pass.
pub fn run_validate(settings: &Settings, args: &IdArgs, out: &mut dyn Write) -> Result<bool> {
    let store = open_store(settings)?;
    let record = load(&store, &args.id)?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Step"),
        header_cell("Status"),
        header_cell("Issues"),
    ]);
    apply_table_style(&mut table);
    let mut all_passed = true;
    for (index, step) in steps_for(record.kind()).iter().enumerate() {
        let result = validate_step(index + 1, &record);
        all_passed &= result.can_proceed;
        let status = if result.can_proceed {
            Cell::new("ok").fg(Color::Green)
        } else {
            Cell::new("blocked")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        };
        let issues = result
            .errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(step.title()),
            status,
            Cell::new(issues),
        ]);
    }
    writeln!(out, "{} ({})", record.name, record.kind())?;
    writeln!(out, "{table}")?;
    Ok(all_passed)
}

pub fn run_set(settings: &Settings, args: &SetArgs, out: &mut dyn Write) -> Result<()> {
    let mut store = open_store(settings)?;
    let mut record = load(&store, &args.id)?;
    let patch: Value = serde_json::from_str(&args.patch).context("patch is not valid JSON")?;
    record
        .merge_patch(&patch)
        .with_context(|| format!("apply patch to {}", record.id()))?;
    let id = store.update(&record)?;
    writeln!(out, "Updated {id}")?;
    Ok(())
}

pub fn run_delete(settings: &Settings, args: &IdArgs, out: &mut dyn Write) -> Result<()> {
    let mut store = open_store(settings)?;
    let id = parse_id(&args.id)?;
    if !store.delete(&id)? {
        bail!("no record with id {id}");
    }
    writeln!(out, "Deleted {id}")?;
    Ok(())
}

pub fn run_export(settings: &Settings, args: &ExportArgs, out: &mut dyn Write) -> Result<()> {
    let store = open_store(settings)?;
    let record = load(&store, &args.id)?;
    let format = match &args.format {
        Some(format) => format.parse::<ExportFormat>()?,
        None => settings.default_format()?,
    };
    let dir = args.out.clone().unwrap_or_else(|| settings.output_dir());
    let mut request = ExportRequest::new(format).with_options(render_options(args.full_names));
    if let Some(stem) = &args.stem {
        request = request.with_stem(stem);
    }

    let coordinator = ExportCoordinator::new(DirectorySink::new(&dir));
    let report = coordinator
        .export(&record, &request)
        .with_context(|| format!("export {} as {format}", record.name))?;
    writeln!(
        out,
        "Wrote {} ({} bytes, sha256 {})",
        display_path(&dir, &report.filename),
        report.bytes,
        report.sha256
    )?;
    Ok(())
}

fn display_path(dir: &Path, filename: &str) -> String {
    dir.join(filename).display().to_string()
}

pub fn run_formats(out: &mut dyn Write) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Format"),
        header_cell("Extension"),
        header_cell("Media type"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for format in ExportFormat::ALL {
        table.add_row(vec![
            format.id(),
            format.extension(),
            format.mime_type(),
            format.description(),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

pub fn run_lookup(settings: &Settings, args: &LookupArgs, out: &mut dyn Write) -> Result<()> {
    let lookup = &settings.lookup;
    let source = HttpLookupSource::new(&lookup.base_url, lookup.timeout())?;
    let cache = LookupCache::new(source, lookup.cache_config());
    let value = cache
        .fetch(&args.resource, &args.index)
        .with_context(|| format!("look up {}/{}", args.resource, args.index))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
