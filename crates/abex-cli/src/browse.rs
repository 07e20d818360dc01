//! # Browse Subcommands
//!
//! `list`, `show`, `stats` and `demos`: read-only views of the catalog.
//! Each prints a text table by default and JSON with `--json`.

use std::io::Write;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::json;

use abex_registry::ListQuery;
use abex_schema::{generate_example, Schema};

use crate::Session;

/// Arguments for `abex list`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive match on name, slug or description.
    #[arg(long, short)]
    pub search: Option<String>,

    /// Provider to keep (Core, Plugin, Theme, or a custom label).
    #[arg(long)]
    pub provider: Option<String>,

    /// Sort key: name, slug or provider.
    #[arg(long)]
    pub orderby: Option<String>,

    /// Sort direction: asc or desc.
    #[arg(long)]
    pub order: Option<String>,

    /// 1-based page number.
    #[arg(long)]
    pub page: Option<usize>,

    /// Page size.
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `abex show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ability name (`namespace/slug`).
    pub ability: String,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `abex stats` and `abex demos`.
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute `abex list`.
pub fn run_list(args: &ListArgs, session: &Session, out: &mut impl Write) -> Result<u8> {
    let query = ListQuery {
        search: args.search.clone(),
        provider: args.provider.clone(),
        orderby: args.orderby.clone(),
        order: args.order.clone(),
        page: args.page,
        per_page: args.per_page,
    };
    let page = session.registry.query(&query);

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&page)?)?;
        return Ok(0);
    }

    if page.items.is_empty() {
        writeln!(out, "No abilities found.")?;
        return Ok(0);
    }
    writeln!(out, "{:<40} {:<8} NAME", "SLUG", "PROVIDER")?;
    for item in &page.items {
        writeln!(out, "{:<40} {:<8} {}", item.slug, item.provider.as_str(), item.name)?;
    }
    writeln!(
        out,
        "\nPage {}/{} ({} abilities)",
        page.page,
        page.total_pages.max(1),
        page.total_items
    )?;
    Ok(0)
}

/// Execute `abex show`.
pub fn run_show(args: &ShowArgs, session: &Session, out: &mut impl Write) -> Result<u8> {
    let Some(summary) = session.registry.describe(&args.ability) else {
        bail!("ability \"{}\" not found", args.ability);
    };
    let schema = Schema::from_value(&summary.input_schema);
    let fields = schema.field_summaries();
    let example = generate_example(&summary.input_schema);

    if args.json {
        let doc = json!({"ability": summary, "example_input": example, "fields": fields});
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        return Ok(0);
    }

    writeln!(out, "{} ({})", summary.name, summary.slug)?;
    writeln!(out, "Provider: {}", summary.provider.as_str())?;
    if !summary.description.is_empty() {
        writeln!(out, "{}", summary.description)?;
    }
    if fields.is_empty() {
        writeln!(out, "\nInput: none")?;
    } else {
        writeln!(out, "\nInput fields:")?;
        for field in &fields {
            let marker = if field.required { " (required)" } else { "" };
            let ty = field.schema_type.as_deref().unwrap_or("any");
            match &field.description {
                Some(d) => writeln!(out, "  {}: {ty}{marker} - {d}", field.name)?,
                None => writeln!(out, "  {}: {ty}{marker}", field.name)?,
            }
        }
    }
    writeln!(out, "\nExample input:\n{}", serde_json::to_string_pretty(&example)?)?;
    Ok(0)
}

/// Execute `abex stats`.
pub fn run_stats(args: &OutputArgs, session: &Session, out: &mut impl Write) -> Result<u8> {
    let stats = session.registry.statistics();
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
        return Ok(0);
    }
    writeln!(out, "Total:  {}", stats.total)?;
    writeln!(out, "Core:   {}", stats.by_provider.core)?;
    writeln!(out, "Plugin: {}", stats.by_provider.plugin)?;
    writeln!(out, "Theme:  {}", stats.by_provider.theme)?;
    Ok(0)
}

/// Execute `abex demos`.
pub fn run_demos(args: &OutputArgs, session: &Session, out: &mut impl Write) -> Result<u8> {
    let demos = session.demos.list();
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&demos)?)?;
        return Ok(0);
    }
    for demo in &demos {
        let state = if demo.enabled { "enabled" } else { "disabled" };
        let access = if demo.read_only { " [read-only]" } else { "" };
        writeln!(out, "{:<14} {:<9} {}{access}", demo.key, state, demo.slug)?;
        writeln!(out, "  {}", demo.description)?;
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
abilities:
  - name: core/get-posts
    label: Get Posts
  - name: acme/greet
    label: Greet
    description: Says hello
    input_schema:
      type: object
      required: [name]
      properties:
        name: { type: string, description: Who to greet }
        loud: { type: boolean }
"#;

    fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abilities.yaml");
        std::fs::write(&path, CATALOG).unwrap();
        let session = Session::load(Some(&path), &[], &[]).unwrap();
        (dir, session)
    }

    fn capture(f: impl FnOnce(&mut Vec<u8>) -> Result<u8>) -> (u8, String) {
        let mut out = Vec::new();
        let code = f(&mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn list_prints_table_sorted_by_name() {
        let (_dir, session) = session();
        let (code, text) = capture(|out| run_list(&ListArgs::default(), &session, out));
        assert_eq!(code, 0);
        let greet = text.find("acme/greet").unwrap();
        let posts = text.find("core/get-posts").unwrap();
        assert!(posts < greet, "Get Posts sorts before Greet:\n{text}");
        assert!(text.contains("Page 1/1 (2 abilities)"));
    }

    #[test]
    fn list_json_filters_by_provider() {
        let (_dir, session) = session();
        let args = ListArgs {
            provider: Some("Core".into()),
            json: true,
            ..ListArgs::default()
        };
        let (_, text) = capture(|out| run_list(&args, &session, out));
        let page: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(page["total_items"], 1);
        assert_eq!(page["items"][0]["slug"], "core/get-posts");
    }

    #[test]
    fn show_lists_fields_and_example() {
        let (_dir, session) = session();
        let args = ShowArgs {
            ability: "acme/greet".into(),
            json: false,
        };
        let (_, text) = capture(|out| run_show(&args, &session, out));
        assert!(text.contains("Greet (acme/greet)"));
        assert!(text.contains("name: string (required) - Who to greet"));
        assert!(text.contains("loud: boolean"));
        assert!(text.contains("\"loud\": false"));
    }

    #[test]
    fn show_unknown_ability_fails() {
        let (_dir, session) = session();
        let args = ShowArgs {
            ability: "acme/missing".into(),
            json: false,
        };
        let err = run_show(&args, &session, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("acme/missing"));
    }

    #[test]
    fn stats_counts_providers() {
        let (_dir, session) = session();
        let (_, text) = capture(|out| run_stats(&OutputArgs::default(), &session, out));
        assert!(text.contains("Total:  2"));
        assert!(text.contains("Core:   1"));
        assert!(text.contains("Plugin: 1"));
    }

    #[test]
    fn demos_listed_disabled_by_default() {
        let (_dir, session) = session();
        let (_, text) = capture(|out| run_demos(&OutputArgs::default(), &session, out));
        assert!(text.contains("site-health"));
        assert!(text.contains("disabled"));
    }
}
