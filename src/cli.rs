//! Command-line interface.
//!
//! Usage:
//!   relpick [site flags] posts [--multi] [--id ID ...]
//!   relpick [site flags] sites [--multi] [--id ID ...]
//!   relpick [site flags] blog [--id ID]
//!   relpick [site flags] search <posts|sites> <TEXT>
//!   relpick [site flags] resolve

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::Identifier;
use crate::config::{Config, parse_debounce};
use crate::picker::debounce::MAX_DEBOUNCE_MS;
use crate::picker::{PickerPreset, SelectionValue};

#[derive(Debug, Parser)]
#[command(
    name = "relpick",
    version,
    about = "Pick related WordPress posts and sites from the terminal"
)]
pub struct Cli {
    #[command(flatten)]
    pub site: SiteArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags overriding `~/.relpickrc`.
#[derive(Debug, Default, Args)]
pub struct SiteArgs {
    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Host to query instead of the origin
    #[arg(long, global = true)]
    pub domain: Option<String>,
    /// Site origin (http://localhost by default)
    #[arg(long, global = true, value_parser = parse_origin)]
    pub origin: Option<String>,
    /// Default API root
    #[arg(long, global = true)]
    pub api_root: Option<String>,
    /// REST namespace
    #[arg(long, global = true)]
    pub namespace: Option<String>,
    /// Resource collection
    #[arg(long, global = true)]
    pub resource_type: Option<String>,
    /// Blog path on the domain
    #[arg(long, global = true)]
    pub blog_path: Option<String>,
    /// Blog id whose path is looked up
    #[arg(long, global = true, value_parser = parse_identifier)]
    pub site_id: Option<Identifier>,
    /// Nonce sent as _wpnonce
    #[arg(long, global = true)]
    pub token: Option<String>,
    /// Quiet interval before searching, in milliseconds
    #[arg(long, global = true, value_parser = parse_debounce_arg)]
    pub debounce_ms: Option<u64>,
}

impl SiteArgs {
    /// Applies every given flag on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        let overrides = [
            (&self.domain, &mut config.domain),
            (&self.api_root, &mut config.api_root),
            (&self.namespace, &mut config.namespace),
            (&self.resource_type, &mut config.resource_type),
            (&self.blog_path, &mut config.blog_path),
            (&self.token, &mut config.token),
        ];
        for (flag, slot) in overrides {
            if flag.is_some() {
                slot.clone_from(flag);
            }
        }

        if let Some(origin) = &self.origin {
            config.origin.clone_from(origin);
        }
        if self.site_id.is_some() {
            config.site_id.clone_from(&self.site_id);
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = ms;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pick related posts
    Posts(PickArgs),
    /// Pick associated sites from the network list
    Sites(PickArgs),
    /// Select a single blog
    Blog {
        /// Initially selected blog (defaults to 1)
        #[arg(long, value_parser = parse_identifier)]
        id: Option<Identifier>,
    },
    /// Run one search and print the results as JSON lines
    Search {
        /// What to search
        #[arg(value_enum)]
        kind: SearchKind,
        /// Search text
        text: String,
    },
    /// Print the resolved collection endpoint
    Resolve,
}

/// Options shared by the multi-capable pickers.
#[derive(Debug, Default, Args)]
pub struct PickArgs {
    /// Allow several selected items
    #[arg(long)]
    pub multi: bool,
    /// Initially selected ids
    #[arg(long = "id", value_parser = parse_identifier)]
    pub ids: Vec<Identifier>,
}

impl PickArgs {
    /// Builds the seed selection; single mode keeps the first id.
    #[must_use]
    pub fn seed(&self) -> SelectionValue {
        if self.multi {
            SelectionValue::Multi(self.ids.clone())
        } else {
            SelectionValue::Single(self.ids.first().cloned())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchKind {
    Posts,
    Sites,
}

impl SearchKind {
    #[must_use]
    pub fn preset(self) -> PickerPreset {
        match self {
            Self::Posts => PickerPreset::Posts,
            Self::Sites => PickerPreset::AssociatedSites,
        }
    }
}

impl Command {
    /// Returns the preset and seed for the interactive commands.
    #[must_use]
    pub fn interactive(&self) -> Option<(PickerPreset, SelectionValue)> {
        match self {
            Self::Posts(args) => Some((PickerPreset::Posts, args.seed())),
            Self::Sites(args) => Some((PickerPreset::AssociatedSites, args.seed())),
            Self::Blog { id } => Some((PickerPreset::SelectBlog, SelectionValue::Single(id.clone()))),
            Self::Search { .. } | Self::Resolve => None,
        }
    }
}

fn parse_identifier(value: &str) -> Result<Identifier, String> {
    let id = Identifier::parse(value);
    match &id {
        Identifier::Int(0) => Err("id must not be 0".to_string()),
        Identifier::Str(s) if s.is_empty() => Err("id must not be empty".to_string()),
        _ => Ok(id),
    }
}

fn parse_origin(value: &str) -> Result<String, String> {
    let origin = value.trim();
    if origin.is_empty() {
        return Err("origin must not be empty".to_string());
    }
    Ok(origin.to_string())
}

fn parse_debounce_arg(value: &str) -> Result<u64, String> {
    parse_debounce(value).ok_or_else(|| format!("expected 1..={} milliseconds", MAX_DEBOUNCE_MS))
}
