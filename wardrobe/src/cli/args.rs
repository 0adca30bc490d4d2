// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Catalog clothing and outfits by their tags
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[arg(long = "no-color", help = "disable colored output")]
    pub no_color: bool,

    #[arg(long = "generate-config", help = "print the default configuration")]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage clothing items (facets: Type, Color, Material, Status, Size)
    Clothing {
        #[command(subcommand)]
        action: EntityAction,
    },
    /// Manage outfits (facets: Style, Occasion, Temperature, Weather)
    Outfit {
        #[command(subcommand)]
        action: EntityAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum EntityAction {
    /// List items, optionally filtered
    List {
        #[arg(
            short = 't',
            long = "tag",
            value_name = "FACET=VALUE",
            help = "repeatable; values of one facet are alternatives, facets must all match"
        )]
        tags: Vec<String>,

        #[arg(long = "text", help = "description contains text")]
        text: Option<String>,

        #[arg(long = "json", help = "output as json")]
        json: bool,
    },
    /// Show one item
    Show {
        id: String,

        #[arg(long = "json", help = "output as json")]
        json: bool,
    },
    /// Add an item
    Add {
        #[arg(short = 'i', long = "image", help = "path or URI of the photo")]
        image: String,

        #[arg(short = 'd', long = "description")]
        description: Option<String>,

        #[arg(short = 't', long = "tag", value_name = "FACET=VALUE")]
        tags: Vec<String>,
    },
    /// Edit an item; tags given for a facet replace that facet
    Edit {
        id: String,

        #[arg(short = 'i', long = "image")]
        image: Option<String>,

        #[arg(short = 'd', long = "description")]
        description: Option<String>,

        #[arg(short = 't', long = "tag", value_name = "FACET=VALUE")]
        tags: Vec<String>,

        #[arg(long = "clear", value_name = "FACET", help = "empty a facet")]
        clear: Vec<String>,
    },
    /// Remove an item
    Remove { id: String },
    /// Show the legal tag values per facet
    Vocab,
}
