//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gameconfig::TableKind;

/// Edit game configuration packages and tables.
#[derive(Parser, Debug)]
#[command(name = "gameconfig", version, about)]
pub struct Cli {
    /// Directory searched for the GameConfigData document.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Directory holding `<id>.schema.json` record schemas [default: <root>/Schemas]
    #[arg(long)]
    pub schemas: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn schema_dir(&self) -> PathBuf {
        self.schemas
            .clone()
            .unwrap_or_else(|| self.root.join("Schemas"))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the document tree.
    Show,
    /// Re-open every table and report the ones whose content is unavailable.
    Refresh,
    /// Save the document.
    Save,
    /// Set the export output path.
    Output { path: String },
    /// Export to runtime files.
    Build,
    /// List registered schemas and their members.
    Schemas,
    /// Manage packages.
    #[command(subcommand)]
    Package(PackageCommand),
    /// Manage tables of a package.
    #[command(subcommand)]
    Table(TableCommand),
    /// Manage records of a table.
    #[command(subcommand)]
    Record(RecordCommand),
}

#[derive(Subcommand, Debug)]
pub enum PackageCommand {
    List,
    Add { name: Option<String> },
    Rename { package: usize, name: String },
    Remove { package: usize },
}

#[derive(Subcommand, Debug)]
pub enum TableCommand {
    List {
        package: usize,
    },
    Add {
        package: usize,
        name: Option<String>,
    },
    Rename {
        package: usize,
        table: usize,
        name: String,
    },
    Remove {
        package: usize,
        table: usize,
    },
    /// Switch between list and map storage. Stored records are not converted.
    Kind {
        package: usize,
        table: usize,
        kind: KindArg,
    },
    /// Bind a schema id, or unbind when omitted.
    Schema {
        package: usize,
        table: usize,
        schema: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecordCommand {
    List {
        package: usize,
        table: usize,
    },
    Add {
        package: usize,
        table: usize,
        /// Key of the new record (map tables).
        #[arg(long)]
        key: Option<String>,
    },
    Set {
        package: usize,
        table: usize,
        record: usize,
        member: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    Remove {
        package: usize,
        table: usize,
        record: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KindArg {
    List,
    Map,
}

impl From<KindArg> for TableKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::List => TableKind::List,
            KindArg::Map => TableKind::Map,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_record_set() {
        let cli = Cli::parse_from([
            "gameconfig", "--root", "proj", "record", "set", "0", "1", "2", "Score", "4.0",
        ]);
        assert_eq!(cli.schema_dir(), PathBuf::from("proj").join("Schemas"));
        match cli.command {
            Command::Record(RecordCommand::Set {
                package,
                table,
                record,
                member,
                value,
            }) => {
                assert_eq!((package, table, record), (0, 1, 2));
                assert_eq!(member, "Score");
                assert_eq!(value, "4.0");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_table_kind() {
        let cli = Cli::parse_from(["gameconfig", "table", "kind", "0", "0", "list"]);
        match cli.command {
            Command::Table(TableCommand::Kind { kind, .. }) => {
                assert_eq!(TableKind::from(kind), TableKind::List);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
