//! Command handlers.
//!
//! Each invocation opens an [`EditorSession`], applies one action and saves
//! the document when the action changed it.

use anyhow::{Context, Result};
use colored::Colorize;
use gameconfig::{
    EditorSession, FileDocumentStore, RecordForm, SchemaRef, SchemaRegistry, TableKind,
};

use crate::args::{Cli, Command, PackageCommand, RecordCommand, TableCommand};

/// Dispatches parsed commands to the editor session.
pub struct CommandHandler {
    session: EditorSession,
}

impl CommandHandler {
    /// Open the document under `--root` with the schemas from `--schemas`.
    pub fn open(cli: &Cli) -> Result<Self> {
        let mut registry = SchemaRegistry::new();
        let schema_dir = cli.schema_dir();
        registry
            .load_dir(&schema_dir)
            .with_context(|| format!("Failed to load schemas from {}", schema_dir.display()))?;

        let store = FileDocumentStore::discover(&cli.root)
            .with_context(|| format!("Failed to search {}", cli.root.display()))?;
        let session = EditorSession::open(Box::new(store), registry)?;
        Ok(Self { session })
    }

    pub fn handle(&mut self, command: Command) -> Result<()> {
        let changed = match command {
            Command::Show => {
                self.show();
                false
            }
            Command::Refresh => {
                self.refresh()?;
                false
            }
            Command::Save => true,
            Command::Output { path } => {
                self.session.set_target_path(path);
                true
            }
            Command::Build => {
                self.session.export()?;
                false
            }
            Command::Schemas => {
                self.schemas();
                false
            }
            Command::Package(cmd) => self.package(cmd)?,
            Command::Table(cmd) => self.table(cmd)?,
            Command::Record(cmd) => self.record(cmd)?,
        };

        if changed {
            self.session.save()?;
            println!(
                "{}",
                format!("GameConfig saved to {}", self.session.store().location()).green()
            );
        }
        Ok(())
    }

    fn show(&self) {
        let doc = self.session.document();
        println!("{} {}", "output:".bold(), doc.target_path);
        for (p, package) in doc.packages.iter().enumerate() {
            println!("[{p}] {}", package.name.cyan().bold());
            for (t, table) in package.tables.iter().enumerate() {
                let schema = table
                    .schema
                    .as_ref()
                    .map(SchemaRef::to_string)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "    [{t}] {} {:?} schema={} records={}",
                    table.name.yellow(),
                    table.kind,
                    schema,
                    table.len()
                );
            }
        }
    }

    fn refresh(&mut self) -> Result<()> {
        self.session.refresh()?;
        let packages = self.session.document().packages.len();
        for p in 0..packages {
            let tables = self.session.document().packages[p].tables.len();
            for t in 0..tables {
                self.select(p, t)?;
                let name = &self.session.document().packages[p].tables[t].name;
                match self.session.content_error() {
                    Some(e) => println!("[{p}/{t}] {}: {}", name, e.to_string().red()),
                    None => println!("[{p}/{t}] {}: {}", name, "ok".green()),
                }
            }
        }
        Ok(())
    }

    fn schemas(&self) {
        let registry = self.session.registry();
        if registry.is_empty() {
            println!("{}", "no schemas registered".yellow());
        }
        for id in registry.ids() {
            println!("{}", id.to_string().cyan().bold());
            if let Ok(members) = registry.introspect(id) {
                for member in members {
                    println!(
                        "    {}: {} ({})",
                        member.name,
                        member.kind,
                        member.kind.widget_name()
                    );
                }
            }
        }
    }

    fn package(&mut self, cmd: PackageCommand) -> Result<bool> {
        match cmd {
            PackageCommand::List => {
                for (p, package) in self.session.document().packages.iter().enumerate() {
                    println!("[{p}] {}", package.name);
                }
                Ok(false)
            }
            PackageCommand::Add { name } => {
                let p = self.session.add_package(name.as_deref())?;
                println!("added package [{p}]");
                Ok(true)
            }
            PackageCommand::Rename { package, name } => {
                self.session.rename_package(package, &name)?;
                Ok(true)
            }
            PackageCommand::Remove { package } => {
                let removed = self.session.remove_package(package)?;
                println!("removed package {}", removed.name);
                Ok(true)
            }
        }
    }

    fn table(&mut self, cmd: TableCommand) -> Result<bool> {
        match cmd {
            TableCommand::List { package } => {
                let package = self.session.document().package(package)?;
                for (t, table) in package.tables.iter().enumerate() {
                    println!("[{t}] {} {:?}", table.name, table.kind);
                }
                Ok(false)
            }
            TableCommand::Add { package, name } => {
                self.session.select_package(package)?;
                let t = self.session.add_table(name.as_deref())?;
                println!("added table [{package}/{t}]");
                Ok(true)
            }
            TableCommand::Rename {
                package,
                table,
                name,
            } => {
                self.select(package, table)?;
                self.session.rename_table(table, &name)?;
                Ok(true)
            }
            TableCommand::Remove { package, table } => {
                self.session.select_package(package)?;
                let removed = self.session.remove_table(table)?;
                println!("removed table {}", removed.name);
                Ok(true)
            }
            TableCommand::Kind {
                package,
                table,
                kind,
            } => {
                self.select(package, table)?;
                let kind = TableKind::from(kind);
                self.session.set_table_kind(kind)?;
                Ok(true)
            }
            TableCommand::Schema {
                package,
                table,
                schema,
            } => {
                self.select(package, table)?;
                let schema = schema.map(SchemaRef::new);
                if let Some(id) = &schema
                    && !self.session.registry().contains(id)
                {
                    warn!("schema `{id}` is not registered; table content stays unavailable");
                }
                self.session.set_table_schema(schema)?;
                Ok(true)
            }
        }
    }

    fn record(&mut self, cmd: RecordCommand) -> Result<bool> {
        match cmd {
            RecordCommand::List { package, table } => {
                self.select(package, table)?;
                let len = self.content_len()?;
                for index in 0..len {
                    let form = self.session.form(index)?;
                    print_form(&form);
                }
                Ok(false)
            }
            RecordCommand::Add {
                package,
                table,
                key,
            } => {
                self.select(package, table)?;
                let index = self.session.add_record(key.as_deref())?;
                let form = self.session.form(index)?;
                print_form(&form);
                Ok(true)
            }
            RecordCommand::Set {
                package,
                table,
                record,
                member,
                value,
            } => {
                self.select(package, table)?;
                let mut form = self.session.form(record)?;
                form.edit_text(&member, &value)
                    .with_context(|| format!("Failed to set {member} on {}", form.title()))?;
                print_form(&form);
                Ok(true)
            }
            RecordCommand::Remove {
                package,
                table,
                record,
            } => {
                self.select(package, table)?;
                self.session.remove_record(record)?;
                Ok(true)
            }
        }
    }

    fn select(&mut self, package: usize, table: usize) -> Result<()> {
        self.session.select_package(package)?;
        self.session.select_table(table)?;
        Ok(())
    }

    fn content_len(&self) -> Result<usize> {
        if let Some(e) = self.session.content_error() {
            anyhow::bail!("table content unavailable: {e}");
        }
        Ok(self.session.content().map_or(0, |c| c.len()))
    }
}

fn print_form(form: &RecordForm) {
    println!("{}", form.title().cyan().bold());
    for field in form.fields() {
        let value = field.value().to_string();
        let value = if field.is_enabled() {
            value.normal()
        } else {
            value.dimmed()
        };
        println!("    {}: {}", field.label(), value);
    }
}
