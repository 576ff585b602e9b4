//! Route table commands

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use report_scoring_core::{Navigation, RouteSummary, RouteTable};
use serde::Serialize;

use crate::context::Context;
use crate::output::{
    print_field, print_list_field, print_optional_field, print_section, TableDisplay,
};

/// Route table commands
#[derive(Debug, Args)]
pub struct RoutesCommands {
    #[command(subcommand)]
    pub command: RoutesSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum RoutesSubcommand {
    /// List every navigable path
    List,

    /// Show which view a path opens
    Resolve {
        /// Path, e.g. /scoring
        path: String,
    },
}

/// Execute route commands
pub async fn execute(ctx: &Context, cmd: RoutesCommands) -> Result<()> {
    let table = RouteTable::global();
    match cmd.command {
        RoutesSubcommand::List => {
            let routes: Vec<RouteDisplay> =
                table.summaries().into_iter().map(Into::into).collect();
            ctx.output
                .write_list(&routes, &["Path", "Name", "Title", "Layout"])
        }
        RoutesSubcommand::Resolve { path } => match table.navigate(&path) {
            Some(nav) => ctx.output.write(&ResolvedDisplay::from(&nav)),
            None => anyhow::bail!("No route matches '{}'", path),
        },
    }
}

/// Displayable route row
#[derive(Debug, Serialize)]
struct RouteDisplay {
    path: String,
    name: Option<&'static str>,
    title: Option<&'static str>,
    layout: Option<String>,
}

impl From<RouteSummary> for RouteDisplay {
    fn from(s: RouteSummary) -> Self {
        Self {
            path: s.path,
            name: s.name,
            title: s.title,
            layout: s.layout,
        }
    }
}

impl TableDisplay for RouteDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.path),
            Cell::new(self.name.unwrap_or("-")),
            Cell::new(self.title.unwrap_or("-")),
            Cell::new(self.layout.as_deref().unwrap_or("-")),
        ]
    }

    fn display_single(&self) {
        print_section("Route");
        print_field("Path", &self.path);
        print_optional_field("Name", self.name);
        print_optional_field("Title", self.title);
        print_optional_field("Layout", self.layout.as_deref());
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}",
            self.path,
            self.name.unwrap_or("-"),
            self.title.unwrap_or("-")
        );
    }
}

/// Displayable navigation result
#[derive(Debug, Serialize)]
struct ResolvedDisplay {
    path: String,
    name: Option<&'static str>,
    title: Option<&'static str>,
    view: String,
    component: &'static str,
    layouts: Vec<String>,
}

impl From<&Navigation<'_>> for ResolvedDisplay {
    fn from(nav: &Navigation<'_>) -> Self {
        let page = nav.view();
        let layouts = nav.views[..nav.views.len() - 1]
            .iter()
            .map(|v| v.kind.to_string())
            .collect();
        Self {
            path: nav.matched.full_path.clone(),
            name: nav.matched.name(),
            title: nav.matched.title(),
            view: page.kind.to_string(),
            component: page.component,
            layouts,
        }
    }
}

impl TableDisplay for ResolvedDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.path),
            Cell::new(&self.view),
            Cell::new(self.component),
        ]
    }

    fn display_single(&self) {
        print_section("Route");
        print_field("Path", &self.path);
        print_optional_field("Name", self.name);
        print_optional_field("Title", self.title);
        print_field("View", &self.view);
        print_field("Component", self.component);
        print_list_field("Layouts", &self.layouts);
    }

    fn display_compact(&self) {
        println!("{}\t{}\t{}", self.path, self.view, self.component);
    }
}
